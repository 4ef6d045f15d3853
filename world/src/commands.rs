//! Player intents that mutate the world outside of the tick loop.

use path_defence_core::{
    catalog, Event, GameSpeed, RejectionReason, TileCoord, Tower, TowerId, TowerKind, TowerTier,
    WavePhase,
};
use tracing::info;

use crate::World;

type CommandResult = Result<(), RejectionReason>;

fn ensure_running(world: &World) -> CommandResult {
    if world.outcome.is_some() {
        return Err(RejectionReason::GameOver);
    }
    Ok(())
}

fn ensure_funds(world: &World, cost: u32) -> CommandResult {
    if world.money < cost {
        return Err(RejectionReason::InsufficientFunds {
            cost,
            available: world.money,
        });
    }
    Ok(())
}

pub(crate) fn start_game(world: &mut World, out: &mut Vec<Event>) -> CommandResult {
    if world.started {
        return Err(RejectionReason::AlreadyStarted);
    }

    world.started = true;
    world.paused = false;
    info!(wave = world.wave, "game started");
    out.push(Event::GameStarted);
    Ok(())
}

pub(crate) fn set_paused(world: &mut World, paused: bool, out: &mut Vec<Event>) -> CommandResult {
    world.paused = paused;
    out.push(Event::PauseChanged { paused });
    Ok(())
}

pub(crate) fn set_speed(
    world: &mut World,
    speed: GameSpeed,
    out: &mut Vec<Event>,
) -> CommandResult {
    world.speed = speed;
    out.push(Event::SpeedChanged { speed });
    Ok(())
}

pub(crate) fn restart(world: &mut World, out: &mut Vec<Event>) -> CommandResult {
    *world = World::with_rules(world.rules.clone());
    info!("world restarted");
    out.push(Event::WorldReset);
    Ok(())
}

pub(crate) fn start_building(
    world: &mut World,
    kind: TowerKind,
    out: &mut Vec<Event>,
) -> CommandResult {
    ensure_running(world)?;
    ensure_funds(world, catalog::tower_stats(kind, TowerTier::One).cost)?;

    world.selection.building = Some(kind);
    world.selection.tower = None;
    out.push(Event::BuildingStarted { kind });
    Ok(())
}

pub(crate) fn cancel_building(world: &mut World, out: &mut Vec<Event>) -> CommandResult {
    world.selection.building = None;
    world.selection.tile = None;
    out.push(Event::BuildingCancelled);
    Ok(())
}

pub(crate) fn select_tile(
    world: &mut World,
    tile: TileCoord,
    out: &mut Vec<Event>,
) -> CommandResult {
    if world.selection.building.is_some() {
        world.selection.tile = Some(tile);
        world.selection.tower = None;
    } else {
        world.selection.tile = None;
    }
    out.push(Event::TileSelected {
        tile: world.selection.tile,
    });
    Ok(())
}

pub(crate) fn build_tower(
    world: &mut World,
    tile: TileCoord,
    out: &mut Vec<Event>,
) -> CommandResult {
    ensure_running(world)?;
    let kind = world
        .selection
        .building
        .ok_or(RejectionReason::NoPendingBuild)?;
    if !world.grid.contains(tile) {
        return Err(RejectionReason::OutOfBounds);
    }
    if !world.grid.can_build_at(tile) {
        return Err(RejectionReason::NotBuildable);
    }
    if world.towers.occupant(tile).is_some() {
        return Err(RejectionReason::Occupied);
    }
    let cost = catalog::tower_stats(kind, TowerTier::One).cost;
    ensure_funds(world, cost)?;

    let id = world.ids.tower();
    world.towers.insert(Tower::build(id, tile, kind));
    world.money -= cost;
    world.selection = crate::Selection {
        building: None,
        tile: Some(tile),
        tower: Some(id),
    };

    out.push(Event::TowerBuilt {
        tower: id,
        kind,
        tile,
        cost,
    });
    out.push(Event::TowerSelected { tower: Some(id) });
    Ok(())
}

pub(crate) fn select_tower(
    world: &mut World,
    tower: Option<TowerId>,
    out: &mut Vec<Event>,
) -> CommandResult {
    if let Some(id) = tower {
        if world.towers.get(id).is_none() {
            return Err(RejectionReason::UnknownTower);
        }
    }

    world.selection = crate::Selection {
        building: None,
        tile: None,
        tower,
    };
    out.push(Event::TowerSelected { tower });
    Ok(())
}

pub(crate) fn upgrade_tower(world: &mut World, id: TowerId, out: &mut Vec<Event>) -> CommandResult {
    ensure_running(world)?;
    let tower = world.towers.get(id).ok_or(RejectionReason::UnknownTower)?;
    let tier = tower.tier.next().ok_or(RejectionReason::MaxTier)?;
    let cost = catalog::tower_stats(tower.kind, tier).cost;
    ensure_funds(world, cost)?;

    world.money -= cost;
    if let Some(tower) = world.towers.get_mut(id) {
        tower.promote(tier);
    }
    out.push(Event::TowerUpgraded { tower: id, tier, cost });
    Ok(())
}

pub(crate) fn sell_tower(world: &mut World, id: TowerId, out: &mut Vec<Event>) -> CommandResult {
    ensure_running(world)?;
    let tower = world.towers.remove(id).ok_or(RejectionReason::UnknownTower)?;
    let refund = world.rules.refund_for(tower.invested);

    world.money = world.money.saturating_add(refund);
    if world.selection.tower == Some(id) {
        world.selection.tower = None;
        out.push(Event::TowerSelected { tower: None });
    }
    out.push(Event::TowerSold { tower: id, refund });
    Ok(())
}

pub(crate) fn start_next_wave(world: &mut World, out: &mut Vec<Event>) -> CommandResult {
    if world.wave >= catalog::total_waves() {
        return Err(RejectionReason::NoWavesRemaining);
    }
    ensure_running(world)?;
    if !matches!(world.phase, WavePhase::Completed { .. }) {
        return Err(RejectionReason::WaveInProgress);
    }

    queue_next_wave(world, out);
    Ok(())
}

/// Advances the wave counter and leaves the new wave pending until the next tick.
pub(crate) fn queue_next_wave(world: &mut World, out: &mut Vec<Event>) {
    world.wave += 1;
    world.phase = WavePhase::Pending;
    info!(wave = world.wave, "wave queued");
    out.push(Event::WaveQueued { wave: world.wave });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply, query};
    use path_defence_core::Command;

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn rejection(events: &[Event]) -> Option<RejectionReason> {
        events.iter().find_map(|event| match event {
            Event::CommandRejected { reason } => Some(*reason),
            _ => None,
        })
    }

    fn build(world: &mut World, kind: TowerKind, tile: TileCoord) -> TowerId {
        let _ = run(world, Command::StartBuilding { kind });
        let events = run(world, Command::BuildTower { tile });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerBuilt { tower, .. } => Some(*tower),
                _ => None,
            })
            .expect("tower built")
    }

    #[test]
    fn building_deducts_cost_and_selects_tower() {
        let mut world = World::new();
        let id = build(&mut world, TowerKind::Arrow, TileCoord::new(0, 0));

        assert_eq!(query::money(&world), 400);
        let selection = query::selection(&world);
        assert_eq!(selection.tower, Some(id));
        assert_eq!(selection.tile, Some(TileCoord::new(0, 0)));
        assert_eq!(selection.building, None);
    }

    #[test]
    fn build_rejections_leave_money_untouched() {
        let mut world = World::new();
        let _ = run(&mut world, Command::StartBuilding { kind: TowerKind::Cannon });

        let path = run(&mut world, Command::BuildTower { tile: TileCoord::new(0, 7) });
        assert_eq!(rejection(&path), Some(RejectionReason::NotBuildable));
        assert_eq!(query::selection(&world).building, Some(TowerKind::Cannon));

        let outside = run(&mut world, Command::BuildTower { tile: TileCoord::new(20, 0) });
        assert_eq!(rejection(&outside), Some(RejectionReason::OutOfBounds));
        assert_eq!(query::selection(&world).building, Some(TowerKind::Cannon));
        assert_eq!(query::tower_count(&world), 0);
        assert_eq!(query::money(&world), 500);

        let _ = build(&mut world, TowerKind::Cannon, TileCoord::new(1, 1));
        let _ = run(&mut world, Command::StartBuilding { kind: TowerKind::Cannon });
        let occupied = run(&mut world, Command::BuildTower { tile: TileCoord::new(1, 1) });
        assert_eq!(rejection(&occupied), Some(RejectionReason::Occupied));
        assert_eq!(query::selection(&world).building, Some(TowerKind::Cannon));

        assert_eq!(query::tower_count(&world), 1);
        assert_eq!(query::money(&world), 350);
    }

    #[test]
    fn start_building_requires_funds() {
        let mut world = World::new();
        world.money = 110;

        let events = run(&mut world, Command::StartBuilding { kind: TowerKind::Frost });
        assert_eq!(
            rejection(&events),
            Some(RejectionReason::InsufficientFunds {
                cost: 120,
                available: 110,
            })
        );
        assert_eq!(query::selection(&world).building, None);
    }

    #[test]
    fn select_tile_only_sticks_while_building() {
        let mut world = World::new();
        let _ = run(&mut world, Command::SelectTile { tile: TileCoord::new(3, 3) });
        assert_eq!(query::selection(&world).tile, None);

        let _ = run(&mut world, Command::StartBuilding { kind: TowerKind::Arrow });
        let _ = run(&mut world, Command::SelectTile { tile: TileCoord::new(3, 3) });
        assert_eq!(query::selection(&world).tile, Some(TileCoord::new(3, 3)));

        let _ = run(&mut world, Command::CancelBuilding);
        assert_eq!(query::selection(&world), crate::Selection::default());
    }

    #[test]
    fn upgrade_then_sell_refunds_half_of_investment() {
        let mut world = World::new();
        let id = build(&mut world, TowerKind::Arrow, TileCoord::new(0, 0));
        let _ = run(&mut world, Command::UpgradeTower { tower: id });
        assert_eq!(query::money(&world), 360);
        assert_eq!(query::sell_value(&world, id), Some(70));

        let events = run(&mut world, Command::SellTower { tower: id });
        assert!(events.contains(&Event::TowerSold { tower: id, refund: 70 }));
        assert_eq!(query::money(&world), 430);
        assert_eq!(query::selection(&world).tower, None);
        assert!(query::tower(&world, id).is_none());
    }

    #[test]
    fn upgrade_stops_at_tier_three() {
        let mut world = World::new();
        world.money = 1_000;
        let id = build(&mut world, TowerKind::Frost, TileCoord::new(0, 0));
        let _ = run(&mut world, Command::UpgradeTower { tower: id });
        let _ = run(&mut world, Command::UpgradeTower { tower: id });

        let events = run(&mut world, Command::UpgradeTower { tower: id });
        assert_eq!(rejection(&events), Some(RejectionReason::MaxTier));
        assert_eq!(query::money(&world), 1_000 - 120 - 60 - 120);
        assert!(!query::can_upgrade(&world, id));
    }

    #[test]
    fn unknown_towers_are_rejected() {
        let mut world = World::new();
        let ghost = TowerId::new(99);

        for command in [
            Command::UpgradeTower { tower: ghost },
            Command::SellTower { tower: ghost },
            Command::SelectTower { tower: Some(ghost) },
        ] {
            let events = run(&mut world, command);
            assert_eq!(rejection(&events), Some(RejectionReason::UnknownTower));
        }
    }

    #[test]
    fn start_game_is_one_shot_and_unpauses() {
        let mut world = World::new();
        let _ = run(&mut world, Command::Pause);
        assert!(query::is_paused(&world));

        let events = run(&mut world, Command::StartGame);
        assert_eq!(events, vec![Event::GameStarted]);
        assert!(!query::is_paused(&world));

        let again = run(&mut world, Command::StartGame);
        assert_eq!(rejection(&again), Some(RejectionReason::AlreadyStarted));
    }

    #[test]
    fn next_wave_requires_completed_wave() {
        let mut world = World::new();
        let events = run(&mut world, Command::StartNextWave);
        assert_eq!(rejection(&events), Some(RejectionReason::WaveInProgress));

        world.phase = WavePhase::Completed {
            completed_at: std::time::Duration::ZERO,
        };
        let events = run(&mut world, Command::StartNextWave);
        assert_eq!(events, vec![Event::WaveQueued { wave: 2 }]);
        assert_eq!(query::wave_phase(&world), WavePhase::Pending);

        world.wave = catalog::total_waves();
        world.phase = WavePhase::Completed {
            completed_at: std::time::Duration::ZERO,
        };
        let events = run(&mut world, Command::StartNextWave);
        assert_eq!(rejection(&events), Some(RejectionReason::NoWavesRemaining));
    }

    #[test]
    fn restart_preserves_rules() {
        let rules = path_defence_core::Rules {
            initial_money: 900,
            ..path_defence_core::Rules::default()
        };
        let mut world = World::with_rules(rules);
        let _ = build(&mut world, TowerKind::Arrow, TileCoord::new(0, 0));

        let events = run(&mut world, Command::Restart);
        assert_eq!(events, vec![Event::WorldReset]);
        assert_eq!(query::money(&world), 900);
        assert_eq!(query::tower_count(&world), 0);
    }
}
