#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The world owns every entity and is only ever mutated through [`apply`].
//! Each call reports the transitions it performed as [`Event`] values, and
//! the [`query`] module exposes read-only views for adapters.

mod commands;
pub mod grid;
mod ids;
mod tick;
mod towers;

use std::time::Duration;

use path_defence_core::{
    Command, Event, GameSpeed, Mob, Outcome, Projectile, Rules, TileCoord, TowerId, TowerKind,
    WavePhase,
};
use path_defence_system_spawning::WaveSpawner;
use tracing::debug;

use grid::Grid;
use ids::EntityIds;
use towers::TowerRegistry;

/// Player selection state used while placing and inspecting towers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Tower kind awaiting placement.
    pub building: Option<TowerKind>,
    /// Tile chosen during placement, or the tile of the tower just built.
    pub tile: Option<TileCoord>,
    /// Tower currently inspected.
    pub tower: Option<TowerId>,
}

/// Represents the authoritative Path Defence world state.
#[derive(Clone, Debug)]
pub struct World {
    rules: Rules,
    grid: Grid,
    ids: EntityIds,
    time: Duration,
    money: u32,
    lives: u32,
    wave: u32,
    phase: WavePhase,
    outcome: Option<Outcome>,
    started: bool,
    paused: bool,
    speed: GameSpeed,
    mobs: Vec<Mob>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    selection: Selection,
    spawner: WaveSpawner,
}

impl World {
    /// Creates a world using the reference rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a world configured by the provided rules.
    ///
    /// Grid dimensions too small for the path are raised to
    /// [`grid::minimum_dimensions`], and the stored rules record the raised size.
    #[must_use]
    pub fn with_rules(mut rules: Rules) -> Self {
        let grid = Grid::create(rules.grid_columns, rules.grid_rows);
        rules.grid_columns = grid.columns();
        rules.grid_rows = grid.rows();
        Self {
            grid,
            ids: EntityIds::default(),
            time: Duration::ZERO,
            money: rules.initial_money,
            lives: rules.initial_lives,
            wave: 1,
            phase: WavePhase::Pending,
            outcome: None,
            started: false,
            paused: false,
            speed: GameSpeed::Normal,
            mobs: Vec::new(),
            towers: TowerRegistry::default(),
            projectiles: Vec::new(),
            selection: Selection::default(),
            spawner: WaveSpawner::new(),
            rules,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands whose preconditions fail leave the world untouched and report a
/// single [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let result = match command {
        Command::Tick { dt, tile_length } => {
            tick::advance(world, dt, tile_length, out_events);
            Ok(())
        }
        Command::StartGame => commands::start_game(world, out_events),
        Command::Pause => commands::set_paused(world, true, out_events),
        Command::Resume => commands::set_paused(world, false, out_events),
        Command::SetSpeed { speed } => commands::set_speed(world, speed, out_events),
        Command::Restart => commands::restart(world, out_events),
        Command::StartBuilding { kind } => commands::start_building(world, kind, out_events),
        Command::CancelBuilding => commands::cancel_building(world, out_events),
        Command::SelectTile { tile } => commands::select_tile(world, tile, out_events),
        Command::BuildTower { tile } => commands::build_tower(world, tile, out_events),
        Command::SelectTower { tower } => commands::select_tower(world, tower, out_events),
        Command::UpgradeTower { tower } => commands::upgrade_tower(world, tower, out_events),
        Command::SellTower { tower } => commands::sell_tower(world, tower, out_events),
        Command::StartNextWave => commands::start_next_wave(world, out_events),
    };

    if let Err(reason) = result {
        debug!(%reason, "command rejected");
        out_events.push(Event::CommandRejected { reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use path_defence_core::{
        catalog, GameSpeed, Mob, Outcome, Projectile, Rules, TileCoord, TileKind, Tower,
        TowerId, TowerKind, TowerTier, WavePhase,
    };

    use super::{grid::Grid, Selection, World};

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Simulated time elapsed while the game was running.
    #[must_use]
    pub fn time(world: &World) -> Duration {
        world.time
    }

    /// Currency held by the player.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Ordinal of the current wave, starting at one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Number of waves in the table.
    #[must_use]
    pub fn total_waves() -> u32 {
        catalog::total_waves()
    }

    /// Lifecycle phase of the current wave.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        world.phase
    }

    /// Terminal state, once reached.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Reports whether the world reached a terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.outcome.is_some()
    }

    /// Reports whether every wave was completed.
    #[must_use]
    pub fn is_victory(world: &World) -> bool {
        world.outcome == Some(Outcome::Victory)
    }

    /// Reports whether the game left its pre-start state.
    #[must_use]
    pub fn is_started(world: &World) -> bool {
        world.started
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Speed multiplier the driver should apply to frame deltas.
    #[must_use]
    pub fn speed(world: &World) -> GameSpeed {
        world.speed
    }

    /// Tile grid and carved path.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Kind of the tile, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(world: &World, tile: TileCoord) -> Option<TileKind> {
        world.grid.tile_at(tile)
    }

    /// Reports whether a tower could be placed on the tile right now.
    ///
    /// Unlike [`Grid::can_build_at`], this also rejects occupied tiles.
    #[must_use]
    pub fn can_place_tower(world: &World, tile: TileCoord) -> bool {
        world.grid.can_build_at(tile) && world.towers.occupant(tile).is_none()
    }

    /// World-space waypoints of the path for the provided tile length.
    #[must_use]
    pub fn path_waypoints(world: &World, tile_length: f32) -> Vec<Vec2> {
        world.grid.path_world_positions(tile_length)
    }

    /// Live mobs in spawn order.
    #[must_use]
    pub fn mobs(world: &World) -> &[Mob] {
        &world.mobs
    }

    /// Towers in construction order.
    pub fn towers(world: &World) -> impl Iterator<Item = &Tower> {
        world.towers.iter()
    }

    /// Number of towers on the grid.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Tower with the provided identifier.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<&Tower> {
        world.towers.get(id)
    }

    /// Tower occupying the tile.
    #[must_use]
    pub fn tower_at(world: &World, tile: TileCoord) -> Option<&Tower> {
        world.towers.occupant(tile)
    }

    /// Projectiles still in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Current player selection.
    #[must_use]
    pub fn selection(world: &World) -> Selection {
        world.selection
    }

    /// Reports whether the player can pay for the tower kind at the tier's cost.
    #[must_use]
    pub fn can_afford(world: &World, kind: TowerKind, tier: TowerTier) -> bool {
        world.money >= catalog::tower_stats(kind, tier).cost
    }

    /// Reports whether the tower exists, has another tier, and the player can pay for it.
    #[must_use]
    pub fn can_upgrade(world: &World, id: TowerId) -> bool {
        world
            .towers
            .get(id)
            .and_then(Tower::upgrade_cost)
            .is_some_and(|cost| world.money >= cost)
    }

    /// Reports whether `StartNextWave` would be accepted.
    #[must_use]
    pub fn can_start_next_wave(world: &World) -> bool {
        matches!(world.phase, WavePhase::Completed { .. })
            && world.outcome.is_none()
            && world.wave < catalog::total_waves()
    }

    /// Reports whether mobs are alive or the current wave is still spawning.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        !world.mobs.is_empty() || matches!(world.phase, WavePhase::Active { .. })
    }

    /// Fraction of the wave duration elapsed, while the wave is active.
    #[must_use]
    pub fn wave_progress(world: &World) -> Option<f32> {
        let WavePhase::Active { started_at } = world.phase else {
            return None;
        };
        let duration = world.rules.wave_duration.as_secs_f32();
        if duration <= 0.0 {
            return Some(1.0);
        }
        let elapsed = world.time.saturating_sub(started_at).as_secs_f32();
        Some((elapsed / duration).min(1.0))
    }

    /// Time left before the next wave starts on its own.
    #[must_use]
    pub fn next_wave_countdown(world: &World) -> Option<Duration> {
        if !can_start_next_wave(world) {
            return None;
        }
        let WavePhase::Completed { completed_at } = world.phase else {
            return None;
        };
        let since = world.time.saturating_sub(completed_at);
        Some(world.rules.wave_auto_start_delay.saturating_sub(since))
    }

    /// Currency the player would receive for selling the tower.
    #[must_use]
    pub fn sell_value(world: &World, id: TowerId) -> Option<u32> {
        world
            .towers
            .get(id)
            .map(|tower| world.rules.refund_for(tower.invested))
    }
}
