//! Tick engine that advances the simulation by one time slice.
//!
//! The steps run in a fixed order and each one observes the effects of the
//! steps before it within the same tick:
//!
//! 1. advance the clock,
//! 2. complete the active wave once its duration elapsed,
//! 3. queue the next wave once the auto-start delay elapsed,
//! 4. activate a pending wave and spawn due mobs,
//! 5. move mobs along the path,
//! 6. remove mobs that reached the end and charge lives,
//! 7. let ready towers fire,
//! 8. fly projectiles and collect hits,
//! 9. apply damage, remove dead mobs, and pay bounties.

use std::time::Duration;

use glam::Vec2;
use path_defence_core::{catalog, Event, Mob, Outcome, WavePhase};
use path_defence_system_movement::{self as movement, advance_mob, has_reached_end};
use path_defence_system_spawning::SpawnRequest;
use path_defence_system_tower_combat::{
    advance_projectile, apply_hits, plan_shot, ready_to_fire, resolve_impact, Flight, Hit, Kill,
};
use tracing::info;

use crate::{commands::queue_next_wave, World};

pub(crate) fn advance(world: &mut World, dt: Duration, tile_length: f32, out: &mut Vec<Event>) {
    if !world.started || world.paused || world.outcome.is_some() {
        return;
    }

    world.time = world.time.saturating_add(dt);
    out.push(Event::TimeAdvanced { dt, now: world.time });

    complete_wave(world, out);
    auto_advance(world, out);

    let waypoints = world.grid.path_world_positions(tile_length);
    if world.outcome.is_none() {
        spawn_mobs(world, &waypoints, out);
    }
    move_mobs(world, dt, &waypoints);
    resolve_escapes(world, &waypoints, out);
    fire_towers(world, &waypoints, tile_length, out);
    let hits = fly_projectiles(world, dt);
    apply_damage(world, &hits, out);
}

fn complete_wave(world: &mut World, out: &mut Vec<Event>) {
    let WavePhase::Active { started_at } = world.phase else {
        return;
    };
    if world.time.saturating_sub(started_at) < world.rules.wave_duration {
        return;
    }

    let reward = catalog::wave(world.wave).map_or(0, |wave| wave.reward);
    world.phase = WavePhase::Completed {
        completed_at: world.time,
    };
    world.money = world.money.saturating_add(reward);
    info!(
        wave = world.wave,
        reward,
        spawned = world.spawner.emitted(),
        "wave completed"
    );
    out.push(Event::WaveCompleted {
        wave: world.wave,
        reward,
    });

    if world.wave >= catalog::total_waves() {
        conclude(world, Outcome::Victory, out);
    }
}

fn auto_advance(world: &mut World, out: &mut Vec<Event>) {
    let WavePhase::Completed { completed_at } = world.phase else {
        return;
    };
    if world.outcome.is_some() || world.wave >= catalog::total_waves() {
        return;
    }
    if world.time.saturating_sub(completed_at) >= world.rules.wave_auto_start_delay {
        queue_next_wave(world, out);
    }
}

fn spawn_mobs(world: &mut World, waypoints: &[Vec2], out: &mut Vec<Event>) {
    if world.phase == WavePhase::Pending {
        world.phase = WavePhase::Active {
            started_at: world.time,
        };
        world.spawner.reset();
        let mobs = catalog::wave(world.wave).map_or(0, |wave| wave.mob_count());
        info!(wave = world.wave, mobs, "wave started");
        out.push(Event::WaveStarted { wave: world.wave });
    }

    let WavePhase::Active { started_at } = world.phase else {
        return;
    };
    let (Some(definition), Some(&entrance)) = (catalog::wave(world.wave), waypoints.first())
    else {
        return;
    };
    if world.spawner.is_exhausted(definition) {
        return;
    }

    let mut requests: Vec<SpawnRequest> = Vec::new();
    world
        .spawner
        .handle(definition, world.time.saturating_sub(started_at), &mut requests);

    for request in requests {
        let id = world.ids.mob();
        let scheduled = started_at.saturating_add(request.offset);
        world
            .mobs
            .push(Mob::spawn(id, request.kind, entrance, scheduled));
        out.push(Event::MobSpawned {
            mob: id,
            kind: request.kind,
        });
    }
}

fn move_mobs(world: &mut World, dt: Duration, waypoints: &[Vec2]) {
    let config = movement::Config::from_rules(&world.rules);
    let now = world.time;
    for mob in &mut world.mobs {
        advance_mob(mob, now, dt, waypoints, config);
    }
}

fn resolve_escapes(world: &mut World, waypoints: &[Vec2], out: &mut Vec<Event>) {
    let (escaped, remaining): (Vec<Mob>, Vec<Mob>) = world
        .mobs
        .drain(..)
        .partition(|mob| has_reached_end(mob, waypoints));
    world.mobs = remaining;

    if escaped.is_empty() {
        return;
    }

    for mob in &escaped {
        world.lives = world.lives.saturating_sub(1);
        out.push(Event::MobEscaped {
            mob: mob.id,
            lives_remaining: world.lives,
        });
    }

    if world.lives == 0 && world.outcome.is_none() {
        conclude(world, Outcome::Defeat, out);
    }
}

fn fire_towers(world: &mut World, waypoints: &[Vec2], tile_length: f32, out: &mut Vec<Event>) {
    let now = world.time;
    let strategy = world.rules.targeting;

    for tower in world.towers.iter_mut() {
        if !ready_to_fire(tower, now) {
            continue;
        }
        let Some(plan) = plan_shot(tower, &world.mobs, waypoints, tile_length, strategy) else {
            continue;
        };

        tower.last_fired_at = Some(now);
        let id = world.ids.projectile();
        world.projectiles.push(plan.into_projectile(id, now));
        out.push(Event::ProjectileFired {
            projectile: id,
            tower: plan.tower,
            target: plan.target,
        });
    }
}

fn fly_projectiles(world: &mut World, dt: Duration) -> Vec<Hit> {
    let mut hits = Vec::new();
    let mobs = &world.mobs;

    world
        .projectiles
        .retain_mut(|projectile| match advance_projectile(projectile, dt) {
            Flight::InFlight => true,
            Flight::Arrived => {
                resolve_impact(projectile, mobs, &mut hits);
                false
            }
        });

    hits
}

fn apply_damage(world: &mut World, hits: &[Hit], out: &mut Vec<Event>) {
    let mut kills: Vec<Kill> = Vec::new();
    apply_hits(&mut world.mobs, hits, world.time, &mut kills);

    for kill in kills {
        world.money = world.money.saturating_add(kill.mob.bounty);
        let credited_to = world.towers.get_mut(kill.credited_to).map(|tower| {
            tower.kills += 1;
            tower.id
        });
        out.push(Event::MobKilled {
            mob: kill.mob.id,
            credited_to,
            bounty: kill.mob.bounty,
        });
    }
}

fn conclude(world: &mut World, outcome: Outcome, out: &mut Vec<Event>) {
    world.outcome = Some(outcome);
    info!(?outcome, wave = world.wave, lives = world.lives, "game over");
    out.push(Event::GameOver { outcome });
}
