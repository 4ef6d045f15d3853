#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that plans tower shots, flies projectiles, and applies damage.
//!
//! The world drives the functions in this crate in three phases each tick:
//! ready towers turn into [`ShotPlan`]s, projectiles advance and turn into
//! [`Hit`] records when they resolve, and the collected hits are folded into
//! the mob list by [`apply_hits`].

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use path_defence_core::{
    Mob, MobId, Projectile, ProjectileId, TargetingStrategy, Tower, TowerId, TowerKind,
};
use path_defence_system_tower_targeting::{find_target, predict_mob_position};

/// Reports whether the tower's cooldown has elapsed at `now`.
///
/// A tower that never fired is ready. A tower with a non-positive rate never is.
#[must_use]
pub fn ready_to_fire(tower: &Tower, now: Duration) -> bool {
    let Some(last) = tower.last_fired_at else {
        return true;
    };
    if tower.rate <= 0.0 {
        return false;
    }

    let since = now.saturating_sub(last).as_secs_f64();
    since >= 1.0 / f64::from(tower.rate)
}

/// Shot a ready tower intends to take this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotPlan {
    /// Tower taking the shot.
    pub tower: TowerId,
    /// Kind of the firing tower.
    pub kind: TowerKind,
    /// Mob the tower acquired.
    pub target: MobId,
    /// World-space launch position.
    pub origin: Vec2,
    /// Lead-compensated point the projectile travels toward.
    pub aim: Vec2,
    /// Travel speed; zero for instant hits.
    pub speed: f32,
    /// Damage dealt to each mob hit.
    pub damage: u32,
    /// Splash radius carried by the projectile.
    pub splash_radius: Option<f32>,
    /// Slow duration carried by the projectile.
    pub slow: Option<Duration>,
}

impl ShotPlan {
    /// Materializes the plan into a projectile launched at `created_at`.
    #[must_use]
    pub fn into_projectile(self, id: ProjectileId, created_at: Duration) -> Projectile {
        Projectile {
            id,
            source: self.tower,
            kind: self.kind,
            position: self.origin,
            target: self.target,
            aim: self.aim,
            speed: self.speed,
            damage: self.damage,
            splash_radius: self.splash_radius,
            slow: self.slow,
            created_at,
        }
    }
}

/// Acquires a target for the tower and computes where to aim.
///
/// Moving projectiles aim at the position the target is predicted to reach
/// after the projectile's travel time to its current position. Instant shots
/// aim at the target's current position.
#[must_use]
pub fn plan_shot(
    tower: &Tower,
    mobs: &[Mob],
    waypoints: &[Vec2],
    tile_length: f32,
    strategy: TargetingStrategy,
) -> Option<ShotPlan> {
    let target = find_target(tower, mobs, tile_length, strategy)?;
    let origin = tower.center(tile_length);
    let speed = tower.projectile_speed.filter(|speed| *speed > 0.0).unwrap_or(0.0);

    let aim = if speed > 0.0 {
        let travel_time = origin.distance(target.position) / speed;
        predict_mob_position(target, travel_time, waypoints)
    } else {
        target.position
    };

    Some(ShotPlan {
        tower: tower.id,
        kind: tower.kind,
        target: target.id,
        origin,
        aim,
        speed,
        damage: tower.damage,
        splash_radius: tower.splash_radius(),
        slow: tower.slow_duration(),
    })
}

/// State of a projectile after it was advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flight {
    /// The projectile is still travelling.
    InFlight,
    /// The projectile resolves this tick.
    Arrived,
}

/// Moves the projectile toward its aim point, snapping onto it on arrival.
pub fn advance_projectile(projectile: &mut Projectile, dt: Duration) -> Flight {
    if projectile.is_instant() {
        return Flight::Arrived;
    }

    let step = projectile.speed * dt.as_secs_f32();
    let offset = projectile.aim - projectile.position;
    let distance = offset.length();

    if distance <= step {
        projectile.position = projectile.aim;
        return Flight::Arrived;
    }

    projectile.position += offset * (step / distance);
    Flight::InFlight
}

/// Damage record produced by a resolving projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    /// Mob struck by the projectile.
    pub mob: MobId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Damage before armor.
    pub damage: u32,
    /// Slow duration to apply, if any.
    pub slow: Option<Duration>,
}

/// Produces the hit records of a resolving projectile.
///
/// Instant projectiles strike their target. Arriving projectiles with a
/// splash radius strike every mob within the radius of the aim point at full
/// damage; other arriving projectiles strike their target. Targets that died
/// or escaped in the meantime receive nothing.
pub fn resolve_impact(projectile: &Projectile, mobs: &[Mob], out: &mut Vec<Hit>) {
    let hit = |mob: &Mob| Hit {
        mob: mob.id,
        tower: projectile.source,
        damage: projectile.damage,
        slow: projectile.slow,
    };

    match projectile.splash_radius {
        Some(radius) if !projectile.is_instant() => out.extend(
            mobs.iter()
                .filter(|mob| mob.position.distance(projectile.aim) <= radius)
                .map(hit),
        ),
        _ => out.extend(mobs.iter().find(|mob| mob.id == projectile.target).map(hit)),
    }
}

/// Damage a single hit deals after armor; never less than one.
#[must_use]
pub fn effective_damage(damage: u32, armor: u32) -> u32 {
    damage.saturating_sub(armor).max(1)
}

/// Mob removed because its hit points were exhausted.
#[derive(Clone, Debug, PartialEq)]
pub struct Kill {
    /// The removed mob, with its final state.
    pub mob: Mob,
    /// Tower whose hit was recorded last against the mob.
    pub credited_to: TowerId,
}

#[derive(Clone, Copy, Debug)]
struct Tally {
    damage: u32,
    slow: Option<Duration>,
    last_tower: TowerId,
}

/// Applies the tick's hits to the mobs and removes those that died.
///
/// Hits are grouped per mob; each contributes its armor-reduced damage and
/// the longest slow extends the mob's slow deadline to `now + duration` when
/// that is later than the current one. Killed mobs are reported in mob order.
pub fn apply_hits(mobs: &mut Vec<Mob>, hits: &[Hit], now: Duration, kills: &mut Vec<Kill>) {
    if hits.is_empty() {
        return;
    }

    let armor: BTreeMap<MobId, u32> = mobs.iter().map(|mob| (mob.id, mob.armor)).collect();
    let mut tallies: BTreeMap<MobId, Tally> = BTreeMap::new();

    for hit in hits {
        let Some(&armor) = armor.get(&hit.mob) else {
            continue;
        };
        let dealt = effective_damage(hit.damage, armor);
        let tally = tallies.entry(hit.mob).or_insert(Tally {
            damage: 0,
            slow: None,
            last_tower: hit.tower,
        });
        tally.damage = tally.damage.saturating_add(dealt);
        tally.slow = tally.slow.max(hit.slow);
        tally.last_tower = hit.tower;
    }

    for mob in mobs.iter_mut() {
        let Some(tally) = tallies.get(&mob.id) else {
            continue;
        };
        if let Some(duration) = tally.slow {
            let until = now.saturating_add(duration);
            let extended = mob.slowed_until.map_or(until, |current| current.max(until));
            mob.slowed_until = Some(extended);
        }
        mob.hp = mob.hp.saturating_sub(tally.damage);
    }

    let mut index = 0;
    while index < mobs.len() {
        if mobs[index].hp > 0 {
            index += 1;
            continue;
        }
        let mob = mobs.remove(index);
        if let Some(tally) = tallies.get(&mob.id) {
            kills.push(Kill {
                credited_to: tally.last_tower,
                mob,
            });
        }
    }
}
