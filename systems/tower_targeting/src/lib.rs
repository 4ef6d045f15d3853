#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure functions that pick tower targets and predict mob positions.

use glam::Vec2;
use path_defence_core::{Mob, MobKind, TargetingStrategy, Tower, TowerKind};

/// Reports whether a tower of `tower` kind may engage a mob of `mob` kind.
///
/// Cannons cannot reach flying mobs; every other pairing is allowed.
#[must_use]
pub const fn can_engage(tower: TowerKind, mob: MobKind) -> bool {
    !matches!((tower, mob), (TowerKind::Cannon, MobKind::Flying))
}

/// Reports whether the mob lies within the tower's range.
#[must_use]
pub fn in_range(tower: &Tower, mob: &Mob, tile_length: f32) -> bool {
    tower.center(tile_length).distance(mob.position) <= tower.range
}

/// Selects at most one mob for the tower to fire at.
///
/// Mobs the tower cannot engage are excluded before the range check. Among
/// the remaining candidates the strategy picks a winner; ties resolve to the
/// candidate that appears first in `mobs`.
#[must_use]
pub fn find_target<'a>(
    tower: &Tower,
    mobs: &'a [Mob],
    tile_length: f32,
    strategy: TargetingStrategy,
) -> Option<&'a Mob> {
    let center = tower.center(tile_length);
    let mut best: Option<Candidate<'a>> = None;

    for mob in mobs {
        if !can_engage(tower.kind, mob.kind) {
            continue;
        }

        let distance = center.distance(mob.position);
        if distance > tower.range {
            continue;
        }

        let current = Candidate { mob, distance };
        let replace = match &best {
            Some(existing) => current.precedes(existing, strategy),
            None => true,
        };
        if replace {
            best = Some(current);
        }
    }

    best.map(|candidate| candidate.mob)
}

/// Estimates where the mob will be after travelling for `lead_time` seconds.
///
/// The mob advances along the remaining waypoints at its current speed,
/// crossing as many segments as the distance allows, and stops at the final
/// waypoint. Future changes to its speed are ignored.
#[must_use]
pub fn predict_mob_position(mob: &Mob, lead_time: f32, waypoints: &[Vec2]) -> Vec2 {
    let last = waypoints.len().saturating_sub(1);
    if mob.path_index >= last {
        return mob.position;
    }

    let mut remaining = mob.speed * lead_time;
    let mut index = mob.path_index;
    let mut position = mob.position;

    while remaining > 0.0 && index < last {
        let next = waypoints[index + 1];
        let to_next = position.distance(next);

        if to_next <= remaining {
            position = next;
            remaining -= to_next;
            index += 1;
        } else {
            position += (next - position) * (remaining / to_next);
            remaining = 0.0;
        }
    }

    position
}

#[derive(Clone, Copy, Debug)]
struct Candidate<'a> {
    mob: &'a Mob,
    distance: f32,
}

impl Candidate<'_> {
    fn precedes(&self, other: &Self, strategy: TargetingStrategy) -> bool {
        match strategy {
            TargetingStrategy::First => self.mob.path_index > other.mob.path_index,
            TargetingStrategy::Last => self.mob.path_index < other.mob.path_index,
            TargetingStrategy::Nearest => self.distance < other.distance,
            TargetingStrategy::Strongest => self.mob.hp > other.mob.hp,
            TargetingStrategy::Weakest => self.mob.hp < other.mob.hp,
        }
    }
}
