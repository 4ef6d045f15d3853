#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks mobs along the path waypoints.

use std::time::Duration;

use glam::Vec2;
use path_defence_core::{Mob, Rules};

/// Speed modifiers applied to every mob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    slow_multiplier: f32,
    min_speed_fraction: f32,
}

impl Config {
    /// Creates a configuration from explicit modifiers.
    #[must_use]
    pub const fn new(slow_multiplier: f32, min_speed_fraction: f32) -> Self {
        Self {
            slow_multiplier,
            min_speed_fraction,
        }
    }

    /// Extracts the modifiers from the session rules.
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self::new(rules.slow_multiplier, rules.min_speed_fraction)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_rules(&Rules::default())
    }
}

/// Result of advancing a mob for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathStep {
    /// The mob moved toward its next waypoint without reaching it.
    Advanced {
        /// Position after the step.
        position: Vec2,
    },
    /// The mob reached its next waypoint and snapped onto it.
    ReachedWaypoint {
        /// Position of the waypoint.
        position: Vec2,
        /// Index of the waypoint that was reached.
        path_index: usize,
    },
    /// The mob already stands on the final waypoint.
    AtEnd,
}

/// Speed the mob travels at `now`, honouring an active slow effect.
#[must_use]
pub fn effective_speed(mob: &Mob, now: Duration, config: Config) -> f32 {
    let base = mob.base_speed;
    let speed = if mob.is_slowed(now) {
        base * config.slow_multiplier
    } else {
        base
    };
    speed.max(base * config.min_speed_fraction)
}

/// Moves a point that last reached `waypoints[path_index]` toward the next waypoint.
///
/// The step never overshoots: when the remaining distance is at most
/// `speed * dt_secs`, the point snaps onto the waypoint and any leftover
/// distance is discarded.
#[must_use]
pub fn step_along_path(
    position: Vec2,
    path_index: usize,
    speed: f32,
    dt_secs: f32,
    waypoints: &[Vec2],
) -> PathStep {
    let Some(&target) = waypoints.get(path_index + 1) else {
        return PathStep::AtEnd;
    };

    let step = speed * dt_secs;
    let offset = target - position;
    let distance = offset.length();

    if distance <= step {
        return PathStep::ReachedWaypoint {
            position: target,
            path_index: path_index + 1,
        };
    }

    PathStep::Advanced {
        position: position + offset * (step / distance),
    }
}

/// Recomputes the mob's speed and moves it one tick along the path.
///
/// Whether the mob reached the end is left to [`has_reached_end`], so callers
/// can resolve escapes as a batch after every mob moved.
pub fn advance_mob(
    mob: &mut Mob,
    now: Duration,
    dt: Duration,
    waypoints: &[Vec2],
    config: Config,
) {
    mob.speed = effective_speed(mob, now, config);

    let dt_secs = dt.as_secs_f32();
    match step_along_path(mob.position, mob.path_index, mob.speed, dt_secs, waypoints) {
        PathStep::Advanced { position } => mob.position = position,
        PathStep::ReachedWaypoint {
            position,
            path_index,
        } => {
            mob.position = position;
            mob.path_index = path_index;
        }
        PathStep::AtEnd => {}
    }
}

/// Reports whether the mob's path index designates the final waypoint.
#[must_use]
pub fn has_reached_end(mob: &Mob, waypoints: &[Vec2]) -> bool {
    mob.path_index + 1 >= waypoints.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{MobId, MobKind};
    use proptest::prelude::*;

    fn runner(base_speed: f32) -> Mob {
        let mut mob = Mob::spawn(MobId::new(0), MobKind::Normal, Vec2::ZERO, Duration::ZERO);
        mob.base_speed = base_speed;
        mob.speed = base_speed;
        mob
    }

    #[test]
    fn slowed_mob_moves_at_reduced_speed() {
        let mut mob = runner(80.0);
        mob.slowed_until = Some(Duration::from_secs(2));

        let slowed = effective_speed(&mob, Duration::from_secs(1), Config::default());
        assert!((slowed - 32.0).abs() < 1e-4, "expected 0.4 of base, got {slowed}");

        let recovered = effective_speed(&mob, Duration::from_secs(2), Config::default());
        assert!((recovered - 80.0).abs() < 1e-4);
    }

    #[test]
    fn speed_never_drops_below_minimum_fraction() {
        let mut mob = runner(100.0);
        mob.slowed_until = Some(Duration::from_secs(5));

        let harsh = Config::new(0.1, 0.3);
        let speed = effective_speed(&mob, Duration::ZERO, harsh);
        assert!((speed - 30.0).abs() < 1e-4, "expected floor at 0.3 of base, got {speed}");
    }

    #[test]
    fn step_snaps_onto_waypoint_without_overshoot() {
        let waypoints = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];

        let step = step_along_path(Vec2::new(8.0, 0.0), 0, 50.0, 1.0, &waypoints);
        assert_eq!(
            step,
            PathStep::ReachedWaypoint {
                position: Vec2::new(10.0, 0.0),
                path_index: 1,
            }
        );
    }

    #[test]
    fn step_moves_partially_toward_waypoint() {
        let waypoints = [Vec2::ZERO, Vec2::new(10.0, 0.0)];

        match step_along_path(Vec2::ZERO, 0, 4.0, 0.5, &waypoints) {
            PathStep::Advanced { position } => {
                assert!(position.distance(Vec2::new(2.0, 0.0)) < 1e-5);
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn final_waypoint_reports_end() {
        let waypoints = [Vec2::ZERO, Vec2::new(10.0, 0.0)];
        let mut mob = runner(20.0);
        mob.position = Vec2::new(9.0, 0.0);

        let dt = Duration::from_millis(100);
        advance_mob(&mut mob, Duration::ZERO, dt, &waypoints, Config::default());
        assert!(has_reached_end(&mob, &waypoints));
        assert_eq!(mob.path_index, 1);
        assert_eq!(
            step_along_path(mob.position, mob.path_index, 20.0, 1.0, &waypoints),
            PathStep::AtEnd
        );
    }

    proptest! {
        #[test]
        fn path_index_never_decreases(
            speed in 1.0f32..400.0,
            steps in proptest::collection::vec(1u64..200, 1..80),
        ) {
            let waypoints = [
                Vec2::new(16.0, 240.0),
                Vec2::new(176.0, 240.0),
                Vec2::new(176.0, 144.0),
                Vec2::new(336.0, 144.0),
            ];
            let mut mob = runner(speed);
            mob.position = waypoints[0];
            let mut previous = mob.path_index;

            for millis in steps {
                let dt = Duration::from_millis(millis);
                advance_mob(&mut mob, Duration::ZERO, dt, &waypoints, Config::default());
                prop_assert!(mob.path_index >= previous);
                prop_assert!(mob.path_index < waypoints.len());
                previous = mob.path_index;
            }
        }

        #[test]
        fn split_step_matches_single_step_within_a_segment(
            start in 0.0f32..100.0,
            speed in 1.0f32..50.0,
            dt in 0.01f32..1.0,
        ) {
            let waypoints = [Vec2::ZERO, Vec2::new(1_000.0, 0.0)];
            let origin = Vec2::new(start, 0.0);

            let whole = match step_along_path(origin, 0, speed, dt, &waypoints) {
                PathStep::Advanced { position } => position,
                other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
            };
            let half = match step_along_path(origin, 0, speed, dt / 2.0, &waypoints) {
                PathStep::Advanced { position } => position,
                other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
            };
            let split = match step_along_path(half, 0, speed, dt / 2.0, &waypoints) {
                PathStep::Advanced { position } => position,
                other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
            };

            prop_assert!(whole.distance(split) < 1e-3);
        }
    }
}
