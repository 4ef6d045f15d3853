use std::{collections::HashMap, time::Duration};

use path_defence_core::{Command, Event, MobId};
use path_defence_world::{self as world, query, World};
use proptest::prelude::*;

fn frame_deltas() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(5u64..400, 20..250)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lives_drop_by_exactly_the_mobs_that_escape(deltas in frame_deltas()) {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartGame, &mut events);

        for millis in deltas {
            let lives_before = query::lives(&world);
            events.clear();
            world::apply(
                &mut world,
                Command::Tick { dt: Duration::from_millis(millis), tile_length: 32.0 },
                &mut events,
            );
            let escaped = events
                .iter()
                .filter(|event| matches!(event, Event::MobEscaped { .. }))
                .count() as u32;
            prop_assert_eq!(query::lives(&world), lives_before.saturating_sub(escaped));
            let terminal = query::lives(&world) == 0 || query::is_victory(&world);
            prop_assert_eq!(query::is_game_over(&world), terminal);
        }
    }

    #[test]
    fn path_index_is_monotonic_and_bounded(deltas in frame_deltas()) {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartGame, &mut events);
        let last_index = query::grid(&world).path().len() - 1;
        let mut seen: HashMap<MobId, usize> = HashMap::new();

        for millis in deltas {
            world::apply(
                &mut world,
                Command::Tick { dt: Duration::from_millis(millis), tile_length: 32.0 },
                &mut events,
            );
            for mob in query::mobs(&world) {
                prop_assert!(mob.path_index < last_index, "mobs on the final waypoint are removed");
                if let Some(previous) = seen.insert(mob.id, mob.path_index) {
                    prop_assert!(mob.path_index >= previous);
                }
            }
        }
    }
}
