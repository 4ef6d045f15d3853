//! Seeded bot that spends money on towers beside the path.

use path_defence_core::{catalog, Command, TowerKind, TowerTier};
use path_defence_world::{query, World};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic tower-building bot.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
}

impl Autopilot {
    /// Creates a bot whose tile choices are driven by `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Commands the bot wants to issue against the current world.
    ///
    /// Builds the cheapest affordable tower on a random free tile beside the
    /// path; when nothing can be built, upgrades the first affordable tower.
    pub(crate) fn plan(&mut self, world: &World) -> Vec<Command> {
        if query::is_game_over(world) {
            return Vec::new();
        }

        if let Some(commands) = self.plan_build(world) {
            return commands;
        }

        query::towers(world)
            .find(|tower| query::can_upgrade(world, tower.id))
            .map(|tower| vec![Command::UpgradeTower { tower: tower.id }])
            .unwrap_or_default()
    }

    fn plan_build(&mut self, world: &World) -> Option<Vec<Command>> {
        let kind = TowerKind::ALL
            .into_iter()
            .filter(|kind| query::can_afford(world, *kind, TowerTier::One))
            .min_by_key(|kind| catalog::tower_stats(*kind, TowerTier::One).cost)?;

        let candidates: Vec<_> = query::grid(world)
            .buildable_beside_path()
            .into_iter()
            .filter(|tile| query::can_place_tower(world, *tile))
            .collect();
        let tile = *candidates.choose(&mut self.rng)?;

        Some(vec![
            Command::StartBuilding { kind },
            Command::SelectTile { tile },
            Command::BuildTower { tile },
        ])
    }
}
