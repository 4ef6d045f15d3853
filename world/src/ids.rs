//! Identifier allocation for entities owned by the world.

use path_defence_core::{MobId, ProjectileId, TowerId};

/// Monotonic counters that hand out entity identifiers.
///
/// Identifiers are never reused within a session; restarting the world
/// replaces the allocator.
#[derive(Clone, Debug, Default)]
pub(crate) struct EntityIds {
    next_mob: u32,
    next_tower: u32,
    next_projectile: u32,
}

impl EntityIds {
    pub(crate) fn mob(&mut self) -> MobId {
        let id = MobId::new(self.next_mob);
        self.next_mob = self.next_mob.wrapping_add(1);
        id
    }

    pub(crate) fn tower(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        id
    }

    pub(crate) fn projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }
}
