//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use path_defence_core::{TileCoord, Tower, TowerId};

/// Registry that stores towers keyed by identifier.
///
/// Iteration follows identifier order, which is also construction order.
#[derive(Clone, Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
}

impl TowerRegistry {
    pub(crate) fn insert(&mut self, tower: Tower) {
        let _ = self.entries.insert(tower.id, tower);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn occupant(&self, tile: TileCoord) -> Option<&Tower> {
        self.entries.values().find(|tower| tower.tile == tile)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
