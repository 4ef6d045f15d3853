#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave spawning system responsible for scheduling mob spawns.
//!
//! The scheduler compares the elapsed wave time against each spawn entry and
//! emits one [`SpawnRequest`] per scheduled mob that has become due. Every
//! request is keyed by its entry and ordinal, so repeated evaluation of the
//! same wave never emits a key twice regardless of how the elapsed time is
//! sliced into ticks.

use std::time::Duration;

use path_defence_core::{
    catalog::{SpawnEntry, WaveDefinition},
    MobKind,
};

/// Identifies a single scheduled mob within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpawnKey {
    entry: usize,
    ordinal: u32,
}

impl SpawnKey {
    /// Creates a key for the `ordinal`-th mob of the wave's `entry`-th entry.
    #[must_use]
    pub const fn new(entry: usize, ordinal: u32) -> Self {
        Self { entry, ordinal }
    }
}

/// Request to materialize one mob at the start of the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Scheduled slot the request fulfils.
    pub key: SpawnKey,
    /// Type of mob to create.
    pub kind: MobKind,
    /// Scheduled time of the spawn relative to the wave start.
    pub offset: Duration,
}

/// Computes how many mobs of the entry should exist after `elapsed` wave time.
///
/// Nothing is due before the entry's delay. From then on one mob is due
/// immediately and one more per `spacing`, capped at the entry's count. A zero
/// spacing releases the whole entry at once.
#[must_use]
pub fn due_count(entry: &SpawnEntry, elapsed: Duration) -> u32 {
    let Some(since_delay) = elapsed.checked_sub(entry.delay) else {
        return 0;
    };

    if entry.spacing.is_zero() {
        return entry.count;
    }

    let intervals = since_delay.as_nanos() / entry.spacing.as_nanos();
    let due = intervals.saturating_add(1);
    u32::try_from(due).map_or(entry.count, |due| due.min(entry.count))
}

/// Scheduled time of the `ordinal`-th mob of the entry, relative to the wave start.
#[must_use]
pub fn scheduled_offset(entry: &SpawnEntry, ordinal: u32) -> Duration {
    entry.delay.saturating_add(entry.spacing.saturating_mul(ordinal))
}

/// Stateful scheduler that remembers which slots of the current wave were emitted.
#[derive(Clone, Debug, Default)]
pub struct WaveSpawner {
    emitted: Vec<u32>,
}

impl WaveSpawner {
    /// Creates a scheduler with an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every emitted slot; called whenever a new wave becomes active.
    pub fn reset(&mut self) {
        self.emitted.clear();
    }

    /// Emits a request for every slot of `wave` that is due at `elapsed` and
    /// has not been emitted since the last reset.
    ///
    /// Requests are produced entry by entry in wave order, and by ascending
    /// ordinal within an entry.
    pub fn handle(
        &mut self,
        wave: &WaveDefinition,
        elapsed: Duration,
        out: &mut Vec<SpawnRequest>,
    ) {
        if self.emitted.len() < wave.entries.len() {
            self.emitted.resize(wave.entries.len(), 0);
        }

        for (index, entry) in wave.entries.iter().enumerate() {
            let due = due_count(entry, elapsed);
            let already = self.emitted[index];
            if due <= already {
                continue;
            }

            out.extend((already..due).map(|ordinal| SpawnRequest {
                key: SpawnKey::new(index, ordinal),
                kind: entry.kind,
                offset: scheduled_offset(entry, ordinal),
            }));
            self.emitted[index] = due;
        }
    }

    /// Number of slots emitted since the last reset.
    #[must_use]
    pub fn emitted(&self) -> u32 {
        self.emitted.iter().sum()
    }

    /// Reports whether every slot of `wave` has been emitted.
    #[must_use]
    pub fn is_exhausted(&self, wave: &WaveDefinition) -> bool {
        wave.entries
            .iter()
            .enumerate()
            .all(|(index, entry)| self.emitted.get(index).copied().unwrap_or(0) >= entry.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(delay_ms: u64, count: u32, spacing_ms: u64) -> SpawnEntry {
        SpawnEntry {
            delay: Duration::from_millis(delay_ms),
            kind: MobKind::Normal,
            count,
            spacing: Duration::from_millis(spacing_ms),
        }
    }

    #[test]
    fn nothing_is_due_before_the_delay() {
        let late = entry(12_000, 2, 1_500);
        assert_eq!(due_count(&late, Duration::from_millis(11_999)), 0);
        assert_eq!(due_count(&late, Duration::from_secs(12)), 1);
    }

    #[test]
    fn one_more_mob_is_due_per_spacing() {
        let steady = entry(0, 8, 1_200);
        assert_eq!(due_count(&steady, Duration::ZERO), 1);
        assert_eq!(due_count(&steady, Duration::from_millis(1_199)), 1);
        assert_eq!(due_count(&steady, Duration::from_millis(1_200)), 2);
        assert_eq!(due_count(&steady, Duration::from_millis(8_400)), 8);
        assert_eq!(due_count(&steady, Duration::from_secs(600)), 8);
    }

    #[test]
    fn zero_spacing_releases_entry_at_once() {
        let burst = entry(500, 4, 0);
        assert_eq!(due_count(&burst, Duration::from_millis(499)), 0);
        assert_eq!(due_count(&burst, Duration::from_millis(500)), 4);
    }

    #[test]
    fn offsets_follow_delay_and_spacing() {
        let late = entry(12_000, 2, 1_500);
        assert_eq!(scheduled_offset(&late, 0), Duration::from_secs(12));
        assert_eq!(scheduled_offset(&late, 1), Duration::from_millis(13_500));
    }

    #[test]
    fn reset_allows_the_wave_to_spawn_again() {
        static ENTRIES: [SpawnEntry; 1] = [SpawnEntry {
            delay: Duration::ZERO,
            kind: MobKind::Tank,
            count: 2,
            spacing: Duration::from_secs(1),
        }];
        let wave = WaveDefinition {
            id: 1,
            entries: &ENTRIES,
            reward: 0,
        };
        let mut spawner = WaveSpawner::new();
        let mut out = Vec::new();

        spawner.handle(&wave, Duration::from_secs(5), &mut out);
        spawner.handle(&wave, Duration::from_secs(5), &mut out);
        assert_eq!(out.len(), 2, "second pass must not duplicate slots");
        assert!(spawner.is_exhausted(&wave));

        spawner.reset();
        assert_eq!(spawner.emitted(), 0);
        spawner.handle(&wave, Duration::ZERO, &mut out);
        assert_eq!(out.len(), 3);
    }
}
