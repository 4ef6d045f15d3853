//! End-of-run report assembled from the event stream.

use std::fmt;

use path_defence_core::{Event, Outcome};
use path_defence_world::{query, World};

/// Counters accumulated while observing a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) spawned: u32,
    pub(crate) killed: u32,
    pub(crate) escaped: u32,
    pub(crate) bounty: u32,
    pub(crate) shots: u32,
    pub(crate) waves_completed: u32,
}

impl Tally {
    /// Folds a batch of events into the counters.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::MobSpawned { .. } => self.spawned += 1,
                Event::MobKilled { bounty, .. } => {
                    self.killed += 1;
                    self.bounty += bounty;
                }
                Event::MobEscaped { .. } => self.escaped += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::WaveCompleted { .. } => self.waves_completed += 1,
                _ => {}
            }
        }
    }
}

/// Final state of a run, ready for printing.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    outcome: Option<Outcome>,
    time_secs: f32,
    wave: u32,
    lives: u32,
    money: u32,
    towers: usize,
    tally: Tally,
}

impl Summary {
    /// Captures the world's final state together with the observed counters.
    pub(crate) fn new(world: &World, tally: Tally) -> Self {
        Self {
            outcome: query::outcome(world),
            time_secs: query::time(world).as_secs_f32(),
            wave: query::wave(world),
            lives: query::lives(world),
            money: query::money(world),
            towers: query::tower_count(world),
            tally,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            Some(Outcome::Victory) => "victory",
            Some(Outcome::Defeat) => "defeat",
            None => "in progress",
        };
        writeln!(f, "outcome: {outcome}")?;
        writeln!(f, "simulated: {:.1}s", self.time_secs)?;
        writeln!(f, "wave: {}/{}", self.wave, query::total_waves())?;
        writeln!(f, "lives: {}", self.lives)?;
        writeln!(f, "money: {}", self.money)?;
        writeln!(f, "towers: {}", self.towers)?;
        writeln!(
            f,
            "mobs: {} spawned, {} killed, {} escaped",
            self.tally.spawned, self.tally.killed, self.tally.escaped
        )?;
        write!(
            f,
            "shots: {}, bounty: {}, waves completed: {}",
            self.tally.shots, self.tally.bounty, self.tally.waves_completed
        )
    }
}
