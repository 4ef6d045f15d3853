//! Frame-driven wrapper that owns the world and notifies observers.

use std::time::Duration;

use path_defence_core::{Command, Event, Rules};
use path_defence_world::{self as world, query, World};

type Listener = Box<dyn FnMut(&World, &[Event])>;

/// Owns the world and feeds it commands and clamped frame deltas.
pub(crate) struct Session {
    world: World,
    listeners: Vec<Listener>,
    events: Vec<Event>,
}

impl Session {
    /// Creates a session around a fresh world built from `rules`.
    pub(crate) fn new(rules: Rules) -> Self {
        Self {
            world: World::with_rules(rules),
            listeners: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Registers a callback invoked with the events of every command that changed the world.
    pub(crate) fn subscribe(&mut self, listener: impl FnMut(&World, &[Event]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Applies a command and notifies listeners when the world changed.
    ///
    /// Rejected commands leave the world untouched; their events are returned
    /// to the caller but not published.
    pub(crate) fn submit(&mut self, command: Command) -> &[Event] {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        let changed = self
            .events
            .iter()
            .any(|event| !matches!(event, Event::CommandRejected { .. }));
        if changed {
            for listener in &mut self.listeners {
                listener(&self.world, &self.events);
            }
        }
        &self.events
    }

    /// Advances the simulation by one frame of real time.
    ///
    /// The real delta is clamped to the rules' maximum frame delta and then
    /// scaled by the world's speed multiplier.
    pub(crate) fn frame(&mut self, real_elapsed: Duration) -> &[Event] {
        let rules = query::rules(&self.world);
        let dt = real_elapsed.min(rules.max_frame_delta) * query::speed(&self.world).multiplier();
        let tile_length = rules.tile_length;
        self.submit(Command::Tick { dt, tile_length })
    }
}
