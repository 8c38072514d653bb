//! Event history delivered by the host.
//!
//! The host records what happened on every tick. A controller that was not
//! scheduled for a few ticks must still see everything in between, so the
//! log is indexed by tick and read as a window.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::commands::CommandSeq;
use crate::world::{NodeId, PlayerId, Tick, UnitId};

/// Outcome reported for a previously issued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackStatus {
    /// The command finished.
    Succeeded,
    /// The command could not be carried out.
    Failed,
    /// The command is still running. Never terminal.
    Incomplete,
}

impl FeedbackStatus {
    /// Whether this status ends the command.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Incomplete)
    }
}

/// Something that happened in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A unit came into existence.
    Birth {
        /// The new unit.
        unit: UnitId,
        /// Its controller.
        owner: PlayerId,
    },
    /// A unit died.
    Death {
        /// The dead unit.
        unit: UnitId,
        /// Its controller.
        owner: PlayerId,
    },
    /// A resource node ran out.
    Exhausted {
        /// The exhausted node.
        node: NodeId,
    },
    /// Outcome of a command a player issued.
    Feedback {
        /// Unit the command was issued to.
        unit: UnitId,
        /// Player that issued it.
        owner: PlayerId,
        /// Sequence id the command was issued under.
        seq: CommandSeq,
        /// Reported outcome.
        status: FeedbackStatus,
    },
}

/// Tick-indexed event history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    ticks: BTreeMap<Tick, Vec<Event>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the given tick.
    pub fn record(&mut self, tick: Tick, event: Event) {
        self.ticks.entry(tick).or_default().push(event);
    }

    /// Events recorded on a single tick, in recording order.
    #[must_use]
    pub fn events_at(&self, tick: Tick) -> &[Event] {
        self.ticks.get(&tick).map_or(&[], Vec::as_slice)
    }

    /// Ticks in `[from, to)` with their events, oldest first.
    pub fn window(&self, from: Tick, to: Tick) -> impl Iterator<Item = (Tick, &[Event])> {
        self.ticks
            .range(from..to.max(from))
            .map(|(tick, events)| (*tick, events.as_slice()))
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_half_open_and_ordered() {
        let mut log = EventLog::new();
        log.record(5, Event::Exhausted { node: 50 });
        log.record(2, Event::Exhausted { node: 20 });
        log.record(3, Event::Exhausted { node: 30 });
        log.record(2, Event::Exhausted { node: 21 });

        let ticks: Vec<_> = log.window(2, 5).map(|(t, e)| (t, e.len())).collect();
        assert_eq!(ticks, vec![(2, 2), (3, 1)]);
        assert_eq!(log.events_at(2)[1], Event::Exhausted { node: 21 });
        assert!(log.events_at(4).is_empty());
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let mut log = EventLog::new();
        log.record(1, Event::Exhausted { node: 1 });
        assert_eq!(log.window(4, 2).count(), 0);
    }

    #[test]
    fn test_incomplete_is_not_terminal() {
        assert!(FeedbackStatus::Succeeded.is_terminal());
        assert!(FeedbackStatus::Failed.is_terminal());
        assert!(!FeedbackStatus::Incomplete.is_terminal());
    }
}
