//! Command reconciliation ledger.
//!
//! Tracks, per owned unit, the single command believed to still be running.
//! The ledger is the only source of truth for "is this unit idle": decision
//! code may only issue a command to a unit whose entry is empty, and entries
//! are emptied exclusively by evidence from the event log.
//!
//! # Reconciliation order
//!
//! For each tick in the window, oldest first:
//!
//! 1. Births of own units add an idle entry.
//! 2. Deaths: attackers whose target died are marked for clearing, and own
//!    dead units are marked for removal.
//! 3. Exhaustions: gatherers of the exhausted node are marked for clearing.
//! 4. Marked entries are cleared, then marked units removed.
//! 5. Terminal feedback whose sequence id matches the recorded command clears
//!    the entry. Stale feedback is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::commands::{CommandKind, CommandMap, CommandSequencer, IssuedCommand};
use crate::events::{Event, EventLog};
use crate::world::{PlayerId, Tick, UnitId};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileSummary {
    /// Entries created for newly born units.
    pub born: usize,
    /// Entries removed because the unit died.
    pub removed: usize,
    /// Entries cleared because their target died or ran out.
    pub orphaned: usize,
    /// Entries cleared by matching feedback.
    pub completed: usize,
}

impl ReconcileSummary {
    fn absorb(&mut self, other: Self) {
        self.born += other.born;
        self.removed += other.removed;
        self.orphaned += other.orphaned;
        self.completed += other.completed;
    }

    /// Check if the pass changed nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.born == 0 && self.removed == 0 && self.orphaned == 0 && self.completed == 0
    }
}

/// Per-unit record of the in-flight command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLedger {
    entries: BTreeMap<UnitId, Option<IssuedCommand>>,
    sequencer: CommandSequencer,
}

impl CommandLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a unit as idle. Already tracked units are untouched.
    ///
    /// Returns `true` if a new entry was created.
    pub fn track(&mut self, unit: UnitId) -> bool {
        if self.entries.contains_key(&unit) {
            return false;
        }
        self.entries.insert(unit, None);
        true
    }

    /// Check if a unit has an entry.
    #[must_use]
    pub fn is_tracked(&self, unit: UnitId) -> bool {
        self.entries.contains_key(&unit)
    }

    /// Check if a tracked unit has no command in flight.
    #[must_use]
    pub fn is_idle(&self, unit: UnitId) -> bool {
        matches!(self.entries.get(&unit), Some(None))
    }

    /// The command believed to be running for a unit.
    #[must_use]
    pub fn in_flight(&self, unit: UnitId) -> Option<&IssuedCommand> {
        self.entries.get(&unit).and_then(Option::as_ref)
    }

    /// Issue a command to an idle unit.
    ///
    /// Returns `None` without touching the ledger if the unit is untracked or
    /// already busy.
    pub fn issue(&mut self, unit: UnitId, kind: CommandKind) -> Option<IssuedCommand> {
        let entry = self.entries.get_mut(&unit)?;
        if entry.is_some() {
            return None;
        }
        let command = self.sequencer.issue(kind);
        *entry = Some(command);
        Some(command)
    }

    /// Number of tracked units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no unit is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked unit ids in ascending order.
    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.entries.keys().copied()
    }

    /// Every in-flight command, keyed by unit.
    #[must_use]
    pub fn in_flight_commands(&self) -> CommandMap {
        self.entries
            .iter()
            .filter_map(|(unit, cmd)| cmd.map(|c| (*unit, c)))
            .collect()
    }

    /// Reconcile against every tick in `[from, to)` of the log.
    pub fn reconcile(
        &mut self,
        log: &EventLog,
        from: Tick,
        to: Tick,
        owner: PlayerId,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for (tick, events) in log.window(from, to) {
            let pass = self.reconcile_tick(events, owner);
            if !pass.is_empty() {
                trace!(tick, ?pass, "ledger reconciled");
            }
            summary.absorb(pass);
        }
        summary
    }

    /// Reconcile against the events of a single tick.
    pub fn reconcile_tick(&mut self, events: &[Event], owner: PlayerId) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for event in events {
            if let Event::Birth { unit, owner: o } = *event {
                if o == owner && self.track(unit) {
                    summary.born += 1;
                }
            }
        }

        let mut stop = Vec::new();
        let mut remove = Vec::new();

        for event in events {
            if let Event::Death { unit, owner: o } = *event {
                if o == owner {
                    remove.push(unit);
                }
                stop.extend(self.units_commanded(|kind| *kind == CommandKind::Attack(unit)));
            }
        }

        for event in events {
            if let Event::Exhausted { node } = *event {
                stop.extend(self.units_commanded(|kind| *kind == CommandKind::Gather(node)));
            }
        }

        for unit in stop {
            if let Some(entry) = self.entries.get_mut(&unit) {
                if entry.take().is_some() {
                    summary.orphaned += 1;
                }
            }
        }
        for unit in remove {
            if self.entries.remove(&unit).is_some() {
                summary.removed += 1;
            }
        }

        for event in events {
            let Event::Feedback {
                unit,
                owner: o,
                seq,
                status,
            } = *event
            else {
                continue;
            };
            if o != owner || !status.is_terminal() {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(&unit) {
                if entry.is_some_and(|cmd| cmd.seq == seq) {
                    *entry = None;
                    summary.completed += 1;
                }
            }
        }

        summary
    }

    fn units_commanded(&self, pred: impl Fn(&CommandKind) -> bool) -> Vec<UnitId> {
        self.entries
            .iter()
            .filter(|(_, cmd)| cmd.is_some_and(|c| pred(&c.kind)))
            .map(|(unit, _)| *unit)
            .collect()
    }
}
