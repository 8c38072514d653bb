//! Fixed linear build order.
//!
//! A [`BuildOrder`] walks a list of [`ProductionGoal`]s front to back. While a
//! goal is current, one production or construction command is issued per
//! tick once the goal is affordable and nothing toward it is already in
//! flight. The goal is left behind as soon as enough units of its kind exist,
//! however they came to be. The index only ever moves forward.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::commands::{CommandKind, IssuedCommand};
use crate::ledger::CommandLedger;
use crate::world::{Bank, PlayerId, ResourceKind, UnitId, UnitKind, WorldState};

/// One step of the build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionGoal {
    /// Unit or structure to create.
    pub target: UnitKind,
    /// Gold cost of one unit.
    pub gold: u32,
    /// Wood cost of one unit.
    pub wood: u32,
    /// Goal is complete once at least this many own units of `target` exist.
    pub until: usize,
}

impl ProductionGoal {
    /// Create a new goal.
    #[must_use]
    pub const fn new(target: UnitKind, gold: u32, wood: u32, until: usize) -> Self {
        Self {
            target,
            gold,
            wood,
            until,
        }
    }

    /// Cost as a bank amount.
    #[must_use]
    pub const fn cost(&self) -> Bank {
        Bank::new(self.gold, self.wood)
    }

    /// Check if `funds` covers the cost.
    #[must_use]
    pub const fn is_affordable(&self, funds: Bank) -> bool {
        funds.gold >= self.gold && funds.wood >= self.wood
    }

    /// Check the advance condition against the snapshot.
    #[must_use]
    pub fn is_complete(&self, state: &WorldState, owner: PlayerId) -> bool {
        state.count_of_kind(owner, self.target) >= self.until
    }
}

/// Placement offsets from the primary base, per structure kind.
pub type Placements = BTreeMap<UnitKind, (i32, i32)>;

/// Progress through a fixed list of goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    goals: Vec<ProductionGoal>,
    current: usize,
}

impl BuildOrder {
    /// Start at the first goal.
    #[must_use]
    pub fn new(goals: Vec<ProductionGoal>) -> Self {
        Self { goals, current: 0 }
    }

    /// Index of the current goal. Equal to the goal count once done.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.current
    }

    /// The current goal, or `None` once every goal is met.
    #[must_use]
    pub fn current(&self) -> Option<&ProductionGoal> {
        self.goals.get(self.current)
    }

    /// Check if the build order has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.current >= self.goals.len()
    }

    /// Resource amounts the gatherers should aim for.
    ///
    /// Zero once the build order is done.
    #[must_use]
    pub fn collection_target(&self) -> Bank {
        self.current().map(ProductionGoal::cost).unwrap_or_default()
    }

    /// Resource amount of a single kind the gatherers should aim for.
    #[must_use]
    pub fn target_amount(&self, kind: ResourceKind) -> u32 {
        self.collection_target().amount(kind)
    }

    /// Move to the next goal if the current one is complete.
    ///
    /// Advances at most one step. Returns `true` if it advanced.
    pub fn advance_if_complete(&mut self, state: &WorldState, owner: PlayerId) -> bool {
        let Some(goal) = self.current() else {
            return false;
        };
        if !goal.is_complete(state, owner) {
            return false;
        }
        let finished = goal.target;
        self.current += 1;
        match self.current() {
            Some(next) => info!(?finished, next = ?next.target, "build order advanced"),
            None => info!(?finished, "build order complete"),
        }
        true
    }

    /// Issue at most one command toward the current goal.
    ///
    /// `funds` is whatever the caller counts as spendable. `builders` are
    /// workers free for construction, in preference order.
    pub fn issue_next(
        &self,
        state: &WorldState,
        owner: PlayerId,
        ledger: &mut CommandLedger,
        funds: Bank,
        builders: &[UnitId],
        placements: &Placements,
    ) -> Option<(UnitId, IssuedCommand)> {
        let goal = self.current()?;
        if !goal.is_affordable(funds) {
            return None;
        }

        let pending = ledger
            .in_flight_commands()
            .values()
            .any(|cmd| cmd.kind.produces() == Some(goal.target));
        if pending {
            return None;
        }

        let (producer, kind) = if goal.target.is_structure() {
            let builder = *builders.first()?;
            let Some(&(dx, dy)) = placements.get(&goal.target) else {
                warn!(kind = ?goal.target, "no placement offset for structure");
                return None;
            };
            let Some(base) = state.first_of_kind(owner, UnitKind::TownHall) else {
                warn!(kind = ?goal.target, "no base to place structure near");
                return None;
            };
            let site = base.position.offset(dx, dy);
            (
                builder,
                CommandKind::Build {
                    kind: goal.target,
                    x: site.x,
                    y: site.y,
                },
            )
        } else {
            let producer = state
                .own_of_kind(owner, goal.target.producer())
                .map(|u| u.id)
                .find(|id| ledger.is_idle(*id))?;
            (producer, CommandKind::Produce(goal.target))
        };

        let command = ledger.issue(producer, kind)?;
        debug!(unit = producer, ?kind, seq = command.seq.0, "production issued");
        Some((producer, command))
    }
}
