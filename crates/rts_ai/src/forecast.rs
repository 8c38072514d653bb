//! Resource forecasting.
//!
//! Counts gold and wood that is on its way to the bank: a worker with a
//! gather command in flight is credited a full trip's yield for the node it
//! is gathering from, and any other worker is credited whatever it carries.
//! Build decisions use `bank + forecast` so they do not stall waiting for
//! resources that are already en route.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::commands::CommandKind;
use crate::ledger::CommandLedger;
use crate::world::{Bank, PlayerId, ResourceKind, UnitKind, WorldState};

/// Amount credited per in-flight gather command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherYield {
    /// Gold credited for a worker gathering from a gold mine.
    pub gold: u32,
    /// Wood credited for a worker gathering from a tree.
    pub wood: u32,
}

impl GatherYield {
    /// Yield for the given resource.
    #[must_use]
    pub const fn of(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Wood => self.wood,
        }
    }
}

impl Default for GatherYield {
    fn default() -> Self {
        Self {
            gold: 100,
            wood: 100,
        }
    }
}

/// Resources expected to arrive in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Forecast {
    /// Incoming gold.
    pub gold: u32,
    /// Incoming wood.
    pub wood: u32,
}

impl Forecast {
    /// Incoming amount of the given resource.
    #[must_use]
    pub const fn incoming(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Wood => self.wood,
        }
    }

    /// Banked plus incoming amount of the given resource.
    #[must_use]
    pub const fn projected(&self, bank: Bank, kind: ResourceKind) -> u32 {
        bank.amount(kind).saturating_add(self.incoming(kind))
    }

    fn credit(&mut self, kind: ResourceKind, amount: u32) {
        match kind {
            ResourceKind::Gold => self.gold = self.gold.saturating_add(amount),
            ResourceKind::Wood => self.wood = self.wood.saturating_add(amount),
        }
    }
}

/// Compute incoming gold and wood for `owner`'s workers.
#[must_use]
pub fn forecast(
    state: &WorldState,
    ledger: &CommandLedger,
    owner: PlayerId,
    yields: GatherYield,
) -> Forecast {
    let mut incoming = Forecast::default();

    for worker in state.own_of_kind(owner, UnitKind::Worker) {
        let gathering = ledger.in_flight(worker.id).and_then(|cmd| match cmd.kind {
            CommandKind::Gather(node) => Some(node),
            _ => None,
        });

        if let Some(node_id) = gathering {
            match state.resource_node(node_id) {
                Some(node) => incoming.credit(node.kind, yields.of(node.kind)),
                None => trace!(worker = worker.id, node = node_id, "gather target gone"),
            }
        } else if let Some(cargo) = worker.cargo {
            incoming.credit(cargo.kind, cargo.amount);
        }
    }

    incoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Cargo, GridExtent, GridPos, ResourceNodeView, UnitView};

    fn worker(id: u32, cargo: Option<Cargo>) -> UnitView {
        UnitView {
            id,
            owner: 0,
            kind: UnitKind::Worker,
            position: GridPos::new(0, 0),
            cargo,
        }
    }

    fn node(id: u32, kind: ResourceKind) -> ResourceNodeView {
        ResourceNodeView {
            id,
            kind,
            position: GridPos::new(5, 5),
            remaining: 1000,
        }
    }

    #[test]
    fn test_gather_credit_uses_node_kind_not_cargo() {
        let mut state = WorldState::new(0, GridExtent::new(10, 10));
        state.units.push(worker(
            1,
            Some(Cargo {
                kind: ResourceKind::Wood,
                amount: 30,
            }),
        ));
        state.resource_nodes.push(node(10, ResourceKind::Gold));

        let mut ledger = CommandLedger::new();
        ledger.track(1);
        ledger.issue(1, CommandKind::Gather(10));

        let f = forecast(&state, &ledger, 0, GatherYield::default());
        assert_eq!(f, Forecast { gold: 100, wood: 0 });
    }

    #[test]
    fn test_idle_carriers_credit_their_cargo() {
        let mut state = WorldState::new(0, GridExtent::new(10, 10));
        state.units.push(worker(
            1,
            Some(Cargo {
                kind: ResourceKind::Gold,
                amount: 25,
            }),
        ));
        state.units.push(worker(
            2,
            Some(Cargo {
                kind: ResourceKind::Wood,
                amount: 20,
            }),
        ));
        state.units.push(worker(3, None));

        let mut ledger = CommandLedger::new();
        for id in 1..=3 {
            ledger.track(id);
        }
        // A deposit in flight still counts as carrying.
        ledger.issue(2, CommandKind::Deposit(99));

        let f = forecast(&state, &ledger, 0, GatherYield { gold: 7, wood: 9 });
        assert_eq!(f, Forecast { gold: 25, wood: 20 });
    }

    #[test]
    fn test_vanished_node_credits_nothing() {
        let mut state = WorldState::new(0, GridExtent::new(10, 10));
        state.units.push(worker(1, None));
        let mut ledger = CommandLedger::new();
        ledger.track(1);
        ledger.issue(1, CommandKind::Gather(404));

        assert_eq!(
            forecast(&state, &ledger, 0, GatherYield::default()),
            Forecast::default()
        );
    }

    #[test]
    fn test_enemy_workers_are_not_counted() {
        let mut state = WorldState::new(0, GridExtent::new(10, 10));
        let mut enemy = worker(
            1,
            Some(Cargo {
                kind: ResourceKind::Gold,
                amount: 50,
            }),
        );
        enemy.owner = 1;
        state.units.push(enemy);

        let ledger = CommandLedger::new();
        assert_eq!(
            forecast(&state, &ledger, 0, GatherYield::default()),
            Forecast::default()
        );
    }

    #[test]
    fn test_projected_adds_bank() {
        let f = Forecast { gold: 100, wood: 50 };
        let bank = Bank::new(20, 5);
        assert_eq!(f.projected(bank, ResourceKind::Gold), 120);
        assert_eq!(f.projected(bank, ResourceKind::Wood), 55);
    }
}
