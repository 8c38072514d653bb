//! Gather and deposit assignment for idle workers.

use tracing::{debug, warn};

use crate::commands::{CommandKind, IssuedCommand};
use crate::ledger::CommandLedger;
use crate::world::{Bank, PlayerId, ResourceKind, UnitId, UnitKind, WorldState};

/// Resource priority: wood is topped up before gold.
const PRIORITY: [ResourceKind; 2] = [ResourceKind::Wood, ResourceKind::Gold];

/// Result of one assignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherAssignment {
    /// Commands issued this pass.
    pub issued: Vec<(UnitId, IssuedCommand)>,
    /// Idle, empty-handed workers with nothing to gather, in host order.
    pub builders: Vec<UnitId>,
}

/// Give every idle worker something to do.
///
/// Carriers deposit at the primary base. Empty-handed workers gather the
/// first node of the first resource whose `projected` amount is below
/// `target`. Workers left over are returned as available builders.
pub fn assign_workers(
    state: &WorldState,
    owner: PlayerId,
    ledger: &mut CommandLedger,
    projected: Bank,
    target: Bank,
) -> GatherAssignment {
    let mut out = GatherAssignment::default();
    let base = state.first_of_kind(owner, UnitKind::TownHall).map(|b| b.id);

    let needed = PRIORITY.into_iter().find_map(|kind| {
        if projected.amount(kind) >= target.amount(kind) {
            return None;
        }
        state.nodes_of_kind(kind).next().map(|node| node.id)
    });

    for worker in state.own_of_kind(owner, UnitKind::Worker) {
        if !ledger.is_idle(worker.id) {
            continue;
        }

        let kind = if worker.cargo_amount() > 0 {
            let Some(base) = base else {
                warn!(worker = worker.id, "no base to deposit at");
                continue;
            };
            CommandKind::Deposit(base)
        } else if let Some(node) = needed {
            CommandKind::Gather(node)
        } else {
            out.builders.push(worker.id);
            continue;
        };

        if let Some(command) = ledger.issue(worker.id, kind) {
            debug!(worker = worker.id, ?kind, seq = command.seq.0, "worker assigned");
            out.issued.push((worker.id, command));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Cargo, GridExtent, GridPos, ResourceNodeView, UnitView};

    const ME: PlayerId = 0;

    fn state_with_nodes() -> WorldState {
        let mut state = WorldState::new(0, GridExtent::new(20, 20));
        state.units.push(UnitView {
            id: 1,
            owner: ME,
            kind: UnitKind::TownHall,
            position: GridPos::new(5, 5),
            cargo: None,
        });
        for (id, kind) in [
            (10, ResourceKind::Gold),
            (11, ResourceKind::Wood),
            (12, ResourceKind::Wood),
        ] {
            state.resource_nodes.push(ResourceNodeView {
                id,
                kind,
                position: GridPos::new(id as i32, 0),
                remaining: 500,
            });
        }
        state
    }

    fn add_worker(
        state: &mut WorldState,
        ledger: &mut CommandLedger,
        id: UnitId,
        cargo: Option<Cargo>,
    ) {
        state.units.push(UnitView {
            id,
            owner: ME,
            kind: UnitKind::Worker,
            position: GridPos::new(4, 4),
            cargo,
        });
        ledger.track(id);
    }

    #[test]
    fn test_wood_before_gold() {
        let mut state = state_with_nodes();
        let mut ledger = CommandLedger::new();
        add_worker(&mut state, &mut ledger, 2, None);

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(0, 0), Bank::new(500, 250));
        assert_eq!(out.issued.len(), 1);
        assert_eq!(out.issued[0].1.kind, CommandKind::Gather(11));
    }

    #[test]
    fn test_gold_when_wood_is_covered() {
        let mut state = state_with_nodes();
        let mut ledger = CommandLedger::new();
        add_worker(&mut state, &mut ledger, 2, None);

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(0, 250), Bank::new(500, 250));
        assert_eq!(out.issued[0].1.kind, CommandKind::Gather(10));
    }

    #[test]
    fn test_missing_node_type_falls_through() {
        let mut state = state_with_nodes();
        state.resource_nodes.retain(|n| n.kind == ResourceKind::Gold);
        let mut ledger = CommandLedger::new();
        add_worker(&mut state, &mut ledger, 2, None);

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(0, 0), Bank::new(100, 100));
        assert_eq!(out.issued[0].1.kind, CommandKind::Gather(10));
    }

    #[test]
    fn test_satisfied_workers_become_builders() {
        let mut state = state_with_nodes();
        let mut ledger = CommandLedger::new();
        add_worker(&mut state, &mut ledger, 2, None);
        add_worker(&mut state, &mut ledger, 3, None);

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(600, 300), Bank::new(500, 250));
        assert!(out.issued.is_empty());
        assert_eq!(out.builders, vec![2, 3]);
        assert!(ledger.is_idle(2));
    }

    #[test]
    fn test_carriers_deposit_at_base() {
        let mut state = state_with_nodes();
        let mut ledger = CommandLedger::new();
        add_worker(
            &mut state,
            &mut ledger,
            2,
            Some(Cargo {
                kind: ResourceKind::Gold,
                amount: 100,
            }),
        );

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(0, 0), Bank::default());
        assert_eq!(out.issued[0].1.kind, CommandKind::Deposit(1));
        assert!(out.builders.is_empty());
    }

    #[test]
    fn test_busy_workers_are_skipped() {
        let mut state = state_with_nodes();
        let mut ledger = CommandLedger::new();
        add_worker(&mut state, &mut ledger, 2, None);
        ledger.issue(2, CommandKind::Gather(10));

        let out = assign_workers(&state, ME, &mut ledger, Bank::new(0, 0), Bank::new(500, 0));
        assert!(out.issued.is_empty());
        assert!(out.builders.is_empty());
    }
}
