//! Combat dispatch.
//!
//! Every idle combat unit is sent after the first visible enemy in snapshot
//! order, not ranked by distance or health. An attacker keeps its target
//! until the attack finishes or the target dies.

use tracing::debug;

use crate::commands::{CommandKind, IssuedCommand};
use crate::ledger::CommandLedger;
use crate::world::{PlayerId, UnitId, WorldState};

/// Pick the enemy every idle attacker will be sent after.
#[must_use]
pub fn select_target(state: &WorldState, owner: PlayerId) -> Option<UnitId> {
    state.enemies_of(owner).next().map(|u| u.id)
}

/// Order idle combat units to attack the selected enemy.
pub fn dispatch_attacks(
    state: &WorldState,
    owner: PlayerId,
    ledger: &mut CommandLedger,
) -> Vec<(UnitId, IssuedCommand)> {
    let Some(target) = select_target(state, owner) else {
        return Vec::new();
    };

    let mut issued = Vec::new();
    for unit in state.units_of(owner).filter(|u| u.kind.is_combat()) {
        if let Some(command) = ledger.issue(unit.id, CommandKind::Attack(target)) {
            debug!(unit = unit.id, target, seq = command.seq.0, "attack issued");
            issued.push((unit.id, command));
        }
    }
    issued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridExtent, GridPos, UnitKind, UnitView};

    fn unit(id: UnitId, owner: PlayerId, kind: UnitKind, x: i32) -> UnitView {
        UnitView {
            id,
            owner,
            kind,
            position: GridPos::new(x, 0),
            cargo: None,
        }
    }

    #[test]
    fn test_first_found_enemy_not_nearest() {
        let mut state = WorldState::new(0, GridExtent::new(30, 1));
        state.units.push(unit(1, 0, UnitKind::Footman, 0));
        state.units.push(unit(20, 1, UnitKind::TownHall, 25));
        state.units.push(unit(21, 1, UnitKind::Footman, 1));

        assert_eq!(select_target(&state, 0), Some(20));
    }

    #[test]
    fn test_only_idle_combat_units_attack() {
        let mut state = WorldState::new(0, GridExtent::new(30, 1));
        state.units.push(unit(1, 0, UnitKind::Footman, 0));
        state.units.push(unit(2, 0, UnitKind::Footman, 1));
        state.units.push(unit(3, 0, UnitKind::Worker, 2));
        state.units.push(unit(20, 1, UnitKind::Footman, 10));

        let mut ledger = CommandLedger::new();
        for id in [1, 2, 3] {
            ledger.track(id);
        }
        ledger.issue(2, CommandKind::Attack(99));

        let issued = dispatch_attacks(&state, 0, &mut ledger);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].0, 1);
        assert_eq!(issued[0].1.kind, CommandKind::Attack(20));
        assert!(ledger.is_idle(3));
    }

    #[test]
    fn test_no_enemies_no_orders() {
        let mut state = WorldState::new(0, GridExtent::new(30, 1));
        state.units.push(unit(1, 0, UnitKind::Footman, 0));
        let mut ledger = CommandLedger::new();
        ledger.track(1);

        assert!(dispatch_attacks(&state, 0, &mut ledger).is_empty());
        assert!(ledger.is_idle(1));
    }
}
