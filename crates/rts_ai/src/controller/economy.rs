//! Build-order controller: gather, produce, fight.

use tracing::{debug, debug_span};

use crate::build_order::BuildOrder;
use crate::combat::dispatch_attacks;
use crate::commands::CommandMap;
use crate::config::EconomyConfig;
use crate::controller::Controller;
use crate::events::EventLog;
use crate::forecast::forecast;
use crate::gather::assign_workers;
use crate::ledger::CommandLedger;
use crate::world::{Bank, PlayerId, ResourceKind, Tick, WorldState};

/// Works through a fixed build order, then keeps gathering and fighting.
///
/// Each tick runs, in order: ledger reconciliation, resource forecast,
/// worker assignment, one build-order step, and combat dispatch. Only idle
/// ledger entries are ever given a new command.
#[derive(Debug, Clone)]
pub struct EconomyController {
    player: PlayerId,
    config: EconomyConfig,
    ledger: CommandLedger,
    build_order: BuildOrder,
    last_tick: Tick,
}

impl EconomyController {
    /// Create a controller for `player`.
    #[must_use]
    pub fn new(player: PlayerId, config: EconomyConfig) -> Self {
        let build_order = BuildOrder::new(config.build_order.clone());
        Self {
            player,
            config,
            ledger: CommandLedger::new(),
            build_order,
            last_tick: 0,
        }
    }

    /// The player this controller commands.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Current ledger contents.
    #[must_use]
    pub const fn ledger(&self) -> &CommandLedger {
        &self.ledger
    }

    /// Current build-order progress.
    #[must_use]
    pub const fn build_order(&self) -> &BuildOrder {
        &self.build_order
    }

    fn decide(&mut self, state: &WorldState) -> CommandMap {
        let _span = debug_span!("economy", player = self.player, turn = state.turn).entered();

        let bank = state.bank(self.player);
        let incoming = forecast(state, &self.ledger, self.player, self.config.gather_yield);
        let projected = Bank::new(
            incoming.projected(bank, ResourceKind::Gold),
            incoming.projected(bank, ResourceKind::Wood),
        );
        debug!(?bank, ?incoming, goal = self.build_order.index(), "tick");

        let mut issued = CommandMap::new();

        let target = self.build_order.collection_target();
        let assignment = assign_workers(state, self.player, &mut self.ledger, projected, target);
        issued.extend(assignment.issued);

        let funds = if self.config.forecast_covers_cost {
            projected
        } else {
            bank
        };
        if let Some((unit, command)) = self.build_order.issue_next(
            state,
            self.player,
            &mut self.ledger,
            funds,
            &assignment.builders,
            &self.config.placements,
        ) {
            issued.insert(unit, command);
        }
        self.build_order.advance_if_complete(state, self.player);

        issued.extend(dispatch_attacks(state, self.player, &mut self.ledger));

        if self.config.resend_in_flight {
            self.ledger.in_flight_commands()
        } else {
            issued
        }
    }
}

impl Controller for EconomyController {
    fn on_start(&mut self, state: &WorldState, _log: &EventLog) -> CommandMap {
        for unit in state.units_of(self.player) {
            self.ledger.track(unit.id);
        }
        self.last_tick = state.turn;
        self.decide(state)
    }

    fn on_tick(&mut self, state: &WorldState, log: &EventLog) -> CommandMap {
        let summary = self
            .ledger
            .reconcile(log, self.last_tick, state.turn, self.player);
        if !summary.is_empty() {
            debug!(?summary, from = self.last_tick, to = state.turn, "events reconciled");
        }
        self.last_tick = self.last_tick.max(state.turn);
        self.decide(state)
    }
}
