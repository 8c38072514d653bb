//! Per-tick controller contract.
//!
//! The host calls [`Controller::on_start`] once and then
//! [`Controller::on_tick`] every tick it schedules the controller, blocking
//! until each call returns. Both receive the current snapshot and the full
//! event log; a controller tracks which ticks it has already read.
//!
//! A unit missing from the returned [`CommandMap`] gets no new command. That
//! never cancels a command already running.

mod economy;
mod search;

use std::io::{Read, Write};

pub use economy::EconomyController;
pub use search::{SearchController, SearchPhase};

use crate::commands::CommandMap;
use crate::error::Result;
use crate::events::EventLog;
use crate::world::WorldState;

/// A decision-making agent driven by the host's tick loop.
pub trait Controller {
    /// Initialise from the first snapshot and return the first commands.
    fn on_start(&mut self, state: &WorldState, log: &EventLog) -> CommandMap;

    /// Reconcile everything since the previous call and return new commands.
    fn on_tick(&mut self, state: &WorldState, log: &EventLog) -> CommandMap;

    /// Called once when the game ends.
    fn on_terminal(&mut self, _state: &WorldState, _log: &EventLog) {}

    /// Persist controller state. Nothing is persisted.
    fn save_state(&self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    /// Restore controller state. Nothing is restored.
    fn load_state(&mut self, _input: &mut dyn Read) -> Result<()> {
        Ok(())
    }
}
