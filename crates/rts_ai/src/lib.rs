//! # RTS AI
//!
//! Per-tick decision core for scripted RTS controllers.
//!
//! The host simulation calls a [`Controller`](controller::Controller) once per
//! tick with a read-only [`WorldState`](world::WorldState) snapshot and the
//! event log, and gets back at most one command per unit. This crate contains
//! **only** the decision logic:
//! - No rendering
//! - No IO beyond loading configuration
//! - No randomness
//! - Deterministic iteration order everywhere
//!
//! ## Crate Structure
//!
//! - [`ledger`] - In-flight command tracking and event reconciliation
//! - [`forecast`] - Incoming resource estimation
//! - [`build_order`] - Fixed production goal state machine
//! - [`gather`] - Worker gather/deposit assignment
//! - [`combat`] - Attack dispatch for idle combat units
//! - [`pathfinding`] - A* grid planner
//! - [`follower`] - One-waypoint-per-tick path consumption
//! - [`controller`] - The two controllers built from the above

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod build_order;
pub mod combat;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod follower;
pub mod forecast;
pub mod gather;
pub mod ledger;
pub mod pathfinding;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::build_order::{BuildOrder, ProductionGoal};
    pub use crate::commands::{CommandKind, CommandMap, CommandSeq, Direction, IssuedCommand};
    pub use crate::config::{AgentConfig, EconomyConfig, SearchConfig};
    pub use crate::controller::{Controller, EconomyController, SearchController};
    pub use crate::error::{AgentError, Result};
    pub use crate::events::{Event, EventLog, FeedbackStatus};
    pub use crate::ledger::CommandLedger;
    pub use crate::pathfinding::{plan, ObstacleSet};
    pub use crate::world::{
        Bank, Cargo, GridExtent, GridPos, NodeId, PlayerId, ResourceKind, ResourceNodeView, Tick,
        UnitId, UnitKind, UnitView, WorldState,
    };
}
