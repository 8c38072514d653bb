//! Error types for the controller core.

use thiserror::Error;

use crate::world::{GridPos, UnitId};

/// Result type alias using [`AgentError`].
pub type Result<T> = std::result::Result<T, AgentError>;

/// Top-level error type for controller and planner failures.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The planner exhausted the open set without reaching the goal.
    #[error("No path from {start} to {goal}")]
    NoPath {
        /// Cell the search started from.
        start: GridPos,
        /// Cell the search was trying to reach.
        goal: GridPos,
    },

    /// A cell handed to the planner lies outside the grid.
    #[error("Cell {0} is outside the grid")]
    OutOfBounds(GridPos),

    /// A waypoint is not one step away from the unit's position.
    #[error("Waypoint {to} is not a single step from {from}")]
    InvalidStep {
        /// Where the unit currently stands.
        from: GridPos,
        /// The waypoint it was asked to move to.
        to: GridPos,
    },

    /// A unit the controller depends on is not in the snapshot.
    #[error("Unit not found: {0}")]
    MissingUnit(UnitId),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file parsing error.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
