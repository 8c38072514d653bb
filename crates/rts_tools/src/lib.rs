//! # RTS Development Tools
//!
//! Command-line tools for development:
//! - Planner runner over RON grid scenarios
//! - Controller config checker

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod scenario;

use thiserror::Error;

/// Errors surfaced by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Planner, config or file failure from the core crate.
    #[error(transparent)]
    Agent(#[from] rts_ai::error::AgentError),

    /// JSON output failed.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;
