//! Step-by-step path following.
//!
//! A [`PathFollower`] owns a precomputed path and hands out one move per
//! tick. Once the path runs out it switches to [`FollowState::Arrived`] for
//! good and attacks its destination unit every tick from then on. It never
//! replans, even if the unit gets pushed off the path.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commands::{CommandKind, Direction};
use crate::error::{AgentError, Result};
use crate::world::{GridPos, UnitId};

/// Where the follower is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowState {
    /// Waypoints remain.
    Following,
    /// Path consumed; attacking the destination.
    Arrived,
}

/// Consumes a path one waypoint per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFollower {
    path: VecDeque<GridPos>,
    destination: UnitId,
}

impl PathFollower {
    /// Follow `path`, then attack `destination`.
    #[must_use]
    pub fn new(path: Vec<GridPos>, destination: UnitId) -> Self {
        Self {
            path: path.into(),
            destination,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FollowState {
        if self.path.is_empty() {
            FollowState::Arrived
        } else {
            FollowState::Following
        }
    }

    /// Waypoints not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    /// The unit attacked on arrival.
    #[must_use]
    pub const fn destination(&self) -> UnitId {
        self.destination
    }

    /// Produce this tick's command for a unit standing on `current`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidStep`] if the next waypoint is not one of
    /// the eight neighbours of `current`. The waypoint is consumed either way.
    pub fn next_command(&mut self, current: GridPos) -> Result<CommandKind> {
        let Some(waypoint) = self.path.pop_front() else {
            return Ok(CommandKind::Attack(self.destination));
        };

        let direction = Direction::between(current, waypoint).ok_or(AgentError::InvalidStep {
            from: current,
            to: waypoint,
        })?;

        if self.path.is_empty() {
            info!(destination = self.destination, "final waypoint handed out");
        }
        Ok(CommandKind::MoveStep(direction))
    }
}
