//! Pathfinding controller: walk to a target and attack it.

use tracing::{debug, error, info};

use crate::commands::{CommandMap, CommandSequencer};
use crate::config::SearchConfig;
use crate::controller::Controller;
use crate::error::AgentError;
use crate::events::EventLog;
use crate::follower::PathFollower;
use crate::pathfinding::{plan, ObstacleSet};
use crate::world::{PlayerId, UnitId, WorldState};

/// Lifecycle of a [`SearchController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    /// `on_start` has not run yet.
    Pending,
    /// Path planned; moving or attacking.
    Walking {
        /// The unit being moved.
        mover: UnitId,
        /// Remaining path and destination.
        follower: PathFollower,
    },
    /// Nothing sensible left to do. Permanent.
    Halted,
}

/// Plans one static path at start-up, walks it, then attacks.
#[derive(Debug, Clone)]
pub struct SearchController {
    player: PlayerId,
    config: SearchConfig,
    sequencer: CommandSequencer,
    phase: SearchPhase,
}

impl SearchController {
    /// Create a controller for `player`.
    #[must_use]
    pub fn new(player: PlayerId, config: SearchConfig) -> Self {
        Self {
            player,
            config,
            sequencer: CommandSequencer::new(),
            phase: SearchPhase::Pending,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Check if the controller gave up.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        matches!(self.phase, SearchPhase::Halted)
    }

    fn setup(&self, state: &WorldState) -> Option<SearchPhase> {
        let Some(mover) = state.first_of_kind(self.player, self.config.mover) else {
            error!(kind = ?self.config.mover, "no unit to move");
            return None;
        };

        let destination = state
            .enemies_of(self.player)
            .find(|u| u.kind == self.config.destination)
            .or_else(|| {
                state
                    .units
                    .iter()
                    .find(|u| u.kind == self.config.destination && u.id != mover.id)
            });
        let Some(destination) = destination else {
            error!(kind = ?self.config.destination, "no destination unit");
            return None;
        };

        let obstacles: ObstacleSet = state
            .resource_nodes
            .iter()
            .filter(|n| self.config.obstacle_kinds.contains(&n.kind))
            .map(|n| n.position)
            .collect();

        match plan(mover.position, destination.position, &obstacles, state.extent) {
            Ok(path) => {
                info!(
                    mover = mover.id,
                    destination = destination.id,
                    steps = path.len(),
                    "path planned"
                );
                Some(SearchPhase::Walking {
                    mover: mover.id,
                    follower: PathFollower::new(path, destination.id),
                })
            }
            Err(e) => {
                error!(error = %e, "no valid path; halting");
                None
            }
        }
    }
}

impl Controller for SearchController {
    fn on_start(&mut self, state: &WorldState, log: &EventLog) -> CommandMap {
        self.phase = self.setup(state).unwrap_or(SearchPhase::Halted);
        self.on_tick(state, log)
    }

    fn on_tick(&mut self, state: &WorldState, _log: &EventLog) -> CommandMap {
        let mut commands = CommandMap::new();

        let SearchPhase::Walking { mover, follower } = &mut self.phase else {
            return commands;
        };
        let mover = *mover;
        let unit = match state.unit(mover).ok_or(AgentError::MissingUnit(mover)) {
            Ok(unit) => unit,
            Err(e) => {
                debug!(error = %e, "mover absent this tick");
                return commands;
            }
        };

        match follower.next_command(unit.position) {
            Ok(kind) => {
                commands.insert(mover, self.sequencer.issue(kind));
            }
            Err(e) => {
                error!(error = %e, mover, "left the planned path; halting");
                self.phase = SearchPhase::Halted;
            }
        }
        commands
    }
}
