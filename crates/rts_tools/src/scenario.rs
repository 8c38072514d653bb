//! Grid scenarios for exercising the planner from the command line.

use std::path::Path;

use rts_ai::error::AgentError;
use rts_ai::pathfinding::{path_cost, plan, render_ascii, ObstacleSet};
use rts_ai::world::{GridExtent, GridPos};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Result;

/// A map, two endpoints and the blocked cells between them.
///
/// ```ron
/// (
///     width: 8,
///     height: 6,
///     start: (x: 0, y: 0),
///     goal: (x: 7, y: 0),
///     obstacles: [(x: 4, y: 0)],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridScenario {
    /// Map width in cells.
    pub width: i32,
    /// Map height in cells.
    pub height: i32,
    /// Where the walk starts.
    pub start: GridPos,
    /// Where the walk ends.
    pub goal: GridPos,
    /// Blocked cells.
    #[serde(default)]
    pub obstacles: Vec<GridPos>,
}

impl GridScenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(AgentError::from)?;
        let scenario = Self::from_ron_str(&contents)?;
        debug!(path = %path.display(), obstacles = scenario.obstacles.len(), "scenario loaded");
        Ok(scenario)
    }

    /// Parse a scenario from a RON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid scenario.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron)
            .map_err(AgentError::from)
            .map_err(Into::into)
    }

    /// Map size.
    #[must_use]
    pub const fn extent(&self) -> GridExtent {
        GridExtent::new(self.width, self.height)
    }

    /// Blocked cells as a planner obstacle set.
    #[must_use]
    pub fn obstacle_set(&self) -> ObstacleSet {
        self.obstacles.iter().copied().collect()
    }
}

/// Outcome of planning one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    /// Start cell.
    pub start: GridPos,
    /// Goal cell.
    pub goal: GridPos,
    /// Number of single-cell steps.
    pub steps: usize,
    /// Weighted path cost.
    pub cost: u64,
    /// Cells walked, excluding the start.
    pub path: Vec<GridPos>,
}

impl PlanReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// ASCII rendering of the path over the scenario's map.
    #[must_use]
    pub fn render(&self, scenario: &GridScenario) -> String {
        render_ascii(
            scenario.extent(),
            &scenario.obstacle_set(),
            self.start,
            self.goal,
            &self.path,
        )
    }
}

/// Plan a path through a scenario.
///
/// # Errors
///
/// Returns the planner's error when either endpoint is off the map or the
/// goal cannot be reached.
pub fn run_plan(scenario: &GridScenario) -> Result<PlanReport> {
    let path = plan(
        scenario.start,
        scenario.goal,
        &scenario.obstacle_set(),
        scenario.extent(),
    )?;
    let cost = path_cost(scenario.start, &path);
    info!(steps = path.len(), cost, "path found");

    Ok(PlanReport {
        start: scenario.start,
        goal: scenario.goal,
        steps: path.len(),
        cost,
        path,
    })
}
