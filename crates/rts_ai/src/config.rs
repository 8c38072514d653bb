//! Controller configuration loaded from RON.
//!
//! Every field has a default matching the stock scenario, so a config file
//! only needs to name what it changes.
//!
//! ```
//! use rts_ai::config::AgentConfig;
//!
//! let config = AgentConfig::from_ron_str("(economy: (resend_in_flight: true))").unwrap();
//! assert!(config.economy.resend_in_flight);
//! assert_eq!(config.economy.build_order.len(), 4);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::build_order::{Placements, ProductionGoal};
use crate::error::{AgentError, Result};
use crate::forecast::GatherYield;
use crate::world::{ResourceKind, UnitKind};

/// Top-level configuration for both controllers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Settings for the economy controller.
    pub economy: EconomyConfig,
    /// Settings for the search controller.
    pub search: SearchConfig,
}

impl AgentConfig {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Check both sections.
    pub fn validate(&self) -> Result<()> {
        self.economy.validate()
    }
}

/// Settings for the build-order controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Amount credited per in-flight gather command.
    pub gather_yield: GatherYield,
    /// Goals in the order they are pursued.
    pub build_order: Vec<ProductionGoal>,
    /// Structure placement offsets from the primary base.
    pub placements: Placements,
    /// Count incoming resources toward goal cost, not just the bank.
    pub forecast_covers_cost: bool,
    /// Return every in-flight command each tick instead of only new ones.
    pub resend_in_flight: bool,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            gather_yield: GatherYield::default(),
            build_order: vec![
                ProductionGoal::new(UnitKind::Worker, 400, 0, 3),
                ProductionGoal::new(UnitKind::Farm, 500, 250, 1),
                ProductionGoal::new(UnitKind::Barracks, 700, 400, 1),
                ProductionGoal::new(UnitKind::Footman, 600, 0, 2),
            ],
            placements: [(UnitKind::Farm, (3, 0)), (UnitKind::Barracks, (-3, 0))]
                .into_iter()
                .collect(),
            forecast_covers_cost: true,
            resend_in_flight: false,
        }
    }
}

impl EconomyConfig {
    /// Reject build orders that could never run.
    pub fn validate(&self) -> Result<()> {
        if self.build_order.is_empty() {
            return Err(AgentError::InvalidConfig("build order is empty".into()));
        }
        for (i, goal) in self.build_order.iter().enumerate() {
            if goal.until == 0 {
                return Err(AgentError::InvalidConfig(format!(
                    "goal {i} ({:?}) requires zero units",
                    goal.target
                )));
            }
            if goal.target.is_structure() && !self.placements.contains_key(&goal.target) {
                return Err(AgentError::InvalidConfig(format!(
                    "goal {i} builds {:?} but has no placement offset",
                    goal.target
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the pathfinding controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Kind of own unit that walks the path.
    pub mover: UnitKind,
    /// Kind of unit walked to and attacked.
    pub destination: UnitKind,
    /// Resource nodes whose cells block movement.
    pub obstacle_kinds: Vec<ResourceKind>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mover: UnitKind::Footman,
            destination: UnitKind::TownHall,
            obstacle_kinds: vec![ResourceKind::Wood],
        }
    }
}
