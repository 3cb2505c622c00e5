//! Run configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::kb::Bounds;

/// Settings of the agent itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Grid size `(width, height)` when known in advance. Without it the
    /// edges are learned from bumps.
    pub grid_size: Option<(i32, i32)>,
}

impl AgentConfig {
    pub fn bounds(&self) -> Bounds {
        match self.grid_size {
            Some((w, h)) => Bounds::sized(w, h),
            None => Bounds::default(),
        }
    }
}

/// Settings of the simulated world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub pit_probability: f64,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            pit_probability: 0.1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub world: WorldConfig,
    pub episodes: usize,
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            world: WorldConfig::default(),
            episodes: 1,
            max_steps: 100,
        }
    }
}

impl RunConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
