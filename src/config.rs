//! Game configuration.

use crate::error::{Result, SolverError};
use crate::types::{board_cells, MAX_CELLS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Board size, mine count and an optional seed for reproducible games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let Some(total) = board_cells(self.height, self.width) else {
            return Err(SolverError::InvalidConfig(format!(
                "board must have between 1 and {} cells, got {}x{}",
                MAX_CELLS, self.height, self.width
            )));
        };
        if self.mines > total {
            return Err(SolverError::InvalidConfig(format!(
                "{} mines do not fit on a {}x{} board",
                self.mines, self.height, self.width
            )));
        }
        Ok(())
    }
}
