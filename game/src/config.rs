use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TICK_BUDGET: u32 = 500;
pub const DEFAULT_SPAWN_PERIOD: u32 = 10;
pub const DEFAULT_ENEMY_CAP: usize = 8;
pub const DEFAULT_FUSE_TICKS: u32 = 5;
pub const DEFAULT_STARTING_HEALTH: u32 = 3;
pub const DEFAULT_BLAST_RANGE: u32 = 2;
pub const DEFAULT_MAX_BOMBS: usize = 1;

/// Session rules. Every field has a default, so partial JSON files are fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub tick_budget: u32,
    pub spawn_period: u32,
    pub enemy_cap: usize,
    pub fuse_ticks: u32,
    pub starting_health: u32,
    pub starting_blast_range: u32,
    pub max_bombs: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_budget: DEFAULT_TICK_BUDGET,
            spawn_period: DEFAULT_SPAWN_PERIOD,
            enemy_cap: DEFAULT_ENEMY_CAP,
            fuse_ticks: DEFAULT_FUSE_TICKS,
            starting_health: DEFAULT_STARTING_HEALTH,
            starting_blast_range: DEFAULT_BLAST_RANGE,
            max_bombs: DEFAULT_MAX_BOMBS,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Periods, fuses, ranges and limits of zero would stall or break the rules.
    pub fn sanitized(mut self) -> Self {
        self.tick_budget = self.tick_budget.max(1);
        self.spawn_period = self.spawn_period.max(1);
        self.fuse_ticks = self.fuse_ticks.max(1);
        self.starting_blast_range = self.starting_blast_range.max(1);
        self.max_bombs = self.max_bombs.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Uses `BOMBER_CONFIG_PATH` when set; otherwise every load yields the defaults.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("BOMBER_CONFIG_PATH").map(PathBuf::from),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Missing or malformed files fall back to the defaults.
    pub fn load(&self) -> GameConfig {
        let Some(path) = &self.path else {
            return GameConfig::default();
        };
        let Ok(bytes) = fs::read(path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return GameConfig::default();
        };
        match serde_json::from_slice::<GameConfig>(&bytes) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring malformed config: {err}");
                GameConfig::default()
            }
        }
    }
}
