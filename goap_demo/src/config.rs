//! Scenario configuration - goals, catalog and planner settings for a run.

use clap::ValueEnum;
use goal_model::{ActionCatalog, GoalState};
use goap_planner::{SignificantEffect, SwitchPolicy, DEFAULT_LOOKAHEAD_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const CATEGORIZED_SCENARIO: &str = include_str!("../scenarios/categorized.toml");
const LOOKAHEAD_SCENARIO: &str = include_str!("../scenarios/lookahead.json");

/// Errors raised while loading a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported scenario format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which planner drives the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlannerMode {
    Categorized {
        #[serde(default)]
        switch_policy: SwitchPolicy,
    },
    Lookahead {
        #[serde(default = "default_depth")]
        depth: usize,
    },
}

fn default_depth() -> usize {
    DEFAULT_LOOKAHEAD_DEPTH
}

fn default_max_ticks() -> u32 {
    100
}

/// The entity on the receiving end of significant effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentConfig {
    pub name: String,
    pub health: i32,
}

/// Scenarios bundled with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Builtin {
    /// Two cover stances with three actions each, against a 20 HP enemy.
    Categorized,
    /// Three flat actions planned five steps ahead.
    Lookahead,
}

/// Everything the driver needs to run one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,

    pub goals: GoalState,

    pub catalog: ActionCatalog,

    pub planner: PlannerMode,

    #[serde(default)]
    pub opponent: Option<OpponentConfig>,

    /// Effects reported to the opponent when committed.
    #[serde(default)]
    pub significant_effects: Vec<SignificantEffect>,

    /// Upper bound on ticks. Runs without an opponent always use all of them.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

impl ScenarioConfig {
    /// Load a bundled scenario.
    pub fn builtin(builtin: Builtin) -> Result<Self> {
        match builtin {
            Builtin::Categorized => Self::from_toml_str(CATEGORIZED_SCENARIO),
            Builtin::Lookahead => Self::from_json_str(LOOKAHEAD_SCENARIO),
        }
    }

    /// Load a scenario file, picking the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Apply `GOAP_LOOKAHEAD_DEPTH` and `GOAP_MAX_TICKS` from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Some(depth) = read_env::<usize>("GOAP_LOOKAHEAD_DEPTH") {
            self.set_depth(depth);
        }

        if let Some(max_ticks) = read_env::<u32>("GOAP_MAX_TICKS") {
            self.max_ticks = max_ticks;
        }
    }

    /// Override the lookahead depth. Has no effect on categorised scenarios.
    pub fn set_depth(&mut self, new_depth: usize) {
        if let PlannerMode::Lookahead { depth } = &mut self.planner {
            *depth = new_depth;
        }
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring unparsable environment override");
            None
        }
    }
}
