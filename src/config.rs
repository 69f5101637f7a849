//! Layered engine configuration using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`GANTT_*` prefix, `__` separates nested keys)
//! 2. `gantt.toml` in the working directory
//! 3. Built-in defaults
//!
//! The configuration only shapes newly created tasks; the scheduling passes
//! take no tunables.
//!
//! ```no_run
//! use gantt_core::config::EngineConfig;
//! use gantt_core::engine::ScheduleEngine;
//!
//! let config = EngineConfig::load().expect("config");
//! let engine = ScheduleEngine::new(config);
//! ```

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::Health;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "gantt.toml";

/// Prefix for environment overrides, e.g. `GANTT_DEFAULT_DURATION_DAYS=3`.
pub const ENV_PREFIX: &str = "GANTT_";

/// Defaults applied to tasks created through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inclusive duration of a new task, in days.
    pub default_duration_days: i64,
    /// Health of a new task.
    pub default_health: Health,
    /// Name of a new task.
    pub default_name: String,
    /// Owner of a new task.
    pub default_owner: String,
    /// Owner's role on a new task.
    pub default_role: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration_days: 5,
            default_health: Health::Gray,
            default_name: "New Task".to_string(),
            default_owner: "Unassigned".to_string(),
            default_role: "Contributor".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from all sources.
    pub fn load() -> Result<Self, ScheduleError> {
        Self::from_figment(Self::figment())
    }

    /// Extracts from a caller-built figment, e.g. one with extra providers.
    pub fn from_figment(figment: Figment) -> Result<Self, ScheduleError> {
        let config: Self = figment.extract()?;
        Ok(config.normalized())
    }

    /// Builds the provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            figment = figment.merge(Toml::file(local));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn normalized(mut self) -> Self {
        if self.default_duration_days < 1 {
            tracing::warn!(
                configured = self.default_duration_days,
                "default_duration_days must be positive; using 1"
            );
            self.default_duration_days = 1;
        }
        self
    }
}
