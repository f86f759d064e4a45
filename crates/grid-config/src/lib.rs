//! # grid-config
//!
//! Layered configuration loading for Schoolgrid using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCHOOLGRID_*` prefix, `__` as separator)
//! 2. Project-level `.schoolgrid/config.toml`
//! 3. User-level `~/.config/schoolgrid/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCHOOLGRID_DATABASE__PATH` -> `database.path`,
//! `SCHOOLGRID_WORKFLOW__MAX_ATTEMPTS` -> `workflow.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use grid_config::GridConfig;
//!
//! let config = GridConfig::load_with_dotenv(std::path::Path::new(".")).expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod workflow;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GridConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl GridConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// relative to the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`GridConfig::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with the project-level file taken from `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.workflow.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// A `.env` in `project_root` is preferred; otherwise `dotenvy` searches
    /// the current directory and its parents. Variables already set in the
    /// process environment are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let project_env = project_root.join(".env");
        if project_env.is_file() {
            let _ = dotenvy::from_path(project_env);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load_from(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".schoolgrid").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SCHOOLGRID_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("schoolgrid").join("config.toml"))
    }
}
