//! # hole-config
//!
//! Layered configuration loading for the hole snapshot store using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HOLES_*` prefix, `__` as separator)
//! 2. Project-level `.holes/config.toml`
//! 3. User-level `~/.config/holes/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HOLES_STORE__MAX_SNAPSHOTS_PER_ENTITY` -> `store.max_snapshots_per_entity`,
//! `HOLES_TRAIL__ENABLED` -> `trail.enabled`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hole_config::HoleConfig;
//!
//! let config = HoleConfig::load_with_dotenv().expect("config");
//!
//! if let Some(dir) = config.trail.active_dir() {
//!     println!("Trail: {}", dir.display());
//! }
//! ```

mod error;
mod general;
mod store;
mod trail;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;
pub use trail::TrailConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HoleConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl HoleConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.store.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".holes/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("HOLES_").split("__"));

        figment
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("holes").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hole_core::enums::SnapshotPolicyKind;

    #[test]
    fn default_config_loads() {
        let config = HoleConfig::default();
        assert!(!config.trail.enabled);
        assert_eq!(config.store.policy, SnapshotPolicyKind::ContentChanged);
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn defaults_survive_figment_extraction() {
        let figment = Figment::from(Serialized::defaults(HoleConfig::default()));
        let config = HoleConfig::from_figment(&figment).expect("should extract defaults");
        assert_eq!(config.store.max_snapshots_per_entity, 1024);
        assert_eq!(config.trail.dir, PathBuf::from(".holes/trail"));
    }
}
