//! Snapshot store configuration.

use hole_core::enums::SnapshotPolicyKind;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default cap on stored snapshots for a single entity.
const fn default_max_snapshots_per_entity() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Upper bound on one entity's history. Ingestion that would append past
    /// it is rejected as overloaded.
    #[serde(default = "default_max_snapshots_per_entity")]
    pub max_snapshots_per_entity: usize,

    /// Rule deciding when an ingested update becomes a new snapshot.
    #[serde(default)]
    pub policy: SnapshotPolicyKind,
}

impl StoreConfig {
    /// Reject values the store cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `max_snapshots_per_entity` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_snapshots_per_entity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.max_snapshots_per_entity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_snapshots_per_entity: default_max_snapshots_per_entity(),
            policy: SnapshotPolicyKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StoreConfig::default();
        assert_eq!(config.max_snapshots_per_entity, 1024);
        assert_eq!(config.policy, SnapshotPolicyKind::ContentChanged);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_invalid() {
        let config = StoreConfig {
            max_snapshots_per_entity: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "store.max_snapshots_per_entity"
        ));
    }
}
