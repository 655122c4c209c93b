use std::{path::Path, time::Duration};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Errors from loading a [`PoolConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A provider failed, or a value had the wrong type
    #[error("failed to load config")]
    Figment(#[from] Box<figment::Error>),

    /// The tree height is outside `1..=32`
    #[error("tree_height must be between 1 and {max}, got {got}", max = accumulator::MAX_HEIGHT)]
    TreeHeight {
        /// The configured height
        got: usize,
    },

    /// A pool must accept at least its current root
    #[error("root_history_size must be at least 1")]
    RootHistorySize,
}

/// Configuration of a [`Pool`](crate::Pool)
///
/// Values are layered: defaults, then an optional TOML file, then `POOL_*` environment variables
/// (e.g. `POOL_TREE_HEIGHT=24`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Height of the note accumulator, the pool holds `2^tree_height` notes
    pub tree_height: usize,

    /// How many previous roots a transaction may be built against
    pub root_history_size: usize,

    /// The largest deposit a single transaction may make, in base units
    pub max_deposit_amount: u64,

    /// How long to wait for the deposit source or withdrawal sink
    pub external_transfer_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            tree_height: 20,
            root_history_size: 30,
            // 1 token with 9 decimals
            max_deposit_amount: 1_000_000_000,
            external_transfer_timeout_ms: 5_000,
        }
    }
}

impl PoolConfig {
    /// The layered [`Figment`] this config is extracted from
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));

        let figment = match file {
            Some(file) => figment.merge(Toml::file(file)),
            None => figment,
        };

        figment.merge(Env::prefixed("POOL_"))
    }

    /// Load and validate the config
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(file).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a pool cannot be created with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=accumulator::MAX_HEIGHT).contains(&self.tree_height) {
            return Err(ConfigError::TreeHeight {
                got: self.tree_height,
            });
        }

        if self.root_history_size == 0 {
            return Err(ConfigError::RootHistorySize);
        }

        Ok(())
    }

    /// [`PoolConfig::external_transfer_timeout_ms`] as a [`Duration`]
    #[must_use]
    pub fn external_transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.external_transfer_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults() {
        Jail::expect_with(|_jail| {
            let config = PoolConfig::load(None).unwrap();
            assert_eq!(config, PoolConfig::default());
            assert_eq!(config.tree_height, 20);
            assert_eq!(config.root_history_size, 30);
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pool.toml",
                r#"
                    tree_height = 8
                    max_deposit_amount = 42
                "#,
            )?;
            jail.set_env("POOL_MAX_DEPOSIT_AMOUNT", "100");

            let config = PoolConfig::load(Some(Path::new("pool.toml"))).unwrap();

            assert_eq!(config.tree_height, 8);
            assert_eq!(config.max_deposit_amount, 100);
            assert_eq!(config.root_history_size, 30);
            Ok(())
        });
    }

    #[test]
    fn rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("POOL_TREE_HEIGHT", "0");
            assert!(matches!(
                PoolConfig::load(None),
                Err(ConfigError::TreeHeight { got: 0 })
            ));

            jail.set_env("POOL_TREE_HEIGHT", "33");
            assert!(matches!(
                PoolConfig::load(None),
                Err(ConfigError::TreeHeight { got: 33 })
            ));

            jail.set_env("POOL_TREE_HEIGHT", "10");
            jail.set_env("POOL_ROOT_HISTORY_SIZE", "0");
            assert!(matches!(
                PoolConfig::load(None),
                Err(ConfigError::RootHistorySize)
            ));

            jail.set_env("POOL_ROOT_HISTORY_SIZE", "not a number");
            assert!(matches!(
                PoolConfig::load(None),
                Err(ConfigError::Figment(_))
            ));
            Ok(())
        });
    }
}
