//! Schema cache configuration.

use llkv_result::{Error, Result};

/// Environment variable overriding [`SchemaCacheConfig::target_schema`].
pub const SCHEMA_ENV: &str = "LLKV_SQLSMITH_SCHEMA";
/// Environment variable overriding [`SchemaCacheConfig::seed`].
pub const SEED_ENV: &str = "LLKV_SQLSMITH_SEED";

pub const DEFAULT_TARGET_SCHEMA: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCacheConfig {
    /// Only tables in this schema are discovered.
    pub target_schema: String,
    /// Seed for random picks. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SchemaCacheConfig {
    fn default() -> Self {
        Self {
            target_schema: DEFAULT_TARGET_SCHEMA.to_string(),
            seed: None,
        }
    }
}

impl SchemaCacheConfig {
    /// Defaults overridden by `LLKV_SQLSMITH_SCHEMA` and `LLKV_SQLSMITH_SEED`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(schema) = lookup(SCHEMA_ENV)
            && !schema.trim().is_empty()
        {
            config.target_schema = schema.trim().to_string();
        }
        if let Some(seed) = lookup(SEED_ENV) {
            let seed = seed.trim().parse::<u64>().map_err(|err| {
                Error::InvalidArgumentError(format!("{SEED_ENV}={seed:?} is not a u64 seed: {err}"))
            })?;
            config.seed = Some(seed);
        }
        Ok(config)
    }

    pub fn with_target_schema(mut self, schema: impl Into<String>) -> Self {
        self.target_schema = schema.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
