//! Lane and scheduler configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Suffix of the environment variable holding a lane's concurrency limit.
pub const CONCURRENCY_LIMIT_ENV_SUFFIX: &str = "_CONCURRENCY_LIMIT";

/// Configuration for one scheduler lane (one rate-limited service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Maximum number of simultaneously executing work items.
    pub concurrency_limit: usize,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of lane name to configuration.
    pub lanes: HashMap<String, LaneConfig>,
}

impl LaneConfig {
    /// Validate lane configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` when the limit is 0.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        self.check().map_err(SchedulerError::InvalidConfig)
    }

    fn check(&self) -> Result<(), String> {
        if self.concurrency_limit == 0 {
            return Err("concurrency_limit must be greater than 0".into());
        }
        Ok(())
    }

    /// Name of the environment variable read for `lane`, e.g. `FACT_CHECK_CONCURRENCY_LIMIT`.
    #[must_use]
    pub fn env_var_name(lane: &str) -> String {
        let lane: String = lane
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{lane}{CONCURRENCY_LIMIT_ENV_SUFFIX}")
    }

    /// Load a lane's limit from the environment, after loading `.env` if present.
    ///
    /// A missing or unparsable value is an error; there is no default.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` when the variable is missing,
    /// not an integer, or 0.
    pub fn from_env(lane: &str) -> Result<Self, SchedulerError> {
        load_dotenv();
        Self::read_env(lane)
    }

    /// Read `<LANE>_CONCURRENCY_LIMIT` from the process environment only.
    fn read_env(lane: &str) -> Result<Self, SchedulerError> {
        let var = Self::env_var_name(lane);
        let raw = std::env::var(&var)
            .map_err(|e| SchedulerError::InvalidConfig(format!("{var}: {e}")))?;
        let concurrency_limit = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| SchedulerError::InvalidConfig(format!("{var}={raw:?}: {e}")))?;
        let cfg = Self { concurrency_limit };
        cfg.check()
            .map_err(|e| SchedulerError::InvalidConfig(format!("{var}: {e}")))?;
        Ok(cfg)
    }
}

impl SchedulerConfig {
    /// Validate all lanes and ensure at least one lane exists.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` naming the first bad lane.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.lanes.is_empty() {
            return Err(SchedulerError::InvalidConfig(
                "at least one lane must be defined".into(),
            ));
        }
        for (name, lane) in &self.lanes {
            if name.is_empty() {
                return Err(SchedulerError::InvalidConfig(
                    "lane names must not be empty".into(),
                ));
            }
            lane.check()
                .map_err(|e| SchedulerError::InvalidConfig(format!("lane `{name}` invalid: {e}")))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load each named lane from the environment (see [`LaneConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns the first lane's configuration error, or an error if `lanes` is empty.
    pub fn from_env<'a>(lanes: impl IntoIterator<Item = &'a str>) -> Result<Self, SchedulerError> {
        load_dotenv();
        let lanes = lanes
            .into_iter()
            .map(|name| LaneConfig::read_env(name).map(|cfg| (name.to_string(), cfg)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        let cfg = Self { lanes };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Load `.env` into the process environment if present. Real env vars win.
fn load_dotenv() {
    // Absent .env is normal.
    let _ = dotenvy::dotenv();
}
