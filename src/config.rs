use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reporter::Style;

/// How often and in which layout to report.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Time between reporting passes (milliseconds)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Output layout: "verbose" or "compact"
    #[serde(default)]
    pub style: Style,
}

fn default_interval_ms() -> u64 {
    5_000
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            style: Style::default(),
        }
    }
}

impl ReporterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(Error::ZeroInterval);
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
