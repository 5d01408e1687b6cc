//! Processing and service configuration.
//!
//! [`ProcessConfig`] is the flat set of toggles sent alongside an upload.
//! Recognised keys are `translate`, `remove_prices`, `remove_header` and
//! `remove_ref`; each defaults to `true` when absent and unknown keys are
//! ignored.

use crate::error::{RedactorError, RedactorResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn enabled() -> bool {
    true
}

/// Stage toggles for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    #[serde(default = "enabled")]
    pub translate: bool,

    #[serde(default = "enabled")]
    pub remove_prices: bool,

    #[serde(default = "enabled")]
    pub remove_header: bool,

    #[serde(default = "enabled", rename = "remove_ref", alias = "remove_reference")]
    pub remove_reference: bool,
}

impl ProcessConfig {
    /// Every stage disabled.
    pub fn none() -> Self {
        Self {
            translate: false,
            remove_prices: false,
            remove_header: false,
            remove_reference: false,
        }
    }

    /// Parses a JSON document. `null` and the empty string mean "all defaults".
    pub fn from_json(raw: &str) -> RedactorResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Builds a config from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> RedactorResult<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(RedactorError::Config {
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }

    /// Returns true when no stage would run.
    pub fn is_noop(&self) -> bool {
        !(self.translate || self.remove_prices || self.remove_header || self.remove_reference)
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            translate: true,
            remove_prices: true,
            remove_header: true,
            remove_reference: true,
        }
    }
}

/// Storage layout and retention for the process service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub retention: Duration,
}

impl ServiceConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            processed_dir: processed_dir.into(),
            retention: Duration::hours(1),
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new("uploads", "processed")
    }
}
