//! Process records and their lifecycle.
//!
//! ```text
//! pending ──▶ processing ──▶ completed(stats)
//!                        └──▶ failed(cause)
//! ```
//!
//! Terminal states are final. Deleting a record is a destruction event,
//! not a transition.

use crate::config::ProcessConfig;
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::RunStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upload-to-result lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: Uuid,
    pub status: ProcessStatus,
    pub config: ProcessConfig,
    pub original_filename: String,
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub stats: Option<RunStats>,
    /// Human-readable cause, set when the run failed.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessRecord {
    pub fn new(
        id: Uuid,
        original_filename: &str,
        input_file: PathBuf,
        config: ProcessConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: ProcessStatus::Pending,
            config,
            original_filename: original_filename.to_string(),
            input_file,
            output_file: None,
            stats: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// pending → processing
    pub fn start(&mut self, now: DateTime<Utc>) -> RedactorResult<()> {
        self.transition(ProcessStatus::Pending, ProcessStatus::Processing, now)
    }

    /// processing → completed
    pub fn complete(
        &mut self,
        stats: RunStats,
        output_file: PathBuf,
        now: DateTime<Utc>,
    ) -> RedactorResult<()> {
        self.transition(ProcessStatus::Processing, ProcessStatus::Completed, now)?;
        self.stats = Some(stats);
        self.output_file = Some(output_file);
        Ok(())
    }

    /// pending | processing → failed
    pub fn fail(&mut self, cause: impl Into<String>, now: DateTime<Utc>) -> RedactorResult<()> {
        if self.status.is_terminal() {
            return Err(self.invalid(ProcessStatus::Failed));
        }
        self.status = ProcessStatus::Failed;
        self.error = Some(cause.into());
        self.updated_at = now;
        Ok(())
    }

    /// Download name offered for the processed artifact.
    pub fn download_name(&self) -> String {
        format!("MODIFICATO_{}", self.original_filename)
    }

    fn transition(
        &mut self,
        from: ProcessStatus,
        to: ProcessStatus,
        now: DateTime<Utc>,
    ) -> RedactorResult<()> {
        if self.status != from {
            return Err(self.invalid(to));
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    fn invalid(&self, to: ProcessStatus) -> RedactorError {
        RedactorError::InvalidTransition {
            id: self.id,
            from: self.status.as_str(),
            to: to.as_str(),
        }
    }
}
