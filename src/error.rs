//! Error types for the PDF scrubbing library.
//!
//! Errors are split by how far they propagate:
//!
//! - [`RedactorError::Open`] and [`RedactorError::Save`] abort a whole run and
//!   never come with partial statistics.
//! - [`RedactorError::Stage`] is raised by a single rule's matcher. The planner
//!   catches it, skips that rule for the current page and moves on.
//! - The remaining variants belong to the service layer and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for scrubbing operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all pipeline and service operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// The input could not be parsed as a PDF document.
    #[error("Failed to open '{}' as a PDF: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// The processed document could not be persisted.
    #[error("Failed to save PDF to '{}': {reason}", .path.display())]
    Save { path: PathBuf, reason: String },

    /// A single rule's matcher failed on one page.
    #[error("Rule '{rule}' failed on page {page}: {reason}")]
    Stage {
        rule: String,
        page: usize,
        reason: String,
    },

    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error reported by the PDF backend while a run was in progress.
    #[error("{}", processing_message(.message, .page))]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text extraction failed
    #[error("Text extraction failed for '{}': {reason}", .path.display())]
    TextExtraction { path: PathBuf, reason: String },

    /// Processing configuration could not be interpreted.
    #[error("Invalid processing configuration: {reason}")]
    Config { reason: String },

    /// Invalid parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// No process record exists for the identifier.
    #[error("Process '{id}' not found")]
    ProcessNotFound { id: Uuid },

    /// A process record was asked to move between incompatible states.
    #[error("Process '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: &'static str,
        to: &'static str,
    },
}

fn processing_message(message: &str, page: &Option<usize>) -> String {
    match page {
        Some(p) => format!("PDF processing error on page {}: {}", p, message),
        None => format!("PDF processing error: {}", message),
    }
}

impl RedactorError {
    /// Returns true for errors that abort a whole pipeline run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Stage { .. })
    }
}

impl From<serde_json::Error> for RedactorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
