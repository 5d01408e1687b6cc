//! Service layer: process records, their store, and the process service.
//!
//! The pipeline in [`crate::redaction`] knows nothing about identifiers or
//! storage. This module tracks each upload from submission to a terminal
//! state through an injected [`ProcessStore`].

pub mod record;
pub mod service;
pub mod store;

pub use record::{ProcessRecord, ProcessStatus};
pub use service::{Artifact, ProcessService};
pub use store::{is_expired, InMemoryProcessStore, ProcessStore};
