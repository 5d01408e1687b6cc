//! Shared helpers for the integration suites.
//!
//! - PDF fixture builders (printpdf)
//! - text assertions (pdf-extract)
//! - a global lock serialising MuPDF use

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;

use std::sync::{Mutex, MutexGuard};

// MuPDF has thread-safety issues with font loading, so only one test in a
// binary may drive it at a time.
static MUPDF_LOCK: Mutex<()> = Mutex::new(());

pub fn mupdf_lock() -> MutexGuard<'static, ()> {
    MUPDF_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
