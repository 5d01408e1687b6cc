//! PDF content scrubbing with irreversible redaction.
//!
//! Takes a PDF, runs a configurable sequence of content-removal stages over
//! every page and writes the modified document together with statistics
//! about what was removed. Redactions are applied through MuPDF's redaction
//! API, so removed text cannot be recovered from the output.
//!
//! # Stages
//!
//! Per page, in this order:
//!
//! 1. **Header**: a fixed-height band across the top of the page.
//! 2. **Translation**: source phrases of the translation dictionary.
//! 3. **Prices**: price keywords, amounts, currency markers and percentages,
//!    each grown to cover the rest of the line.
//! 4. **References**: supplier reference markers and the value after them.
//!
//! # Architecture
//!
//! - [`domain`]: regions, expansion policies, the rule table, price grammar
//! - [`redaction`]: locator, planner, applicator, stats and the pipeline
//! - [`process`]: process records, the record store and the service layer
//! - [`config`]: stage toggles and service settings
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use pdfscrub::{ProcessConfig, ProcessPipeline};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ProcessPipeline::with_standard_rules();
//!
//! let stats = pipeline.process(
//!     Path::new("offer.pdf"),
//!     Path::new("offer_clean.pdf"),
//!     &ProcessConfig::default(),
//! )?;
//! println!("{} prices removed", stats.prices_removed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration from JSON
//!
//! ```
//! use pdfscrub::ProcessConfig;
//!
//! let config = ProcessConfig::from_json(r#"{"remove_header": false, "foo": 1}"#).unwrap();
//! assert!(!config.remove_header);
//! assert!(config.translate);
//! ```
//!
//! ## Price tokens
//!
//! ```
//! use pdfscrub::domain::{PatternMatcher, PriceMatcher};
//!
//! let tokens = PriceMatcher::new().extract_all("Prezzo: 1.234,56 PLN, IVA 22%");
//! assert_eq!(tokens, vec!["1.234,56", "PLN", "22%"]);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod process;
pub mod redaction;

pub use config::{ProcessConfig, ServiceConfig};
pub use domain::{Expansion, PatternMatcher, PriceMatcher, Region, Rule, RuleTable, Term};
pub use error::{RedactorError, RedactorResult};
pub use process::{
    is_expired, InMemoryProcessStore, ProcessRecord, ProcessService, ProcessStatus, ProcessStore,
};
pub use redaction::{
    extract_text as extract_text_from_pdf, Locator, MupdfBackend, PagePlan, Planner,
    ProcessPipeline, RunStats,
};
