// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Document-Tree Email Harvester
//!
//! Recursively scans a directory of heterogeneous documents and extracts all
//! unique email addresses found in their content. Documents are routed by
//! extension to one of several extraction strategies; legacy Outlook `.msg`
//! compound files are decoded natively from their MAPI property streams.
//!
//! # Features
//!
//! - Permissive, case-insensitive address matching
//! - Native MSG decoding with header-block fallback and narrow/wide
//!   string-stream resolution
//! - Spreadsheet extraction, with macro-enabled workbooks normalized first
//! - Best-effort per-document error isolation: a failed file is recorded,
//!   never fatal
//!
//! # Example
//!
//! ```no_run
//! use email_harvest::{Dispatcher, scan_tree};
//! use std::path::Path;
//!
//! let dispatcher = Dispatcher::with_defaults();
//! let outcome = scan_tree(Path::new("./documents"), &dispatcher);
//!
//! for address in &outcome.addresses {
//!     println!("{address}");
//! }
//! ```

mod container;
mod dispatch;
mod error;
mod extract;
mod msg;
mod pattern;
mod scanner;

pub use container::CompoundReader;
pub use dispatch::{Dispatcher, ExtractedText, Route, route_for};
pub use error::{Result, ScanError};
pub use extract::{CsvNormalizer, DocumentExtractor, SpreadsheetNormalizer, TextExtractor};
pub use msg::{DecodedMessage, StringPreference, decode_message};
pub use pattern::{find_all, find_per_line};
pub use scanner::{ScanOutcome, failure_report_path, report, scan_tree};
