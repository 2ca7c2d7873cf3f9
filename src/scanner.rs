//! Directory traversal and address aggregation

use crate::dispatch::Dispatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Accumulated result of one scan: unique lower-cased addresses in
/// first-seen order, and the documents that failed to process, in
/// encounter order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub addresses: Vec<String>,
    pub unprocessed: Vec<PathBuf>,
}

/// Walk every file under `root` once, extract addresses from each, and
/// aggregate. Per-document errors are recorded and the walk continues; no
/// document can abort the run.
pub fn scan_tree(root: &Path, dispatcher: &Dispatcher) -> ScanOutcome {
    let mut addresses = Vec::new();
    let mut seen = HashSet::new();
    let mut unprocessed = Vec::new();

    let files = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file());

    for entry in files {
        let path = entry.path();

        match dispatcher.dispatch(path) {
            Ok(text) => {
                let matches = text.addresses();
                if matches.is_empty() {
                    debug!("No matches in {}", path.display());
                    continue;
                }

                println!("{} -> {}", matches.join(", "), path.display());
                for address in matches {
                    let address = address.to_lowercase();
                    if seen.insert(address.clone()) {
                        addresses.push(address);
                    }
                }
            }
            Err(err) => {
                debug!("Extraction failed for {}: {err}", path.display());
                println!("[-] Unable to process: {}", path.display());
                unprocessed.push(path.to_path_buf());
            }
        }
    }

    ScanOutcome {
        addresses,
        unprocessed,
    }
}

/// Write the outcome: append addresses to `outfile` (echoing each to
/// stdout), or report that none were found; independently append any failed
/// document paths to the derived failure report.
pub fn report(outcome: &ScanOutcome, root: &Path, outfile: &Path) -> std::io::Result<()> {
    if outcome.addresses.is_empty() {
        println!("[-] No email addresses found in '{}'", root.display());
    } else {
        let mut out = OpenOptions::new().append(true).create(true).open(outfile)?;
        for address in &outcome.addresses {
            writeln!(out, "{address}")?;
            println!("{address}");
        }
    }

    if !outcome.unprocessed.is_empty() {
        let mut failures = OpenOptions::new()
            .append(true)
            .create(true)
            .open(failure_report_path(outfile))?;
        for path in &outcome.unprocessed {
            writeln!(failures, "{}", path.display())?;
        }
    }

    Ok(())
}

/// The failure report lives next to the output file as
/// `<outfile>.unprocessed`.
#[must_use]
pub fn failure_report_path(outfile: &Path) -> PathBuf {
    let mut name = outfile.as_os_str().to_os_string();
    name.push(".unprocessed");
    PathBuf::from(name)
}
