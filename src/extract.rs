//! Collaborator contracts for turning documents into text
//!
//! The scanner core treats generic text extraction and spreadsheet
//! normalization as external collaborators with narrow contracts. Both are
//! modeled as traits so a run can be assembled with different backends; the
//! defaults shipped here cover spreadsheets in-process and accept anything
//! else only when it sniffs as plain text.

use crate::error::{Result, ScanError};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};

/// Extensions the default extractor reads through the spreadsheet engine.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsb", "ods"];

/// Turns one arbitrary document into plain text.
///
/// May fail for unsupported or corrupt input; every failure is a
/// per-document failure, never fatal to a run.
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Converts a macro-enabled spreadsheet into a plain spreadsheet file.
///
/// The converted sibling lands in `temp_dir` and is handed back to the
/// generic extraction path.
pub trait SpreadsheetNormalizer {
    fn convert(&self, path: &Path, temp_dir: &Path) -> Result<PathBuf>;
}

/// Default generic extractor.
///
/// Spreadsheet formats go through calamine, one row per line with cells
/// tab-joined. Everything else is read whole and accepted only when the
/// content passes a plain-text sniff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            return spreadsheet_text(path);
        }

        let bytes = std::fs::read(path)?;
        if !is_likely_text(&bytes) {
            return Err(ScanError::Unsupported(path.display().to_string()));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Default normalizer: reads the macro-enabled workbook and writes every
/// sheet's rows to `<temp_dir>/<stem>.csv`.
///
/// The artifact is keyed by the source file's stem only, so two sources
/// sharing a stem overwrite each other's conversion within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CsvNormalizer;

impl SpreadsheetNormalizer for CsvNormalizer {
    fn convert(&self, path: &Path, temp_dir: &Path) -> Result<PathBuf> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ScanError::Extraction(e.to_string()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("spreadsheet");
        let converted = temp_dir.join(format!("{stem}.csv"));

        let mut writer =
            csv::Writer::from_path(&converted).map_err(|e| ScanError::Extraction(e.to_string()))?;

        for sheet_name in workbook.sheet_names().to_vec() {
            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                for row in range.rows() {
                    let record: Vec<String> = row.iter().map(cell_text).collect();
                    writer
                        .write_record(&record)
                        .map_err(|e| ScanError::Extraction(e.to_string()))?;
                }
            }
        }
        writer
            .flush()
            .map_err(|e| ScanError::Extraction(e.to_string()))?;

        Ok(converted)
    }
}

fn spreadsheet_text(path: &Path) -> Result<String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ScanError::Extraction(e.to_string()))?;

    let mut all_text = String::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        if let Ok(range) = workbook.worksheet_range(&sheet_name) {
            for row in range.rows() {
                let row_text: Vec<String> = row.iter().map(cell_text).collect();
                if row_text.iter().all(String::is_empty) {
                    continue;
                }
                all_text.push_str(&row_text.join("\t"));
                all_text.push('\n');
            }
        }
    }

    Ok(all_text)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR:{e:?}"),
        Data::DateTime(dt) => dt.to_string(),
    }
}

/// Accept content as text when it has no NUL bytes and at most 10% of its
/// characters are control or replacement characters after lossy decoding.
fn is_likely_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    if bytes.contains(&0) {
        return false;
    }

    let text = String::from_utf8_lossy(bytes);
    let mut good = 0usize;
    let mut bad = 0usize;

    for c in text.chars() {
        if c == '\u{FFFD}' || (c.is_ascii_control() && c != '\n' && c != '\r' && c != '\t') {
            bad += 1;
        } else {
            good += 1;
        }
    }

    bad * 10 <= (good + bad)
}
