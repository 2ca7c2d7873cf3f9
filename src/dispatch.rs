//! Extension-based routing of documents to extraction strategies

use crate::container::CompoundReader;
use crate::error::Result;
use crate::extract::{CsvNormalizer, DocumentExtractor, SpreadsheetNormalizer, TextExtractor};
use crate::msg::{StringPreference, decode_message};
use crate::pattern;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Known non-text binary formats: nothing to scan, not an error.
const SKIP_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "class", "pyc", "pyo", "js", "css", "ico",
];

/// Formats scanned directly, line by line.
const FLAT_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "log", "csv", "tsv", "ini", "cfg", "conf"];

/// Macro-enabled spreadsheets that need normalizing before extraction.
const MACRO_SPREADSHEET_EXTENSIONS: &[&str] = &["xlsm", "xltm"];

/// The extraction strategy chosen for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Known binary, yields no text
    Skip,
    /// Legacy compound mail message
    MailMessage,
    /// Macro-enabled spreadsheet, normalize then extract
    MacroSpreadsheet,
    /// Plain text, scanned line by line
    FlatText,
    /// Everything else goes to the generic extractor
    Generic,
}

/// Pick the route for a document from its extension (case-insensitive,
/// taken after the last `.`; files without one go to the generic path).
#[must_use]
pub fn route_for(path: &Path) -> Route {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let ext = ext.as_str();

    if SKIP_EXTENSIONS.contains(&ext) {
        Route::Skip
    } else if ext == "msg" {
        Route::MailMessage
    } else if MACRO_SPREADSHEET_EXTENSIONS.contains(&ext) {
        Route::MacroSpreadsheet
    } else if FLAT_TEXT_EXTENSIONS.contains(&ext) {
        Route::FlatText
    } else {
        Route::Generic
    }
}

/// Text produced by an extraction path, tagged with its match granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Whole-document text; every non-overlapping match counts
    Document(String),
    /// Line-oriented text; only the first match per line counts
    Lines(String),
    /// Skipped document; no text, no error
    Empty,
}

impl ExtractedText {
    /// Apply the address pattern with the granularity this variant dictates.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        match self {
            Self::Document(text) => pattern::find_all(text),
            Self::Lines(text) => pattern::find_per_line(text),
            Self::Empty => Vec::new(),
        }
    }
}

/// Routes documents to extraction strategies and executes them.
pub struct Dispatcher {
    extractor: Box<dyn TextExtractor>,
    normalizer: Box<dyn SpreadsheetNormalizer>,
    temp_dir: PathBuf,
    preference: StringPreference,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        normalizer: Box<dyn SpreadsheetNormalizer>,
        temp_dir: PathBuf,
        preference: StringPreference,
    ) -> Self {
        Self {
            extractor,
            normalizer,
            temp_dir,
            preference,
        }
    }

    /// Dispatcher with the shipped collaborators, the system temp directory
    /// for intermediate artifacts, and the default wide-string preference.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(DocumentExtractor),
            Box::new(CsvNormalizer),
            std::env::temp_dir(),
            StringPreference::default(),
        )
    }

    /// Extract the text of one document along the route its extension picks.
    ///
    /// Any error is a failure of this document only.
    pub fn dispatch(&self, path: &Path) -> Result<ExtractedText> {
        let route = route_for(path);
        debug!("Routing {} via {:?}", path.display(), route);

        match route {
            Route::Skip => Ok(ExtractedText::Empty),
            Route::MailMessage => self.decode_mail(path),
            Route::MacroSpreadsheet => {
                let converted = self.normalizer.convert(path, &self.temp_dir)?;
                let text = self.extractor.extract_text(&converted)?;
                Ok(ExtractedText::Document(text))
            }
            Route::FlatText => {
                let bytes = std::fs::read(path)?;
                Ok(ExtractedText::Lines(
                    String::from_utf8_lossy(&bytes).into_owned(),
                ))
            }
            Route::Generic => {
                let text = self.extractor.extract_text(path)?;
                Ok(ExtractedText::Document(text))
            }
        }
    }

    /// Decode a compound mail message, park the rendering in temp storage,
    /// and scan that artifact line by line.
    ///
    /// The artifact is keyed by the source stem; same-stem sources overwrite
    /// each other's rendering within a run.
    fn decode_mail(&self, path: &Path) -> Result<ExtractedText> {
        let mut container = CompoundReader::open(path)?;
        let message = decode_message(&mut container, self.preference)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("message");
        let artifact = self.temp_dir.join(format!("{stem}.txt"));
        std::fs::write(&artifact, message.render())?;

        let text = std::fs::read_to_string(&artifact)?;
        Ok(ExtractedText::Lines(text))
    }
}
