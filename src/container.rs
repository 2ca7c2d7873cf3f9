//! Read-only access to compound-file (OLE/CFB) stream contents

use crate::error::{Result, ScanError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A compound-file container opened read-only over one document.
///
/// The container exposes a directory of named byte streams; this adapter
/// only ever looks streams up by exact name. A missing stream is an ordinary
/// outcome, not an error — only a corrupt or unreadable container fails.
pub struct CompoundReader {
    inner: cfb::CompoundFile<File>,
}

impl CompoundReader {
    /// Open the container at `path`.
    ///
    /// Fails with [`ScanError::Container`] when the file is not a compound
    /// file or its internal directory cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = cfb::open(path).map_err(|e| ScanError::Container(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Return the raw bytes of the stream named `name`, or `None` when no
    /// stream with that exact name exists in the container directory.
    pub fn stream_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        if !self.inner.is_stream(name) {
            return Ok(None);
        }

        let mut bytes = Vec::new();
        let mut stream = self
            .inner
            .open_stream(name)
            .map_err(|e| ScanError::Decode(e.to_string()))?;
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| ScanError::Decode(e.to_string()))?;

        Ok(Some(bytes))
    }
}
