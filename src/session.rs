//! Holds the most recently loaded document.
//!
//! A [`Session`] is the only state that lives between calls. Loading a new
//! file always discards the previous document first, so a failed load
//! leaves the session empty rather than showing stale results.

use std::path::Path;

use log::info;

use crate::error::BoxCountError;
use crate::model::io_cvat_xml::parse_cvat_xml_str;
use crate::model::Document;
use crate::source::{extract_annotation_xml, read_annotation_xml};
use crate::stats::{range_stats, RangeOptions, RangeStats};

#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an `.xml` or `.zip` export from disk.
    pub fn load_path(&mut self, path: &Path) -> Result<&Document, BoxCountError> {
        self.document = None;
        let xml = read_annotation_xml(path)?;
        self.install(parse_cvat_xml_str(&xml, path)?, path)
    }

    /// Load an export from bytes the caller already read, named `path`.
    pub fn load_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<&Document, BoxCountError> {
        self.document = None;
        let xml = extract_annotation_xml(path, bytes)?;
        self.install(parse_cvat_xml_str(&xml, path)?, path)
    }

    /// Forget the loaded document.
    pub fn clear(&mut self) {
        self.document = None;
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Aggregate the loaded document over the range in `opts`.
    pub fn stats(&self, opts: &RangeOptions) -> Result<RangeStats, BoxCountError> {
        let document = self.document.as_ref().ok_or(BoxCountError::NoDocument)?;
        Ok(range_stats(document, opts))
    }

    fn install(&mut self, document: Document, path: &Path) -> Result<&Document, BoxCountError> {
        info!(
            "loaded {} ({} frames, ids {}..={})",
            path.display(),
            document.frames.len(),
            document.min_frame,
            document.max_frame
        );
        Ok(self.document.insert(document))
    }
}
