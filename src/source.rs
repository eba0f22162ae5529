//! Locating the annotation XML inside an uploaded file.
//!
//! CVAT hands out either a bare `annotations.xml` or a `.zip` export with
//! that file at the archive root. Both are accepted; the file extension
//! decides which, and anything else is rejected before any bytes are read.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::BoxCountError;

/// The entry a CVAT export archive must contain.
pub const ANNOTATIONS_ENTRY: &str = "annotations.xml";

/// Container kinds accepted as input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Xml,
    Zip,
}

impl SourceKind {
    /// Determines the container kind from the file extension (any case).
    pub fn from_path(path: &Path) -> Result<Self, BoxCountError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xml") => Ok(SourceKind::Xml),
            Some("zip") => Ok(SourceKind::Zip),
            _ => Err(BoxCountError::UnsupportedFormat(format!(
                "'{}' (please select an .xml or .zip file)",
                path.display()
            ))),
        }
    }
}

/// Read `path` from disk and return the annotation XML it holds.
pub fn read_annotation_xml(path: &Path) -> Result<String, BoxCountError> {
    // Reject before touching the file system.
    SourceKind::from_path(path)?;
    let bytes = fs::read(path)?;
    extract_annotation_xml(path, &bytes)
}

/// Return the annotation XML held by `bytes`, which were loaded from a file
/// named `path`.
pub fn extract_annotation_xml(path: &Path, bytes: &[u8]) -> Result<String, BoxCountError> {
    match SourceKind::from_path(path)? {
        SourceKind::Xml => Ok(decode_text(bytes)),
        SourceKind::Zip => extract_from_zip(path, bytes),
    }
}

fn extract_from_zip(path: &Path, bytes: &[u8]) -> Result<String, BoxCountError> {
    let archive_err = |source: ZipError| BoxCountError::ArchiveRead {
        path: path.to_path_buf(),
        message: source.to_string(),
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;
    let mut entry = match archive.by_name(ANNOTATIONS_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(BoxCountError::MissingEntry {
                path: path.to_path_buf(),
                entry: ANNOTATIONS_ENTRY.to_string(),
            })
        }
        Err(other) => return Err(archive_err(other)),
    };

    let mut buffer = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buffer)?;
    Ok(decode_text(&buffer))
}

/// Decodes UTF-8 text, replacing invalid sequences and dropping a BOM.
fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes).into_owned();
    if let Some(stripped) = text.strip_prefix('\u{feff}') {
        return stripped.to_string();
    }
    text
}
