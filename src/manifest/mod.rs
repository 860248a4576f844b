//! Image/label manifest files.
//!
//! A manifest is a headerless two-column CSV: image path, label path. The
//! dataset builder writes one (`set_data.csv`) and the split step reads it
//! back and writes two more (`eval_data.csv`, `train_data.csv`).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PagemaskError;

/// One (image, label) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub image: PathBuf,
    pub label: PathBuf,
}

impl ManifestEntry {
    pub fn new(image: impl Into<PathBuf>, label: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            label: label.into(),
        }
    }
}

/// Read a manifest file.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, PagemaskError> {
    let file = File::open(path).map_err(PagemaskError::Io)?;
    read_entries(BufReader::new(file), path)
}

/// Write a manifest file, replacing any existing one.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<(), PagemaskError> {
    let file = File::create(path).map_err(PagemaskError::Io)?;
    write_entries(BufWriter::new(file), entries, path)?
        .flush()
        .map_err(PagemaskError::Io)
}

/// Parse manifest rows from a string.
pub fn from_manifest_str(csv_str: &str) -> Result<Vec<ManifestEntry>, PagemaskError> {
    read_entries(csv_str.as_bytes(), Path::new("<string>"))
}

/// Render manifest rows to a string.
pub fn to_manifest_string(entries: &[ManifestEntry]) -> Result<String, PagemaskError> {
    let dummy_path = Path::new("<string>");
    let bytes = write_entries(Vec::new(), entries, dummy_path)?;
    String::from_utf8(bytes).map_err(|e| PagemaskError::InvalidOptions {
        message: format!("manifest contains non UTF-8 paths: {e}"),
    })
}

fn read_entries<R: Read>(reader: R, path: &Path) -> Result<Vec<ManifestEntry>, PagemaskError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.deserialize() {
        let entry: ManifestEntry = result.map_err(|source| PagemaskError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn write_entries<W: Write>(
    writer: W,
    entries: &[ManifestEntry],
    path: &Path,
) -> Result<W, PagemaskError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for entry in entries {
        csv_writer
            .serialize(entry)
            .map_err(|source| PagemaskError::ManifestWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| PagemaskError::Io(e.into_error()))
}
