use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pagemask operations.
#[derive(Debug, Error)]
pub enum PagemaskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse PAGE XML from {path}: {message}")]
    PageXmlParse { path: PathBuf, message: String },

    #[error("Companion PAGE file not found for {image}: expected {expected}")]
    CompanionNotFound { image: PathBuf, expected: PathBuf },

    #[error("Output name '{name}' for {image} is already used by {first}")]
    DuplicateOutputName {
        name: String,
        image: PathBuf,
        first: PathBuf,
    },

    #[error("Invalid input layout at {path}: {message}")]
    InputLayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Build finished with {failed} failed image(s) out of {total}")]
    BuildFailed { failed: usize, total: usize },
}
