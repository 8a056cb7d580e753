use std::path::PathBuf;
use thiserror::Error;

/// The main error type for facecrop operations.
#[derive(Debug, Error)]
pub enum FaceCropError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config {path}: {source}")]
    ConfigYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    ConfigJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Unknown detector '{0}'")]
    UnknownDetector(String),

    #[error("Invalid options for detector '{detector}': {source}")]
    DetectorOptions {
        detector: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Detector '{detector}' failed: {message}")]
    Detection { detector: String, message: String },

    #[error("Failed to parse regions JSON from {path}: {source}")]
    RegionsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse regions CSV from {path}: {source}")]
    RegionsCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Image operation '{program}' failed ({status}): {stderr}")]
    ImageOperationFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{failed} of {total} image(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("Failed to write JSON output: {0}")]
    JsonWrite(#[source] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
