//! Pipeline configuration.
//!
//! A configuration file is YAML (`.yaml`/`.yml`) or JSON (anything else):
//!
//! ```yaml
//! max_scale_out: 2.5
//! debug: false
//! detectors:
//!   - name: json-sidecar
//!     options: { suffix: ".faces.json" }
//!   - name: csv
//!     options: { path: "detections.csv" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FaceCropError;
use crate::planner::{validate_max_scale_out, DEFAULT_MAX_SCALE_OUT};

/// One detector entry: a registry identifier and its options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorSpec {
    pub name: String,
    /// Detector-specific options; each detector parses its own shape.
    #[serde(default)]
    pub options: serde_json::Value,
}

impl DetectorSpec {
    pub fn new(name: impl Into<String>, options: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

fn default_max_scale_out() -> f64 {
    DEFAULT_MAX_SCALE_OUT
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound on how far the padded box may be scaled out.
    #[serde(default = "default_max_scale_out")]
    pub max_scale_out: f64,
    /// Write a region overlay next to every output image.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub detectors: Vec<DetectorSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_scale_out: DEFAULT_MAX_SCALE_OUT,
            debug: false,
            detectors: Vec::new(),
        }
    }
}

impl Config {
    /// Loads a configuration file.
    ///
    /// The result is not validated; call [`Config::validate`] once any
    /// command-line overrides have been applied.
    pub fn from_path(path: &Path) -> Result<Self, FaceCropError> {
        let text = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            serde_yaml::from_str(&text).map_err(|source| FaceCropError::ConfigYamlParse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&text).map_err(|source| FaceCropError::ConfigJsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), FaceCropError> {
        if self.detectors.is_empty() {
            return Err(FaceCropError::ConfigInvalid(
                "No detectors were defined".to_string(),
            ));
        }
        validate_max_scale_out(self.max_scale_out)?;
        Ok(())
    }
}
