//! Region detectors and the registry that builds them from configuration.
//!
//! Detection itself happens outside this crate. The built-in detectors
//! adapt the output of external tools (sidecar files, CSV exports, VOC
//! annotations, or a command that prints JSON) into [`DetectedRegion`]s.
//!
//! | Identifier     | Reads                                              |
//! |----------------|----------------------------------------------------|
//! | `fixed`        | regions listed inline in the detector options      |
//! | `json-sidecar` | `<image><suffix>` JSON array next to the image     |
//! | `csv`          | one CSV file with `filename,xmin,ymin,xmax,ymax`   |
//! | `voc`          | Pascal VOC XML `<stem>.xml`                        |
//! | `command`      | stdout of an external program (JSON array)         |

mod command;
mod csv_file;
mod fixed;
mod json_sidecar;
mod voc;

pub use self::command::CommandDetector;
pub use self::csv_file::CsvDetector;
#[cfg(feature = "fuzzing")]
pub use self::csv_file::fuzz_parse_csv_export;
pub use self::fixed::FixedDetector;
pub use self::json_sidecar::JsonSidecarDetector;
pub use self::voc::{parse_voc_regions, VocDetector};

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::DetectorSpec;
use crate::error::FaceCropError;
use crate::region::DetectedRegion;

/// Something that finds regions of interest in an image file.
pub trait Detector {
    /// The registry identifier of this detector.
    fn name(&self) -> &str;

    /// Returns the regions found in `image`, in source-image pixels.
    fn detect(&self, image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError>;
}

/// Builds a detector from its (untyped) options.
pub type DetectorFactory = fn(&serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError>;

/// Maps detector identifiers to factories.
#[derive(Clone)]
pub struct Registry {
    factories: BTreeMap<String, DetectorFactory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with every built-in detector.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(fixed::NAME, fixed::build);
        registry.register(json_sidecar::NAME, json_sidecar::build);
        registry.register(csv_file::NAME, csv_file::build);
        registry.register(voc::NAME, voc::build);
        registry.register(command::NAME, command::build);
        registry
    }

    /// Registers (or replaces) a factory.
    pub fn register(&mut self, name: impl Into<String>, factory: DetectorFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Registered identifiers in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds the detector described by `spec`.
    pub fn build(&self, spec: &DetectorSpec) -> Result<Box<dyn Detector>, FaceCropError> {
        let factory = self
            .factories
            .get(&spec.name)
            .ok_or_else(|| FaceCropError::UnknownDetector(spec.name.clone()))?;
        factory(&spec.options)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The configured detectors for one pipeline.
pub struct DetectorSet {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorSet {
    /// Wraps already-built detectors.
    ///
    /// # Errors
    /// Fails when `detectors` is empty.
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Result<Self, FaceCropError> {
        if detectors.is_empty() {
            return Err(FaceCropError::ConfigInvalid(
                "No detectors were defined".to_string(),
            ));
        }
        Ok(Self { detectors })
    }

    /// Resolves every spec through `registry`.
    ///
    /// Unknown identifiers and bad options fail here, before any image is
    /// processed.
    pub fn from_specs(registry: &Registry, specs: &[DetectorSpec]) -> Result<Self, FaceCropError> {
        let detectors = specs
            .iter()
            .map(|spec| registry.build(spec))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(detectors)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Runs every detector on `image` and concatenates the results.
    ///
    /// A failing detector is logged and contributes nothing; the others
    /// still run.
    pub fn detect(&self, image: &Path) -> Vec<DetectedRegion> {
        let mut regions = Vec::new();

        for detector in &self.detectors {
            match detector.detect(image) {
                Ok(found) => {
                    tracing::debug!(
                        detector = detector.name(),
                        image = %image.display(),
                        count = found.len(),
                        "detector finished"
                    );
                    regions.extend(found);
                }
                Err(err) => {
                    tracing::warn!(
                        detector = detector.name(),
                        image = %image.display(),
                        error = %err,
                        "detector failed; continuing without its regions"
                    );
                }
            }
        }

        regions
    }
}

/// Deserializes detector options, treating `null` as an empty map.
pub(crate) fn parse_options<T: DeserializeOwned>(
    detector: &str,
    options: &serde_json::Value,
) -> Result<T, FaceCropError> {
    let value = if options.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        options.clone()
    };

    serde_json::from_value(value).map_err(|source| FaceCropError::DetectorOptions {
        detector: detector.to_string(),
        source,
    })
}
