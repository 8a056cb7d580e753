//! Regions given directly in the configuration.

use std::path::Path;

use serde::Deserialize;

use super::{parse_options, Detector};
use crate::error::FaceCropError;
use crate::region::DetectedRegion;

pub(super) const NAME: &str = "fixed";
const COLOR: &str = "green";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixedOptions {
    #[serde(default)]
    regions: Vec<DetectedRegion>,
}

/// Returns the same regions for every image.
///
/// Handy when the subject position is known up front, and for tests.
#[derive(Debug)]
pub struct FixedDetector {
    regions: Vec<DetectedRegion>,
}

impl FixedDetector {
    pub fn new(regions: Vec<DetectedRegion>) -> Self {
        Self {
            regions: regions.into_iter().map(|r| r.or_color(COLOR)).collect(),
        }
    }
}

impl Detector for FixedDetector {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, _image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
        Ok(self.regions.clone())
    }
}

pub(super) fn build(options: &serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError> {
    let options: FixedOptions = parse_options(NAME, options)?;
    Ok(Box::new(FixedDetector::new(options.regions)))
}
