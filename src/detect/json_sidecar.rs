//! Regions stored in a JSON file next to the image.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{parse_options, Detector};
use crate::error::FaceCropError;
use crate::region::DetectedRegion;

pub(super) const NAME: &str = "json-sidecar";
const COLOR: &str = "red";
const DEFAULT_SUFFIX: &str = ".faces.json";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonSidecarOptions {
    #[serde(default = "default_suffix")]
    suffix: String,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

/// Reads `<image path><suffix>`, a JSON array of regions.
///
/// A missing sidecar means the external detector found nothing for that
/// image; it is not an error.
#[derive(Debug)]
pub struct JsonSidecarDetector {
    suffix: String,
}

impl JsonSidecarDetector {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The sidecar path for `image`.
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        let mut raw: OsString = image.as_os_str().to_owned();
        raw.push(&self.suffix);
        PathBuf::from(raw)
    }
}

impl Default for JsonSidecarDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX)
    }
}

impl Detector for JsonSidecarDetector {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
        let path = self.sidecar_path(image);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(FaceCropError::Io(err)),
        };

        let regions: Vec<DetectedRegion> = serde_json::from_slice(&bytes)
            .map_err(|source| FaceCropError::RegionsJsonParse { path, source })?;

        Ok(regions.into_iter().map(|r| r.or_color(COLOR)).collect())
    }
}

pub(super) fn build(options: &serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError> {
    let options: JsonSidecarOptions = parse_options(NAME, options)?;
    Ok(Box::new(JsonSidecarDetector::new(options.suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use serde_json::json;

    #[test]
    fn test_sidecar_path_appends_suffix() {
        let detector = JsonSidecarDetector::default();
        assert_eq!(
            detector.sidecar_path(Path::new("photos/beach.jpg")),
            PathBuf::from("photos/beach.jpg.faces.json")
        );
    }

    #[test]
    fn test_reads_regions() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("beach.jpg");
        fs::write(
            temp.path().join("beach.jpg.faces.json"),
            r#"[{"xmin": 10, "ymin": 20, "xmax": 30, "ymax": 40, "label": "face"}]"#,
        )
        .unwrap();

        let regions = JsonSidecarDetector::default().detect(&image).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].rect, Rect::from_xyxy(10.0, 20.0, 30.0, 40.0));
        assert_eq!(regions[0].color.as_deref(), Some("red"));
    }

    #[test]
    fn test_missing_sidecar_is_empty() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let regions = JsonSidecarDetector::default()
            .detect(&temp.path().join("nothing.jpg"))
            .unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_malformed_sidecar_is_an_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("broken.jpg");
        fs::write(temp.path().join("broken.jpg.faces.json"), "{not json").unwrap();

        let err = JsonSidecarDetector::default().detect(&image).unwrap_err();
        assert!(matches!(err, FaceCropError::RegionsJsonParse { .. }));
    }

    #[test]
    fn test_custom_suffix_option() {
        let detector = build(&json!({ "suffix": ".regions" })).unwrap();
        assert_eq!(detector.name(), "json-sidecar");
    }
}
