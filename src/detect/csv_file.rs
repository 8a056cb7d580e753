//! Regions exported by an external detector as one CSV file.
//!
//! Expected header: `filename,xmin,ymin,xmax,ymax`, optionally followed by
//! `label`. Rows match an image by file name.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{parse_options, Detector};
use crate::error::FaceCropError;
use crate::region::DetectedRegion;

pub(super) const NAME: &str = "csv";
const COLOR: &str = "blue";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CsvOptions {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    filename: String,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    #[serde(default)]
    label: Option<String>,
}

/// Looks up an image's regions in a shared CSV export.
#[derive(Debug)]
pub struct CsvDetector {
    path: PathBuf,
}

impl CsvDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Detector for CsvDetector {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
        let file = File::open(&self.path).map_err(FaceCropError::Io)?;
        regions_for_image(BufReader::new(file), &self.path, image)
    }
}

/// Filters the rows of a CSV export down to those describing `image`.
fn regions_for_image<R: std::io::Read>(
    reader: R,
    csv_path: &Path,
    image: &Path,
) -> Result<Vec<DetectedRegion>, FaceCropError> {
    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let full_path = image.to_string_lossy();

    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut regions = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|source| FaceCropError::RegionsCsvParse {
            path: csv_path.to_path_buf(),
            source,
        })?;

        if row.filename != file_name && row.filename != full_path {
            continue;
        }

        let mut region = DetectedRegion::new(row.xmin, row.ymin, row.xmax, row.ymax).or_color(COLOR);
        region.label = row.label.filter(|label| !label.is_empty());
        regions.push(region);
    }

    Ok(regions)
}

/// Fuzz-only entrypoint for CSV export parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_csv_export(input: &[u8]) -> Result<(), FaceCropError> {
    let _ = regions_for_image(input, Path::new("<fuzz>"), Path::new("image.jpg"))?;
    Ok(())
}

pub(super) fn build(options: &serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError> {
    let options: CsvOptions = parse_options(NAME, options)?;
    Ok(Box::new(CsvDetector::new(options.path)))
}
