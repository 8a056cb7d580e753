//! Regions from Pascal VOC XML annotation files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use serde::Deserialize;

use super::{parse_options, Detector};
use crate::error::FaceCropError;
use crate::region::DetectedRegion;

pub(super) const NAME: &str = "voc";
const COLOR: &str = "yellow";
const VOC_XML_EXTENSION: &str = "xml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocOptions {
    /// Directory holding the XML files; defaults to the image's directory.
    #[serde(default)]
    dir: Option<PathBuf>,
}

/// Reads `<stem>.xml` and returns every `<object>` bounding box.
///
/// A missing annotation file yields no regions.
#[derive(Debug, Default)]
pub struct VocDetector {
    dir: Option<PathBuf>,
}

impl VocDetector {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// The annotation path for `image`.
    pub fn annotation_path(&self, image: &Path) -> PathBuf {
        let mut file_name = image.file_stem().unwrap_or_default().to_owned();
        file_name.push(".");
        file_name.push(VOC_XML_EXTENSION);

        let dir = match &self.dir {
            Some(dir) => dir.as_path(),
            None => image.parent().unwrap_or_else(|| Path::new("")),
        };
        dir.join(file_name)
    }
}

impl Detector for VocDetector {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
        let path = self.annotation_path(image);
        let xml = match fs::read_to_string(&path) {
            Ok(xml) => xml,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(FaceCropError::Io(err)),
        };
        parse_voc_regions(&xml, &path)
    }
}

/// Parses the `<object>` boxes of a VOC annotation document.
pub fn parse_voc_regions(xml: &str, path: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| FaceCropError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(FaceCropError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let mut regions = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let bndbox = child_element(object, "bndbox").ok_or_else(|| FaceCropError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <bndbox> in <object>".to_string(),
        })?;

        let xmin = parse_required_f64(bndbox, "xmin", path)?;
        let ymin = parse_required_f64(bndbox, "ymin", path)?;
        let xmax = parse_required_f64(bndbox, "xmax", path)?;
        let ymax = parse_required_f64(bndbox, "ymax", path)?;

        let mut region = DetectedRegion::new(xmin, ymin, xmax, ymax).or_color(COLOR);
        region.label = optional_child_text(object, "name");
        regions.push(region);
    }

    Ok(regions)
}

fn parse_required_f64(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<f64, FaceCropError> {
    let raw = optional_child_text(node, tag).ok_or_else(|| FaceCropError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in <bndbox>"),
    })?;
    raw.parse::<f64>().map_err(|_| FaceCropError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in <bndbox>; expected floating-point number"),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

pub(super) fn build(options: &serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError> {
    let options: VocOptions = parse_options(NAME, options)?;
    Ok(Box::new(VocDetector::new(options.dir)))
}
