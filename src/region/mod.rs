//! Detected regions of interest and their aggregation.
//!
//! Detectors report one [`DetectedRegion`] per face (or other subject).
//! [`aggregate`] reduces them to a single bounding box plus the space left
//! between that box and each edge of the source image.

mod aggregate;

pub use aggregate::{aggregate, Aggregate, PaddingBudget};

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// A rectangle reported by a detector.
///
/// `label` and `color` are carried for reporting and the debug overlay
/// only; planning looks at `rect` alone.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedRegion {
    pub rect: Rect,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl DetectedRegion {
    /// Creates a region from two opposite corners, ordering them.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            rect: Rect::from_corners(Point::new(xmin, ymin), Point::new(xmax, ymax)),
            label: None,
            color: None,
        }
    }

    /// Creates a region from a top-left corner and its dimensions.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the color unless the region already carries one.
    pub fn or_color(mut self, color: &str) -> Self {
        if self.color.is_none() {
            self.color = Some(color.to_string());
        }
        self
    }
}

/// Wire form of a region: flat corners plus optional label and color.
#[derive(Serialize, Deserialize)]
struct RegionRecord {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl Serialize for DetectedRegion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RegionRecord {
            xmin: self.rect.xmin(),
            ymin: self.rect.ymin(),
            xmax: self.rect.xmax(),
            ymax: self.rect.ymax(),
            label: self.label.clone(),
            color: self.color.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DetectedRegion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = RegionRecord::deserialize(deserializer)?;
        Ok(DetectedRegion {
            rect: Rect::from_corners(
                Point::new(record.xmin, record.ymin),
                Point::new(record.xmax, record.ymax),
            ),
            label: record.label,
            color: record.color,
        })
    }
}

/// Parses a JSON array of regions.
///
/// Useful for testing and fuzzing without file I/O.
pub fn regions_from_json_slice(bytes: &[u8]) -> Result<Vec<DetectedRegion>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
