//! Image sizes and requested output geometries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FaceCropError;

/// Real-valued width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// The requested output dimensions, written `WxH` or `WxH#`.
///
/// A trailing `#` selects crop mode: the output is filled exactly and the
/// overflowing dimension is cropped. Without it the image is resized to fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetGeometry {
    pub width: u32,
    pub height: u32,
    pub crop: bool,
}

impl TargetGeometry {
    pub fn new(width: u32, height: u32, crop: bool) -> Self {
        Self {
            width,
            height,
            crop,
        }
    }

    /// Target aspect ratio (width / height).
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }
}

impl FromStr for TargetGeometry {
    type Err = FaceCropError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (dims, crop) = match trimmed.strip_suffix('#') {
            Some(dims) => (dims, true),
            None => (trimmed, false),
        };

        let Some((w, h)) = dims.split_once(['x', 'X']) else {
            return Err(FaceCropError::InvalidGeometry(format!(
                "'{raw}' (expected WxH or WxH#)"
            )));
        };

        let parse_dim = |value: &str, axis: &str| -> Result<u32, FaceCropError> {
            match value.trim().parse::<u32>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(FaceCropError::InvalidGeometry(format!(
                    "'{raw}' has invalid {axis} '{value}'; expected a positive integer"
                ))),
            }
        };

        Ok(Self::new(parse_dim(w, "width")?, parse_dim(h, "height")?, crop))
    }
}

impl fmt::Display for TargetGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        if self.crop {
            write!(f, "#")?;
        }
        Ok(())
    }
}

impl Serialize for TargetGeometry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
