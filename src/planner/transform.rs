//! Resize (and secondary crop) from a cropped region onto the target size.
//!
//! The scale strings follow ImageMagick geometry syntax: `Wx` scales to a
//! width, `xH` to a height, `WxH` fits inside a box.

use std::fmt;

use serde::Serialize;

use crate::geometry::{PixelRect, Size, TargetGeometry};

/// How the cropped region is scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Scale to this width, keeping the aspect ratio (`Wx`).
    Width(u32),
    /// Scale to this height, keeping the aspect ratio (`xH`).
    Height(u32),
    /// Fit inside this box, keeping the aspect ratio (`WxH`).
    Fit { width: u32, height: u32 },
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Width(width) => write!(f, "{width}x"),
            Scale::Height(height) => write!(f, "x{height}"),
            Scale::Fit { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

impl Serialize for Scale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Second-stage transform onto the target dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Resize {
    pub scale: Scale,
    /// Crop applied after scaling, in scaled-image coordinates. Present only
    /// when the scaled image still overflows the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<PixelRect>,
}

/// Computes the transform that maps an image of size `source` onto `target`.
///
/// In crop mode the image is scaled to fill the target along the axis that
/// needs the larger factor and the overflow on the other axis is cropped
/// evenly from both sides. Otherwise the image is fitted inside the target.
pub fn transformation_to(source: Size, target: &TargetGeometry) -> Resize {
    if !target.crop {
        return Resize {
            scale: Scale::Fit {
                width: target.width,
                height: target.height,
            },
            crop: None,
        };
    }

    let dst = target.size();
    let ratio_w = dst.width / source.width;
    let ratio_h = dst.height / source.height;

    if ratio_w >= ratio_h {
        let scaled_height = source.height * ratio_w;
        Resize {
            scale: Scale::Width(target.width),
            crop: overflow_crop(scaled_height, dst.height).map(|offset| {
                PixelRect::new(0, offset, target.width, target.height)
            }),
        }
    } else {
        let scaled_width = source.width * ratio_h;
        Resize {
            scale: Scale::Height(target.height),
            crop: overflow_crop(scaled_width, dst.width).map(|offset| {
                PixelRect::new(offset, 0, target.width, target.height)
            }),
        }
    }
}

/// Offset of a centered crop, or `None` when the scaled length rounds to the
/// target length.
fn overflow_crop(scaled: f64, target: f64) -> Option<u32> {
    if scaled.round() == target {
        None
    } else {
        Some(((scaled - target) / 2.0).max(0.0) as u32)
    }
}
