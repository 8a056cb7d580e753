//! Geometry primitives used by the crop planner.
//!
//! All planning arithmetic happens in real-valued source-image pixel space,
//! with the origin at the top-left corner. Only [`PixelRect`] carries
//! integer coordinates; it is the form handed to the image operation.
//!
//! # Example
//!
//! ```
//! use facecrop::geometry::{Rect, TargetGeometry};
//!
//! let face = Rect::from_xyxy(400.0, 400.0, 600.0, 600.0);
//! assert_eq!(face.aspect(), 1.0);
//!
//! let target: TargetGeometry = "1600x900#".parse().unwrap();
//! assert!(target.crop);
//! ```

mod pixel_rect;
mod point;
mod rect;
mod size;

pub use pixel_rect::PixelRect;
pub use point::Point;
pub use rect::Rect;
pub use size::{Size, TargetGeometry};
