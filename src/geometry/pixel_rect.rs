//! Integer crop rectangles as handed to the image operation.

use std::fmt;

use serde::Serialize;

use super::rect::Rect;

/// A whole-pixel rectangle, displayed as `WxH+X+Y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Truncates origin and dimensions toward zero.
    ///
    /// Truncating every component in the same direction keeps
    /// `x + width <= rect.xmax()`, so a rectangle inside the source image
    /// never overruns its right or bottom edge after conversion.
    /// Negative values saturate to zero.
    pub fn truncate(rect: &Rect) -> Self {
        Self::new(
            rect.xmin() as u32,
            rect.ymin() as u32,
            rect.width() as u32,
            rect.height() as u32,
        )
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl Serialize for PixelRect {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fractional_rect() {
        let rect = Rect::from_xywh(55.56, 250.0, 888.89, 500.0);
        let px = PixelRect::truncate(&rect);
        assert_eq!(px, PixelRect::new(55, 250, 888, 500));
        assert_eq!(px.to_string(), "888x500+55+250");
    }

    #[test]
    fn test_truncate_never_overruns() {
        let rect = Rect::from_xyxy(10.7, 0.0, 1000.0, 20.0);
        let px = PixelRect::truncate(&rect);
        assert!(px.right() <= 1000);
    }

    #[test]
    fn test_negative_rounding_noise_saturates() {
        let rect = Rect::from_xyxy(-1e-12, -0.0, 100.0, 50.0);
        let px = PixelRect::truncate(&rect);
        assert_eq!(px.x, 0);
        assert_eq!(px.y, 0);
    }
}
