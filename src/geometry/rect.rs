//! Axis-aligned rectangles defined by their top-left and bottom-right corners.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::size::Size;

/// An axis-aligned rectangle in source-image pixel space.
///
/// Values are real-valued; rounding to whole pixels happens only when a
/// rectangle is converted into a [`PixelRect`](super::PixelRect).
///
/// [`Rect::from_corners`] orders the corners, so rectangles built from
/// detector output always satisfy `top_left <= bottom_right`.
/// [`Rect::from_xyxy`] stores the values as given.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    /// Creates a rectangle from its corners without reordering them.
    #[inline]
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Creates a rectangle from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::new(Point::new(xmin, ymin), Point::new(xmax, ymax))
    }

    /// Creates a rectangle from a top-left corner and its dimensions.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Creates a rectangle from any two opposite corners.
    ///
    /// Corners with a non-finite coordinate are kept as given (`f64::min`
    /// would silently drop a NaN) so that the result still reports
    /// `is_finite() == false`.
    #[inline]
    pub fn from_corners(a: Point, b: Point) -> Self {
        if a.is_finite() && b.is_finite() {
            Self::new(a.min(b), a.max(b))
        } else {
            Self::new(a, b)
        }
    }

    /// The rectangle covering a whole image of the given size.
    #[inline]
    pub fn from_size(size: Size) -> Self {
        Self::from_xyxy(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.top_left.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.top_left.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.bottom_right.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.bottom_right.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Width divided by height.
    ///
    /// Infinite for a zero-height rectangle with positive width, NaN when
    /// both dimensions are zero.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width() / self.height()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.top_left.is_finite() && self.bottom_right.is_finite()
    }

    /// Returns true if the corners are ordered (top-left <= bottom-right).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.top_left.x <= self.bottom_right.x && self.top_left.y <= self.bottom_right.y
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.xmin() >= self.xmin()
            && other.ymin() >= self.ymin()
            && other.xmax() <= self.xmax()
            && other.ymax() <= self.ymax()
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.top_left.min(other.top_left),
            self.bottom_right.max(other.bottom_right),
        )
    }

    /// Clamps every coordinate into `bounds`.
    pub fn clip_to(&self, bounds: &Rect) -> Rect {
        let clamp_x = |x: f64| x.clamp(bounds.xmin(), bounds.xmax());
        let clamp_y = |y: f64| y.clamp(bounds.ymin(), bounds.ymax());
        Rect::from_xyxy(
            clamp_x(self.xmin()),
            clamp_y(self.ymin()),
            clamp_x(self.xmax()),
            clamp_y(self.ymax()),
        )
    }

    /// Grows the rectangle by `dx` on the left and right and by `dy` on the
    /// top and bottom.
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::from_xyxy(
            self.xmin() - dx,
            self.ymin() - dy,
            self.xmax() + dx,
            self.ymax() + dy,
        )
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("xmin", &self.top_left.x)
            .field("ymin", &self.top_left.y)
            .field("xmax", &self.bottom_right.x)
            .field("ymax", &self.bottom_right.y)
            .finish()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}

// Flat xmin/ymin/xmax/ymax on the wire, matching detector output files.
impl Serialize for Rect {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Rect", 4)?;
        state.serialize_field("xmin", &self.top_left.x)?;
        state.serialize_field("ymin", &self.top_left.y)?;
        state.serialize_field("xmax", &self.bottom_right.x)?;
        state.serialize_field("ymax", &self.bottom_right.y)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Rect {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RectData {
            xmin: f64,
            ymin: f64,
            xmax: f64,
            ymax: f64,
        }
        let data = RectData::deserialize(deserializer)?;
        Ok(Rect::from_xyxy(data.xmin, data.ymin, data.xmax, data.ymax))
    }
}
