//! Crop planning around an aggregated bounding box.
//!
//! The planner runs three stages over a [`PlanningContext`]:
//!
//! 1. **Aspect pad**: grow the bounding box along one axis toward the
//!    target aspect ratio, using no more than the smaller budget on that
//!    axis so the box stays centered and inside the source image.
//! 2. **Scale-out**: grow the padded box on both axes, keeping its aspect
//!    ratio, until either the remaining budget or the maximum scale-out
//!    factor is reached.
//! 3. **Crop and resize**: the result is the crop rectangle; a resize (and
//!    possibly a secondary crop) maps it onto the exact target dimensions.
//!
//! Everything is computed with `f64`. Conversion to whole pixels happens
//! once, in [`CropPlan::crop_pixels`].

mod transform;

pub use transform::{transformation_to, Resize, Scale};

use serde::Serialize;

use crate::error::FaceCropError;
use crate::geometry::{PixelRect, Rect, Size, TargetGeometry};
use crate::region::{Aggregate, PaddingBudget};

/// Default limit on how far the padded box may be scaled out.
pub const DEFAULT_MAX_SCALE_OUT: f64 = 2.5;

/// Checks a maximum scale-out factor.
///
/// Factors below 1.0 would shrink the crop below the detected regions.
pub fn validate_max_scale_out(factor: f64) -> Result<f64, FaceCropError> {
    if !factor.is_finite() || factor < 1.0 {
        return Err(FaceCropError::ConfigInvalid(format!(
            "max_scale_out must be a finite number >= 1.0 (got {factor})"
        )));
    }
    Ok(factor)
}

/// Inputs to the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanningContext {
    /// The whole source image, with its origin at (0, 0).
    pub source: Rect,
    pub bounding_box: Rect,
    pub budget: PaddingBudget,
    /// Requested output aspect ratio (width / height), positive.
    pub target_aspect: f64,
    /// Maximum scale-out factor, at least 1.0.
    pub max_scale_out: f64,
}

impl PlanningContext {
    pub fn new(
        source: Size,
        aggregate: &Aggregate,
        target_aspect: f64,
        max_scale_out: f64,
    ) -> Self {
        Self {
            source: Rect::from_size(source),
            bounding_box: aggregate.bounding_box,
            budget: aggregate.budget,
            target_aspect,
            max_scale_out,
        }
    }
}

/// Symmetric padding along each axis: `x` is added on the left and the
/// right, `y` on the top and the bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Padding {
    pub x: f64,
    pub y: f64,
}

/// The intermediate and final rectangles of a planning run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlanGeometry {
    /// Padding applied by the aspect stage.
    pub aspect_padding: Padding,
    /// The bounding box after the aspect stage.
    pub padded: Rect,
    /// Padding applied by the scale-out stage.
    pub scale_padding: Padding,
    /// The final crop rectangle.
    pub cropped: Rect,
}

impl PlanGeometry {
    /// How far the scale-out stage grew the padded box (1.0 = not at all).
    pub fn scale_out(&self) -> f64 {
        if self.padded.width() > 0.0 {
            self.cropped.width() / self.padded.width()
        } else {
            1.0
        }
    }
}

/// The planner's output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CropPlan {
    /// Crop rectangle in source coordinates, inside the source image.
    pub crop: Rect,
    /// Transform from the cropped region to the target dimensions; `None`
    /// when the crop already has the target size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<Resize>,
}

impl CropPlan {
    /// The crop rectangle truncated to whole pixels.
    pub fn crop_pixels(&self) -> PixelRect {
        PixelRect::truncate(&self.crop)
    }
}

/// Stage A: pads the bounding box toward the target aspect ratio.
///
/// A box that is too wide gains height, one that is too tall gains width.
/// Padding is symmetric and never exceeds the smaller budget on that axis.
/// Aspect comparisons are cross-multiplied so zero-height boxes need no
/// division.
///
/// When the budget runs out first the target aspect is not reached. The
/// padded aspect then lies between the bounding box's aspect and the
/// target: it only moves toward the target and never overshoots it. The
/// remaining mismatch is left to the secondary crop in [`transformation_to`].
pub fn aspect_padding(bbox: &Rect, budget: &PaddingBudget, target_aspect: f64) -> Padding {
    let (width, height) = (bbox.width(), bbox.height());

    if width > target_aspect * height {
        let needed_y = (width / target_aspect - height) / 2.0;
        Padding {
            x: 0.0,
            y: needed_y.min(budget.max_y()).max(0.0),
        }
    } else if width < target_aspect * height {
        let needed_x = (target_aspect * height - width) / 2.0;
        Padding {
            x: needed_x.min(budget.max_x()).max(0.0),
            y: 0.0,
        }
    } else {
        Padding::default()
    }
}

/// Stage B: symmetric, aspect-preserving scale-out of the padded box.
///
/// `remaining` holds the budgets left after stage A. The binding axis is
/// whichever budget runs out first at the padded aspect ratio; the result is
/// then capped so that the box grows by at most `max_scale_out` times the
/// padded size. A padded box with zero width or height is not scaled.
pub fn scale_out_padding(padded: &Rect, remaining: &PaddingBudget, max_scale_out: f64) -> Padding {
    let (width, height) = (padded.width(), padded.height());
    if width <= 0.0 || height <= 0.0 {
        return Padding::default();
    }

    let aspect = width / height;
    let max_extra_x = remaining.max_x();
    let max_extra_y = remaining.max_y();

    let mut extra = if max_extra_x / aspect > max_extra_y {
        Padding {
            x: max_extra_y * aspect,
            y: max_extra_y,
        }
    } else {
        Padding {
            x: max_extra_x,
            y: max_extra_x / aspect,
        }
    };

    if (2.0 * extra.x + width) / width > max_scale_out {
        extra = Padding {
            x: (max_scale_out - 1.0) * width / 2.0,
            y: (max_scale_out - 1.0) * height / 2.0,
        };
    }

    extra
}

/// Runs stages A and B and returns every intermediate rectangle.
///
/// Stage B keeps the padded aspect, so `cropped` carries the same bound as
/// [`aspect_padding`]: between the bounding box's aspect and the target.
pub fn plan_geometry(ctx: &PlanningContext) -> PlanGeometry {
    let aspect = aspect_padding(&ctx.bounding_box, &ctx.budget, ctx.target_aspect);
    let padded = ctx.bounding_box.inflate(aspect.x, aspect.y);

    let remaining = PaddingBudget {
        top: (ctx.budget.top - aspect.y).max(0.0),
        bottom: (ctx.budget.bottom - aspect.y).max(0.0),
        left: (ctx.budget.left - aspect.x).max(0.0),
        right: (ctx.budget.right - aspect.x).max(0.0),
    };
    let scale = scale_out_padding(&padded, &remaining, ctx.max_scale_out);

    // Clipping only absorbs floating-point noise; the budgets already keep
    // the crop inside the source.
    let cropped = padded.inflate(scale.x, scale.y).clip_to(&ctx.source);

    PlanGeometry {
        aspect_padding: aspect,
        padded,
        scale_padding: scale,
        cropped,
    }
}

/// Plans the crop for `ctx` and the resize onto `target`.
pub fn plan(ctx: &PlanningContext, target: &TargetGeometry) -> CropPlan {
    crop_plan(&plan_geometry(ctx), target)
}

/// Stage C: the crop from `geometry` and the resize onto `target`.
///
/// The resize is computed from the whole-pixel crop, since that is what the
/// image operation receives.
pub fn crop_plan(geometry: &PlanGeometry, target: &TargetGeometry) -> CropPlan {
    let crop = geometry.cropped;
    let pixels = PixelRect::truncate(&crop);

    let resize = if pixels.width == target.width && pixels.height == target.height {
        None
    } else {
        Some(transformation_to(
            Size::from((pixels.width, pixels.height)),
            target,
        ))
    };

    tracing::debug!(
        crop = %pixels,
        scale_out = geometry.scale_out(),
        resize = ?resize,
        "planned crop"
    );

    CropPlan { crop, resize }
}
