//! Reduction of detected regions to a bounding box and padding budgets.

use serde::Serialize;

use super::DetectedRegion;
use crate::geometry::{Rect, Size};

/// Space available between the bounding box and each source-image edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PaddingBudget {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl PaddingBudget {
    /// Measures the budgets of `bbox` inside `source`.
    ///
    /// Each side is clamped at zero.
    pub fn between(bbox: &Rect, source: &Rect) -> Self {
        Self {
            top: (bbox.ymin() - source.ymin()).max(0.0),
            bottom: (source.ymax() - bbox.ymax()).max(0.0),
            left: (bbox.xmin() - source.xmin()).max(0.0),
            right: (source.xmax() - bbox.xmax()).max(0.0),
        }
    }

    /// The smaller of the two horizontal budgets.
    pub fn max_x(&self) -> f64 {
        self.left.min(self.right)
    }

    /// The smaller of the two vertical budgets.
    pub fn max_y(&self) -> f64 {
        self.top.min(self.bottom)
    }
}

/// The aggregated regions: one bounding box and its padding budgets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Aggregate {
    pub bounding_box: Rect,
    pub budget: PaddingBudget,
}

/// Reduces detected regions to a single bounding box.
///
/// Both corners of every region take part in a min/max reduction, so the
/// result does not depend on region order. Regions with non-finite
/// coordinates are skipped. A box reaching past the source image is
/// clipped to it so that no budget is negative.
///
/// Returns `None` when no usable region remains; callers fall back to the
/// default transformation in that case.
pub fn aggregate(regions: &[DetectedRegion], source: Size) -> Option<Aggregate> {
    let source_rect = Rect::from_size(source);

    let bounding_box = regions
        .iter()
        .filter(|region| {
            let finite = region.rect.is_finite();
            if !finite {
                tracing::warn!(region = ?region.rect, "skipping region with non-finite coordinates");
            }
            finite
        })
        .map(|region| region.rect)
        .reduce(|acc, rect| acc.union(&rect))?;

    let clipped = bounding_box.clip_to(&source_rect);
    if clipped != bounding_box {
        tracing::warn!(
            bbox = ?bounding_box,
            width = source.width,
            height = source.height,
            "bounding box extends past the source image; clipping"
        );
    }

    Some(Aggregate {
        bounding_box: clipped,
        budget: PaddingBudget::between(&clipped, &source_rect),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Size {
        Size::new(1000.0, 800.0)
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(aggregate(&[], source()).is_none());
    }

    #[test]
    fn test_single_region_budgets() {
        let regions = [DetectedRegion::new(400.0, 300.0, 600.0, 500.0)];
        let agg = aggregate(&regions, source()).unwrap();

        assert_eq!(agg.bounding_box, Rect::from_xyxy(400.0, 300.0, 600.0, 500.0));
        assert_eq!(
            agg.budget,
            PaddingBudget {
                top: 300.0,
                bottom: 300.0,
                left: 400.0,
                right: 400.0,
            }
        );
    }

    #[test]
    fn test_uses_both_corners_of_every_region() {
        // The second region has the smallest top-left x but the largest bottom-right y.
        let regions = [
            DetectedRegion::new(300.0, 100.0, 400.0, 200.0),
            DetectedRegion::new(50.0, 150.0, 120.0, 700.0),
            DetectedRegion::new(800.0, 120.0, 900.0, 160.0),
        ];
        let agg = aggregate(&regions, source()).unwrap();

        assert_eq!(agg.bounding_box, Rect::from_xyxy(50.0, 100.0, 900.0, 700.0));
        assert_eq!(agg.budget.left, 50.0);
        assert_eq!(agg.budget.right, 100.0);
        assert_eq!(agg.budget.top, 100.0);
        assert_eq!(agg.budget.bottom, 100.0);
        assert_eq!(agg.budget.max_x(), 50.0);
        assert_eq!(agg.budget.max_y(), 100.0);
    }

    #[test]
    fn test_region_touching_edge_has_zero_budget() {
        let regions = [DetectedRegion::new(0.0, 0.0, 100.0, 800.0)];
        let agg = aggregate(&regions, source()).unwrap();

        assert_eq!(agg.budget.left, 0.0);
        assert_eq!(agg.budget.top, 0.0);
        assert_eq!(agg.budget.bottom, 0.0);
        assert_eq!(agg.budget.right, 900.0);
    }

    #[test]
    fn test_out_of_bounds_box_is_clipped() {
        let regions = [DetectedRegion::new(-20.0, 700.0, 100.0, 900.0)];
        let agg = aggregate(&regions, source()).unwrap();

        assert_eq!(agg.bounding_box, Rect::from_xyxy(0.0, 700.0, 100.0, 800.0));
        assert_eq!(agg.budget.left, 0.0);
        assert_eq!(agg.budget.bottom, 0.0);
    }

    #[test]
    fn test_non_finite_regions_are_skipped() {
        let regions = [
            DetectedRegion::new(f64::NAN, 0.0, 10.0, 10.0),
            DetectedRegion::new(10.0, 10.0, 20.0, 20.0),
        ];
        let agg = aggregate(&regions, source()).unwrap();
        assert_eq!(agg.bounding_box, Rect::from_xyxy(10.0, 10.0, 20.0, 20.0));

        let only_bad = [DetectedRegion::new(0.0, 0.0, f64::INFINITY, 10.0)];
        assert!(aggregate(&only_bad, source()).is_none());
    }
}
