#![allow(dead_code)]

use facecrop::geometry::{Size, TargetGeometry};
use facecrop::region::DetectedRegion;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance relative to the source image's larger side.
pub const EPS_REL: f64 = 1e-9;

pub fn eps_for(source: Size) -> f64 {
    source.width.max(source.height) * EPS_REL
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_source() -> BoxedStrategy<Size> {
    (16u32..=4096, 16u32..=4096)
        .prop_map(Size::from)
        .boxed()
}

/// A region with both corners inside the image, given in any order.
pub fn arb_region_within(source: Size) -> BoxedStrategy<DetectedRegion> {
    (
        0.0..=source.width,
        0.0..=source.height,
        0.0..=source.width,
        0.0..=source.height,
    )
        .prop_map(|(x1, y1, x2, y2)| DetectedRegion::new(x1, y1, x2, y2))
        .boxed()
}

/// A region that may reach past any edge of the image.
pub fn arb_region_around(source: Size) -> BoxedStrategy<DetectedRegion> {
    let (w, h) = (source.width, source.height);
    (-w..=2.0 * w, -h..=2.0 * h, -w..=2.0 * w, -h..=2.0 * h)
        .prop_map(|(x1, y1, x2, y2)| DetectedRegion::new(x1, y1, x2, y2))
        .boxed()
}

/// A source image with 1..=`max_regions` regions inside it.
pub fn arb_scene(max_regions: usize) -> BoxedStrategy<(Size, Vec<DetectedRegion>)> {
    arb_source()
        .prop_flat_map(move |source| {
            (
                Just(source),
                proptest::collection::vec(arb_region_within(source), 1..=max_regions),
            )
        })
        .boxed()
}

/// Like [`arb_scene`] but with regions that may leave the image.
pub fn arb_scene_unclipped(max_regions: usize) -> BoxedStrategy<(Size, Vec<DetectedRegion>)> {
    arb_source()
        .prop_flat_map(move |source| {
            (
                Just(source),
                proptest::collection::vec(arb_region_around(source), 1..=max_regions),
            )
        })
        .boxed()
}

/// One small box near the middle of a large image.
///
/// The box is at most a tenth of the shorter image side and its center lies
/// in the middle fifth of each axis, so every side has room for padding up
/// to a 1:2 or 2:1 target.
pub fn arb_centered_scene() -> BoxedStrategy<(Size, DetectedRegion)> {
    (200u32..=2000, 200u32..=2000)
        .prop_map(Size::from)
        .prop_flat_map(|source| {
            let max_side = source.width.min(source.height) / 10.0;
            (
                Just(source),
                0.4..=0.6f64,
                0.4..=0.6f64,
                1.0..=max_side,
                1.0..=max_side,
            )
        })
        .prop_map(|(source, fx, fy, w, h)| {
            let cx = source.width * fx;
            let cy = source.height * fy;
            (
                source,
                DetectedRegion::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0),
            )
        })
        .boxed()
}

pub fn arb_target() -> BoxedStrategy<TargetGeometry> {
    (1u32..=4000, 1u32..=4000, any::<bool>())
        .prop_map(|(width, height, crop)| TargetGeometry::new(width, height, crop))
        .boxed()
}

/// Targets with an aspect ratio between 1:2 and 2:1.
pub fn arb_moderate_target() -> BoxedStrategy<TargetGeometry> {
    (100u32..=2000, 0.5..=2.0f64)
        .prop_map(|(height, aspect)| {
            let width = ((height as f64 * aspect).round() as u32).max(1);
            TargetGeometry::new(width, height, true)
        })
        .prop_filter("aspect within 1:2..2:1", |target| {
            (0.5..=2.0).contains(&target.aspect())
        })
        .boxed()
}

pub fn arb_max_scale_out() -> BoxedStrategy<f64> {
    prop_oneof![Just(1.0), Just(2.5), 1.0..=6.0f64].boxed()
}
