use facecrop::geometry::{PixelRect, Rect, Size, TargetGeometry};
use facecrop::pipeline::{plan_regions, Outcome};
use facecrop::planner::{plan, plan_geometry, PlanningContext, Resize, Scale};
use facecrop::region::{aggregate, DetectedRegion};
use proptest::prelude::*;

mod proptest_helpers;

fn context(
    source: Size,
    regions: &[DetectedRegion],
    target: &TargetGeometry,
    max_scale_out: f64,
) -> PlanningContext {
    let agg = aggregate(regions, source).expect("scene has regions");
    PlanningContext::new(source, &agg, target.aspect(), max_scale_out)
}

fn center(rect: &Rect) -> (f64, f64) {
    (
        (rect.xmin() + rect.xmax()) / 2.0,
        (rect.ymin() + rect.ymax()) / 2.0,
    )
}

/// Output size of `convert -crop <crop> -resize <scale> [-crop <crop>]`,
/// rounding scaled lengths the way ImageMagick does.
fn convert_output_size(crop: &PixelRect, resize: Option<&Resize>) -> (u32, u32) {
    let (mut width, mut height) = (crop.width, crop.height);
    let Some(resize) = resize else {
        return (width, height);
    };

    let (w, h) = (width as f64, height as f64);
    (width, height) = match resize.scale {
        Scale::Width(target) => (target, (h * (target as f64 / w)).round() as u32),
        Scale::Height(target) => ((w * (target as f64 / h)).round() as u32, target),
        Scale::Fit {
            width: tw,
            height: th,
        } => {
            let ratio = (tw as f64 / w).min(th as f64 / h);
            ((w * ratio).round() as u32, (h * ratio).round() as u32)
        }
    };

    if let Some(second) = &resize.crop {
        width = second.width.min(width.saturating_sub(second.x));
        height = second.height.min(height.saturating_sub(second.y));
    }
    (width, height)
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn crop_stays_inside_source(
        (source, regions) in proptest_helpers::arb_scene_unclipped(6),
        target in proptest_helpers::arb_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let outcome = plan_regions(regions, source, &target, max);
        let Outcome::Planned { plan, .. } = &outcome else {
            return Err(TestCaseError::fail("regions were dropped"));
        };

        prop_assert!(Rect::from_size(source).contains(&plan.crop), "{:?}", plan.crop);

        let pixels = plan.crop_pixels();
        prop_assert!(pixels.right() <= source.width as u64);
        prop_assert!(pixels.bottom() <= source.height as u64);
    }

    #[test]
    fn crop_contains_bounding_box(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let ctx = context(source, &regions, &target, max);
        let geometry = plan_geometry(&ctx);

        prop_assert!(geometry.padded.contains(&ctx.bounding_box));
        prop_assert!(geometry.cropped.contains(&ctx.bounding_box));
        for region in &regions {
            prop_assert!(geometry.cropped.contains(&region.rect));
        }
    }

    #[test]
    fn scale_out_respects_cap(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let ctx = context(source, &regions, &target, max);
        let geometry = plan_geometry(&ctx);
        let eps = proptest_helpers::eps_for(source);

        prop_assert!(geometry.cropped.width() <= max * geometry.padded.width() + eps);
        prop_assert!(geometry.cropped.height() <= max * geometry.padded.height() + eps);
    }

    #[test]
    fn padding_is_symmetric(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let ctx = context(source, &regions, &target, max);
        let geometry = plan_geometry(&ctx);
        let eps = 1e-6 * source.width.max(source.height);

        let (bx, by) = center(&ctx.bounding_box);
        let (cx, cy) = center(&geometry.cropped);
        prop_assert!((bx - cx).abs() <= eps, "x center moved: {bx} -> {cx}");
        prop_assert!((by - cy).abs() <= eps, "y center moved: {by} -> {cy}");
    }

    #[test]
    fn aspect_matches_target_when_budgets_suffice(
        (source, region) in proptest_helpers::arb_centered_scene(),
        target in proptest_helpers::arb_moderate_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let ctx = context(source, std::slice::from_ref(&region), &target, max);
        let geometry = plan_geometry(&ctx);

        let padded = geometry.padded.aspect();
        let cropped = geometry.cropped.aspect();
        prop_assert!(((padded - target.aspect()) / target.aspect()).abs() < 1e-6,
            "padded aspect {padded} != {}", target.aspect());
        prop_assert!(((cropped - target.aspect()) / target.aspect()).abs() < 1e-6,
            "cropped aspect {cropped} != {}", target.aspect());
    }

    #[test]
    fn planning_is_deterministic(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let ctx = context(source, &regions, &target, max);
        prop_assert_eq!(plan(&ctx, &target), plan(&ctx, &target));
    }

    #[test]
    fn resize_omitted_only_for_exact_size(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
    ) {
        let ctx = context(source, &regions, &target, 2.5);
        let crop_plan = plan(&ctx, &target);
        let pixels = crop_plan.crop_pixels();
        let exact = pixels.width == target.width && pixels.height == target.height;
        prop_assert_eq!(crop_plan.resize.is_none(), exact);
    }

    #[test]
    fn crop_mode_output_has_target_size(
        (source, regions) in proptest_helpers::arb_scene(6),
        (width, height) in (1u32..=4000, 1u32..=4000),
        max in proptest_helpers::arb_max_scale_out(),
    ) {
        let target = TargetGeometry::new(width, height, true);
        let ctx = context(source, &regions, &target, max);
        let crop_plan = plan(&ctx, &target);
        let pixels = crop_plan.crop_pixels();
        prop_assume!(pixels.width > 0 && pixels.height > 0);

        prop_assert_eq!(
            convert_output_size(&pixels, crop_plan.resize.as_ref()),
            (width, height),
            "crop {} resize {:?}", pixels, crop_plan.resize
        );
    }

    #[test]
    fn padded_aspect_moves_toward_target_without_overshoot(
        (source, regions) in proptest_helpers::arb_scene(6),
        target in proptest_helpers::arb_target(),
    ) {
        let ctx = context(source, &regions, &target, 1.0);
        let geometry = plan_geometry(&ctx);
        let aspect = target.aspect();

        let (bw, bh) = (ctx.bounding_box.width(), ctx.bounding_box.height());
        let (pw, ph) = (geometry.padded.width(), geometry.padded.height());
        let tol = 1e-9 * (bw + aspect * bh + pw + aspect * ph).max(1.0);

        if bw > aspect * bh {
            // Too wide: only the height grows, up to the target aspect.
            prop_assert!((pw - bw).abs() <= tol);
            prop_assert!(ph >= bh - tol);
            prop_assert!(aspect * ph <= bw + tol, "overshot: {pw}x{ph} for {aspect}");
        } else if bw < aspect * bh {
            // Too tall: only the width grows, up to the target aspect.
            prop_assert!((ph - bh).abs() <= tol);
            prop_assert!(pw >= bw - tol);
            prop_assert!(pw <= aspect * ph + tol, "overshot: {pw}x{ph} for {aspect}");
        } else {
            prop_assert_eq!(geometry.padded, ctx.bounding_box);
        }
    }
}
