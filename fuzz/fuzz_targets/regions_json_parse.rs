//! Fuzz target for region JSON parsing followed by planning.
//!
//! Whatever a detector prints, parsing and planning must not panic and the
//! crop must stay inside the source image.

#![no_main]

use facecrop::geometry::{Size, TargetGeometry};
use facecrop::pipeline::plan_regions;
use facecrop::region::regions_from_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(regions) = regions_from_json_slice(data) else {
        return;
    };

    let outcome = plan_regions(
        regions,
        Size::new(1000.0, 750.0),
        &TargetGeometry::new(1600, 900, true),
        2.5,
    );
    if let Some(crop) = outcome.crop() {
        assert!(crop.right() <= 1000 && crop.bottom() <= 750);
    }
});
