//! Fuzz target for `WxH` / `WxH#` target geometry parsing.

#![no_main]

use facecrop::geometry::TargetGeometry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(target) = raw.parse::<TargetGeometry>() {
        assert!(target.width > 0 && target.height > 0);
        // Display output must parse back to the same geometry.
        assert_eq!(target.to_string().parse::<TargetGeometry>().ok(), Some(target));
    }
});
