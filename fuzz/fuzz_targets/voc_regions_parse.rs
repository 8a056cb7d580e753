//! Fuzz target for VOC XML region parsing.

#![no_main]

use std::path::Path;

use facecrop::detect::parse_voc_regions;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_voc_regions(xml, Path::new("fuzz.xml"));
});
