//! Fuzz target for CSV detector exports.

#![no_main]

use facecrop::detect::fuzz_parse_csv_export;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_csv_export(data);
});
