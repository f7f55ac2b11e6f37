#![no_main]

use libfuzzer_sys::fuzz_target;
use memcodecs::{Limits, OpenRequest};

const IDENTIFIERS: [&str; 4] = ["jpg", "png", "tif", "exr"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let identifier = IDENTIFIERS[selector as usize % IDENTIFIERS.len()];

    let limits = Limits {
        max_pixels: Some(4_000_000),
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Limits::none()
    };
    let Ok(source) = OpenRequest::new(identifier)
        .with_limits(&limits)
        .open(body, body.len())
    else {
        return;
    };
    let _ = source.read_vec();
});
