//! Fuzz target for PAGE XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the PAGE XML parser and
//! rasterizes whatever lines and regions come out, checking for panics, crashes,
//! or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pagemask::mask::{rasterize, rasterize_regions, MaskOptions};
use pagemask::page::{from_page_xml_slice, line_geometries};

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(document) = from_page_xml_slice(data) {
        let opts = MaskOptions {
            draw_lines: true,
            draw_endpoints: true,
            ..Default::default()
        };
        let _ = rasterize(64, 64, &line_geometries(&document), &opts);
        let _ = rasterize_regions(64, 64, &document.layout);
    }
});
