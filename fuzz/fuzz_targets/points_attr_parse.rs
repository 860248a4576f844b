//! Fuzz target for PAGE `points` attribute parsing.
//!
//! Feeds arbitrary strings to the `x,y x,y ...` point-list parser, which is
//! only reachable from outside the crate with the `fuzzing` feature.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pagemask::page::io_page_xml::fuzz_parse_points_attr;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(input) = std::str::from_utf8(data) {
        let _ = fuzz_parse_points_attr(input);
    }
});
