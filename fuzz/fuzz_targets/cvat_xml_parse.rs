//! Fuzz target for CVAT XML parsing and aggregation.
//!
//! Arbitrary bytes go through the parser; anything that parses is also
//! aggregated, checking for panics, crashes, or hangs in both.

#![no_main]

use boxcount::model::io_cvat_xml::from_cvat_xml_slice;
use boxcount::stats::{range_stats, RangeOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    if let Ok(doc) = from_cvat_xml_slice(data) {
        let stats = range_stats(&doc, &RangeOptions::default());
        assert!(stats.total_after_exclude <= stats.total_boxes_count);
    }
});
