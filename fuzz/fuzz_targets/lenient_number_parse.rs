//! Fuzz target for the prefix number parsers used on CVAT attributes.

#![no_main]

use boxcount::model::{parse_float_prefix, parse_int_prefix};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_int_prefix(text);
        let _ = parse_float_prefix(text);
    }
});
