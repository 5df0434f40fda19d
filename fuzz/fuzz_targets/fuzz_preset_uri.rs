//! Fuzz the preset-URI parser: arbitrary request paths must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(uri) = core::str::from_utf8(data) {
        let _ = desklift::adapters::http::parse_preset_uri(uri);
    }
});
