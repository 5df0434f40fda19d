//! Fuzz the `POST /desk/` body parser: arbitrary bytes must never panic,
//! only parse or fail.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = desklift::adapters::http::parse_set_height(data);
});
