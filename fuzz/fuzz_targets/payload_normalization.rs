#![no_main]

//! Fuzz target for provider payload normalization.
//!
//! Feeds arbitrary bytes through the same steps a webhook body takes.
//! Malformed input must surface as an error value, never a panic.

use libfuzzer_sys::fuzz_target;
use relay_core::{
    extract_username, normalize, parse_payload, synthetic_record, TestClock, SAWERIA, SOCIALBUZZ,
};

fuzz_target!(|data: &[u8]| {
    let clock = TestClock::new();

    if let Ok(payload) = parse_payload(data) {
        for profile in [&SAWERIA, &SOCIALBUZZ] {
            let _ = normalize(&payload, profile, &clock);
        }
        let _ = synthetic_record(&payload, &clock);
    }

    let text = String::from_utf8_lossy(data);
    let username = extract_username(&text, "fallback");
    assert!(username == "fallback" || text.starts_with('['));
});
