//! Property-based tests for normalization invariants.
//!
//! Checks the username and amount rules over generated inputs rather than
//! hand-picked examples.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::time::{Duration, UNIX_EPOCH};

use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use relay_core::{
    extract_username, normalize, DonationRecord, Normalized, TestClock, SAWERIA, SOCIALBUZZ,
};
use serde_json::{json, Map, Value};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 200,
        failure_persistence: None,
        source_file: None,
        ..ProptestConfig::default()
    }
}

fn clock() -> TestClock {
    TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn normalized_record(outcome: Normalized) -> DonationRecord {
    match outcome {
        Normalized::Record(record) => record,
        Normalized::Ignored { event_type } => panic!("unexpected ignore: {event_type:?}"),
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn tagged_messages_yield_captured_name(
        name in "[A-Za-z0-9_]{1,20}",
        rest in ".{0,40}",
        fallback in ".{0,20}",
    ) {
        let message = format!("[{name}]{rest}");
        prop_assert_eq!(extract_username(&message, &fallback), name.as_str());
    }

    #[test]
    fn untagged_messages_yield_fallback(
        message in "[^\\[].{0,40}",
        fallback in ".{0,20}",
    ) {
        prop_assert_eq!(extract_username(&message, &fallback), fallback.as_str());
    }

    #[test]
    fn fractional_amounts_floor(raw in 0.0f64..1.0e12) {
        let body = as_object(json!({ "type": "donation", "amount_raw": raw }));
        let record = normalized_record(normalize(&body, &SAWERIA, &clock()).unwrap());

        prop_assert_eq!(record.amount, raw.floor() as u64);
        prop_assert!(record.amount as f64 <= raw);
    }

    #[test]
    fn string_amounts_floor(whole in 0u64..1_000_000_000, cents in 0u32..100) {
        let body = as_object(json!({ "amount": format!("{whole}.{cents:02}") }));
        let record = normalized_record(normalize(&body, &SOCIALBUZZ, &clock()).unwrap());

        prop_assert_eq!(record.amount, whole);
    }

    #[test]
    fn negative_amounts_clamp_to_zero(raw in -1.0e9f64..0.0) {
        let body = as_object(json!({ "type": "donation", "amount_raw": raw }));
        let record = normalized_record(normalize(&body, &SAWERIA, &clock()).unwrap());

        prop_assert_eq!(record.amount, 0);
    }

    #[test]
    fn non_donation_types_always_ignored(event_type in "[a-z_]{1,16}") {
        prop_assume!(event_type != "donation");
        let body = as_object(json!({ "type": event_type, "amount_raw": 1000 }));

        let outcome = normalize(&body, &SAWERIA, &clock()).unwrap();
        prop_assert_eq!(outcome, Normalized::Ignored { event_type: Some(event_type) });
    }
}
