//! Regression test: profiles must survive the bincode encoding used by the
//! Redis store.
//!
//! bincode is not self-describing. A field skipped during serialization (for
//! example with `skip_serializing_if`) shifts every following field and the
//! profile fails to decode. Optional attempt metadata is the field most
//! likely to trip this.

#![allow(clippy::unwrap_used)]

use chrono::Duration;
use login_risk_engine::stores::redis::{decode_profile, encode_profile};
use login_risk_engine::{UserId, UserProfile};
use login_risk_testing::{addresses, cities, AttemptBuilder};
use std::collections::BTreeSet;

fn populated_profile() -> UserProfile {
    let mut profile = UserProfile::new(UserId::from("rita"));

    let plain = AttemptBuilder::new("rita").build();
    let with_agent = AttemptBuilder::new("rita")
        .after(Duration::minutes(5))
        .from(addresses::PARIS)
        .user_agent("Mozilla/5.0")
        .build()
        .with_session_id("sess-42");
    let failed = AttemptBuilder::new("rita")
        .after(Duration::minutes(6))
        .failed()
        .build();

    profile.record_attempt(plain);
    profile.record_attempt(with_agent);
    profile.record_failure(failed.clone());
    profile.record_attempt(failed);
    profile.remember_location(cities::new_york());
    profile.remember_location(cities::paris());
    profile.typical_login_hours = BTreeSet::from([0, 9, 23]);
    profile
}

#[test]
fn test_populated_profile_round_trips() {
    let profile = populated_profile();
    let bytes = encode_profile(&profile).unwrap();
    assert_eq!(decode_profile(&bytes).unwrap(), profile);
}

#[test]
fn test_empty_profile_round_trips() {
    let profile = UserProfile::new(UserId::from("new-user"));
    let bytes = encode_profile(&profile).unwrap();
    let decoded = decode_profile(&bytes).unwrap();

    assert_eq!(decoded, profile);
    assert!(decoded.last_successful_login.is_none());
}

#[test]
fn test_optional_metadata_keeps_field_alignment() {
    let profile = populated_profile();
    let decoded = decode_profile(&encode_profile(&profile).unwrap()).unwrap();

    let history = &decoded.login_history;
    assert_eq!(history[0].user_agent, None);
    assert_eq!(history[0].session_id, None);
    assert_eq!(history[1].user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(history[1].session_id.as_deref(), Some("sess-42"));
    assert_eq!(history[1].ip_address, addresses::PARIS);
    assert!(!history[2].success);
}

#[test]
fn test_truncated_bytes_are_a_serialization_error() {
    let bytes = encode_profile(&populated_profile()).unwrap();
    let error = decode_profile(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(error.is_storage_error());
}
