//! Inbound envelope parsing.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use p5bridge_core::protocol::{ClientEnvelope, ProjectState};
use p5bridge_core::ErrorKind;

#[test]
fn ping_without_data() {
    let env = ClientEnvelope::parse(r#"{"event":"ping"}"#).unwrap();
    assert_eq!(env.event, "ping");
    assert!(env.data.is_none());
}

#[test]
fn project_state_is_parsed_lazily() {
    let env = ClientEnvelope::parse(
        r#"{"event":"projectState","data":{"projectName":"Waves","files":[{"name":"sketch.js"},{"name":"index.html"}]}}"#,
    )
    .unwrap();
    assert!(env.data.as_ref().unwrap().get().contains("Waves"));

    let state: ProjectState = env.data_as().unwrap();
    assert_eq!(state.display_name(), "Waves");
    assert_eq!(state.files.len(), 2);
}

#[test]
fn project_state_defaults_when_fields_missing() {
    let env = ClientEnvelope::parse(r#"{"event":"projectState","data":{}}"#).unwrap();
    let state: ProjectState = env.data_as().unwrap();
    assert_eq!(state.display_name(), "Unknown");
    assert!(state.files.is_empty());
}

#[test]
fn missing_data_is_invalid_argument() {
    let env = ClientEnvelope::parse(r#"{"event":"projectState"}"#).unwrap();
    let err = env.data_as::<ProjectState>().expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn malformed_json_is_rejected() {
    let err = ClientEnvelope::parse("{not json").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "INVALID_ARGUMENT");

    let err = ClientEnvelope::parse(r#"{"data":1}"#).expect_err("event is required");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
