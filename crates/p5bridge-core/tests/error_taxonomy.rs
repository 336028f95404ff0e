//! Error kinds and fatality.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use p5bridge_core::{BridgeError, ErrorKind};

#[test]
fn only_bind_exhausted_is_fatal() {
    let errs = [
        BridgeError::NoSubscribers,
        BridgeError::UnknownSession("ghost".into()),
        BridgeError::TransportFailure("reset".into()),
        BridgeError::InvalidArgument("code".into()),
        BridgeError::InvalidConfig("ports".into()),
        BridgeError::UnsupportedVersion,
        BridgeError::Internal("x".into()),
    ];
    for e in &errs {
        assert!(!e.is_fatal(), "{e}");
    }
    assert!(BridgeError::BindExhausted { candidates: vec![3001] }.is_fatal());
}

#[test]
fn nobody_listening_is_distinguishable() {
    assert!(BridgeError::NoSubscribers.is_recoverable());
    assert!(BridgeError::UnknownSession("a".into()).is_recoverable());
    assert!(!BridgeError::TransportFailure("boom".into()).is_recoverable());

    assert_eq!(BridgeError::NoSubscribers.kind(), ErrorKind::NoSubscribers);
    assert_eq!(ErrorKind::NoSubscribers.as_str(), "NO_SUBSCRIBERS");
    assert_eq!(ErrorKind::TransportFailure.as_str(), "TRANSPORT_FAILURE");
}

#[test]
fn bind_exhausted_lists_candidates() {
    let e = BridgeError::BindExhausted { candidates: vec![3001, 3002] };
    assert_eq!(e.to_string(), "could not bind any candidate port [3001, 3002]");
}
