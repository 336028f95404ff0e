//! Shared error type across p5bridge crates.

use thiserror::Error;

/// Stable error kinds surfaced to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Broadcast attempted while no editor session is registered.
    NoSubscribers,
    /// Targeted emission at a session that is no longer registered.
    UnknownSession,
    /// Every candidate port failed to bind.
    BindExhausted,
    /// Unexpected failure from the underlying channel.
    TransportFailure,
    /// Malformed command arguments.
    InvalidArgument,
    /// Config file rejected by strict parsing or validation.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in controller-facing messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoSubscribers => "NO_SUBSCRIBERS",
            ErrorKind::UnknownSession => "UNKNOWN_SESSION",
            ErrorKind::BindExhausted => "BIND_EXHAUSTED",
            ErrorKind::TransportFailure => "TRANSPORT_FAILURE",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no editor sessions connected")]
    NoSubscribers,
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error("could not bind any candidate port {candidates:?}")]
    BindExhausted { candidates: Vec<u16> },
    #[error("transport failure: {0}")]
    TransportFailure(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Map to a stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::NoSubscribers => ErrorKind::NoSubscribers,
            BridgeError::UnknownSession(_) => ErrorKind::UnknownSession,
            BridgeError::BindExhausted { .. } => ErrorKind::BindExhausted,
            BridgeError::TransportFailure(_) => ErrorKind::TransportFailure,
            BridgeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BridgeError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            BridgeError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            BridgeError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Only a failed listener startup is allowed to stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::BindExhausted { .. })
    }

    /// True for conditions the controller should read as "nobody is listening"
    /// rather than "the bridge is broken".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BridgeError::NoSubscribers | BridgeError::UnknownSession(_)
        )
    }
}
