//! Domain Errors for Node Lookup
//!
//! None of these reach the caller of a lookup. Remote-party failures are
//! absorbed by the query primitive; the remaining variants belong to wire
//! decoding and configuration.

use thiserror::Error;

/// Errors from transport operations (dial, send, receive).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not open a connection to the peer.
    #[error("dial to {addr} failed: {reason}")]
    DialFailed {
        /// Address that was dialed.
        addr: String,
        /// Error description.
        reason: String,
    },
    /// No response within the request timeout.
    #[error("request timed out")]
    Timeout,
    /// Remote closed the connection before answering.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// Socket I/O failure after the connection was established.
    #[error("i/o error: {0}")]
    Io(String),
    /// Frame could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),
}

impl TransportError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DialFailed { .. } => "dial_failed",
            Self::Timeout => "timeout",
            Self::ConnectionClosed => "connection_closed",
            Self::Io(_) => "io",
            Self::Codec(_) => "codec",
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe => Self::ConnectionClosed,
            std::io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Errors building identifiers from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Byte string has the wrong width for a NodeId.
    #[error("invalid node id length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required width.
        expected: usize,
        /// Width received.
        actual: usize,
    },
}

/// Errors loading or validating lookup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },
    /// Parse error.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A field holds a value the lookup cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
