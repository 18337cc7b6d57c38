//! Error types for snmp-bulk.
//!
//! This module provides:
//!
//! - [`Error`] - Operation-level failures (transport, malformed responses, misuse)
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 3416)
//! - [`MalformedKind`] - Why a response could not be reconciled
//!
//! Agent errors tied to a single OID never surface as [`Error`]. They are
//! recorded per OID inside the result map (see [`crate::bulk::EntryError`]).
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! ```rust
//! use snmp_bulk::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::Timeout { request_id, retries } => {
//!                 println!("request {} unanswered after {} retries", request_id, retries);
//!             }
//!             Error::MalformedResponse { kind, .. } => {
//!                 println!("agent misbehaved: {}", kind);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

use crate::bulk::RoundState;

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Reason a response could not be reconciled against the pending OIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// Response request ID does not belong to the round in flight.
    RequestIdMismatch { expected: i32, actual: i32 },
    /// Fewer bindings than the effective non-repeater count.
    MissingNonRepeaters { expected: usize, actual: usize },
    /// Repeater bindings returned but no repeating OID is left to own them.
    UnassignedRepeaters { count: usize },
    /// Error index does not name a binding of the request.
    ErrorIndexOutOfRange { index: i32, pending: usize },
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestIdMismatch { expected, actual } => {
                write!(f, "request ID mismatch: expected {}, got {}", expected, actual)
            }
            Self::MissingNonRepeaters { expected, actual } => {
                write!(
                    f,
                    "expected at least {} non-repeater bindings, got {}",
                    expected, actual
                )
            }
            Self::UnassignedRepeaters { count } => {
                write!(f, "{} repeater bindings with no repeating OID", count)
            }
            Self::ErrorIndexOutOfRange { index, pending } => {
                write!(
                    f,
                    "error index {} outside request of {} bindings",
                    index, pending
                )
            }
        }
    }
}

/// The main error type for all snmp-bulk operations.
///
/// # Common Patterns
///
/// ```
/// use snmp_bulk::Error;
///
/// fn is_transport_failure(error: &Error) -> bool {
///     matches!(error, Error::Timeout { .. } | Error::Network { .. })
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network failure reported by the session.
    #[error("network error: {source}")]
    Network {
        #[source]
        source: std::io::Error,
    },

    /// Session gave up waiting for a response.
    #[error("timeout waiting for request {request_id} ({retries} retries)")]
    Timeout { request_id: i32, retries: u32 },

    /// Response could not be reconciled with the round in flight.
    #[error("malformed response to request {request_id}: {kind}")]
    MalformedResponse { request_id: i32, kind: MalformedKind },

    /// Controller step called in the wrong round state.
    #[error("cannot {action} while {state}")]
    InvalidState {
        state: RoundState,
        action: &'static str,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),

    /// Invalid OID format.
    #[error("invalid OID: {0}")]
    InvalidOid(Box<str>),

    /// Operation task ended without delivering a result.
    #[error("bulk operation abandoned before completion")]
    Abandoned,
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub(crate) fn config(msg: impl Into<Box<str>>) -> Box<Self> {
        Error::Config(msg.into()).boxed()
    }

    pub(crate) fn malformed(request_id: i32, kind: MalformedKind) -> Box<Self> {
        tracing::warn!(target: "snmp_bulk::error", { snmp.request_id = request_id, %kind }, "malformed response");
        Error::MalformedResponse { request_id, kind }.boxed()
    }
}

/// SNMP protocol error status codes (RFC 3416).
///
/// Returned by agents in the error-status field of a response. For GetBulk
/// the interesting ones are the v1 codes (`tooBig`, `noSuchName`, `genErr`)
/// and access errors, but all codes are carried through into the result map.
///
/// # Example
///
/// ```
/// use snmp_bulk::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(2);
/// assert_eq!(status, ErrorStatus::NoSuchName);
/// assert_eq!(status.as_i32(), 2);
/// assert_eq!(status.to_string(), "noSuchName");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2).
    NoSuchName,
    /// Invalid value (status = 3).
    BadValue,
    /// Read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// Wrong ASN.1 type (status = 7).
    WrongType,
    /// Wrong length (status = 8).
    WrongLength,
    /// Wrong encoding (status = 9).
    WrongEncoding,
    /// Value out of range or otherwise invalid (status = 10).
    WrongValue,
    /// Object does not support row creation (status = 11).
    NoCreation,
    /// Value is inconsistent with other managed objects (status = 12).
    InconsistentValue,
    /// Resource unavailable (status = 13).
    ResourceUnavailable,
    /// Commit phase failed (status = 14).
    CommitFailed,
    /// Undo phase failed (status = 15).
    UndoFailed,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Object does not support modification (status = 17).
    NotWritable,
    /// Named object cannot be created (status = 18).
    InconsistentName,
    /// Unknown or future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => {
                tracing::warn!(target: "snmp_bulk::error", { snmp.error_status = other }, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}
