//! Error taxonomy for the EAP-TLS encapsulation layer.
//!
//! Malformed wire input is not an error: the classifier reports it as
//! [`EapTlsStatus::Invalid`](crate::verify::EapTlsStatus::Invalid) and the
//! caller decides whether to drop or terminate. The variants here cover
//! resource exhaustion and contract violations between components.

use thiserror::Error;

use crate::verify::EapTlsStatus;

/// Errors raised while extracting, composing, or dispatching EAP-TLS packets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EapTlsError {
    #[error("packet too short: expected at least {expected} bytes, got {actual}")]
    PacketTooShort { expected: usize, actual: usize },

    #[error("no response packet present in the current round")]
    MissingResponse,

    #[error("out of memory")]
    OutOfMemory,

    #[error("status {0:?} does not carry an inbound packet")]
    UnexpectedStatus(EapTlsStatus),

    #[error("TLS engine error: {0}")]
    Engine(String),
}
