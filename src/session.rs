//! Per-session state and the seam to the external TLS handshake engine.
//!
//! One [`TlsSession`] exists per authentication attempt. It is created by the
//! surrounding authentication handler before the first packet and released by
//! the dispatcher exactly once, on transition to a terminal Success or Fail
//! state. Only the dispatcher mutates its buffers.

use crate::error::EapTlsError;
use crate::record::Record;

/// Default maximum number of TLS bytes placed into one outbound fragment.
pub const DEFAULT_FRAGMENT_SIZE: usize = 1024;

/// TLS record content types the ack path inspects.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    /// ChangeCipherSpec (20)
    ChangeCipherSpec = 20,
    /// Alert (21)
    Alert = 21,
    /// Handshake (22)
    Handshake = 22,
    /// ApplicationData (23)
    ApplicationData = 23,
}

impl ContentType {
    /// Convert from u8 to ContentType
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// TLS handshake message types.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandshakeType {
    /// HelloRequest (0)
    HelloRequest = 0,
    /// ClientHello (1)
    ClientHello = 1,
    /// ServerHello (2)
    ServerHello = 2,
    /// Certificate (11)
    Certificate = 11,
    /// ServerKeyExchange (12)
    ServerKeyExchange = 12,
    /// CertificateRequest (13)
    CertificateRequest = 13,
    /// ServerHelloDone (14)
    ServerHelloDone = 14,
    /// CertificateVerify (15)
    CertificateVerify = 15,
    /// ClientKeyExchange (16)
    ClientKeyExchange = 16,
    /// Finished (20)
    Finished = 20,
}

impl HandshakeType {
    /// Convert from u8 to HandshakeType
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(HandshakeType::HelloRequest),
            1 => Some(HandshakeType::ClientHello),
            2 => Some(HandshakeType::ServerHello),
            11 => Some(HandshakeType::Certificate),
            12 => Some(HandshakeType::ServerKeyExchange),
            13 => Some(HandshakeType::CertificateRequest),
            14 => Some(HandshakeType::ServerHelloDone),
            15 => Some(HandshakeType::CertificateVerify),
            16 => Some(HandshakeType::ClientKeyExchange),
            20 => Some(HandshakeType::Finished),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Classification of the last TLS record the handshake engine processed.
///
/// The engine updates this after every delivery; the ack handler reads it to
/// decide between sending the next fragment, EAP-Success, or EAP-Failure.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TlsInfo {
    /// False until the engine has processed at least one record. An ack
    /// arriving before then means nothing and is answered with Noop.
    pub origin: bool,
    /// Content type of the last record seen.
    pub content_type: Option<ContentType>,
    /// Handshake message type of the last record, when it was a handshake
    /// record.
    pub handshake_type: Option<HandshakeType>,
}

/// Per-authentication-attempt state mutated exclusively by the dispatcher.
#[derive(Debug, Default, Clone)]
pub struct TlsSession {
    /// Inbound TLS bytes accumulating across fragments.
    pub dirty_in: Record,
    /// Outbound TLS bytes awaiting fragmentation. Not reset until fully
    /// drained, so a re-delivered request is served from the unconsumed tail.
    pub dirty_out: Record,
    /// Maximum TLS bytes placed into one outbound fragment.
    pub fragment_size: usize,
    /// Classification context for the ack path.
    pub info: TlsInfo,
}

impl TlsSession {
    /// Create a session with the given outbound fragment size.
    pub fn new(fragment_size: usize) -> Self {
        TlsSession {
            dirty_in: Record::new(),
            dirty_out: Record::new(),
            fragment_size,
            info: TlsInfo::default(),
        }
    }
}

/// Seam to the external TLS handshake engine.
///
/// Implementations consume the complete reassembled TLS message from
/// `session.dirty_in`, advance their handshake state, place whatever bytes
/// must be sent next into `session.dirty_out`, and update `session.info`
/// with the content classification the ack path depends on. This layer never
/// interprets the TLS bytes itself.
pub trait TlsEngine {
    /// Deliver the reassembled inbound TLS message to the engine.
    fn handshake_receive(&mut self, session: &mut TlsSession) -> Result<(), EapTlsError>;
}
