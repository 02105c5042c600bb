//! EAP and EAP-TLS packet structures.
//!
//! Two views of the wire exist here. [`EapPacket`] is the transport view: the
//! fields the generic EAP layer hands over per packet (code, identifier, the
//! length as received, type, type-data), paired into an [`EapRound`] holding
//! one response and the request slot the composer fills. [`EapTlsPacket`] is
//! the normalized EAP-TLS view produced by the extractor once a packet has
//! been classified. [`TlsReply`] is the outbound intent fed to the composer.

/// Fixed EAP header length: code + identifier + length (RFC 3748).
pub const EAP_HEADER_LEN: u16 = 4;

/// EAP packet code (first byte of EAP packet)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EapCode {
    /// Request packet (Code 1)
    Request = 1,
    /// Response packet (Code 2)
    Response = 2,
    /// Success packet (Code 3)
    Success = 3,
    /// Failure packet (Code 4)
    Failure = 4,
}

impl EapCode {
    /// Convert from u8 to EapCode
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(EapCode::Request),
            2 => Some(EapCode::Response),
            3 => Some(EapCode::Success),
            4 => Some(EapCode::Failure),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// EAP method types this layer can meet on the wire.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EapType {
    /// Identity (Type 1) - RFC 3748
    Identity = 1,
    /// Nak (Type 3) - RFC 3748
    Nak = 3,
    /// EAP-TLS (Type 13) - RFC 5216
    Tls = 13,
}

impl EapType {
    /// Convert from u8 to EapType
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(EapType::Identity),
            3 => Some(EapType::Nak),
            13 => Some(EapType::Tls),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One EAP packet as seen by the generic transport.
///
/// Unlike a parser-owned representation, `length` stores the value from the
/// wire rather than recomputing it, so the classifier can reject packets whose
/// declared length is shorter than the fixed EAP header.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapPacket {
    /// EAP code (Request, Response, Success, Failure)
    pub code: EapCode,
    /// Identifier for matching requests and responses (0-255)
    pub id: u8,
    /// Total EAP length as received (header + type + type-data)
    pub length: u16,
    /// EAP type (absent on Success/Failure)
    pub eap_type: Option<EapType>,
    /// Type-specific data; for EAP-TLS this starts with the flags byte
    pub type_data: Vec<u8>,
}

impl EapPacket {
    /// Create a packet with the length computed from its fields.
    pub fn new(code: EapCode, id: u8, eap_type: Option<EapType>, type_data: Vec<u8>) -> Self {
        let length = match eap_type {
            Some(_) => EAP_HEADER_LEN + 1 + type_data.len() as u16,
            None => EAP_HEADER_LEN,
        };
        EapPacket {
            code,
            id,
            length,
            eap_type,
            type_data,
        }
    }

    /// Create an EAP-TLS response carrying the given type-data.
    pub fn tls_response(id: u8, type_data: Vec<u8>) -> Self {
        EapPacket::new(EapCode::Response, id, Some(EapType::Tls), type_data)
    }

    /// Create a fragment-acknowledgement response: EAP-TLS type with no
    /// flags byte and no data.
    pub fn ack_response(id: u8) -> Self {
        EapPacket::new(EapCode::Response, id, Some(EapType::Tls), Vec::new())
    }
}

/// One request/response round at the generic EAP layer.
///
/// The transport stores the peer's packet in `response`; the composer fills
/// `request` with the reply to send. The previous round's pair is what the
/// classifier consults to recognize acks and continuation fragments.
#[derive(Debug, Default, Clone)]
pub struct EapRound {
    /// The packet received from the peer this round.
    pub response: Option<EapPacket>,
    /// The reply to send, produced by the composer.
    pub request: Option<EapPacket>,
}

impl EapRound {
    /// Start a round from a received packet, with an empty request slot.
    pub fn with_response(response: EapPacket) -> Self {
        EapRound {
            response: Some(response),
            request: None,
        }
    }
}

/// EAP-TLS flags (first byte of Type-Data)
///
/// ```text
///  0 1 2 3 4 5 6 7
/// +-+-+-+-+-+-+-+-+
/// |L M S R R R R R|
/// +-+-+-+-+-+-+-+-+
/// ```
///
/// - L (Length included) = 0x80
/// - M (More fragments) = 0x40
/// - S (Start) = 0x20
/// - R (Reserved) = Must be zero
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TlsFlags(u8);

impl TlsFlags {
    /// Length included flag (L bit)
    pub const LENGTH_INCLUDED: u8 = 0x80;
    /// More fragments flag (M bit)
    pub const MORE_FRAGMENTS: u8 = 0x40;
    /// EAP-TLS start flag (S bit)
    pub const START: u8 = 0x20;

    /// Create new TLS flags
    pub fn new(length_included: bool, more_fragments: bool, start: bool) -> Self {
        let mut flags = 0u8;
        if length_included {
            flags |= Self::LENGTH_INCLUDED;
        }
        if more_fragments {
            flags |= Self::MORE_FRAGMENTS;
        }
        if start {
            flags |= Self::START;
        }
        TlsFlags(flags)
    }

    /// Create from raw byte
    pub fn from_u8(value: u8) -> Self {
        TlsFlags(value & 0xE0) // Mask reserved bits
    }

    /// Get raw byte value
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Check if Length included flag is set
    pub fn length_included(self) -> bool {
        (self.0 & Self::LENGTH_INCLUDED) != 0
    }

    /// Check if More fragments flag is set
    pub fn more_fragments(self) -> bool {
        (self.0 & Self::MORE_FRAGMENTS) != 0
    }

    /// Check if Start flag is set
    pub fn start(self) -> bool {
        (self.0 & Self::START) != 0
    }
}

/// Normalized representation of one parsed EAP-TLS packet.
///
/// Built by the extractor after classification. `data` holds the TLS bytes of
/// this packet only; reassembly of a fragmented message happens in the
/// session's inbound buffer, not here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapTlsPacket {
    /// Outer EAP code, copied verbatim.
    pub code: EapCode,
    /// EAP identifier, copied verbatim.
    pub id: u8,
    /// EAP-TLS layer length: the EAP length minus the one-byte type field.
    pub length: u16,
    /// Flags byte; forced to zero for acks, which carry none.
    pub flags: TlsFlags,
    /// Advertised total length of the fragmented message, when the L flag
    /// was set. Informational only; buffers grow as fragments arrive.
    pub message_length: Option<u32>,
    /// TLS bytes carried by this packet. May be empty.
    pub data: Vec<u8>,
}

/// Outbound message intent handed to the composer.
///
/// Each variant carries only the fields it needs; the composer derives the
/// flags byte, the outer EAP code, and the identifier from the variant and
/// the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsReply {
    /// Server-originated EAP-TLS Start (S flag, no data).
    Start,
    /// Fragment acknowledgement (no flags, no data).
    Ack,
    /// Terminal EAP-Success.
    Success,
    /// Terminal EAP-Failure.
    Fail,
    /// Data-bearing request: a 4-byte big-endian length field followed by
    /// one fragment of TLS bytes.
    Request {
        /// Set when unconsumed outbound bytes remain after this fragment.
        more_fragments: bool,
        /// Length field plus fragment data, ready to follow the flags byte.
        payload: Vec<u8>,
    },
}

impl TlsReply {
    /// Flags byte for this reply.
    pub fn flags(&self) -> TlsFlags {
        match self {
            TlsReply::Start => TlsFlags::new(false, false, true),
            TlsReply::Request { more_fragments, .. } => {
                TlsFlags::new(true, *more_fragments, false)
            }
            TlsReply::Ack | TlsReply::Success | TlsReply::Fail => TlsFlags::default(),
        }
    }

    /// Outer EAP code this reply is carried in.
    pub fn outer_code(&self) -> EapCode {
        match self {
            TlsReply::Start | TlsReply::Ack | TlsReply::Request { .. } => EapCode::Request,
            TlsReply::Success => EapCode::Success,
            TlsReply::Fail => EapCode::Failure,
        }
    }

    /// Bytes following the flags byte. Empty for everything but `Request`.
    pub fn payload(&self) -> &[u8] {
        match self {
            TlsReply::Request { payload, .. } => payload,
            _ => &[],
        }
    }
}
