//! EAP-TLS Encapsulation Layer
//!
//! This crate implements the framing layer an EAP authentication server uses
//! to carry a TLS handshake inside EAP packets (RFC 5216): it classifies every
//! incoming EAP-TLS packet into a protocol state, extracts and reassembles
//! fragmented TLS messages, and fragments outgoing TLS data to fit within a
//! maximum EAP payload size. The TLS handshake engine itself and the generic
//! EAP request/response transport are external collaborators reached through
//! the seams in [`session`].
//!
//! # TLS Packet Format in EAP
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Code      |   Identifier  |            Length             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Type      |     Flags     |      TLS Message Length
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     TLS Message Length        |       TLS Data...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The four-octet TLS Message Length field is present only when the
//! Length-Included (L) flag is set.
//!
//! # Example
//!
//! ```rust
//! use eaptls_proto::packet::{EapPacket, EapRound};
//! use eaptls_proto::verify::{verify, EapTlsStatus};
//!
//! // A complete, unfragmented EAP-TLS response (flags byte zero).
//! let response = EapPacket::tls_response(7, vec![0x00, 0x16, 0x03, 0x03]);
//! let round = EapRound::with_response(response);
//!
//! assert_eq!(verify(&round, None), EapTlsStatus::Ok);
//! ```

pub mod compose;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod packet;
pub mod record;
pub mod session;
pub mod verify;

pub use compose::{fail, request, send_ack, start, success};
pub use dispatch::{ack_handler, operation, process};
pub use error::EapTlsError;
pub use extract::extract;
pub use packet::{EapCode, EapPacket, EapRound, EapTlsPacket, EapType, TlsFlags, TlsReply};
pub use record::Record;
pub use session::{ContentType, HandshakeType, TlsEngine, TlsInfo, TlsSession};
pub use verify::{verify, EapTlsStatus};
