//! Packet classification.
//!
//! Every incoming packet is classified against the previous round's
//! request/response pair before anything is parsed out of it. The wire
//! protocol has no sequence numbers: a first fragment is recognized by the
//! absence of continuation state in the prior round, and an ack is only valid
//! when it echoes the identifier of the request still outstanding.

use tracing::{error, info};

use crate::packet::{EapCode, EapRound, EapType, TlsFlags, EAP_HEADER_LEN};

/// Classifier verdict for one EAP-TLS packet, plus the outbound verdicts the
/// ack handler produces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EapTlsStatus {
    /// Malformed or unexpected input; no reply is sent.
    Invalid,
    /// Fragment acknowledgement matching the outstanding request.
    Ack,
    /// Outbound: EAP-TLS Start sent to the peer.
    Start,
    /// Outbound: terminal EAP-Success sent.
    Success,
    /// Outbound: terminal EAP-Failure sent.
    Fail,
    /// Outbound: next data-bearing request sent.
    Request,
    /// Nothing to do (e.g. ack while the handshake is still in flight).
    Noop,
    /// First fragment of a fragmented message (L and M set, no prior
    /// continuation).
    FirstFragment,
    /// Continuation fragment (M set, no length field).
    MoreFragments,
    /// Continuation fragment that restates the total length (L and M set).
    /// Tolerated, not required.
    MoreFragmentsWithLength,
    /// Complete single-packet message that advertises its length (L set).
    LengthIncluded,
    /// Complete single-packet message with no flags set.
    Ok,
}

/// Classify the packet received in `current` against the previous round.
///
/// `previous` is absent on the first packet of a session. The ladder follows
/// RFC 5216: the L bit must be set on the first fragment of a fragmented
/// message, the M bit on all but the last fragment, and the S bit only ever
/// appears on server-originated Start messages.
pub fn verify(current: &EapRound, previous: Option<&EapRound>) -> EapTlsStatus {
    let Some(response) = current.response.as_ref() else {
        error!("corrupted data: no response packet in current round");
        return EapTlsStatus::Invalid;
    };

    if response.code != EapCode::Response
        || response.length < EAP_HEADER_LEN
        || response.eap_type != Some(EapType::Tls)
    {
        error!(
            code = response.code.as_u8(),
            length = response.length,
            "corrupted data: not a well-formed EAP-TLS response"
        );
        return EapTlsStatus::Invalid;
    }

    // Ack: exactly header + type byte, and either no type-data at all or a
    // zero flags byte. Valid only as a reply to the request still outstanding.
    if response.length == EAP_HEADER_LEN + 1
        && response.type_data.first().is_none_or(|&flags| flags == 0)
    {
        let outstanding = previous.and_then(|prev| prev.request.as_ref());
        return match outstanding {
            Some(request) if request.id == response.id => {
                info!(id = response.id, "received EAP-TLS ack");
                EapTlsStatus::Ack
            }
            _ => {
                error!(id = response.id, "received invalid EAP-TLS ack");
                EapTlsStatus::Invalid
            }
        };
    }

    let Some(&flags_byte) = response.type_data.first() else {
        // Declared length promises a flags byte the type-data does not have.
        error!("corrupted data: missing EAP-TLS flags byte");
        return EapTlsStatus::Invalid;
    };
    let flags = TlsFlags::from_u8(flags_byte);

    // Only the server sends Start.
    if flags.start() {
        error!("received EAP-TLS Start from peer");
        return EapTlsStatus::Invalid;
    }

    if flags.length_included() {
        if flags.more_fragments() {
            // First fragment iff the prior round carried no continuation:
            // either no response was received yet, or its M bit was clear
            // (a last fragment never has M set).
            let prev_more = previous
                .and_then(|prev| prev.response.as_ref())
                .and_then(|resp| resp.type_data.first())
                .map(|&byte| TlsFlags::from_u8(byte).more_fragments())
                .unwrap_or(false);

            return if prev_more {
                info!("received continuation fragment with length included");
                EapTlsStatus::MoreFragmentsWithLength
            } else {
                info!("received first fragment of EAP-TLS message");
                EapTlsStatus::FirstFragment
            };
        }
        info!("received complete EAP-TLS message with length included");
        return EapTlsStatus::LengthIncluded;
    }

    if flags.more_fragments() {
        info!("more EAP-TLS fragments to follow");
        return EapTlsStatus::MoreFragments;
    }

    // No flags set, but a valid EAP-TLS packet.
    EapTlsStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::EapPacket;

    fn fragment_response(id: u8, flags: u8, total_len: u32, data: &[u8]) -> EapPacket {
        let mut type_data = vec![flags];
        if TlsFlags::from_u8(flags).length_included() {
            type_data.extend_from_slice(&total_len.to_be_bytes());
        }
        type_data.extend_from_slice(data);
        EapPacket::tls_response(id, type_data)
    }

    fn round_with_request(id: u8) -> EapRound {
        EapRound {
            response: None,
            request: Some(EapPacket::new(
                EapCode::Request,
                id,
                Some(EapType::Tls),
                vec![0x00],
            )),
        }
    }

    #[test]
    fn test_missing_response_is_invalid() {
        let round = EapRound::default();
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_wrong_code_is_invalid() {
        let mut packet = EapPacket::tls_response(1, vec![0x00, 1]);
        packet.code = EapCode::Request;
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_truncated_length_is_invalid() {
        let mut packet = EapPacket::tls_response(1, vec![0x00, 1]);
        packet.length = 3; // Shorter than the fixed EAP header
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let packet = EapPacket::new(EapCode::Response, 1, Some(EapType::Identity), vec![0x00]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_ack_matching_outstanding_request() {
        // Scenario: previous request id 7, ack with id 7 -> Ack; id 8 -> Invalid.
        let previous = round_with_request(7);

        let round = EapRound::with_response(EapPacket::ack_response(7));
        assert_eq!(verify(&round, Some(&previous)), EapTlsStatus::Ack);

        let round = EapRound::with_response(EapPacket::ack_response(8));
        assert_eq!(verify(&round, Some(&previous)), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_ack_without_previous_round_is_invalid() {
        let round = EapRound::with_response(EapPacket::ack_response(3));
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_start_from_peer_is_invalid() {
        let packet = fragment_response(2, TlsFlags::START, 0, &[]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::Invalid);
    }

    #[test]
    fn test_first_fragment_without_previous() {
        let flags = TlsFlags::LENGTH_INCLUDED | TlsFlags::MORE_FRAGMENTS;
        let packet = fragment_response(5, flags, 1000, &[0xAA; 300]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::FirstFragment);
    }

    #[test]
    fn test_first_fragment_after_completed_message() {
        // Previous response had no M bit, so L+M starts a new message.
        let flags = TlsFlags::LENGTH_INCLUDED | TlsFlags::MORE_FRAGMENTS;
        let previous = EapRound::with_response(fragment_response(4, 0x00, 0, &[1, 2]));
        let packet = fragment_response(5, flags, 1000, &[0xAA; 300]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, Some(&previous)), EapTlsStatus::FirstFragment);
    }

    #[test]
    fn test_continuation_with_length_included() {
        let flags = TlsFlags::LENGTH_INCLUDED | TlsFlags::MORE_FRAGMENTS;
        let previous = EapRound::with_response(fragment_response(4, flags, 1000, &[0xAA; 300]));
        let packet = fragment_response(5, flags, 1000, &[0xBB; 300]);
        let round = EapRound::with_response(packet);
        assert_eq!(
            verify(&round, Some(&previous)),
            EapTlsStatus::MoreFragmentsWithLength
        );
    }

    #[test]
    fn test_length_included_alone() {
        let packet = fragment_response(5, TlsFlags::LENGTH_INCLUDED, 4, &[1, 2, 3, 4]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::LengthIncluded);
    }

    #[test]
    fn test_more_fragments_alone() {
        let packet = fragment_response(5, TlsFlags::MORE_FRAGMENTS, 0, &[1, 2, 3]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::MoreFragments);
    }

    #[test]
    fn test_no_flags_is_complete_message() {
        let packet = fragment_response(5, 0x00, 0, &[1, 2, 3]);
        let round = EapRound::with_response(packet);
        assert_eq!(verify(&round, None), EapTlsStatus::Ok);
    }
}
