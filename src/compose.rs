//! Outbound composition and fragmentation.
//!
//! The builders here produce the four empty-payload packet kinds (Start,
//! Ack, Success, Fail) and the data-bearing Request, possibly fragmented.
//! Everything funnels through [`compose`], the single encode point that maps
//! message intent onto the generic transport's request slot and owns the
//! identifier rule.

use tracing::{debug, info};

use crate::error::EapTlsError;
use crate::packet::{EapCode, EapPacket, EapRound, EapType, TlsReply, EAP_HEADER_LEN};
use crate::session::TlsSession;

/// Size of the TLS Message Length field prefixed to each outbound fragment.
const TLS_LENGTH_FIELD: usize = 4;

/// Encode a reply into the round's request slot.
///
/// The flags byte is written first, followed by the reply's payload;
/// Ack/Start/Request are carried in an outer EAP-Request, Success and Fail
/// in EAP-Success and EAP-Failure, which carry no type-data at all.
///
/// The outgoing identifier is decided here and nowhere else: an explicit
/// nonzero `id` wins, otherwise the incoming response's identifier plus one.
/// On failure the round's existing request is left untouched.
pub fn compose(round: &mut EapRound, reply: &TlsReply, id: Option<u8>) -> Result<(), EapTlsError> {
    let response = round.response.as_ref().ok_or(EapTlsError::MissingResponse)?;
    let id = match id {
        Some(explicit) if explicit != 0 => explicit,
        _ => response.id.wrapping_add(1),
    };

    let request = match reply.outer_code() {
        EapCode::Success | EapCode::Failure => EapPacket {
            code: reply.outer_code(),
            id,
            length: EAP_HEADER_LEN,
            eap_type: None,
            type_data: Vec::new(),
        },
        _ => {
            let payload = reply.payload();
            let mut type_data = Vec::new();
            type_data
                .try_reserve_exact(1 + payload.len())
                .map_err(|_| EapTlsError::OutOfMemory)?;
            type_data.push(reply.flags().as_u8());
            type_data.extend_from_slice(payload);

            EapPacket {
                code: EapCode::Request,
                id,
                length: EAP_HEADER_LEN + 1 + type_data.len() as u16,
                eap_type: Some(EapType::Tls),
                type_data,
            }
        }
    };

    round.request = Some(request);
    Ok(())
}

/// Send the EAP-TLS Start message.
///
/// The S flag is set only within the Start message sent from the EAP server
/// to the peer; it is what differentiates Start from a fragment
/// acknowledgement.
pub fn start(round: &mut EapRound) -> Result<(), EapTlsError> {
    info!("sending EAP-TLS Start");
    compose(round, &TlsReply::Start, None)
}

/// Acknowledge a fragment so the peer sends the next one.
///
/// The ack is an EAP-Request with EAP-Type=TLS and no data; the incremented
/// identifier is what the peer must echo on the following fragment.
pub fn send_ack(round: &mut EapRound) -> Result<(), EapTlsError> {
    debug!("sending EAP-TLS fragment ack");
    compose(round, &TlsReply::Ack, None)
}

/// Send the terminal EAP-Success.
pub fn success(round: &mut EapRound) -> Result<(), EapTlsError> {
    info!("sending EAP-Success");
    compose(round, &TlsReply::Success, None)
}

/// Send the terminal EAP-Failure.
pub fn fail(round: &mut EapRound) -> Result<(), EapTlsError> {
    info!("sending EAP-Failure");
    compose(round, &TlsReply::Fail, None)
}

/// Frame the next fragment of outbound TLS data into an EAP-Request.
///
/// Takes at most `session.fragment_size` bytes from the head of `dirty_out`;
/// the M flag is set when unconsumed bytes remain. Every data request sets
/// the L flag and prefixes a four-octet length field holding the size of
/// this fragment. `dirty_out` keeps its unconsumed tail, so a retransmitted
/// request is re-served from where fragmentation left off.
pub fn request(round: &mut EapRound, session: &mut TlsSession) -> Result<(), EapTlsError> {
    if round.response.is_none() {
        return Err(EapTlsError::MissingResponse);
    }

    let used = session.dirty_out.used();
    let size = used.min(session.fragment_size);
    let more_fragments = used > size;

    let mut payload = Vec::new();
    payload
        .try_reserve_exact(TLS_LENGTH_FIELD + size)
        .map_err(|_| EapTlsError::OutOfMemory)?;
    payload.extend_from_slice(&(size as u32).to_be_bytes());
    payload.extend_from_slice(&session.dirty_out.take(size));

    debug!(size, more_fragments, "sending EAP-TLS request fragment");
    compose(
        round,
        &TlsReply::Request {
            more_fragments,
            payload,
        },
        None,
    )
}
