//! Reassembly and dispatch.
//!
//! The dispatcher owns all session mutation: it appends extracted fragment
//! data to the inbound buffer, decides between acknowledging and handing the
//! complete message to the TLS engine, drives the next outbound action, and
//! releases the session on terminal verdicts.

use tracing::{debug, error};

use crate::compose;
use crate::error::EapTlsError;
use crate::extract::extract;
use crate::packet::{EapRound, EapTlsPacket};
use crate::session::{ContentType, HandshakeType, TlsEngine, TlsSession};
use crate::verify::{verify, EapTlsStatus};

/// Apply one extracted packet to the session.
///
/// Fragment verdicts append the data and acknowledge, leaving `dirty_in`
/// intact for the fragments still to come. Complete-message verdicts append
/// the final piece, hand the accumulated bytes to the engine, frame the next
/// request from whatever the engine produced, and only then reset
/// `dirty_in`. Resetting earlier would lose partial data, which is why the
/// reset lives on this path alone.
pub fn operation<E: TlsEngine>(
    packet: &EapTlsPacket,
    status: EapTlsStatus,
    round: &mut EapRound,
    session: &mut TlsSession,
    engine: &mut E,
) -> Result<(), EapTlsError> {
    session.dirty_in.append(&packet.data);

    match status {
        EapTlsStatus::FirstFragment
        | EapTlsStatus::MoreFragments
        | EapTlsStatus::MoreFragmentsWithLength => {
            debug!(
                buffered = session.dirty_in.used(),
                "fragment stored, acknowledging"
            );
            compose::send_ack(round)
        }

        EapTlsStatus::LengthIncluded | EapTlsStatus::Ok => {
            engine.handshake_receive(session)?;
            compose::request(round, session)?;
            session.dirty_in.reset();
            Ok(())
        }

        _ => Err(EapTlsError::UnexpectedStatus(status)),
    }
}

/// Decide what an acknowledgement is for and act on it.
///
/// The ack acknowledges one of three things sent earlier: a handshake
/// Finished message (send EAP-Success), an alert (send EAP-Failure), or a
/// fragment (send the next one). Terminal verdicts take the session out of
/// the caller's slot, releasing it exactly once; after that no further
/// buffer mutation is possible.
pub fn ack_handler(
    round: &mut EapRound,
    session: &mut Option<TlsSession>,
) -> Result<EapTlsStatus, EapTlsError> {
    let Some(tls) = session.as_mut() else {
        return Ok(EapTlsStatus::Noop);
    };
    let info = tls.info;
    if !info.origin {
        return Ok(EapTlsStatus::Noop);
    }

    match info.content_type {
        Some(ContentType::Alert) => {
            compose::fail(round)?;
            *session = None;
            Ok(EapTlsStatus::Fail)
        }

        Some(ContentType::Handshake)
            if info.handshake_type == Some(HandshakeType::Finished) =>
        {
            compose::success(round)?;
            *session = None;
            Ok(EapTlsStatus::Success)
        }

        // Handshake still in progress: the ack is for a fragment sent
        // earlier, serve the next one.
        _ => {
            compose::request(round, tls)?;
            Ok(EapTlsStatus::Request)
        }
    }
}

/// Process one inbound packet end to end: classify, then either route the
/// ack, drop invalid input with no reply, or extract and dispatch.
///
/// Returns the classification that drove the action, so the caller can
/// observe terminal Success/Fail verdicts.
pub fn process<E: TlsEngine>(
    round: &mut EapRound,
    previous: Option<&EapRound>,
    session: &mut Option<TlsSession>,
    engine: &mut E,
) -> Result<EapTlsStatus, EapTlsError> {
    let status = verify(round, previous);

    match status {
        EapTlsStatus::Invalid => Ok(EapTlsStatus::Invalid),

        EapTlsStatus::Ack => ack_handler(round, session),

        _ => {
            let Some(packet) = extract(round, status)? else {
                return Ok(EapTlsStatus::Invalid);
            };
            let Some(tls) = session.as_mut() else {
                error!("EAP-TLS data packet for a session that no longer exists");
                return Ok(EapTlsStatus::Invalid);
            };
            operation(&packet, status, round, tls, engine)?;
            Ok(status)
        }
    }
}
