//! Packet extraction.
//!
//! Turns a classified EAP packet into a normalized [`EapTlsPacket`]. The
//! extractor performs no session mutation; the returned packet is owned by
//! the caller.

use crate::error::EapTlsError;
use crate::packet::{EapRound, EapTlsPacket, TlsFlags};
use crate::verify::EapTlsStatus;

/// Offset of the TLS data when the L flag is set: flags byte plus the
/// four-octet TLS Message Length field.
const LENGTH_INCLUDED_OFFSET: usize = 5;

/// Extract the EAP-TLS packet from the current round's response.
///
/// Field derivation:
/// - `code` and `id` are copied verbatim from the EAP packet;
/// - `length` is the EAP length minus the one-byte type field;
/// - `flags` is the first type-data byte, forced to zero for an ack;
/// - when the L flag is set, the advertised total message length is recorded
///   on the packet but never used to size the data copy — the data is
///   whatever bytes the fragment actually carries.
///
/// Returns `Ok(None)` for [`EapTlsStatus::Invalid`]; the caller must not
/// proceed to dispatch. Fails with [`EapTlsError::OutOfMemory`] when the data
/// copy cannot be allocated.
pub fn extract(
    current: &EapRound,
    status: EapTlsStatus,
) -> Result<Option<EapTlsPacket>, EapTlsError> {
    if status == EapTlsStatus::Invalid {
        return Ok(None);
    }

    let response = current.response.as_ref().ok_or(EapTlsError::MissingResponse)?;
    let type_data = response.type_data.as_slice();

    // An ack carries no payload to read flags from.
    let flags = if status == EapTlsStatus::Ack {
        TlsFlags::default()
    } else {
        TlsFlags::from_u8(type_data.first().copied().unwrap_or(0))
    };

    let (message_length, payload) = match status {
        EapTlsStatus::FirstFragment
        | EapTlsStatus::LengthIncluded
        | EapTlsStatus::MoreFragmentsWithLength => {
            if type_data.len() < LENGTH_INCLUDED_OFFSET {
                return Err(EapTlsError::PacketTooShort {
                    expected: LENGTH_INCLUDED_OFFSET,
                    actual: type_data.len(),
                });
            }
            let advertised =
                u32::from_be_bytes([type_data[1], type_data[2], type_data[3], type_data[4]]);
            (Some(advertised), &type_data[LENGTH_INCLUDED_OFFSET..])
        }

        EapTlsStatus::MoreFragments | EapTlsStatus::Ok => {
            // No length field: data begins right after the flags byte.
            let payload = if type_data.is_empty() {
                &[][..]
            } else {
                &type_data[1..]
            };
            (None, payload)
        }

        EapTlsStatus::Ack => (None, &[][..]),

        // Outbound-only verdicts never reach the extractor.
        _ => return Err(EapTlsError::UnexpectedStatus(status)),
    };

    let mut data = Vec::new();
    data.try_reserve_exact(payload.len())
        .map_err(|_| EapTlsError::OutOfMemory)?;
    data.extend_from_slice(payload);

    Ok(Some(EapTlsPacket {
        code: response.code,
        id: response.id,
        length: response.length.saturating_sub(1), // EAP-Type is one octet
        flags,
        message_length,
        data,
    }))
}
