use crate::codec::{CodecError, decode_bytes, decode_u8};
use crate::datatypes::{GsmTimestamp, TypeOfAddress, decode_address, decode_timestamp};
use std::io::Cursor;

/// SMS-STATUS-REPORT: outcome of a previously submitted message.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusReport {
    /// TP-MR of the SMS-SUBMIT this report refers to
    pub message_reference: u8,
    /// TP-RA
    pub recipient: String,
    /// International when the recipient starts with `+`, unknown otherwise
    pub recipient_type: TypeOfAddress,
    /// TP-SCTS
    pub service_centre_timestamp: String,
    /// TP-DT
    pub discharge_time: String,
    /// TP-ST (3GPP TS 23.040 9.2.3.15)
    pub status: u8,
}

impl StatusReport {
    /// Whether TP-ST reports a completed delivery (0x00-0x1F).
    pub fn is_delivered(&self) -> bool {
        self.status < 0x20
    }

    pub(crate) fn decode_tpdu(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_reference = decode_u8(buf)?;
        tracing::debug!("TP-MR: {}", message_reference);

        let recipient = decode_address(buf)?;
        let recipient_type = if recipient.starts_with('+') {
            TypeOfAddress::INTERNATIONAL
        } else {
            TypeOfAddress::UNKNOWN
        };
        tracing::debug!("TP-RA: {}", recipient);

        let service_centre_timestamp = decode_timestamp(&decode_bytes(buf, GsmTimestamp::SIZE)?);
        let discharge_time = decode_timestamp(&decode_bytes(buf, GsmTimestamp::SIZE)?);
        tracing::debug!("TP-SCTS: {}, TP-DT: {}", service_centre_timestamp, discharge_time);

        let status = decode_u8(buf)?;
        tracing::debug!("TP-ST: {}", status);

        Ok(StatusReport {
            message_reference,
            recipient,
            recipient_type,
            service_centre_timestamp,
            discharge_time,
            status,
        })
    }
}
