// ABOUTME: GSM 3GPP TS 23.040 SMS-PDU codec and the decoded message model
// ABOUTME: Dispatches on TP-MTI and shares user-data handling between the TPDU types

mod cell_broadcast;
mod deliver;
mod status_report;
mod submit;

pub use cell_broadcast::CellBroadcast;
pub use deliver::Deliver;
pub use status_report::StatusReport;
pub use submit::Submit;

use crate::codec::{CodecError, Decodable, decode_bytes, decode_u8, skip_bytes};
use crate::config::CodecConfig;
use crate::datatypes::gsm7::packed_len;
use crate::datatypes::{Alphabet, DataCoding, pack7, unpack7};
use crate::request::{EncodeRequest, MessageKind};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// TP-MTI, bits 1-0 of the first octet
pub(crate) const TP_MTI_MASK: u8 = 0x03;
pub(crate) const TP_MTI_DELIVER: u8 = 0x00;
pub(crate) const TP_MTI_SUBMIT: u8 = 0x01;
pub(crate) const TP_MTI_STATUS_REPORT: u8 = 0x02;

/// TP-Status-Report-Request in SMS-SUBMIT
pub(crate) const TP_SRR: u8 = 0x20;
/// TP-User-Data-Header-Indicator
pub(crate) const TP_UDHI: u8 = 0x40;

/// How the payload of a decoded message is to be read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    /// ISO-8859-1 text, unpacked from the 7-bit alphabet
    #[default]
    Text,
    /// Raw 8-bit data
    Binary,
    /// Undecoded PDU
    Pdu,
    /// UCS-2 big-endian code units
    Ucs2,
}

/// A decoded short message
#[derive(Clone, Debug, PartialEq)]
pub enum SmsMessage {
    Deliver(Deliver),
    Submit(Submit),
    StatusReport(StatusReport),
    CellBroadcast(CellBroadcast),
}

impl SmsMessage {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SmsMessage::Deliver(_) => "SMS-DELIVER",
            SmsMessage::Submit(_) => "SMS-SUBMIT",
            SmsMessage::StatusReport(_) => "SMS-STATUS-REPORT",
            SmsMessage::CellBroadcast(_) => "Cell Broadcast",
        }
    }

    /// Originator, destination or recipient, depending on the message kind
    pub fn address(&self) -> Option<&str> {
        match self {
            SmsMessage::Deliver(m) => Some(&m.originator),
            SmsMessage::Submit(m) => Some(&m.destination),
            SmsMessage::StatusReport(m) => Some(&m.recipient),
            SmsMessage::CellBroadcast(_) => None,
        }
    }

    /// Service-centre time stamp, when the message carries one
    pub fn timestamp(&self) -> Option<&str> {
        match self {
            SmsMessage::Deliver(m) => m.timestamp.as_deref(),
            SmsMessage::StatusReport(m) => Some(&m.service_centre_timestamp),
            _ => None,
        }
    }

    pub fn format(&self) -> Option<Format> {
        match self {
            SmsMessage::Deliver(m) => Some(m.format),
            SmsMessage::Submit(m) => Some(m.format),
            SmsMessage::CellBroadcast(m) => Some(m.format),
            SmsMessage::StatusReport(_) => None,
        }
    }

    /// Payload bytes, to be read according to [`format`](SmsMessage::format)
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            SmsMessage::Deliver(m) => Some(&m.data),
            SmsMessage::Submit(m) => Some(&m.data),
            SmsMessage::CellBroadcast(m) => Some(&m.data),
            SmsMessage::StatusReport(_) => None,
        }
    }

    /// Payload rendered as a string for the text formats
    pub fn text(&self) -> Option<String> {
        let data = self.data()?;
        match self.format()? {
            Format::Text => Some(data.iter().copied().map(char::from).collect()),
            Format::Ucs2 => {
                let units: Vec<u16> = data
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                Some(String::from_utf16_lossy(&units))
            }
            Format::Binary | Format::Pdu => None,
        }
    }
}

impl Decodable for SmsMessage {
    fn decode(buf: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Self, CodecError> {
        if config.smsc_info {
            let smsc_length = decode_u8(buf)?;
            skip_bytes(buf, usize::from(smsc_length))?;
        }

        let first_byte = decode_u8(buf)?;
        tracing::debug!("firstByte 0x{:02X}", first_byte);

        match first_byte & TP_MTI_MASK {
            TP_MTI_DELIVER => Ok(SmsMessage::Deliver(Deliver::decode_tpdu(
                first_byte, buf, config,
            )?)),
            TP_MTI_SUBMIT => Ok(SmsMessage::Submit(Submit::decode_tpdu(
                first_byte, buf, config,
            )?)),
            TP_MTI_STATUS_REPORT => Ok(SmsMessage::StatusReport(StatusReport::decode_tpdu(
                buf,
            )?)),
            mti => {
                tracing::error!("Decoding this message is not supported TP-MTI {}", mti);
                Err(CodecError::Unsupported(format!("TP-MTI {mti}")))
            }
        }
    }
}

/// Maps a TP-DCS octet to the alphabet of the user data.
pub(crate) fn alphabet_for(dcs: u8) -> Result<Alphabet, CodecError> {
    let coding = DataCoding::from_byte(dcs);
    tracing::debug!("TP-DCS: {}", coding);
    coding.alphabet().ok_or_else(|| {
        tracing::error!("Message format not supported.");
        CodecError::Unsupported(format!("data coding scheme 0x{dcs:02X}"))
    })
}

/// Reads TP-UDL, the optional header length and TP-UD.
pub(crate) fn decode_user_data(
    buf: &mut Cursor<&[u8]>,
    first_byte: u8,
    alphabet: Alphabet,
    config: &CodecConfig,
) -> Result<(Format, Bytes), CodecError> {
    let udl = usize::from(decode_u8(buf)?);
    let udhl = if first_byte & TP_UDHI != 0 {
        usize::from(decode_u8(buf)?)
    } else {
        0
    };
    tracing::debug!("TP-UDL: {}, TP-UDHL: {}", udl, udhl);

    if udhl != 0 {
        tracing::warn!("Multi part SMS are not available yet");
        return Err(CodecError::Unsupported(
            "concatenated SMS (user data header)".to_string(),
        ));
    }

    match alphabet {
        Alphabet::SevenBit => {
            let chars = (udl * 7).saturating_sub(udhl * 8) / 7;
            if chars == 0 {
                tracing::error!("the message length {} is <= 0", chars);
                return Err(CodecError::Fault("empty 7-bit user data".to_string()));
            }
            let packed = decode_bytes(buf, packed_len(udl))?;
            let text = unpack7(&packed, chars);
            if text.len() > config.max_text_length {
                tracing::error!("Overflow occurs when converting 7bits to 8bits");
                return Err(CodecError::Overflow {
                    field: "user_data",
                    needed: text.len(),
                    capacity: config.max_text_length,
                });
            }
            Ok((Format::Text, Bytes::from(text)))
        }
        Alphabet::EightBit | Alphabet::Ucs2 => {
            if udl > config.max_payload {
                tracing::error!(
                    "Overflow occurs when copying user data {}>{}",
                    udl,
                    config.max_payload
                );
                return Err(CodecError::Overflow {
                    field: "user_data",
                    needed: udl,
                    capacity: config.max_payload,
                });
            }
            let format = if alphabet == Alphabet::Ucs2 {
                Format::Ucs2
            } else {
                Format::Binary
            };
            Ok((format, decode_bytes(buf, udl)?))
        }
    }
}

/// Writes TP-UDL and TP-UD.
///
/// The length octet is reserved first and patched once the septet count
/// is known, since escapes make it larger than the text length.
pub(crate) fn encode_user_data(
    buf: &mut BytesMut,
    payload: &[u8],
    alphabet: Alphabet,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    let udl_position = buf.len();
    buf.put_u8(0);

    let udl = match alphabet {
        Alphabet::SevenBit => {
            let packed = pack7(payload, config.max_payload).inspect_err(|_| {
                tracing::error!("Overflow occurs when converting 8bits to 7bits");
            })?;
            buf.put_slice(&packed.bytes);
            packed.septets
        }
        Alphabet::EightBit => {
            if payload.len() > config.max_payload {
                tracing::error!("Overflow occurs when copying 8bits PDU");
                return Err(CodecError::Overflow {
                    field: "user_data",
                    needed: payload.len(),
                    capacity: config.max_payload,
                });
            }
            buf.put_slice(payload);
            payload.len()
        }
        Alphabet::Ucs2 => {
            return Err(CodecError::Unsupported(
                "UCS-2 encoding of GSM PDUs".to_string(),
            ));
        }
    };

    buf[udl_position] = u8::try_from(udl).map_err(|_| CodecError::Overflow {
        field: "user_data",
        needed: udl,
        capacity: usize::from(u8::MAX),
    })?;
    Ok(())
}

/// Encodes an SMS-DELIVER or SMS-SUBMIT TPDU, preceded by an empty SMSC
/// field when the modem expects one.
pub fn encode(
    request: &EncodeRequest,
    buf: &mut BytesMut,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    request.validate().inspect_err(|e| {
        tracing::error!("Invalid message: {}", e);
    })?;

    if request.payload.len() > config.max_text_length {
        tracing::warn!(
            "Message cannot be encoded, message with length > {} are not supported yet",
            config.max_text_length
        );
        return Err(CodecError::PayloadTooLong {
            length: request.payload.len(),
            max: config.max_text_length,
        });
    }

    if request.alphabet == Alphabet::Ucs2 {
        tracing::error!("Invalid encoding {}", request.alphabet);
        return Err(CodecError::Unsupported(format!(
            "{} encoding of GSM PDUs",
            request.alphabet
        )));
    }

    let mut tpdu = BytesMut::with_capacity(config.max_pdu_size);
    if config.smsc_info {
        tpdu.put_u8(0x00);
    }

    match request.kind {
        MessageKind::Deliver => deliver::encode_tpdu(request, &mut tpdu, config)?,
        MessageKind::Submit => submit::encode_tpdu(request, &mut tpdu, config)?,
    }

    buf.extend_from_slice(&tpdu);
    Ok(())
}
