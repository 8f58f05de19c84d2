// ABOUTME: CDMA point-to-point SMS transport layer PDU (3GPP2 C.S0015-B section 3.4)
// ABOUTME: Parameter TLV decoding with resync, canonical-order encoding and message conversion

pub mod address;
pub mod bearer_data;
mod tlv;
pub mod types;

pub use address::{AddressDigits, CdmaAddress, CdmaSubAddress, NumberPlan, NumberType};
pub use bearer_data::{BearerData, CdmaUserData, UserDataEncoding};
pub use types::{
    CauseCodes, CdmaDate, MessageFormat, MessageIdentifier, MessageType, ParameterId, Priority,
    TELESERVICE_WMT,
};

use crate::bits::BitWriter;
use crate::codec::{CodecError, Decodable, Encodable, decode_u8};
use crate::config::CodecConfig;
use crate::datatypes::Alphabet;
use crate::gsm::{Deliver, Format, SmsMessage, Submit};
use crate::request::{EncodeRequest, MessageKind};
use bytes::{Bytes, BytesMut};
use std::io::Cursor;
use tlv::{TlvIter, read_record, write_record};
use types::from_wire;

/// A CDMA SMS transport layer message
///
/// Every parameter is optional on the wire; absent ones are `None` and are
/// not encoded.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CdmaPdu {
    pub format: MessageFormat,
    pub teleservice_id: Option<u16>,
    pub service_category: Option<u16>,
    pub originating_address: Option<CdmaAddress>,
    pub originating_sub_address: Option<CdmaSubAddress>,
    pub destination_address: Option<CdmaAddress>,
    pub destination_sub_address: Option<CdmaSubAddress>,
    /// 6-bit reply sequence number
    pub bearer_reply_option: Option<u8>,
    pub cause_codes: Option<CauseCodes>,
    pub bearer_data: Option<BearerData>,
}

impl Decodable for CdmaPdu {
    fn decode(buf: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Self, CodecError> {
        let format: MessageFormat = from_wire("message_format", decode_u8(buf)?)?;

        let data: &[u8] = *buf.get_ref();
        let body = data.get(buf.position() as usize..).unwrap_or_default();
        buf.set_position(data.len() as u64);

        let mut pdu = CdmaPdu {
            format,
            ..Default::default()
        };

        for tlv in TlvIter::new(body, "parameter") {
            let Ok(id) = ParameterId::try_from(tlv.tag) else {
                tracing::warn!("Do not support this parameter Id: {}", tlv.tag);
                continue;
            };
            let name = format!("{id:?}");
            let fixed = id.fixed_length();

            match id {
                ParameterId::TeleserviceId => {
                    pdu.teleservice_id = read_record(&tlv, &name, fixed, |r| r.read_u16());
                }
                ParameterId::ServiceCategory => {
                    pdu.service_category = read_record(&tlv, &name, fixed, |r| r.read_u16());
                }
                ParameterId::OriginatingAddress => {
                    pdu.originating_address = read_record(&tlv, &name, fixed, CdmaAddress::read);
                }
                ParameterId::OriginatingSubAddress => {
                    pdu.originating_sub_address =
                        read_record(&tlv, &name, fixed, CdmaSubAddress::read);
                }
                ParameterId::DestinationAddress => {
                    pdu.destination_address = read_record(&tlv, &name, fixed, CdmaAddress::read);
                }
                ParameterId::DestinationSubAddress => {
                    pdu.destination_sub_address =
                        read_record(&tlv, &name, fixed, CdmaSubAddress::read);
                }
                ParameterId::BearerReplyOption => {
                    pdu.bearer_reply_option =
                        read_record(&tlv, &name, fixed, |r| Ok(r.read_bits(6)? as u8));
                }
                ParameterId::CauseCodes => {
                    pdu.cause_codes = read_record(&tlv, &name, fixed, CauseCodes::read);
                }
                ParameterId::BearerData => {
                    pdu.bearer_data = Some(BearerData::decode(tlv.value, config.max_payload));
                }
            }
        }

        Ok(pdu)
    }
}

impl Encodable for CdmaPdu {
    fn encode(&self, buf: &mut BytesMut, config: &CodecConfig) -> Result<(), CodecError> {
        use ParameterId as Id;

        let mut writer = BitWriter::new(config.max_pdu_size).for_field("pdu");
        writer.write_u8(self.format as u8)?;

        if let Some(id) = self.teleservice_id {
            write_record(&mut writer, Id::TeleserviceId as u8, |w| w.write_u16(id))?;
        }
        if let Some(category) = self.service_category {
            write_record(&mut writer, Id::ServiceCategory as u8, |w| {
                w.write_u16(category)
            })?;
        }
        if let Some(address) = &self.originating_address {
            write_record(&mut writer, Id::OriginatingAddress as u8, |w| {
                address.write(w)
            })?;
        }
        if let Some(sub) = &self.originating_sub_address {
            write_record(&mut writer, Id::OriginatingSubAddress as u8, |w| sub.write(w))?;
        }
        if let Some(address) = &self.destination_address {
            write_record(&mut writer, Id::DestinationAddress as u8, |w| {
                address.write(w)
            })?;
        }
        if let Some(sub) = &self.destination_sub_address {
            write_record(&mut writer, Id::DestinationSubAddress as u8, |w| {
                sub.write(w)
            })?;
        }
        if let Some(seq) = self.bearer_reply_option {
            write_record(&mut writer, Id::BearerReplyOption as u8, |w| {
                w.write_bits(u32::from(seq), 6)
            })?;
        }
        if let Some(cause) = &self.cause_codes {
            write_record(&mut writer, Id::CauseCodes as u8, |w| cause.write(w))?;
        }
        if let Some(bearer) = &self.bearer_data {
            write_record(&mut writer, Id::BearerData as u8, |w| {
                bearer.encode(w, config.max_payload)
            })?;
        }

        buf.extend_from_slice(&writer.finish());
        Ok(())
    }
}

fn user_data_for(request: &EncodeRequest) -> Result<CdmaUserData, CodecError> {
    let (encoding, chars) = match request.alphabet {
        Alphabet::SevenBit => (
            UserDataEncoding::SevenBitAscii,
            request
                .payload
                .iter()
                .map(|&c| if c.is_ascii() { c } else { b'?' })
                .collect(),
        ),
        Alphabet::EightBit => (UserDataEncoding::Octet, request.payload.clone()),
        Alphabet::Ucs2 => {
            tracing::error!("Invalid encoding {}", request.alphabet);
            return Err(CodecError::Unsupported(format!(
                "{} encoding of CDMA PDUs",
                request.alphabet
            )));
        }
    };

    Ok(CdmaUserData {
        encoding,
        message_type: None,
        chars,
    })
}

impl CdmaPdu {
    /// Builds the point-to-point teleservice message sent for `request`.
    ///
    /// The message centre time stamp is the request's time stamp when set,
    /// the local time otherwise.
    pub fn from_request(request: &EncodeRequest) -> Result<Self, CodecError> {
        request.validate().inspect_err(|e| {
            tracing::error!("Invalid message: {}", e);
        })?;

        let address = CdmaAddress::from_phone_number(&request.address).inspect_err(|e| {
            tracing::error!("Could not set address: {}", e);
        })?;

        let (message_type, originating_address, destination_address) = match request.kind {
            MessageKind::Submit => (MessageType::Submit, None, Some(address)),
            MessageKind::Deliver => (MessageType::Deliver, Some(address), None),
        };

        let time_stamp = request
            .timestamp
            .as_ref()
            .map(CdmaDate::from)
            .unwrap_or_else(CdmaDate::now);

        let bearer_data = BearerData {
            message_identifier: Some(MessageIdentifier {
                message_type,
                message_id: 1,
                header_indication: false,
            }),
            user_data: Some(user_data_for(request)?),
            message_center_time_stamp: Some(time_stamp),
            priority: Some(Priority::Normal),
            ..Default::default()
        };

        Ok(CdmaPdu {
            format: MessageFormat::PointToPoint,
            teleservice_id: Some(TELESERVICE_WMT),
            originating_address,
            destination_address,
            bearer_data: Some(bearer_data),
            ..Default::default()
        })
    }

    /// Converts a decoded PDU into the message model shared with GSM.
    ///
    /// Only Deliver and Submit message types are carried over.
    pub fn to_message(&self, config: &CodecConfig) -> Result<SmsMessage, CodecError> {
        let bearer = self
            .bearer_data
            .as_ref()
            .ok_or_else(|| CodecError::Unsupported("no bearer data".to_string()))?;
        let identifier = bearer
            .message_identifier
            .ok_or_else(|| CodecError::Unsupported("no message identifier".to_string()))?;

        match identifier.message_type {
            MessageType::Deliver => {
                let originator = match &self.originating_address {
                    Some(address) => address.to_phone_number()?,
                    None => String::new(),
                };
                let timestamp = bearer
                    .message_center_time_stamp
                    .as_ref()
                    .map(CdmaDate::to_string);
                let (format, data) = message_data(bearer, config)?;
                Ok(SmsMessage::Deliver(Deliver {
                    originator,
                    format,
                    timestamp,
                    data,
                }))
            }
            MessageType::Submit => {
                let destination = match &self.destination_address {
                    Some(address) => address.to_phone_number()?,
                    None => String::new(),
                };
                let (format, data) = message_data(bearer, config)?;
                let status_report = bearer
                    .reply_option
                    .is_some_and(|option| option.delivery_ack);
                Ok(SmsMessage::Submit(Submit {
                    message_reference: 0,
                    destination,
                    format,
                    data,
                    status_report,
                }))
            }
            other => {
                tracing::warn!("Do not support this message type {:?}", other);
                Err(CodecError::Unsupported(format!("CDMA message type {other:?}")))
            }
        }
    }
}

fn message_data(bearer: &BearerData, config: &CodecConfig) -> Result<(Format, Bytes), CodecError> {
    let user_data = bearer.user_data.as_ref().ok_or_else(|| {
        tracing::info!("No data in the message");
        CodecError::Fault("no user data".to_string())
    })?;

    let format = match user_data.encoding {
        UserDataEncoding::SevenBitAscii => Format::Text,
        UserDataEncoding::Octet => Format::Binary,
        other => {
            tracing::warn!("Do not support {:?} encoding", other);
            return Err(CodecError::Fault(format!("user data encoding {other:?}")));
        }
    };

    let capacity = match format {
        Format::Text => config.max_text_length,
        _ => config.max_payload,
    };
    if user_data.chars.len() > capacity {
        tracing::warn!("Overflow occur when decoding user data");
        return Err(CodecError::Overflow {
            field: "user_data",
            needed: user_data.chars.len(),
            capacity,
        });
    }

    Ok((format, Bytes::copy_from_slice(&user_data.chars)))
}

/// Encodes `request` as a CDMA PDU.
pub fn encode_request(
    request: &EncodeRequest,
    buf: &mut BytesMut,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    let pdu = CdmaPdu::from_request(request)?;
    pdu.encode(buf, config).inspect_err(|e| {
        tracing::error!("Could not Encode CDMA PDU message: {}", e);
    })
}
