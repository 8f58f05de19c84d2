use crate::codec::{CodecError, decode_bytes, decode_u8};
use crate::config::CodecConfig;
use crate::datatypes::{
    DataCoding, GsmTimestamp, decode_address, decode_timestamp, encode_phone_number,
};
use crate::gsm::{Format, TP_MTI_DELIVER, alphabet_for, decode_user_data, encode_user_data};
use crate::request::EncodeRequest;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// SMS-DELIVER: a message sent by the service centre to the mobile.
#[derive(Clone, Debug, PartialEq)]
pub struct Deliver {
    /// TP-OA: phone number, `+` prefixed when international, or alphanumeric sender
    pub originator: String,
    pub format: Format,
    /// TP-SCTS rendered as `YY/MM/DD,hh:mm:ss±zz`
    pub timestamp: Option<String>,
    pub data: Bytes,
}

impl Deliver {
    /// Decodes the TPDU following an already consumed first octet.
    pub(crate) fn decode_tpdu(
        first_byte: u8,
        buf: &mut Cursor<&[u8]>,
        config: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let originator = decode_address(buf)?;
        tracing::debug!("TP-OA: {}", originator);

        let pid = decode_u8(buf)?;
        tracing::debug!("TP-PID: {}", pid);

        let alphabet = alphabet_for(decode_u8(buf)?)?;

        let timestamp = decode_timestamp(&decode_bytes(buf, GsmTimestamp::SIZE)?);
        tracing::debug!("TP-SCTS: {}", timestamp);

        let (format, data) = decode_user_data(buf, first_byte, alphabet, config)?;

        Ok(Deliver {
            originator,
            format,
            timestamp: Some(timestamp),
            data,
        })
    }
}

/// Writes the SMS-DELIVER TPDU: first octet, TP-OA, TP-PID, TP-DCS, TP-SCTS and user data.
///
/// Without a time stamp in the request TP-SCTS is seven zero octets.
pub(crate) fn encode_tpdu(
    request: &EncodeRequest,
    buf: &mut BytesMut,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    let originator = encode_phone_number(&request.address)?;

    buf.put_u8(TP_MTI_DELIVER);
    originator.encode(buf);
    buf.put_u8(0x00);
    buf.put_u8(DataCoding::for_alphabet(request.alphabet).to_byte());
    match &request.timestamp {
        Some(timestamp) => buf.put_slice(timestamp.as_bytes()),
        None => buf.put_bytes(0x00, GsmTimestamp::SIZE),
    }

    encode_user_data(buf, &request.payload, request.alphabet, config)
}
