// ABOUTME: GSM Cell Broadcast page decoding (3GPP TS 23.041 9.4.1)
// ABOUTME: Six-octet page header followed by content in the alphabet of the CB data coding scheme

use crate::codec::{CodecError, Decodable, decode_u8, decode_u16};
use crate::config::CodecConfig;
use crate::datatypes::{Alphabet, DataCoding, unpack7};
use crate::gsm::{Format, alphabet_for};
use bytes::{Buf, Bytes};
use std::io::Cursor;

/// Size of the page header preceding the content
pub const CB_HEADER_SIZE: usize = 6;

/// One Cell Broadcast page
#[derive(Clone, Debug, PartialEq)]
pub struct CellBroadcast {
    pub serial_number: u16,
    pub message_id: u16,
    pub data_coding: DataCoding,
    /// Page number in the high nibble, total pages in the low nibble
    pub page_parameter: u8,
    pub format: Format,
    pub data: Bytes,
}

impl CellBroadcast {
    /// Geographical scope, bits 15-14 of the serial number
    pub fn geographical_scope(&self) -> u8 {
        (self.serial_number >> 14) as u8
    }

    /// Message code, bits 13-4 of the serial number
    pub fn message_code(&self) -> u16 {
        (self.serial_number >> 4) & 0x03FF
    }

    /// Update number, bits 3-0 of the serial number
    pub fn update_number(&self) -> u8 {
        (self.serial_number & 0x000F) as u8
    }
}

impl Decodable for CellBroadcast {
    fn decode(buf: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Self, CodecError> {
        if buf.remaining() < CB_HEADER_SIZE {
            return Err(CodecError::Incomplete);
        }

        let serial_number = decode_u16(buf)?;
        let message_id = decode_u16(buf)?;
        let data_coding = DataCoding::from_byte(decode_u8(buf)?);
        let page_parameter = decode_u8(buf)?;
        tracing::debug!(
            "Cell Broadcast SN 0x{:04X}, MI 0x{:04X}, DCS 0x{:02X}, PP 0x{:02X}",
            serial_number,
            message_id,
            data_coding.to_byte(),
            page_parameter
        );

        let alphabet = alphabet_for(data_coding.to_byte())?;
        let content = buf.copy_to_bytes(buf.remaining());

        let (format, data) = match alphabet {
            Alphabet::SevenBit => {
                let chars = content.len() * 8 / 7;
                if chars == 0 {
                    tracing::error!("the message length {} is <= 0", chars);
                    return Err(CodecError::Fault("empty Cell Broadcast page".to_string()));
                }
                let text = unpack7(&content, chars);
                if text.len() > config.max_text_length {
                    tracing::error!("Overflow occurs when converting 7bits to 8bits");
                    return Err(CodecError::Overflow {
                        field: "user_data",
                        needed: text.len(),
                        capacity: config.max_text_length,
                    });
                }
                tracing::debug!("MessageLen {}, size {}", chars, text.len());
                (Format::Text, Bytes::from(text))
            }
            Alphabet::EightBit | Alphabet::Ucs2 => {
                if content.len() > config.max_payload {
                    tracing::error!(
                        "Overflow occurs when copying {} PDU {}>{}",
                        alphabet,
                        content.len(),
                        config.max_payload
                    );
                    return Err(CodecError::Overflow {
                        field: "user_data",
                        needed: content.len(),
                        capacity: config.max_payload,
                    });
                }
                let format = if alphabet == Alphabet::Ucs2 {
                    Format::Ucs2
                } else {
                    Format::Binary
                };
                (format, content)
            }
        };

        Ok(CellBroadcast {
            serial_number,
            message_id,
            data_coding,
            page_parameter,
            format,
            data,
        })
    }
}
