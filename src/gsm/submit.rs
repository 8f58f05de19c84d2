use crate::codec::{CodecError, decode_u8, skip_bytes};
use crate::config::CodecConfig;
use crate::datatypes::{DataCoding, decode_address, encode_phone_number};
use crate::gsm::{Format, TP_SRR, alphabet_for, decode_user_data, encode_user_data};
use crate::request::EncodeRequest;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// TP-MTI submit with TP-VPF relative (10)
const SUBMIT_FIRST_BYTE: u8 = 0x11;

/// SMS-SUBMIT: a message sent by the mobile to the service centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Submit {
    /// TP-MR
    pub message_reference: u8,
    /// TP-DA
    pub destination: String,
    pub format: Format,
    pub data: Bytes,
    /// TP-SRR
    pub status_report: bool,
}

impl Submit {
    /// Decodes the TPDU following an already consumed first octet.
    ///
    /// The validity period is assumed to be in relative format (one octet).
    pub(crate) fn decode_tpdu(
        first_byte: u8,
        buf: &mut Cursor<&[u8]>,
        config: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let message_reference = decode_u8(buf)?;

        let destination = decode_address(buf)?;
        tracing::debug!("TP-DA: {}", destination);

        let pid = decode_u8(buf)?;
        tracing::debug!("TP-PID: {}", pid);

        let alphabet = alphabet_for(decode_u8(buf)?)?;

        // TP-VP
        skip_bytes(buf, 1)?;

        let (format, data) = decode_user_data(buf, first_byte, alphabet, config)?;

        Ok(Submit {
            message_reference,
            destination,
            format,
            data,
            status_report: first_byte & TP_SRR != 0,
        })
    }
}

/// Writes the SMS-SUBMIT TPDU with a zero message reference and the
/// configured relative validity period.
pub(crate) fn encode_tpdu(
    request: &EncodeRequest,
    buf: &mut BytesMut,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    let destination = encode_phone_number(&request.address)?;

    let mut first_byte = SUBMIT_FIRST_BYTE;
    if request.status_report {
        first_byte |= TP_SRR;
    }

    buf.put_u8(first_byte);
    buf.put_u8(0x00);
    destination.encode(buf);
    buf.put_u8(0x00);
    buf.put_u8(DataCoding::for_alphabet(request.alphabet).to_byte());
    buf.put_u8(config.validity_period);

    encode_user_data(buf, &request.payload, request.alphabet, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decodable;
    use crate::gsm::SmsMessage;

    const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                         Morbi in commodo lectus, quis volutpat erat.";

    const LOREM_7BIT: [u8; 103] = [
        0x00, 0x11, 0x00, 0x0A, 0x81, 0x60, 0x71, 0x91, 0x50, 0x74, 0x00, 0x00, 0xAD, 0x65, 0xCC,
        0xB7, 0xBC, 0xDC, 0x06, 0xA5, 0xE1, 0xF3, 0x7A, 0x1B, 0x44, 0x7E, 0xB3, 0xDF, 0x72, 0xD0,
        0x3C, 0x4D, 0x07, 0x85, 0xDB, 0x65, 0x3A, 0x0B, 0x34, 0x7E, 0xBB, 0xE7, 0xE5, 0x31, 0xBD,
        0x4C, 0xAF, 0xCB, 0x41, 0x61, 0x72, 0x1A, 0x9E, 0x9E, 0x8F, 0xD3, 0xEE, 0x33, 0xA8, 0xCC,
        0x4E, 0xD3, 0x5D, 0xA0, 0xE6, 0x5B, 0x2E, 0x4E, 0x83, 0xD2, 0x6E, 0xD0, 0xF8, 0xDD, 0x6E,
        0xBF, 0xC9, 0x6F, 0x10, 0xBB, 0x3C, 0xA6, 0xD7, 0xE7, 0x2C, 0x50, 0xBC, 0x9E, 0x9E, 0x83,
        0xEC, 0x6F, 0x76, 0x9D, 0x0E, 0x0F, 0xD3, 0x41, 0x65, 0x79, 0x98, 0xEE, 0x02,
    ];

    fn smsc_config() -> CodecConfig {
        CodecConfig::default().with_smsc_info(true)
    }

    #[test]
    fn test_encode_lorem_7bit() {
        let request = EncodeRequest::builder()
            .to("0617190547")
            .text(LOREM)
            .build()
            .unwrap();

        let mut buf = BytesMut::new();
        buf.put_u8(0x00);
        encode_tpdu(&request, &mut buf, &smsc_config()).unwrap();
        assert_eq!(buf.as_ref(), &LOREM_7BIT);
    }

    #[test]
    fn test_decode_lorem_7bit() {
        let message = SmsMessage::from_bytes(&LOREM_7BIT, &smsc_config()).unwrap();
        let SmsMessage::Submit(submit) = message else {
            panic!("expected SMS-SUBMIT");
        };
        assert_eq!(submit.destination, "0617190547");
        assert_eq!(submit.format, Format::Text);
        assert_eq!(submit.data.as_ref(), LOREM.as_bytes());
        assert!(!submit.status_report);
    }

    #[test]
    fn test_encode_binary_with_status_report() {
        let request = EncodeRequest::builder()
            .to("+33661651866")
            .binary(LOREM.as_bytes().to_vec())
            .with_status_report()
            .build()
            .unwrap();

        let mut buf = BytesMut::new();
        encode_tpdu(&request, &mut buf, &CodecConfig::default()).unwrap();
        assert_eq!(
            &buf[..14],
            &[
                0x31, 0x00, 0x0B, 0x91, 0x33, 0x66, 0x61, 0x15, 0x68, 0xF6, 0x00, 0x04, 0xAD, 0x65
            ]
        );
        assert_eq!(&buf[14..], LOREM.as_bytes());

        let message = SmsMessage::from_bytes(&buf, &CodecConfig::default()).unwrap();
        let SmsMessage::Submit(submit) = message else {
            panic!("expected SMS-SUBMIT");
        };
        assert!(submit.status_report);
        assert_eq!(submit.format, Format::Binary);
    }

    #[test]
    fn test_encode_validity_period_from_config() {
        let request = EncodeRequest::builder().to("123").text("a").build().unwrap();
        let config = CodecConfig::default().with_validity_period(0x0B);

        let mut buf = BytesMut::new();
        encode_tpdu(&request, &mut buf, &config).unwrap();
        assert_eq!(buf[8], 0x0B);
    }

    #[test]
    fn test_encode_invalid_destination() {
        for destination in ["", "+", "06 17", "0617-190547", "+123456789012345678901"] {
            let request = EncodeRequest::builder()
                .to(destination)
                .text("hi")
                .build()
                .unwrap();
            let mut buf = BytesMut::new();
            assert!(matches!(
                encode_tpdu(&request, &mut buf, &CodecConfig::default()),
                Err(CodecError::BadParameter { .. })
            ));
        }
    }
}
