//! Integration tests for GSM and CDMA PDU encoding and decoding

use crate::cdma::{CdmaPdu, MessageType};
use crate::codec::{CodecError, Decodable, Encodable, ErrorKind, PduCodec, Protocol};
use crate::config::CodecConfig;
use crate::datatypes::{Alphabet, GsmTimestamp};
use crate::gsm::{Format, SmsMessage};
use crate::request::EncodeRequest;

#[cfg(test)]
mod integration_tests {
    use super::*;

    const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                         Morbi in commodo lectus, quis volutpat erat.";

    /// SMS-DELIVER preceded by the service-centre address +33689004000
    const DELIVER_WITH_SMSC: [u8; 116] = [
        0x07, 0x91, 0x33, 0x86, 0x09, 0x40, 0x00, 0xF0, 0x04, 0x0B, 0x91, 0x33, 0x46, 0x53, 0x73,
        0x19, 0xF9, 0x00, 0x00, 0x41, 0x70, 0x13, 0x02, 0x55, 0x71, 0x80, 0x65, 0xCC, 0xB7, 0xBC,
        0xDC, 0x06, 0xA5, 0xE1, 0xF3, 0x7A, 0x1B, 0x44, 0x7E, 0xB3, 0xDF, 0x72, 0xD0, 0x3C, 0x4D,
        0x07, 0x85, 0xDB, 0x65, 0x3A, 0x0B, 0x34, 0x7E, 0xBB, 0xE7, 0xE5, 0x31, 0xBD, 0x4C, 0xAF,
        0xCB, 0x41, 0x61, 0x72, 0x1A, 0x9E, 0x9E, 0x8F, 0xD3, 0xEE, 0x33, 0xA8, 0xCC, 0x4E, 0xD3,
        0x5D, 0xA0, 0xE6, 0x5B, 0x2E, 0x4E, 0x83, 0xD2, 0x6E, 0xD0, 0xF8, 0xDD, 0x6E, 0xBF, 0xC9,
        0x6F, 0x10, 0xBB, 0x3C, 0xA6, 0xD7, 0xE7, 0x2C, 0x50, 0xBC, 0x9E, 0x9E, 0x83, 0xEC, 0x6F,
        0x76, 0x9D, 0x0E, 0x0F, 0xD3, 0x41, 0x65, 0x79, 0x98, 0xEE, 0x02,
    ];

    const STATUS_REPORT_SUBMIT: [u8; 50] = [
        0x00, 0x31, 0x00, 0x0B, 0x91, 0x33, 0x66, 0x61, 0x15, 0x68, 0xF6, 0x00, 0x00, 0xAD, 0x27,
        0xD4, 0xF2, 0x9C, 0x0E, 0x9A, 0x97, 0xDD, 0xE4, 0xB4, 0xFB, 0x0C, 0x6A, 0x97, 0xE7, 0xF3,
        0xF0, 0xB9, 0x0C, 0xBA, 0xA7, 0xE9, 0x68, 0xD0, 0x94, 0x1E, 0xA6, 0xD7, 0xE7, 0x20, 0x69,
        0x19, 0xFE, 0x96, 0xD3, 0x01,
    ];

    const CDMA_OCTET_SUBMIT: [u8; 56] = [
        0x00, 0x00, 0x02, 0x10, 0x02, 0x04, 0x07, 0x02, 0xCC, 0xD9, 0x85, 0x94, 0x61, 0x98, 0x08,
        0x28, 0x00, 0x03, 0x20, 0x00, 0x10, 0x01, 0x16, 0x00, 0xA2, 0xA3, 0x2B, 0x9B, 0xA1, 0x03,
        0x9B, 0x2B, 0x73, 0x23, 0x4B, 0x73, 0x39, 0x03, 0x6B, 0x2B, 0x9B, 0x9B, 0x0B, 0x3B, 0x28,
        0x03, 0x06, 0x14, 0x07, 0x06, 0x14, 0x18, 0x50, 0x08, 0x01, 0x00,
    ];

    const CDMA_TEXT_SUBMIT: [u8; 70] = [
        0x00, 0x00, 0x02, 0x10, 0x02, 0x04, 0x07, 0x02, 0xCC, 0xD9, 0x85, 0x94, 0x61, 0x98, 0x08,
        0x36, 0x00, 0x03, 0x20, 0x00, 0x10, 0x01, 0x24, 0x11, 0x3D, 0x4C, 0xBC, 0xFA, 0x20, 0xE7,
        0x97, 0x76, 0x4D, 0x3B, 0xB3, 0xA0, 0xDB, 0x97, 0x9F, 0x3C, 0x39, 0xF2, 0xA0, 0xEF, 0xA7,
        0xA6, 0x84, 0x14, 0xFA, 0x61, 0xE9, 0xD7, 0x9A, 0x0A, 0x59, 0x78, 0x6F, 0xE5, 0xD0, 0x03,
        0x06, 0x17, 0x08, 0x07, 0x18, 0x52, 0x09, 0x08, 0x01, 0x00,
    ];

    fn digits(count: usize) -> String {
        "1234567890".chars().cycle().take(count).collect()
    }

    fn cdma_request(text: &str, timestamp: GsmTimestamp) -> EncodeRequest {
        EncodeRequest::builder()
            .to("+33661651866")
            .text(text)
            .protocol(Protocol::Cdma)
            .timestamp(timestamp)
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_deliver_with_service_centre() {
        let codec = PduCodec::new(CodecConfig::default().with_smsc_info(true));
        let decoded = codec.decode(Protocol::Gsm, &DELIVER_WITH_SMSC).unwrap();

        assert_eq!(decoded.protocol, Protocol::Gsm);
        let SmsMessage::Deliver(deliver) = &decoded.message else {
            panic!("expected SMS-DELIVER");
        };
        assert_eq!(deliver.originator, "+33643537919");
        assert_eq!(deliver.timestamp.as_deref(), Some("14/07/31,20:55:17+08"));
        assert_eq!(deliver.format, Format::Text);
        assert_eq!(deliver.data.len(), 101);
        assert_eq!(decoded.message.text().as_deref(), Some(LOREM));
    }

    #[test]
    fn test_decode_deliver_without_smsc_flag_misreads() {
        // The SMSC length octet is taken as the first octet: TP-MTI 3 is reserved
        let result = PduCodec::default().decode(Protocol::Gsm, &DELIVER_WITH_SMSC);
        assert!(matches!(result, Err(CodecError::Unsupported(_))));
    }

    #[test]
    fn test_encode_submit_with_status_report() {
        let codec = PduCodec::new(CodecConfig::default().with_smsc_info(true));
        let request = EncodeRequest::builder()
            .to("+33661651866")
            .text("Test sending message with Status Report")
            .with_status_report()
            .build()
            .unwrap();

        let pdu = codec.encode(&request).unwrap();
        assert_eq!(pdu.protocol, Protocol::Gsm);
        assert_eq!(pdu.data.as_ref(), &STATUS_REPORT_SUBMIT);

        let decoded = codec.decode(Protocol::Gsm, &pdu.data).unwrap();
        let SmsMessage::Submit(submit) = decoded.message else {
            panic!("expected SMS-SUBMIT");
        };
        assert!(submit.status_report);
        assert_eq!(submit.destination, "+33661651866");
        assert_eq!(
            submit.data.as_ref(),
            b"Test sending message with Status Report"
        );
    }

    #[test]
    fn test_gsm_single_segment_limits() {
        let codec = PduCodec::new(CodecConfig::default().with_smsc_info(true));

        let full = EncodeRequest::builder()
            .to("+33661651866")
            .text(&digits(160))
            .build()
            .unwrap();
        let pdu = codec.encode(&full).unwrap();
        assert_eq!(pdu.len(), 155);

        let too_long = EncodeRequest::builder()
            .to("+33661651866")
            .text(&digits(161))
            .build()
            .unwrap();
        let err = codec.encode(&too_long).unwrap_err();
        assert!(matches!(err, CodecError::PayloadTooLong { length: 161, max: 160 }));

        // '[' needs an escape septet, pushing 160 characters past 140 octets
        let escaped = EncodeRequest::builder()
            .to("+33661651866")
            .text(&format!("[{}", digits(159)))
            .build()
            .unwrap();
        let err = codec.encode(&escaped).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);

        let binary = EncodeRequest::builder()
            .to("+33661651866")
            .binary(digits(160).into_bytes())
            .build()
            .unwrap();
        let err = codec.encode(&binary).unwrap_err();
        assert!(matches!(err, CodecError::Overflow { field: "user_data", .. }));
    }

    #[test]
    fn test_gsm_ucs2_encode_unsupported() {
        let mut request = EncodeRequest::builder()
            .to("+33661651866")
            .build()
            .unwrap();
        request.alphabet = Alphabet::Ucs2;
        request.payload = "Test".encode_utf16().flat_map(u16::to_be_bytes).collect();
        let err = PduCodec::default().encode(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_encode_cdma_octet_submit() {
        let request = EncodeRequest::builder()
            .to("+33661651866")
            .binary(b"Test sending message".to_vec())
            .protocol(Protocol::Cdma)
            .timestamp(GsmTimestamp::from_parts(14, 7, 6, 14, 18, 50, 0).unwrap())
            .build()
            .unwrap();

        let pdu = PduCodec::default().encode(&request).unwrap();
        assert_eq!(pdu.protocol, Protocol::Cdma);
        assert_eq!(pdu.data.as_ref(), &CDMA_OCTET_SUBMIT);

        let decoded = PduCodec::default()
            .decode(Protocol::Cdma, &CDMA_OCTET_SUBMIT)
            .unwrap();
        assert_eq!(decoded.message.format(), Some(Format::Binary));
        assert_eq!(decoded.message.data(), Some(&b"Test sending message"[..]));
    }

    #[test]
    fn test_encode_cdma_text_submit() {
        let timestamp = GsmTimestamp::from_parts(17, 8, 7, 18, 52, 9, 0).unwrap();
        let request = cdma_request("Test sending message with Status Report", timestamp);

        let pdu = PduCodec::default().encode(&request).unwrap();
        assert_eq!(pdu.data.as_ref(), &CDMA_TEXT_SUBMIT);
    }

    #[test]
    fn test_cdma_decode_then_encode_is_identical() {
        let config = CodecConfig::default();
        let pdu = CdmaPdu::from_bytes(&CDMA_TEXT_SUBMIT, &config).unwrap();
        let bytes = pdu.to_bytes(&config).unwrap();
        assert_eq!(bytes.as_ref(), &CDMA_TEXT_SUBMIT);

        let again = CdmaPdu::from_bytes(&bytes, &config).unwrap();
        assert_eq!(again, pdu);
    }

    #[test]
    fn test_cdma_unknown_sub_parameter_between_known_ones() {
        // Insert sub-parameter 0x1F between the message identifier and the user data
        let mut data = CDMA_TEXT_SUBMIT[..21].to_vec();
        data.extend_from_slice(&[0x1F, 0x02, 0xAA, 0xBB]);
        data.extend_from_slice(&CDMA_TEXT_SUBMIT[21..]);
        data[15] += 4;

        let config = CodecConfig::default();
        let pdu = CdmaPdu::from_bytes(&data, &config).unwrap();
        let bearer = pdu.bearer_data.as_ref().unwrap();
        let identifier = bearer.message_identifier.unwrap();
        assert_eq!(identifier.message_type, MessageType::Submit);
        assert_eq!(identifier.message_id, 1);

        let message = pdu.to_message(&config).unwrap();
        assert_eq!(
            message.text().as_deref(),
            Some("Test sending message with Status Report")
        );
        assert_eq!(message.address(), Some("33661651866"));
    }

    #[test]
    fn test_cdma_single_segment_limits() {
        let timestamp = GsmTimestamp::from_parts(14, 7, 11, 16, 53, 27, 0).unwrap();
        let codec = PduCodec::default();

        let pdu = codec.encode(&cdma_request(&digits(160), timestamp)).unwrap();
        assert_eq!(pdu.len(), 176);

        let decoded = codec.decode(Protocol::Cdma, &pdu.data).unwrap();
        assert_eq!(decoded.message.text(), Some(digits(160)));

        let binary = EncodeRequest::builder()
            .to("+33661651866")
            .binary(digits(160).into_bytes())
            .protocol(Protocol::Cdma)
            .timestamp(timestamp)
            .build()
            .unwrap();
        let err = codec.encode(&binary).unwrap_err();
        assert!(matches!(err, CodecError::Overflow { field: "user_data", .. }));
    }

    #[test]
    fn test_cdma_non_ascii_text_replaced() {
        let timestamp = GsmTimestamp::from_parts(14, 7, 11, 16, 53, 27, 0).unwrap();
        let codec = PduCodec::default();

        let pdu = codec.encode(&cdma_request("café", timestamp)).unwrap();
        let decoded = codec.decode(Protocol::Cdma, &pdu.data).unwrap();
        assert_eq!(decoded.message.text().as_deref(), Some("caf?"));
    }

    #[test]
    fn test_decode_cell_broadcast_through_codec() {
        let page = [0x40, 0x12, 0x03, 0x2A, 0x04, 0x11, 0x01, 0x02, 0x03];
        let decoded = PduCodec::default()
            .decode(Protocol::CellBroadcast, &page)
            .unwrap();
        assert_eq!(decoded.protocol, Protocol::CellBroadcast);
        assert_eq!(decoded.message.kind_name(), "Cell Broadcast");
        assert_eq!(decoded.message.address(), None);
        assert_eq!(decoded.message.data(), Some(&[0x01, 0x02, 0x03][..]));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = PduCodec::new(CodecConfig::default().with_smsc_info(true));
        let request = EncodeRequest::builder()
            .to("0617190547")
            .text(LOREM)
            .build()
            .unwrap();

        let first = codec.encode(&request).unwrap();
        let second = codec.encode(&request).unwrap();
        assert_eq!(first, second);

        let decoded = codec.decode(Protocol::Gsm, &first.data).unwrap();
        assert_eq!(decoded.message.text().as_deref(), Some(LOREM));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let codec = PduCodec::new(CodecConfig::default().with_smsc_info(true));
        for protocol in [Protocol::Gsm, Protocol::Cdma] {
            let text = EncodeRequest::builder()
                .to("+33661651866")
                .text("")
                .protocol(protocol)
                .build()
                .unwrap();
            let binary = EncodeRequest::builder()
                .from("0617190547")
                .binary(Vec::new())
                .protocol(protocol)
                .build()
                .unwrap();

            for request in [text, binary] {
                assert!(matches!(
                    codec.encode(&request),
                    Err(CodecError::BadParameter {
                        field: "payload",
                        ..
                    })
                ));
            }
        }
    }

    #[test]
    fn test_decode_is_idempotent() {
        let gsm = PduCodec::new(CodecConfig::default().with_smsc_info(true));
        let first = gsm.decode(Protocol::Gsm, &DELIVER_WITH_SMSC).unwrap();
        assert_eq!(gsm.decode(Protocol::Gsm, &DELIVER_WITH_SMSC).unwrap(), first);

        let codec = PduCodec::default();
        let first = codec.decode(Protocol::Cdma, &CDMA_OCTET_SUBMIT).unwrap();
        assert_eq!(codec.decode(Protocol::Cdma, &CDMA_OCTET_SUBMIT).unwrap(), first);

        let config = CodecConfig::default();
        let first = CdmaPdu::from_bytes(&CDMA_TEXT_SUBMIT, &config).unwrap();
        assert_eq!(CdmaPdu::from_bytes(&CDMA_TEXT_SUBMIT, &config).unwrap(), first);

        let page = [0x40, 0x12, 0x03, 0x2A, 0x04, 0x11, 0x01, 0x02, 0x03];
        let first = codec.decode(Protocol::CellBroadcast, &page).unwrap();
        assert_eq!(codec.decode(Protocol::CellBroadcast, &page).unwrap(), first);
    }

    #[test]
    fn test_empty_input() {
        let codec = PduCodec::default();
        for protocol in [Protocol::Gsm, Protocol::CellBroadcast, Protocol::Cdma] {
            assert!(matches!(
                codec.decode(protocol, &[]),
                Err(CodecError::Incomplete)
            ));
        }
    }
}
