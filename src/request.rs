// ABOUTME: Outgoing message description handed to the PDU encoders
// ABOUTME: Fluent builder covering destination, payload alphabet, protocol and status report request

use crate::codec::{CodecError, Encodable, Protocol};
use crate::config::CodecConfig;
use crate::datatypes::{Alphabet, GsmTimestamp};
use bytes::BytesMut;

/// Direction of the message to encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    /// SMS-DELIVER, network to mobile
    Deliver,
    /// SMS-SUBMIT, mobile to network
    #[default]
    Submit,
}

/// Everything the encoders need to produce one PDU
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub protocol: Protocol,
    pub kind: MessageKind,
    /// Destination (Submit) or originator (Deliver) phone number
    pub address: String,
    /// ISO-8859-1 text for 7-bit, raw octets for 8-bit, UTF-16BE for UCS-2
    pub payload: Vec<u8>,
    pub alphabet: Alphabet,
    pub status_report: bool,
    /// Service-centre time stamp for Deliver, message-centre time stamp for CDMA
    pub timestamp: Option<GsmTimestamp>,
}

impl EncodeRequest {
    /// Create a builder for constructing encode requests
    pub fn builder() -> EncodeRequestBuilder {
        EncodeRequestBuilder::default()
    }

    /// Checks the request before either encoder touches it
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.payload.is_empty() {
            return Err(CodecError::BadParameter {
                field: "payload",
                reason: "message payload is empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Encodable for EncodeRequest {
    fn encode(&self, buf: &mut BytesMut, config: &CodecConfig) -> Result<(), CodecError> {
        match self.protocol {
            Protocol::Gsm => crate::gsm::encode(self, buf, config),
            Protocol::Cdma => crate::cdma::encode_request(self, buf, config),
            Protocol::CellBroadcast => Err(CodecError::Unsupported(
                "Cell Broadcast pages can only be decoded".to_string(),
            )),
        }
    }
}

/// Builder for constructing encode requests with fluent API
#[derive(Debug)]
pub struct EncodeRequestBuilder {
    protocol: Protocol,
    kind: MessageKind,
    address: Option<String>,
    payload: Vec<u8>,
    alphabet: Alphabet,
    status_report: bool,
    timestamp: Option<GsmTimestamp>,
}

impl Default for EncodeRequestBuilder {
    fn default() -> Self {
        Self {
            protocol: Protocol::Gsm,
            kind: MessageKind::Submit,
            address: None,
            payload: Vec::new(),
            alphabet: Alphabet::SevenBit,
            status_report: false,
            timestamp: None,
        }
    }
}

impl EncodeRequestBuilder {
    /// Set destination phone number (SMS-SUBMIT)
    pub fn to(mut self, destination: impl Into<String>) -> Self {
        self.address = Some(destination.into());
        self.kind = MessageKind::Submit;
        self
    }

    /// Set originator phone number (SMS-DELIVER)
    pub fn from(mut self, originator: impl Into<String>) -> Self {
        self.address = Some(originator.into());
        self.kind = MessageKind::Deliver;
        self
    }

    /// Set message text, sent in the 7-bit alphabet
    ///
    /// Characters outside ISO-8859-1 are replaced by `?`.
    pub fn text(mut self, text: &str) -> Self {
        self.payload = text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect();
        self.alphabet = Alphabet::SevenBit;
        self
    }

    /// Set a binary payload, sent as 8-bit data
    pub fn binary(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.payload = data.into();
        self.alphabet = Alphabet::EightBit;
        self
    }

    /// Select the wire format
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Request a status report (SMS-SUBMIT only)
    pub fn with_status_report(mut self) -> Self {
        self.status_report = true;
        self
    }

    /// Set the time stamp written into the PDU
    pub fn timestamp(mut self, timestamp: GsmTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the request
    pub fn build(self) -> Result<EncodeRequest, CodecError> {
        let address = self.address.ok_or_else(|| CodecError::BadParameter {
            field: "address",
            reason: "destination or originator is required".to_string(),
        })?;

        Ok(EncodeRequest {
            protocol: self.protocol,
            kind: self.kind,
            address,
            payload: self.payload,
            alphabet: self.alphabet,
            status_report: self.status_report,
            timestamp: self.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_gsm_submit() {
        let request = EncodeRequest::builder()
            .to("+33661651866")
            .text("hello")
            .build()
            .unwrap();
        assert_eq!(request.protocol, Protocol::Gsm);
        assert_eq!(request.kind, MessageKind::Submit);
        assert_eq!(request.alphabet, Alphabet::SevenBit);
        assert_eq!(request.payload, b"hello");
        assert!(!request.status_report);
    }

    #[test]
    fn test_builder_from_sets_deliver() {
        let request = EncodeRequest::builder()
            .from("0617190547")
            .binary(vec![0x01, 0x02])
            .build()
            .unwrap();
        assert_eq!(request.kind, MessageKind::Deliver);
        assert_eq!(request.alphabet, Alphabet::EightBit);
    }

    #[test]
    fn test_text_maps_to_latin1() {
        let request = EncodeRequest::builder()
            .to("123")
            .text("é€")
            .build()
            .unwrap();
        assert_eq!(request.payload, [0xE9, b'?']);
    }

    #[test]
    fn test_validate_rejects_empty_payload() {
        let request = EncodeRequest::builder()
            .to("123")
            .text("")
            .build()
            .unwrap();
        assert!(matches!(
            request.validate(),
            Err(CodecError::BadParameter {
                field: "payload",
                ..
            })
        ));

        let request = EncodeRequest::builder()
            .to("123")
            .binary(vec![0x00])
            .build()
            .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_build_requires_address() {
        assert!(matches!(
            EncodeRequest::builder().text("hi").build(),
            Err(CodecError::BadParameter {
                field: "address",
                ..
            })
        ));
    }

    #[test]
    fn test_cell_broadcast_encode_unsupported() {
        let request = EncodeRequest::builder()
            .to("123")
            .text("hi")
            .protocol(Protocol::CellBroadcast)
            .build()
            .unwrap();
        assert!(matches!(
            request.to_bytes(&CodecConfig::default()),
            Err(CodecError::Unsupported(_))
        ));
    }
}
