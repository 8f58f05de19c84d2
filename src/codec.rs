// SMS PDU codec - protocol dispatch between the GSM and CDMA wire formats
//
// This module owns the error type shared by every layer, the Encodable and
// Decodable traits implemented by the message types, and the PduCodec entry
// point that routes raw PDUs to the GSM, Cell Broadcast or CDMA decoder.

use crate::cdma::CdmaPdu;
use crate::config::CodecConfig;
use crate::gsm::{CellBroadcast, SmsMessage};
use crate::request::EncodeRequest;
use bytes::{Buf, Bytes, BytesMut};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this value to the buffer
    fn encode(&self, buf: &mut BytesMut, config: &CodecConfig) -> Result<(), CodecError>;

    /// Encode into a fresh buffer and return the frozen bytes
    fn to_bytes(&self, config: &CodecConfig) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf, config)?;
        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode a value starting at the cursor position
    fn decode(buf: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Self, CodecError>;

    /// Decode a value from a complete PDU
    fn from_bytes(bytes: &[u8], config: &CodecConfig) -> Result<Self, CodecError> {
        let mut cursor = Cursor::new(bytes);
        Self::decode(&mut cursor, config)
    }
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Overflow in '{field}': {needed} needed, capacity {capacity}")]
    Overflow {
        field: &'static str,
        needed: usize,
        capacity: usize,
    },

    #[error("Field '{field}' validation failed: {reason}")]
    BadParameter { field: &'static str, reason: String },

    #[error("Fault: {0}")]
    Fault(String),

    #[error("Payload too long: {length} characters, at most {max}")]
    PayloadTooLong { length: usize, max: usize },

    #[error("Invalid bit width: {0}, must be 1-32")]
    InvalidBitWidth(u32),
}

/// Coarse classification of a [`CodecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unsupported,
    Overflow,
    BadParameter,
    Fault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::Overflow => "overflow",
            ErrorKind::BadParameter => "bad parameter",
            ErrorKind::Fault => "fault",
        };
        f.write_str(name)
    }
}

impl CodecError {
    /// Map a detailed error onto the class callers usually branch on
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Unsupported(_) => ErrorKind::Unsupported,
            CodecError::Overflow { .. } => ErrorKind::Overflow,
            CodecError::BadParameter { .. } | CodecError::InvalidBitWidth(_) => {
                ErrorKind::BadParameter
            }
            CodecError::Fault(_) | CodecError::Incomplete | CodecError::PayloadTooLong { .. } => {
                ErrorKind::Fault
            }
        }
    }
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode exactly `len` bytes
pub fn decode_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Skip `len` bytes
pub fn skip_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<(), CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    buf.advance(len);
    Ok(())
}

/// Log a PDU as rows of sixteen hex octets at debug level.
pub fn dump_pdu(label: &str, bytes: &[u8]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!("{} ({} bytes)", label, bytes.len());
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex = chunk
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!("{:04X}: {}", row * 16, hex);
    }
}

/// Wire format of a PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// 3GPP TS 23.040 SMS-DELIVER, SMS-SUBMIT and SMS-STATUS-REPORT
    Gsm,
    /// 3GPP TS 23.041 Cell Broadcast page (decode only)
    CellBroadcast,
    /// 3GPP2 C.S0015-B point-to-point message
    Cdma,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Gsm => "GSM",
            Protocol::CellBroadcast => "Cell Broadcast",
            Protocol::Cdma => "CDMA",
        };
        f.write_str(name)
    }
}

/// An encoded PDU together with the format it was encoded in
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub protocol: Protocol,
    pub data: Bytes,
}

impl Pdu {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of decoding one PDU
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub protocol: Protocol,
    pub message: SmsMessage,
}

/// Stateless PDU encoder/decoder bound to a configuration
///
/// # Example
///
/// ```rust
/// use smspdu::{CodecConfig, EncodeRequest, PduCodec, Protocol};
///
/// let codec = PduCodec::new(CodecConfig::default());
/// let request = EncodeRequest::builder()
///     .to("+33661651866")
///     .text("Test sending message")
///     .build()
///     .unwrap();
///
/// let pdu = codec.encode(&request).unwrap();
/// let decoded = codec.decode(Protocol::Gsm, &pdu.data).unwrap();
/// assert_eq!(decoded.message.address(), Some("+33661651866"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PduCodec {
    config: CodecConfig,
}

impl PduCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a PDU received in the given format
    pub fn decode(&self, protocol: Protocol, bytes: &[u8]) -> Result<DecodedMessage, CodecError> {
        decode(protocol, bytes, &self.config)
    }

    /// Encode a message into a PDU
    pub fn encode(&self, request: &EncodeRequest) -> Result<Pdu, CodecError> {
        encode(request, &self.config)
    }
}

/// Decode a PDU received in the given format
pub fn decode(
    protocol: Protocol,
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<DecodedMessage, CodecError> {
    dump_pdu(&format!("Decoding {protocol} PDU"), bytes);

    let message = match protocol {
        Protocol::Gsm => SmsMessage::from_bytes(bytes, config)?,
        Protocol::CellBroadcast => {
            SmsMessage::CellBroadcast(CellBroadcast::from_bytes(bytes, config)?)
        }
        Protocol::Cdma => {
            let pdu = CdmaPdu::from_bytes(bytes, config)?;
            pdu.to_message(config)?
        }
    };

    tracing::debug!("Decoded {} {}", protocol, message.kind_name());
    Ok(DecodedMessage { protocol, message })
}

/// Encode a message into a PDU
pub fn encode(request: &EncodeRequest, config: &CodecConfig) -> Result<Pdu, CodecError> {
    let data = request.to_bytes(config)?;
    dump_pdu(&format!("Encoded {} PDU", request.protocol), &data);
    Ok(Pdu {
        protocol: request.protocol,
        data,
    })
}
