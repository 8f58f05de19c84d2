pub mod bits;
pub mod cdma;
pub mod codec;
pub mod config;
pub mod datatypes;
pub mod gsm;
pub mod request;

#[cfg(test)]
mod tests;

// Re-export codec types for direct access
pub use codec::{
    CodecError, Decodable, DecodedMessage, Encodable, ErrorKind, Pdu, PduCodec, Protocol, decode,
    encode,
};

pub use config::CodecConfig;
pub use gsm::{Format, SmsMessage};
pub use request::{EncodeRequest, MessageKind};

/// A specialized `Result` type for PDU conversions.
///
/// # Examples
///
/// ## Encoding an SMS-SUBMIT
///
/// ```rust
/// use smspdu::{CodecConfig, EncodeRequest, PduCodec};
///
/// let codec = PduCodec::new(CodecConfig::default());
/// let request = EncodeRequest::builder()
///     .to("0617190547")
///     .text("hello")
///     .build()?;
///
/// let pdu = codec.encode(&request)?;
/// assert_eq!(pdu.data[0], 0x11);
/// # Ok::<(), smspdu::CodecError>(())
/// ```
///
/// ## Decoding a CDMA message
///
/// ```rust
/// use smspdu::{CodecConfig, EncodeRequest, PduCodec, Protocol};
///
/// let codec = PduCodec::new(CodecConfig::default());
/// let request = EncodeRequest::builder()
///     .to("+33661651866")
///     .text("Test sending message")
///     .protocol(Protocol::Cdma)
///     .build()?;
///
/// let pdu = codec.encode(&request)?;
/// let decoded = codec.decode(Protocol::Cdma, &pdu.data)?;
/// assert_eq!(decoded.message.address(), Some("33661651866"));
/// assert_eq!(decoded.message.text().as_deref(), Some("Test sending message"));
/// # Ok::<(), smspdu::CodecError>(())
/// ```
pub type Result<T> = std::result::Result<T, CodecError>;
