// ABOUTME: Codec configuration carrying the buffer capacities and PDU layout options
// ABOUTME: Replaces fixed compile-time limits with explicit values passed to every encode/decode call

/// Single-segment TP-UD capacity in octets.
pub const DEFAULT_MAX_PAYLOAD: usize = 140;

/// Maximum number of unpacked 7-bit characters in one segment.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 160;

/// Capacity of an encoded CDMA PDU.
pub const DEFAULT_MAX_PDU_SIZE: usize = 176;

/// Relative validity period of 7 days.
pub const DEFAULT_VALIDITY_PERIOD: u8 = 0xAD;

/// Configuration for the PDU codecs
///
/// Holds the capacities every encode and decode call is checked against,
/// plus the layout choices that depend on the modem in use. The defaults
/// match a single-segment short message with no service-centre address
/// block in front of the PDU.
///
/// # Example
///
/// ```rust
/// use smspdu::CodecConfig;
///
/// // Default configuration (no SMSC block, 7-day validity, 140 octet payload)
/// let config = CodecConfig::default();
///
/// // Modem that prefixes PDUs with the service-centre address
/// let config = CodecConfig::default()
///     .with_smsc_info(true)
///     .with_validity_period(0xA7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Whether GSM PDUs carry a leading service-centre address block (default: false)
    ///
    /// On decode the block is skipped; on encode a single zero byte is written,
    /// telling the modem to use its stored SMSC.
    pub smsc_info: bool,

    /// Relative validity-period octet written in SMS-SUBMIT (default: 0xAD, 7 days)
    pub validity_period: u8,

    /// Capacity in octets of the user-data payload (default: 140)
    pub max_payload: usize,

    /// Longest text accepted for encoding, in characters (default: 160)
    pub max_text_length: usize,

    /// Capacity in octets of an encoded CDMA PDU (default: 176)
    pub max_pdu_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            smsc_info: false,
            validity_period: DEFAULT_VALIDITY_PERIOD,
            max_payload: DEFAULT_MAX_PAYLOAD,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            max_pdu_size: DEFAULT_MAX_PDU_SIZE,
        }
    }
}

impl CodecConfig {
    /// Set whether GSM PDUs include the service-centre address block
    ///
    /// # Example
    ///
    /// ```rust
    /// use smspdu::CodecConfig;
    ///
    /// let config = CodecConfig::default().with_smsc_info(true);
    /// assert!(config.smsc_info);
    /// ```
    pub fn with_smsc_info(mut self, smsc_info: bool) -> Self {
        self.smsc_info = smsc_info;
        self
    }

    /// Set the validity-period octet used by SMS-SUBMIT
    pub fn with_validity_period(mut self, validity_period: u8) -> Self {
        self.validity_period = validity_period;
        self
    }

    /// Set the user-data payload capacity
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Set the longest accepted text length
    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// Set the CDMA PDU capacity
    pub fn with_max_pdu_size(mut self, max_pdu_size: usize) -> Self {
        self.max_pdu_size = max_pdu_size;
        self
    }
}
