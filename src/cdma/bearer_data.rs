// ABOUTME: Bearer Data parameter and its sub-parameters (C.S0015-B section 4.5)
// ABOUTME: Decodes sub-parameter TLVs 0-21 and re-encodes present ones in identifier order

use crate::bits::{BitReader, BitWriter};
use crate::cdma::address::CdmaAddress;
use crate::cdma::tlv::{TlvIter, read_record, write_record};
use crate::cdma::types::{
    AlertPriority, CdmaDate, DisplayMode, Language, MessageIdentifier, MessageStatus, Priority,
    Privacy, ReplyOption, SubParameterId, from_wire,
};
use crate::codec::CodecError;
use num_enum::TryFromPrimitive;

/// User data encoding (C.R1001 Table 9.1-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum UserDataEncoding {
    Octet = 0,
    ExtendedProtocolMessage = 1,
    #[default]
    SevenBitAscii = 2,
    Ia5 = 3,
    Unicode = 4,
    ShiftJis = 5,
    Korean = 6,
    LatinHebrew = 7,
    Latin = 8,
    Gsm7BitDefault = 9,
    GsmDataCodingScheme = 10,
}

impl UserDataEncoding {
    /// Width of one character field, for the encodings this codec handles
    pub fn field_width(&self) -> Option<u32> {
        match self {
            UserDataEncoding::SevenBitAscii => Some(7),
            UserDataEncoding::Octet => Some(8),
            UserDataEncoding::Unicode => Some(16),
            _ => None,
        }
    }

    /// Whether a message type octet follows the encoding
    pub fn has_message_type(&self) -> bool {
        matches!(
            self,
            UserDataEncoding::ExtendedProtocolMessage | UserDataEncoding::GsmDataCodingScheme
        )
    }

    fn require_width(&self) -> Result<u32, CodecError> {
        self.field_width().ok_or_else(|| {
            tracing::warn!("encoding {:?} not supported", self);
            CodecError::Unsupported(format!("user data encoding {self:?}"))
        })
    }
}

/// User Data sub-parameter (4.5.2)
///
/// `chars` holds one byte per field for 7-bit ASCII and octet encodings and
/// two big-endian bytes per field for Unicode.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CdmaUserData {
    pub encoding: UserDataEncoding,
    pub message_type: Option<u8>,
    pub chars: Vec<u8>,
}

impl CdmaUserData {
    /// Number of character fields, `None` when the encoding is not handled
    pub fn fields(&self) -> Option<usize> {
        match self.encoding.field_width()? {
            16 => Some(self.chars.len() / 2),
            _ => Some(self.chars.len()),
        }
    }

    fn read(reader: &mut BitReader<'_>, capacity: usize) -> Result<Self, CodecError> {
        let encoding: UserDataEncoding = from_wire("encoding", reader.read_bits(5)? as u8)?;
        let message_type = if encoding.has_message_type() {
            Some(reader.read_u8()?)
        } else {
            None
        };
        let fields = usize::from(reader.read_u8()?);
        let width = encoding.require_width()?;

        let bits = fields * width as usize;
        if bits > capacity * 8 {
            tracing::warn!("Internal buffer of user data is too small {}", fields);
            return Err(CodecError::Overflow {
                field: "user_data",
                needed: bits.div_ceil(8),
                capacity,
            });
        }

        let mut chars = Vec::with_capacity(fields * 2);
        for _ in 0..fields {
            let value = reader.read_bits(width)?;
            if width == 16 {
                chars.extend_from_slice(&(value as u16).to_be_bytes());
            } else {
                chars.push(value as u8);
            }
        }

        Ok(Self {
            encoding,
            message_type,
            chars,
        })
    }

    fn write(&self, writer: &mut BitWriter, capacity: usize) -> Result<(), CodecError> {
        let width = self.encoding.require_width()?;
        let fields = self.fields().unwrap_or_default();
        let bits = fields * width as usize;
        if fields > usize::from(u8::MAX) || bits > capacity * 8 {
            tracing::warn!("Overflow occur when encoding user data ({} fields)", fields);
            return Err(CodecError::Overflow {
                field: "user_data",
                needed: bits.div_ceil(8),
                capacity,
            });
        }

        writer.write_bits(self.encoding as u32, 5)?;
        if self.encoding.has_message_type() {
            writer.write_u8(self.message_type.unwrap_or_default())?;
        }
        writer.write_u8(fields as u8)?;

        if width == 16 {
            for pair in self.chars.chunks_exact(2) {
                writer.write_u16(u16::from_be_bytes([pair[0], pair[1]]))?;
            }
        } else {
            for &c in &self.chars {
                writer.write_bits(u32::from(c), width)?;
            }
        }
        Ok(())
    }
}

/// Bearer Data parameter: one optional field per sub-parameter
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BearerData {
    pub message_identifier: Option<MessageIdentifier>,
    pub user_data: Option<CdmaUserData>,
    pub user_response_code: Option<u8>,
    pub message_center_time_stamp: Option<CdmaDate>,
    pub validity_period_absolute: Option<CdmaDate>,
    pub validity_period_relative: Option<u8>,
    pub deferred_delivery_time_absolute: Option<CdmaDate>,
    pub deferred_delivery_time_relative: Option<u8>,
    pub priority: Option<Priority>,
    pub privacy: Option<Privacy>,
    pub reply_option: Option<ReplyOption>,
    pub message_count: Option<u8>,
    pub alert_on_delivery: Option<AlertPriority>,
    pub language: Option<Language>,
    pub call_back_number: Option<CdmaAddress>,
    pub display_mode: Option<DisplayMode>,
    pub deposit_index: Option<u16>,
    pub message_status: Option<MessageStatus>,
    pub tp_failure_cause: Option<u8>,
}

fn read_2bit<T>(field: &'static str, reader: &mut BitReader<'_>) -> Result<T, CodecError>
where
    T: TryFromPrimitive<Primitive = u8>,
{
    from_wire(field, reader.read_bits(2)? as u8)
}

impl BearerData {
    /// Decodes the sub-parameters of a Bearer Data body.
    ///
    /// Unknown or malformed sub-parameters are logged and skipped; the
    /// remaining ones still decode.
    pub fn decode(body: &[u8], user_data_capacity: usize) -> Self {
        let mut bearer = BearerData::default();

        for tlv in TlvIter::new(body, "sub-parameter") {
            let Ok(id) = SubParameterId::try_from(tlv.tag) else {
                tracing::warn!("Do not support this subparameter Id: {}", tlv.tag);
                continue;
            };
            let name = format!("{id:?}");
            let fixed = id.fixed_length();

            macro_rules! field {
                ($slot:ident, $read:expr) => {
                    if let Some(value) = read_record(&tlv, &name, fixed, $read) {
                        bearer.$slot = Some(value);
                    }
                };
            }

            match id {
                SubParameterId::MessageIdentifier => {
                    field!(message_identifier, MessageIdentifier::read)
                }
                SubParameterId::UserData => {
                    field!(user_data, |r| CdmaUserData::read(r, user_data_capacity))
                }
                SubParameterId::UserResponseCode => field!(user_response_code, |r| r.read_u8()),
                SubParameterId::MessageCenterTimeStamp => {
                    field!(message_center_time_stamp, CdmaDate::read)
                }
                SubParameterId::ValidityPeriodAbsolute => {
                    field!(validity_period_absolute, CdmaDate::read)
                }
                SubParameterId::ValidityPeriodRelative => {
                    field!(validity_period_relative, |r| r.read_u8())
                }
                SubParameterId::DeferredDeliveryTimeAbsolute => {
                    field!(deferred_delivery_time_absolute, CdmaDate::read)
                }
                SubParameterId::DeferredDeliveryTimeRelative => {
                    field!(deferred_delivery_time_relative, |r| r.read_u8())
                }
                SubParameterId::Priority => field!(priority, |r| read_2bit("priority", r)),
                SubParameterId::Privacy => field!(privacy, |r| read_2bit("privacy", r)),
                SubParameterId::ReplyOption => field!(reply_option, ReplyOption::read),
                SubParameterId::MessageCount => field!(message_count, |r| r.read_u8()),
                SubParameterId::AlertOnDelivery => {
                    field!(alert_on_delivery, |r| read_2bit("alert_priority", r))
                }
                SubParameterId::Language => {
                    field!(language, |r| from_wire("language", r.read_u8()?))
                }
                SubParameterId::CallBackNumber => field!(call_back_number, CdmaAddress::read),
                SubParameterId::DisplayMode => {
                    field!(display_mode, |r| read_2bit("display_mode", r))
                }
                SubParameterId::DepositIndex => field!(deposit_index, |r| r.read_u16()),
                SubParameterId::MessageStatus => field!(message_status, MessageStatus::read),
                SubParameterId::TpFailureCause => field!(tp_failure_cause, |r| r.read_u8()),
                SubParameterId::MultipleEncodingUserData
                | SubParameterId::ServiceCategoryProgramData
                | SubParameterId::ServiceCategoryProgramResults
                | SubParameterId::EnhancedVmn
                | SubParameterId::EnhancedVmnAck => {
                    tracing::warn!("Do not support this subparameter Id: {}", tlv.tag);
                }
            }
        }

        bearer
    }

    /// Encodes every present sub-parameter in identifier order.
    pub fn encode(
        &self,
        writer: &mut BitWriter,
        user_data_capacity: usize,
    ) -> Result<(), CodecError> {
        use SubParameterId as Id;

        if let Some(id) = &self.message_identifier {
            write_record(writer, Id::MessageIdentifier as u8, |w| id.write(w))?;
        }
        if let Some(user_data) = &self.user_data {
            write_record(writer, Id::UserData as u8, |w| {
                user_data.write(w, user_data_capacity)
            })?;
        }
        if let Some(code) = self.user_response_code {
            write_record(writer, Id::UserResponseCode as u8, |w| w.write_u8(code))?;
        }
        if let Some(date) = &self.message_center_time_stamp {
            write_record(writer, Id::MessageCenterTimeStamp as u8, |w| date.write(w))?;
        }
        if let Some(date) = &self.validity_period_absolute {
            write_record(writer, Id::ValidityPeriodAbsolute as u8, |w| date.write(w))?;
        }
        if let Some(period) = self.validity_period_relative {
            write_record(writer, Id::ValidityPeriodRelative as u8, |w| {
                w.write_u8(period)
            })?;
        }
        if let Some(date) = &self.deferred_delivery_time_absolute {
            write_record(writer, Id::DeferredDeliveryTimeAbsolute as u8, |w| {
                date.write(w)
            })?;
        }
        if let Some(period) = self.deferred_delivery_time_relative {
            write_record(writer, Id::DeferredDeliveryTimeRelative as u8, |w| {
                w.write_u8(period)
            })?;
        }
        if let Some(priority) = self.priority {
            write_record(writer, Id::Priority as u8, |w| {
                w.write_bits(priority as u32, 2)
            })?;
        }
        if let Some(privacy) = self.privacy {
            write_record(writer, Id::Privacy as u8, |w| w.write_bits(privacy as u32, 2))?;
        }
        if let Some(option) = &self.reply_option {
            write_record(writer, Id::ReplyOption as u8, |w| option.write(w))?;
        }
        if let Some(count) = self.message_count {
            write_record(writer, Id::MessageCount as u8, |w| w.write_u8(count))?;
        }
        if let Some(alert) = self.alert_on_delivery {
            write_record(writer, Id::AlertOnDelivery as u8, |w| {
                w.write_bits(alert as u32, 2)
            })?;
        }
        if let Some(language) = self.language {
            write_record(writer, Id::Language as u8, |w| w.write_u8(language as u8))?;
        }
        if let Some(number) = &self.call_back_number {
            write_record(writer, Id::CallBackNumber as u8, |w| number.write(w))?;
        }
        if let Some(mode) = self.display_mode {
            write_record(writer, Id::DisplayMode as u8, |w| w.write_bits(mode as u32, 2))?;
        }
        if let Some(index) = self.deposit_index {
            write_record(writer, Id::DepositIndex as u8, |w| w.write_u16(index))?;
        }
        if let Some(status) = &self.message_status {
            write_record(writer, Id::MessageStatus as u8, |w| status.write(w))?;
        }
        if let Some(cause) = self.tp_failure_cause {
            write_record(writer, Id::TpFailureCause as u8, |w| w.write_u8(cause))?;
        }
        Ok(())
    }
}
