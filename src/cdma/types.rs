// ABOUTME: Wire enumerations and small fixed-layout records of C.S0015-B
// ABOUTME: Message format, identifiers, priority levels, error classes and BCD dates

use crate::bits::{BitReader, BitWriter};
use crate::codec::CodecError;
use crate::datatypes::GsmTimestamp;
use chrono::{Datelike, Local, Timelike};
use num_enum::TryFromPrimitive;
use std::fmt;

/// Maps a wire value onto a fieldless enum, naming the field on failure.
pub(crate) fn from_wire<T>(field: &'static str, value: u8) -> Result<T, CodecError>
where
    T: TryFromPrimitive<Primitive = u8>,
{
    T::try_from_primitive(value)
        .map_err(|_| CodecError::Unsupported(format!("{field} value {value}")))
}

/// C.S0015-B Table 3.4-1
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MessageFormat {
    #[default]
    PointToPoint = 0,
    Broadcast = 1,
    Acknowledge = 2,
}

/// Wireless Messaging Teleservice (C.S0015-B Table 3.4.3.1-1)
pub const TELESERVICE_WMT: u16 = 0x1002;

/// Parameter identifiers of the transport layer (Table 3.4.3-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParameterId {
    TeleserviceId = 0,
    ServiceCategory = 1,
    OriginatingAddress = 2,
    OriginatingSubAddress = 3,
    DestinationAddress = 4,
    DestinationSubAddress = 5,
    BearerReplyOption = 6,
    CauseCodes = 7,
    BearerData = 8,
}

impl ParameterId {
    /// Body length for parameters with a fixed layout
    pub fn fixed_length(&self) -> Option<usize> {
        match self {
            ParameterId::TeleserviceId | ParameterId::ServiceCategory => Some(2),
            ParameterId::BearerReplyOption => Some(1),
            _ => None,
        }
    }
}

/// Bearer data sub-parameter identifiers (Table 4.5-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubParameterId {
    MessageIdentifier = 0,
    UserData = 1,
    UserResponseCode = 2,
    MessageCenterTimeStamp = 3,
    ValidityPeriodAbsolute = 4,
    ValidityPeriodRelative = 5,
    DeferredDeliveryTimeAbsolute = 6,
    DeferredDeliveryTimeRelative = 7,
    Priority = 8,
    Privacy = 9,
    ReplyOption = 10,
    MessageCount = 11,
    AlertOnDelivery = 12,
    Language = 13,
    CallBackNumber = 14,
    DisplayMode = 15,
    MultipleEncodingUserData = 16,
    DepositIndex = 17,
    ServiceCategoryProgramData = 18,
    ServiceCategoryProgramResults = 19,
    MessageStatus = 20,
    TpFailureCause = 21,
    EnhancedVmn = 22,
    EnhancedVmnAck = 23,
}

impl SubParameterId {
    /// Body length for sub-parameters with a fixed layout
    pub fn fixed_length(&self) -> Option<usize> {
        match self {
            SubParameterId::MessageIdentifier => Some(3),
            SubParameterId::MessageCenterTimeStamp
            | SubParameterId::ValidityPeriodAbsolute
            | SubParameterId::DeferredDeliveryTimeAbsolute => Some(6),
            SubParameterId::DepositIndex => Some(2),
            SubParameterId::UserData | SubParameterId::CallBackNumber => None,
            SubParameterId::MultipleEncodingUserData
            | SubParameterId::ServiceCategoryProgramData
            | SubParameterId::ServiceCategoryProgramResults
            | SubParameterId::EnhancedVmn
            | SubParameterId::EnhancedVmnAck => None,
            _ => Some(1),
        }
    }
}

/// Bearer data message type (Table 4.5.1-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Reserved = 0,
    Deliver = 1,
    Submit = 2,
    Cancellation = 3,
    DeliveryAck = 4,
    UserAck = 5,
    ReadAck = 6,
    DeliverReport = 7,
    SubmitReport = 8,
}

/// Message Identifier sub-parameter (4.5.1)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MessageIdentifier {
    pub message_type: MessageType,
    pub message_id: u16,
    pub header_indication: bool,
}

impl MessageIdentifier {
    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        let message_type = from_wire("message_type", reader.read_bits(4)? as u8)?;
        let message_id = reader.read_u16()?;
        let header_indication = reader.read_flag()?;
        Ok(Self {
            message_type,
            message_id,
            header_indication,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        writer.write_bits(self.message_type as u32, 4)?;
        writer.write_u16(self.message_id)?;
        writer.write_flag(self.header_indication)
    }
}

/// Priority indicator (Table 4.5.9-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Normal = 0,
    Interactive = 1,
    Urgent = 2,
    Emergency = 3,
}

/// Privacy indicator (Table 4.5.10-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Privacy {
    #[default]
    NotRestricted = 0,
    Restricted = 1,
    Confidential = 2,
    Secret = 3,
}

/// Alert priority for alert on message delivery (Table 4.5.13-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AlertPriority {
    #[default]
    MobileDefault = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

/// Message display mode (Table 4.5.16-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    Immediate = 0,
    #[default]
    MobileDefault = 1,
    UserInvoke = 2,
    Reserved = 3,
}

/// Language indicator (C.R1001 Table 9.2-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Unknown = 0,
    English = 1,
    French = 2,
    Spanish = 3,
    Japanese = 4,
    Korean = 5,
    Chinese = 6,
    Hebrew = 7,
}

/// Error report class shared by cause codes and message status
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ErrorClass {
    #[default]
    NoError = 0,
    Reserved = 1,
    Temporary = 2,
    Permanent = 3,
}

/// Cause Codes parameter (3.4.3.6)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct CauseCodes {
    pub reply_seq: u8,
    pub error_class: ErrorClass,
    /// Only carried on the wire when `error_class` is not [`ErrorClass::NoError`]
    pub error_cause: u8,
}

impl CauseCodes {
    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        let reply_seq = reader.read_bits(6)? as u8;
        let error_class = from_wire("error_class", reader.read_bits(2)? as u8)?;
        let error_cause = if error_class != ErrorClass::NoError {
            reader.read_u8()?
        } else {
            0
        };
        Ok(Self {
            reply_seq,
            error_class,
            error_cause,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        writer.write_bits(u32::from(self.reply_seq), 6)?;
        writer.write_bits(self.error_class as u32, 2)?;
        if self.error_class != ErrorClass::NoError {
            writer.write_u8(self.error_cause)?;
        }
        Ok(())
    }
}

/// Reply Option sub-parameter (4.5.11)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ReplyOption {
    pub user_ack: bool,
    pub delivery_ack: bool,
    pub read_ack: bool,
    pub delivery_report: bool,
}

impl ReplyOption {
    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            user_ack: reader.read_flag()?,
            delivery_ack: reader.read_flag()?,
            read_ack: reader.read_flag()?,
            delivery_report: reader.read_flag()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        writer.write_flag(self.user_ack)?;
        writer.write_flag(self.delivery_ack)?;
        writer.write_flag(self.read_ack)?;
        writer.write_flag(self.delivery_report)
    }
}

/// Message Status sub-parameter (4.5.21)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct MessageStatus {
    pub error_class: ErrorClass,
    /// 6-bit status code (Table 4.5.21-1)
    pub status_code: u8,
}

impl MessageStatus {
    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        let error_class = from_wire("error_class", reader.read_bits(2)? as u8)?;
        let status_code = reader.read_bits(6)? as u8;
        Ok(Self {
            error_class,
            status_code,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        writer.write_bits(self.error_class as u32, 2)?;
        writer.write_bits(u32::from(self.status_code), 6)
    }
}

fn to_bcd(value: u32) -> u8 {
    let value = (value % 100) as u8;
    ((value / 10) << 4) | (value % 10)
}

fn from_bcd(octet: u8) -> u32 {
    u32::from(octet >> 4) * 10 + u32::from(octet & 0x0F)
}

/// Absolute date of the time stamp sub-parameters (4.5.4)
///
/// Each field is one BCD octet, most significant digit in the high nibble.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct CdmaDate {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl CdmaDate {
    /// Builds a BCD date from a calendar date and time of day.
    pub fn from_datetime<T: Datelike + Timelike>(datetime: &T) -> Self {
        Self {
            year: to_bcd(datetime.year().unsigned_abs()),
            month: to_bcd(datetime.month()),
            day: to_bcd(datetime.day()),
            hours: to_bcd(datetime.hour()),
            minutes: to_bcd(datetime.minute()),
            seconds: to_bcd(datetime.second()),
        }
    }

    /// Current local wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            year: reader.read_u8()?,
            month: reader.read_u8()?,
            day: reader.read_u8()?,
            hours: reader.read_u8()?,
            minutes: reader.read_u8()?,
            seconds: reader.read_u8()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        for octet in [
            self.year,
            self.month,
            self.day,
            self.hours,
            self.minutes,
            self.seconds,
        ] {
            writer.write_u8(octet)?;
        }
        Ok(())
    }
}

impl From<&GsmTimestamp> for CdmaDate {
    fn from(ts: &GsmTimestamp) -> Self {
        Self {
            year: to_bcd(ts.year().into()),
            month: to_bcd(ts.month().into()),
            day: to_bcd(ts.day().into()),
            hours: to_bcd(ts.hour().into()),
            minutes: to_bcd(ts.minute().into()),
            seconds: to_bcd(ts.second().into()),
        }
    }
}

impl fmt::Display for CdmaDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{},{}:{}:{}",
            from_bcd(self.year) % 100,
            from_bcd(self.month) % 100,
            from_bcd(self.day) % 100,
            from_bcd(self.hours) % 100,
            from_bcd(self.minutes) % 100,
            from_bcd(self.seconds) % 100
        )
    }
}
