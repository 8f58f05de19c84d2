// ABOUTME: CDMA address and sub-address parameters (C.S0015-B 3.4.3.3 and 3.4.3.4)
// ABOUTME: Converts between phone numbers and DTMF nibbles or 8-bit address characters

use crate::bits::{BitReader, BitWriter};
use crate::cdma::types::from_wire;
use crate::codec::CodecError;
use num_enum::TryFromPrimitive;

/// Storage reserved for address characters, in bytes.
pub const ADDRESS_CAPACITY: usize = 50;

/// DTMF code to character; code 0 is not a valid digit.
const DTMF_CHARS: &[u8; 16] = b"D1234567890*#ABC";

/// Number type of an 8-bit address (C.S0005-D Table 2.7.1.3.2.4-2)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NumberType {
    #[default]
    Unknown = 0,
    International = 1,
    National = 2,
    NetworkSpecific = 3,
    Subscriber = 4,
    Reserved = 5,
    Abbreviated = 6,
    Extension = 7,
}

/// Numbering plan of an 8-bit address (C.S0005-D Table 2.7.1.3.2.4-3)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NumberPlan {
    #[default]
    Unknown = 0,
    Isdn = 1,
    Data = 3,
    Telex = 4,
    Private = 9,
    Extension = 15,
}

/// Address characters, tagged by digit mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressDigits {
    /// Digit mode 0: one 4-bit DTMF code per field
    Dtmf(Vec<u8>),
    /// Digit mode 1: one 8-bit character per field
    Octets {
        number_type: NumberType,
        /// Carried only when the number mode flag is clear
        number_plan: Option<NumberPlan>,
        chars: Vec<u8>,
    },
}

impl AddressDigits {
    /// Number of address fields
    pub fn len(&self) -> usize {
        match self {
            AddressDigits::Dtmf(codes) => codes.len(),
            AddressDigits::Octets { chars, .. } => chars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn field_width(&self) -> u32 {
        match self {
            AddressDigits::Dtmf(_) => 4,
            AddressDigits::Octets { .. } => 8,
        }
    }
}

/// Originating, destination or call-back address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdmaAddress {
    /// Set for data network addresses (e-mail, IP)
    pub number_mode: bool,
    pub digits: AddressDigits,
}

fn check_capacity(field: &'static str, fields: usize, width: u32) -> Result<(), CodecError> {
    let bits = fields * width as usize;
    if bits > ADDRESS_CAPACITY * 8 {
        tracing::warn!(
            "Address buffer too small for {} fields of {} bits",
            fields,
            width
        );
        return Err(CodecError::Overflow {
            field,
            needed: bits.div_ceil(8),
            capacity: ADDRESS_CAPACITY,
        });
    }
    Ok(())
}

impl CdmaAddress {
    /// Builds a DTMF address from a phone number, dropping a leading `+`.
    pub fn from_phone_number(number: &str) -> Result<Self, CodecError> {
        let digits = number.strip_prefix('+').unwrap_or(number);
        if digits.is_empty() {
            return Err(CodecError::BadParameter {
                field: "address",
                reason: "empty phone number".to_string(),
            });
        }
        check_capacity("address", digits.len(), 4)?;

        let codes = digits
            .bytes()
            .map(|c| {
                DTMF_CHARS
                    .iter()
                    .position(|&d| d == c)
                    .map(|code| code as u8)
                    .ok_or_else(|| CodecError::BadParameter {
                        field: "address",
                        reason: format!("invalid DTMF character {:?}", char::from(c)),
                    })
            })
            .collect::<Result<Vec<u8>, CodecError>>()?;

        Ok(Self {
            number_mode: false,
            digits: AddressDigits::Dtmf(codes),
        })
    }

    /// Renders the address as text.
    ///
    /// DTMF code 0 has no character and is a fault.
    pub fn to_phone_number(&self) -> Result<String, CodecError> {
        match &self.digits {
            AddressDigits::Dtmf(codes) => codes
                .iter()
                .map(|&code| match code {
                    1..=15 => Ok(char::from(DTMF_CHARS[usize::from(code)])),
                    _ => {
                        tracing::warn!("{} digit code is not possible", code);
                        Err(CodecError::Fault(format!("invalid DTMF code {code}")))
                    }
                })
                .collect(),
            AddressDigits::Octets { chars, .. } => {
                Ok(chars.iter().copied().map(char::from).collect())
            }
        }
    }

    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        let digit_mode = reader.read_flag()?;
        let number_mode = reader.read_flag()?;

        let mut header = None;
        if digit_mode {
            let number_type: NumberType = from_wire("number_type", reader.read_bits(3)? as u8)?;
            let number_plan = if number_mode {
                None
            } else {
                Some(from_wire::<NumberPlan>("number_plan", reader.read_bits(4)? as u8)?)
            };
            header = Some((number_type, number_plan));
        }

        let fields = usize::from(reader.read_u8()?);
        let width = if digit_mode { 8 } else { 4 };
        check_capacity("address", fields, width)?;

        let chars = (0..fields)
            .map(|_| reader.read_bits(width).map(|v| v as u8))
            .collect::<Result<Vec<u8>, CodecError>>()?;

        let digits = match header {
            Some((number_type, number_plan)) => AddressDigits::Octets {
                number_type,
                number_plan,
                chars,
            },
            None => AddressDigits::Dtmf(chars),
        };
        Ok(Self {
            number_mode,
            digits,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        let width = self.digits.field_width();
        let fields = self.digits.len();
        check_capacity("address", fields, width)?;

        writer.write_flag(matches!(self.digits, AddressDigits::Octets { .. }))?;
        writer.write_flag(self.number_mode)?;

        let chars = match &self.digits {
            AddressDigits::Dtmf(codes) => codes,
            AddressDigits::Octets {
                number_type,
                number_plan,
                chars,
            } => {
                writer.write_bits(*number_type as u32, 3)?;
                if !self.number_mode {
                    writer.write_bits(number_plan.unwrap_or_default() as u32, 4)?;
                }
                chars
            }
        };

        writer.write_u8(fields as u8)?;
        for &c in chars {
            writer.write_bits(u32::from(c), width)?;
        }
        Ok(())
    }
}

/// Sub-address type (Table 3.4.3.4-1)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SubAddressType {
    #[default]
    Nsap = 0,
    UserSpecified = 1,
}

/// Originating or destination sub-address
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CdmaSubAddress {
    pub sub_type: SubAddressType,
    /// Odd number of BCD digits in the last character
    pub odd: bool,
    pub chars: Vec<u8>,
}

impl CdmaSubAddress {
    pub(crate) fn read(reader: &mut BitReader<'_>) -> Result<Self, CodecError> {
        let sub_type = from_wire("sub_address_type", reader.read_bits(3)? as u8)?;
        let odd = reader.read_flag()?;
        let fields = usize::from(reader.read_u8()?);
        check_capacity("sub_address", fields, 8)?;

        let chars = (0..fields)
            .map(|_| reader.read_u8())
            .collect::<Result<Vec<u8>, CodecError>>()?;
        Ok(Self {
            sub_type,
            odd,
            chars,
        })
    }

    pub(crate) fn write(&self, writer: &mut BitWriter) -> Result<(), CodecError> {
        check_capacity("sub_address", self.chars.len(), 8)?;
        writer.write_bits(self.sub_type as u32, 3)?;
        writer.write_flag(self.odd)?;
        writer.write_u8(self.chars.len() as u8)?;
        for &c in &self.chars {
            writer.write_u8(c)?;
        }
        Ok(())
    }
}
