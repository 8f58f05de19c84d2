// ABOUTME: Semi-octet phone number codec and GSM type-of-address octet
// ABOUTME: Handles international prefixes, F filler nibbles and 7-bit alphanumeric originators

use crate::codec::{CodecError, decode_u8};
use crate::datatypes::gsm7::unpack7;
use crate::datatypes::{NumericPlanIndicator, TypeOfNumber};
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use std::io::Cursor;

/// Longest phone number accepted or produced, in digits.
pub const MAX_PHONE_DIGITS: usize = 20;

/// Type-of-address octet: extension bit, type of number, numbering plan.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TypeOfAddress(u8);

impl TypeOfAddress {
    /// International number, ISDN numbering plan
    pub const INTERNATIONAL: TypeOfAddress = TypeOfAddress(0x91);
    /// Unknown type, ISDN numbering plan
    pub const UNKNOWN: TypeOfAddress = TypeOfAddress(0x81);

    pub fn new(ton: TypeOfNumber, npi: NumericPlanIndicator) -> Self {
        TypeOfAddress(0x80 | ((ton as u8) << 4) | npi as u8)
    }

    pub fn from_byte(value: u8) -> Self {
        TypeOfAddress(value)
    }

    pub fn to_byte(&self) -> u8 {
        self.0
    }

    /// Type of number, `None` for the reserved value
    pub fn type_of_number(&self) -> Option<TypeOfNumber> {
        TypeOfNumber::try_from((self.0 >> 4) & 0x07).ok()
    }

    /// Numbering plan, `None` for reserved values
    pub fn numbering_plan(&self) -> Option<NumericPlanIndicator> {
        NumericPlanIndicator::try_from(self.0 & 0x0F).ok()
    }

    pub fn is_international(&self) -> bool {
        *self == Self::INTERNATIONAL
    }

    pub fn is_alphanumeric(&self) -> bool {
        self.type_of_number() == Some(TypeOfNumber::Alphanumeric)
    }
}

impl fmt::Debug for TypeOfAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeOfAddress(0x{:02X}, {:?}, {:?})",
            self.0,
            self.type_of_number(),
            self.numbering_plan()
        )
    }
}

/// A phone number in its wire form.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedAddress {
    /// Nibble-swapped BCD digits, odd counts padded with an F nibble
    pub semi_octets: Vec<u8>,
    /// Number of useful semi-octets
    pub digits: u8,
    pub toa: TypeOfAddress,
}

impl EncodedAddress {
    /// Writes the length octet, the type-of-address octet and the digits.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.digits);
        buf.put_u8(self.toa.to_byte());
        buf.put_slice(&self.semi_octets);
    }

    /// Size on the wire including the two header octets.
    pub fn encoded_size(&self) -> usize {
        2 + self.semi_octets.len()
    }
}

fn digit_to_nibble(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '*' => Some(0x0A),
        '#' => Some(0x0B),
        'a' | 'A' => Some(0x0C),
        'b' | 'B' => Some(0x0D),
        'c' | 'C' => Some(0x0E),
        _ => None,
    }
}

fn nibble_to_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => char::from(b'0' + nibble),
        0x0A => '*',
        0x0B => '#',
        0x0C => 'a',
        0x0D => 'b',
        _ => 'c',
    }
}

/// Encodes a phone number into semi-octets.
///
/// A leading `+` selects [`TypeOfAddress::INTERNATIONAL`] and is not
/// encoded; anything else is [`TypeOfAddress::UNKNOWN`].
pub fn encode_phone_number(number: &str) -> Result<EncodedAddress, CodecError> {
    let (toa, digits) = match number.strip_prefix('+') {
        Some(rest) => (TypeOfAddress::INTERNATIONAL, rest),
        None => (TypeOfAddress::UNKNOWN, number),
    };

    if digits.is_empty() {
        return Err(CodecError::BadParameter {
            field: "address",
            reason: "empty phone number".to_string(),
        });
    }

    let nibbles = digits
        .chars()
        .map(|c| {
            digit_to_nibble(c).ok_or_else(|| CodecError::BadParameter {
                field: "address",
                reason: format!("invalid character {c:?} in phone number"),
            })
        })
        .collect::<Result<Vec<u8>, CodecError>>()?;

    if nibbles.len() > MAX_PHONE_DIGITS {
        return Err(CodecError::BadParameter {
            field: "address",
            reason: format!(
                "{} digits, at most {MAX_PHONE_DIGITS} allowed",
                nibbles.len()
            ),
        });
    }

    let semi_octets = nibbles
        .chunks(2)
        .map(|pair| {
            let high = pair.get(1).copied().unwrap_or(0x0F);
            (high << 4) | pair[0]
        })
        .collect();

    Ok(EncodedAddress {
        semi_octets,
        digits: nibbles.len() as u8,
        toa,
    })
}

/// Decodes `digits` semi-octets back into a phone number.
///
/// Prefixes `+` for international numbers. An F nibble ends the number.
pub fn decode_phone_number(
    semi_octets: &[u8],
    digits: usize,
    toa: TypeOfAddress,
) -> Result<String, CodecError> {
    if digits > MAX_PHONE_DIGITS {
        return Err(CodecError::Overflow {
            field: "address",
            needed: digits,
            capacity: MAX_PHONE_DIGITS,
        });
    }

    let mut number = String::with_capacity(digits + 1);
    if toa.is_international() {
        number.push('+');
    }

    let nibbles = semi_octets
        .iter()
        .flat_map(|b| [b & 0x0F, b >> 4])
        .take(digits);
    for nibble in nibbles {
        if nibble == 0x0F {
            break;
        }
        number.push(nibble_to_digit(nibble));
    }

    Ok(number)
}

/// Reads a TP-OA/TP-DA/TP-RA field: length, type of address and value.
///
/// Alphanumeric originators (type of number 5) carry packed 7-bit text
/// instead of digits.
pub fn decode_address(buf: &mut Cursor<&[u8]>) -> Result<String, CodecError> {
    let length = usize::from(decode_u8(buf)?);
    let toa = TypeOfAddress::from_byte(decode_u8(buf)?);
    let octets = length.div_ceil(2);

    if buf.remaining() < octets {
        return Err(CodecError::Incomplete);
    }
    let body = buf.copy_to_bytes(octets);

    if !toa.is_alphanumeric() {
        return decode_phone_number(&body, length, toa);
    }

    let chars = ((length / 2) * 8) / 7;
    tracing::debug!(
        "Alphanumeric address: {} semi-octets, {} characters",
        length,
        chars
    );
    if chars == 0 {
        return Err(CodecError::Unsupported(format!(
            "alphanumeric address of {length} semi-octets"
        )));
    }

    let text = unpack7(&body, chars);
    if text.len() > MAX_PHONE_DIGITS {
        return Err(CodecError::Overflow {
            field: "address",
            needed: text.len(),
            capacity: MAX_PHONE_DIGITS,
        });
    }

    // unpacked text is ISO-8859-1, which maps one-to-one onto chars
    Ok(text.into_iter().map(char::from).collect())
}
