// ABOUTME: Strongly-typed GSM TP-DCS octet with alphabet and message class extraction
// ABOUTME: Decides which user-data alphabet a PDU carries and which octet an encoder emits

use std::fmt;

/// User-data alphabet selected by a data coding scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Alphabet {
    /// GSM 7-bit default alphabet, packed
    #[default]
    SevenBit,
    /// 8-bit binary data
    EightBit,
    /// UCS-2 (16-bit) big-endian
    Ucs2,
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alphabet::SevenBit => "GSM 7-bit",
            Alphabet::EightBit => "8-bit",
            Alphabet::Ucs2 => "UCS-2",
        };
        f.write_str(name)
    }
}

/// Message class for SMS delivery
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MessageClass {
    /// Class 0: flash SMS (displayed immediately, not stored)
    Flash,
    /// Class 1: mobile equipment specific
    MobileEquipment,
    /// Class 2: SIM specific
    SimSpecific,
    /// Class 3: terminal equipment specific
    TerminalEquipment,
}

impl MessageClass {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => MessageClass::Flash,
            1 => MessageClass::MobileEquipment,
            2 => MessageClass::SimSpecific,
            _ => MessageClass::TerminalEquipment,
        }
    }

    /// Returns a human-readable description of the message class
    pub fn description(&self) -> &'static str {
        match self {
            MessageClass::Flash => "Flash SMS (immediate display)",
            MessageClass::MobileEquipment => "Mobile Equipment specific",
            MessageClass::SimSpecific => "SIM card storage",
            MessageClass::TerminalEquipment => "Terminal Equipment specific",
        }
    }
}

/// TP-Data-Coding-Scheme octet (3GPP TS 23.038 §4)
///
/// Only two coding groups are understood: general data coding
/// (`00xx xxxx`) and data coding/message class (`1111 xxxx`). Every other
/// group, and the reserved alphabet value of the general group, has no
/// [`alphabet`](DataCoding::alphabet).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DataCoding(u8);

impl DataCoding {
    /// Creates a DataCoding from the raw TP-DCS octet
    pub fn from_byte(value: u8) -> Self {
        DataCoding(value)
    }

    /// Returns the raw octet for the wire
    pub fn to_byte(&self) -> u8 {
        self.0
    }

    /// The octet emitted by the encoder for `alphabet`: general group, no class
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        match alphabet {
            Alphabet::SevenBit => DataCoding(0x00),
            Alphabet::EightBit => DataCoding(0x04),
            Alphabet::Ucs2 => DataCoding(0x08),
        }
    }

    fn is_general_group(&self) -> bool {
        self.0 >> 6 == 0
    }

    fn is_class_group(&self) -> bool {
        self.0 >> 4 == 0x0F
    }

    /// Alphabet carried by the user data, `None` when unsupported
    pub fn alphabet(&self) -> Option<Alphabet> {
        if self.is_general_group() {
            match (self.0 >> 2) & 0x03 {
                0 => Some(Alphabet::SevenBit),
                1 => Some(Alphabet::EightBit),
                2 => Some(Alphabet::Ucs2),
                _ => None,
            }
        } else if self.is_class_group() {
            if (self.0 >> 2) & 0x01 == 0 {
                Some(Alphabet::SevenBit)
            } else {
                Some(Alphabet::EightBit)
            }
        } else {
            None
        }
    }

    /// Returns true if this encoding uses 7-bit character encoding
    pub fn is_7bit(&self) -> bool {
        self.alphabet() == Some(Alphabet::SevenBit)
    }

    /// Returns true if this encoding uses 8-bit character encoding
    pub fn is_8bit(&self) -> bool {
        self.alphabet() == Some(Alphabet::EightBit)
    }

    /// Returns true if this encoding uses 16-bit (Unicode) character encoding
    pub fn is_16bit(&self) -> bool {
        self.alphabet() == Some(Alphabet::Ucs2)
    }

    /// Message class, present in the class group and in the general group
    /// when bit 4 is set
    pub fn message_class(&self) -> Option<MessageClass> {
        if self.is_class_group() || (self.is_general_group() && self.0 & 0x10 != 0) {
            Some(MessageClass::from_bits(self.0))
        } else {
            None
        }
    }

    /// Returns true if the general group marks the text as compressed
    pub fn is_compressed(&self) -> bool {
        self.is_general_group() && self.0 & 0x20 != 0
    }
}

impl fmt::Display for DataCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alphabet() {
            Some(alphabet) => write!(f, "{alphabet}")?,
            None => write!(f, "Unsupported")?,
        }
        if let Some(class) = self.message_class() {
            write!(f, " ({})", class.description())?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataCoding(0x{:02X}, {})", self.0, self)
    }
}

impl From<u8> for DataCoding {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl From<DataCoding> for u8 {
    fn from(data_coding: DataCoding) -> Self {
        data_coding.to_byte()
    }
}
