use num_enum::TryFromPrimitive;

/// Numbering-plan-identification field (bits 3-0) of a GSM type-of-address octet.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NumericPlanIndicator {
    Unknown = 0b0000,
    ISDN = 0b0001,
    Data = 0b0011,
    Telex = 0b0100,
    ServiceCentre = 0b0101,
    ServiceCentreAlt = 0b0110,
    National = 0b1000,
    Private = 0b1001,
    ERMES = 0b1010,
}
