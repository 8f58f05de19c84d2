// ABOUTME: 7-octet GSM service-centre time stamp (TP-SCTS) in swapped-nibble BCD
// ABOUTME: Builds stamps from calendar parts and renders them as YY/MM/DD,hh:mm:ss+zz

use crate::codec::CodecError;
use std::fmt;

/// Rendering of a time stamp that is not exactly seven octets long.
pub const INVALID_TIMESTAMP: &str = "xx/xx/xx,xx:xx:xxxxx";

/// Bit 3 of the seventh octet: negative zone offset.
const ZONE_NEGATIVE: u8 = 0x08;

/// GSM service-centre time stamp (3GPP TS 23.040 §9.2.3.11)
///
/// Each octet holds two decimal digits with the first digit in the low
/// nibble. The seventh octet is the offset from GMT in quarters of an hour;
/// bit 3 carries its sign.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GsmTimestamp([u8; 7]);

fn to_semi_octet(value: u8) -> u8 {
    ((value % 10) << 4) | (value / 10)
}

fn from_semi_octet(octet: u8) -> u8 {
    (octet & 0x0F) * 10 + (octet >> 4)
}

fn check_range(
    field: &'static str,
    value: u8,
    range: std::ops::RangeInclusive<u8>,
) -> Result<u8, CodecError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(CodecError::BadParameter {
            field,
            reason: format!("{value} not in {}..={}", range.start(), range.end()),
        })
    }
}

impl GsmTimestamp {
    pub const SIZE: usize = 7;

    /// Wraps seven raw octets as received.
    pub fn from_bytes(bytes: [u8; 7]) -> Self {
        GsmTimestamp(bytes)
    }

    /// Builds a time stamp from calendar parts.
    ///
    /// `year` is the two-digit year, `zone_quarters` the signed offset from
    /// GMT in quarters of an hour.
    ///
    /// # Example
    ///
    /// ```rust
    /// use smspdu::datatypes::GsmTimestamp;
    ///
    /// let ts = GsmTimestamp::from_parts(14, 7, 31, 20, 55, 17, 8).unwrap();
    /// assert_eq!(ts.to_string(), "14/07/31,20:55:17+08");
    /// ```
    pub fn from_parts(
        year: u8,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        zone_quarters: i8,
    ) -> Result<Self, CodecError> {
        let year = check_range("year", year, 0..=99)?;
        let month = check_range("month", month, 1..=12)?;
        let day = check_range("day", day, 1..=31)?;
        let hour = check_range("hour", hour, 0..=23)?;
        let minute = check_range("minute", minute, 0..=59)?;
        let second = check_range("second", second, 0..=59)?;
        let quarters = check_range("zone", zone_quarters.unsigned_abs(), 0..=79)?;

        let mut zone = to_semi_octet(quarters);
        if zone_quarters < 0 {
            zone |= ZONE_NEGATIVE;
        }

        Ok(GsmTimestamp([
            to_semi_octet(year),
            to_semi_octet(month),
            to_semi_octet(day),
            to_semi_octet(hour),
            to_semi_octet(minute),
            to_semi_octet(second),
            zone,
        ]))
    }

    pub fn as_bytes(&self) -> &[u8; 7] {
        &self.0
    }

    pub fn year(&self) -> u8 {
        from_semi_octet(self.0[0])
    }

    pub fn month(&self) -> u8 {
        from_semi_octet(self.0[1])
    }

    pub fn day(&self) -> u8 {
        from_semi_octet(self.0[2])
    }

    pub fn hour(&self) -> u8 {
        from_semi_octet(self.0[3])
    }

    pub fn minute(&self) -> u8 {
        from_semi_octet(self.0[4])
    }

    pub fn second(&self) -> u8 {
        from_semi_octet(self.0[5])
    }

    /// Signed offset from GMT in quarters of an hour
    pub fn zone_quarters(&self) -> i8 {
        let quarters = from_semi_octet(self.0[6] & !ZONE_NEGATIVE) as i8;
        if self.0[6] & ZONE_NEGATIVE != 0 {
            -quarters
        } else {
            quarters
        }
    }
}

impl fmt::Display for GsmTimestamp {
    // nibbles print in hex so malformed octets show up as a-f
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        let pair = |octet: u8| format!("{:x}{:x}", octet & 0x0F, octet >> 4);
        let sign = if b[6] & ZONE_NEGATIVE != 0 { '-' } else { '+' };
        write!(
            f,
            "{}/{}/{},{}:{}:{}{}{:x}{:x}",
            pair(b[0]),
            pair(b[1]),
            pair(b[2]),
            pair(b[3]),
            pair(b[4]),
            pair(b[5]),
            sign,
            b[6] & 0x07,
            b[6] >> 4
        )
    }
}

impl fmt::Debug for GsmTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GsmTimestamp({self})")
    }
}

/// Renders a raw time stamp field, or [`INVALID_TIMESTAMP`] if it is not seven octets.
pub fn decode_timestamp(bytes: &[u8]) -> String {
    match <[u8; 7]>::try_from(bytes) {
        Ok(octets) => GsmTimestamp(octets).to_string(),
        Err(_) => INVALID_TIMESTAMP.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_wire() {
        let ts = GsmTimestamp::from_bytes([0x41, 0x70, 0x13, 0x02, 0x55, 0x71, 0x80]);
        assert_eq!(ts.to_string(), "14/07/31,20:55:17+08");
        assert_eq!(ts.year(), 14);
        assert_eq!(ts.month(), 7);
        assert_eq!(ts.day(), 31);
        assert_eq!(ts.hour(), 20);
        assert_eq!(ts.minute(), 55);
        assert_eq!(ts.second(), 17);
        assert_eq!(ts.zone_quarters(), 8);
    }

    #[test]
    fn test_negative_zone() {
        let ts = GsmTimestamp::from_parts(16, 1, 21, 15, 1, 39, -4).unwrap();
        assert_eq!(ts.as_bytes()[6], 0x48);
        assert_eq!(ts.zone_quarters(), -4);
        assert_eq!(ts.to_string(), "16/01/21,15:01:39-04");
    }

    #[test]
    fn test_from_parts_matches_wire() {
        let ts = GsmTimestamp::from_parts(15, 6, 8, 12, 5, 16, 8).unwrap();
        assert_eq!(
            ts.as_bytes(),
            &[0x51, 0x60, 0x80, 0x21, 0x50, 0x61, 0x80]
        );
    }

    #[test]
    fn test_from_parts_range_checks() {
        assert!(matches!(
            GsmTimestamp::from_parts(14, 13, 1, 0, 0, 0, 0),
            Err(CodecError::BadParameter { field: "month", .. })
        ));
        assert!(matches!(
            GsmTimestamp::from_parts(14, 1, 1, 24, 0, 0, 0),
            Err(CodecError::BadParameter { field: "hour", .. })
        ));
        assert!(matches!(
            GsmTimestamp::from_parts(100, 1, 1, 0, 0, 0, 0),
            Err(CodecError::BadParameter { field: "year", .. })
        ));
        assert!(matches!(
            GsmTimestamp::from_parts(14, 1, 1, 0, 0, 0, -80),
            Err(CodecError::BadParameter { field: "zone", .. })
        ));
    }

    #[test]
    fn test_decode_timestamp_sentinel() {
        assert_eq!(decode_timestamp(&[0x41, 0x70]), INVALID_TIMESTAMP);
        assert_eq!(
            decode_timestamp(&[0x61, 0x10, 0x12, 0x51, 0x10, 0x93, 0x40]),
            "16/01/21,15:01:39+04"
        );
    }

    #[test]
    fn test_malformed_nibbles_show_as_hex() {
        let ts = GsmTimestamp::from_bytes([0xA1, 0, 0, 0, 0, 0, 0]);
        assert!(ts.to_string().starts_with("1a/"));
    }

    #[test]
    fn test_default_is_all_zero() {
        let ts = GsmTimestamp::default();
        assert_eq!(ts.as_bytes(), &[0; 7]);
        assert_eq!(ts.to_string(), "00/00/00,00:00:00+00");
    }
}
