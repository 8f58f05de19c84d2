// ABOUTME: GSM 03.38 default alphabet tables and the septet packer used by SMS-PDU user data
// ABOUTME: Converts ISO-8859-1 text to packed 7-bit form and back, including escape sequences

use crate::codec::CodecError;

/// Escape to the extension table.
pub const ESCAPE: u8 = 27;

/// 7-bit placeholder for characters with no mapping (`?`).
pub const NPC7: u8 = 63;

/// 8-bit placeholder for characters with no mapping.
pub const NPC8: u8 = b'?';

/// Flag marking entries that are emitted as `ESCAPE` followed by the low 7 bits.
const ESCAPED: u8 = 0x80;

/// ISO-8859-1 to GSM default alphabet.
///
/// Characters without an exact match are replaced by the closest plain
/// character when there is one, otherwise by [`NPC7`]. Entries with the
/// high bit set live in the extension table.
#[rustfmt::skip]
pub static ASCII_8_TO_7: [u8; 256] = [
    // 0x00
    NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7,
    NPC7, NPC7, 10, NPC7, 10 | ESCAPED, 13, NPC7, NPC7,
    // 0x10
    NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7,
    NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7, NPC7,
    // 0x20
    32, 33, 34, 35, 2, 37, 38, 39,
    40, 41, 42, 43, 44, 45, 46, 47,
    // 0x30
    48, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63,
    // 0x40
    0, 65, 66, 67, 68, 69, 70, 71,
    72, 73, 74, 75, 76, 77, 78, 79,
    // 0x50
    80, 81, 82, 83, 84, 85, 86, 87,
    88, 89, 90, 60 | ESCAPED, 47 | ESCAPED, 62 | ESCAPED, 20 | ESCAPED, 17,
    // 0x60
    89 | ESCAPED, 97, 98, 99, 100, 101, 102, 103,
    104, 105, 106, 107, 108, 109, 110, 111,
    // 0x70
    112, 113, 114, 115, 116, 117, 118, 119,
    120, 121, 122, 40 | ESCAPED, 64 | ESCAPED, 41 | ESCAPED, 61 | ESCAPED, NPC7,
    // 0x80
    NPC7, NPC7, 39, 102, 34, NPC7, NPC7, NPC7,
    NPC7, NPC7, 83, 39, 214, NPC7, NPC7, NPC7,
    // 0x90
    NPC7, 39, 39, 34, 34, 42, 45, 45,
    39, NPC7, 115, 39, 111, NPC7, NPC7, 89,
    // 0xA0
    32, 64, 99, 1, 36, 3, 33, 95,
    34, NPC7, NPC7, 60, NPC7, 45, NPC7, NPC7,
    // 0xB0
    NPC7, NPC7, 50, 51, 39, 117, NPC7, NPC7,
    NPC7, 49, NPC7, 62, NPC7, NPC7, NPC7, 96,
    // 0xC0
    65, 65, 65, 65, 91, 14, 28, 9,
    31, 31, 31, 31, 73, 73, 73, 73,
    // 0xD0
    68, 93, 79, 79, 79, 79, 92, 42,
    11, 85, 85, 85, 94, 89, NPC7, 30,
    // 0xE0
    127, 97, 97, 97, 123, 15, 29, 9,
    4, 5, 101, 101, 7, 7, 105, 105,
    // 0xF0
    NPC7, 125, 8, 111, 111, 111, 24, 47,
    12, 6, 117, 117, 126, 121, NPC7, 121,
];

/// GSM default alphabet to ISO-8859-1.
///
/// Greek capitals have no ISO-8859-1 equivalent and map to [`NPC8`].
/// Position 27 is the escape and is handled by [`unpack7`].
#[rustfmt::skip]
pub static ASCII_7_TO_8: [u8; 128] = [
    // 0x00
    64, 163, 36, 165, 232, 233, 249, 236,
    242, 199, 10, 216, 248, 13, 197, 229,
    // 0x10
    NPC8, 95, NPC8, NPC8, NPC8, NPC8, NPC8, NPC8,
    NPC8, NPC8, NPC8, ESCAPE, 198, 230, 223, 201,
    // 0x20
    32, 33, 34, 35, 164, 37, 38, 39,
    40, 41, 42, 43, 44, 45, 46, 47,
    // 0x30
    48, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63,
    // 0x40
    161, 65, 66, 67, 68, 69, 70, 71,
    72, 73, 74, 75, 76, 77, 78, 79,
    // 0x50
    80, 81, 82, 83, 84, 85, 86, 87,
    88, 89, 90, 196, 214, 209, 220, 167,
    // 0x60
    191, 97, 98, 99, 100, 101, 102, 103,
    104, 105, 106, 107, 108, 109, 110, 111,
    // 0x70
    112, 113, 114, 115, 116, 117, 118, 119,
    120, 121, 122, 228, 246, 241, 252, 224,
];

/// Extension table lookup for the septet following an escape.
fn extension_to_8bit(septet: u8) -> u8 {
    match septet {
        10 => 12,
        20 => b'^',
        40 => b'{',
        41 => b'}',
        47 => b'\\',
        60 => b'[',
        61 => b'~',
        62 => b']',
        64 => b'|',
        _ => NPC8,
    }
}

/// Packed user data together with its septet count.
///
/// `septets` is what goes in TP-UDL. It exceeds the input length whenever
/// escape sequences were emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct Packed7 {
    pub bytes: Vec<u8>,
    pub septets: usize,
}

/// Number of octets needed to hold `septets` packed characters.
pub fn packed_len(septets: usize) -> usize {
    (septets * 7).div_ceil(8)
}

fn write_septet(bytes: &mut [u8], index: usize, septet: u8) {
    let bit = index * 7;
    let idx = bit / 8;
    let shift = bit % 8;
    let value = u16::from(septet & 0x7F) << shift;

    bytes[idx] |= value as u8;
    if shift > 1 {
        bytes[idx + 1] |= (value >> 8) as u8;
    }
}

fn read_septet(packed: &[u8], index: usize) -> u8 {
    let bit = index * 7;
    let idx = bit / 8;
    let shift = bit % 8;

    let low = packed.get(idx).map_or(0, |b| b >> shift);
    let high = if shift > 1 {
        packed.get(idx + 1).map_or(0, |b| b << (8 - shift))
    } else {
        0
    };
    (low | high) & 0x7F
}

/// Packs ISO-8859-1 text into GSM 7-bit septets, first septet in the low bits.
///
/// Fails with [`CodecError::Overflow`] as soon as the packed form would
/// need more than `capacity` octets. The check runs per character since
/// the escape expansion is only known while converting.
pub fn pack7(text: &[u8], capacity: usize) -> Result<Packed7, CodecError> {
    let mut septets: Vec<u8> = Vec::with_capacity(text.len());

    for &ch in text {
        let mapped = ASCII_8_TO_7[usize::from(ch)];
        let (escape, septet) = if mapped & ESCAPED != 0 {
            (true, mapped & !ESCAPED)
        } else {
            (false, mapped)
        };

        let needed = packed_len(septets.len() + 1 + usize::from(escape));
        if needed > capacity {
            tracing::debug!(
                "7-bit packing overflow: {} octets needed, capacity {}",
                needed,
                capacity
            );
            return Err(CodecError::Overflow {
                field: "user_data",
                needed,
                capacity,
            });
        }

        if escape {
            septets.push(ESCAPE);
        }
        septets.push(septet);
    }

    let mut bytes = vec![0u8; packed_len(septets.len())];
    for (index, &septet) in septets.iter().enumerate() {
        write_septet(&mut bytes, index, septet);
    }

    Ok(Packed7 {
        bytes,
        septets: septets.len(),
    })
}

/// Unpacks `septets` GSM characters into ISO-8859-1 text.
///
/// Escaped characters consume two septets of the count. An escape in the
/// last position, or an escape followed by a value outside the extension
/// table, produces [`NPC8`]. Octets missing from `packed` read as zero.
pub fn unpack7(packed: &[u8], septets: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(septets);
    let mut index = 0;

    while index < septets {
        let septet = read_septet(packed, index);
        index += 1;

        let byte = ASCII_7_TO_8[usize::from(septet)];
        if byte != ESCAPE {
            text.push(byte);
            continue;
        }

        if index < septets {
            text.push(extension_to_8bit(read_septet(packed, index)));
            index += 1;
        } else {
            text.push(NPC8);
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SENDING_MESSAGE: [u8; 18] = [
        0xD4, 0xF2, 0x9C, 0x0E, 0x9A, 0x97, 0xDD, 0xE4, 0xB4, 0xFB, 0x0C, 0x6A, 0x97, 0xE7,
        0xF3, 0xF0, 0xB9, 0x0C,
    ];

    #[test]
    fn test_pack7_plain_text() {
        let packed = pack7(b"Test sending message", 140).unwrap();
        assert_eq!(packed.septets, 20);
        assert_eq!(packed.bytes, TEST_SENDING_MESSAGE);
    }

    #[test]
    fn test_unpack7_plain_text() {
        let text = unpack7(&TEST_SENDING_MESSAGE, 20);
        assert_eq!(text, b"Test sending message");
    }

    #[test]
    fn test_pack7_escape_counts_two_septets() {
        let packed = pack7(b"a[b", 140).unwrap();
        assert_eq!(packed.septets, 4);
        assert_eq!(unpack7(&packed.bytes, packed.septets), b"a[b");
    }

    #[test]
    fn test_extension_characters_round_trip() {
        let text = b"[ ] ^ { } \\ ~ | \x0c";
        let packed = pack7(text, 140).unwrap();
        assert_eq!(packed.septets, text.len() + 9);
        assert_eq!(unpack7(&packed.bytes, packed.septets), text);
    }

    #[test]
    fn test_unmapped_characters_become_placeholder() {
        let packed = pack7(&[0x01, b'A', 0x7F], 140).unwrap();
        assert_eq!(unpack7(&packed.bytes, packed.septets), b"?A?");
    }

    #[test]
    fn test_latin1_round_trip() {
        // é, à, ü, £ exist in the default alphabet
        let text = [0xE9, 0xE0, 0xFC, 0xA3];
        let packed = pack7(&text, 140).unwrap();
        assert_eq!(packed.septets, 4);
        assert_eq!(unpack7(&packed.bytes, packed.septets), text);
    }

    #[test]
    fn test_back_apostrophe_escapes_to_placeholder() {
        let packed = pack7(b"`", 140).unwrap();
        assert_eq!(packed.septets, 2);
        assert_eq!(read_septet(&packed.bytes, 0), ESCAPE);
        assert_eq!(read_septet(&packed.bytes, 1), 89);
        assert_eq!(unpack7(&packed.bytes, packed.septets), b"?");
    }

    #[test]
    fn test_full_alphabet_round_trip_at_capacity() {
        let mut text: Vec<u8> = (0..=255u8)
            .filter(|&ch| {
                let packed = pack7(&[ch], 140).unwrap();
                unpack7(&packed.bytes, packed.septets) == [ch]
            })
            .collect();
        for ch in b"^{}\\[~]|\x0c" {
            assert!(text.contains(ch), "0x{ch:02X} does not round trip");
        }

        let septets = pack7(&text, 140).unwrap().septets;
        text.extend(std::iter::repeat_n(b'A', 160 - septets));

        let packed = pack7(&text, 140).unwrap();
        assert_eq!(packed.septets, 160);
        assert_eq!(packed.bytes.len(), 140);
        assert_eq!(unpack7(&packed.bytes, packed.septets), text);

        text.push(b'A');
        assert!(matches!(
            pack7(&text, 140),
            Err(CodecError::Overflow { field: "user_data", .. })
        ));
    }

    #[test]
    fn test_unknown_escape_and_trailing_escape() {
        // ESC followed by 'A' (65) is not in the extension table
        let mut bytes = vec![0u8; packed_len(3)];
        write_septet(&mut bytes, 0, ESCAPE);
        write_septet(&mut bytes, 1, 65);
        write_septet(&mut bytes, 2, ESCAPE);

        assert_eq!(unpack7(&bytes, 3), b"??");
    }

    #[test]
    fn test_pack7_capacity_boundary() {
        let digits: Vec<u8> = b"1234567890".iter().copied().cycle().take(160).collect();
        let packed = pack7(&digits, 140).unwrap();
        assert_eq!(packed.septets, 160);
        assert_eq!(packed.bytes.len(), 140);

        let mut escaped = vec![b'['];
        escaped.extend_from_slice(&digits[..159]);
        let err = pack7(&escaped, 140).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Overflow {
                needed: 141,
                capacity: 140,
                ..
            }
        ));
    }

    #[test]
    fn test_unpack7_short_buffer_reads_zero() {
        // 'T' then a missing octet: septet 1 is '@' (0)
        let text = unpack7(&[0x54], 2);
        assert_eq!(text, b"T@");
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(8), 7);
        assert_eq!(packed_len(20), 18);
        assert_eq!(packed_len(160), 140);
    }
}
