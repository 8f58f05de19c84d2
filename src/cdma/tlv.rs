// ABOUTME: Tag-length-value framing shared by CDMA parameters and bearer data sub-parameters
// ABOUTME: Iterates TLVs with resynchronisation on the declared length and writes reserve-then-patch bodies

use crate::bits::{BitReader, BitWriter};
use crate::codec::CodecError;

/// One tag-length-value record; `value` holds exactly the declared length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

/// Iterator over consecutive TLVs in a byte slice.
///
/// Each record is handed out bounded to its declared length and the next
/// one starts right after it, whatever the record decoder consumed. A
/// record whose declared length runs past the end of the slice stops the
/// iteration.
#[derive(Clone, Debug)]
pub struct TlvIter<'a> {
    data: &'a [u8],
    position: usize,
    context: &'static str,
}

impl<'a> TlvIter<'a> {
    pub fn new(data: &'a [u8], context: &'static str) -> Self {
        Self {
            data,
            position: 0,
            context,
        }
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Tlv<'a>;

    fn next(&mut self) -> Option<Tlv<'a>> {
        let rest = self.data.get(self.position..)?;
        match rest {
            [] => None,
            [tag, length, body @ ..] if body.len() >= usize::from(*length) => {
                let length = usize::from(*length);
                self.position += 2 + length;
                Some(Tlv {
                    tag: *tag,
                    value: &body[..length],
                })
            }
            _ => {
                tracing::warn!(
                    "Truncated {} TLV at offset {}: {} bytes left",
                    self.context,
                    self.position,
                    rest.len()
                );
                self.position = self.data.len();
                None
            }
        }
    }
}

/// Runs `read` over a TLV body, logging and discarding failures.
///
/// When `fixed_length` is set and the body length differs, the reader is
/// not invoked at all.
pub fn read_record<T, F>(
    tlv: &Tlv<'_>,
    name: &str,
    fixed_length: Option<usize>,
    read: F,
) -> Option<T>
where
    F: FnOnce(&mut BitReader<'_>) -> Result<T, CodecError>,
{
    if let Some(expected) = fixed_length.filter(|&n| n != tlv.value.len()) {
        tracing::error!(
            "{}: {} length should be {}, got {}",
            tlv.tag,
            name,
            expected,
            tlv.value.len()
        );
        return None;
    }

    let mut reader = BitReader::new(tlv.value);
    match read(&mut reader) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{}: could not read {}: {}", tlv.tag, name, e);
            None
        }
    }
}

/// Writes `tag`, a placeholder length, the body and then patches the length.
///
/// The body is padded to a byte boundary before the length is computed.
pub fn write_record<F>(writer: &mut BitWriter, tag: u8, body: F) -> Result<(), CodecError>
where
    F: FnOnce(&mut BitWriter) -> Result<(), CodecError>,
{
    writer.write_u8(tag)?;
    let position = writer.reserve_u8()?;
    body(writer)?;
    writer.patch_length(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_records() {
        let data = [0x00, 0x02, 0x10, 0x02, 0x08, 0x01, 0x00];
        let records: Vec<_> = TlvIter::new(&data, "parameter").collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag, 0);
        assert_eq!(records[0].value, &[0x10, 0x02]);
        assert_eq!(records[1].tag, 8);
        assert_eq!(records[1].value, &[0x00]);
    }

    #[test]
    fn test_truncated_record_stops_iteration() {
        let data = [0x00, 0x02, 0x10, 0x02, 0x08, 0x05, 0x00];
        let records: Vec<_> = TlvIter::new(&data, "parameter").collect();
        assert_eq!(records.len(), 1);

        let lone_tag = [0x00, 0x01, 0x00, 0x07];
        assert_eq!(TlvIter::new(&lone_tag, "parameter").count(), 1);
    }

    #[test]
    fn test_zero_length_record() {
        let data = [0x05, 0x00, 0x06, 0x01, 0xFC];
        let records: Vec<_> = TlvIter::new(&data, "parameter").collect();
        assert_eq!(records[0].value, &[] as &[u8]);
        assert_eq!(records[1].tag, 6);
    }

    #[test]
    fn test_read_record_length_mismatch_skips_reader() {
        let tlv = Tlv {
            tag: 0,
            value: &[0x10],
        };
        let mut called = false;
        let result: Option<u16> = read_record(&tlv, "teleservice", Some(2), |r| {
            called = true;
            r.read_u16()
        });
        assert!(result.is_none());
        assert!(!called);
    }

    #[test]
    fn test_read_record_failure_is_none() {
        let tlv = Tlv {
            tag: 7,
            value: &[0x17],
        };
        let result: Option<u16> = read_record(&tlv, "cause codes", None, |r| r.read_u16());
        assert!(result.is_none());
    }

    #[test]
    fn test_write_record_patches_padded_length() {
        let mut writer = BitWriter::new(8);
        write_record(&mut writer, 6, |w| w.write_bits(5, 6)).unwrap();
        assert_eq!(writer.finish().as_ref(), &[0x06, 0x01, 0x14]);
    }
}
