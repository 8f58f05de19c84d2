// ABOUTME: Bounded MSB-first bit cursors used by the CDMA TLV codec
// ABOUTME: Reads and writes 1-32 bit fields and reports overflow instead of touching out-of-range bytes

use crate::codec::CodecError;
use bytes::{BufMut, Bytes, BytesMut};

/// Maximum width of a single bit access.
pub const MAX_BIT_WIDTH: u32 = 32;

fn check_width(width: u32) -> Result<(), CodecError> {
    if width == 0 || width > MAX_BIT_WIDTH {
        tracing::warn!("Bit width {} out of range (1-{})", width, MAX_BIT_WIDTH);
        return Err(CodecError::InvalidBitWidth(width));
    }
    Ok(())
}

/// Read cursor over a borrowed byte slice, most significant bit first.
///
/// The cursor never advances past the end of the slice. A read that
/// needs more bits than remain fails with [`CodecError::Incomplete`] and
/// leaves the position untouched.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    /// Position in bits from the start of `buf`
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Total number of bits still available.
    pub fn remaining_bits(&self) -> usize {
        self.buf.len() * 8 - self.position
    }

    /// Index of the byte holding the next unread bit.
    pub fn byte_position(&self) -> usize {
        self.position / 8
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Reads the next `width` bits as an unsigned integer.
    pub fn read_bits(&mut self, width: u32) -> Result<u32, CodecError> {
        check_width(width)?;
        if (width as usize) > self.remaining_bits() {
            return Err(CodecError::Incomplete);
        }

        let mut value: u32 = 0;
        let mut pending = width;
        while pending > 0 {
            let byte = self.buf[self.position / 8];
            let offset = (self.position % 8) as u32;
            let available = 8 - offset;
            let take = available.min(pending);
            let bits = (u32::from(byte) >> (available - take)) & ((1u32 << take) - 1);
            value = (value << take) | bits;
            self.position += take as usize;
            pending -= take;
        }
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(self.read_bits(16)? as u16)
    }

    pub fn read_flag(&mut self) -> Result<bool, CodecError> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Discards the bits left in the current byte.
    pub fn skip_to_byte_boundary(&mut self) {
        self.position = self.position.div_ceil(8) * 8;
    }
}

/// Write cursor over an owned buffer bounded by `capacity` bytes.
///
/// Bits accumulate in a small cache and are flushed a byte at a time.
/// A write that would exceed the capacity writes nothing and returns
/// [`CodecError::Overflow`].
#[derive(Debug)]
pub struct BitWriter {
    buf: BytesMut,
    capacity: usize,
    cache: u64,
    cache_bits: u32,
    field: &'static str,
}

impl BitWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            cache: 0,
            cache_bits: 0,
            field: "pdu",
        }
    }

    /// Names the buffer being written in overflow errors.
    pub fn for_field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }

    /// Number of bits written so far, including cached ones.
    pub fn bit_len(&self) -> usize {
        self.buf.len() * 8 + self.cache_bits as usize
    }

    /// Appends the low `width` bits of `value`.
    pub fn write_bits(&mut self, value: u32, width: u32) -> Result<(), CodecError> {
        check_width(width)?;
        let needed = self.bit_len() + width as usize;
        if needed > self.capacity * 8 {
            tracing::debug!(
                "Bit writer overflow on {}: {} bits needed, capacity {} bytes",
                self.field,
                needed,
                self.capacity
            );
            return Err(CodecError::Overflow {
                field: self.field,
                needed: needed.div_ceil(8),
                capacity: self.capacity,
            });
        }

        let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
        self.cache = (self.cache << width) | u64::from(value & mask);
        self.cache_bits += width;
        while self.cache_bits >= 8 {
            self.cache_bits -= 8;
            self.buf.put_u8((self.cache >> self.cache_bits) as u8);
        }
        self.cache &= (1u64 << self.cache_bits) - 1;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.write_bits(u32::from(value), 8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.write_bits(u32::from(value), 16)
    }

    pub fn write_flag(&mut self, flag: bool) -> Result<(), CodecError> {
        self.write_bits(u32::from(flag), 1)
    }

    /// Flushes a partially written byte, padding the low bits with zeros.
    pub fn flush_with_padding(&mut self) {
        if self.cache_bits > 0 {
            let byte = (self.cache << (8 - self.cache_bits)) as u8;
            self.buf.put_u8(byte);
            self.cache = 0;
            self.cache_bits = 0;
        }
    }

    /// Writes a placeholder length byte and returns its position for [`patch_u8`].
    ///
    /// [`patch_u8`]: BitWriter::patch_u8
    pub fn reserve_u8(&mut self) -> Result<usize, CodecError> {
        self.flush_with_padding();
        let position = self.buf.len();
        self.write_u8(0)?;
        Ok(position)
    }

    /// Backfills a byte reserved earlier.
    pub fn patch_u8(&mut self, position: usize, value: u8) -> Result<(), CodecError> {
        match self.buf.get_mut(position) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CodecError::Fault(format!(
                "patch position {position} beyond written length {}",
                self.buf.len()
            ))),
        }
    }

    /// Patches a reserved length byte with the number of bytes written after it.
    pub fn patch_length(&mut self, position: usize) -> Result<(), CodecError> {
        self.flush_with_padding();
        let length = self.buf.len() - position - 1;
        let length = u8::try_from(length).map_err(|_| CodecError::Overflow {
            field: self.field,
            needed: length,
            capacity: u8::MAX as usize,
        })?;
        self.patch_u8(position, length)
    }

    /// Pads the last byte and returns the written bytes.
    pub fn finish(mut self) -> Bytes {
        self.flush_with_padding();
        self.buf.freeze()
    }
}
