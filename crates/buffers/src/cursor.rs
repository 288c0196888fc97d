//! Binary buffer cursor with checked reads.

use crate::{CursorError, WideInt};

/// A sequential, forward-only reader over a fixed byte buffer.
///
/// The cursor maintains a read offset and provides checked reads for
/// fixed-width integers, varints, raw slices and strings. Every read
/// fails with [`CursorError::OutOfData`] instead of panicking when the
/// buffer is exhausted.
///
/// # Example
///
/// ```
/// use abicodec_buffers::ByteCursor;
///
/// let data = [0x01, 0x02, 0x00];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_byte().unwrap(), 0x01);
/// assert_eq!(cursor.read_fixed_int(2, false).unwrap(), 2);
/// ```
pub struct ByteCursor<'a> {
    /// The underlying byte slice.
    pub data: &'a [u8],
    /// Current read offset.
    pub x: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a new cursor over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    /// True iff `n` more bytes can be read.
    pub fn can_read(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Reads one byte.
    pub fn read_byte(&mut self) -> Result<u8, CursorError> {
        if !self.can_read(1) {
            return Err(CursorError::OutOfData);
        }
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a little-endian integer of 1, 2 or 4 bytes.
    ///
    /// Signed values are two's-complement. Any other width fails with
    /// [`CursorError::InvalidWidth`].
    pub fn read_fixed_int(&mut self, width: usize, signed: bool) -> Result<i64, CursorError> {
        if !matches!(width, 1 | 2 | 4) {
            return Err(CursorError::InvalidWidth(width));
        }
        let bytes = self.read_raw(width)?;
        let mut val: u64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            val |= (b as u64) << (i * 8);
        }
        if signed {
            let shift = 64 - width as u32 * 8;
            Ok(((val << shift) as i64) >> shift)
        } else {
            Ok(val as i64)
        }
    }

    /// Reads `byte_count` bytes as a little-endian magnitude.
    ///
    /// When `signed`, the bytes are reinterpreted as two's-complement of
    /// `byte_count * 8` bits. Arbitrary widths are supported; 64, 128 and
    /// 256-bit wire integers all go through here.
    pub fn read_big_int(&mut self, byte_count: usize, signed: bool) -> Result<WideInt, CursorError> {
        let bytes = self.read_raw(byte_count)?;
        Ok(WideInt::from_le_bytes(bytes, signed))
    }

    /// Reads a LEB128-style unsigned varint, truncated to 32 bits.
    ///
    /// The low 7 bits of each byte accumulate at a bit offset growing by 7;
    /// the shift wraps modulo 32, matching the reference 32-bit semantics.
    /// The byte count is not bounded here.
    pub fn read_varuint32(&mut self) -> Result<u32, CursorError> {
        let mut val: u32 = 0;
        let mut bit: u32 = 0;
        loop {
            let b = self.read_byte()?;
            val |= ((b & 0x7f) as u32).wrapping_shl(bit);
            bit = bit.wrapping_add(7);
            if b & 0x80 == 0 {
                break;
            }
        }
        Ok(val)
    }

    /// Reads a signed 32-bit varint.
    ///
    /// Sign restoration follows the reference scheme exactly: for an odd raw
    /// value the result is the complement shifted right by one with the sign
    /// bit forced on. Not the canonical zig-zag formula.
    pub fn read_varint32(&mut self) -> Result<i32, CursorError> {
        let val = self.read_varuint32()?;
        let bits = if val & 1 != 0 {
            (!val >> 1) | 0x8000_0000
        } else {
            val >> 1
        };
        Ok(bits as i32)
    }

    /// Returns a zero-copy view of the next `len` bytes and advances.
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        if !self.can_read(len) {
            return Err(CursorError::OutOfData);
        }
        let val = &self.data[self.x..self.x + len];
        self.x += len;
        Ok(val)
    }

    /// Reads a little-endian 32-bit float.
    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        let bytes = self.read_raw(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian 64-bit float.
    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        let bytes = self.read_raw(8)?;
        Ok(f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Reads a varuint length-prefixed UTF-8 string.
    ///
    /// Malformed sequences decode to the replacement character.
    pub fn read_text(&mut self) -> Result<String, CursorError> {
        let len = self.read_varuint32()? as usize;
        let raw = self.read_raw(len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_byte() {
        let data = [0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_byte().unwrap(), 0x01);
        assert_eq!(cursor.read_byte().unwrap(), 0x02);
        assert_eq!(cursor.read_byte(), Err(CursorError::OutOfData));
    }

    #[test]
    fn test_can_read() {
        let data = [0x01, 0x02];
        let cursor = ByteCursor::new(&data);
        assert!(cursor.can_read(0));
        assert!(cursor.can_read(2));
        assert!(!cursor.can_read(3));
    }

    #[test]
    fn test_fixed_int_unsigned() {
        let data = [0xff, 0x01, 0x00, 0xff, 0xff, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_fixed_int(1, false).unwrap(), 255);
        assert_eq!(cursor.read_fixed_int(2, false).unwrap(), 1);
        assert_eq!(cursor.read_fixed_int(4, false).unwrap(), 4294967295);
    }

    #[test]
    fn test_fixed_int_signed() {
        let data = [0xff, 0xfe, 0xff, 0x00, 0x00, 0x00, 0x80];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_fixed_int(1, true).unwrap(), -1);
        assert_eq!(cursor.read_fixed_int(2, true).unwrap(), -2);
        assert_eq!(cursor.read_fixed_int(4, true).unwrap(), i32::MIN as i64);
    }

    #[test]
    fn test_fixed_int_invalid_width() {
        let data = [0x00; 8];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_fixed_int(3, false), Err(CursorError::InvalidWidth(3)));
        assert_eq!(cursor.read_fixed_int(8, true), Err(CursorError::InvalidWidth(8)));
    }

    #[test]
    fn test_fixed_int_out_of_data() {
        let data = [0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_fixed_int(2, false), Err(CursorError::OutOfData));
    }

    #[test]
    fn test_varuint32_vectors() {
        let cases: [(&[u8], u32); 5] = [
            (&[0x00], 0),
            (&[0x01], 1),
            (&[0x7f], 127),
            (&[0x80, 0x01], 128),
            (&[0xff, 0xff, 0xff, 0xff, 0x0f], 4294967295),
        ];
        for (bytes, expected) in cases {
            let mut cursor = ByteCursor::new(bytes);
            assert_eq!(cursor.read_varuint32().unwrap(), expected);
            assert_eq!(cursor.remaining(), 0);
        }
    }

    #[test]
    fn test_varint32_sign_vectors() {
        // Expected values derived from the reference formula:
        // odd raw -> (!raw >> 1) | 0x8000_0000, even raw -> raw >> 1.
        let cases: [(&[u8], i32); 6] = [
            (&[0x00], 0),
            (&[0x01], -1),
            (&[0x02], 1),
            (&[0x03], -2),
            (&[0xfe, 0xff, 0xff, 0xff, 0x0f], i32::MAX),
            (&[0xff, 0xff, 0xff, 0xff, 0x0f], i32::MIN),
        ];
        for (bytes, expected) in cases {
            let mut cursor = ByteCursor::new(bytes);
            assert_eq!(cursor.read_varint32().unwrap(), expected);
        }
    }

    #[test]
    fn test_varuint32_out_of_data() {
        // Continuation bit set but no next byte.
        let data = [0x80];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_varuint32(), Err(CursorError::OutOfData));
    }

    #[test]
    fn test_big_int() {
        let data = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&data);
        let wide = cursor.read_big_int(8, false).unwrap();
        assert_eq!(wide.to_u64(), Some(u64::MAX));

        let mut cursor = ByteCursor::new(&data);
        let wide = cursor.read_big_int(8, true).unwrap();
        assert_eq!(wide.to_i64(), Some(-1));
    }

    #[test]
    fn test_read_raw_zero_copy() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut cursor = ByteCursor::new(&data);
        let raw = cursor.read_raw(3).unwrap();
        assert_eq!(raw, &data[..3]);
        assert_eq!(cursor.read_byte().unwrap(), 0x04);
    }

    #[test]
    fn test_read_text() {
        let data = [0x05, b'h', b'e', b'l', b'l', b'o'];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_text().unwrap(), "hello");
    }

    #[test]
    fn test_read_text_replaces_malformed_utf8() {
        let data = [0x02, 0xff, 0xfe];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_text().unwrap(), "\u{fffd}\u{fffd}");
    }

    #[test]
    fn test_read_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -2.25);
    }
}
