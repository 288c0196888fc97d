//! [`WideInt`] — two's-complement multi-byte integer.

/// A two's-complement integer of arbitrary byte width.
///
/// Stored MSB first, 8 bits per byte, in canonical form (no redundant
/// sign bytes). Wire integers wider than the native fixed widths (64,
/// 128 and 256 bits) are carried through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideInt {
    /// Raw bytes in two's-complement format, MSB first.
    pub data: Vec<u8>,
}

impl WideInt {
    /// Interprets little-endian wire bytes as an integer.
    ///
    /// Unsigned input is treated as a plain magnitude; signed input as
    /// two's-complement of `bytes.len() * 8` bits.
    pub fn from_le_bytes(bytes: &[u8], signed: bool) -> Self {
        let mut data: Vec<u8> = bytes.iter().rev().copied().collect();
        if !signed && data.first().is_some_and(|b| b & 0x80 != 0) {
            // Leading zero keeps a high magnitude positive.
            data.insert(0, 0);
        }
        while data.len() > 1 && data[0] == 0 && data[1] & 0x80 == 0 {
            data.remove(0);
        }
        while data.len() > 1 && data[0] == 0xff && data[1] & 0x80 != 0 {
            data.remove(0);
        }
        if data == [0] {
            data.clear();
        }
        Self { data }
    }

    /// True when the value is below zero.
    pub fn is_negative(&self) -> bool {
        self.data.first().is_some_and(|b| b & 0x80 != 0)
    }

    /// Converts to an `i128`, or `None` when out of range.
    pub fn to_i128(&self) -> Option<i128> {
        if self.data.is_empty() {
            return Some(0);
        }
        if self.data.len() > 16 {
            return None;
        }
        let mut val: i128 = if self.is_negative() { -1 } else { 0 };
        for &b in &self.data {
            val = (val << 8) | (b as i128);
        }
        Some(val)
    }

    /// Converts to a `u128`, or `None` when negative or out of range.
    pub fn to_u128(&self) -> Option<u128> {
        if self.is_negative() {
            return None;
        }
        let mut data = self.data.as_slice();
        while data.first() == Some(&0) {
            data = &data[1..];
        }
        if data.len() > 16 {
            return None;
        }
        let mut val: u128 = 0;
        for &b in data {
            val = (val << 8) | (b as u128);
        }
        Some(val)
    }

    /// Converts to an `i64`, or `None` when out of range.
    pub fn to_i64(&self) -> Option<i64> {
        let val = self.to_i128()?;
        i64::try_from(val).ok()
    }

    /// Converts to a `u64`, or `None` when negative or out of range.
    pub fn to_u64(&self) -> Option<u64> {
        let val = self.to_u128()?;
        u64::try_from(val).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let wide = WideInt::from_le_bytes(&[0, 0, 0, 0], false);
        assert!(wide.data.is_empty());
        assert_eq!(wide.to_i128(), Some(0));
        assert_eq!(wide.to_u128(), Some(0));
    }

    #[test]
    fn test_unsigned_high_bit() {
        let wide = WideInt::from_le_bytes(&[0xff; 8], false);
        assert!(!wide.is_negative());
        assert_eq!(wide.to_u64(), Some(u64::MAX));
        assert_eq!(wide.to_i64(), None);
        assert_eq!(wide.to_i128(), Some(u64::MAX as i128));
    }

    #[test]
    fn test_signed_negative_one() {
        let wide = WideInt::from_le_bytes(&[0xff; 8], true);
        assert!(wide.is_negative());
        assert_eq!(wide.data, vec![0xff]);
        assert_eq!(wide.to_i64(), Some(-1));
        assert_eq!(wide.to_u64(), None);
    }

    #[test]
    fn test_signed_min_i64() {
        let wide = WideInt::from_le_bytes(&i64::MIN.to_le_bytes(), true);
        assert_eq!(wide.to_i64(), Some(i64::MIN));
    }

    #[test]
    fn test_u128_round_trip() {
        let wide = WideInt::from_le_bytes(&u128::MAX.to_le_bytes(), false);
        assert_eq!(wide.to_u128(), Some(u128::MAX));
        assert_eq!(wide.to_i128(), None);
    }

    #[test]
    fn test_i128_round_trip() {
        let wide = WideInt::from_le_bytes(&i128::MIN.to_le_bytes(), true);
        assert_eq!(wide.to_i128(), Some(i128::MIN));
    }

    #[test]
    fn test_256_bit_out_of_range() {
        let wide = WideInt::from_le_bytes(&[0xab; 32], false);
        assert_eq!(wide.to_u128(), None);
        assert_eq!(wide.to_i128(), None);
    }
}
