//! Unsigned LEB128 varints, as used by multihash framing.

use crate::error::{HashError, Result};

/// Append `value` to `out` as an unsigned LEB128 varint.
pub fn write_uvarint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Number of bytes `value` occupies as a varint.
#[must_use = "returns the encoded length"]
pub fn uvarint_len(value: u64) -> usize {
    // 1 byte per started 7-bit group; zero still takes one byte.
    let bits = 64 - value.leading_zeros() as usize;
    std::cmp::max(1, bits.div_ceil(7))
}

/// Decode an unsigned LEB128 varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// Returns [`HashError::MalformedVarint`] when the buffer ends inside a
/// varint or the value overflows 64 bits.
pub fn read_uvarint(buf: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in buf.iter().enumerate() {
        if shift >= 64 {
            return Err(HashError::MalformedVarint("value exceeds 64 bits"));
        }
        let group = u64::from(byte & 0x7f);
        value |= group
            .checked_shl(shift)
            .ok_or(HashError::MalformedVarint("value exceeds 64 bits"))?;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(HashError::MalformedVarint("buffer ended inside varint"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_values() {
        let mut out = Vec::new();
        write_uvarint(0, &mut out);
        assert_eq!(out, [0x00]);
        out.clear();
        write_uvarint(0x7f, &mut out);
        assert_eq!(out, [0x7f]);
    }

    #[test]
    fn test_multi_byte_values() {
        let mut out = Vec::new();
        write_uvarint(128, &mut out);
        assert_eq!(out, [0x80, 0x01]);
        out.clear();
        write_uvarint(300, &mut out);
        assert_eq!(out, [0xac, 0x02]);
    }

    #[test]
    fn test_roundtrip_across_widths() {
        for value in [0u64, 1, 127, 128, 300, 0x0132, 16_384, u32::MAX as u64, u64::MAX] {
            let mut out = Vec::new();
            write_uvarint(value, &mut out);
            assert_eq!(out.len(), uvarint_len(value), "length estimate for {value}");
            let (back, consumed) = read_uvarint(&out).unwrap();
            assert_eq!(back, value);
            assert_eq!(consumed, out.len());
        }
    }

    #[test]
    fn test_read_consumes_only_one_varint() {
        let mut out = Vec::new();
        write_uvarint(300, &mut out);
        out.extend_from_slice(&[0xde, 0xad]);
        let (value, consumed) = read_uvarint(&out).unwrap();
        assert_eq!(value, 300);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_truncated_varint_is_an_error() {
        assert!(read_uvarint(&[0x80]).is_err());
        assert!(read_uvarint(&[]).is_err());
    }

    #[test]
    fn test_overlong_varint_is_an_error() {
        // Eleven continuation bytes push the value past 64 bits.
        let buf = [0xff; 11];
        assert!(read_uvarint(&buf).is_err());
    }
}
