//! Multihash framing: a self-describing digest byte sequence.
//!
//! The frame is `varint(algorithm code) ++ varint(digest length) ++ digest
//! bytes`. Framing then re-parsing reproduces the `(code, digest)` pair
//! exactly; the framed sequence is what the base-58 and base-64 content
//! URIs encode.

use crate::error::{HashError, Result};
use crate::varint::{read_uvarint, uvarint_len, write_uvarint};

/// Frame `(code, digest)` into a self-describing byte sequence.
#[must_use = "returns the framed digest"]
pub fn frame(code: u64, digest: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(uvarint_len(code) + uvarint_len(digest.len() as u64) + digest.len());
    write_uvarint(code, &mut out);
    write_uvarint(digest.len() as u64, &mut out);
    out.extend_from_slice(digest);
    out
}

/// Parse a framed digest back into its `(code, digest)` pair.
///
/// # Errors
/// Returns an error when a varint is malformed, the declared digest
/// length overflows `usize`, or the buffer holds fewer digest bytes than
/// declared. Trailing bytes after the digest are rejected as a length
/// mismatch.
pub fn parse_frame(buf: &[u8]) -> Result<(u64, Vec<u8>)> {
    let (code, used) = read_uvarint(buf)?;
    let rest = &buf[used..];
    let (declared, used) = read_uvarint(rest)?;
    let digest = &rest[used..];
    let expected = usize::try_from(declared)
        .map_err(|_| HashError::MalformedVarint("digest length overflows usize"))?;
    if digest.len() != expected {
        return Err(HashError::Truncated {
            expected,
            found: digest.len(),
        });
    }
    Ok((code, digest.to_vec()))
}

/// Total frame length for a digest of `digest_len` bytes under `code`.
#[must_use = "returns the framed length"]
pub fn frame_len(code: u64, digest_len: usize) -> usize {
    uvarint_len(code) + uvarint_len(digest_len as u64) + digest_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_single_byte_code() {
        // sha2-256: code 0x12 fits in one varint byte.
        let digest: Vec<u8> = (0u8..32).collect();
        let framed = frame(0x12, &digest);
        assert_eq!(framed[0], 0x12);
        assert_eq!(framed[1], 32);
        assert_eq!(framed.len(), 34);

        let (code, back) = parse_frame(&framed).unwrap();
        assert_eq!(code, 0x12);
        assert_eq!(back, digest);
    }

    #[test]
    fn test_roundtrip_multi_byte_code() {
        // crc32: code 0x0132 needs a two-byte varint.
        let digest = [0xde, 0xad, 0xbe, 0xef];
        let framed = frame(0x0132, &digest);
        assert_eq!(&framed[..2], &[0xb2, 0x02]);
        let (code, back) = parse_frame(&framed).unwrap();
        assert_eq!(code, 0x0132);
        assert_eq!(back, digest);
    }

    #[test]
    fn test_frame_len_matches_frame() {
        for (code, len) in [(0x12u64, 32usize), (0x0132, 4), (0x13, 64), (0xd5, 16)] {
            assert_eq!(frame_len(code, len), frame(code, &vec![0u8; len]).len());
        }
    }

    #[test]
    fn test_truncated_digest_is_an_error() {
        let mut framed = frame(0x12, &[0u8; 32]);
        framed.truncate(10);
        match parse_frame(&framed) {
            Err(HashError::Truncated { expected, found }) => {
                assert_eq!(expected, 32);
                assert_eq!(found, 8);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_bytes_are_an_error() {
        let mut framed = frame(0x11, &[0u8; 20]);
        framed.push(0xff);
        assert!(matches!(
            parse_frame(&framed),
            Err(HashError::Truncated { .. })
        ));
    }

    #[test]
    fn test_empty_buffer_is_an_error() {
        assert!(parse_frame(&[]).is_err());
    }

    #[test]
    fn test_empty_digest_frames() {
        let framed = frame(0x12, &[]);
        let (code, digest) = parse_frame(&framed).unwrap();
        assert_eq!(code, 0x12);
        assert!(digest.is_empty());
    }
}
