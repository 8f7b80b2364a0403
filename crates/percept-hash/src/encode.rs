//! Digest-to-text alphabets.
//!
//! Every function here is a pure mapping from digest bytes to a string;
//! no ambient state, timestamps or counters ever participate. The
//! surrounding system deduplicates content by these strings, so equal
//! input bytes must produce byte-identical output on every call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// The 32-symbol alphabet for the 5-bit packing, index 0 first.
pub const BASE32_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// The base-58 alphabet (Bitcoin variant: no `0`, `O`, `I`, `l`).
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Lowercase hexadecimal, two characters per byte.
#[must_use = "returns the formatted digest"]
pub fn hex_lower(digest: &[u8]) -> String {
    hex::encode(digest)
}

/// The custom 32-symbol encoding: 5-bit groups taken MSB-first across
/// byte boundaries.
///
/// A bit cursor walks the digest in 5-bit steps; after emitting the first
/// symbol the cursor sits at 5 bits consumed, and groups that straddle a
/// byte boundary borrow their low bits from the following byte (zero
/// past the end). A digest of `n` bytes yields `ceil(8n / 5)` symbols.
#[must_use = "returns the formatted digest"]
pub fn base32(digest: &[u8]) -> String {
    let total_bits = digest.len() * 8;
    let mut out = String::with_capacity(total_bits.div_ceil(5));
    let mut cursor = 0usize;
    while cursor < total_bits {
        let byte = cursor / 8;
        let offset = cursor % 8;
        let window = (u16::from(digest[byte]) << 8)
            | digest.get(byte + 1).copied().map_or(0, u16::from);
        let group = (window >> (11 - offset)) & 0x1f;
        out.push(BASE32_ALPHABET[group as usize] as char);
        cursor += 5;
    }
    out
}

/// Big-number base-58 (Bitcoin alphabet). Leading zero bytes encode as
/// leading `1` symbols.
#[must_use = "returns the formatted digest"]
pub fn base58(digest: &[u8]) -> String {
    let zeros = digest.iter().take_while(|&&b| b == 0).count();
    // Worst-case expansion is log(256)/log(58) ≈ 1.37 symbols per byte.
    let mut digits: Vec<u8> = Vec::with_capacity(digest.len() * 138 / 100 + 1);
    for &byte in &digest[zeros..] {
        let mut carry = u32::from(byte);
        for digit in &mut digits {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }
    let mut out = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        out.push(BASE58_ALPHABET[0] as char);
    }
    for &digit in digits.iter().rev() {
        out.push(BASE58_ALPHABET[digit as usize] as char);
    }
    out
}

/// URL-safe base-64 with the padding trimmed.
#[must_use = "returns the formatted digest"]
pub fn base64_url(digest: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(digest)
}

/// Unsigned big-endian decimal.
///
/// 1-, 2-, 4- and 8-byte digests take native-integer fast paths; any
/// other length goes through arbitrary-precision long division.
#[must_use = "returns the formatted digest"]
pub fn decimal(digest: &[u8]) -> String {
    match digest.len() {
        0 => "0".to_string(),
        1 => digest[0].to_string(),
        2 => u16::from_be_bytes([digest[0], digest[1]]).to_string(),
        4 => u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]).to_string(),
        8 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(digest);
            u64::from_be_bytes(bytes).to_string()
        }
        _ => decimal_bignum(digest),
    }
}

/// Long division of a big-endian byte string by 10, repeated until zero.
fn decimal_bignum(digest: &[u8]) -> String {
    let mut scratch: Vec<u8> = digest.to_vec();
    let mut digits: Vec<u8> = Vec::new();
    loop {
        let mut remainder: u32 = 0;
        let mut all_zero = true;
        for byte in &mut scratch {
            let acc = (remainder << 8) | u32::from(*byte);
            *byte = (acc / 10) as u8;
            remainder = acc % 10;
            if *byte != 0 {
                all_zero = false;
            }
        }
        digits.push(b'0' + remainder as u8);
        if all_zero {
            break;
        }
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_known_digest() {
        // sha2-256 of the empty input.
        let digest = [
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55,
        ];
        assert_eq!(
            hex_lower(&digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_base32_all_zero_sixteen_bytes() {
        // 128 bits pack into 26 groups; every group is zero, so every
        // symbol is the alphabet's index-0 symbol.
        let expected = "0".repeat(26);
        assert_eq!(base32(&[0u8; 16]), expected);
    }

    #[test]
    fn test_base32_group_lengths() {
        assert_eq!(base32(&[]).len(), 0);
        assert_eq!(base32(&[0xff]).len(), 2); // 8 bits -> 2 groups
        assert_eq!(base32(&[0; 5]).len(), 8); // 40 bits -> 8 groups
        assert_eq!(base32(&[0; 20]).len(), 32); // 160 bits -> 32 groups
    }

    #[test]
    fn test_base32_straddles_byte_boundaries() {
        // 0xff, 0x00: groups are 11111 111|00 00000 0(0000).
        assert_eq!(base32(&[0xff, 0x00]), "vs00");
        // Single 0xff: 11111 111(00) -> index 31, index 28.
        assert_eq!(base32(&[0xff]), "vs");
        // 0x08 = 00001 000 -> index 1, then 000 padded -> index 0.
        assert_eq!(base32(&[0x08]), "10");
    }

    #[test]
    fn test_base58_known_vectors() {
        assert_eq!(base58(b""), "");
        assert_eq!(base58(&[0x61]), "2g");
        assert_eq!(base58(b"bbb"), "a3gV");
        assert_eq!(base58(b"ccc"), "aPEr");
        assert_eq!(base58(b"hello world"), "StV1DL6CwTryKyV");
    }

    #[test]
    fn test_base58_leading_zeros() {
        assert_eq!(base58(&[0]), "1");
        assert_eq!(base58(&[0, 0, 0]), "111");
        assert_eq!(base58(&[0, 0, 0x61]), "112g");
    }

    #[test]
    fn test_base64_url_trims_padding() {
        assert_eq!(base64_url(b"f"), "Zg");
        assert_eq!(base64_url(b"fo"), "Zm8");
        assert_eq!(base64_url(b"foo"), "Zm9v");
        // URL-safe alphabet: 0xfb 0xff encodes with '-' and '_'.
        assert_eq!(base64_url(&[0xfb, 0xef, 0xff]), "--__");
    }

    #[test]
    fn test_decimal_fast_paths() {
        assert_eq!(decimal(&[]), "0");
        assert_eq!(decimal(&[0x2a]), "42");
        assert_eq!(decimal(&[0x01, 0x00]), "256");
        assert_eq!(decimal(&[0xde, 0xad, 0xbe, 0xef]), "3735928559");
        assert_eq!(decimal(&[0xff; 8]), u64::MAX.to_string());
    }

    #[test]
    fn test_decimal_bignum_matches_fast_path() {
        // A 3-byte digest exercises the arbitrary-precision fallback.
        assert_eq!(decimal(&[0x01, 0x00, 0x00]), "65536");
        // Leading zero bytes do not change the value.
        let nine = [0x00, 0xde, 0xad, 0xbe, 0xef, 0x00, 0x00, 0x00, 0x01];
        let eight = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(decimal(&nine), decimal(&eight));
    }

    #[test]
    fn test_decimal_bignum_zero() {
        assert_eq!(decimal(&[0, 0, 0]), "0");
    }

    #[test]
    fn test_encodings_are_deterministic() {
        let digest: Vec<u8> = (0u8..32).collect();
        assert_eq!(hex_lower(&digest), hex_lower(&digest));
        assert_eq!(base32(&digest), base32(&digest));
        assert_eq!(base58(&digest), base58(&digest));
        assert_eq!(base64_url(&digest), base64_url(&digest));
        assert_eq!(decimal(&digest), decimal(&digest));
    }
}
