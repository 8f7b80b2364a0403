//! Content-addressable URI formatting.
//!
//! Two URI families are produced from a framed digest:
//!
//! - the multihash URN, `urn:mh:<base58(frame)>`, an opaque identifier
//!   keyed purely by the self-describing frame;
//! - the RFC 6920 named-information URI,
//!   `ni:///<name>;<base64url(digest)>[?ct=<media-type>]`, preferring the
//!   algorithm's registered ni name and falling back to `mh` over the
//!   framed bytes when the algorithm has none.
//!
//! Plus the per-algorithm canonical form `prefix ++ formatted(digest)`.
//! All functions are pure in `(algorithm, digest bytes)`.

use crate::algorithm::{AlgorithmSpec, Formatting};
use crate::encode;
use crate::error::{HashError, Result};
use crate::multihash::{frame, frame_len};

/// The ni-name fallback label for algorithms without a registered name.
const NI_MULTIHASH_NAME: &str = "mh";

/// Which URI family to produce or estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriKind {
    /// The per-algorithm canonical form, `prefix ++ formatted(digest)`.
    Canonical,
    /// `urn:mh:<base58(frame)>`.
    Multihash,
    /// `ni:///<name>;<base64url(...)>`.
    NamedInformation,
}

/// Format a digest into the algorithm's canonical identifier.
#[must_use = "returns the canonical identifier"]
pub fn format_digest(spec: &AlgorithmSpec, digest: &[u8]) -> String {
    let body = match spec.formatting {
        Formatting::Hex => encode::hex_lower(digest),
        Formatting::Base32 => encode::base32(digest),
        Formatting::Base58 => encode::base58(digest),
        Formatting::Base64Url => encode::base64_url(digest),
        Formatting::Decimal => encode::decimal(digest),
    };
    format!("{}{body}", spec.prefix)
}

/// Format a digest as a multihash URN.
///
/// # Errors
/// Returns [`HashError::NoMultihashCode`] when the algorithm is not in
/// the multihash table.
pub fn multihash_uri(spec: &AlgorithmSpec, digest: &[u8]) -> Result<String> {
    let code = spec
        .code
        .ok_or_else(|| HashError::NoMultihashCode(spec.name.to_string()))?;
    Ok(format!("urn:mh:{}", encode::base58(&frame(code, digest))))
}

/// Format a digest as an RFC 6920 named-information URI.
///
/// When the algorithm has a registered ni name the raw digest is encoded;
/// otherwise the multihash frame is encoded under the `mh` label.
///
/// # Errors
/// Returns [`HashError::NoMultihashCode`] when the algorithm has neither
/// an ni name nor a multihash code.
pub fn ni_uri(spec: &AlgorithmSpec, digest: &[u8], content_type: Option<&str>) -> Result<String> {
    let (name, body) = match spec.ni_name {
        Some(name) => (name, encode::base64_url(digest)),
        None => {
            let code = spec
                .code
                .ok_or_else(|| HashError::NoMultihashCode(spec.name.to_string()))?;
            (NI_MULTIHASH_NAME, encode::base64_url(&frame(code, digest)))
        }
    };
    let mut uri = format!("ni:///{name};{body}");
    if let Some(ct) = content_type {
        uri.push_str("?ct=");
        uri.push_str(ct);
    }
    Ok(uri)
}

/// Unpadded base-64 character count for `n` bytes.
const fn base64_len(n: usize) -> usize {
    (n * 4 + 2) / 3
}

/// Upper bound on the base-58 character count for `n` bytes.
const fn base58_max_len(n: usize) -> usize {
    n * 138 / 100 + 1
}

/// Upper bound on the URI character length for a digest of `digest_len`
/// bytes, without computing any digest.
///
/// Exact for [`UriKind::NamedInformation`] without a content type and for
/// hex/base-32/base-64 canonical forms; an upper bound for base-58 and
/// decimal, whose lengths vary with digest content. Callers use this to
/// pick the shortest viable identifier before hashing.
#[must_use = "returns the estimated identifier length"]
pub fn estimated_uri_len(spec: &AlgorithmSpec, digest_len: usize, kind: UriKind) -> usize {
    match kind {
        UriKind::Canonical => {
            let body = match spec.formatting {
                Formatting::Hex => digest_len * 2,
                Formatting::Base32 => (digest_len * 8).div_ceil(5),
                Formatting::Base58 => base58_max_len(digest_len),
                Formatting::Base64Url => base64_len(digest_len),
                // One decimal digit per ~3.32 bits, plus one for rounding.
                Formatting::Decimal => (digest_len * 8) * 10 / 33 + 1,
            };
            spec.prefix.len() + body
        }
        UriKind::Multihash => {
            let framed = spec
                .code
                .map_or(digest_len, |code| frame_len(code, digest_len));
            "urn:mh:".len() + base58_max_len(framed)
        }
        UriKind::NamedInformation => {
            let (name_len, body_len) = match spec.ni_name {
                Some(name) => (name.len(), base64_len(digest_len)),
                None => {
                    let framed = spec
                        .code
                        .map_or(digest_len, |code| frame_len(code, digest_len));
                    (NI_MULTIHASH_NAME.len(), base64_len(framed))
                }
            };
            "ni:///".len() + name_len + 1 + body_len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{md5, sha1, sha2_256, sha2_512, Crc32Algorithm, HashAlgorithm};

    #[test]
    fn test_canonical_sha2_256_is_hex() {
        let algo = sha2_256();
        let digest = algo.digest(b"");
        let uri = format_digest(algo.spec(), &digest);
        assert_eq!(
            uri,
            "urn:sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_crc32_is_decimal() {
        let algo = Crc32Algorithm::new();
        let digest = algo.digest(b"123456789");
        assert_eq!(format_digest(algo.spec(), &digest), "urn:crc32:3421780262");
    }

    #[test]
    fn test_multihash_uri_prefix_and_determinism() {
        let algo = sha2_256();
        let digest = algo.digest(b"content");
        let a = multihash_uri(algo.spec(), &digest).unwrap();
        let b = multihash_uri(algo.spec(), &digest).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("urn:mh:"));
        // Equal bytes from different call sites: identical identifier.
        let again = multihash_uri(algo.spec(), &sha2_256().digest(b"content")).unwrap();
        assert_eq!(a, again);
    }

    #[test]
    fn test_ni_uri_prefers_registered_name() {
        let algo = sha2_256();
        let digest = algo.digest(b"hello");
        let uri = ni_uri(algo.spec(), &digest, None).unwrap();
        assert!(uri.starts_with("ni:///sha-256;"), "got {uri}");
        assert!(!uri.contains('='), "padding must be trimmed: {uri}");
    }

    #[test]
    fn test_ni_uri_falls_back_to_multihash_label() {
        let algo = md5();
        let digest = algo.digest(b"hello");
        let uri = ni_uri(algo.spec(), &digest, None).unwrap();
        assert!(uri.starts_with("ni:///mh;"), "got {uri}");
    }

    #[test]
    fn test_ni_uri_carries_content_type() {
        let algo = sha2_256();
        let digest = algo.digest(b"x");
        let uri = ni_uri(algo.spec(), &digest, Some("image/png")).unwrap();
        assert!(uri.ends_with("?ct=image/png"), "got {uri}");
    }

    #[test]
    fn test_estimator_bounds_actual_lengths() {
        let algorithms: Vec<Box<dyn HashAlgorithm>> = vec![
            Box::new(sha2_256()),
            Box::new(sha2_512()),
            Box::new(sha1()),
            Box::new(md5()),
            Box::new(Crc32Algorithm::new()),
        ];
        for algo in &algorithms {
            for sample in [&b"a"[..], b"some longer sample input", &[0u8; 64]] {
                let digest = algo.digest(sample);
                let spec = algo.spec();
                let len = algo.digest_len(None);

                let canonical = format_digest(spec, &digest);
                assert!(
                    canonical.len() <= estimated_uri_len(spec, len, UriKind::Canonical),
                    "{}: canonical {} > estimate",
                    spec.name,
                    canonical.len()
                );

                let mh = multihash_uri(spec, &digest).unwrap();
                assert!(mh.len() <= estimated_uri_len(spec, len, UriKind::Multihash));

                let ni = ni_uri(spec, &digest, None).unwrap();
                assert_eq!(ni.len(), estimated_uri_len(spec, len, UriKind::NamedInformation));
            }
        }
    }

    #[test]
    fn test_deduplicating_identity_across_paths() {
        // The same bytes arriving via unrelated "container paths" must
        // produce the same identifier.
        let algo = sha2_256();
        let from_archive = algo.digest(b"shared payload");
        let from_directory = algo.digest(b"shared payload");
        assert_eq!(
            multihash_uri(algo.spec(), &from_archive).unwrap(),
            multihash_uri(algo.spec(), &from_directory).unwrap()
        );
    }
}
