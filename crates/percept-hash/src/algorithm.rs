//! The per-algorithm plugin contract and the built-in algorithms.

use crate::error::Result;
use sha2::digest::Digest;
use std::io::Read;
use std::marker::PhantomData;

/// How a digest is rendered into its canonical identifier body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatting {
    /// Lowercase hexadecimal, two characters per byte.
    Hex,
    /// The custom 32-symbol alphabet, 5-bit groups across byte boundaries.
    Base32,
    /// Big-number base-58.
    Base58,
    /// URL-safe base-64 with padding trimmed.
    Base64Url,
    /// Unsigned big-endian decimal.
    Decimal,
}

/// Static description of one hash algorithm.
#[derive(Debug, Clone)]
pub struct AlgorithmSpec {
    /// Canonical algorithm name, e.g. `"sha2-256"`.
    pub name: &'static str,
    /// Short identifier used in URI prefixes, e.g. `"sha256"`.
    pub identifier: &'static str,
    /// URI prefix the formatted digest is appended to.
    pub prefix: &'static str,
    /// Canonical formatting method for this algorithm.
    pub formatting: Formatting,
    /// Multihash code, when the algorithm is registered in the multihash
    /// table.
    pub code: Option<u64>,
    /// RFC 6920 "named information" hash name, when registered.
    pub ni_name: Option<&'static str>,
}

/// The per-algorithm plugin contract.
///
/// Digest computation is synchronous once a source is open; callers own
/// the reader lifecycle. Implementations must be stateless across calls.
pub trait HashAlgorithm: Send + Sync {
    /// The algorithm's static description.
    fn spec(&self) -> &AlgorithmSpec;

    /// Digest length in bytes.
    ///
    /// Fixed for all built-in algorithms; length-extensible algorithms
    /// derive it from the declared input length.
    fn digest_len(&self, input_len: Option<u64>) -> usize;

    /// Digest an in-memory buffer.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Digest a stream to exhaustion.
    ///
    /// # Errors
    /// Returns an error if reading from the stream fails.
    fn digest_reader(&self, reader: &mut dyn Read) -> Result<Vec<u8>>;
}

/// Read-buffer size for streaming digests.
const STREAM_BUF: usize = 64 * 1024;

/// Generic [`HashAlgorithm`] over any RustCrypto [`Digest`] type.
pub struct DigestAlgorithm<D> {
    spec: AlgorithmSpec,
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest> DigestAlgorithm<D> {
    /// Describe `D` with the given spec.
    #[must_use = "creates an algorithm that should be registered"]
    pub const fn new(spec: AlgorithmSpec) -> Self {
        Self {
            spec,
            _digest: PhantomData,
        }
    }
}

impl<D: Digest> HashAlgorithm for DigestAlgorithm<D> {
    fn spec(&self) -> &AlgorithmSpec {
        &self.spec
    }

    fn digest_len(&self, _input_len: Option<u64>) -> usize {
        <D as Digest>::output_size()
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        D::digest(data).to_vec()
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> Result<Vec<u8>> {
        let mut hasher = D::new();
        let mut buf = [0u8; STREAM_BUF];
        loop {
            match reader.read(&mut buf)? {
                0 => break,
                n => hasher.update(&buf[..n]),
            }
        }
        Ok(hasher.finalize().to_vec())
    }
}

/// CRC-32 (IEEE) as a non-cryptographic content checksum.
///
/// Its 4-byte digest exercises the decimal fast path and gives callers a
/// cheap identity for low-stakes deduplication.
pub struct Crc32Algorithm {
    spec: AlgorithmSpec,
}

impl Crc32Algorithm {
    /// The multihash code assigned to CRC-32.
    pub const CODE: u64 = 0x0132;

    /// Create the CRC-32 descriptor.
    #[must_use = "creates an algorithm that should be registered"]
    pub const fn new() -> Self {
        Self {
            spec: AlgorithmSpec {
                name: "crc32",
                identifier: "crc32",
                prefix: "urn:crc32:",
                formatting: Formatting::Decimal,
                code: Some(Self::CODE),
                ni_name: None,
            },
        }
    }
}

impl Default for Crc32Algorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for Crc32Algorithm {
    fn spec(&self) -> &AlgorithmSpec {
        &self.spec
    }

    fn digest_len(&self, _input_len: Option<u64>) -> usize {
        4
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(data);
        hasher.finalize().to_be_bytes().to_vec()
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> Result<Vec<u8>> {
        let mut hasher = crc32fast::Hasher::new();
        let mut buf = [0u8; STREAM_BUF];
        loop {
            match reader.read(&mut buf)? {
                0 => break,
                n => hasher.update(&buf[..n]),
            }
        }
        Ok(hasher.finalize().to_be_bytes().to_vec())
    }
}

/// sha2-256 descriptor (multihash code 0x12, ni name `sha-256`).
#[must_use = "creates an algorithm that should be registered"]
pub fn sha2_256() -> DigestAlgorithm<sha2::Sha256> {
    DigestAlgorithm::new(AlgorithmSpec {
        name: "sha2-256",
        identifier: "sha256",
        prefix: "urn:sha256:",
        formatting: Formatting::Hex,
        code: Some(0x12),
        ni_name: Some("sha-256"),
    })
}

/// sha2-512 descriptor (multihash code 0x13).
#[must_use = "creates an algorithm that should be registered"]
pub fn sha2_512() -> DigestAlgorithm<sha2::Sha512> {
    DigestAlgorithm::new(AlgorithmSpec {
        name: "sha2-512",
        identifier: "sha512",
        prefix: "urn:sha512:",
        formatting: Formatting::Base58,
        code: Some(0x13),
        ni_name: None,
    })
}

/// sha1 descriptor (multihash code 0x11, ni name `sha-1`).
#[must_use = "creates an algorithm that should be registered"]
pub fn sha1() -> DigestAlgorithm<sha1::Sha1> {
    DigestAlgorithm::new(AlgorithmSpec {
        name: "sha1",
        identifier: "sha1",
        prefix: "urn:sha1:",
        formatting: Formatting::Base32,
        code: Some(0x11),
        ni_name: Some("sha-1"),
    })
}

/// md5 descriptor (multihash code 0xd5).
#[must_use = "creates an algorithm that should be registered"]
pub fn md5() -> DigestAlgorithm<md5::Md5> {
    DigestAlgorithm::new(AlgorithmSpec {
        name: "md5",
        identifier: "md5",
        prefix: "urn:md5:",
        formatting: Formatting::Hex,
        code: Some(0xd5),
        ni_name: None,
    })
}
