//! Digest computation and content-addressable identity for percept
//!
//! Identical bytes must always yield an identical identifier regardless of
//! which container path produced them; every formatting routine in this
//! crate is a pure function of `(algorithm, digest bytes)`. That purity is
//! what the surrounding system's cross-container deduplication rests on.
//!
//! The crate provides:
//!
//! - [`HashAlgorithm`]: the per-algorithm plugin contract, with default
//!   implementations for sha2-256, sha2-512, sha1, md5 and crc32.
//! - [`encode`]: the digest-to-text alphabets (hex, the 32-symbol 5-bit
//!   packing, base-58, URL-safe base-64 without padding, and unsigned
//!   big-endian decimal).
//! - [`multihash`]: self-describing digest framing (varint algorithm code,
//!   varint length, raw digest) and its parser.
//! - [`uri`]: the two content-URI families (multihash URN and RFC 6920
//!   named-information URI) plus the size estimator that lets callers pick
//!   the shortest viable identifier without hashing first.

pub mod algorithm;
pub mod encode;
pub mod error;
pub mod multihash;
pub mod registry;
pub mod uri;
mod varint;

pub use algorithm::{AlgorithmSpec, DigestAlgorithm, Formatting, HashAlgorithm};
pub use error::HashError;
pub use multihash::{frame, parse_frame};
pub use registry::HashRegistry;
pub use uri::{estimated_uri_len, format_digest, multihash_uri, ni_uri, UriKind};
pub use varint::{read_uvarint, uvarint_len, write_uvarint};
