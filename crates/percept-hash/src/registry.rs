//! Name- and code-keyed lookup of registered hash algorithms.

use crate::algorithm::{md5, sha1, sha2_256, sha2_512, Crc32Algorithm, HashAlgorithm};
use crate::error::{HashError, Result};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// The process-wide default registry holding the built-in algorithms.
static DEFAULTS: Lazy<HashRegistry> = Lazy::new(HashRegistry::with_defaults);

/// An ordered set of hash algorithms, looked up by name or multihash
/// code.
///
/// Registration order is preserved; when two entries answer to the same
/// name or code the earlier registration wins.
#[derive(Default)]
pub struct HashRegistry {
    algorithms: Vec<Arc<dyn HashAlgorithm>>,
}

impl HashRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in algorithms.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(sha2_256()));
        registry.register(Arc::new(sha2_512()));
        registry.register(Arc::new(sha1()));
        registry.register(Arc::new(md5()));
        registry.register(Arc::new(Crc32Algorithm::new()));
        registry
    }

    /// The shared default registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &DEFAULTS
    }

    /// Append an algorithm to the registry.
    pub fn register(&mut self, algorithm: Arc<dyn HashAlgorithm>) {
        self.algorithms.push(algorithm);
    }

    /// Look up an algorithm by name or identifier, case-insensitively.
    ///
    /// # Errors
    /// Returns [`HashError::UnknownAlgorithm`] when nothing matches.
    pub fn by_name(&self, name: &str) -> Result<&Arc<dyn HashAlgorithm>> {
        self.algorithms
            .iter()
            .find(|a| {
                let spec = a.spec();
                spec.name.eq_ignore_ascii_case(name) || spec.identifier.eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| HashError::UnknownAlgorithm(name.to_string()))
    }

    /// Look up an algorithm by its multihash code.
    ///
    /// # Errors
    /// Returns [`HashError::UnknownAlgorithm`] when no registered
    /// algorithm carries the code.
    pub fn by_code(&self, code: u64) -> Result<&Arc<dyn HashAlgorithm>> {
        self.algorithms
            .iter()
            .find(|a| a.spec().code == Some(code))
            .ok_or_else(|| HashError::UnknownAlgorithm(format!("multihash code {code:#x}")))
    }

    /// All registered algorithms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn HashAlgorithm>> {
        self.algorithms.iter()
    }

    /// Number of registered algorithms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether no algorithms are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_builtin_names() {
        let registry = HashRegistry::with_defaults();
        for name in ["sha2-256", "sha2-512", "sha1", "md5", "crc32"] {
            assert!(registry.by_name(name).is_ok(), "missing {name}");
        }
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = HashRegistry::with_defaults();
        assert!(registry.by_name("SHA2-256").is_ok());
        assert!(registry.by_name("Sha256").is_ok()); // identifier form
        assert!(registry.by_name("CRC32").is_ok());
    }

    #[test]
    fn test_lookup_by_code() {
        let registry = HashRegistry::with_defaults();
        assert_eq!(registry.by_code(0x12).unwrap().spec().name, "sha2-256");
        assert_eq!(registry.by_code(0x0132).unwrap().spec().name, "crc32");
        assert!(matches!(
            registry.by_code(0xffff),
            Err(HashError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = HashRegistry::with_defaults();
        assert!(matches!(
            registry.by_name("whirlpool"),
            Err(HashError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_global_registry_is_populated() {
        assert!(!HashRegistry::global().is_empty());
    }
}
