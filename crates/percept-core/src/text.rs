//! Encoding-confidence accumulation.
//!
//! Header checks feed every byte they look at into an observer, so
//! binary/text classification and format sniffing share one pass over the
//! stream. [`TextConfidence`] is the built-in accumulator; hosts can
//! register their own observer type in the match context instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for bytes seen during header checks.
///
/// Observers use interior mutability: they are shared through the
/// immutable match context and fed from `&self`.
pub trait EncodingObserver: Send + Sync {
    /// Feed a run of bytes, in stream order.
    fn observe(&self, bytes: &[u8]);
}

/// Byte-histogram accumulator estimating how text-like a stream is.
///
/// Counts bytes that are printable ASCII or common whitespace against the
/// total seen. NUL bytes weigh the estimate towards binary immediately.
#[derive(Debug, Default)]
pub struct TextConfidence {
    textual: AtomicU64,
    total: AtomicU64,
    nul_seen: AtomicU64,
}

/// Confidence at or above this is classified as text.
const TEXT_THRESHOLD: f64 = 0.85;

impl TextConfidence {
    /// Create an empty accumulator.
    #[must_use = "creates an accumulator that should be fed bytes"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of observed bytes that look textual, in `0.0..=1.0`.
    /// Returns `0.0` before any byte was observed.
    #[must_use = "returns the accumulated confidence"]
    pub fn confidence(&self) -> f64 {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 || self.nul_seen.load(Ordering::Relaxed) > 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.textual.load(Ordering::Relaxed) as f64 / total as f64
        }
    }

    /// Whether the observed bytes classify as text.
    #[must_use = "returns the binary/text classification"]
    pub fn looks_textual(&self) -> bool {
        self.total.load(Ordering::Relaxed) > 0 && self.confidence() >= TEXT_THRESHOLD
    }

    /// Number of bytes observed so far.
    #[must_use = "returns the observed byte count"]
    pub fn bytes_seen(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl EncodingObserver for TextConfidence {
    fn observe(&self, bytes: &[u8]) {
        let mut textual = 0u64;
        let mut nuls = 0u64;
        for &b in bytes {
            match b {
                0 => nuls += 1,
                b'\t' | b'\n' | b'\r' | 0x20..=0x7e => textual += 1,
                // High bytes count as textual: likely UTF-8 continuation.
                0x80..=0xff => textual += 1,
                _ => {}
            }
        }
        self.textual.fetch_add(textual, Ordering::Relaxed);
        self.total.fetch_add(bytes.len() as u64, Ordering::Relaxed);
        if nuls > 0 {
            self.nul_seen.fetch_add(nuls, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator_is_undecided() {
        let acc = TextConfidence::new();
        assert!((acc.confidence() - 0.0).abs() < f64::EPSILON);
        assert!(!acc.looks_textual());
    }

    #[test]
    fn test_plain_ascii_classifies_as_text() {
        let acc = TextConfidence::new();
        acc.observe(b"A plain sentence, nothing unusual.\n");
        assert!(acc.looks_textual());
        assert!(acc.confidence() > 0.99);
    }

    #[test]
    fn test_nul_bytes_force_binary() {
        let acc = TextConfidence::new();
        acc.observe(b"PK\x03\x04\x00\x00\x00\x00");
        assert!(!acc.looks_textual());
        assert!((acc.confidence() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_control_bytes_lower_confidence() {
        let acc = TextConfidence::new();
        acc.observe(&[0x01, 0x02, 0x03, 0x04, b'a', b'b']);
        assert!(!acc.looks_textual());
    }

    #[test]
    fn test_observation_accumulates_across_calls() {
        let acc = TextConfidence::new();
        acc.observe(b"hello ");
        acc.observe(b"world");
        assert_eq!(acc.bytes_seen(), 11);
        assert!(acc.looks_textual());
    }
}
