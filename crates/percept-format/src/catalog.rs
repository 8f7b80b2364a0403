//! The format catalog and its recognition driver.
//!
//! The driver reads one header prefix per candidate, walks the registered
//! descriptors in registration order and, on the first successful deep
//! parse, hands the concretely typed entity to the caller's callback. A
//! descriptor whose header check declines is never asked to parse; a deep
//! parse that fails is logged and treated as a non-match for the catalog.

use crate::descriptor::{sniff_tree, BinaryFormat, StructuredFormat};
use crate::error::Result;
use percept_core::{read_prefix, AccessMode, ByteSource, BytesSource, EncodingObserver, Entity, MatchContext, TextConfidence};
use std::io::Read;
use std::sync::Arc;

/// Header bytes reserved for the structured-tree sniff.
const TREE_SNIFF_LEN: usize = 1024;

/// Fraction of textual bytes below which a header classifies as binary.
const BINARY_THRESHOLD: f64 = 0.85;

/// The matched descriptor, as seen by the recognition callback.
#[derive(Debug, Clone, Copy)]
pub struct Recognition<'a> {
    /// Canonical name of the format that matched.
    pub format: &'a str,
    /// Media type of the recognized content.
    pub media_type: &'a str,
}

/// An ordered catalog of format descriptors.
///
/// Registration order is the match order; the catalog holds no other
/// precedence. Catalogs are read-only for the duration of a traversal and
/// freely shared across threads.
#[derive(Default)]
pub struct FormatCatalog {
    binary: Vec<Arc<dyn BinaryFormat>>,
    structured: Vec<Arc<dyn StructuredFormat>>,
}

impl FormatCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binary format descriptor.
    pub fn register_binary(&mut self, format: Arc<dyn BinaryFormat>) {
        self.binary.push(format);
    }

    /// Append a structured format descriptor.
    pub fn register_structured(&mut self, format: Arc<dyn StructuredFormat>) {
        self.structured.push(format);
    }

    /// Number of registered descriptors across both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.binary.len() + self.structured.len()
    }

    /// Whether the catalog holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binary.is_empty() && self.structured.is_empty()
    }

    /// The longest header prefix any registered descriptor needs.
    #[must_use]
    pub fn max_header_len(&self) -> usize {
        let binary = self
            .binary
            .iter()
            .map(|f| f.header_len())
            .max()
            .unwrap_or(0);
        if self.structured.is_empty() {
            binary
        } else {
            binary.max(TREE_SNIFF_LEN)
        }
    }

    /// Recognize `source` against the catalog.
    ///
    /// Reads the header prefix once, feeds it to the context's
    /// encoding-confidence accumulator when one is registered, then tries
    /// binary descriptors followed by structured descriptors in
    /// registration order. The first descriptor whose deep parse produces
    /// an entity wins: the entity is passed to `on_match` with its
    /// concrete type preserved inside, and the callback's return value is
    /// handed back. `Ok(None)` means no descriptor recognized the content.
    ///
    /// A single-use source is buffered into memory up front so the header
    /// read does not consume the stream out from under the winning parse.
    ///
    /// # Errors
    /// Returns an error only when the source itself cannot be read;
    /// individual descriptor failures are logged and skipped.
    pub fn recognize<R>(
        &self,
        source: &Arc<dyn ByteSource>,
        context: &MatchContext,
        mut on_match: impl FnMut(Recognition<'_>, Box<dyn Entity>) -> R,
    ) -> Result<Option<R>> {
        let source = self.stable_source(source)?;
        let header = read_prefix(source.as_ref(), self.max_header_len())?;

        let observer = context.service::<TextConfidence>();
        if let Some(ref obs) = observer {
            obs.observe(&header);
        }
        let binary_hint = looks_binary(&header);
        let context = context.clone().with_source(source.clone());

        for format in &self.binary {
            let declared = format.header_len();
            if header.len() < declared {
                continue;
            }
            let obs = observer
                .as_deref()
                .map(|o| o as &dyn percept_core::EncodingObserver);
            if !format.check_header(&header[..declared], binary_hint, obs) {
                continue;
            }
            match format.parse(source.as_ref(), &context) {
                Ok(Some(entity)) => {
                    let recognition = Recognition {
                        format: format.name(),
                        media_type: format.media_type(),
                    };
                    return Ok(Some(on_match(recognition, entity)));
                }
                Ok(None) => {
                    log::debug!("format {}: header matched, deep parse declined", format.name());
                }
                Err(err) => {
                    log::warn!("format {}: parse failed: {err}", format.name());
                }
            }
        }

        if let Some(tree) = sniff_tree(&header) {
            for format in &self.structured {
                if !format.check_tree(&tree) {
                    continue;
                }
                match format.parse(source.as_ref(), &context) {
                    Ok(Some(entity)) => {
                        let recognition = Recognition {
                            format: format.name(),
                            media_type: format.media_type(),
                        };
                        return Ok(Some(on_match(recognition, entity)));
                    }
                    Ok(None) => {
                        log::debug!("format {}: tree matched, deep parse declined", format.name());
                    }
                    Err(err) => {
                        log::warn!("format {}: parse failed: {err}", format.name());
                    }
                }
            }
        }

        Ok(None)
    }

    /// A source safe to open more than once.
    ///
    /// Single-use streams are drained into an in-memory source in one
    /// open, so the header read and the winning parse never contend for
    /// the only read.
    fn stable_source(&self, source: &Arc<dyn ByteSource>) -> Result<Arc<dyn ByteSource>> {
        if source.access_mode() != AccessMode::SingleUse {
            return Ok(source.clone());
        }
        let mut reader = source.open()?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let mut buffered = BytesSource::new(data);
        if let Some(name) = source.name() {
            buffered = buffered.with_name(name);
        }
        Ok(Arc::new(buffered))
    }
}

/// Cheap binary/text classification of a header prefix.
fn looks_binary(header: &[u8]) -> bool {
    if header.is_empty() {
        return false;
    }
    if header.contains(&0) {
        return true;
    }
    let textual = header
        .iter()
        .filter(|&&b| matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0xff))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = textual as f64 / header.len() as f64;
    ratio < BINARY_THRESHOLD
}
