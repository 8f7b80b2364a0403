//! The format descriptor contracts.
//!
//! Binary descriptors recognize content from a fixed-length header;
//! structured descriptors recognize a document tree from its root element
//! and declared public/system identifiers. Both parse into a concretely
//! typed entity that travels the rest of the pipeline as
//! [`Box<dyn Entity>`].

use crate::error::Result;
use percept_core::{ByteSource, Entity, EncodingObserver, MatchContext};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

/// A format recognized from a fixed-length binary header.
pub trait BinaryFormat: Send + Sync {
    /// Canonical format name, e.g. `"zip"`.
    fn name(&self) -> &'static str;

    /// Media type of recognized content, e.g. `"application/zip"`.
    fn media_type(&self) -> &'static str;

    /// Number of header bytes [`BinaryFormat::check_header`] requires.
    ///
    /// A stream shorter than this is a non-match for the descriptor, not
    /// an error.
    fn header_len(&self) -> usize;

    /// Pure predicate over exactly [`BinaryFormat::header_len`] header
    /// bytes.
    ///
    /// `binary_hint` is the driver's cheap binary/text classification of
    /// the same header. Implementations may feed bytes they inspect into
    /// `observer` even when they decline, so classification and format
    /// sniffing share one pass over the stream.
    fn check_header(
        &self,
        header: &[u8],
        binary_hint: bool,
        observer: Option<&dyn EncodingObserver>,
    ) -> bool;

    /// Fully parse the content into a concretely typed entity.
    ///
    /// Invoked only after [`BinaryFormat::check_header`] accepted the
    /// header. `Ok(None)` means the deep parse established this is not the
    /// format after all; the driver moves on to the next descriptor.
    /// Descriptors that parse nested content rebind the byte source inside
    /// `context` before handing it down.
    ///
    /// # Errors
    /// Returns an error when the parse started and then failed; the driver
    /// records it and continues with other descriptors.
    fn parse(&self, source: &dyn ByteSource, context: &MatchContext)
        -> Result<Option<Box<dyn Entity>>>;
}

/// A format recognized from a structured document tree.
pub trait StructuredFormat: Send + Sync {
    /// Canonical format name, e.g. `"xhtml"`.
    fn name(&self) -> &'static str;

    /// Media type of recognized content.
    fn media_type(&self) -> &'static str;

    /// Pure predicate over the sniffed root element and document-type
    /// identifiers.
    fn check_tree(&self, tree: &DocTree) -> bool;

    /// Fully parse the document into a concretely typed entity.
    ///
    /// Same contract as [`BinaryFormat::parse`].
    ///
    /// # Errors
    /// Returns an error when the parse started and then failed.
    fn parse(&self, source: &dyn ByteSource, context: &MatchContext)
        -> Result<Option<Box<dyn Entity>>>;
}

/// What a forward-only reader sees at the root of a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTree {
    /// Local name of the root element.
    pub root_name: String,
    /// Namespace the root element is bound to, when declared on it.
    pub root_namespace: Option<String>,
    /// Public identifier from the document-type declaration.
    pub public_id: Option<String>,
    /// System identifier from the document-type declaration.
    pub system_id: Option<String>,
}

/// Sniff the root element and document-type identifiers from a stream
/// prefix.
///
/// The reader walks forward past the declaration, comments and whitespace
/// until the first start element; anything that is not well-formed markup
/// up to that point makes the whole prefix a non-match (`None`), never an
/// error. A prefix truncated *after* the root element still sniffs.
#[must_use = "returns the sniffed tree if the prefix is structured"]
pub fn sniff_tree(prefix: &[u8]) -> Option<DocTree> {
    let mut reader = Reader::from_reader(prefix);
    let mut buf = Vec::new();
    let mut public_id = None;
    let mut system_id = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_)) => {}
            Ok(Event::Text(text)) => {
                if !text.as_ref().iter().all(u8::is_ascii_whitespace) {
                    return None;
                }
            }
            Ok(Event::DocType(text)) => {
                let decl = String::from_utf8_lossy(text.as_ref()).into_owned();
                (public_id, system_id) = parse_doctype(&decl);
            }
            Ok(Event::Start(start) | Event::Empty(start)) => {
                let (root_name, root_namespace) = root_identity(&start);
                return Some(DocTree {
                    root_name,
                    root_namespace,
                    public_id,
                    system_id,
                });
            }
            // End/CData before any start element, EOF, or a parse error:
            // the prefix is not a document tree.
            _ => return None,
        }
        buf.clear();
    }
}

/// Local name of the root element plus the namespace it is bound to.
fn root_identity(start: &BytesStart<'_>) -> (String, Option<String>) {
    let qname = start.name();
    let raw = qname.as_ref();
    let (prefix, local) = match raw.iter().position(|&b| b == b':') {
        Some(idx) => (Some(&raw[..idx]), &raw[idx + 1..]),
        None => (None, raw),
    };
    let mut namespace = None;
    for attr in start.attributes().flatten() {
        let key = attr.key.as_ref();
        let declares_root = match prefix {
            None => key == b"xmlns",
            Some(p) => key.strip_prefix(b"xmlns:") == Some(p),
        };
        if declares_root {
            namespace = Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    (String::from_utf8_lossy(local).into_owned(), namespace)
}

/// Extract public/system identifiers from a DOCTYPE declaration body.
fn parse_doctype(decl: &str) -> (Option<String>, Option<String>) {
    let upper = decl.to_ascii_uppercase();
    let literals = quoted_literals(decl);
    if upper.contains("PUBLIC") {
        let mut iter = literals.into_iter();
        (iter.next(), iter.next())
    } else if upper.contains("SYSTEM") {
        (None, literals.into_iter().next())
    } else {
        (None, None)
    }
}

/// All single- or double-quoted literals in declaration order.
fn quoted_literals(decl: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = decl.chars();
    while let Some(c) = chars.next() {
        if c == '"' || c == '\'' {
            let literal: String = chars.by_ref().take_while(|&d| d != c).collect();
            out.push(literal);
        }
    }
    out
}
