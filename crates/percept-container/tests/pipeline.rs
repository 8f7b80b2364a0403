//! Raw bytes through the whole pipeline: recognition, dispatch,
//! traversal, content-addressed identity.

use percept_analyze::AnalyzerRegistry;
use percept_container::{
    ChildEntry, ContainerAnalyzer, ContainerBehaviour, ContainerProvider, Descend,
    TraversalConfig, TraversalDriver, TraversalError,
};
use percept_core::{
    AnalysisContext, AnalysisResult, AnalyzerError, ByteSource, BytesSource, Entity,
    EncodingObserver, MatchContext, MemoryGraph, Term,
};
use percept_format::{BinaryFormat, FormatCatalog, FormatError};
use percept_hash::{multihash_uri, HashRegistry};
use std::io::Read;
use std::sync::Arc;

/// A toy packed format: `PACK\n` then one member per line.
#[derive(Clone)]
struct Pack {
    members: Vec<String>,
}

#[derive(Clone)]
struct TextBlob {
    text: String,
}

struct PackFormat;

impl BinaryFormat for PackFormat {
    fn name(&self) -> &'static str {
        "pack"
    }

    fn media_type(&self) -> &'static str {
        "application/x-pack"
    }

    fn header_len(&self) -> usize {
        5
    }

    fn check_header(
        &self,
        header: &[u8],
        _binary_hint: bool,
        _observer: Option<&dyn EncodingObserver>,
    ) -> bool {
        header == b"PACK\n"
    }

    fn parse(
        &self,
        source: &dyn ByteSource,
        _context: &MatchContext,
    ) -> Result<Option<Box<dyn Entity>>, FormatError> {
        let mut data = Vec::new();
        source.open()?.read_to_end(&mut data)?;
        let body = String::from_utf8(data[5..].to_vec())
            .map_err(|_| FormatError::malformed("pack", "non-utf8 member list"))?;
        let members = body.lines().map(str::to_string).collect();
        Ok(Some(Box::new(Pack { members })))
    }
}

struct PackAnalyzer;

impl ContainerAnalyzer for PackAnalyzer {
    fn analyze(
        &self,
        _entity: &dyn Entity,
        _context: &AnalysisContext,
        descend: &mut Descend<'_>,
    ) -> Result<AnalysisResult, TraversalError> {
        descend(ContainerBehaviour::FOLLOW_CHILDREN | ContainerBehaviour::BLOCK_OTHER)
    }

    fn children(&self, entity: &dyn Entity) -> Result<Vec<ChildEntry>, AnalyzerError> {
        let pack = entity
            .as_any()
            .downcast_ref::<Pack>()
            .ok_or_else(|| AnalyzerError::Failed("not a pack".to_string()))?;
        Ok(pack
            .members
            .iter()
            .enumerate()
            .map(|(i, text)| {
                ChildEntry::new(
                    format!("member-{i}"),
                    Box::new(TextBlob { text: text.clone() }),
                )
            })
            .collect())
    }
}

struct PackProvider {
    analyzer: PackAnalyzer,
}

impl ContainerProvider for PackProvider {
    fn name(&self) -> &'static str {
        "pack"
    }

    fn match_root(
        &self,
        root: &dyn Entity,
        _context: &AnalysisContext,
    ) -> Option<&dyn ContainerAnalyzer> {
        root.as_any()
            .downcast_ref::<Pack>()
            .map(|_| &self.analyzer as &dyn ContainerAnalyzer)
    }
}

/// Blob analyzer that keys the node on the content digest, so equal
/// bytes land on the same node regardless of which member held them.
fn content_addressed_registry() -> AnalyzerRegistry {
    let mut registry = AnalyzerRegistry::new();
    registry.register::<TextBlob, _>(|blob: &TextBlob, context: &AnalysisContext| {
        let algo = HashRegistry::global()
            .by_name("sha2-256")
            .map_err(|e| AnalyzerError::Failed(e.to_string()))?;
        let digest = algo.digest(blob.text.as_bytes());
        let uri = multihash_uri(algo.spec(), &digest)
            .map_err(|e| AnalyzerError::Failed(e.to_string()))?;
        let node = context.graph().node(&uri);
        context
            .graph()
            .put_value(&node, &Term::new("content"), &blob.text);
        Ok(AnalysisResult::with_node(node))
    });
    registry
}

#[test]
fn test_bytes_to_graph_with_deduplicated_identity() {
    let mut catalog = FormatCatalog::new();
    catalog.register_binary(Arc::new(PackFormat));

    let mut driver = TraversalDriver::new(
        Arc::new(content_addressed_registry()),
        TraversalConfig::new(),
    );
    driver.register_provider(Arc::new(PackProvider {
        analyzer: PackAnalyzer,
    }));

    let graph = Arc::new(MemoryGraph::new());
    let context = AnalysisContext::new(graph.clone());
    let source: Arc<dyn ByteSource> =
        Arc::new(BytesSource::new(&b"PACK\nalpha\nbeta\nalpha"[..]));

    // Recognize the bytes, then traverse the recognized entity.
    let result = catalog
        .recognize(&source, context.match_context(), |recognition, entity| {
            assert_eq!(recognition.format, "pack");
            driver.traverse(entity.as_ref(), "pack:test", &context)
        })
        .unwrap()
        .expect("pack recognized")
        .expect("traversal completed");

    assert!(result.is_recognized());
    let pack_node = result.node.unwrap();
    let members = graph.links_from(&pack_node, &Term::new("contains"));
    // Three members, but the duplicated content shares one identity.
    assert_eq!(members.len(), 3);
    assert_eq!(members[0], members[2]);
    assert_ne!(members[0], members[1]);
    assert!(members[0].as_str().starts_with("urn:mh:"));
}

#[test]
fn test_unrecognized_bytes_produce_no_graph_detail() {
    let mut catalog = FormatCatalog::new();
    catalog.register_binary(Arc::new(PackFormat));

    let graph = Arc::new(MemoryGraph::new());
    let context = AnalysisContext::new(graph.clone());
    let source: Arc<dyn ByteSource> = Arc::new(BytesSource::new(&b"not a pack at all"[..]));

    let outcome = catalog
        .recognize(&source, context.match_context(), |_, _| ())
        .unwrap();

    assert!(outcome.is_none());
    assert!(graph.assertions().is_empty());
}
