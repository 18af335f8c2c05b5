//! Address resolution
//!
//! Runs compiled address queries against a parsed document and wraps the
//! captures as [`SemanticNode`]s:
//!
//! - metadata selectors yield one `Metadata` node per leading YAML block,
//!   trimmed to its body through offset adjustments
//! - heading paths yield one `Section` node per matched section, holding
//!   the heading and the captured content as children
//! - bare selectors yield the document's top-level blocks (or the whole
//!   document for `#file`)
//!
//! No match is an empty list, never an error.

use crate::builder::{MarkdownNodeBuilder, NodeBuilder};
use crate::config::EngineConfig;
use crate::error::{ResolveError, ResolveResult};
use crate::node::{NodeType, SemanticNode, NODE_NAME};
use serde_json::Value;
use std::sync::Arc;
use textcase_address::{
    Address, CompiledQuery, QueryCompiler, ResourceSelector, CONTENT_CAPTURE, FRONTMATTER_CAPTURE,
    METADATA_QUERY, TITLE_CAPTURE,
};
use textcase_document::{Document, QueryCache, QueryHit, RawNode};

/// Metadata key listing the matched ancestor titles, outermost first
pub const ANCESTORS: &str = "ancestors";

/// Node name given to metadata blocks
pub const FRONTMATTER_NAME: &str = "frontmatter";

/// Resolves addresses against parsed documents
///
/// Holds no per-document state; one resolver can serve any number of
/// documents.
#[derive(Debug, Clone)]
pub struct Resolver {
    compiler: QueryCompiler,
    builder: Arc<dyn NodeBuilder>,
    cache: QueryCache,
}

impl Resolver {
    /// Create resolver with the Markdown node builder
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            compiler: QueryCompiler::new(),
            builder: Arc::new(MarkdownNodeBuilder),
            cache: QueryCache::new(config.resolver.query_cache_capacity),
        }
    }

    /// With a different node builder
    #[must_use]
    pub fn with_builder(mut self, builder: impl NodeBuilder + 'static) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    /// Compiled-query cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Tokenize and resolve a raw address
    ///
    /// # Errors
    /// See [`Resolver::resolve_address`].
    pub fn resolve<'doc>(
        &self,
        address: &str,
        doc: &'doc Document,
    ) -> ResolveResult<Vec<SemanticNode<'doc>>> {
        self.resolve_address(&Address::parse(address), doc)
    }

    /// Resolve a tokenized address
    ///
    /// # Errors
    /// - [`ResolveError::InvalidAddress`] for `#file` with a heading path, or
    ///   an unrecognized selector without one
    /// - [`ResolveError::Document`] if the compiled query is rejected
    pub fn resolve_address<'doc>(
        &self,
        address: &Address,
        doc: &'doc Document,
    ) -> ResolveResult<Vec<SemanticNode<'doc>>> {
        let selector = address.selector();
        if selector.reads_metadata() {
            return self.metadata(doc);
        }
        if address.is_selector_only() {
            return self.selector_only(address, doc);
        }
        if *selector == ResourceSelector::File {
            return Err(ResolveError::invalid_address(
                address,
                "#file addresses the whole document and takes no heading path",
            ));
        }

        let compiled = self
            .compiler
            .compile(address)
            .ok_or_else(|| ResolveError::invalid_address(address, "no query for heading path"))?;
        let nodes = self.sections(&compiled, doc)?;
        tracing::debug!(%address, matches = nodes.len(), "resolved heading path");
        Ok(nodes)
    }

    fn metadata<'doc>(&self, doc: &'doc Document) -> ResolveResult<Vec<SemanticNode<'doc>>> {
        let query = self.cache.get_or_compile(METADATA_QUERY)?;
        let nodes: Vec<_> = doc
            .query_matches(&query)
            .iter()
            .flat_map(|hit| hit.all(FRONTMATTER_CAPTURE))
            .map(|raw| {
                let mut node = self.builder.build(NodeType::Metadata, raw);
                node.adjust_offsets((1, 0), (-1, 0));
                node.set_metadata(NODE_NAME, FRONTMATTER_NAME);
                node
            })
            .collect();
        tracing::debug!(matches = nodes.len(), "resolved metadata block");
        Ok(nodes)
    }

    fn selector_only<'doc>(
        &self,
        address: &Address,
        doc: &'doc Document,
    ) -> ResolveResult<Vec<SemanticNode<'doc>>> {
        match address.selector() {
            ResourceSelector::File => {
                let mut node = self.builder.build(NodeType::Generic, doc.root());
                node.set_metadata(NODE_NAME, "file");
                Ok(vec![node])
            }
            ResourceSelector::Item | ResourceSelector::Test | ResourceSelector::Link => Ok(doc
                .root()
                .named_children()
                .into_iter()
                .filter(|raw| raw.start_byte() < raw.end_byte())
                .map(|raw| self.builder.build(NodeType::from_kind(raw.kind()), raw))
                .collect()),
            ResourceSelector::Metadata | ResourceSelector::Related => self.metadata(doc),
            ResourceSelector::Other(fragment) => Err(ResolveError::invalid_address(
                address,
                format!("selector '{fragment}' needs a heading path"),
            )),
        }
    }

    fn sections<'doc>(
        &self,
        compiled: &CompiledQuery,
        doc: &'doc Document,
    ) -> ResolveResult<Vec<SemanticNode<'doc>>> {
        let query = self.cache.get_or_compile(compiled.as_str())?;
        let ancestor_captures = compiled
            .title_captures()
            .split_last()
            .map_or(&[][..], |(_, rest)| rest);

        // the quantified content capture can split one section over several
        // matches; merge them per section
        let mut found: Vec<SectionMatch<'doc>> = Vec::new();
        for hit in doc.query_matches(&query) {
            let Some(section) = hit.first(TITLE_CAPTURE).and_then(enclosing_section) else {
                continue;
            };
            let index = match found.iter().position(|m| m.section == section) {
                Some(index) => index,
                None => {
                    found.push(SectionMatch::new(section, ancestor_titles(&hit, ancestor_captures)));
                    found.len() - 1
                }
            };
            found[index].add_content(hit.all(CONTENT_CAPTURE));
        }

        Ok(found.into_iter().map(|m| m.into_node(&*self.builder)).collect())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Title (`inline` or setext `paragraph`) → heading → `section`
fn enclosing_section(title: RawNode<'_>) -> Option<RawNode<'_>> {
    title
        .parent()
        .and_then(|heading| heading.parent())
        .filter(|section| section.kind() == "section")
}

fn ancestor_titles(hit: &QueryHit<'_>, captures: &[String]) -> Vec<String> {
    captures
        .iter()
        .filter_map(|name| hit.first(name))
        .filter_map(|title| title.parent().and_then(|heading| heading.heading_title()))
        .collect()
}

struct SectionMatch<'doc> {
    section: RawNode<'doc>,
    ancestors: Vec<String>,
    content: Vec<RawNode<'doc>>,
}

impl<'doc> SectionMatch<'doc> {
    fn new(section: RawNode<'doc>, ancestors: Vec<String>) -> Self {
        Self {
            section,
            ancestors,
            content: Vec::new(),
        }
    }

    fn add_content(&mut self, nodes: Vec<RawNode<'doc>>) {
        for node in nodes {
            if !self.content.contains(&node) {
                self.content.push(node);
            }
        }
    }

    fn into_node(mut self, builder: &dyn NodeBuilder) -> SemanticNode<'doc> {
        self.content.sort_by_key(RawNode::start_byte);

        let mut node = builder.build(NodeType::Section, self.section);
        if let Some(heading) = self.section.heading() {
            builder.build_child(&mut node, NodeType::Heading, heading);
        }
        for raw in self.content {
            builder.build_child(&mut node, NodeType::from_kind(raw.kind()), raw);
        }
        node.set_metadata(
            ANCESTORS,
            self.ancestors.into_iter().map(Value::String).collect::<Vec<_>>(),
        );
        node
    }
}
