//! Markdown parser
//!
//! Uses the tree-sitter-md block grammar, which groups content under
//! `section` nodes by heading level and exposes the leading YAML block as
//! `minus_metadata`.

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use tree_sitter::{Language, Parser, Tree};

/// Markdown block grammar
#[inline]
#[must_use]
pub fn markdown_language() -> Language {
    tree_sitter_md::LANGUAGE.into()
}

/// Markdown parser
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    /// Create new markdown parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse content into a document
    ///
    /// # Errors
    /// Returns [`DocumentError`] if the grammar cannot be loaded or the
    /// parser yields no tree.
    pub fn parse(&self, content: impl Into<Vec<u8>>) -> DocumentResult<Document> {
        let source = content.into();
        let tree = parse_tree(&source, None)?;
        tracing::trace!(bytes = source.len(), "parsed markdown document");
        Ok(Document::from_parts(source, tree))
    }
}

/// Run the grammar over `source`, reusing `old` for incremental parsing
pub(crate) fn parse_tree(source: &[u8], old: Option<&Tree>) -> DocumentResult<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&markdown_language())?;
    parser.parse(source, old).ok_or(DocumentError::ParseFailed)
}
