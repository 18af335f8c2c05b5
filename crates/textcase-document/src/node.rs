//! Borrowed view of a syntax tree node

use crate::point::Point;
use std::borrow::Cow;
use std::fmt::{self, Debug, Formatter};
use std::ops::Range;

/// Syntax tree node together with the source it spans
///
/// Borrowed from a [`Document`](crate::Document): the tree stays owned by
/// the document and `'doc` is tied to it.
#[derive(Clone, Copy)]
pub struct RawNode<'doc> {
    node: tree_sitter::Node<'doc>,
    source: &'doc [u8],
}

impl<'doc> RawNode<'doc> {
    #[inline]
    pub(crate) fn new(node: tree_sitter::Node<'doc>, source: &'doc [u8]) -> Self {
        Self { node, source }
    }

    /// Grammar node kind (`section`, `atx_heading`, `inline`, ...)
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Identity within the owning tree
    #[inline]
    #[must_use]
    pub fn id(&self) -> usize {
        self.node.id()
    }

    /// Check if the node is named in the grammar
    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    /// Start position
    #[inline]
    #[must_use]
    pub fn start_point(&self) -> Point {
        self.node.start_position().into()
    }

    /// End position (exclusive)
    #[inline]
    #[must_use]
    pub fn end_point(&self) -> Point {
        self.node.end_position().into()
    }

    /// Start byte offset
    #[inline]
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.node.start_byte()
    }

    /// End byte offset (exclusive)
    #[inline]
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.node.end_byte()
    }

    /// Byte range
    #[inline]
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// Raw bytes covered by the node
    #[must_use]
    pub fn text(&self) -> &'doc [u8] {
        let end = self.end_byte().min(self.source.len());
        let start = self.start_byte().min(end);
        &self.source[start..end]
    }

    /// Covered bytes as UTF-8 (lossy)
    #[inline]
    #[must_use]
    pub fn utf8_text(&self) -> Cow<'doc, str> {
        String::from_utf8_lossy(self.text())
    }

    /// All children, anonymous tokens included
    #[must_use]
    pub fn children(&self) -> Vec<RawNode<'doc>> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|n| Self::new(n, self.source))
            .collect()
    }

    /// Named children only
    #[must_use]
    pub fn named_children(&self) -> Vec<RawNode<'doc>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|n| Self::new(n, self.source))
            .collect()
    }

    /// First child of the given kind
    #[must_use]
    pub fn child_of_kind(&self, kind: &str) -> Option<RawNode<'doc>> {
        self.children().into_iter().find(|c| c.kind() == kind)
    }

    /// Parent node, `None` at the root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<RawNode<'doc>> {
        self.node.parent().map(|n| Self::new(n, self.source))
    }

    /// Heading level for `atx_heading`, `setext_heading` and `section` nodes
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind() {
            "atx_heading" => self.children().iter().find_map(|c| marker_level(c.kind())),
            "setext_heading" => self.children().iter().find_map(|c| match c.kind() {
                "setext_h1_underline" => Some(1),
                "setext_h2_underline" => Some(2),
                _ => None,
            }),
            "section" => self.heading().and_then(|h| h.heading_level()),
            _ => None,
        }
    }

    /// Trimmed heading text for heading and `section` nodes
    ///
    /// An ATX closing sequence (`## Title ##`) is not part of the title.
    #[must_use]
    pub fn heading_title(&self) -> Option<String> {
        match self.kind() {
            "atx_heading" => Some(
                self.child_of_kind("inline")
                    .map(|inline| strip_closing_sequence(inline.utf8_text().trim()).to_string())
                    .unwrap_or_default(),
            ),
            "setext_heading" => self
                .child_of_kind("paragraph")
                .map(|p| p.utf8_text().trim().to_string()),
            "section" => self.heading().and_then(|h| h.heading_title()),
            _ => None,
        }
    }

    /// Heading that opens a `section` node
    #[must_use]
    pub fn heading(&self) -> Option<RawNode<'doc>> {
        if self.kind() != "section" {
            return None;
        }
        self.named_children()
            .into_iter()
            .next()
            .filter(|c| matches!(c.kind(), "atx_heading" | "setext_heading"))
    }

    /// Underlying tree-sitter node
    #[inline]
    #[must_use]
    pub fn ts_node(&self) -> tree_sitter::Node<'doc> {
        self.node
    }
}

/// `Title ##` → `Title`; the `#` run only closes after whitespace
fn strip_closing_sequence(title: &str) -> &str {
    let body = title.trim_end_matches('#');
    if body.len() == title.len() {
        title
    } else if body.is_empty() || body.ends_with([' ', '\t']) {
        body.trim_end()
    } else {
        title
    }
}

/// `atx_h3_marker` → 3
fn marker_level(kind: &str) -> Option<u8> {
    kind.strip_prefix("atx_h")?
        .strip_suffix("_marker")?
        .parse()
        .ok()
}

impl PartialEq for RawNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for RawNode<'_> {}

impl Debug for RawNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawNode")
            .field("kind", &self.kind())
            .field("start", &self.start_point())
            .field("end", &self.end_point())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MarkdownParser;

    #[test]
    fn marker_levels() {
        assert_eq!(marker_level("atx_h1_marker"), Some(1));
        assert_eq!(marker_level("atx_h6_marker"), Some(6));
        assert_eq!(marker_level("atx_heading"), None);
    }

    #[test]
    fn section_heading_helpers() {
        let doc = MarkdownParser::new().parse("# Top\n\n## Child  \n\nbody\n").unwrap();
        let top = doc
            .root()
            .named_children()
            .into_iter()
            .find(|n| n.kind() == "section")
            .unwrap();
        assert_eq!(top.heading_level(), Some(1));
        assert_eq!(top.heading_title().as_deref(), Some("Top"));

        let child = top
            .named_children()
            .into_iter()
            .find(|n| n.kind() == "section")
            .unwrap();
        assert_eq!(child.heading_level(), Some(2));
        assert_eq!(child.heading_title().as_deref(), Some("Child"));
        assert_eq!(child.parent(), Some(top));
    }

    #[test]
    fn closing_sequence_is_not_title() {
        assert_eq!(strip_closing_sequence("A ##"), "A");
        assert_eq!(strip_closing_sequence("A \t#"), "A");
        assert_eq!(strip_closing_sequence("C#"), "C#");
        assert_eq!(strip_closing_sequence("##"), "");
        assert_eq!(strip_closing_sequence("A"), "A");

        let doc = MarkdownParser::new().parse("# Top ##  \n").unwrap();
        let heading = doc.root().named_children()[0].heading().unwrap();
        assert_eq!(heading.heading_title().as_deref(), Some("Top"));
    }

    #[test]
    fn setext_heading_helpers() {
        let doc = MarkdownParser::new().parse("Top\n===\n\nbody\n").unwrap();
        let section = doc.root().named_children()[0];
        assert_eq!(section.kind(), "section");
        assert_eq!(section.heading_level(), Some(1));
        assert_eq!(section.heading_title().as_deref(), Some("Top"));
    }

    #[test]
    fn non_heading_has_no_level() {
        let doc = MarkdownParser::new().parse("plain text\n").unwrap();
        assert_eq!(doc.root().heading_level(), None);
        assert_eq!(doc.root().heading_title(), None);
    }
}
