//! Semantic result tree
//!
//! [`SemanticNode`] is what resolution hands back: a typed node with a span,
//! open metadata, owned children and borrowed references into the parse
//! tree. Nodes are rebuilt on every resolve and carry no identity across
//! calls.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use textcase_document::{Document, Point, RawNode};

/// Metadata key of the grammar kind a node was built from
pub const ORIGINAL_NODE_TYPE: &str = "original_node_type";
/// Metadata key of the accumulated start adjustment
pub const START_OFFSET: &str = "start_offset";
/// Metadata key of the accumulated end adjustment
pub const END_OFFSET: &str = "end_offset";
/// Metadata key of the display name
pub const NODE_NAME: &str = "node_name";

/// Semantic category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Module or namespace
    Namespace,
    /// Free function
    Function,
    /// Class or struct
    Class,
    /// Method
    Method,
    /// Variable or constant
    Variable,
    /// Expression
    Expr,
    /// Import statement
    Import,
    /// Interface or trait
    Interface,
    /// Heading line
    Heading,
    /// Paragraph
    Paragraph,
    /// Fenced or indented code
    CodeBlock,
    /// One list entry
    ListItem,
    /// Whole list
    ListBlock,
    /// Link or link definition
    Link,
    /// Inline text
    Text,
    /// Other block of text (quote, table, html)
    TextBlock,
    /// Heading plus everything it governs
    Section,
    /// Leading metadata block
    Metadata,
    /// Anything else
    Generic,
}

impl NodeType {
    /// Semantic type for a Markdown grammar kind
    #[must_use]
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "section" => Self::Section,
            "atx_heading" | "setext_heading" => Self::Heading,
            "paragraph" => Self::Paragraph,
            "fenced_code_block" | "indented_code_block" => Self::CodeBlock,
            "list" => Self::ListBlock,
            "list_item" => Self::ListItem,
            "minus_metadata" | "plus_metadata" => Self::Metadata,
            "link_reference_definition" | "inline_link" | "full_reference_link" | "uri_autolink" => {
                Self::Link
            }
            "inline" => Self::Text,
            "block_quote" | "pipe_table" | "html_block" | "thematic_break" => Self::TextBlock,
            _ => Self::Generic,
        }
    }

    /// Upper-case name, as serialized
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "NAMESPACE",
            Self::Function => "FUNCTION",
            Self::Class => "CLASS",
            Self::Method => "METHOD",
            Self::Variable => "VARIABLE",
            Self::Expr => "EXPR",
            Self::Import => "IMPORT",
            Self::Interface => "INTERFACE",
            Self::Heading => "HEADING",
            Self::Paragraph => "PARAGRAPH",
            Self::CodeBlock => "CODE_BLOCK",
            Self::ListItem => "LIST_ITEM",
            Self::ListBlock => "LIST_BLOCK",
            Self::Link => "LINK",
            Self::Text => "TEXT",
            Self::TextBlock => "TEXT_BLOCK",
            Self::Section => "SECTION",
            Self::Metadata => "METADATA",
            Self::Generic => "GENERIC",
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open region between two points, `start <= end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    start: Point,
    end: Point,
}

impl Span {
    /// Create span from two points in either order
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Span covered by a raw node
    #[inline]
    #[must_use]
    pub fn of(raw: &RawNode<'_>) -> Self {
        Self::new(raw.start_point(), raw.end_point())
    }

    /// Start point
    #[inline]
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// End point
    #[inline]
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Smallest span covering both
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Check if `other` lies entirely inside this span
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Resolved, typed node
///
/// # Invariants
/// - `span.start <= span.end`; [`expand`](Self::expand) only ever widens it
/// - `start_offset`/`end_offset` adjustments accumulate and never touch the span
/// - children are exclusively owned; raw nodes borrow the document's tree
#[derive(Debug, Clone)]
pub struct SemanticNode<'doc> {
    node_type: NodeType,
    span: Span,
    metadata: BTreeMap<String, Value>,
    children: Vec<SemanticNode<'doc>>,
    raw_nodes: Vec<RawNode<'doc>>,
}

impl<'doc> SemanticNode<'doc> {
    /// Create node with an empty metadata map
    #[must_use]
    pub fn new(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            span,
            metadata: BTreeMap::new(),
            children: Vec::new(),
            raw_nodes: Vec::new(),
        }
    }

    /// Create node covering `raw`, recording its grammar kind
    #[must_use]
    pub fn from_raw(node_type: NodeType, raw: RawNode<'doc>) -> Self {
        let mut node = Self::new(node_type, Span::of(&raw));
        node.set_metadata(ORIGINAL_NODE_TYPE, raw.kind());
        node.raw_nodes.push(raw);
        node
    }

    /// Semantic type
    #[inline]
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Recorded span (offset adjustments not applied)
    #[inline]
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Metadata map
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Metadata value by key
    #[inline]
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Set a metadata value, replacing any previous one
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Display name (`node_name` metadata), if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata.get(NODE_NAME).and_then(Value::as_str)
    }

    /// Child nodes
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[SemanticNode<'doc>] {
        &self.children
    }

    /// Append a child
    pub fn add_child(&mut self, child: SemanticNode<'doc>) {
        self.children.push(child);
    }

    /// Associated parse tree nodes
    #[inline]
    #[must_use]
    pub fn raw_nodes(&self) -> &[RawNode<'doc>] {
        &self.raw_nodes
    }

    /// Associate `raw` and widen the span to cover it
    pub fn expand(&mut self, raw: RawNode<'doc>) {
        self.span = self.span.union(Span::of(&raw));
        self.raw_nodes.push(raw);
    }

    /// Add to the start/end adjustments, as `(lines, columns)`
    ///
    /// Repeated calls compose: the deltas are summed into the metadata.
    pub fn adjust_offsets(&mut self, start: (i64, i64), end: (i64, i64)) {
        self.accumulate(START_OFFSET, start);
        self.accumulate(END_OFFSET, end);
    }

    fn accumulate(&mut self, key: &str, (lines, columns): (i64, i64)) {
        let (l, c) = self.offset(key);
        self.metadata
            .insert(key.to_string(), json!([l + lines, c + columns]));
    }

    fn offset(&self, key: &str) -> (i64, i64) {
        let pair = self.metadata.get(key).and_then(Value::as_array);
        let at = |i: usize| {
            pair.and_then(|p| p.get(i))
                .and_then(Value::as_i64)
                .unwrap_or(0)
        };
        (at(0), at(1))
    }

    /// Accumulated start adjustment
    #[inline]
    #[must_use]
    pub fn start_offset(&self) -> (i64, i64) {
        self.offset(START_OFFSET)
    }

    /// Accumulated end adjustment
    #[inline]
    #[must_use]
    pub fn end_offset(&self) -> (i64, i64) {
        self.offset(END_OFFSET)
    }

    /// Span with adjustments applied; never inverted
    #[must_use]
    pub fn effective_range(&self) -> Span {
        let (sl, sc) = self.start_offset();
        let (el, ec) = self.end_offset();
        let start = self.span.start().offset(sl, sc);
        let end = self.span.end().offset(el, ec).max(start);
        Span { start, end }
    }

    /// Text of the effective range
    #[must_use]
    pub fn text(&self, doc: &Document) -> String {
        let range = self.effective_range();
        doc.get_text(Some(range.start()), Some(range.end()))
    }

    /// Direct children of the given type
    #[must_use]
    pub fn find_children_by_type(&self, node_type: NodeType) -> Vec<&SemanticNode<'doc>> {
        self.children
            .iter()
            .filter(|c| c.node_type == node_type)
            .collect()
    }

    /// First direct child with the given name
    #[must_use]
    pub fn find_child_by_name(&self, name: &str) -> Option<&SemanticNode<'doc>> {
        self.children.iter().find(|c| c.name() == Some(name))
    }

    /// JSON view, including the effective text
    #[must_use]
    pub fn to_json(&self, doc: &Document) -> Value {
        let point = |p: Point| json!([p.line, p.column]);
        let mut out = json!({
            "node_name": self.name(),
            "node_type": self.node_type.as_str(),
            "text": self.text(doc),
            "start_point": point(self.span.start()),
            "end_point": point(self.span.end()),
            "metadata": self.metadata,
        });
        if !self.children.is_empty() {
            out["children"] = self.children.iter().map(|c| c.to_json(doc)).collect();
        }
        out
    }
}

impl Display for SemanticNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} {} {name}", self.node_type, self.span),
            None => write!(f, "{} {}", self.node_type, self.span),
        }
    }
}
