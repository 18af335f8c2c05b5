//! Parsed document: source bytes plus syntax tree
//!
//! Edits never mutate a document. [`Document::replace_bytes`] returns a new
//! buffer and [`Document::edit`] returns a new, incrementally re-parsed
//! document.

use crate::cache::compile_query;
use crate::error::{DocumentError, DocumentResult};
use crate::node::RawNode;
use crate::parser::parse_tree;
use crate::point::Point;
use std::fmt::{self, Debug, Formatter};
use streaming_iterator::StreamingIterator;
use tree_sitter::{InputEdit, Query, QueryCursor, Tree};

/// One named capture produced by a query
#[derive(Debug, Clone)]
pub struct Capture<'doc> {
    /// Capture name without the leading `@`
    pub name: String,
    /// Captured node
    pub node: RawNode<'doc>,
}

/// Captures of one pattern match, in pattern order
#[derive(Debug, Clone)]
pub struct QueryHit<'doc> {
    /// Index of the matching pattern within the query
    pub pattern_index: usize,
    /// Captures of this match
    pub captures: Vec<Capture<'doc>>,
}

impl<'doc> QueryHit<'doc> {
    /// First node captured under `name`
    #[must_use]
    pub fn first(&self, name: &str) -> Option<RawNode<'doc>> {
        self.captures.iter().find(|c| c.name == name).map(|c| c.node)
    }

    /// Every node captured under `name`, in order
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<RawNode<'doc>> {
        self.captures
            .iter()
            .filter(|c| c.name == name)
            .map(|c| c.node)
            .collect()
    }
}

/// Parsed Markdown document
#[derive(Clone)]
pub struct Document {
    source: Vec<u8>,
    tree: Tree,
    line_starts: Vec<usize>,
}

impl Document {
    pub(crate) fn from_parts(source: Vec<u8>, tree: Tree) -> Self {
        let line_starts = line_starts(&source);
        Self {
            source,
            tree,
            line_starts,
        }
    }

    /// Root (`document`) node
    #[inline]
    #[must_use]
    pub fn root(&self) -> RawNode<'_> {
        RawNode::new(self.tree.root_node(), &self.source)
    }

    /// Whole source buffer
    #[inline]
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Buffer length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Check if the buffer is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Underlying syntax tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Compile a structural pattern for this document's grammar
    ///
    /// # Errors
    /// Returns [`DocumentError::Query`] if the pattern is malformed.
    pub fn compile_query(&self, pattern: &str) -> DocumentResult<Query> {
        compile_query(pattern)
    }

    /// Compile and run `pattern`, returning ordered (name, node) pairs
    ///
    /// # Errors
    /// Returns [`DocumentError::Query`] if the pattern is malformed.
    pub fn query(&self, pattern: &str) -> DocumentResult<Vec<Capture<'_>>> {
        let query = self.compile_query(pattern)?;
        Ok(self
            .query_matches(&query)
            .into_iter()
            .flat_map(|hit| hit.captures)
            .collect())
    }

    /// Run a compiled query, grouping captures per match
    ///
    /// `#match?` and `#eq?` predicates are applied against this document's
    /// source.
    #[must_use]
    pub fn query_matches(&self, query: &Query) -> Vec<QueryHit<'_>> {
        let names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, self.tree.root_node(), self.source.as_slice());

        let mut hits = Vec::new();
        while let Some(m) = matches.next() {
            let captures = m
                .captures
                .iter()
                .map(|c| Capture {
                    name: names
                        .get(c.index as usize)
                        .map_or_else(String::new, |n| (*n).to_string()),
                    node: RawNode::new(c.node, &self.source),
                })
                .collect();
            hits.push(QueryHit {
                pattern_index: m.pattern_index,
                captures,
            });
        }
        tracing::trace!(matches = hits.len(), "query executed");
        hits
    }

    /// Bytes in `start..end`; missing bounds mean buffer start/end
    ///
    /// Out-of-range bounds are clamped.
    #[must_use]
    pub fn get_bytes(&self, start: Option<usize>, end: Option<usize>) -> &[u8] {
        let end = end.unwrap_or(self.source.len()).min(self.source.len());
        let start = start.unwrap_or(0).min(end);
        &self.source[start..end]
    }

    /// New buffer with `start..end` replaced by `new_bytes`
    ///
    /// Out-of-range bounds are clamped; the document itself is unchanged.
    #[must_use]
    pub fn replace_bytes(&self, start: usize, end: usize, new_bytes: &[u8]) -> Vec<u8> {
        let end = end.min(self.source.len());
        let start = start.min(end);
        let mut out = Vec::with_capacity(self.source.len() - (end - start) + new_bytes.len());
        out.extend_from_slice(&self.source[..start]);
        out.extend_from_slice(new_bytes);
        out.extend_from_slice(&self.source[end..]);
        out
    }

    /// Text between two points; missing bounds mean document start/end
    #[must_use]
    pub fn get_text(&self, start: Option<Point>, end: Option<Point>) -> String {
        let start = start.map_or(0, |p| self.point_to_byte(p));
        let end = end.map_or(self.source.len(), |p| self.point_to_byte(p));
        String::from_utf8_lossy(self.get_bytes(Some(start), Some(end))).into_owned()
    }

    /// Position of a byte offset (clamped to the buffer)
    #[must_use]
    pub fn byte_to_point(&self, byte: usize) -> Point {
        let byte = byte.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= byte)
            .saturating_sub(1);
        Point::new(line, byte - self.line_starts[line])
    }

    /// Byte offset of a position
    ///
    /// Lines past the end map to the buffer end; columns past the end of a
    /// line map to the start of the next line.
    #[must_use]
    pub fn point_to_byte(&self, point: Point) -> usize {
        let Some(&line_start) = self.line_starts.get(point.line) else {
            return self.source.len();
        };
        let line_end = self
            .line_starts
            .get(point.line + 1)
            .copied()
            .unwrap_or(self.source.len());
        line_start.saturating_add(point.column).min(line_end)
    }

    /// Splice `new_bytes` into `start..end` and re-parse incrementally
    ///
    /// # Errors
    /// Returns [`DocumentError::ByteRange`] if the range is inverted or past
    /// the end, or a parse error from the grammar.
    pub fn edit(&self, start: usize, end: usize, new_bytes: &[u8]) -> DocumentResult<Self> {
        if start > end || end > self.source.len() {
            return Err(DocumentError::ByteRange {
                start,
                end,
                len: self.source.len(),
            });
        }

        let source = self.replace_bytes(start, end, new_bytes);
        let new_end_byte = start + new_bytes.len();
        let new_line_starts = line_starts(&source);

        let edit = InputEdit {
            start_byte: start,
            old_end_byte: end,
            new_end_byte,
            start_position: self.byte_to_point(start).into(),
            old_end_position: self.byte_to_point(end).into(),
            new_end_position: point_in(&new_line_starts, new_end_byte).into(),
        };

        let mut old_tree = self.tree.clone();
        old_tree.edit(&edit);
        let tree = parse_tree(&source, Some(&old_tree))?;
        tracing::debug!(start, end, inserted = new_bytes.len(), "document re-parsed");

        Ok(Self {
            source,
            tree,
            line_starts: new_line_starts,
        })
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.source.len())
            .field("lines", &self.line_starts.len())
            .field("root", &self.root())
            .finish()
    }
}

fn line_starts(source: &[u8]) -> Vec<usize> {
    std::iter::once(0)
        .chain(
            source
                .iter()
                .enumerate()
                .filter(|(_, &b)| b == b'\n')
                .map(|(i, _)| i + 1),
        )
        .collect()
}

fn point_in(line_starts: &[usize], byte: usize) -> Point {
    let line = line_starts
        .partition_point(|&start| start <= byte)
        .saturating_sub(1);
    Point::new(line, byte - line_starts.get(line).copied().unwrap_or(0))
}
