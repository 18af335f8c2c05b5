//! Hierarchical document addresses
//!
//! Provides [`Address`], the tokenized form of strings such as
//! `Section/Subsection/#test`.
//!
//! # Grammar
//!
//! ```text
//! address  := (segment "/")* segment? ("#" selector)?
//! selector := "meta" | "frontmatter" | "item" | "head" | "test" | "case"
//!           | "related" | "link" | <other>
//! ```
//!
//! The terminal heading component is a prefix target unless the caller
//! closes it with `/`, in which case it must match exactly. Every earlier
//! component always matches exactly.

use crate::segment::{MatchMode, ResourceSelector, Segment};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Tokenized address: ordered heading path plus a resource selector
///
/// # Examples
/// - `"A/B"` → `[A (exact), B (prefix)]`, `#item`
/// - `"A/B/"` → `[A (exact), B (exact)]`, `#item`
/// - `"A/#meta"` → `[]`, `#meta` (metadata ignores the path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    segments: Vec<Segment>,
    selector: ResourceSelector,
}

impl Address {
    /// Create address from parts
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<Segment>, selector: ResourceSelector) -> Self {
        Self { segments, selector }
    }

    /// Address of the whole document (no address supplied)
    #[inline]
    #[must_use]
    pub fn whole_document() -> Self {
        Self::new(Vec::new(), ResourceSelector::File)
    }

    /// Tokenize an optional raw address
    ///
    /// `None` addresses the whole document.
    #[must_use]
    pub fn tokenize(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::whole_document, Self::parse)
    }

    /// Tokenize a raw address string
    ///
    /// Never fails: any string is syntactically acceptable. Whether it
    /// addresses anything is only known after resolution.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split('/').collect();

        let mut path: Vec<(usize, &str)> = Vec::new();
        let mut selector = None;
        let mut selector_index = tokens.len();

        for (index, token) in tokens.iter().enumerate() {
            if token.starts_with('#') {
                let found = ResourceSelector::from_fragment(token);
                if found.reads_metadata() {
                    path.clear();
                }
                selector = Some(found);
                selector_index = index;
                // fragment is terminal, the rest is ignored
                break;
            }
            if !token.is_empty() {
                path.push((index, token));
            }
        }

        let terminal_is_prefix = path
            .last()
            .is_some_and(|(index, _)| index + 1 == selector_index)
            && !raw.ends_with('/');

        let last = path.len().saturating_sub(1);
        let segments = path
            .into_iter()
            .enumerate()
            .map(|(position, (_, text))| {
                if terminal_is_prefix && position == last {
                    Segment::prefix(text)
                } else {
                    Segment::exact(text)
                }
            })
            .collect();

        Self::new(segments, selector.unwrap_or_default())
    }

    /// Exact heading path with the default selector
    ///
    /// Used when the caller already holds split components (for example when
    /// synthesizing structure) and heading texts may themselves contain `/`.
    #[must_use]
    pub fn exact_path(components: &[impl AsRef<str>]) -> Self {
        let segments = components
            .iter()
            .map(|c| Segment::exact(c.as_ref()))
            .collect();
        Self::new(segments, ResourceSelector::Item)
    }

    /// Heading path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resource selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &ResourceSelector {
        &self.selector
    }

    /// Number of path segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the address has no heading path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if the address consists of a selector only
    #[inline]
    #[must_use]
    pub fn is_selector_only(&self) -> bool {
        self.segments.is_empty()
    }

    /// Terminal segment (the actual match target)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Address with the last segment dropped (if any)
    ///
    /// The selector is kept; modes of the remaining segments are unchanged.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            selector: self.selector.clone(),
        })
    }

    /// Same address with every segment forced to exact mode
    #[must_use]
    pub fn into_exact(self) -> Self {
        Self {
            segments: self.segments.into_iter().map(Segment::into_exact).collect(),
            selector: self.selector,
        }
    }

    /// Heading texts, root to leaf
    #[inline]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(Segment::text)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::whole_document()
    }
}

impl Display for Address {
    /// Writes a string that tokenizes back to the same address
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let path = self.segments.iter().map(Segment::text).collect::<Vec<_>>();
        f.write_str(&path.join("/"))?;

        let terminal_exact = self
            .segments
            .last()
            .is_some_and(|s| s.mode() == MatchMode::Exact);

        match (&self.selector, terminal_exact) {
            (ResourceSelector::Item, true) => f.write_str("/"),
            (ResourceSelector::Item, false) => Ok(()),
            (selector, _) if self.segments.is_empty() => write!(f, "{selector}"),
            (selector, true) => write!(f, "//{selector}"),
            (selector, false) => write!(f, "/{selector}"),
        }
    }
}

impl FromStr for Address {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
