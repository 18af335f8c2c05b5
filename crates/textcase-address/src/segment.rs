//! Address building blocks
//!
//! Provides [`Segment`] (one heading component with its match policy) and
//! [`ResourceSelector`] (the trailing `#fragment` of an address).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How a heading component is matched against heading titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    /// Whole title must equal the text (case-insensitive)
    Exact,
    /// Title must start with the text; numeric ids tolerate zero padding
    Prefix,
}

/// One component of a heading path
///
/// Segments are plain values: they are rebuilt on every tokenization and
/// never mutated in place. Use [`Segment::into_exact`] to derive an exact
/// copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    mode: MatchMode,
    text: String,
}

impl Segment {
    /// Create segment with explicit mode
    #[inline]
    #[must_use]
    pub fn new(mode: MatchMode, text: impl Into<String>) -> Self {
        Self {
            mode,
            text: text.into(),
        }
    }

    /// Exact-match segment
    #[inline]
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::new(MatchMode::Exact, text)
    }

    /// Prefix-match segment
    #[inline]
    #[must_use]
    pub fn prefix(text: impl Into<String>) -> Self {
        Self::new(MatchMode::Prefix, text)
    }

    /// Match mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Literal heading text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if segment matches exactly
    #[inline]
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.mode == MatchMode::Exact
    }

    /// Same text, exact mode
    #[inline]
    #[must_use]
    pub fn into_exact(self) -> Self {
        Self {
            mode: MatchMode::Exact,
            text: self.text,
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Resource category selected by the trailing `#fragment` of an address
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceSelector {
    /// `#meta` / `#frontmatter`: the leading metadata block
    Metadata,
    /// `#item` / `#head`: headings (the default)
    #[default]
    Item,
    /// `#test` / `#case`: test case headings
    Test,
    /// `#related`: links recorded in the metadata block
    Related,
    /// `#link`: links in the body
    Link,
    /// No address at all, or `#file`: the whole document
    File,
    /// Unrecognized fragment, kept verbatim (including the `#`)
    Other(String),
}

impl ResourceSelector {
    /// Map a `#fragment` token to its selector
    ///
    /// Unknown fragments are not an error; they are carried as
    /// [`ResourceSelector::Other`].
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment {
            "#meta" | "#frontmatter" => Self::Metadata,
            "#item" | "#head" => Self::Item,
            "#test" | "#case" => Self::Test,
            "#related" => Self::Related,
            "#link" => Self::Link,
            "#file" => Self::File,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical fragment text
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::Metadata => "#meta",
            Self::Item => "#item",
            Self::Test => "#test",
            Self::Related => "#related",
            Self::Link => "#link",
            Self::File => "#file",
            Self::Other(raw) => raw,
        }
    }

    /// Selectors answered from the metadata block instead of the heading tree
    ///
    /// These ignore any path written before them.
    #[inline]
    #[must_use]
    pub fn reads_metadata(&self) -> bool {
        matches!(self, Self::Metadata | Self::Related)
    }
}

impl Display for ResourceSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_constructors() {
        assert!(Segment::exact("A").is_exact());
        assert!(!Segment::prefix("A").is_exact());
        assert_eq!(Segment::prefix("TC-1").text(), "TC-1");
    }

    #[test]
    fn segment_into_exact_keeps_text() {
        let seg = Segment::prefix("Intro").into_exact();
        assert_eq!(seg, Segment::exact("Intro"));
    }

    #[test]
    fn selector_synonyms() {
        assert_eq!(ResourceSelector::from_fragment("#meta"), ResourceSelector::Metadata);
        assert_eq!(
            ResourceSelector::from_fragment("#frontmatter"),
            ResourceSelector::Metadata
        );
        assert_eq!(ResourceSelector::from_fragment("#head"), ResourceSelector::Item);
        assert_eq!(ResourceSelector::from_fragment("#case"), ResourceSelector::Test);
        assert_eq!(ResourceSelector::from_fragment("#link"), ResourceSelector::Link);
    }

    #[test]
    fn selector_unknown_is_verbatim() {
        let sel = ResourceSelector::from_fragment("#todo");
        assert_eq!(sel, ResourceSelector::Other("#todo".to_string()));
        assert_eq!(sel.to_string(), "#todo");
    }

    #[test]
    fn selector_reads_metadata() {
        assert!(ResourceSelector::Metadata.reads_metadata());
        assert!(ResourceSelector::Related.reads_metadata());
        assert!(!ResourceSelector::Link.reads_metadata());
        assert!(!ResourceSelector::Item.reads_metadata());
    }

    #[test]
    fn selector_default_is_item() {
        assert_eq!(ResourceSelector::default(), ResourceSelector::Item);
    }
}
