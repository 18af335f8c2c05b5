//! Heading structure synthesis
//!
//! [`StructureSynthesizer::ensure_head`] makes sure a heading path exists,
//! creating only the missing tail. The result is a new buffer; the input
//! document is never touched.
//!
//! # Algorithm
//!
//! 1. Resolve the whole path with exact matching. Any match → nothing to do.
//! 2. Drop trailing components until a prefix matches exactly one section
//!    (the anchor). A prefix matching several sections is ambiguous and
//!    fails. An empty prefix anchors at end of document, level 1.
//! 3. Insert one heading per missing component at the anchor's end, one
//!    level deeper each time. A path that would need a level past 6 fails,
//!    since such a heading could never resolve afterwards.
//!
//! Inserted lines use the line ending found before the anchor.

use crate::config::EngineConfig;
use crate::error::{SynthesisError, SynthesisResult};
use crate::node::NodeType;
use crate::resolver::Resolver;
use textcase_address::Address;
use textcase_document::Document;

/// Deepest ATX heading level
const MAX_HEADING_LEVEL: u8 = 6;

/// Text to splice in at a byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    offset: usize,
    text: String,
}

impl Insertion {
    /// Create insertion
    #[inline]
    #[must_use]
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
        }
    }

    /// Byte offset in the original buffer
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Inserted text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// New buffer with the text spliced in
    #[must_use]
    pub fn apply(&self, doc: &Document) -> Vec<u8> {
        doc.replace_bytes(self.offset, self.offset, self.text.as_bytes())
    }
}

/// Where new headings attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    /// Number of path components that already exist
    depth: usize,
    /// Heading level of the deepest existing component (0 at document level)
    level: u8,
    /// Byte offset just past the anchor section
    offset: usize,
}

/// Creates missing heading structure and metadata blocks
#[derive(Debug, Clone)]
pub struct StructureSynthesizer {
    resolver: Resolver,
    metadata_template: String,
}

impl StructureSynthesizer {
    /// Create synthesizer from configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            resolver: Resolver::new(config),
            metadata_template: config.synthesis.metadata_template.clone(),
        }
    }

    /// With a preconfigured resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Ensure the heading path exists
    ///
    /// Returns `None` if nothing needs inserting, otherwise the edited buffer.
    ///
    /// # Errors
    /// Returns [`SynthesisError::AmbiguousInsertionPoint`] if an existing
    /// prefix of the path matches more than one section, and
    /// [`SynthesisError::TooDeep`] if a created heading would be deeper than
    /// level 6.
    pub fn ensure_head(
        &self,
        path: &[impl AsRef<str>],
        doc: &Document,
    ) -> SynthesisResult<Option<Vec<u8>>> {
        Ok(self.plan_head(path, doc)?.map(|insertion| insertion.apply(doc)))
    }

    /// Compute the insertion `ensure_head` would make
    ///
    /// # Errors
    /// See [`StructureSynthesizer::ensure_head`].
    pub fn plan_head(
        &self,
        path: &[impl AsRef<str>],
        doc: &Document,
    ) -> SynthesisResult<Option<Insertion>> {
        if path.is_empty() {
            return Ok(None);
        }

        let full = Address::exact_path(path);
        if !self.resolver.resolve_address(&full, doc)?.is_empty() {
            tracing::debug!(path = %full, "heading path already present");
            return Ok(None);
        }

        let anchor = self.find_anchor(path, doc)?;
        let level = usize::from(anchor.level) + (path.len() - anchor.depth);
        if level > usize::from(MAX_HEADING_LEVEL) {
            tracing::warn!(path = %full, level, "heading path too deep");
            return Err(SynthesisError::TooDeep {
                path: full.to_string(),
                level,
            });
        }

        let before = doc.get_bytes(None, Some(anchor.offset));
        let eol = line_ending(before, doc.source());
        let text = heading_lines(&path[anchor.depth..], anchor.level, eol);
        let separator = leading_separator(before, eol);

        tracing::debug!(
            path = %full,
            offset = anchor.offset,
            created = path.len() - anchor.depth,
            "planned heading insertion"
        );
        Ok(Some(Insertion::new(anchor.offset, format!("{separator}{text}"))))
    }

    fn find_anchor(&self, path: &[impl AsRef<str>], doc: &Document) -> SynthesisResult<Anchor> {
        for depth in (1..path.len()).rev() {
            let prefix = Address::exact_path(&path[..depth]);
            let matches = self.resolver.resolve_address(&prefix, doc)?;
            match matches.as_slice() {
                [] => continue,
                [section] => {
                    let raw = section
                        .raw_nodes()
                        .first()
                        .filter(|_| section.node_type() == NodeType::Section);
                    let level = raw.and_then(|r| r.heading_level()).unwrap_or(0);
                    let offset = raw.map_or_else(|| doc.len(), |r| r.end_byte());
                    return Ok(Anchor {
                        depth,
                        level,
                        offset,
                    });
                }
                many => {
                    tracing::warn!(path = %prefix, matches = many.len(), "ambiguous insertion point");
                    return Err(SynthesisError::AmbiguousInsertionPoint {
                        path: prefix.to_string(),
                        matches: many.len(),
                    });
                }
            }
        }

        Ok(Anchor {
            depth: 0,
            level: 0,
            offset: doc.len(),
        })
    }

    /// Ensure the document starts with a metadata block
    ///
    /// Returns `None` if one exists, otherwise the buffer with the configured
    /// template spliced in at byte 0.
    ///
    /// # Errors
    /// Returns [`SynthesisError::Resolve`] if the metadata query fails.
    pub fn ensure_metadata(&self, doc: &Document) -> SynthesisResult<Option<Vec<u8>>> {
        if self.has_metadata(doc)? {
            return Ok(None);
        }
        tracing::debug!("inserting metadata block");
        Ok(Some(Insertion::new(0, self.metadata_template.clone()).apply(doc)))
    }

    /// The grammar only closes a metadata block on a terminated line, so a
    /// document ending in `---` is checked again with a final newline.
    fn has_metadata(&self, doc: &Document) -> SynthesisResult<bool> {
        if !self.resolver.resolve("#meta", doc)?.is_empty() {
            return Ok(true);
        }
        if doc.is_empty() || doc.source().ends_with(b"\n") {
            return Ok(false);
        }
        let terminated = doc.edit(doc.len(), doc.len(), b"\n")?;
        Ok(!self.resolver.resolve("#meta", &terminated)?.is_empty())
    }
}

impl Default for StructureSynthesizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// One `#… text` line per component, each followed by a blank line
fn heading_lines(components: &[impl AsRef<str>], parent_level: u8, eol: &str) -> String {
    components
        .iter()
        .zip(1u8..)
        .map(|(component, step)| {
            let level = parent_level.saturating_add(step);
            format!("{} {}{eol}{eol}", "#".repeat(usize::from(level)), component.as_ref())
        })
        .collect()
}

/// Line ending of the last line before the anchor, else of the first line
fn line_ending(before: &[u8], source: &[u8]) -> &'static str {
    let crlf_at = |buf: &[u8], newline: usize| newline > 0 && buf[newline - 1] == b'\r';
    let crlf = match before.iter().rposition(|&b| b == b'\n') {
        Some(newline) => crlf_at(before, newline),
        None => source
            .iter()
            .position(|&b| b == b'\n')
            .is_some_and(|newline| crlf_at(source, newline)),
    };
    if crlf {
        "\r\n"
    } else {
        "\n"
    }
}

/// Line breaks needed so the insertion starts after exactly one blank line
fn leading_separator(before: &[u8], eol: &str) -> String {
    let blank = eol.repeat(2);
    if before.is_empty() || before.ends_with(blank.as_bytes()) {
        String::new()
    } else if before.ends_with(eol.as_bytes()) {
        eol.to_string()
    } else {
        blank
    }
}
