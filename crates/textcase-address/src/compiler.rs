//! Address → structural pattern compilation
//!
//! Turns a heading path into a nested tree-sitter query over the Markdown
//! block grammar. The innermost clause matches the target section and
//! captures its title and content; every ancestor wraps the previous clause
//! as a direct child section. Sections opened by ATX (`# Title`) and setext
//! (`Title` over `===`) headings are both matched.
//!
//! Title predicates are `#match?` regexes with the `(?i)` flag. Literal text
//! is first escaped for the regex engine and then for the query string
//! literal, so no heading text can break out of either layer. Exact regexes
//! tolerate an ATX closing sequence (`# Title ##`), which the grammar keeps
//! inside the title node.

use crate::address::Address;
use crate::segment::{MatchMode, Segment};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};

/// Capture name of the target section's title
pub const TITLE_CAPTURE: &str = "title";

/// Capture name of the target section's content nodes
pub const CONTENT_CAPTURE: &str = "target_content";

/// Capture name of the leading metadata block
pub const FRONTMATTER_CAPTURE: &str = "frontmatter";

/// Fixed pattern matching the document's leading metadata block
pub const METADATA_QUERY: &str = "(document (minus_metadata) @frontmatter)";

/// Optional ATX closing sequence and trailing whitespace at the end of a title
const TITLE_END: &str = r"(\s+#+)?\s*$";

/// Identifier with trailing digits, e.g. `TC-4`, `REQ001`, `step_12`
static ID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_]*?[-_]?)([0-9]+)$").unwrap_or_else(|e| {
        unreachable!("identifier pattern is a valid regex: {e}")
    })
});

/// Title capture name for the ancestor at `depth` (0 = outermost)
#[inline]
#[must_use]
pub fn ancestor_capture(depth: usize) -> String {
    format!("{TITLE_CAPTURE}_{depth}")
}

/// Compiled structural pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledQuery {
    pattern: String,
    title_captures: Vec<String>,
}

impl CompiledQuery {
    /// Query source text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Title capture names, outermost ancestor first, target last
    #[inline]
    #[must_use]
    pub fn title_captures(&self) -> &[String] {
        &self.title_captures
    }

    /// Consume into the query source text
    #[inline]
    #[must_use]
    pub fn into_pattern(self) -> String {
        self.pattern
    }

    /// Metadata block pattern
    #[must_use]
    pub fn metadata() -> Self {
        Self {
            pattern: METADATA_QUERY.to_string(),
            title_captures: Vec::new(),
        }
    }
}

impl Display for CompiledQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Compiles addresses into tree-sitter query patterns
///
/// Stateless; kept as a type so callers can hold and pass it like the other
/// pipeline stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler;

impl QueryCompiler {
    /// Create compiler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compile a full address
    ///
    /// Metadata selectors compile to [`METADATA_QUERY`] regardless of path.
    /// Returns `None` for selector-only addresses, which have no pattern.
    #[must_use]
    pub fn compile(&self, address: &Address) -> Option<CompiledQuery> {
        if address.selector().reads_metadata() {
            tracing::debug!(%address, "compiled metadata query");
            return Some(CompiledQuery::metadata());
        }
        let compiled = self.compile_path(address.segments())?;
        tracing::debug!(%address, pattern = %compiled, "compiled path query");
        Some(compiled)
    }

    /// Compile a heading path (selector excluded)
    ///
    /// Returns `None` if `segments` is empty.
    #[must_use]
    pub fn compile_path(&self, segments: &[Segment]) -> Option<CompiledQuery> {
        let (target, ancestors) = segments.split_last()?;

        let mut pattern = format!(
            "(section\n{}\n  (_)* @{CONTENT_CAPTURE}\n{})",
            heading_clause(TITLE_CAPTURE),
            title_predicate(TITLE_CAPTURE, &target_regex(target))
        );

        for (depth, ancestor) in ancestors.iter().enumerate().rev() {
            let capture = ancestor_capture(depth);
            pattern = format!(
                "(section\n{}\n{}\n{})",
                heading_clause(&capture),
                indent(&pattern),
                title_predicate(&capture, &ancestor_regex(ancestor))
            );
        }

        let title_captures = (0..ancestors.len())
            .map(ancestor_capture)
            .chain(std::iter::once(TITLE_CAPTURE.to_string()))
            .collect();

        Some(CompiledQuery {
            pattern,
            title_captures,
        })
    }
}

/// Section heading of either form, title captured as `capture`
///
/// The ATX title is the `inline` node; the setext title is the paragraph
/// above the underline. Both sit two levels below the section.
fn heading_clause(capture: &str) -> String {
    format!(
        "  [\n    (atx_heading\n      (inline) @{capture})\n    (setext_heading\n      (paragraph) @{capture})\n  ]"
    )
}

fn title_predicate(capture: &str, regex: &str) -> String {
    format!("  (#match? @{capture} \"{}\")", query_literal(regex))
}

/// Title regex for the match target
fn target_regex(segment: &Segment) -> String {
    let text = segment.text();
    match segment.mode() {
        MatchMode::Exact => format!("(?i)^{}{TITLE_END}", regex::escape(text)),
        MatchMode::Prefix => match ID_SHAPE.captures(text) {
            Some(caps) => {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let digits = caps.get(2).map_or("", |m| m.as_str());
                let value = match digits.trim_start_matches('0') {
                    "" => "0",
                    trimmed => trimmed,
                };
                format!(
                    r"(?i)(^|[\[`\s]){}0*{}($|[\]`:\s]).*",
                    regex::escape(prefix),
                    value
                )
            }
            None => format!(r"(?i)^\s*{}.*", regex::escape(text)),
        },
    }
}

/// Title regex for an enclosing section
fn ancestor_regex(segment: &Segment) -> String {
    let text = regex::escape(segment.text());
    match segment.mode() {
        MatchMode::Exact => format!("(?i)^{text}{TITLE_END}"),
        MatchMode::Prefix => format!("(?i).*{text}.*"),
    }
}

/// Escape for a double-quoted query string literal
fn query_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(r"\n"),
            other => out.push(other),
        }
    }
    out
}

fn indent(pattern: &str) -> String {
    pattern
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn regex_of(segment: &Segment) -> Regex {
        Regex::new(&target_regex(segment)).unwrap()
    }

    #[test]
    fn empty_path_has_no_pattern() {
        assert!(QueryCompiler::new().compile_path(&[]).is_none());
        assert!(QueryCompiler::new().compile(&Address::parse("#item")).is_none());
    }

    #[test]
    fn metadata_selectors_bypass_path() {
        let compiler = QueryCompiler::new();
        for raw in ["#meta", "#frontmatter", "A/B/#related"] {
            let compiled = compiler.compile(&Address::parse(raw)).unwrap();
            assert_eq!(compiled.as_str(), METADATA_QUERY);
        }
    }

    #[test]
    fn single_exact_segment_wire_format() {
        let compiled = QueryCompiler::new()
            .compile(&Address::parse("Intro/"))
            .unwrap();
        assert_eq!(
            compiled.as_str(),
            "(section\n  [\n    (atx_heading\n      (inline) @title)\n    (setext_heading\n      (paragraph) @title)\n  ]\n  (_)* @target_content\n  (#match? @title \"(?i)^Intro(\\\\s+#+)?\\\\s*$\"))"
        );
        assert_eq!(compiled.title_captures(), &["title".to_string()]);
    }

    #[test]
    fn ancestors_wrap_with_distinct_captures() {
        let compiled = QueryCompiler::new()
            .compile(&Address::parse("A/B/C"))
            .unwrap();
        let expected = [
            "(section",
            "  [",
            "    (atx_heading",
            "      (inline) @title_0)",
            "    (setext_heading",
            "      (paragraph) @title_0)",
            "  ]",
            "  (section",
            "    [",
            "      (atx_heading",
            "        (inline) @title_1)",
            "      (setext_heading",
            "        (paragraph) @title_1)",
            "    ]",
            "    (section",
            "      [",
            "        (atx_heading",
            "          (inline) @title)",
            "        (setext_heading",
            "          (paragraph) @title)",
            "      ]",
            "      (_)* @target_content",
            r#"      (#match? @title "(?i)^\\s*C.*"))"#,
            r#"    (#match? @title_1 "(?i)^B(\\s+#+)?\\s*$"))"#,
            r#"  (#match? @title_0 "(?i)^A(\\s+#+)?\\s*$"))"#,
        ]
        .join("\n");
        assert_eq!(compiled.as_str(), expected);
        assert_eq!(compiled.title_captures(), &["title_0", "title_1", "title"]);
    }

    #[test]
    fn ancestor_prefix_is_substring() {
        let re = Regex::new(&ancestor_regex(&Segment::prefix("guide"))).unwrap();
        assert!(re.is_match("My Guide Notes"));
        let re = Regex::new(&ancestor_regex(&Segment::exact("guide"))).unwrap();
        assert!(re.is_match("GUIDE"));
        assert!(!re.is_match("Guide Notes"));
    }

    #[test]
    fn numeric_id_tolerates_zero_padding() {
        let re = regex_of(&Segment::prefix("TC-1"));
        assert!(re.is_match("TC-01: 测试用例1"));
        assert!(re.is_match("tc-001 lower case"));
        assert!(re.is_match("TC-1"));
    }

    #[test]
    fn numeric_id_respects_boundary() {
        let re = regex_of(&Segment::prefix("TC-4"));
        assert!(re.is_match("TC-4"));
        assert!(re.is_match("TC-4 something"));
        assert!(!re.is_match("TC-41"));
        assert!(!re.is_match("TC-41: other"));
    }

    #[test]
    fn numeric_id_bracket_and_backtick_boundaries() {
        let re = regex_of(&Segment::prefix("REQ001"));
        assert!(re.is_match("[REQ1] login"));
        assert!(re.is_match("`REQ001` login"));
        assert!(re.is_match("Done: REQ01: login"));
        assert!(!re.is_match("XREQ1"));
    }

    #[test]
    fn numeric_id_all_zero_value() {
        let re = regex_of(&Segment::prefix("TC-000"));
        assert!(re.is_match("TC-0 zero"));
        assert!(!re.is_match("TC-01"));
    }

    #[test]
    fn plain_prefix_anchors_at_start() {
        let re = regex_of(&Segment::prefix("Install"));
        assert!(re.is_match("  installation guide"));
        assert!(!re.is_match("Before Install"));
    }

    #[test]
    fn exact_is_whole_title() {
        let re = regex_of(&Segment::exact("TC-1"));
        assert!(re.is_match("tc-1"));
        assert!(!re.is_match("TC-01"));
        assert!(!re.is_match("TC-1 extra"));
    }

    #[test]
    fn exact_allows_atx_closing_sequence() {
        let re = regex_of(&Segment::exact("A"));
        assert!(re.is_match("A #"));
        assert!(re.is_match("a ##  "));
        assert!(re.is_match("A\n"));
        assert!(!re.is_match("A#"));
        assert!(!re.is_match("A # B"));

        let re = Regex::new(&ancestor_regex(&Segment::exact("Guide"))).unwrap();
        assert!(re.is_match("Guide ###"));
        assert!(!re.is_match("Guide #x"));
    }

    #[test]
    fn literal_text_is_escaped() {
        let re = regex_of(&Segment::exact("a.b (c)"));
        assert!(re.is_match("A.B (C)"));
        assert!(!re.is_match("axb (c)"));
    }

    #[test]
    fn query_literal_escapes_quotes_and_backslashes() {
        assert_eq!(query_literal(r#"say "hi"\n"#), r#"say \"hi\"\\n"#);
        assert_eq!(query_literal("a\nb"), r"a\nb");
    }
}
