//! Query and edit behavior against the shared fixtures

use pretty_assertions::assert_eq;
use textcase_document::{Point, QueryCache};
use textcase_test_utils::{parse, FRONTMATTER_DOC, NESTED_DOC, TEST_CASES_DOC};

#[test]
fn metadata_block_spans_delimiters() {
    let doc = parse(FRONTMATTER_DOC);
    let captures = doc.query("(document (minus_metadata) @frontmatter)").unwrap();
    assert_eq!(captures.len(), 1);

    let node = captures[0].node;
    assert_eq!(node.start_point(), Point::new(0, 0));
    assert!(node.utf8_text().starts_with("---\n"));
    assert!(node.utf8_text().contains("title: 测试文档"));
}

#[test]
fn section_titles_are_trimmed_inline_text() {
    let doc = parse(TEST_CASES_DOC);
    let titles: Vec<String> = doc
        .query("(atx_heading (inline) @t)")
        .unwrap()
        .into_iter()
        .map(|c| c.node.utf8_text().trim().to_string())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Cases",
            "Login",
            "TC-01: 测试用例1",
            "TC-4",
            "TC-41",
            "Export",
            "[REQ-007] export csv"
        ]
    );
}

#[test]
fn nested_sections_follow_heading_levels() {
    let doc = parse(NESTED_DOC);
    let captures = doc
        .query("(section (atx_heading (inline) @outer (#eq? @outer \"Install\")) (section (atx_heading (inline) @inner)))")
        .unwrap();
    let inner: Vec<String> = captures
        .iter()
        .filter(|c| c.name == "inner")
        .map(|c| c.node.utf8_text().into_owned())
        .collect();
    assert_eq!(inner, vec!["Linux"]);
}

#[test]
fn cached_query_runs_like_fresh_one() {
    let doc = parse(NESTED_DOC);
    let cache = QueryCache::new(4);
    let pattern = "(atx_heading (inline) @t)";
    let query = cache.get_or_compile(pattern).unwrap();
    let cached = doc.query_matches(&query).len();
    let fresh = doc.query(pattern).unwrap().len();
    assert_eq!(cached, fresh);
    assert_eq!(cached, 4);
}

#[test]
fn edit_then_query_sees_new_heading() {
    let doc = parse(NESTED_DOC);
    let edited = doc.edit(doc.len(), doc.len(), b"\n## FAQ\n").unwrap();
    let captures = edited
        .query("(atx_heading (inline) @t (#eq? @t \"FAQ\"))")
        .unwrap();
    assert_eq!(captures.len(), 1);
    assert_eq!(doc.query("(atx_heading (inline) @t (#eq? @t \"FAQ\"))").unwrap().len(), 0);
}
