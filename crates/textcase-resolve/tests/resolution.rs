//! End-to-end resolution behavior

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use textcase_address::{Address, QueryCompiler};
use textcase_resolve::{NodeType, Resolver, SemanticNode};
use textcase_test_utils::{parse, FRONTMATTER_DOC, TEST_CASES_DOC};

fn titles(nodes: &[SemanticNode<'_>]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.name().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn zero_padded_case_id() {
    let doc = parse(TEST_CASES_DOC);
    let nodes = Resolver::default().resolve("TC-1", &doc).unwrap();
    assert_eq!(titles(&nodes), vec!["TC-01: 测试用例1"]);
    assert_eq!(nodes[0].node_type(), NodeType::Section);
}

#[test]
fn case_id_boundary() {
    let doc = parse(TEST_CASES_DOC);
    let resolver = Resolver::default();
    assert_eq!(titles(&resolver.resolve("TC-4", &doc).unwrap()), vec!["TC-4"]);
    assert_eq!(titles(&resolver.resolve("TC-41", &doc).unwrap()), vec!["TC-41"]);
}

#[test]
fn meta_and_frontmatter_agree() {
    let doc = parse(FRONTMATTER_DOC);
    let resolver = Resolver::default();
    let meta = resolver.resolve("#meta", &doc).unwrap();
    let front = resolver.resolve("#frontmatter", &doc).unwrap();

    assert_eq!(meta.len(), 1);
    assert_eq!(front.len(), 1);
    assert_eq!(meta[0].span(), front[0].span());
    assert_eq!(meta[0].metadata(), front[0].metadata());

    let text = meta[0].text(&doc);
    assert_eq!(text, front[0].text(&doc));
    assert!(text.contains("title: 测试文档"));
    assert!(!text.lines().any(|line| line.trim() == "---"));
}

#[test]
fn metadata_selector_ignores_path() {
    let doc = parse(FRONTMATTER_DOC);
    let resolver = Resolver::default();
    let with_path = resolver.resolve("标题1/子标题/#meta", &doc).unwrap();
    let bare = resolver.resolve("#meta", &doc).unwrap();
    assert_eq!(with_path.len(), 1);
    assert_eq!(with_path[0].span(), bare[0].span());
}

#[test]
fn non_ascii_path() {
    let doc = parse(FRONTMATTER_DOC);
    let nodes = Resolver::default().resolve("标题1/子标题", &doc).unwrap();
    assert_eq!(titles(&nodes), vec!["子标题"]);
    let list = nodes[0].find_children_by_type(NodeType::ListBlock);
    assert_eq!(list.len(), 1);
}

fn nested_doc(depth: usize) -> String {
    (1..=depth)
        .map(|level| format!("{} L{level}\n\nbody {level}\n\n", "#".repeat(level)))
        .collect()
}

#[test]
fn each_nesting_level_gets_its_own_capture() {
    for depth in 1..=6 {
        let source = nested_doc(depth);
        let doc = parse(&source);
        let path: Vec<String> = (1..=depth).map(|l| format!("L{l}")).collect();
        let address = Address::parse(&format!("{}/", path.join("/")));

        let compiled = QueryCompiler::new().compile(&address).unwrap();
        let query = doc.compile_query(compiled.as_str()).unwrap();
        let hits = doc.query_matches(&query);
        assert!(!hits.is_empty(), "depth {depth} found nothing");

        let names: HashSet<&str> = hits[0].captures.iter().map(|c| c.name.as_str()).collect();
        for capture in compiled.title_captures() {
            assert!(names.contains(capture.as_str()), "missing {capture}");
        }
        assert_eq!(compiled.title_captures().len(), depth);

        let nodes = Resolver::default().resolve_address(&address, &doc).unwrap();
        assert_eq!(titles(&nodes), vec![format!("L{depth}")]);
    }
}
