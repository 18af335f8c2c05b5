//! Metadata block values

use crate::error::FrontmatterError;
use crate::node::SemanticNode;
use serde_yaml::{Mapping, Value};
use textcase_document::Document;

/// Parse the YAML body of a `Metadata` node
///
/// An empty body yields an empty mapping.
///
/// # Errors
/// Returns [`FrontmatterError::Yaml`] if the body is not valid YAML.
pub fn parse(node: &SemanticNode<'_>, doc: &Document) -> Result<Value, FrontmatterError> {
    let body = node.text(doc);
    if body.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    Ok(serde_yaml::from_str(&body)?)
}

/// String entries of a list-valued key, e.g. `related: [a.md, b.md]`
#[must_use]
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use textcase_test_utils::{parse as parse_doc, FRONTMATTER_DOC};

    #[test]
    fn parses_body() {
        let doc = parse_doc(FRONTMATTER_DOC);
        let nodes = Resolver::default().resolve("#frontmatter", &doc).unwrap();
        let value = parse(&nodes[0], &doc).unwrap();
        assert_eq!(value.get("title").and_then(Value::as_str), Some("测试文档"));
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let doc = parse_doc("---\n\n---\n# A\n");
        let nodes = Resolver::default().resolve("#meta", &doc).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(parse(&nodes[0], &doc).unwrap(), Value::Mapping(Mapping::new()));
    }

    #[test]
    fn invalid_yaml_is_error() {
        let doc = parse_doc("---\nkey: [unclosed\n---\n");
        let nodes = Resolver::default().resolve("#meta", &doc).unwrap();
        assert!(parse(&nodes[0], &doc).is_err());
    }

    #[test]
    fn related_links() {
        let doc = parse_doc("---\nrelated:\n  - a.md\n  - b.md\n---\n");
        let nodes = Resolver::default().resolve("#related", &doc).unwrap();
        let value = parse(&nodes[0], &doc).unwrap();
        assert_eq!(string_list(&value, "related"), vec!["a.md", "b.md"]);
        assert!(string_list(&value, "missing").is_empty());
    }
}
