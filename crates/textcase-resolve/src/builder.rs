//! Node builder strategies
//!
//! The resolver decides *which* semantic type a raw node gets; a
//! [`NodeBuilder`] decides *what* a node of that type carries. Swapping the
//! builder changes enrichment without touching resolution.

use crate::node::{NodeType, SemanticNode, NODE_NAME};
use serde_json::Value;
use std::fmt::Debug;
use textcase_document::RawNode;

/// Longest list item text used verbatim as a node name
const ITEM_NAME_CHARS: usize = 30;

/// Builds semantic nodes from raw parse tree nodes
pub trait NodeBuilder: Debug + Send + Sync {
    /// Build a node of `node_type` covering `raw`
    fn build<'doc>(&self, node_type: NodeType, raw: RawNode<'doc>) -> SemanticNode<'doc>;

    /// Build a node and append it to `parent`
    fn build_child<'doc>(
        &self,
        parent: &mut SemanticNode<'doc>,
        node_type: NodeType,
        raw: RawNode<'doc>,
    ) {
        parent.add_child(self.build(node_type, raw));
    }
}

/// Records only the grammar kind
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeBuilder;

impl NodeBuilder for DefaultNodeBuilder {
    fn build<'doc>(&self, node_type: NodeType, raw: RawNode<'doc>) -> SemanticNode<'doc> {
        SemanticNode::from_raw(node_type, raw)
    }
}

/// Adds Markdown-specific metadata for headings, sections, list items and
/// code blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownNodeBuilder;

impl NodeBuilder for MarkdownNodeBuilder {
    fn build<'doc>(&self, node_type: NodeType, raw: RawNode<'doc>) -> SemanticNode<'doc> {
        let mut node = SemanticNode::from_raw(node_type, raw);
        match node_type {
            NodeType::Heading => heading(&mut node, raw),
            NodeType::Section => section(&mut node, raw),
            NodeType::ListItem => list_item(&mut node, raw),
            NodeType::CodeBlock => code_block(&mut node, raw),
            _ => {}
        }
        node
    }
}

fn heading(node: &mut SemanticNode<'_>, raw: RawNode<'_>) {
    let title = raw.heading_title().unwrap_or_default();
    node.set_metadata("heading_level", raw.heading_level().unwrap_or(0));
    node.set_metadata("title_text", title.clone());
    node.set_metadata(NODE_NAME, title);
}

fn section(node: &mut SemanticNode<'_>, raw: RawNode<'_>) {
    // headless leading sections carry no title
    let Some(title) = raw.heading_title() else {
        return;
    };
    node.set_metadata("section_title", title.clone());
    node.set_metadata("heading_level", raw.heading_level().unwrap_or(0));
    node.set_metadata(NODE_NAME, title);
}

fn list_item(node: &mut SemanticNode<'_>, raw: RawNode<'_>) {
    let mut task = None;
    let mut text = String::new();
    for child in raw.children() {
        match child.kind() {
            "task_list_marker_checked" => task = Some(true),
            "task_list_marker_unchecked" => task = Some(false),
            "paragraph" => text = child.utf8_text().trim().to_string(),
            _ => {}
        }
    }

    let name = if text.chars().count() > ITEM_NAME_CHARS {
        let head: String = text.chars().take(ITEM_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        text.clone()
    };

    node.set_metadata("is_task_item", task.is_some());
    node.set_metadata("task_completed", task.map_or(Value::Null, Value::Bool));
    node.set_metadata("item_text", text);
    node.set_metadata(NODE_NAME, name);
}

fn code_block(node: &mut SemanticNode<'_>, raw: RawNode<'_>) {
    let mut language = None;
    let mut content = String::new();
    for child in raw.children() {
        match child.kind() {
            "info_string" => {
                let info = child.utf8_text().trim().to_string();
                language = Some(info).filter(|l| !l.is_empty());
            }
            "code_fence_content" => content = child.utf8_text().into_owned(),
            _ => {}
        }
    }

    let name = match &language {
        Some(lang) => format!("Code Block ({lang})"),
        None => "Code Block".to_string(),
    };
    node.set_metadata("language", language.map_or(Value::Null, Value::String));
    node.set_metadata("code_content", content);
    node.set_metadata(NODE_NAME, name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ORIGINAL_NODE_TYPE;
    use textcase_document::Document;
    use textcase_test_utils::{parse, BLOCKS_DOC};

    fn meta(node: &SemanticNode<'_>, key: &str) -> Value {
        node.get_metadata(key).cloned().unwrap_or(Value::Null)
    }

    fn find<'doc>(doc: &'doc Document, kind: &str) -> Vec<RawNode<'doc>> {
        fn walk<'doc>(node: RawNode<'doc>, kind: &str, out: &mut Vec<RawNode<'doc>>) {
            if node.kind() == kind {
                out.push(node);
            }
            for child in node.named_children() {
                walk(child, kind, out);
            }
        }
        let mut out = Vec::new();
        walk(doc.root(), kind, &mut out);
        out
    }

    #[test]
    fn default_builder_records_kind_only() {
        let doc = parse(BLOCKS_DOC);
        let raw = find(&doc, "atx_heading")[0];
        let node = DefaultNodeBuilder.build(NodeType::Heading, raw);
        assert_eq!(node.metadata().len(), 1);
        assert_eq!(meta(&node, ORIGINAL_NODE_TYPE), "atx_heading");
    }

    #[test]
    fn heading_enrichment() {
        let doc = parse(BLOCKS_DOC);
        let raw = find(&doc, "atx_heading")[0];
        let node = MarkdownNodeBuilder.build(NodeType::Heading, raw);
        assert_eq!(meta(&node, "heading_level"), 1);
        assert_eq!(meta(&node, "title_text"), "Tasks");
        assert_eq!(node.name(), Some("Tasks"));
    }

    #[test]
    fn section_enrichment() {
        let doc = parse(BLOCKS_DOC);
        let raw = find(&doc, "section")[0];
        let node = MarkdownNodeBuilder.build(NodeType::Section, raw);
        assert_eq!(meta(&node, "section_title"), "Tasks");
        assert_eq!(meta(&node, "heading_level"), 1);
    }

    #[test]
    fn task_list_items() {
        let doc = parse(BLOCKS_DOC);
        let items: Vec<_> = find(&doc, "list_item")
            .into_iter()
            .map(|raw| MarkdownNodeBuilder.build(NodeType::ListItem, raw))
            .collect();
        assert_eq!(items.len(), 3);

        assert_eq!(meta(&items[0], "is_task_item"), true);
        assert_eq!(meta(&items[0], "task_completed"), true);
        assert!(items[0].name().unwrap().contains("write the parser"));

        assert_eq!(meta(&items[1], "task_completed"), false);
        let name = items[1].name().unwrap();
        assert!(name.ends_with("..."));
        assert_eq!(name.chars().count(), ITEM_NAME_CHARS + 3);

        assert_eq!(meta(&items[2], "is_task_item"), false);
        assert!(meta(&items[2], "task_completed").is_null());
        assert_eq!(items[2].name(), Some("plain item"));
    }

    #[test]
    fn code_block_enrichment() {
        let doc = parse(BLOCKS_DOC);
        let raw = find(&doc, "fenced_code_block")[0];
        let node = MarkdownNodeBuilder.build(NodeType::CodeBlock, raw);
        assert_eq!(meta(&node, "language"), "rust");
        let content = meta(&node, "code_content");
        assert_eq!(content.as_str().map(str::trim_end), Some("fn main() {}"));
        assert_eq!(node.name(), Some("Code Block (rust)"));
    }

    #[test]
    fn build_child_appends() {
        let doc = parse(BLOCKS_DOC);
        let section = find(&doc, "section")[0];
        let heading = find(&doc, "atx_heading")[0];
        let mut parent = MarkdownNodeBuilder.build(NodeType::Section, section);
        MarkdownNodeBuilder.build_child(&mut parent, NodeType::Heading, heading);
        assert_eq!(parent.children().len(), 1);
        assert_eq!(parent.children()[0].name(), Some("Tasks"));
    }
}
