//! Testing utilities for the Textcase workspace
//!
//! Shared fixture documents and parse helpers.

#![allow(missing_docs)]

use textcase_document::{Document, MarkdownParser};

/// Document with a YAML metadata block
pub const FRONTMATTER_DOC: &str = "---
title: 测试文档
description: 这是一个测试文档
---

# 标题1

这是一段内容。

## 子标题

- 列表项1
- 列表项2
";

/// Test-case headings with zero-padded and look-alike ids
pub const TEST_CASES_DOC: &str = "# Cases

## Login

### TC-01: 测试用例1

Steps for the first case.

### TC-4

Fourth case.

### TC-41

Forty-first case.

## Export

### [REQ-007] export csv

Body.
";

/// Three nested levels plus a sibling
pub const NESTED_DOC: &str = "# Guide

Intro text.

## Install

Run the installer.

### Linux

Use the package manager.

## Usage

Call it.
";

/// Two top-level sections with the same title
pub const DUPLICATE_DOC: &str = "# X

first

# X

second
";

/// Lists, task items and a fenced code block
pub const BLOCKS_DOC: &str = "# Tasks

- [x] write the parser
- [ ] write a much longer task description that needs truncation
- plain item

```rust
fn main() {}
```
";

/// Parse a fixture, panicking on failure
pub fn parse(content: &str) -> Document {
    MarkdownParser::new()
        .parse(content)
        .unwrap_or_else(|e| panic!("fixture failed to parse: {e}"))
}

/// Parse an owned buffer, as returned by synthesis
pub fn reparse(buffer: &[u8]) -> Document {
    MarkdownParser::new()
        .parse(buffer.to_vec())
        .unwrap_or_else(|e| panic!("buffer failed to parse: {e}"))
}

/// Buffer as a string (lossy), for readable assertions
pub fn as_text(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer).into_owned()
}
