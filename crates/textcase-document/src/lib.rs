//! Textcase Documents
//!
//! Parsed Markdown documents backed by tree-sitter: structural queries,
//! pure byte splices and incremental re-parsing.
//!
//! # Core Concepts
//!
//! - [`MarkdownParser`]: Source text → [`Document`]
//! - [`Document`]: Owns the source bytes and syntax tree
//! - [`RawNode`]: Borrowed node view with heading helpers
//! - [`QueryCache`]: Reuse of compiled query patterns
//!
//! # Example
//!
//! ```rust
//! use textcase_document::MarkdownParser;
//!
//! let doc = MarkdownParser::new().parse("# Intro\n\nHello\n").unwrap();
//! let titles = doc.query("(atx_heading (inline) @title)").unwrap();
//! assert_eq!(titles[0].node.utf8_text(), "Intro");
//! ```

mod cache;
mod document;
mod error;
mod node;
mod parser;
mod point;

pub use cache::{compile_query, CacheStats, QueryCache, DEFAULT_QUERY_CACHE_CAPACITY};
pub use document::{Capture, Document, QueryHit};
pub use error::{DocumentError, DocumentResult};
pub use node::RawNode;
pub use parser::{markdown_language, MarkdownParser};
pub use point::Point;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
