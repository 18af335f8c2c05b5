//! Textcase Resolution
//!
//! Resolves heading addresses against parsed Markdown documents and
//! synthesizes missing heading structure.
//!
//! # Core Concepts
//!
//! - [`Resolver`]: Address → list of [`SemanticNode`]
//! - [`SemanticNode`]: Typed result node with span, metadata and children
//! - [`NodeBuilder`]: Strategy deciding what each node type carries
//! - [`StructureSynthesizer`]: Idempotent insertion of missing headings
//! - [`EngineConfig`]: Explicit configuration passed to both
//!
//! # Example
//!
//! ```rust
//! use textcase_document::MarkdownParser;
//! use textcase_resolve::{EngineConfig, Resolver, StructureSynthesizer};
//!
//! let doc = MarkdownParser::new().parse("# A\n").unwrap();
//! let config = EngineConfig::new();
//!
//! assert!(Resolver::new(&config).resolve("A/B", &doc).unwrap().is_empty());
//!
//! let edited = StructureSynthesizer::new(&config)
//!     .ensure_head(&["A", "B"], &doc)
//!     .unwrap();
//! assert_eq!(edited.as_deref(), Some(&b"# A\n\n## B\n\n"[..]));
//! ```

mod builder;
mod config;
mod error;
pub mod frontmatter;
mod node;
mod resolver;
mod synth;

pub use builder::{DefaultNodeBuilder, MarkdownNodeBuilder, NodeBuilder};
pub use config::{EngineConfig, ResolverConfig, SynthesisConfig, DEFAULT_METADATA_TEMPLATE};
pub use error::{FrontmatterError, ResolveError, ResolveResult, SynthesisError, SynthesisResult};
pub use node::{
    NodeType, SemanticNode, Span, END_OFFSET, NODE_NAME, ORIGINAL_NODE_TYPE, START_OFFSET,
};
pub use resolver::{Resolver, ANCESTORS, FRONTMATTER_NAME};
pub use synth::{Insertion, StructureSynthesizer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
