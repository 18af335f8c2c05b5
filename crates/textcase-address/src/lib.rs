//! Textcase Addresses
//!
//! Hierarchical heading addresses and their compilation into structural
//! tree-sitter queries.
//!
//! # Core Concepts
//!
//! - [`Address`]: Tokenized heading path plus resource selector
//! - [`Segment`]: One heading component with exact/prefix match mode
//! - [`ResourceSelector`]: Trailing `#fragment` (metadata, item, test, ...)
//! - [`QueryCompiler`]: Address → nested `section` query pattern
//!
//! # Example
//!
//! ```rust
//! use textcase_address::{Address, MatchMode, QueryCompiler};
//!
//! let address = Address::parse("Cases/TC-1");
//! assert_eq!(address.last().map(|s| s.mode()), Some(MatchMode::Prefix));
//!
//! let query = QueryCompiler::new().compile(&address).unwrap();
//! assert_eq!(query.title_captures(), &["title_0", "title"]);
//! ```

mod address;
mod compiler;
mod segment;

pub use address::Address;
pub use compiler::{
    ancestor_capture, CompiledQuery, QueryCompiler, CONTENT_CAPTURE, FRONTMATTER_CAPTURE,
    METADATA_QUERY, TITLE_CAPTURE,
};
pub use segment::{MatchMode, ResourceSelector, Segment};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
