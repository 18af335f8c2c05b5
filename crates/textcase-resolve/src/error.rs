//! Error types for resolution and synthesis
//!
//! "No match" is never an error: resolution returns an empty list. Only
//! addresses that cannot be turned into any query, and synthesis requests
//! with no unique anchor, fail.

use textcase_address::Address;
use textcase_document::DocumentError;

/// Errors during address resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Address cannot be compiled into any query
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// Address as written back by `Display`
        address: String,
        /// What made it unusable
        reason: String,
    },

    /// Query compilation or document failure
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

impl ResolveError {
    /// Create invalid address error
    pub fn invalid_address(address: &Address, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors during heading synthesis
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// An existing prefix of the path matches more than one section
    #[error("ambiguous insertion point: '{path}' matches {matches} sections")]
    AmbiguousInsertionPoint {
        /// Prefix that matched more than once
        path: String,
        /// Number of matching sections
        matches: usize,
    },

    /// Creating the path would need a heading deeper than level 6
    #[error("heading path '{path}' would need level {level}, deepest is 6")]
    TooDeep {
        /// Full path that was requested
        path: String,
        /// Level the deepest created heading would have
        level: usize,
    },

    /// Path resolution failed
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Document failure
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

/// Errors reading the metadata block
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Metadata body is not valid YAML
    #[error("invalid yaml in metadata block: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result alias for synthesis
pub type SynthesisResult<T> = Result<T, SynthesisError>;
