//! Error types for document parsing and querying

/// Errors raised by the document layer
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Grammar could not be loaded into the parser
    #[error("markdown grammar rejected by parser: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Parser produced no tree
    #[error("parser produced no syntax tree")]
    ParseFailed,

    /// Structural pattern failed to compile
    #[error("invalid query pattern: {source}\n{pattern}")]
    Query {
        /// Offending pattern text
        pattern: String,
        /// Compiler diagnostic
        #[source]
        source: tree_sitter::QueryError,
    },

    /// Byte range does not fit the buffer
    #[error("byte range {start}..{end} outside buffer of {len} bytes")]
    ByteRange {
        /// Requested start
        start: usize,
        /// Requested end
        end: usize,
        /// Buffer length
        len: usize,
    },
}

impl DocumentError {
    /// Create query error for pattern
    pub fn query(pattern: impl Into<String>, source: tree_sitter::QueryError) -> Self {
        Self::Query {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Result alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
