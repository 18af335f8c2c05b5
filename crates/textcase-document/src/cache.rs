//! Compiled query cache using moka
//!
//! Compiling a tree-sitter query is far more expensive than running it, and
//! the same address is typically resolved many times. Compilation is
//! deterministic, so a cached query always behaves like a fresh one.

use crate::error::{DocumentError, DocumentResult};
use crate::parser::markdown_language;
use moka::sync::Cache;
use std::sync::Arc;
use tree_sitter::Query;

/// Default number of compiled patterns kept
pub const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 256;

/// Compile `pattern` against the Markdown grammar
///
/// # Errors
/// Returns [`DocumentError::Query`] carrying the pattern text.
pub fn compile_query(pattern: &str) -> DocumentResult<Query> {
    Query::new(&markdown_language(), pattern).map_err(|e| DocumentError::query(pattern, e))
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Pattern text → compiled query
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<String, Arc<Query>>,
}

impl QueryCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Cached query for `pattern`, compiling on first use
    ///
    /// Failed compilations are not cached.
    ///
    /// # Errors
    /// Returns [`DocumentError::Query`] if the pattern is malformed.
    pub fn get_or_compile(&self, pattern: &str) -> DocumentResult<Arc<Query>> {
        if let Some(cached) = self.inner.get(pattern) {
            tracing::trace!("query cache hit");
            return Ok(cached);
        }

        let query = Arc::new(compile_query(pattern)?);
        self.inner.insert(pattern.to_string(), Arc::clone(&query));
        Ok(query)
    }

    /// Check if a pattern is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.inner.contains_key(pattern)
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
