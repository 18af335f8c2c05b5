//! Engine configuration
//!
//! Constructed explicitly and handed to [`Resolver::new`](crate::Resolver::new)
//! and [`StructureSynthesizer::new`](crate::StructureSynthesizer::new). Every
//! field has a default, so a partial TOML file is enough.

use serde::{Deserialize, Serialize};
use textcase_document::DEFAULT_QUERY_CACHE_CAPACITY;

/// Empty metadata block spliced by `ensure_metadata`
pub const DEFAULT_METADATA_TEMPLATE: &str = "---\n\n---\n";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resolution settings
    pub resolver: ResolverConfig,
    /// Synthesis settings
    pub synthesis: SynthesisConfig,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With compiled-query cache capacity
    #[inline]
    #[must_use]
    pub fn with_query_cache_capacity(mut self, capacity: u64) -> Self {
        self.resolver.query_cache_capacity = capacity;
        self
    }

    /// With metadata block template
    #[inline]
    #[must_use]
    pub fn with_metadata_template(mut self, template: impl Into<String>) -> Self {
        self.synthesis.metadata_template = template.into();
        self
    }
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum number of compiled queries kept
    pub query_cache_capacity: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_cache_capacity: DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}

/// Synthesis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Block inserted at the top of documents without metadata
    pub metadata_template: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            metadata_template: DEFAULT_METADATA_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.resolver.query_cache_capacity, 256);
        assert_eq!(config.synthesis.metadata_template, "---\n\n---\n");
    }

    #[test]
    fn builders_override() {
        let config = EngineConfig::new()
            .with_query_cache_capacity(8)
            .with_metadata_template("---\nid: new\n---\n");
        assert_eq!(config.resolver.query_cache_capacity, 8);
        assert!(config.synthesis.metadata_template.contains("id: new"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str("[resolver]\nquery_cache_capacity = 16\n").unwrap();
        assert_eq!(config.resolver.query_cache_capacity, 16);
        assert_eq!(config.synthesis, SynthesisConfig::default());

        let empty: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }
}
