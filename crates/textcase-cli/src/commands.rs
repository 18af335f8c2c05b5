//! Subcommand bodies
//!
//! Each command returns what it would print so it can be tested without a
//! process boundary. File I/O happens here and nowhere in the engine.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use textcase_address::{Address, QueryCompiler};
use textcase_document::{Document, MarkdownParser};
use textcase_resolve::{EngineConfig, Resolver, StructureSynthesizer};

/// How `resolve` prints nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Output {
    /// One summary line per node
    #[default]
    Summary,
    /// Summary line followed by the node text
    Text,
    /// `to_json` array
    Json,
}

/// Load engine configuration, falling back to defaults
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    MarkdownParser::new()
        .parse(bytes)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Print the structural pattern an address compiles to
pub(crate) fn compile(raw: &str) -> String {
    let address = Address::parse(raw);
    match QueryCompiler::new().compile(&address) {
        Some(query) => query.into_pattern(),
        None => format!("selector-only address ({})", address.selector()),
    }
}

/// Resolve an address in a file
pub(crate) fn resolve(
    path: &Path,
    address: Option<&str>,
    output: Output,
    config: &EngineConfig,
) -> Result<String> {
    let doc = read_document(path)?;
    let address = address.unwrap_or("#file");
    let nodes = Resolver::new(config)
        .resolve(address, &doc)
        .with_context(|| format!("failed to resolve {address:?}"))?;
    tracing::info!(address, nodes = nodes.len(), "resolved");

    if output == Output::Json {
        let values: Vec<_> = nodes.iter().map(|n| n.to_json(&doc)).collect();
        return Ok(serde_json::to_string_pretty(&values)?);
    }

    let mut out = String::new();
    for node in &nodes {
        writeln!(out, "{node}")?;
        if output == Output::Text {
            writeln!(out, "{}", node.text(&doc))?;
        }
    }
    Ok(out)
}

/// Outcome of a synthesis command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Edit {
    /// Document already satisfied the request
    Unchanged,
    /// Edited buffer written back to the file
    Written,
    /// Edited buffer, to be printed
    Buffer(Vec<u8>),
}

fn finish(path: &Path, edited: Option<Vec<u8>>, write: bool) -> Result<Edit> {
    match edited {
        None => Ok(Edit::Unchanged),
        Some(buffer) if write => {
            fs::write(path, &buffer)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = buffer.len(), "updated");
            Ok(Edit::Written)
        }
        Some(buffer) => Ok(Edit::Buffer(buffer)),
    }
}

/// Make sure a heading path exists in a file
pub(crate) fn ensure_head(
    path: &Path,
    segments: &[String],
    write: bool,
    config: &EngineConfig,
) -> Result<Edit> {
    let doc = read_document(path)?;
    let edited = StructureSynthesizer::new(config)
        .ensure_head(segments, &doc)
        .with_context(|| format!("cannot create {}", segments.join("/")))?;
    finish(path, edited, write)
}

/// Make sure a file starts with a metadata block
pub(crate) fn ensure_meta(path: &Path, write: bool, config: &EngineConfig) -> Result<Edit> {
    let doc = read_document(path)?;
    let edited = StructureSynthesizer::new(config).ensure_metadata(&doc)?;
    finish(path, edited, write)
}
