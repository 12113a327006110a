//! Decoded version 3 source maps.

use crate::error::SourceMapError;
use crate::inline::{decode_inline_payload, find_inline_payload};
use crate::vlq::decode_mappings;
use serde::Deserialize;
use std::collections::HashMap;

/// A single decoded segment of the `mappings` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// 1-indexed generated line.
    pub generated_line: u32,
    /// 0-indexed generated column.
    pub generated_column: u32,
    /// Where the segment points in the original sources, if anywhere.
    pub original: Option<OriginalLocation>,
}

/// The original position a mapping points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalLocation {
    /// Index into the map's `sources`.
    pub source: u32,
    /// 1-indexed original line.
    pub line: u32,
    /// 0-indexed original column.
    pub column: u32,
    /// Index into the map's `names`.
    pub name: Option<u32>,
}

/// The on-disk shape of a source map document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    version: u32,
    #[serde(default)]
    source_root: Option<String>,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    mappings: String,
}

/// A decoded source map.
///
/// Mappings are kept in stream order, which for a well-formed map is
/// ascending generated line.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: Vec<String>,
    source_root: Option<String>,
    sources_content: Vec<Option<String>>,
    mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Parses a source map JSON document.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let mappings = decode_mappings(&raw.mappings, raw.sources.len())?;

        Ok(Self {
            sources: raw.sources,
            source_root: raw.source_root.filter(|root| !root.is_empty()),
            sources_content: raw.sources_content.unwrap_or_default(),
            mappings,
        })
    }

    /// Decodes the inline source map annotated at the end of `text`.
    ///
    /// Returns `Ok(None)` if the text carries no inline map.
    pub fn from_inline(text: &str) -> Result<Option<Self>, SourceMapError> {
        let Some(payload) = find_inline_payload(text) else {
            return Ok(None);
        };
        let json = decode_inline_payload(payload)?;
        Self::from_json(&json).map(Some)
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the map has no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns the raw `sources` entries.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the display name of a source, with `sourceRoot` applied.
    pub fn source_name(&self, index: u32) -> Option<String> {
        let source = self.sources.get(index as usize)?;
        Some(match &self.source_root {
            Some(root) if !source.contains("://") && !source.starts_with('/') => {
                format!("{}/{}", root.trim_end_matches('/'), source)
            }
            _ => source.clone(),
        })
    }

    /// Returns the embedded original text of a source, if the map carries it.
    pub fn source_content(&self, index: u32) -> Option<&str> {
        self.sources_content
            .get(index as usize)
            .and_then(|content| content.as_deref())
    }

    /// Returns the first mapping of every generated line.
    ///
    /// Later segments on an already-seen line are ignored, so the earliest
    /// segment in stream order always wins.
    pub fn first_mapping_per_line(&self) -> HashMap<u32, &Mapping> {
        let mut first = HashMap::new();
        for mapping in &self.mappings {
            first.entry(mapping.generated_line).or_insert(mapping);
        }
        first
    }
}
