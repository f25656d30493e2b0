//! Color palette configuration.
//!
//! Maps color tokens (palette identifiers or hex strings) to display names
//! and visual hex values. Like the brick catalog, the palette is immutable
//! configuration owned by an external collaborator.

use crate::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Display information for one palette color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    /// Human-readable color name (e.g. "Bright Red").
    pub name: String,

    /// Visual hex value for rendering (e.g. "#E30A0A").
    pub hex: String,
}

/// The configured color palette.
///
/// Tokens that look like hex colors are normalized to uppercase so that
/// "#ffffff" and "#FFFFFF" resolve to the same entry; other tokens are
/// matched verbatim.
#[derive(Clone, Debug, Default)]
pub struct ColorPalette {
    colors: FxHashMap<String, ColorEntry>,
}

impl ColorPalette {
    /// Create a palette from token -> entry pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, ColorEntry)>) -> Self {
        let colors = entries
            .into_iter()
            .map(|(token, entry)| (Self::normalize_token(&token), entry))
            .collect();
        Self { colors }
    }

    /// Load a palette from a JSON string (a map of token -> entry).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, ColorEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Load a palette from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Normalize a color token for lookup.
    pub fn normalize_token(token: &str) -> String {
        let token = token.trim();
        if token.starts_with('#') {
            token.to_ascii_uppercase()
        } else {
            token.to_string()
        }
    }

    /// Check whether a token is a recognized palette color.
    pub fn contains(&self, token: &str) -> bool {
        self.colors.contains_key(&Self::normalize_token(token))
    }

    /// Look up the display name for a token.
    pub fn name_of(&self, token: &str) -> Option<&str> {
        self.colors
            .get(&Self::normalize_token(token))
            .map(|e| e.name.as_str())
    }

    /// Display name for a token, falling back to the token itself when the
    /// palette has no entry for it.
    pub fn display_name(&self, token: &str) -> String {
        self.name_of(token)
            .map(str::to_string)
            .unwrap_or_else(|| Self::normalize_token(token))
    }

    /// Number of configured colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
