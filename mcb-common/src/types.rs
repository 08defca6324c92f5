//! Shared catalog item model

use serde::{Deserialize, Serialize};

/// One catalog entry as reported by a content provider.
///
/// Produced by a provider's response parser and never mutated afterwards;
/// ownership moves to whichever layer aggregates it. Fields a provider does
/// not report deserialize to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Provider-local identifier
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Category/type label as reported by the provider (e.g. "动作片")
    #[serde(default)]
    pub category: String,
    /// Poster image reference
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rating: String,
    /// Provider-specific remark (episode count, resolution note, ...)
    #[serde(default)]
    pub note: String,
    /// Key of the source this item came from
    #[serde(default)]
    pub source_key: String,
    /// Human-readable source name for diagnostics and display
    #[serde(default)]
    pub source_name: String,
}
