//! Category blocklist filter
//!
//! Applied to merged aggregation results: an item whose category label
//! contains a blocked substring is removed. The blocklist itself is opaque
//! configuration; this module only evaluates it.

use mcb_common::config::FilterConfig;
use mcb_common::ContentItem;

/// Category-label blocklist
#[derive(Debug, Clone)]
pub struct ContentFilter {
    enabled: bool,
    blocked: Vec<String>,
}

impl ContentFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            blocked: config.blocked_categories.clone(),
        }
    }

    /// A filter that passes everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            blocked: Vec::new(),
        }
    }

    /// Whether the item survives the blocklist
    pub fn allows(&self, item: &ContentItem) -> bool {
        if !self.enabled {
            return true;
        }
        !self
            .blocked
            .iter()
            .any(|word| item.category.contains(word.as_str()))
    }

    /// Remove blocked items, preserving order
    pub fn apply(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        if !self.enabled {
            return items;
        }
        items.into_iter().filter(|item| self.allows(item)).collect()
    }
}
