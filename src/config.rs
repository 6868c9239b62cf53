//! Runtime configuration for indexing and querying.
//!
//! Field weights are deliberately configuration rather than constants: the
//! title > tags > body hierarchy is a default, not a law of nature.

use crate::error::SearchError;
use crate::types::Field;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Per-field score multipliers.
///
/// A term match contributes `term_frequency * weight(field)` to a document's
/// score. The defaults make a single title match outrank any realistic number
/// of body mentions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldWeights {
    pub title: f64,
    pub tags: f64,
    pub body: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 5.0,
            tags: 3.0,
            body: 1.0,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Tags => self.tags,
            Field::Body => self.body,
        }
    }
}

/// Tunables for the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub weights: FieldWeights,
    /// Maximum age of a cached index before a read triggers a rebuild.
    pub staleness_secs: u64,
    /// Result count when the caller does not pass a limit.
    pub default_limit: usize,
    /// Hard cap on the result count, whatever the caller asks for.
    pub max_limit: usize,
    /// Queries longer than this are truncated, not rejected.
    pub max_query_tokens: usize,
    /// Total width of a highlight excerpt, in characters.
    pub highlight_window: usize,
    /// Suggestion count returned by prefix lookup.
    pub suggest_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            weights: FieldWeights::default(),
            staleness_secs: 300,
            default_limit: 10,
            max_limit: 50,
            max_query_tokens: 32,
            highlight_window: 80,
            suggest_limit: 8,
        }
    }
}

impl SearchConfig {
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }

    /// Load configuration from a JSON file. Every field is optional and falls
    /// back to its default.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let raw = fs::read_to_string(path).map_err(|e| SearchError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| SearchError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
