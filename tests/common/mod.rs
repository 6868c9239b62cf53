//! Shared test utilities and fixtures.

#![allow(dead_code)]

use parking_lot::RwLock;
use sitesearch::{ContentSource, SearchConfig, SearchDoc, SearchError, SearchService};
use std::sync::Arc;

// Re-export canonical test utilities from sitesearch::testing
pub use sitesearch::testing::make_doc;

/// A content source whose corpus can be swapped between rebuilds, for
/// exercising rebuild-consistency behavior.
#[derive(Clone, Default)]
pub struct SharedSource {
    docs: Arc<RwLock<Vec<SearchDoc>>>,
}

impl SharedSource {
    pub fn new(docs: Vec<SearchDoc>) -> Self {
        SharedSource {
            docs: Arc::new(RwLock::new(docs)),
        }
    }

    pub fn replace(&self, docs: Vec<SearchDoc>) {
        *self.docs.write() = docs;
    }

    pub fn push(&self, doc: SearchDoc) {
        self.docs.write().push(doc);
    }
}

impl ContentSource for SharedSource {
    fn load(&self) -> Result<Vec<SearchDoc>, SearchError> {
        Ok(self.docs.read().clone())
    }
}

/// The two-document corpus from the ranking scenario: "a" matches "rust" in
/// title and tags, "b" only in the body.
pub fn rust_corpus() -> Vec<SearchDoc> {
    vec![
        make_doc("a", "Rust Ownership", "explains borrowing", &["rust", "memory"]),
        make_doc("b", "Cooking Pasta", "boil rust colored tomatoes", &["food"]),
    ]
}

pub fn service_over(docs: Vec<SearchDoc>) -> SearchService {
    SearchService::new(
        sitesearch::StaticSource::new(docs),
        SearchConfig::default(),
    )
}
