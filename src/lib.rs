//! In-memory full-text search for content sites.
//!
//! This crate indexes the content of a small site network (blog posts,
//! documentation pages, curated link collections) into an in-memory inverted
//! index and serves ranked, highlighted results over a JSON API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────┐    ┌─────────────┐    ┌────────────┐
//! │  content.rs  │───▶│ extract.rs  │───▶│  index.rs   │───▶│  query.rs  │
//! │ (loaders)    │    │ (SearchDoc) │    │ (build)     │    │ (score)    │
//! └──────────────┘    └─────────────┘    └─────────────┘    └────────────┘
//!         │                  │                  │                  │
//!         ▼                  ▼                  ▼                  ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            service.rs                               │
//! │   (SearchService: cached snapshot, staleness, single-flight)        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//!                     ┌──────────────────────────┐
//!                     │         http.rs          │
//!                     │   (/api/search routes)   │
//!                     └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sitesearch::{DirSource, QueryOptions, SearchConfig, SearchService};
//!
//! let service = SearchService::new(DirSource::new("content"), SearchConfig::default());
//! let results = service.search("rust ownership", &QueryOptions::default())?;
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod http;
pub mod index;
pub mod query;
pub mod service;
pub mod testing;
pub mod tokenize;
pub mod types;

// Re-exports for the public API
pub use config::{FieldWeights, SearchConfig};
pub use content::{ContentSource, DirSource, StaticSource};
pub use error::SearchError;
pub use http::{router, serve, CacheStrategy};
pub use index::build_index;
pub use query::{search_index, suggest_terms, QueryOptions};
pub use service::SearchService;
pub use tokenize::{normalize, tokenize};
pub use types::{
    Field, IndexSummary, InvertedIndex, Posting, PostingList, SearchDoc, SearchHit, SearchResponse,
};

#[cfg(test)]
mod tests {
    //! Property tests for the invariants the rest of the crate leans on:
    //! tokenizer stability and structurally deterministic index builds.

    use super::*;
    use proptest::prelude::*;
    use testing::make_doc;

    fn corpus_strategy() -> impl Strategy<Value = Vec<SearchDoc>> {
        let word = proptest::string::string_regex("[a-z0-9]{1,8}").unwrap();
        let text = prop::collection::vec(word, 0..8).prop_map(|words| words.join(" "));
        prop::collection::vec(text, 1..6).prop_map(|texts| {
            texts
                .into_iter()
                .enumerate()
                .map(|(i, body)| make_doc(&format!("doc-{}", i), &format!("Doc {}", i), &body, &[]))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn tokenize_is_stable(s in "\\PC{0,64}") {
            prop_assert_eq!(tokenize(&s), tokenize(&s));
        }

        #[test]
        fn tokens_are_never_empty(s in "\\PC{0,64}") {
            prop_assert!(tokenize(&s).iter().all(|t| !t.is_empty()));
        }

        #[test]
        fn build_is_deterministic(docs in corpus_strategy()) {
            let first = build_index(docs.clone());
            let second = build_index(docs);
            prop_assert_eq!(first.postings, second.postings);
            prop_assert_eq!(first.documents, second.documents);
        }

        #[test]
        fn every_posting_references_a_stored_document(docs in corpus_strategy()) {
            let built = build_index(docs);
            for list in built.postings.values() {
                for posting in &list.postings {
                    prop_assert!(built.documents.contains_key(&posting.doc_id));
                }
            }
        }

        #[test]
        fn indexed_body_words_are_findable(docs in corpus_strategy()) {
            let built = build_index(docs.clone());
            let config = SearchConfig {
                max_limit: usize::MAX,
                ..SearchConfig::default()
            };
            for doc in &docs {
                let Some(word) = doc.body.split(' ').find(|w| !w.is_empty()) else {
                    continue;
                };
                let opts = QueryOptions { kind: None, limit: Some(usize::MAX) };
                let hits = search_index(&built, word, &opts, &config);
                prop_assert!(hits.iter().any(|h| h.id == doc.id));
            }
        }
    }
}
