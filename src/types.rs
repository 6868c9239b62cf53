//! The building blocks of the search index.
//!
//! These types define how documents, fields, and posting lists fit together.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **InvertedIndex**: every `doc_id` referenced by any posting exists in
//!   `documents`, and every term key is a non-empty normalized token.
//!   Off-by-one here means garbage results.
//!
//! - **PostingList**: postings are sorted by (term_frequency DESC, doc_id ASC,
//!   field), and `doc_freq` equals the number of unique doc ids.
//!
//! - Document ids are unique within a snapshot. Re-indexing a source document
//!   with the same id replaces its content rather than duplicating it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A uniform searchable document, produced by the extractor from
/// heterogeneous content sources (blog posts, doc pages, link entries).
///
/// The `id` is derived from the content path/slug and stays stable across
/// rebuilds so re-indexing is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDoc {
    pub id: String,
    pub title: String,
    /// Plain text with markup stripped. May be empty for link entries.
    #[serde(default)]
    pub body: String,
    /// Tags/labels for categorization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Content kind for filtering (e.g. "blog", "docs", "links")
    #[serde(default)]
    pub category: Option<String>,
    /// Canonical path used for navigation to the document
    pub url: String,
    /// Used for tie-breaking and freshness display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Which document field a term occurrence came from.
///
/// Title matches beat tag matches beat body matches. The weights live in
/// [`crate::config::FieldWeights`] rather than here, so deployments can tune
/// the hierarchy without touching the scoring code.
///
/// **Gotcha**: the derived `Ord` is declaration order (Title < Tags < Body),
/// which is the opposite of weight order. It exists only to make posting-list
/// sorting deterministic; use `FieldWeights::weight()` for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Tags,
    Body,
}

impl Field {
    /// Lowercase string form, matching the serde `rename_all` convention.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Tags => "tags",
            Field::Body => "body",
        }
    }
}

/// One (document, field) occurrence record for a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub doc_id: String,
    pub field: Field,
    /// How many times the term occurred in this field of this document.
    pub term_frequency: u32,
}

/// All occurrences of a single term across the corpus.
///
/// Sorted by (term_frequency DESC, doc_id ASC) so that the strongest
/// occurrences come first and rebuilds from the same corpus are structurally
/// identical. `doc_freq` is cached because counting unique doc ids is
/// surprisingly expensive when done thousands of times per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingList {
    pub postings: Vec<Posting>,
    /// Number of unique documents containing this term
    pub doc_freq: usize,
}

/// The in-memory inverted index: term → posting list, plus the document store.
///
/// Built wholesale from the current document set and treated as an immutable
/// snapshot afterwards. Readers share it without locking; a rebuild creates a
/// new snapshot and swaps the reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvertedIndex {
    /// Map from normalized term to posting list
    pub postings: HashMap<String, PostingList>,
    /// Document store, used to materialize results and excerpts.
    ///
    /// A `BTreeMap` so iteration order (and therefore serialized form) is
    /// deterministic. Documents with no extractable tokens still live here;
    /// they are findable by id lookup but never by text query.
    pub documents: BTreeMap<String, SearchDoc>,
    /// Timestamp of the last full build, consulted by the staleness policy.
    pub built_at: DateTime<Utc>,
}

impl InvertedIndex {
    /// An index over nothing. Answers every query with zero results.
    pub fn empty() -> Self {
        InvertedIndex {
            postings: HashMap::new(),
            documents: BTreeMap::new(),
            built_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn posting_count(&self) -> usize {
        self.postings.values().map(|pl| pl.postings.len()).sum()
    }

    /// Compact shape served by `GET /api/search/index`.
    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            docs: self.doc_count(),
            terms: self.term_count(),
            postings: self.posting_count(),
            built_at: self.built_at,
        }
    }
}

/// Size and freshness summary of an index snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub docs: usize,
    pub terms: usize,
    pub postings: usize,
    pub built_at: DateTime<Utc>,
}

/// A ranked search hit: the display fields of the matched document plus its
/// relevance score and an optional highlighted excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub score: f64,
    /// Excerpt around the first matched term, with the match wrapped in
    /// `<mark>` tags. Absent when no excerpt could be located.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Envelope returned by the search facade (and `GET /api/search`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// Count of the results actually returned, after the limit is applied.
    /// The API has no pagination, so this intentionally equals
    /// `results.len()` rather than the full match count.
    pub total: usize,
    pub query: String,
    /// Category filter that was applied, if any.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl SearchResponse {
    /// The response for an empty or unmatched query. Not an error.
    pub fn empty(query: &str, kind: Option<String>) -> Self {
        SearchResponse {
            results: Vec::new(),
            total: 0,
            query: query.to_string(),
            kind,
        }
    }
}
