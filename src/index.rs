//! Inverted index construction.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: each posting list is sorted by
//!    (term_frequency DESC, doc_id ASC, field)
//! 2. **DOC_FREQ_CORRECT**: doc_freq equals the count of unique doc_ids
//! 3. **NON_EMPTY**: every term has at least one posting
//! 4. **DOC_STORE_COMPLETE**: every posting's doc_id exists in `documents`
//! 5. **DETERMINISTIC**: rebuilding from the same document set produces a
//!    structurally identical index (modulo `built_at`)
//!
//! Documents are processed in stable input order. When the same id appears
//! more than once, the last occurrence wins — re-indexing a document replaces
//! it rather than duplicating it.

use crate::tokenize::tokenize;
use crate::types::{Field, InvertedIndex, Posting, PostingList, SearchDoc};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

/// Count term frequencies for one field's text.
fn field_term_counts(counts: &mut HashMap<String, u32>, text: &str) {
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
}

/// Build an inverted index from a document set.
///
/// Tokenizes `title`, each tag (its own mini-field, accumulated under
/// [`Field::Tags`]), and `body` separately, then records one posting per
/// distinct (term, document, field) with its term frequency.
///
/// A document with no extractable tokens still gets a `documents` entry but
/// contributes no postings; it is findable by id only, never by text query.
pub fn build_index(docs: Vec<SearchDoc>) -> InvertedIndex {
    // Last occurrence of each id wins.
    let mut keep: HashMap<String, usize> = HashMap::new();
    for (i, doc) in docs.iter().enumerate() {
        if keep.insert(doc.id.clone(), i).is_some() {
            tracing::debug!(id = %doc.id, "duplicate document id, replacing earlier entry");
        }
    }

    let mut terms: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut documents: BTreeMap<String, SearchDoc> = BTreeMap::new();

    for (i, doc) in docs.into_iter().enumerate() {
        if keep.get(&doc.id) != Some(&i) {
            continue;
        }

        let mut per_field: Vec<(Field, HashMap<String, u32>)> = Vec::with_capacity(3);

        let mut title_counts = HashMap::new();
        field_term_counts(&mut title_counts, &doc.title);
        per_field.push((Field::Title, title_counts));

        let mut tag_counts = HashMap::new();
        for tag in &doc.tags {
            field_term_counts(&mut tag_counts, tag);
        }
        per_field.push((Field::Tags, tag_counts));

        let mut body_counts = HashMap::new();
        field_term_counts(&mut body_counts, &doc.body);
        per_field.push((Field::Body, body_counts));

        for (field, counts) in per_field {
            for (term, tf) in counts {
                terms.entry(term).or_default().push(Posting {
                    doc_id: doc.id.clone(),
                    field,
                    term_frequency: tf,
                });
            }
        }

        documents.insert(doc.id.clone(), doc);
    }

    // INVARIANT: POSTING_LIST_SORTED
    let mut postings: HashMap<String, PostingList> = HashMap::with_capacity(terms.len());
    for (term, mut list) in terms {
        list.sort_by(|a, b| {
            b.term_frequency
                .cmp(&a.term_frequency)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
                .then_with(|| a.field.cmp(&b.field))
        });

        // INVARIANT: DOC_FREQ_CORRECT
        let mut doc_ids: Vec<&str> = list.iter().map(|p| p.doc_id.as_str()).collect();
        doc_ids.sort_unstable();
        doc_ids.dedup();
        let doc_freq = doc_ids.len();

        postings.insert(
            term,
            PostingList {
                postings: list,
                doc_freq,
            },
        );
    }

    InvertedIndex {
        postings,
        documents,
        built_at: Utc::now(),
    }
}

/// Check index invariants (debug assertion helper for tests).
#[cfg(any(debug_assertions, test))]
pub fn check_index_well_formed(index: &InvertedIndex) -> bool {
    for (term, list) in &index.postings {
        if term.is_empty() || list.postings.is_empty() {
            return false;
        }

        for i in 1..list.postings.len() {
            let prev = &list.postings[i - 1];
            let curr = &list.postings[i];
            let prev_key = (
                std::cmp::Reverse(prev.term_frequency),
                prev.doc_id.as_str(),
                prev.field,
            );
            let curr_key = (
                std::cmp::Reverse(curr.term_frequency),
                curr.doc_id.as_str(),
                curr.field,
            );
            if prev_key > curr_key {
                return false;
            }
        }

        let mut doc_ids: Vec<&str> = list.postings.iter().map(|p| p.doc_id.as_str()).collect();
        doc_ids.sort_unstable();
        doc_ids.dedup();
        if list.doc_freq != doc_ids.len() {
            return false;
        }

        if list
            .postings
            .iter()
            .any(|p| !index.documents.contains_key(&p.doc_id))
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_doc;

    #[test]
    fn indexes_title_tags_and_body_separately() {
        let index = build_index(vec![make_doc(
            "a",
            "Rust Ownership",
            "explains borrowing",
            &["rust", "memory"],
        )]);

        let rust = index.postings.get("rust").unwrap();
        // "rust" occurs in both title and tags of the same document.
        assert_eq!(rust.postings.len(), 2);
        assert_eq!(rust.doc_freq, 1);
        let fields: Vec<Field> = rust.postings.iter().map(|p| p.field).collect();
        assert!(fields.contains(&Field::Title));
        assert!(fields.contains(&Field::Tags));

        let borrowing = index.postings.get("borrowing").unwrap();
        assert_eq!(borrowing.postings[0].field, Field::Body);
    }

    #[test]
    fn term_frequency_counts_repeats() {
        let index = build_index(vec![make_doc("a", "t", "echo echo echo", &[])]);
        let echo = index.postings.get("echo").unwrap();
        assert_eq!(echo.postings[0].term_frequency, 3);
    }

    #[test]
    fn posting_lists_sorted_by_tf_then_doc_id() {
        let index = build_index(vec![
            make_doc("b", "t", "word", &[]),
            make_doc("a", "t", "word word", &[]),
            make_doc("c", "t", "word", &[]),
        ]);
        let word = index.postings.get("word").unwrap();
        let order: Vec<(&str, u32)> = word
            .postings
            .iter()
            .map(|p| (p.doc_id.as_str(), p.term_frequency))
            .collect();
        assert_eq!(order, vec![("a", 2), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn tokenless_document_lands_in_store_only() {
        let index = build_index(vec![make_doc("ghost", "!!!", "", &[])]);
        assert_eq!(index.doc_count(), 1);
        assert!(index.documents.contains_key("ghost"));
        assert_eq!(index.term_count(), 0);
    }

    #[test]
    fn duplicate_id_last_occurrence_wins() {
        let index = build_index(vec![
            make_doc("a", "Old Title", "old body", &[]),
            make_doc("a", "New Title", "new body", &[]),
        ]);
        assert_eq!(index.doc_count(), 1);
        assert_eq!(index.documents.get("a").unwrap().title, "New Title");
        assert!(index.postings.contains_key("new"));
        assert!(!index.postings.contains_key("old"));
    }

    #[test]
    fn built_index_is_well_formed() {
        let index = build_index(vec![
            make_doc("a", "Rust Ownership", "explains borrowing", &["rust"]),
            make_doc("b", "Cooking Pasta", "boil rust colored tomatoes", &["food"]),
        ]);
        assert!(check_index_well_formed(&index));
    }

    #[test]
    fn rebuild_is_structurally_identical() {
        let docs = vec![
            make_doc("a", "Rust Ownership", "explains borrowing", &["rust"]),
            make_doc("b", "Cooking Pasta", "boil rust colored tomatoes", &["food"]),
        ];
        let first = build_index(docs.clone());
        let second = build_index(docs);
        assert_eq!(first.postings, second.postings);
        assert_eq!(first.documents, second.documents);
    }
}
