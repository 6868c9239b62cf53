//! Query evaluation: tokenize, score, rank, truncate, highlight.
//!
//! Matching is OR-style across query tokens: a token that matches nothing
//! simply contributes zero score, and documents matching more tokens rank
//! higher through summed scores. A score is a weighted sum over matched
//! postings: `term_frequency * field_weight`.
//!
//! Ordering is fully deterministic: score DESC, then `updated_at` DESC
//! (documents without a timestamp sort last), then doc id ASC.
//!
//! Query evaluation is read-only over an immutable snapshot; nothing in this
//! module can corrupt shared state.

use crate::config::SearchConfig;
use crate::tokenize::{fold_char, tokenize};
use crate::types::{InvertedIndex, SearchHit};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Caller-supplied knobs for one query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Restrict results to one category (e.g. "blog").
    pub kind: Option<String>,
    /// Result cap; falls back to `SearchConfig::default_limit`, hard-capped
    /// by `SearchConfig::max_limit`.
    pub limit: Option<usize>,
}

/// Evaluate a free-text query against an index snapshot.
///
/// An empty or all-punctuation query returns no results — not an error, and
/// not "all documents". Queries longer than `max_query_tokens` are truncated,
/// a documented degradation rather than a rejection.
pub fn search_index(
    index: &InvertedIndex,
    query: &str,
    opts: &QueryOptions,
    config: &SearchConfig,
) -> Vec<SearchHit> {
    let mut tokens = tokenize(query);
    tokens.truncate(config.max_query_tokens);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scores: HashMap<&str, f64> = HashMap::new();
    // Earliest query token that matched each document, for the excerpt.
    let mut first_match: HashMap<&str, &str> = HashMap::new();

    for token in &tokens {
        let Some(list) = index.postings.get(token.as_str()) else {
            continue;
        };
        for posting in &list.postings {
            let weight = config.weights.weight(posting.field);
            *scores.entry(posting.doc_id.as_str()).or_insert(0.0) +=
                f64::from(posting.term_frequency) * weight;
            first_match.entry(posting.doc_id.as_str()).or_insert(token);
        }
    }

    let mut hits: Vec<SearchHit> = scores
        .into_iter()
        .filter_map(|(doc_id, score)| {
            let doc = index.documents.get(doc_id)?;
            if let Some(kind) = opts.kind.as_deref() {
                if doc.category.as_deref() != Some(kind) {
                    return None;
                }
            }

            let term = first_match.get(doc_id).copied().unwrap_or("");
            let highlight = make_excerpt(&doc.body, term, config.highlight_window)
                .or_else(|| make_excerpt(&doc.title, term, config.highlight_window));

            Some(SearchHit {
                id: doc.id.clone(),
                title: doc.title.clone(),
                url: doc.url.clone(),
                category: doc.category.clone(),
                tags: doc.tags.clone(),
                score,
                highlight,
                updated_at: doc.updated_at,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let limit = opts
        .limit
        .unwrap_or(config.default_limit)
        .min(config.max_limit);
    hits.truncate(limit);
    hits
}

/// Prefix lookup over the indexed vocabulary, for autocomplete.
///
/// Independent of full scoring: candidates are ranked by document frequency
/// (ties alphabetically). The last whitespace-separated token of the prefix
/// is completed, matching how a user types.
pub fn suggest_terms(index: &InvertedIndex, prefix: &str, limit: usize) -> Vec<String> {
    let tokens = tokenize(prefix);
    let Some(stem) = tokens.last() else {
        return Vec::new();
    };

    let mut candidates: Vec<(&String, usize)> = index
        .postings
        .iter()
        .filter(|(term, _)| term.starts_with(stem.as_str()))
        .map(|(term, list)| (term, list.doc_freq))
        .collect();

    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    candidates.truncate(limit);
    candidates.into_iter().map(|(term, _)| term.clone()).collect()
}

/// Locate `term` inside `source` and cut an excerpt of roughly `window`
/// characters around it, wrapping the match in `<mark>` tags.
///
/// The term is a normalized token but the source is original text, so the
/// search runs over a per-character folded view that keeps a map back to
/// original character positions. Characters that normalize away (combining
/// marks) are transparent to the match.
fn make_excerpt(source: &str, term: &str, window: usize) -> Option<String> {
    let chars: Vec<char> = source.chars().collect();
    let needle: Vec<char> = term.chars().collect();
    if needle.is_empty() || chars.is_empty() {
        return None;
    }

    // Folded view of the source, aligned back to original positions.
    let mut keys: Vec<char> = Vec::with_capacity(chars.len());
    let mut positions: Vec<usize> = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if let Some(k) = fold_char(c) {
            keys.push(k);
            positions.push(i);
        }
    }
    if keys.len() < needle.len() {
        return None;
    }

    let hit = (0..=keys.len() - needle.len())
        .find(|&k| keys[k..k + needle.len()] == needle[..])?;
    let start = positions[hit];
    let mut end = positions[hit + needle.len() - 1] + 1;
    // Trailing characters that normalize away (combining marks on the last
    // matched character in decomposed text) belong inside the mark.
    while end < chars.len() && fold_char(chars[end]).is_none() {
        end += 1;
    }

    let pad = window.saturating_sub(end - start) / 2;
    let win_start = start.saturating_sub(pad);
    let win_end = (end + pad).min(chars.len());

    let mut out = String::new();
    if win_start > 0 {
        out.push('…');
    }
    out.extend(&chars[win_start..start]);
    out.push_str("<mark>");
    out.extend(&chars[start..end]);
    out.push_str("</mark>");
    out.extend(&chars[end..win_end]);
    if win_end < chars.len() {
        out.push('…');
    }
    Some(out)
}
