//! The search facade: one long-lived service owning the cached index
//! snapshot, its staleness policy, and the rebuild lifecycle.
//!
//! # Snapshot discipline
//!
//! The [`InvertedIndex`] is immutable once built. Readers clone an `Arc` to
//! it and never observe partial state; a rebuild constructs a fresh index and
//! atomically swaps the shared reference.
//!
//! # Staleness and single-flight
//!
//! A read triggers a rebuild only when no snapshot exists yet or the current
//! one is older than the configured staleness window. Rebuilds are
//! single-flight: the flight lock admits one builder, and on the read path
//! concurrent callers are served the previous snapshot instead of waiting
//! (serve-stale-while-revalidate). The explicit [`SearchService::rebuild`]
//! used by the admin surface does block on the flight lock, so invalidation
//! after a content edit is synchronous.
//!
//! # Failure policy
//!
//! A rebuild failure never degrades availability: the previous snapshot stays
//! in place and keeps serving. If the very first build fails there is nothing
//! to fall back to — the error surfaces once, and the service parks an empty
//! snapshot so later queries answer with zero results instead of erroring
//! forever.

use crate::config::SearchConfig;
use crate::content::ContentSource;
use crate::error::SearchError;
use crate::index::build_index;
use crate::query::{search_index, suggest_terms, QueryOptions};
use crate::types::{IndexSummary, InvertedIndex, SearchResponse};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

pub struct SearchService {
    source: Box<dyn ContentSource>,
    config: SearchConfig,
    snapshot: RwLock<Option<Arc<InvertedIndex>>>,
    /// Held for the duration of one index build. `try_lock` on the read path
    /// makes rebuilds single-flight.
    rebuild_flight: Mutex<()>,
}

impl SearchService {
    pub fn new(source: impl ContentSource + 'static, config: SearchConfig) -> Self {
        SearchService {
            source: Box::new(source),
            config,
            snapshot: RwLock::new(None),
            rebuild_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn current(&self) -> Option<Arc<InvertedIndex>> {
        self.snapshot.read().clone()
    }

    fn is_stale(&self, index: &InvertedIndex) -> bool {
        let age = Utc::now().signed_duration_since(index.built_at);
        match age.to_std() {
            Ok(age) => age > self.config.staleness_window(),
            // A build timestamp in the future means the clock moved; rebuild.
            Err(_) => true,
        }
    }

    fn build_snapshot(&self) -> Result<Arc<InvertedIndex>, SearchError> {
        let docs = self.source.load()?;
        let index = build_index(docs);
        tracing::info!(
            docs = index.doc_count(),
            terms = index.term_count(),
            "index rebuilt"
        );
        Ok(Arc::new(index))
    }

    /// Return a usable snapshot, rebuilding if none exists or the current one
    /// has gone stale.
    fn ensure_index(&self) -> Result<Arc<InvertedIndex>, SearchError> {
        if let Some(index) = self.current() {
            if !self.is_stale(&index) {
                return Ok(index);
            }
            // Stale but valid. One caller revalidates; everyone else is
            // served the previous snapshot.
            return match self.rebuild_flight.try_lock() {
                Some(_guard) => match self.build_snapshot() {
                    Ok(fresh) => {
                        *self.snapshot.write() = Some(fresh.clone());
                        Ok(fresh)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "rebuild failed, serving stale index");
                        Ok(index)
                    }
                },
                None => Ok(index),
            };
        }

        // No index yet: the first caller builds it, concurrent callers block
        // on the flight lock and then reuse the result.
        let _guard = self.rebuild_flight.lock();
        if let Some(index) = self.current() {
            return Ok(index);
        }
        match self.build_snapshot() {
            Ok(fresh) => {
                *self.snapshot.write() = Some(fresh.clone());
                Ok(fresh)
            }
            Err(e) => {
                tracing::error!(error = %e, "initial index build failed");
                // Park an empty snapshot so subsequent queries answer with
                // zero results instead of failing on every call. Its epoch
                // build time keeps it permanently stale, so content becoming
                // available is picked up on a later read.
                *self.snapshot.write() = Some(Arc::new(InvertedIndex::empty()));
                Err(e)
            }
        }
    }

    /// Force a synchronous full rebuild. Idempotent; safe to call
    /// concurrently (calls serialize on the flight lock). On failure the
    /// previous snapshot remains in place.
    pub fn rebuild(&self) -> Result<usize, SearchError> {
        let _guard = self.rebuild_flight.lock();
        let fresh = self.build_snapshot()?;
        let docs = fresh.doc_count();
        *self.snapshot.write() = Some(fresh);
        Ok(docs)
    }

    /// Evaluate a query. Never fails for malformed input — an empty or
    /// whitespace query yields an empty result set. The only error case is a
    /// failed initial build, which the HTTP layer maps to a 500.
    pub fn search(&self, query: &str, opts: &QueryOptions) -> Result<SearchResponse, SearchError> {
        let index = self.ensure_index()?;
        let results = search_index(&index, query, opts, &self.config);
        Ok(SearchResponse {
            total: results.len(),
            results,
            query: query.to_string(),
            kind: opts.kind.clone(),
        })
    }

    /// Prefix suggestions for autocomplete. The caller may override the
    /// configured suggestion count, hard-capped by `max_limit`.
    pub fn suggest(&self, prefix: &str, limit: Option<usize>) -> Result<Vec<String>, SearchError> {
        let index = self.ensure_index()?;
        let limit = limit
            .unwrap_or(self.config.suggest_limit)
            .min(self.config.max_limit);
        Ok(suggest_terms(&index, prefix, limit))
    }

    /// Summary of the current snapshot, building one if needed.
    pub fn index_summary(&self) -> Result<IndexSummary, SearchError> {
        Ok(self.ensure_index()?.summary())
    }
}
