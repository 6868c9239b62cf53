//! Error types for the search subsystem.
//!
//! The taxonomy is small on purpose:
//!
//! - content loading problems (I/O, malformed JSON, bad config) are the only
//!   recoverable failures — they surface as [`SearchError`] from rebuilds and
//!   from the facade when no previous index exists;
//! - extraction skips are not errors at all, just warn-level log events;
//! - read-only query evaluation over a built snapshot cannot fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to read content file {path}: {source}")]
    ContentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed content in {path}: {source}")]
    ContentFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_file() {
        let err = SearchError::Config {
            path: PathBuf::from("search.json"),
            reason: "expected object".to_string(),
        };
        assert!(err.to_string().contains("search.json"));
    }
}
