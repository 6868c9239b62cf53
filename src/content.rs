//! Content loading: the collaborator boundary the index is rebuilt from.
//!
//! The site build exports its content as plain JSON arrays (`posts.json`,
//! `docs.json`, `links.json`) into one directory. [`DirSource`] reads
//! whichever of those files exist and runs each record through the extractor.
//!
//! The [`ContentSource`] trait exists so the service can be constructed with
//! an in-memory corpus in tests; production code always uses `DirSource`.

use crate::error::SearchError;
use crate::extract;
use crate::types::SearchDoc;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

/// Anything that can produce the current searchable corpus.
pub trait ContentSource: Send + Sync {
    fn load(&self) -> Result<Vec<SearchDoc>, SearchError>;
}

/// Reads exported content JSON from a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    /// Read and parse one exported JSON array. A missing file is an empty
    /// content kind, not an error — a docs-only site has no `posts.json`.
    fn read_records<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, SearchError> {
        let path = self.root.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "content file absent, skipping");
                return Ok(Vec::new());
            }
            Err(e) => return Err(SearchError::ContentIo { path, source: e }),
        };
        serde_json::from_str(&raw).map_err(|e| SearchError::ContentFormat { path, source: e })
    }
}

impl ContentSource for DirSource {
    fn load(&self) -> Result<Vec<SearchDoc>, SearchError> {
        let mut docs = Vec::new();

        for record in self.read_records::<extract::BlogPostRecord>("posts.json")? {
            docs.extend(extract::from_blog_post(record));
        }
        for record in self.read_records::<extract::DocPageRecord>("docs.json")? {
            docs.extend(extract::from_doc_page(record));
        }
        for record in self.read_records::<extract::LinkEntryRecord>("links.json")? {
            docs.extend(extract::from_link_entry(record));
        }

        tracing::debug!(
            docs = docs.len(),
            root = %self.root.display(),
            "loaded content corpus"
        );
        Ok(docs)
    }
}

/// A fixed in-memory corpus. Used by tests and by the one-shot CLI search.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    docs: Vec<SearchDoc>,
}

impl StaticSource {
    pub fn new(docs: Vec<SearchDoc>) -> Self {
        StaticSource { docs }
    }
}

impl ContentSource for StaticSource {
    fn load(&self) -> Result<Vec<SearchDoc>, SearchError> {
        Ok(self.docs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn missing_files_yield_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DirSource::new(dir.path()).load().unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn loads_all_three_content_kinds() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "posts.json",
            r#"[{"slug": "a", "title": "Post A", "content": "alpha"}]"#,
        );
        write(
            dir.path(),
            "docs.json",
            r#"[{"path": "intro", "title": "Intro", "content": "beta"}]"#,
        );
        write(
            dir.path(),
            "links.json",
            r#"[{"title": "Link", "url": "https://l.example"}]"#,
        );

        let docs = DirSource::new(dir.path()).load().unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().any(|d| d.id == "blog:a"));
        assert!(docs.iter().any(|d| d.id == "docs:intro"));
        assert!(docs.iter().any(|d| d.id.starts_with("links:")));
    }

    #[test]
    fn untitled_records_are_dropped_silently() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "posts.json",
            r#"[{"slug": "a", "title": "Kept"}, {"slug": "b"}]"#,
        );
        let docs = DirSource::new(dir.path()).load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "blog:a");
    }

    #[test]
    fn malformed_json_is_a_content_format_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "posts.json", "{not json");
        let err = DirSource::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, SearchError::ContentFormat { .. }));
    }
}
