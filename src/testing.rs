//! Canonical test fixtures, shared between unit tests and the `tests/`
//! integration suite.

use crate::types::SearchDoc;

/// Build a minimal document with the given id, title, body, and tags.
pub fn make_doc(id: &str, title: &str, body: &str, tags: &[&str]) -> SearchDoc {
    SearchDoc {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        category: None,
        url: format!("/{}", id),
        updated_at: None,
    }
}
