//! Document extraction: reshaping heterogeneous content records into the
//! uniform [`SearchDoc`] the index builder consumes.
//!
//! The extractor is a pure transform over already-parsed records. All file
//! and JSON reading lives in [`crate::content`]. A record without a usable
//! title is skipped with a warning — a non-fatal omission, never an error.

use crate::types::SearchDoc;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A blog post as exported by the site build (frontmatter already parsed,
/// markup already stripped from `content`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostRecord {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A documentation page. `path` is the slash-separated position in the docs
/// tree (e.g. `guides/getting-started`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocPageRecord {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A curated link entry from the JSON-backed link collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    /// Short description; becomes the (possibly empty) body text.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Titles that are missing or all-whitespace disqualify a record.
fn usable_title(title: Option<&String>) -> Option<String> {
    let t = title?.trim();
    if t.is_empty() {
        return None;
    }
    Some(t.to_string())
}

pub fn from_blog_post(record: BlogPostRecord) -> Option<SearchDoc> {
    let Some(title) = usable_title(record.title.as_ref()) else {
        tracing::warn!(slug = %record.slug, "skipping blog post without title");
        return None;
    };
    Some(SearchDoc {
        id: format!("blog:{}", record.slug),
        title,
        body: record.content,
        tags: record.tags,
        category: Some(record.category.unwrap_or_else(|| "blog".to_string())),
        url: format!("/blog/{}", record.slug),
        updated_at: record.updated_at,
    })
}

pub fn from_doc_page(record: DocPageRecord) -> Option<SearchDoc> {
    let Some(title) = usable_title(record.title.as_ref()) else {
        tracing::warn!(path = %record.path, "skipping doc page without title");
        return None;
    };
    Some(SearchDoc {
        id: format!("docs:{}", record.path),
        title,
        body: record.content,
        tags: record.tags,
        category: Some("docs".to_string()),
        url: format!("/docs/{}", record.path),
        updated_at: record.updated_at,
    })
}

pub fn from_link_entry(record: LinkEntryRecord) -> Option<SearchDoc> {
    let Some(title) = usable_title(record.title.as_ref()) else {
        tracing::warn!(url = %record.url, "skipping link entry without title");
        return None;
    };
    // Link entries edited through the admin UI may not carry an explicit id;
    // the URL is the next most stable thing we have.
    let key = record.id.unwrap_or_else(|| record.url.clone());
    Some(SearchDoc {
        id: format!("links:{}", key),
        title,
        body: record.description,
        tags: record.tags,
        category: Some(record.category.unwrap_or_else(|| "links".to_string())),
        url: record.url,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(slug: &str, title: Option<&str>) -> BlogPostRecord {
        BlogPostRecord {
            slug: slug.to_string(),
            title: title.map(String::from),
            content: "some body".to_string(),
            tags: vec!["rust".to_string()],
            category: None,
            updated_at: None,
        }
    }

    #[test]
    fn blog_post_maps_to_blog_doc() {
        let doc = from_blog_post(blog("ownership", Some("Rust Ownership"))).unwrap();
        assert_eq!(doc.id, "blog:ownership");
        assert_eq!(doc.url, "/blog/ownership");
        assert_eq!(doc.category.as_deref(), Some("blog"));
        assert_eq!(doc.tags, vec!["rust"]);
    }

    #[test]
    fn missing_title_is_a_skip_not_an_error() {
        assert!(from_blog_post(blog("untitled", None)).is_none());
        assert!(from_blog_post(blog("blank", Some("   "))).is_none());
    }

    #[test]
    fn title_is_trimmed() {
        let doc = from_blog_post(blog("x", Some("  Spaced Out  "))).unwrap();
        assert_eq!(doc.title, "Spaced Out");
    }

    #[test]
    fn doc_page_id_uses_path() {
        let doc = from_doc_page(DocPageRecord {
            path: "guides/install".to_string(),
            title: Some("Installing".to_string()),
            content: String::new(),
            tags: vec![],
            updated_at: None,
        })
        .unwrap();
        assert_eq!(doc.id, "docs:guides/install");
        assert_eq!(doc.url, "/docs/guides/install");
    }

    #[test]
    fn link_entry_falls_back_to_url_for_id() {
        let json = r#"{"title": "Rust Blog", "url": "https://blog.rust-lang.org"}"#;
        let record: LinkEntryRecord = serde_json::from_str(json).unwrap();
        let doc = from_link_entry(record).unwrap();
        assert_eq!(doc.id, "links:https://blog.rust-lang.org");
        assert_eq!(doc.body, "");
        assert_eq!(doc.category.as_deref(), Some("links"));
    }

    #[test]
    fn link_entry_prefers_explicit_id() {
        let record = LinkEntryRecord {
            id: Some("rust-blog".to_string()),
            title: Some("Rust Blog".to_string()),
            url: "https://blog.rust-lang.org".to_string(),
            description: String::new(),
            tags: vec![],
            category: None,
            updated_at: None,
        };
        assert_eq!(from_link_entry(record).unwrap().id, "links:rust-blog");
    }
}
