//! Page metadata as exported alongside each compiled page.

use crate::parse::ParsedDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A link to a neighbouring page in the sidebar sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Label shown for the link.
    pub title: String,
    /// Absolute URL path of the target page.
    pub permalink: String,
}

/// A tag attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTag {
    /// Tag label.
    pub label: String,
    /// Tag listing page.
    pub permalink: String,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading text.
    pub value: String,
    /// Heading anchor id.
    pub id: String,
    /// Heading depth (2 for `h2`, ...).
    pub level: u8,
}

/// Attributes describing one documentation page. Set at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    /// Versioned document id.
    pub id: String,
    /// Document id without version prefix.
    pub unversioned_id: String,
    /// Page title.
    pub title: String,
    /// Short description used for meta tags.
    pub description: String,
    /// Source file reference.
    pub source: String,
    /// Directory of the source file.
    pub source_dir_name: String,
    /// URL slug.
    pub slug: String,
    /// Absolute URL path.
    pub permalink: String,
    /// Drafts are excluded from production builds.
    pub draft: bool,
    /// Link to edit the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    /// Tags.
    pub tags: Vec<PageTag>,
    /// Docs version name.
    pub version: String,
    /// Raw frontmatter.
    pub front_matter: JsonValue,
    /// Sidebar the page belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    /// Previous page; absent on the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<NavLink>,
    /// Next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

/// Site-wide inputs for deriving page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataOptions {
    /// Prefix for permalinks (e.g. `/docs`); empty for the site root.
    pub route_base: String,
    /// Base URL for edit links; the source path is appended.
    pub edit_url_base: Option<String>,
    /// Version name recorded on every page.
    pub version: String,
    /// Sidebar name recorded on every page.
    pub sidebar: Option<String>,
    /// Path the source file lives under, prepended to the id for `source`.
    pub source_root: String,
    /// Source file extension.
    pub source_extension: String,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            route_base: String::new(),
            edit_url_base: None,
            version: "current".to_string(),
            sidebar: None,
            source_root: "@site/docs".to_string(),
            source_extension: "md".to_string(),
        }
    }
}

impl PageMetadata {
    /// Derives metadata for document `id` (e.g. `integrations/sources/magento`).
    ///
    /// Frontmatter `title`, `description`, `slug`, `tags`, and `draft` take
    /// precedence over values derived from the content.
    pub fn from_document(id: &str, doc: &ParsedDocument, options: &MetadataOptions) -> Self {
        let front = &doc.front_matter;
        let front_str = |key: &str| front.get(key).and_then(JsonValue::as_str).map(str::to_string);

        let title = front_str("title")
            .or_else(|| doc.content_title.clone())
            .unwrap_or_else(|| id.rsplit('/').next().unwrap_or(id).to_string());
        let description = front_str("description")
            .or_else(|| doc.first_paragraph())
            .unwrap_or_default();

        let slug = match front_str("slug") {
            Some(slug) if slug.starts_with('/') => slug,
            Some(slug) => format!("/{}", slug),
            None => format!("/{}", id),
        };
        let permalink = format!("{}{}", options.route_base.trim_end_matches('/'), slug);

        let source_dir_name = id.rsplit_once('/').map(|(dir, _)| dir).unwrap_or(".");
        let relative_source = format!("{}.{}", id, options.source_extension);

        let tags = front
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(JsonValue::as_str)
                    .map(|label| PageTag {
                        label: label.to_string(),
                        permalink: format!(
                            "{}/tags/{}",
                            options.route_base.trim_end_matches('/'),
                            crate::slug::slugify(label)
                        ),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: id.to_string(),
            unversioned_id: id.to_string(),
            title,
            description,
            source: format!("{}/{}", options.source_root, relative_source),
            source_dir_name: source_dir_name.to_string(),
            slug,
            permalink,
            draft: front.get("draft").and_then(JsonValue::as_bool).unwrap_or(false),
            edit_url: options
                .edit_url_base
                .as_ref()
                .map(|base| format!("{}/{}", base.trim_end_matches('/'), relative_source)),
            tags,
            version: options.version.clone(),
            front_matter: front.clone(),
            sidebar: options.sidebar.clone(),
            previous: None,
            next: None,
        }
    }

    /// Link to this page for use in a neighbour's navigation.
    pub fn nav_link(&self) -> NavLink {
        NavLink {
            title: self.title.clone(),
            permalink: self.permalink.clone(),
        }
    }
}

/// Fills `previous` / `next` on each page from its position in `pages`.
pub fn link_sequence(pages: &mut [PageMetadata]) {
    let links: Vec<NavLink> = pages.iter().map(PageMetadata::nav_link).collect();
    for (index, page) in pages.iter_mut().enumerate() {
        page.previous = index.checked_sub(1).map(|i| links[i].clone());
        page.next = links.get(index + 1).cloned();
    }
}
