//! Page modules and the page-loading entry point.

use crate::components::{ComponentMap, Overrides, merge_components};
use crate::config::RenderOptions;
use crate::markup::Markup;
use crate::navigation::pagination;
use crate::renderer::Renderer;
use crate::toc::toc_tree;
use mdxsite_core::{
    Chunk, ChunkRegistry, ContentNode, Diagnostics, MetadataOptions, ModuleId, PageMetadata,
    ParseOptions, ParsedDocument, RegistryError, SiteError, TocEntry, link_sequence,
    parse_document,
};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Exports of a compiled page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModule {
    /// Page metadata.
    pub metadata: PageMetadata,
    /// Raw frontmatter.
    pub front_matter: JsonValue,
    /// Text of the first `h1`, if any.
    pub content_title: Option<String>,
    /// Table of contents.
    pub toc: Vec<TocEntry>,
    /// Page body.
    pub content: ContentNode,
    /// Components the page renders with, before caller overrides.
    pub components: ComponentMap,
    /// Warnings raised while parsing.
    pub diagnostics: Diagnostics,
}

impl PageModule {
    /// Compiles the Markdown/MDX source of page `id`.
    pub fn from_markdown(
        id: &str,
        source: &str,
        parse_options: &ParseOptions,
        metadata_options: &MetadataOptions,
    ) -> Result<Self, SiteError> {
        let doc = parse_document(source, parse_options)?;
        Ok(Self::from_document(id, doc, metadata_options))
    }

    /// Builds the module from an already parsed document.
    pub fn from_document(id: &str, doc: ParsedDocument, options: &MetadataOptions) -> Self {
        let metadata = PageMetadata::from_document(id, &doc, options);
        Self {
            metadata,
            front_matter: doc.front_matter,
            content_title: doc.content_title,
            toc: doc.toc,
            content: doc.content,
            components: ComponentMap::new(),
            diagnostics: doc.diagnostics,
        }
    }

    /// Places `runtime` beneath the page's own components.
    pub fn with_components(mut self, runtime: &ComponentMap) -> Self {
        self.components = merge_components(runtime, &self.components);
        self
    }
}

/// Fills previous / next links from the order of `pages`.
pub fn link_pages(pages: &mut [PageModule]) {
    let mut metadata: Vec<PageMetadata> = pages.iter().map(|p| p.metadata.clone()).collect();
    link_sequence(&mut metadata);
    for (page, meta) in pages.iter_mut().zip(metadata) {
        page.metadata = meta;
    }
}

/// What a module in a site registry exports.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteModule {
    /// A shared component map.
    Components(ComponentMap),
    /// A compiled page.
    Page(PageModule),
}

impl SiteModule {
    /// The page, if this module is one.
    pub fn as_page(&self) -> Option<&PageModule> {
        match self {
            SiteModule::Page(page) => Some(page),
            SiteModule::Components(_) => None,
        }
    }

    /// The component map, if this module is one.
    pub fn as_components(&self) -> Option<&ComponentMap> {
        match self {
            SiteModule::Components(map) => Some(map),
            SiteModule::Page(_) => None,
        }
    }
}

/// Builds a chunk registering the component runtime under `runtime_id` and
/// one module per page, each depending on the runtime.
pub fn page_chunk(
    chunk_id: impl Into<ModuleId>,
    runtime_id: impl Into<ModuleId>,
    runtime: ComponentMap,
    pages: impl IntoIterator<Item = (ModuleId, PageModule)>,
) -> Chunk<SiteModule> {
    let runtime_id = runtime_id.into();
    let mut chunk = Chunk::<SiteModule>::new(chunk_id).module(runtime_id.clone(), [], move |_| {
        SiteModule::Components(runtime.clone())
    });
    for (key, page) in pages {
        chunk = chunk.module(key, [runtime_id.clone()], move |deps| {
            match deps.first().and_then(|dep| dep.as_components()) {
                Some(runtime) => SiteModule::Page(page.clone().with_components(runtime)),
                None => SiteModule::Page(page.clone()),
            }
        });
    }
    chunk
}

/// Errors that stop a page from loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The registry could not provide the module.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The key names a module that is not a page.
    #[error("module {key} is not a page")]
    NotAPage {
        /// Requested key
        key: ModuleId,
    },
}

/// A page rendered for embedding in the site shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page title.
    pub title: String,
    /// Page URL path.
    pub permalink: String,
    /// Body markup.
    pub content: Markup,
    /// Table of contents markup; empty without headings.
    pub toc: Markup,
    /// Previous / next navigation; empty when the page has no neighbours.
    pub pagination: Markup,
    /// Parse and render warnings.
    pub diagnostics: Diagnostics,
}

impl RenderedPage {
    /// Composes the page fragment: article, navigation, and table of contents.
    pub fn to_html(&self) -> Markup {
        let mut html = Markup::from_trusted(
            "<div class=\"docItemContainer\"><article><div class=\"markdown\">",
        );
        html.push(&self.content);
        html.push_trusted("</div></article>");
        html.push(&self.pagination);
        html.push_trusted("</div>");
        if !self.toc.is_empty() {
            html.push_trusted("<div class=\"tableOfContents\">");
            html.push(&self.toc);
            html.push_trusted("</div>");
        }
        html
    }
}

/// Renders a page with `overrides` applied to its components.
///
/// The body, table of contents and navigation share one renderer and one set
/// of warnings.
pub fn render_page(
    page: &PageModule,
    overrides: &Overrides,
    options: &RenderOptions,
) -> RenderedPage {
    let components = overrides.apply(&page.components);
    let renderer = Renderer::new(&components, options);
    let mut diagnostics = page.diagnostics.clone();
    let mut render_part = |node: Option<&ContentNode>| match node {
        Some(node) => {
            let output = renderer.render(node);
            diagnostics.extend(output.diagnostics);
            output.markup
        }
        None => Markup::new(),
    };
    let content = render_part(Some(&page.content));
    let toc = render_part(toc_tree(&page.toc).as_ref());
    let navigation = render_part(pagination(&page.metadata).as_ref());
    if diagnostics.has_warnings() {
        log::debug!(
            "rendered {} with {} warning(s)",
            page.metadata.permalink,
            diagnostics.warnings.len()
        );
    }

    RenderedPage {
        title: page.metadata.title.clone(),
        permalink: page.metadata.permalink.clone(),
        content,
        toc,
        pagination: navigation,
        diagnostics,
    }
}

/// Loads page `key` from `registry` and renders it.
///
/// A missing module is fatal: it means a chunk was left out of the build.
pub fn load_page(
    registry: &ChunkRegistry<SiteModule>,
    key: &ModuleId,
    overrides: &Overrides,
    options: &RenderOptions,
) -> Result<RenderedPage, PageError> {
    let module = registry.require(key)?;
    let page = module
        .as_page()
        .ok_or_else(|| PageError::NotAPage { key: key.clone() })?;
    Ok(render_page(page, overrides, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use mdxsite_core::RenderWarning;

    const MAGENTO: &str = "---\nid: magento\n---\n# Magento\n\n[Magento](https://magento.com) is an open source eCommerce Platform.\n\n## Features\n\n:::info\nReach out to your service representative.\n:::\n\n<Tabs groupId=\"os\">text</Tabs>\n";

    fn magento() -> PageModule {
        PageModule::from_markdown(
            "integrations/sources/magento",
            MAGENTO,
            &ParseOptions::default(),
            &MetadataOptions::default(),
        )
        .unwrap()
    }

    fn registry() -> ChunkRegistry<SiteModule> {
        let mut pages = vec![
            PageModule::from_markdown(
                "integrations/sources/looker",
                "# Looker\n",
                &ParseOptions::default(),
                &MetadataOptions::default(),
            )
            .unwrap(),
            magento(),
        ];
        link_pages(&mut pages);
        let runtime = ComponentMap::new().with("h2", "h3");
        let keys = [ModuleId::from(3905u64), ModuleId::from(5036u64)];
        let mut registry = ChunkRegistry::new();
        registry
            .install_chunk(page_chunk(
                2031u64,
                "runtime",
                runtime,
                keys.into_iter().zip(pages),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_from_markdown() {
        let page = magento();
        assert_eq!(page.metadata.title, "Magento");
        assert_eq!(page.content_title.as_deref(), Some("Magento"));
        assert_eq!(page.front_matter["id"], "magento");
        assert_eq!(page.toc.len(), 1);
        assert!(page.components.is_empty());
    }

    #[test]
    fn test_load_page_renders_with_runtime_components() {
        let registry = registry();
        let rendered = load_page(
            &registry,
            &ModuleId::from(5036u64),
            &Overrides::default(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(rendered.title, "Magento");
        assert_eq!(rendered.permalink, "/integrations/sources/magento");
        assert!(rendered.content.as_str().contains("<h3 id=\"features\">Features</h3>"));
        assert!(
            rendered
                .content
                .as_str()
                .contains("admonition admonition-info alert alert--info")
        );
        assert!(rendered.content.as_str().contains("<Tabs groupId=\"os\">"));
        assert_eq!(rendered.diagnostics.unknown_tags().collect::<Vec<_>>(), vec!["Tabs"]);
        assert!(rendered.pagination.as_str().contains("Looker"));
        assert!(!rendered.pagination.as_str().contains("Next"));
        assert!(rendered.toc.as_str().contains("href=\"#features\""));
        assert!(rendered.to_html().as_str().starts_with("<div class=\"docItemContainer\">"));
    }

    #[test]
    fn test_overrides() {
        let registry = registry();
        let key = ModuleId::from(5036u64);
        let options = RenderOptions::default();

        let merged = Overrides::Map(ComponentMap::new().with("Tabs", Component::Fragment));
        let rendered = load_page(&registry, &key, &merged, &options).unwrap();
        assert!(rendered.content.as_str().contains("<h3 id=\"features\">"));
        assert!(!rendered.content.as_str().contains("<Tabs"));
        assert!(!rendered
            .diagnostics
            .warnings
            .iter()
            .any(|w| matches!(w, RenderWarning::UnknownTag { .. })));

        let replaced = Overrides::with(|_| ComponentMap::new());
        let rendered = load_page(&registry, &key, &replaced, &options).unwrap();
        assert!(rendered.content.as_str().contains("<h2 id=\"features\">"));
    }

    #[test]
    fn test_toc_and_navigation_use_render_options() {
        let registry = registry();
        let key = ModuleId::from(5036u64);
        let options = RenderOptions {
            lazy_images: true,
            ..Default::default()
        };
        let overrides = Overrides::Map(ComponentMap::new().with("a", "img"));
        let rendered = load_page(&registry, &key, &overrides, &options).unwrap();

        assert!(rendered.toc.as_str().contains("loading=\"lazy\""));
        assert!(rendered.pagination.as_str().contains("loading=\"lazy\""));

        let module = registry.require(&key).unwrap();
        let page = module.as_page().unwrap();
        let components = overrides.apply(&page.components);
        let renderer = Renderer::new(&components, &options);
        let toc = toc_tree(&page.toc).unwrap();
        assert_eq!(rendered.toc, renderer.render(&toc).markup);
        let nav = pagination(&page.metadata).unwrap();
        assert_eq!(rendered.pagination, renderer.render(&nav).markup);
    }

    #[test]
    fn test_missing_module_is_a_lookup_error() {
        let registry = registry();
        let err = load_page(
            &registry,
            &ModuleId::from(9999u64),
            &Overrides::default(),
            &RenderOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PageError::Registry(RegistryError::Lookup {
                key: ModuleId::from(9999u64)
            })
        );
        assert_eq!(err.to_string(), "module 9999 is not registered (missing chunk?)");
    }

    #[test]
    fn test_runtime_module_is_not_a_page() {
        let registry = registry();
        let err = load_page(
            &registry,
            &ModuleId::from("runtime"),
            &Overrides::default(),
            &RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PageError::NotAPage { .. }));
    }

    #[test]
    fn test_duplicate_page_key_is_rejected() {
        let mut registry = registry();
        let err = registry
            .install_chunk(page_chunk(
                4000u64,
                "runtime-2",
                ComponentMap::new(),
                [(ModuleId::from(5036u64), magento())],
            ))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateKey {
                key: ModuleId::from(5036u64)
            }
        );
        assert!(!registry.contains(&ModuleId::from("runtime-2")));
    }

    #[test]
    fn test_link_pages() {
        let mut pages = vec![magento(), magento()];
        pages[1].metadata.title = "Mailchimp".to_string();
        link_pages(&mut pages);
        assert_eq!(
            pages[0].metadata.next.as_ref().map(|l| l.title.as_str()),
            Some("Mailchimp")
        );
        assert!(pages[0].metadata.previous.is_none());
        assert_eq!(
            pages[1].metadata.previous.as_ref().map(|l| l.title.as_str()),
            Some("Magento")
        );
    }
}
