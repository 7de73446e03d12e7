#![deny(missing_docs)]
//! mdxsite render: component maps, the MDX render helper, and page loading.

/// Component maps and overrides.
pub mod components;
/// Render and site configuration.
pub mod config;
/// HTML fragments and escaping.
pub mod markup;
/// Previous / next navigation.
pub mod navigation;
/// Page modules, chunks, and loading.
pub mod page;
/// Content tree rendering.
pub mod renderer;
/// Table of contents rendering.
pub mod toc;

pub use components::{
    Component, ComponentKey, ComponentMap, Overrides, Props, default_components,
    merge_components,
};
pub use config::{ConfigError, RenderOptions, SiteConfig};
pub use markup::Markup;
pub use navigation::{pagination, render_pagination};
pub use page::{
    PageError, PageModule, RenderedPage, SiteModule, link_pages, load_page, page_chunk,
    render_page,
};
pub use renderer::{RenderOutput, Renderer, render};
pub use toc::{render_toc, toc_tree};
