//! The render helper: content trees to markup.
//!
//! Each element is rendered by the first of
//!
//! 1. the `parent.tag` entry of the component map,
//! 2. the `tag` entry of the component map,
//! 3. the built-in defaults (`inlineCode`, `wrapper`),
//! 4. the intrinsic renderer for the tag.
//!
//! Custom tags that reach step 4 are written out as-is with their attributes
//! and children, and reported once as [`RenderWarning::UnknownTag`].
//!
//! [`RenderWarning::UnknownTag`]: mdxsite_core::RenderWarning::UnknownTag

mod admonition;
mod context;
mod dispatch;

use crate::components::ComponentMap;
use crate::config::RenderOptions;
use crate::markup::Markup;
use context::Context;
use mdxsite_core::{ContentNode, Diagnostics};

/// Markup and the warnings raised while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    /// Rendered HTML.
    pub markup: Markup,
    /// Recovered problems, such as unknown tags.
    pub diagnostics: Diagnostics,
}

/// Renders content trees with a fixed component map.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    components: &'a ComponentMap,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer.
    pub fn new(components: &'a ComponentMap, options: &'a RenderOptions) -> Self {
        Self {
            components,
            options,
        }
    }

    /// Renders `node`. Never fails; the same input always yields the same markup.
    pub fn render(&self, node: &ContentNode) -> RenderOutput {
        let mut ctx = Context::new(self.components, self.options);
        let markup = dispatch::render_node(node, &mut ctx);
        RenderOutput {
            markup,
            diagnostics: ctx.finish(),
        }
    }
}

/// Renders `node` with `components` and the default options.
pub fn render(node: &ContentNode, components: &ComponentMap) -> Markup {
    Renderer::new(components, &RenderOptions::default())
        .render(node)
        .markup
}
