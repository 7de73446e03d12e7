//! Rendering state for one pass over a content tree.

use crate::components::{Component, ComponentMap, defaults};
use crate::config::RenderOptions;
use mdxsite_core::{Diagnostics, RenderWarning, Tag};

/// Tracks the enclosing elements and the warnings raised so far.
pub(super) struct Context<'a> {
    components: &'a ComponentMap,
    options: &'a RenderOptions,
    parents: Vec<Tag>,
    diagnostics: Diagnostics,
}

impl<'a> Context<'a> {
    pub(super) fn new(components: &'a ComponentMap, options: &'a RenderOptions) -> Self {
        Self {
            components,
            options,
            parents: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(super) fn components(&self) -> &'a ComponentMap {
        self.components
    }

    pub(super) fn options(&self) -> &'a RenderOptions {
        self.options
    }

    /// Tag of the innermost enclosing element.
    pub(super) fn parent(&self) -> Option<&Tag> {
        self.parents.last()
    }

    /// Component for `tag` in the current scope: user entries first, then defaults.
    pub(super) fn resolve(&self, tag: &Tag) -> Option<&'a Component> {
        let parent = self.parents.last();
        self.components
            .resolve(parent, tag)
            .or_else(|| defaults().resolve(parent, tag))
    }

    /// Enters an element; its children see it as their parent.
    ///
    /// The page wrapper is transparent: top-level nodes have no parent.
    pub(super) fn enter(&mut self, tag: &Tag) -> bool {
        if *tag == Tag::Wrapper {
            return false;
        }
        self.parents.push(tag.clone());
        true
    }

    pub(super) fn exit(&mut self, entered: bool) {
        if entered {
            self.parents.pop();
        }
    }

    /// Records a tag nothing could render. Logged once per distinct tag.
    pub(super) fn unknown_tag(&mut self, tag: &Tag) {
        let name = tag.name();
        if self.diagnostics.unknown_tags().any(|seen| seen == name) {
            return;
        }
        let warning = RenderWarning::UnknownTag {
            tag: name.to_string(),
            parent: self.parent().map(|p| p.name().to_string()),
        };
        if self.options.warn_unknown_tags {
            log::warn!("{}; rendering it as a plain element", warning);
        } else {
            log::debug!("{}; rendering it as a plain element", warning);
        }
        self.diagnostics.warn(warning);
    }

    pub(super) fn finish(self) -> Diagnostics {
        self.diagnostics
    }
}
