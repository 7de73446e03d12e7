//! Built-in component defaults.
//!
//! These sit beneath any user map: `inlineCode` renders as `<code>` and the
//! page `wrapper` renders its children only.

use super::types::{Component, ComponentMap};
use mdxsite_core::Tag;
use once_cell::sync::Lazy;

static DEFAULTS: Lazy<ComponentMap> = Lazy::new(default_components);

/// Creates the default component map.
///
/// # Example
///
/// ```
/// use mdxsite_render::components::{Component, default_components};
/// use mdxsite_core::Tag;
///
/// let defaults = default_components();
/// assert_eq!(
///     defaults.resolve(None, &Tag::InlineCode),
///     Some(&Component::Element("code".to_string()))
/// );
/// ```
pub fn default_components() -> ComponentMap {
    ComponentMap::new()
        .with(Tag::InlineCode, "code")
        .with(Tag::Wrapper, Component::Fragment)
}

/// Shared instance of [`default_components`].
pub fn defaults() -> &'static ComponentMap {
    &DEFAULTS
}
