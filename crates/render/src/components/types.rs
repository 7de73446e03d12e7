//! Component map types.

use crate::markup::Markup;
use mdxsite_core::{Attributes, Tag};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Render function of a custom component.
pub type RenderFn = Arc<dyn Fn(&Props<'_>) -> Markup + Send + Sync>;

/// How a tag is rendered.
#[derive(Clone)]
pub enum Component {
    /// Render the node as this intrinsic HTML element instead.
    Element(String),
    /// Emit the children without an enclosing element.
    Fragment,
    /// Call a render function.
    Custom(RenderFn),
}

impl Component {
    /// Wraps a render function.
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&Props<'_>) -> Markup + Send + Sync + 'static,
    {
        Component::Custom(Arc::new(render))
    }

    /// Renders `props` with this component.
    pub fn render(&self, props: &Props<'_>) -> Markup {
        match self {
            Component::Element(name) => crate::markup::write_element(
                name,
                props.attributes,
                &[],
                props.children,
                Tag::from_name(name).is_void(),
            ),
            Component::Fragment => props.children.clone(),
            Component::Custom(render) => render(props),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Element(name) => f.debug_tuple("Element").field(name).finish(),
            Component::Fragment => f.write_str("Fragment"),
            Component::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Component::Element(a), Component::Element(b)) => a == b,
            (Component::Fragment, Component::Fragment) => true,
            (Component::Custom(a), Component::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Component {
    fn from(name: &str) -> Self {
        Component::Element(name.to_string())
    }
}

/// Inputs handed to a component.
#[derive(Debug, Clone, Copy)]
pub struct Props<'a> {
    /// Tag of the node being rendered.
    pub tag: &'a Tag,
    /// Tag of the enclosing element, if any.
    pub parent: Option<&'a Tag>,
    /// Node attributes as written in the source.
    pub attributes: &'a Attributes,
    /// Already rendered children.
    pub children: &'a Markup,
    /// Components in scope, for components that render nested content.
    pub components: &'a ComponentMap,
}

impl Props<'_> {
    /// Looks up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Map key: a tag, optionally scoped to a parent tag (`li.p`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKey {
    /// Enclosing tag the entry is restricted to.
    pub parent: Option<Tag>,
    /// Tag the entry renders.
    pub tag: Tag,
}

impl ComponentKey {
    /// Key matching `tag` anywhere.
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            parent: None,
            tag: tag.into(),
        }
    }

    /// Key matching `tag` only directly inside `parent`.
    pub fn scoped(parent: impl Into<Tag>, tag: impl Into<Tag>) -> Self {
        Self {
            parent: Some(parent.into()),
            tag: tag.into(),
        }
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        match key.split_once('.') {
            Some((parent, tag)) => ComponentKey::scoped(parent, tag),
            None => ComponentKey::new(key),
        }
    }
}

impl From<Tag> for ComponentKey {
    fn from(tag: Tag) -> Self {
        ComponentKey { parent: None, tag }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}.{}", parent, self.tag),
            None => write!(f, "{}", self.tag),
        }
    }
}

/// Per-context mapping from tags to components.
///
/// Maps are never mutated once handed to a renderer; scopes that add
/// overrides build a new map with [`merge_components`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMap {
    entries: BTreeMap<ComponentKey, Component>,
}

impl ComponentMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<ComponentKey>,
        component: impl Into<Component>,
    ) -> Option<Component> {
        self.entries.insert(key.into(), component.into())
    }

    /// Builder form of [`ComponentMap::insert`].
    pub fn with(mut self, key: impl Into<ComponentKey>, component: impl Into<Component>) -> Self {
        self.insert(key, component);
        self
    }

    /// Entry stored under exactly `key`.
    pub fn get(&self, key: &ComponentKey) -> Option<&Component> {
        self.entries.get(key)
    }

    /// Component for `tag` inside `parent`: the scoped entry wins over the plain one.
    pub fn resolve(&self, parent: Option<&Tag>, tag: &Tag) -> Option<&Component> {
        if let Some(parent) = parent {
            let scoped = ComponentKey {
                parent: Some(parent.clone()),
                tag: tag.clone(),
            };
            if let Some(component) = self.entries.get(&scoped) {
                return Some(component);
            }
        }
        self.entries.get(&ComponentKey {
            parent: None,
            tag: tag.clone(),
        })
    }

    /// Returns true if an entry exists under exactly `key`.
    pub fn contains_key(&self, key: &ComponentKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.entries.keys()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, &Component)> {
        self.entries.iter()
    }

    /// `self` with `overrides` layered on top.
    pub fn merged(&self, overrides: &ComponentMap) -> ComponentMap {
        merge_components(self, overrides)
    }
}

impl<K: Into<ComponentKey>, C: Into<Component>> FromIterator<(K, C)> for ComponentMap {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, component)| (key.into(), component.into()))
                .collect(),
        }
    }
}

/// Returns a new map with every entry of `parent`, replaced by `overrides`
/// where both have the key. Neither input is modified.
pub fn merge_components(parent: &ComponentMap, overrides: &ComponentMap) -> ComponentMap {
    if overrides.is_empty() {
        return parent.clone();
    }
    let mut entries = parent.entries.clone();
    for (key, component) in &overrides.entries {
        entries.insert(key.clone(), component.clone());
    }
    ComponentMap { entries }
}

/// Components a scope adds on top of the ones it inherits.
#[derive(Clone)]
pub enum Overrides {
    /// Entries merged over the inherited map.
    Map(ComponentMap),
    /// Builds the scope's map from the inherited one; the result replaces it.
    With(Arc<dyn Fn(&ComponentMap) -> ComponentMap + Send + Sync>),
}

impl Overrides {
    /// Wraps a function override.
    pub fn with<F>(build: F) -> Self
    where
        F: Fn(&ComponentMap) -> ComponentMap + Send + Sync + 'static,
    {
        Overrides::With(Arc::new(build))
    }

    /// Map in effect for the scope given the inherited `parent` map.
    pub fn apply(&self, parent: &ComponentMap) -> ComponentMap {
        match self {
            Overrides::Map(overrides) => merge_components(parent, overrides),
            Overrides::With(build) => build(parent),
        }
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Overrides::Map(ComponentMap::new())
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overrides::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Overrides::With(_) => f.write_str("With(..)"),
        }
    }
}

impl From<ComponentMap> for Overrides {
    fn from(map: ComponentMap) -> Self {
        Overrides::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_link() -> Component {
        Component::custom(|props: &Props<'_>| {
            let mut out = Markup::from_trusted("<b>");
            out.push(props.children);
            out.push_trusted("</b>");
            out
        })
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(ComponentKey::from("p"), ComponentKey::new(Tag::Paragraph));
        assert_eq!(
            ComponentKey::from("li.p"),
            ComponentKey::scoped(Tag::ListItem, Tag::Paragraph)
        );
        assert_eq!(ComponentKey::from("li.p").to_string(), "li.p");
        assert_eq!(
            ComponentKey::from("Tabs").tag,
            Tag::Custom("Tabs".to_string())
        );
    }

    #[test]
    fn test_merge_keeps_parent_and_prefers_overrides() {
        let parent = ComponentMap::new()
            .with("p", "div")
            .with("h2", "h3")
            .with("wrapper", Component::Fragment);
        let overrides = ComponentMap::new().with("p", "section").with("a", strong_link());
        let parent_before = parent.clone();
        let overrides_before = overrides.clone();

        let merged = merge_components(&parent, &overrides);

        assert_eq!(merged.len(), 4);
        assert_eq!(
            merged.get(&"p".into()),
            Some(&Component::Element("section".to_string()))
        );
        assert_eq!(
            merged.get(&"h2".into()),
            Some(&Component::Element("h3".to_string()))
        );
        assert_eq!(merged.get(&"wrapper".into()), Some(&Component::Fragment));
        assert!(matches!(merged.get(&"a".into()), Some(Component::Custom(_))));
        assert_eq!(parent, parent_before);
        assert_eq!(overrides, overrides_before);
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let map = ComponentMap::new().with("p", "div");
        assert_eq!(merge_components(&map, &ComponentMap::new()), map);
        assert_eq!(merge_components(&ComponentMap::new(), &map), map);
    }

    #[test]
    fn test_scoped_entry_wins_inside_parent() {
        let map = ComponentMap::new().with("p", "div").with("li.p", Component::Fragment);
        assert_eq!(
            map.resolve(Some(&Tag::ListItem), &Tag::Paragraph),
            Some(&Component::Fragment)
        );
        assert_eq!(
            map.resolve(Some(&Tag::Blockquote), &Tag::Paragraph),
            Some(&Component::Element("div".to_string()))
        );
        assert_eq!(
            map.resolve(None, &Tag::Paragraph),
            Some(&Component::Element("div".to_string()))
        );
        assert_eq!(map.resolve(None, &Tag::Link), None);
    }

    #[test]
    fn test_overrides_apply() {
        let parent = ComponentMap::new().with("p", "div");
        let merged = Overrides::Map(ComponentMap::new().with("a", "span")).apply(&parent);
        assert_eq!(merged.len(), 2);

        let replaced = Overrides::with(|_| ComponentMap::new().with("h1", "h2")).apply(&parent);
        assert_eq!(replaced.len(), 1);
        assert!(replaced.get(&"p".into()).is_none());

        assert_eq!(Overrides::default().apply(&parent), parent);
    }

    #[test]
    fn test_custom_components_compare_by_identity() {
        let a = strong_link();
        let b = strong_link();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
