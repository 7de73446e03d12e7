//! Table of contents.

use crate::components::ComponentMap;
use crate::markup::Markup;
use crate::renderer::render;
use mdxsite_core::{ContentNode, Element, Tag, TocEntry};

fn list(entries: &[TocEntry]) -> Element {
    let mut ul = Element::new(Tag::UnorderedList);
    let mut index = 0;
    while index < entries.len() {
        let entry = &entries[index];
        let end = entries[index + 1..]
            .iter()
            .position(|next| next.level <= entry.level)
            .map_or(entries.len(), |offset| index + 1 + offset);

        let mut item = Element::new(Tag::ListItem).child(
            Element::new(Tag::Link)
                .attr("className", "table-of-contents__link")
                .attr("href", format!("#{}", entry.id))
                .text(entry.value.as_str()),
        );
        if end > index + 1 {
            item = item.child(list(&entries[index + 1..end]));
        }
        ul = ul.child(item);
        index = end;
    }
    ul
}

/// Nested list of links to the page's headings.
///
/// Entries deeper than the one before them are nested under it.
pub fn toc_tree(entries: &[TocEntry]) -> Option<ContentNode> {
    if entries.is_empty() {
        return None;
    }
    Some(
        list(entries)
            .attr("className", "table-of-contents table-of-contents__left-border")
            .into(),
    )
}

/// Renders [`toc_tree`]; empty for a page without headings.
pub fn render_toc(entries: &[TocEntry], components: &ComponentMap) -> Markup {
    toc_tree(entries)
        .map(|node| render(&node, components))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &str, level: u8) -> TocEntry {
        TocEntry {
            value: value.to_string(),
            id: mdxsite_core::slugify(value),
            level,
        }
    }

    #[test]
    fn test_nesting() {
        let entries = vec![
            entry("Overview", 2),
            entry("Output schema", 3),
            entry("Features", 3),
            entry("Getting started", 2),
        ];
        let html = render_toc(&entries, &ComponentMap::new());
        assert_eq!(
            html.as_str(),
            "<ul class=\"table-of-contents table-of-contents__left-border\">\
             <li><a class=\"table-of-contents__link\" href=\"#overview\">Overview</a>\
             <ul><li><a class=\"table-of-contents__link\" href=\"#output-schema\">Output schema</a></li>\
             <li><a class=\"table-of-contents__link\" href=\"#features\">Features</a></li></ul></li>\
             <li><a class=\"table-of-contents__link\" href=\"#getting-started\">Getting started</a></li></ul>"
        );
    }

    #[test]
    fn test_empty() {
        assert!(toc_tree(&[]).is_none());
        assert!(render_toc(&[], &ComponentMap::new()).is_empty());
    }

    #[test]
    fn test_starts_deeper() {
        let entries = vec![entry("Deep", 3), entry("Shallow", 2)];
        let node = toc_tree(&entries).unwrap();
        let ul = node.as_element().unwrap();
        assert_eq!(ul.children.len(), 2);
    }
}
