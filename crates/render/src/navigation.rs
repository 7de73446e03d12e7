//! Previous / next page navigation.

use crate::components::ComponentMap;
use crate::markup::Markup;
use crate::renderer::render;
use mdxsite_core::{ContentNode, Element, NavLink, PageMetadata, Tag};

fn div(class_name: &str) -> Element {
    Element::new(Tag::Html("div".to_string())).attr("className", class_name)
}

fn nav_item(link: &NavLink, sublabel: &str) -> Element {
    Element::new(Tag::Link)
        .attr("className", "pagination-nav__link")
        .attr("href", link.permalink.as_str())
        .child(div("pagination-nav__sublabel").text(sublabel))
        .child(div("pagination-nav__label").text(link.title.as_str()))
}

/// Navigation block linking to the neighbouring pages.
///
/// Returns `None` when the page has neither neighbour. A missing previous page
/// leaves an empty first item so the next link keeps its position.
pub fn pagination(meta: &PageMetadata) -> Option<ContentNode> {
    if meta.previous.is_none() && meta.next.is_none() {
        return None;
    }

    let mut previous = div("pagination-nav__item");
    if let Some(link) = &meta.previous {
        previous = previous.child(nav_item(link, "Previous"));
    }
    let mut nav = Element::new(Tag::Html("nav".to_string()))
        .attr("className", "pagination-nav")
        .attr("aria-label", "Docs pages navigation")
        .child(previous);
    if let Some(link) = &meta.next {
        nav = nav.child(
            div("pagination-nav__item pagination-nav__item--next").child(nav_item(link, "Next")),
        );
    }
    Some(nav.into())
}

/// Renders [`pagination`]; empty when there is nothing to link to.
pub fn render_pagination(meta: &PageMetadata, components: &ComponentMap) -> Markup {
    pagination(meta)
        .map(|node| render(&node, components))
        .unwrap_or_default()
}
