//! Node dispatch.

use super::admonition;
use super::context::Context;
use crate::components::{Component, Props};
use crate::markup::{Markup, write_element};
use mdxsite_core::{ContentNode, Element, Tag};

pub(super) fn render_node(node: &ContentNode, ctx: &mut Context) -> Markup {
    match node {
        ContentNode::Text(text) => Markup::text(text),
        ContentNode::Raw(html) => Markup::from_trusted(html.as_str()),
        ContentNode::Element(element) => render_element(element, ctx),
    }
}

fn render_children(element: &Element, ctx: &mut Context) -> Markup {
    let entered = ctx.enter(&element.tag);
    let children = element
        .children
        .iter()
        .map(|child| render_node(child, ctx))
        .collect();
    ctx.exit(entered);
    children
}

/// Renders an element with the component in scope, or the built-in renderer.
fn render_element(element: &Element, ctx: &mut Context) -> Markup {
    if let Some(component) = ctx.resolve(&element.tag) {
        let children = render_children(element, ctx);
        let props = Props {
            tag: &element.tag,
            parent: ctx.parent(),
            attributes: &element.attributes,
            children: &children,
            components: ctx.components(),
        };
        return match component {
            Component::Element(name) => render_intrinsic(name, element, &children, ctx),
            other => other.render(&props),
        };
    }

    match &element.tag {
        Tag::Admonition => {
            let expanded = admonition::expand(element, ctx.options());
            render_element(&expanded, ctx)
        }
        Tag::Wrapper => render_children(element, ctx),
        Tag::Custom(name) => {
            ctx.unknown_tag(&element.tag);
            let children = render_children(element, ctx);
            write_element(name, &element.attributes, &[], &children, false)
        }
        tag => {
            let children = render_children(element, ctx);
            let name = tag.html_name().unwrap_or_else(|| tag.name());
            render_intrinsic(name, element, &children, ctx)
        }
    }
}

/// Writes `element` as the HTML element `name`.
fn render_intrinsic(name: &str, element: &Element, children: &Markup, ctx: &Context) -> Markup {
    let tag = Tag::from_name(name);
    let options = ctx.options();
    match tag {
        Tag::Image if options.lazy_images && !element.attributes.contains_key("loading") => {
            write_element(name, &element.attributes, &[("loading", "lazy")], children, true)
        }
        Tag::Heading(_) if options.heading_anchors && !contains_link(element) => {
            match element.get_attr("id") {
                Some(id) => {
                    let href = format!("#{}", id);
                    let anchor = write_element(
                        "a",
                        &Default::default(),
                        &[("href", href.as_str())],
                        children,
                        false,
                    );
                    write_element(name, &element.attributes, &[], &anchor, false)
                }
                None => write_element(name, &element.attributes, &[], children, false),
            }
        }
        _ => write_element(name, &element.attributes, &[], children, tag.is_void()),
    }
}

fn contains_link(element: &Element) -> bool {
    element.children.iter().any(|child| {
        let mut found = false;
        child.walk_elements(&mut |e| found |= e.tag == Tag::Link);
        found
    })
}
