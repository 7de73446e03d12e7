//! Expansion of `admonition` nodes into the classic callout markup.

use crate::config::RenderOptions;
use mdxsite_core::{Element, Tag};

const ICON_PATH: &str = "M7 2.3c3.14 0 5.7 2.56 5.7 5.7s-2.56 5.7-5.7 5.7A5.71 5.71 0 0 1 1.3 8c0-3.14 2.56-5.7 5.7-5.7zM7 1C3.14 1 0 4.14 0 8s3.14 7 7 7 7-3.14 7-7-3.14-7-7-7zm1 3H6v5h2V4zm0 6H6v2h2v-2z";

/// Alert colour class for an admonition kind.
fn alert_class(kind: &str) -> &str {
    match kind {
        "note" => "secondary",
        "tip" => "success",
        "caution" => "warning",
        other => other,
    }
}

fn div(class_name: &str) -> Element {
    Element::new(Tag::Html("div".to_string())).attr("className", class_name)
}

fn icon() -> Element {
    let path = Element::new(Tag::Html("path".to_string()))
        .attr("fillRule", "evenodd")
        .attr("d", ICON_PATH);
    let svg = Element::new(Tag::Html("svg".to_string()))
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", "14")
        .attr("height", "16")
        .attr("viewBox", "0 0 14 16")
        .child(path);
    Element::new(Tag::Html("span".to_string()))
        .attr("className", "admonition-icon")
        .child(svg)
}

/// Rewrites an admonition as plain elements.
///
/// ```text
/// div.admonition.admonition-{kind}.alert.alert--{colour}
///   div.admonition-heading > h5 > [span.admonition-icon > svg] title
///   div.admonition-content > children
/// ```
///
/// The title defaults to the kind. The result is rendered through the normal
/// dispatch, so each part can be overridden.
pub(super) fn expand(admonition: &Element, options: &RenderOptions) -> Element {
    let kind = admonition.get_attr("type").unwrap_or("note");
    let title = admonition.get_attr("title").unwrap_or(kind);

    let mut heading = Element::new(Tag::Heading(5));
    if options.admonition_icons {
        heading = heading.child(icon());
    }
    heading = heading.text(title);

    let mut outer = div(&format!(
        "admonition admonition-{} alert alert--{}",
        kind,
        alert_class(kind)
    ));
    for (name, value) in &admonition.attributes {
        if !matches!(name.as_str(), "type" | "title" | "className") {
            outer = outer.attr(name.clone(), value.clone());
        }
    }

    outer
        .child(div("admonition-heading").child(heading))
        .child(
            div("admonition-content").with_children(admonition.children.iter().cloned()),
        )
}
