use insta::assert_snapshot;
use mdxsite_core::{ContentNode, Element, NavLink, PageMetadata, Tag};
use mdxsite_render::{
    Component, ComponentMap, Markup, Props, RenderOptions, Renderer, merge_components, render,
    render_pagination,
};

fn info_admonition() -> ContentNode {
    Element::new(Tag::Admonition)
        .attr("type", "info")
        .child(Element::new(Tag::Paragraph).text("Reach out to your service representative."))
        .into()
}

#[test]
fn admonition_with_icon() {
    let html = render(&info_admonition(), &ComponentMap::new());
    assert_snapshot!(html.as_str(), @r#"<div class="admonition admonition-info alert alert--info"><div class="admonition-heading"><h5><span class="admonition-icon"><svg height="16" viewBox="0 0 14 16" width="14" xmlns="http://www.w3.org/2000/svg"><path d="M7 2.3c3.14 0 5.7 2.56 5.7 5.7s-2.56 5.7-5.7 5.7A5.71 5.71 0 0 1 1.3 8c0-3.14 2.56-5.7 5.7-5.7zM7 1C3.14 1 0 4.14 0 8s3.14 7 7 7 7-3.14 7-7-3.14-7-7-7zm1 3H6v5h2V4zm0 6H6v2h2v-2z" fill-rule="evenodd"></path></svg></span>info</h5></div><div class="admonition-content"><p>Reach out to your service representative.</p></div></div>"#);
}

#[test]
fn admonition_parts_can_be_overridden() {
    let components = ComponentMap::new()
        .with("h5", "strong")
        .with("span", Component::Fragment)
        .with("svg", Component::custom(|_: &Props<'_>| Markup::new()));
    let options = RenderOptions::default();
    let output = Renderer::new(&components, &options).render(&info_admonition());
    assert_snapshot!(output.markup.as_str(), @r#"<div class="admonition admonition-info alert alert--info"><div class="admonition-heading"><strong>info</strong></div><div class="admonition-content"><p>Reach out to your service representative.</p></div></div>"#);
    assert!(!output.diagnostics.has_warnings());
}

#[test]
fn unknown_tag_with_empty_map_keeps_attributes_and_children() {
    let node: ContentNode = Element::new("ConnectorSpec")
        .attr("sourceType", "database")
        .attr("className", "connector")
        .child(Element::new(Tag::Strong).text("Magento"))
        .text(" & MySQL")
        .into();
    let html = render(&node, &ComponentMap::new());
    assert_snapshot!(html.as_str(), @r#"<ConnectorSpec class="connector" sourceType="database"><strong>Magento</strong> &amp; MySQL</ConnectorSpec>"#);
}

#[test]
fn merged_maps_render_like_their_layers() {
    let site = ComponentMap::new().with("p", "section").with("a", "span");
    let page = ComponentMap::new().with("a", Component::Fragment);
    let merged = merge_components(&site, &page);
    let node: ContentNode = Element::new(Tag::Paragraph)
        .child(Element::new(Tag::Link).attr("href", "/x").text("link"))
        .into();

    assert_eq!(render(&node, &merged).as_str(), "<section>link</section>");
    assert_eq!(
        render(&node, &site).as_str(),
        "<section><span href=\"/x\">link</span></section>"
    );
}

#[test]
fn magento_pagination() {
    let meta = PageMetadata {
        title: "Magento".to_string(),
        previous: Some(NavLink {
            title: "Looker".to_string(),
            permalink: "/integrations/sources/looker".to_string(),
        }),
        next: Some(NavLink {
            title: "Mailchimp".to_string(),
            permalink: "/integrations/sources/mailchimp".to_string(),
        }),
        ..Default::default()
    };
    let html = render_pagination(&meta, &ComponentMap::new());
    assert_eq!(html.as_str().matches("<a ").count(), 2);
    assert_snapshot!(html.as_str(), @r#"<nav aria-label="Docs pages navigation" class="pagination-nav"><div class="pagination-nav__item"><a class="pagination-nav__link" href="/integrations/sources/looker"><div class="pagination-nav__sublabel">Previous</div><div class="pagination-nav__label">Looker</div></a></div><div class="pagination-nav__item pagination-nav__item--next"><a class="pagination-nav__link" href="/integrations/sources/mailchimp"><div class="pagination-nav__sublabel">Next</div><div class="pagination-nav__label">Mailchimp</div></a></div></nav>"#);
}
