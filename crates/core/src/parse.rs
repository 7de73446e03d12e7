//! Build-time conversion of Markdown/MDX page sources into content trees.

use crate::admonition::{DEFAULT_KINDS, Segment, split_segments};
use crate::error::{Diagnostics, RenderWarning, SiteError, SourceLocation};
use crate::frontmatter::extract_frontmatter;
use crate::metadata::TocEntry;
use crate::node::{ContentNode, Element, Tag};
use crate::slug::{Slugger, extract_custom_id};
use markdown::mdast::{self, AlignKind, AttributeContent, AttributeValue, Node};
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// GitHub Flavored Markdown (tables, strikethrough, task lists, autolinks).
    pub gfm: bool,
    /// MDX JSX elements (`<Tabs>`, `<details>`).
    pub mdx_jsx: bool,
    /// `:::kind` admonition fences.
    pub admonitions: bool,
    /// Kinds accepted as admonitions.
    pub admonition_kinds: Vec<String>,
    /// Keep raw HTML as trusted markup.
    pub raw_html: bool,
    /// Shallowest heading level listed in the table of contents.
    pub toc_min_level: u8,
    /// Deepest heading level listed in the table of contents.
    pub toc_max_level: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            mdx_jsx: true,
            admonitions: true,
            admonition_kinds: DEFAULT_KINDS.iter().map(|k| k.to_string()).collect(),
            raw_html: false,
            toc_min_level: 2,
            toc_max_level: 3,
        }
    }
}

impl ParseOptions {
    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(&self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: false,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };
        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }
        if self.mdx_jsx {
            constructs.code_indented = false;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }
        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

/// A page source turned into its build-time exports.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Frontmatter object (empty when absent).
    pub front_matter: JsonValue,
    /// Content tree rooted at a `wrapper` element.
    pub content: ContentNode,
    /// Headings within the configured table-of-contents levels.
    pub toc: Vec<TocEntry>,
    /// Text of the first `h1`, if any.
    pub content_title: Option<String>,
    /// Recovered problems.
    pub diagnostics: Diagnostics,
}

impl ParsedDocument {
    /// Text of the first paragraph, used as a fallback description.
    pub fn first_paragraph(&self) -> Option<String> {
        let mut found = None;
        self.content.walk_elements(&mut |element| {
            if found.is_none() && element.tag == Tag::Paragraph {
                let text = ContentNode::Element(element.clone()).text_content();
                let text = text.trim();
                if !text.is_empty() {
                    found = Some(text.to_string());
                }
            }
        });
        found
    }
}

/// Parses a page source (frontmatter + Markdown/MDX body).
pub fn parse_document(source: &str, options: &ParseOptions) -> Result<ParsedDocument, SiteError> {
    let extraction = extract_frontmatter(source)?;
    let body = &source[extraction.body_start..];
    let first_line = source[..extraction.body_start].matches('\n').count() + 1;

    let segments = if options.admonitions {
        split_segments(body, first_line, options.admonition_kinds.as_slice())
    } else {
        vec![Segment::Markdown {
            text: body.to_string(),
            line: first_line,
        }]
    };

    let mut builder = TreeBuilder::new(options);
    builder.share_definitions(&segments);
    let children = builder.convert_segments(&segments)?;
    let content = Element::new(Tag::Wrapper).with_children(children).into();

    let toc = builder
        .headings
        .iter()
        .filter(|h| (options.toc_min_level..=options.toc_max_level).contains(&h.level))
        .cloned()
        .collect();
    let content_title = builder
        .headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.value.clone());

    Ok(ParsedDocument {
        front_matter: extraction.value,
        content,
        toc,
        content_title,
        diagnostics: builder.diagnostics,
    })
}

type Definitions = HashMap<String, (String, Option<String>)>;

struct TreeBuilder<'a> {
    options: &'a ParseOptions,
    markdown_options: markdown::ParseOptions,
    slugger: Slugger,
    headings: Vec<TocEntry>,
    diagnostics: Diagnostics,
    /// Page-wide definitions as Markdown, appended to every segment.
    shared_definitions: String,
}

impl<'a> TreeBuilder<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            markdown_options: options.to_markdown(),
            slugger: Slugger::new(),
            headings: Vec::new(),
            diagnostics: Diagnostics::new(),
            shared_definitions: String::new(),
        }
    }

    /// Makes `[label]: url` definitions visible to references in every segment.
    ///
    /// Admonition fences split a page into separately parsed segments, so a
    /// definition at the bottom of the page would otherwise not resolve a
    /// reference inside an admonition.
    fn share_definitions(&mut self, segments: &[Segment]) {
        if count_markdown_segments(segments) < 2 {
            return;
        }
        let mut definitions = Vec::new();
        self.gather_definitions(segments, &mut definitions);
        let mut seen = HashSet::new();
        for definition in definitions {
            if seen.insert(definition.identifier.to_lowercase()) {
                self.shared_definitions.push_str(&definition_source(&definition));
            }
        }
    }

    fn gather_definitions(&self, segments: &[Segment], out: &mut Vec<mdast::Definition>) {
        for segment in segments {
            match segment {
                Segment::Markdown { text, .. } => {
                    // Errors are reported when the segment is converted.
                    if let Ok(tree) = markdown::to_mdast(text, &self.markdown_options) {
                        definition_nodes(&tree, out);
                    }
                }
                Segment::Admonition { children, .. } => self.gather_definitions(children, out),
            }
        }
    }

    fn convert_segments(&mut self, segments: &[Segment]) -> Result<Vec<ContentNode>, SiteError> {
        let mut out = Vec::new();
        for segment in segments {
            match segment {
                Segment::Markdown { text, line } => {
                    let source = if self.shared_definitions.is_empty() {
                        Cow::Borrowed(text.as_str())
                    } else {
                        let mut source = text.clone();
                        if !source.ends_with('\n') {
                            source.push('\n');
                        }
                        source.push('\n');
                        source.push_str(&self.shared_definitions);
                        Cow::Owned(source)
                    };
                    let tree = markdown::to_mdast(&source, &self.markdown_options)
                        .map_err(|message| parse_error(&message, *line))?;
                    let mut definitions = Definitions::new();
                    collect_definitions(&tree, &mut definitions);
                    self.convert(&tree, &definitions, &mut out);
                }
                Segment::Admonition {
                    opening,
                    line,
                    children,
                    closed,
                } => {
                    if !closed {
                        self.diagnostics.warn(RenderWarning::UnclosedAdmonition {
                            location: SourceLocation::new(*line, 1),
                            kind: opening.kind.clone(),
                        });
                    }
                    let mut element = Element::new(Tag::Admonition).attr("type", &opening.kind);
                    if let Some(title) = &opening.title {
                        element = element.attr("title", title);
                    }
                    let inner = self.convert_segments(children)?;
                    out.push(element.with_children(inner).into());
                }
            }
        }
        Ok(out)
    }

    fn convert_children(&mut self, children: &[Node], defs: &Definitions) -> Vec<ContentNode> {
        let mut out = Vec::new();
        for child in children {
            self.convert(child, defs, &mut out);
        }
        out
    }

    fn element(&mut self, tag: Tag, children: &[Node], defs: &Definitions) -> Element {
        Element::new(tag).with_children(self.convert_children(children, defs))
    }

    fn convert(&mut self, node: &Node, defs: &Definitions, out: &mut Vec<ContentNode>) {
        let converted: Element = match node {
            Node::Root(root) => {
                out.extend(self.convert_children(&root.children, defs));
                return;
            }
            Node::Text(text) => {
                out.push(ContentNode::Text(text.value.clone()));
                return;
            }
            Node::Paragraph(p) => self.element(Tag::Paragraph, &p.children, defs),
            Node::Heading(heading) => self.heading(heading, defs),
            Node::Emphasis(em) => self.element(Tag::Emphasis, &em.children, defs),
            Node::Strong(strong) => self.element(Tag::Strong, &strong.children, defs),
            Node::Delete(del) => self.element(Tag::Delete, &del.children, defs),
            Node::InlineCode(code) => Element::new(Tag::InlineCode).text(code.value.clone()),
            Node::Code(code) => code_block(code),
            Node::Link(link) => {
                let mut element = self
                    .element(Tag::Link, &link.children, defs)
                    .attr("href", link.url.clone());
                if let Some(title) = &link.title {
                    element = element.attr("title", title.clone());
                }
                element
            }
            Node::Image(image) => image_element(&image.url, &image.alt, image.title.as_deref()),
            Node::LinkReference(reference) => {
                match defs.get(&reference.identifier.to_lowercase()) {
                    Some((url, title)) => {
                        let mut element = self
                            .element(Tag::Link, &reference.children, defs)
                            .attr("href", url.clone());
                        if let Some(title) = title {
                            element = element.attr("title", title.clone());
                        }
                        element
                    }
                    None => {
                        out.extend(self.convert_children(&reference.children, defs));
                        return;
                    }
                }
            }
            Node::ImageReference(reference) => {
                match defs.get(&reference.identifier.to_lowercase()) {
                    Some((url, title)) => image_element(url, &reference.alt, title.as_deref()),
                    None => {
                        out.push(ContentNode::Text(reference.alt.clone()));
                        return;
                    }
                }
            }
            Node::List(list) => self.list(list, defs),
            Node::ListItem(item) => self.list_item(item, false, defs),
            Node::Blockquote(quote) => self.element(Tag::Blockquote, &quote.children, defs),
            Node::ThematicBreak(_) => Element::new(Tag::ThematicBreak),
            Node::Break(_) => Element::new(Tag::Break),
            Node::Table(table) => self.table(table, defs),
            Node::Html(html) => {
                if self.options.raw_html {
                    out.push(ContentNode::Raw(html.value.clone()));
                } else {
                    out.push(ContentNode::Text(html.value.clone()));
                }
                return;
            }
            Node::MdxJsxFlowElement(jsx) => {
                match self.jsx(jsx.name.as_deref(), &jsx.attributes, &jsx.children, defs) {
                    Ok(element) => element,
                    Err(children) => {
                        out.extend(children);
                        return;
                    }
                }
            }
            Node::MdxJsxTextElement(jsx) => {
                match self.jsx(jsx.name.as_deref(), &jsx.attributes, &jsx.children, defs) {
                    Ok(element) => element,
                    Err(children) => {
                        out.extend(children);
                        return;
                    }
                }
            }
            Node::Definition(_) | Node::Yaml(_) | Node::Toml(_) => return,
            other => {
                log::debug!("skipping unsupported markdown node: {:?}", other);
                return;
            }
        };
        out.push(converted.into());
    }

    fn heading(&mut self, heading: &mdast::Heading, defs: &Definitions) -> Element {
        let mut children = self.convert_children(&heading.children, defs);
        let full_text = children
            .iter()
            .map(ContentNode::text_content)
            .collect::<String>();

        let (text, custom_id) = extract_custom_id(&full_text);
        let id = match custom_id {
            Some(id) => {
                self.slugger.reserve(id);
                let id = id.to_string();
                strip_custom_id(&mut children);
                id
            }
            None => self.slugger.slug(text),
        };
        let value = text.trim().to_string();

        self.headings.push(TocEntry {
            value,
            id: id.clone(),
            level: heading.depth,
        });
        Element::new(Tag::Heading(heading.depth))
            .attr("id", id)
            .with_children(children)
    }

    fn list(&mut self, list: &mdast::List, defs: &Definitions) -> Element {
        let tag = if list.ordered {
            Tag::OrderedList
        } else {
            Tag::UnorderedList
        };
        let mut element = Element::new(tag);
        if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
            element = element.attr("start", start.to_string());
        }
        for child in &list.children {
            match child {
                Node::ListItem(item) => {
                    let li = self.list_item(item, !list.spread, defs);
                    element.children.push(li.into());
                }
                other => self.convert(other, defs, &mut element.children),
            }
        }
        element
    }

    fn list_item(&mut self, item: &mdast::ListItem, tight: bool, defs: &Definitions) -> Element {
        let mut element = Element::new(Tag::ListItem);
        if let Some(checked) = item.checked {
            element = element.attr("className", "task-list-item");
            let mut checkbox = Element::new("input")
                .attr("type", "checkbox")
                .attr("disabled", "");
            if checked {
                checkbox = checkbox.attr("checked", "");
            }
            element.children.push(checkbox.into());
            element.children.push(ContentNode::Text(" ".to_string()));
        }
        for child in &item.children {
            match child {
                Node::Paragraph(p) if tight && !item.spread => {
                    let inline = self.convert_children(&p.children, defs);
                    element.children.extend(inline);
                }
                other => self.convert(other, defs, &mut element.children),
            }
        }
        element
    }

    fn table(&mut self, table: &mdast::Table, defs: &Definitions) -> Element {
        let mut rows = table.children.iter().filter_map(|row| match row {
            Node::TableRow(row) => Some(row),
            _ => None,
        });
        let mut element = Element::new(Tag::Table);

        if let Some(header) = rows.next() {
            let row = self.table_row(header, Tag::TableHeader, &table.align, defs);
            element
                .children
                .push(Element::new(Tag::TableHead).child(row).into());
        }
        let body: Vec<ContentNode> = rows
            .map(|row| {
                self.table_row(row, Tag::TableData, &table.align, defs)
                    .into()
            })
            .collect();
        if !body.is_empty() {
            element
                .children
                .push(Element::new(Tag::TableBody).with_children(body).into());
        }
        element
    }

    fn table_row(
        &mut self,
        row: &mdast::TableRow,
        cell_tag: Tag,
        aligns: &[AlignKind],
        defs: &Definitions,
    ) -> Element {
        let mut element = Element::new(Tag::TableRow);
        for (index, cell) in row.children.iter().enumerate() {
            let Node::TableCell(cell) = cell else {
                continue;
            };
            let mut td = self.element(cell_tag.clone(), &cell.children, defs);
            let align = match aligns.get(index) {
                Some(AlignKind::Left) => Some("left"),
                Some(AlignKind::Right) => Some("right"),
                Some(AlignKind::Center) => Some("center"),
                _ => None,
            };
            if let Some(align) = align {
                td = td.attr("align", align);
            }
            element.children.push(td.into());
        }
        element
    }

    /// Converts a JSX element; fragments (`<>...</>`) yield their children as `Err`.
    fn jsx(
        &mut self,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[Node],
        defs: &Definitions,
    ) -> Result<Element, Vec<ContentNode>> {
        let children = self.convert_children(children, defs);
        let Some(name) = name else {
            return Err(children);
        };
        let tag = match name {
            "Admonition" => Tag::Admonition,
            other => Tag::from_name(other),
        };
        let mut element = Element::new(tag).with_children(children);
        for attribute in attributes {
            match attribute {
                AttributeContent::Property(property) => {
                    let value = match &property.value {
                        Some(AttributeValue::Literal(value)) => value.clone(),
                        Some(AttributeValue::Expression(expression)) => expression.value.clone(),
                        None => String::new(),
                    };
                    element.attributes.insert(property.name.clone(), value);
                }
                AttributeContent::Expression(_) => {
                    log::debug!("dropping spread attribute on <{}>", name);
                }
            }
        }
        Ok(element)
    }
}

fn code_block(code: &mdast::Code) -> Element {
    let mut inner = Element::new(Tag::Code);
    if let Some(lang) = &code.lang {
        inner = inner.attr("className", format!("language-{}", lang));
    }
    if let Some(meta) = &code.meta {
        inner = inner.attr("metastring", meta.clone());
    }
    Element::new(Tag::Pre).child(inner.text(code.value.clone()))
}

fn image_element(url: &str, alt: &str, title: Option<&str>) -> Element {
    let mut element = Element::new(Tag::Image).attr("src", url).attr("alt", alt);
    if let Some(title) = title {
        element = element.attr("title", title);
    }
    element
}

/// Removes a trailing `{#id}` from the last text node of a heading.
fn strip_custom_id(children: &mut [ContentNode]) {
    if let Some(ContentNode::Text(value)) = children.last_mut() {
        let (text, id) = extract_custom_id(value);
        if id.is_some() {
            *value = text.to_string();
        }
    }
}

fn collect_definitions(node: &Node, definitions: &mut Definitions) {
    if let Node::Definition(definition) = node {
        definitions
            .entry(definition.identifier.to_lowercase())
            .or_insert_with(|| (definition.url.clone(), definition.title.clone()));
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_definitions(child, definitions);
        }
    }
}

fn definition_nodes(node: &Node, out: &mut Vec<mdast::Definition>) {
    if let Node::Definition(definition) = node {
        out.push(definition.clone());
    }
    if let Some(children) = node.children() {
        for child in children {
            definition_nodes(child, out);
        }
    }
}

fn count_markdown_segments(segments: &[Segment]) -> usize {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Markdown { .. } => 1,
            Segment::Admonition { children, .. } => count_markdown_segments(children),
        })
        .sum()
}

/// Writes a definition back out as a Markdown line.
fn definition_source(definition: &mdast::Definition) -> String {
    let label = definition
        .label
        .as_deref()
        .unwrap_or(&definition.identifier);
    let mut line = format!("[{}]: <{}>", label, escape_definition(&definition.url));
    if let Some(title) = &definition.title {
        line.push_str(&format!(" \"{}\"", escape_definition(title)));
    }
    line.push('\n');
    line
}

fn escape_definition(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '<' | '>' | '"' | '&') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn parse_error(message: &Message, first_line: usize) -> SiteError {
    let (line, column) = match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    };
    SiteError::parse_error(message.reason.clone(), first_line + line - 1, column)
}
