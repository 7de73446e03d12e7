//! Content tree produced at build time and consumed by renderers.
//!
//! Nodes dispatch on a closed set of [`Tag`] variants mirroring the MDX
//! element names (`p`, `a`, `inlineCode`, ...). Anything outside that set is
//! kept as [`Tag::Html`] (an intrinsic element such as `div` or `svg`) or
//! [`Tag::Custom`] (a component reference such as `Tabs`) together with its raw
//! attributes and children, so nothing in the source is dropped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Element attributes, ordered by name so output is deterministic.
pub type Attributes = BTreeMap<String, String>;

/// Element kind of a content node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Page root (`wrapper`); the MDX layout slot.
    Wrapper,
    /// `h1` through `h6`.
    Heading(u8),
    /// `p`
    Paragraph,
    /// `a`
    Link,
    /// `em`
    Emphasis,
    /// `strong`
    Strong,
    /// `del`
    Delete,
    /// `inlineCode`
    InlineCode,
    /// `code` (inside a `pre`)
    Code,
    /// `pre`
    Pre,
    /// `blockquote`
    Blockquote,
    /// `ul`
    UnorderedList,
    /// `ol`
    OrderedList,
    /// `li`
    ListItem,
    /// `table`
    Table,
    /// `thead`
    TableHead,
    /// `tbody`
    TableBody,
    /// `tr`
    TableRow,
    /// `th`
    TableHeader,
    /// `td`
    TableData,
    /// `img`
    Image,
    /// `hr`
    ThematicBreak,
    /// `br`
    Break,
    /// `admonition`: a callout block with a `type` and optional `title`.
    Admonition,
    /// Any other lowercase element name, rendered verbatim.
    Html(String),
    /// An unrecognised component name.
    Custom(String),
}

impl Tag {
    /// Resolves an element name to its tag.
    pub fn from_name(name: &str) -> Tag {
        match name {
            "wrapper" => Tag::Wrapper,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "a" => Tag::Link,
            "em" => Tag::Emphasis,
            "strong" => Tag::Strong,
            "del" => Tag::Delete,
            "inlineCode" => Tag::InlineCode,
            "code" => Tag::Code,
            "pre" => Tag::Pre,
            "blockquote" => Tag::Blockquote,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "table" => Tag::Table,
            "thead" => Tag::TableHead,
            "tbody" => Tag::TableBody,
            "tr" => Tag::TableRow,
            "th" => Tag::TableHeader,
            "td" => Tag::TableData,
            "img" => Tag::Image,
            "hr" => Tag::ThematicBreak,
            "br" => Tag::Break,
            "admonition" => Tag::Admonition,
            other if other.starts_with(|c: char| c.is_ascii_lowercase()) => {
                Tag::Html(other.to_string())
            }
            other => Tag::Custom(other.to_string()),
        }
    }

    /// The MDX element name of this tag.
    pub fn name(&self) -> &str {
        match self {
            Tag::Wrapper => "wrapper",
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Paragraph => "p",
            Tag::Link => "a",
            Tag::Emphasis => "em",
            Tag::Strong => "strong",
            Tag::Delete => "del",
            Tag::InlineCode => "inlineCode",
            Tag::Code => "code",
            Tag::Pre => "pre",
            Tag::Blockquote => "blockquote",
            Tag::UnorderedList => "ul",
            Tag::OrderedList => "ol",
            Tag::ListItem => "li",
            Tag::Table => "table",
            Tag::TableHead => "thead",
            Tag::TableBody => "tbody",
            Tag::TableRow => "tr",
            Tag::TableHeader => "th",
            Tag::TableData => "td",
            Tag::Image => "img",
            Tag::ThematicBreak => "hr",
            Tag::Break => "br",
            Tag::Admonition => "admonition",
            Tag::Html(name) | Tag::Custom(name) => name,
        }
    }

    /// HTML element emitted for this tag when no component overrides it.
    ///
    /// `None` means the children are emitted without an enclosing element.
    pub fn html_name(&self) -> Option<&str> {
        match self {
            Tag::Wrapper => None,
            Tag::InlineCode => Some("code"),
            Tag::Admonition => Some("div"),
            other => Some(other.name()),
        }
    }

    /// Returns true for elements that never have children or a closing tag.
    pub fn is_void(&self) -> bool {
        match self {
            Tag::Image | Tag::ThematicBreak | Tag::Break => true,
            Tag::Html(name) => {
                matches!(name.as_str(), "input" | "meta" | "link" | "wbr" | "source")
            }
            _ => false,
        }
    }

    /// Returns true for component names nothing in the tree knows how to render.
    pub fn is_custom(&self) -> bool {
        matches!(self, Tag::Custom(_))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::from_name(name)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Tag::from_name(&name))
    }
}

/// An element node with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element kind.
    pub tag: Tag,
    /// Attributes as written in the source (JSX names, e.g. `className`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl Element {
    /// Creates an element without attributes or children.
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends a child node.
    pub fn child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ContentNode::Text(text.into()))
    }

    /// Appends several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Looks up an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One node of a parsed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ContentNode {
    /// Plain text, escaped on output.
    Text(String),
    /// Trusted HTML emitted verbatim.
    Raw(String),
    /// An element.
    Element(Element),
}

impl ContentNode {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ContentNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(self, &mut buffer);
        buffer
    }

    /// Visits this node and every descendant element in document order.
    pub fn walk_elements<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        if let ContentNode::Element(element) = self {
            visit(element);
            for child in &element.children {
                child.walk_elements(visit);
            }
        }
    }
}

fn collect_text(node: &ContentNode, buffer: &mut String) {
    match node {
        ContentNode::Text(value) => buffer.push_str(value),
        ContentNode::Raw(_) => {}
        ContentNode::Element(element) => {
            for child in &element.children {
                collect_text(child, buffer);
            }
        }
    }
}

impl From<Element> for ContentNode {
    fn from(element: Element) -> Self {
        ContentNode::Element(element)
    }
}

impl From<&str> for ContentNode {
    fn from(text: &str) -> Self {
        ContentNode::Text(text.to_string())
    }
}

impl From<String> for ContentNode {
    fn from(text: String) -> Self {
        ContentNode::Text(text)
    }
}
