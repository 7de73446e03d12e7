//! Markup fragments and HTML emission helpers.

use mdxsite_core::Attributes;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A fragment of rendered HTML, safe to embed in a page shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps HTML that is already escaped.
    pub fn from_trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Creates a fragment holding escaped text.
    pub fn text(text: &str) -> Self {
        Self(escape_text(text).into_owned())
    }

    /// The HTML source.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fragment, returning the HTML source.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true if the fragment holds no HTML.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends another fragment.
    pub fn push(&mut self, other: &Markup) {
        self.0.push_str(&other.0);
    }

    /// Appends HTML that is already escaped.
    pub fn push_trusted(&mut self, html: &str) {
        self.0.push_str(html);
    }

    /// Appends text, escaping it.
    pub fn push_text(&mut self, text: &str) {
        self.0.push_str(&escape_text(text));
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        let mut out = Markup::new();
        for fragment in iter {
            out.push(&fragment);
        }
        out
    }
}

/// Escapes `&`, `<` and `>` for text content.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Maps a JSX prop name to its HTML attribute name.
pub fn html_attribute_name(name: &str) -> Cow<'_, str> {
    match name {
        "className" => Cow::Borrowed("class"),
        "htmlFor" => Cow::Borrowed("for"),
        "fillRule" | "clipRule" | "strokeWidth" | "strokeLinecap" | "strokeLinejoin"
        | "fillOpacity" | "strokeOpacity" => {
            let mut out = String::with_capacity(name.len() + 1);
            for c in name.chars() {
                if c.is_ascii_uppercase() {
                    out.push('-');
                    out.push(c.to_ascii_lowercase());
                } else {
                    out.push(c);
                }
            }
            Cow::Owned(out)
        }
        other => Cow::Borrowed(other),
    }
}

/// Writes `<name attrs>children</name>`, or `<name attrs />` for void elements.
///
/// Attributes with an empty value are written bare (`disabled`).
pub fn write_element(
    name: &str,
    attributes: &Attributes,
    extra: &[(&str, &str)],
    children: &Markup,
    void: bool,
) -> Markup {
    let mut out = String::with_capacity(children.0.len() + 32);
    out.push('<');
    out.push_str(name);
    let pairs = attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(extra.iter().copied());
    for (key, value) in pairs {
        out.push(' ');
        out.push_str(&html_attribute_name(key));
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
    if void {
        out.push_str(" />");
        return Markup(out);
    }
    out.push('>');
    out.push_str(&children.0);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
    Markup(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(Markup::text("a < b & c").as_str(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(html_attribute_name("className"), "class");
        assert_eq!(html_attribute_name("fillRule"), "fill-rule");
        assert_eq!(html_attribute_name("viewBox"), "viewBox");
        assert_eq!(html_attribute_name("href"), "href");
    }

    #[test]
    fn test_write_element() {
        let mut attributes = Attributes::new();
        attributes.insert("href".to_string(), "/a?x=1&y=2".to_string());
        attributes.insert("className".to_string(), "link".to_string());
        let out = write_element("a", &attributes, &[], &Markup::text("go"), false);
        assert_eq!(
            out.as_str(),
            r#"<a class="link" href="/a?x=1&amp;y=2">go</a>"#
        );
    }

    #[test]
    fn test_void_and_bare_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("disabled".to_string(), String::new());
        attributes.insert("type".to_string(), "checkbox".to_string());
        let out = write_element("input", &attributes, &[], &Markup::new(), true);
        assert_eq!(out.as_str(), r#"<input disabled type="checkbox" />"#);
    }
}
