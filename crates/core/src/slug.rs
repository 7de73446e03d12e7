use std::collections::HashMap;

/// Splits a trailing `{#custom-id}` off heading text.
///
/// ```
/// use mdxsite_core::slug::extract_custom_id;
///
/// assert_eq!(extract_custom_id("Output schema {#schema}"), ("Output schema", Some("schema")));
/// assert_eq!(extract_custom_id("Output schema"), ("Output schema", None));
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(body) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = body.rfind("{#") else {
        return (text, None);
    };
    let id = &body[open + 2..];
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        (body[..open].trim_end(), Some(id))
    } else {
        (text, None)
    }
}

/// Converts heading text to an anchor id without deduplication.
///
/// Lowercases, keeps letters, digits, `-` and `_`, turns each whitespace
/// character into `-`, and drops everything else.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect()
}

/// Github-slugger compatible slug generator; repeated headings get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for the given heading text.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();
        while self.occurrences.contains_key(&slug) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            slug = format!("{}-{}", base, count);
        }
        self.occurrences.insert(slug.clone(), 0);
        slug
    }

    /// Reserves an explicit id so generated slugs avoid it.
    pub fn reserve(&mut self, slug: &str) {
        self.occurrences.entry(slug.to_string()).or_insert(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Sync overview"), "sync-overview");
        assert_eq!(slugify("Output schema"), "output-schema");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("  Café au lait "), "café-au-lait");
    }

    #[test]
    fn test_slugger_deduplicates() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Setup"), "setup");
        assert_eq!(slugger.slug("Setup"), "setup-1");
        assert_eq!(slugger.slug("Setup"), "setup-2");
        assert_eq!(slugger.slug("Setup 1"), "setup-1-1");
    }

    #[test]
    fn test_reserved_slug_is_skipped() {
        let mut slugger = Slugger::new();
        slugger.reserve("schema");
        assert_eq!(slugger.slug("Schema"), "schema-1");
    }

    #[test]
    fn test_custom_id_rejects_invalid() {
        assert_eq!(extract_custom_id("Title {#bad id}"), ("Title {#bad id}", None));
        assert_eq!(extract_custom_id("Title {#}"), ("Title {#}", None));
        assert_eq!(extract_custom_id("Title {#ok_1}  "), ("Title", Some("ok_1")));
    }
}
