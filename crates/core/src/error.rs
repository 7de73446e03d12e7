use thiserror::Error;

use crate::frontmatter::FrontmatterError;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attach a file path to this location
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Errors raised while turning page sources into content trees.
#[derive(Debug, Error)]
pub enum SiteError {
    /// markdown-rs rejected the page body.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The YAML frontmatter block could not be read.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// A page was serialised or deserialised with an unexpected shape.
    #[error("Invalid page data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

impl SiteError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// Conditions that are recovered from locally and never abort rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// A content tag had no component and no built-in renderer; it was passed through.
    UnknownTag {
        /// Tag name as written in the source
        tag: String,
        /// Enclosing element, if any
        parent: Option<String>,
    },
    /// An admonition fence was never closed; it was closed at end of input.
    UnclosedAdmonition {
        /// Where the admonition was opened
        location: SourceLocation,
        /// Admonition kind (`info`, `note`, ...)
        kind: String,
    },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::UnknownTag {
                tag,
                parent: Some(parent),
            } => write!(f, "no renderer for <{}> inside <{}>", tag, parent),
            RenderWarning::UnknownTag { tag, parent: None } => {
                write!(f, "no renderer for <{}>", tag)
            }
            RenderWarning::UnclosedAdmonition { location, kind } => {
                write!(f, "{}: unclosed :::{} admonition", location, kind)
            }
        }
    }
}

/// Collection of recovered warnings for one parse or render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Warnings in the order they were raised
    pub warnings: Vec<RenderWarning>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning unless an identical one is already present.
    ///
    /// Returns true if the warning was new.
    pub fn warn(&mut self, warning: RenderWarning) -> bool {
        if self.warnings.contains(&warning) {
            return false;
        }
        self.warnings.push(warning);
        true
    }

    /// Append every warning from `other`, skipping duplicates.
    pub fn extend(&mut self, other: Diagnostics) {
        for warning in other.warnings {
            self.warn(warning);
        }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Names of the tags that fell back to pass-through rendering.
    pub fn unknown_tags(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(|w| match w {
            RenderWarning::UnknownTag { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
        assert_eq!(
            SourceLocation::new(3, 7).in_file("docs/magento.md").to_string(),
            "docs/magento.md:3:7"
        );
    }

    #[test]
    fn test_diagnostics_deduplicate() {
        let mut diagnostics = Diagnostics::new();
        let warning = RenderWarning::UnknownTag {
            tag: "Tabs".to_string(),
            parent: None,
        };
        assert!(diagnostics.warn(warning.clone()));
        assert!(!diagnostics.warn(warning));
        assert_eq!(diagnostics.warnings.len(), 1);
        assert_eq!(diagnostics.unknown_tags().collect::<Vec<_>>(), vec!["Tabs"]);
    }

    #[test]
    fn test_warning_display() {
        let warning = RenderWarning::UnknownTag {
            tag: "Tabs".to_string(),
            parent: Some("p".to_string()),
        };
        assert_eq!(warning.to_string(), "no renderer for <Tabs> inside <p>");
    }
}
