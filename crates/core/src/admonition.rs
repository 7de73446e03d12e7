//! Admonition fences (`:::info` ... `:::`).
//!
//! The page body is split into plain Markdown segments and admonition
//! segments before parsing, so the inner content of each callout is parsed as
//! ordinary Markdown and nesting works without JSX rewriting.

use crate::code_fence::FenceTracker;

/// Admonition kinds recognised by default.
pub const DEFAULT_KINDS: &[&str] = &[
    "note",
    "tip",
    "info",
    "caution",
    "danger",
    "warning",
    "important",
    "secondary",
    "success",
];

/// Parsed opening line such as `:::tip Pro tip` or `:::note[Heads up]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmonitionOpening {
    /// Lowercased kind (`info`, `note`, ...).
    pub kind: String,
    /// Title from `[...]` or the rest of the line.
    pub title: Option<String>,
}

/// Parses an opening fence; `None` for anything else, including unknown kinds.
pub fn parse_opening<S: AsRef<str>>(line: &str, kinds: &[S]) -> Option<AdmonitionOpening> {
    let trimmed = line.trim();
    let colons = trimmed.chars().take_while(|c| *c == ':').count();
    if colons < 3 || line.len() - line.trim_start().len() > 3 {
        return None;
    }
    let rest = &trimmed[colons..];
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let kind = rest[..name_len].to_ascii_lowercase();
    if !kinds.iter().any(|k| k.as_ref() == kind) {
        return None;
    }

    let after = &rest[name_len..];
    let title = if let Some(bracketed) = after.strip_prefix('[') {
        bracketed
            .find(']')
            .map(|end| bracketed[..end].trim().to_string())
    } else {
        Some(after.trim().to_string())
    };

    Some(AdmonitionOpening {
        kind,
        title: title.filter(|t| !t.is_empty()),
    })
}

/// Returns true for a closing fence: three or more colons and nothing else.
pub fn is_closer(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b':')
}

/// A run of page body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain Markdown.
    Markdown {
        /// Source text, newline terminated.
        text: String,
        /// Line of the first source line (1-indexed).
        line: usize,
    },
    /// An admonition and its inner segments.
    Admonition {
        /// Opening fence data.
        opening: AdmonitionOpening,
        /// Line of the opening fence (1-indexed).
        line: usize,
        /// Inner content.
        children: Vec<Segment>,
        /// False when input ended before the closing fence.
        closed: bool,
    },
}

struct Frame {
    opening: Option<(AdmonitionOpening, usize)>,
    segments: Vec<Segment>,
    buffer: String,
    buffer_line: usize,
}

impl Frame {
    fn new(opening: Option<(AdmonitionOpening, usize)>) -> Self {
        Self {
            opening,
            segments: Vec::new(),
            buffer: String::new(),
            buffer_line: 0,
        }
    }

    fn push_line(&mut self, line: &str, number: usize) {
        if self.buffer.is_empty() {
            self.buffer_line = number;
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn flush(&mut self) {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return;
        }
        self.segments.push(Segment::Markdown {
            text: std::mem::take(&mut self.buffer),
            line: self.buffer_line,
        });
    }

    fn close(mut self, closed: bool) -> Option<Segment> {
        self.flush();
        let (opening, line) = self.opening?;
        Some(Segment::Admonition {
            opening,
            line,
            children: self.segments,
            closed,
        })
    }
}

/// Splits `body` into Markdown and admonition segments.
///
/// `first_line` is the line number of the first body line within the page
/// (frontmatter shifts it). Fences inside fenced code are ignored; stray
/// closers outside any admonition are kept as text.
pub fn split_segments<S: AsRef<str>>(body: &str, first_line: usize, kinds: &[S]) -> Vec<Segment> {
    let mut fences = FenceTracker::new();
    let mut stack = vec![Frame::new(None)];

    for (index, line) in body.lines().enumerate() {
        let number = first_line + index;
        if !fences.advance(line) {
            if let Some(opening) = parse_opening(line, kinds) {
                if let Some(top) = stack.last_mut() {
                    top.flush();
                }
                stack.push(Frame::new(Some((opening, number))));
                continue;
            }
            if is_closer(line) && stack.len() > 1 {
                close_top(&mut stack, true);
                continue;
            }
        }
        if let Some(top) = stack.last_mut() {
            top.push_line(line, number);
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack, false);
    }
    stack
        .pop()
        .map(|mut root| {
            root.flush();
            root.segments
        })
        .unwrap_or_default()
}

fn close_top(stack: &mut Vec<Frame>, closed: bool) {
    let Some(frame) = stack.pop() else {
        return;
    };
    if let (Some(segment), Some(parent)) = (frame.close(closed), stack.last_mut()) {
        parent.segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening(line: &str) -> Option<AdmonitionOpening> {
        parse_opening(line, DEFAULT_KINDS)
    }

    #[test]
    fn test_parse_opening_forms() {
        assert_eq!(
            opening(":::info"),
            Some(AdmonitionOpening {
                kind: "info".to_string(),
                title: None
            })
        );
        assert_eq!(
            opening(":::Note Heads up").and_then(|o| o.title),
            Some("Heads up".to_string())
        );
        assert_eq!(
            opening("::::tip[Pro tip]").and_then(|o| o.title),
            Some("Pro tip".to_string())
        );
        assert_eq!(opening(":::unknown"), None);
        assert_eq!(opening("::info"), None);
        assert_eq!(opening("    :::info"), None);
    }

    #[test]
    fn test_closer() {
        assert!(is_closer(":::"));
        assert!(is_closer("  ::::  "));
        assert!(!is_closer("::"));
        assert!(!is_closer(":::info"));
    }

    #[test]
    fn test_split_simple() {
        let body = "Intro\n\n:::info\nReach out.\n:::\n\nOutro\n";
        let segments = split_segments(body, 1, DEFAULT_KINDS);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            Segment::Markdown {
                text: "Intro\n\n".to_string(),
                line: 1
            }
        );
        match &segments[1] {
            Segment::Admonition {
                opening,
                line,
                children,
                closed,
            } => {
                assert_eq!(opening.kind, "info");
                assert_eq!(*line, 3);
                assert!(*closed);
                assert_eq!(
                    children,
                    &vec![Segment::Markdown {
                        text: "Reach out.\n".to_string(),
                        line: 4
                    }]
                );
            }
            other => panic!("expected admonition, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_and_unclosed() {
        let body = ":::note\nouter\n:::tip\ninner\n:::\n";
        let segments = split_segments(body, 1, DEFAULT_KINDS);
        assert_eq!(segments.len(), 1);
        let Segment::Admonition {
            children, closed, ..
        } = &segments[0]
        else {
            panic!("expected admonition");
        };
        assert!(!closed);
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[1], Segment::Admonition { closed: true, .. }));
    }

    #[test]
    fn test_fenced_code_is_untouched() {
        let body = "```md\n:::info\n```\n";
        let segments = split_segments(body, 1, DEFAULT_KINDS);
        assert_eq!(
            segments,
            vec![Segment::Markdown {
                text: body.to_string(),
                line: 1
            }]
        );
    }

    #[test]
    fn test_stray_closer_is_text() {
        let segments = split_segments("a\n:::\n", 1, DEFAULT_KINDS);
        assert_eq!(
            segments,
            vec![Segment::Markdown {
                text: "a\n:::\n".to_string(),
                line: 1
            }]
        );
    }
}
