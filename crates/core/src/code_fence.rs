//! Line-level code fence tracking.
//!
//! Text-level preprocessing (admonition fences) must not fire inside fenced
//! code, so lines are fed through a [`FenceTracker`] first.

/// Tracks whether the current line sits inside a fenced code block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceTracker {
    open: Option<Fence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    length: usize,
}

impl FenceTracker {
    /// Creates a tracker positioned outside any fence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a fence is open.
    pub fn is_inside(&self) -> bool {
        self.open.is_some()
    }

    /// Consumes one line; returns true if the line is part of a fenced
    /// block (opening and closing fences included).
    pub fn advance(&mut self, line: &str) -> bool {
        let (indent, rest) = split_indent(line);
        // CommonMark: fences may be indented by at most three columns.
        let candidate = if indent <= 3 { fence_marker(rest) } else { None };

        match (self.open, candidate) {
            (None, Some((marker, length))) => {
                // Backtick fences cannot carry backticks in their info string.
                if marker == '`' && rest[length..].contains('`') {
                    return false;
                }
                self.open = Some(Fence { marker, length });
                true
            }
            (None, None) => false,
            (Some(open), Some((marker, length)))
                if marker == open.marker
                    && length >= open.length
                    && rest[length..].trim().is_empty() =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
        }
    }
}

/// Returns (visual columns, remainder) with tabs expanded to 4-column stops.
fn split_indent(line: &str) -> (usize, &str) {
    let mut columns = 0;
    for (offset, byte) in line.bytes().enumerate() {
        match byte {
            b' ' => columns += 1,
            b'\t' => columns += 4 - (columns % 4),
            _ => return (columns, &line[offset..]),
        }
    }
    (columns, "")
}

fn fence_marker(text: &str) -> Option<(char, usize)> {
    let marker = text.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = text.chars().take_while(|c| *c == marker).count();
    (length >= 3).then_some((marker, length))
}
