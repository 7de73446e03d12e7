use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result returned after extracting frontmatter from a page source.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON object (empty when absent).
    pub value: JsonValue,
    /// Byte offset where the page body begins.
    pub body_start: usize,
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing fence.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts a leading `---` delimited YAML block.
///
/// Sources without one yield an empty object and `body_start == 0`
/// (or just past a byte-order mark).
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    let offset = if input.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let source = &input[offset..];

    let mut lines = line_spans(source);
    match lines.next() {
        Some((start, end)) if is_fence(&source[start..end]) => {}
        _ => {
            return Ok(FrontmatterExtraction {
                value: empty_object(),
                body_start: offset,
            });
        }
    }

    let block_start = lines_start(source);
    for (start, end) in lines {
        if is_fence(&source[start..end]) || source[start..end].trim_end() == "..." {
            let value = parse_block(&source[block_start..start])?;
            let body_start = skip_newline(source, end);
            return Ok(FrontmatterExtraction {
                value,
                body_start: offset + body_start,
            });
        }
    }
    Err(FrontmatterError::Unterminated)
}

fn parse_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(empty_object());
    }
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))? {
        JsonValue::Null => Ok(empty_object()),
        object @ JsonValue::Object(_) => Ok(object),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn empty_object() -> JsonValue {
    JsonValue::Object(Default::default())
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Byte ranges of each line, excluding the line terminator.
fn line_spans(source: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        if cursor >= source.len() {
            return None;
        }
        let start = cursor;
        let end = source[start..]
            .find('\n')
            .map_or(source.len(), |pos| start + pos);
        cursor = end + 1;
        let end = if source[start..end].ends_with('\r') {
            end - 1
        } else {
            end
        };
        Some((start, end))
    })
}

fn lines_start(source: &str) -> usize {
    source.find('\n').map_or(source.len(), |pos| pos + 1)
}

fn skip_newline(source: &str, end: usize) -> usize {
    let rest = &source[end..];
    if rest.starts_with("\r\n") {
        end + 2
    } else if rest.starts_with('\n') {
        end + 1
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter() {
        let extraction = extract_frontmatter("# Magento\n").unwrap();
        assert_eq!(extraction.value, serde_json::json!({}));
        assert_eq!(extraction.body_start, 0);
    }

    #[test]
    fn test_extracts_mapping() {
        let input = "---\ntitle: Magento\ntags: [mysql, ecommerce]\n---\n# Body\n";
        let extraction = extract_frontmatter(input).unwrap();
        assert_eq!(
            extraction.value,
            serde_json::json!({"title": "Magento", "tags": ["mysql", "ecommerce"]})
        );
        assert_eq!(&input[extraction.body_start..], "# Body\n");
    }

    #[test]
    fn test_empty_block() {
        let input = "---\n---\nbody";
        let extraction = extract_frontmatter(input).unwrap();
        assert_eq!(extraction.value, serde_json::json!({}));
        assert_eq!(&input[extraction.body_start..], "body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let input = "\u{feff}---\r\ntitle: X\r\n---\r\nbody";
        let extraction = extract_frontmatter(input).unwrap();
        assert_eq!(extraction.value["title"], "X");
        assert_eq!(&input[extraction.body_start..], "body");
    }

    #[test]
    fn test_unterminated() {
        assert!(matches!(
            extract_frontmatter("---\ntitle: X\n"),
            Err(FrontmatterError::Unterminated)
        ));
    }

    #[test]
    fn test_non_mapping_root() {
        assert!(matches!(
            extract_frontmatter("---\n- a\n- b\n---\n"),
            Err(FrontmatterError::InvalidRootType)
        ));
    }
}
