#![deny(missing_docs)]
//! mdxsite core: content tree, page parsing, metadata, and the chunk registry.

/// Admonition fence splitting.
pub mod admonition;
/// Code fence detection utilities.
pub mod code_fence;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Page metadata, navigation links, and table-of-contents entries.
pub mod metadata;
/// Content tree types.
pub mod node;
/// Markdown/MDX to content tree conversion.
pub mod parse;
/// Keyed module registry for one site build.
pub mod registry;
/// Slug generation utilities.
pub mod slug;

pub use admonition::{AdmonitionOpening, Segment, split_segments};
pub use code_fence::FenceTracker;
pub use error::{Diagnostics, RenderWarning, SiteError, SourceLocation};
pub use frontmatter::{FrontmatterError, FrontmatterExtraction, extract_frontmatter};
pub use metadata::{MetadataOptions, NavLink, PageMetadata, PageTag, TocEntry, link_sequence};
pub use node::{Attributes, ContentNode, Element, Tag};
pub use parse::{ParseOptions, ParsedDocument, parse_document};
pub use registry::{Chunk, ChunkRegistry, Factory, ModuleDefinition, ModuleId, RegistryError};
pub use slug::{Slugger, extract_custom_id, slugify};
