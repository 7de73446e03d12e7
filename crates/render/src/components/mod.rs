//! Component maps: which renderer handles which tag.

pub mod defaults;
mod types;

pub use defaults::{default_components, defaults};
pub use types::{
    Component, ComponentKey, ComponentMap, Overrides, Props, RenderFn, merge_components,
};
