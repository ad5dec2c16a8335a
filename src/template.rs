//! Markup tree and template language
//!
//! This module provides access to skeleton-template: the arena-backed
//! [`Document`], the template compiler and the filter and directive
//! registries used when rendering records.
//!
//! ## Markup language
//!
//! - `{{ path }}`, `{{ path | filter }}`: interpolation, filters apply left to right
//! - `data-loop="field"` with `{{# path }}`: one copy of the element per array item
//! - `data-checked`, `data-hide`, `data-show`, `data-style`, `data-class`:
//!   attributes conditioned on record fields

// Re-export all skeleton-template functionality
pub use skeleton_template::*;
