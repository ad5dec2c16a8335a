//! Skeleton Template - markup mini-language for list views
//!
//! Compiles templates written in a small directive language and renders
//! JSON records into an arena-backed markup tree.
//!
//! ## Markup language
//!
//! - `{{ path }}` / `{{ path | filter }}`: interpolation with optional filters
//! - `data-loop="field"` with `{{# path }}`: per-item repetition
//! - `data-checked`, `data-hide`, `data-show`, `data-style`, `data-class`:
//!   conditional attributes driven by record fields
//!
//! ## Modules
//!
//! - [`dom`]: document tree, markup parser and serializer
//! - [`template`]: template compiler and renderer
//! - [`filters`]: named text filters
//! - [`directives`]: conditional attribute evaluation
//! - [`value`]: truthiness and path resolution on JSON values

#![warn(missing_docs)]

pub mod directives;
pub mod dom;
pub mod error;
pub mod filters;
pub mod template;
pub mod value;

pub use dom::{Document, NodeId, NodeKind};
pub use error::{Result, TemplateError};
pub use filters::{FilterFn, FilterRegistry};
pub use template::{RenderOptions, Template};
pub use value::{is_truthy, to_display};
