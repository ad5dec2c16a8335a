//! Reactive record lists
//!
//! This module provides access to skeleton-pages: record types, the indexed
//! collection, list views bound to a container element, typed listeners and
//! the storage collaborator.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use skeleton::pages::{List, Model, shared_document};
//!
//! let document = shared_document(r#"<ol id="bones"></ol>"#);
//! let bones = List::builder(document)
//! 	.model(Model::with_defaults(json!({"name": ""})).unwrap())
//! 	.element("bones")
//! 	.template("<li>{{ name | upper }}</li>")
//! 	.build()
//! 	.unwrap();
//!
//! bones.push(json!({"name": "femur"})).unwrap();
//! assert_eq!(bones.html(), r#"<li data-id="0">FEMUR</li>"#);
//! ```

// Re-export all skeleton-pages functionality
pub use skeleton_pages::*;
