//! # Skeleton
//!
//! A reactive list-rendering engine: an ordered collection of typed records
//! kept in sync with a region of a markup document through a small
//! directive template language, with listeners notified about every
//! mutation.
//!
//! ## Feature Flags
//!
//! - `pages` (default): records, collections, list views, events and storage
//!
//! The template layer ([`template`]) is always available.
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "pages")]
//! # {
//! use serde_json::json;
//! use skeleton::prelude::*;
//!
//! let document = shared_document(r#"<ul id="todo-list"></ul>"#);
//! let todos = List::builder(document)
//! 	.model(Model::with_defaults(json!({"text": "", "isCompleted": false})).unwrap())
//! 	.element("todo-list")
//! 	.template(r#"<li data-class='{"completed":"isCompleted"}'>{{ text }}</li>"#)
//! 	.build()
//! 	.unwrap();
//!
//! todos.push(json!({"text": "a"})).unwrap();
//! todos.push(json!({"text": "b", "isCompleted": true})).unwrap();
//!
//! let done = todos.filter(|todo| todo["isCompleted"] == true).unwrap();
//! assert_eq!(done.len(), 1);
//! assert_eq!(todos.size(), 2);
//! # }
//! ```

#[cfg(feature = "pages")]
pub mod pages;
pub mod template;

#[cfg(feature = "pages")]
pub use skeleton_pages::{
	EventKind, List, ListBuilder, ListSettings, Model, Notification, PagesError, Record,
	Subscription,
};
pub use skeleton_template::{FilterRegistry, RenderOptions, Template, TemplateError};

/// Commonly used types
pub mod prelude {
	#[cfg(feature = "pages")]
	pub use skeleton_pages::{
		EventKind, List, ListSettings, MemoryStorage, Model, Notification, PagesError, Record,
		Storage, Subscription, shared_document,
	};
	pub use skeleton_template::{
		Document, FilterRegistry, NodeId, RenderOptions, Template, TemplateError,
	};
}
