//! Skeleton Pages - reactive lists of typed records
//!
//! Keeps an ordered, indexed collection of records in sync with a region of
//! a markup document and notifies typed listeners about every mutation.
//!
//! ## Modules
//!
//! - [`model`]: record types ([`Model`]) and records ([`Record`])
//! - [`collection`]: index assignment and ordered storage
//! - [`view`]: [`List`], the collection bound to a container and a template
//! - [`events`]: listener registry and notifications
//! - [`settings`]: TOML-loadable list configuration
//! - [`storage`]: key/value persistence collaborator
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use skeleton_pages::{EventKind, List, Model, shared_document};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let document = shared_document(r#"<ul id="todos"></ul>"#);
//! let todos = List::builder(document)
//! 	.model(Model::with_defaults(json!({"text": "", "isCompleted": false})).unwrap())
//! 	.element("todos")
//! 	.template("<li>{{ text | capitalize }}</li>")
//! 	.build()
//! 	.unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//! todos.subscribe_to(&[EventKind::Push], move |n| log.borrow_mut().push(n.payload.clone()));
//!
//! todos.push(json!({"text": "milk"})).unwrap();
//! assert_eq!(todos.html(), r#"<li data-id="0">Milk</li>"#);
//! assert_eq!(seen.borrow()[0]["index"], 0);
//! ```

#![warn(missing_docs)]

pub mod collection;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod settings;
pub mod storage;
pub mod view;

#[doc(hidden)]
pub use tracing as __tracing;

pub use collection::Collection;
pub use error::{PagesError, Result};
pub use events::{EventHub, EventKind, Listener, ListenerId, Notification, Subscription};
pub use model::{Model, ModelBuilder, Record};
pub use settings::{ListSettings, TemplateSource};
pub use storage::{MemoryStorage, Storage};
pub use view::{DATA_ID_ATTR, List, ListBuilder, SharedDocument, WeakList, shared_document};
