//! Error types for skeleton-pages

use skeleton_template::TemplateError;
use thiserror::Error;

/// Error type for record, list and subscription operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PagesError {
	/// Missing or invalid configuration (model, container element, template)
	#[error("Validation error: {0}")]
	Validation(String),

	/// Malformed call (non-object fields, unknown method, foreign record)
	#[error("Invalid arguments: {0}")]
	InvalidArguments(String),

	/// Template compilation, rendering or directive failure
	#[error(transparent)]
	Template(#[from] TemplateError),

	/// No rendered node carries the requested `data-id`
	#[error("No rendered node with data-id=\"{0}\"")]
	MissingDataId(usize),

	/// Event name outside the recognized vocabulary
	#[error("Unknown event kind \"{0}\"; expected one of push, remove, edit, filter, sort, pushAll, removeAll")]
	UnknownEventKind(String),
}

/// Result type for skeleton-pages operations
pub type Result<T> = std::result::Result<T, PagesError>;
