//! Error types for skeleton-template

use thiserror::Error;

/// Error type for template compilation, rendering and directive evaluation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
	/// Malformed template markup (for example an unterminated `{{`)
	#[error("Template syntax error: {0}")]
	Syntax(String),

	/// An interpolation path could not be resolved against the context
	#[error("Cannot resolve expression \"{0}\" in template")]
	Resolution(String),

	/// A `| name` filter is not registered
	#[error("Unknown template filter: {0}")]
	UnknownFilter(String),

	/// The `json` filter could not serialize its argument
	#[error("Value can not be serialized to a JSON string: {0}")]
	Serialization(String),

	/// A `data-loop` field does not exist on the context
	#[error("Loop field \"{0}\" is missing")]
	MissingLoopField(String),

	/// A `data-loop` field exists but is not an array
	#[error("Loop field \"{0}\" is not an array")]
	NotAnArray(String),

	/// Malformed `data-style` / `data-class` JSON or `field?a:b` expression
	#[error("Directive syntax error in {directive}: {message}")]
	DirectiveSyntax {
		/// Directive attribute name
		directive: &'static str,
		/// What was wrong
		message: String,
	},
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
