//! Template filters
//!
//! Filters are named text transforms applied with `{{ path | name }}`.
//! A [`FilterRegistry`] starts with five built-ins which callers may
//! overwrite:
//!
//! | Filter | Output |
//! |--------|--------|
//! | `upper` | upper-cased text |
//! | `lower` | lower-cased text |
//! | `capitalize` | first character upper-cased, the rest lower-cased |
//! | `currency` | text prefixed with `$` |
//! | `json` | JSON serialization of the value |

use crate::error::{Result, TemplateError};
use crate::value::to_display;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Filter function operating on the resolved value.
pub type FilterFn = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// Convert to uppercase
///
/// # Example
/// ```text
/// {{ name | upper }}   // "alice" -> "ALICE"
/// ```
pub fn upper(value: &Value) -> Result<String> {
	Ok(to_display(value).to_uppercase())
}

/// Convert to lowercase
pub fn lower(value: &Value) -> Result<String> {
	Ok(to_display(value).to_lowercase())
}

/// Upper-case the first character and lower-case the rest
///
/// # Example
/// ```text
/// {{ name | capitalize }}   // "hELLO" -> "Hello"
/// ```
pub fn capitalize(value: &Value) -> Result<String> {
	let text = to_display(value);
	let mut chars = text.chars();
	Ok(match chars.next() {
		None => String::new(),
		Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
	})
}

/// Prefix with a dollar sign
pub fn currency(value: &Value) -> Result<String> {
	Ok(format!("${}", to_display(value)))
}

/// Serialize the value to JSON text
///
/// # Example
/// ```text
/// {{ tags | json }}   // ["a","b"]
/// ```
pub fn json(value: &Value) -> Result<String> {
	serde_json::to_string(value).map_err(|e| TemplateError::Serialization(e.to_string()))
}

/// Named filter lookup table.
#[derive(Clone)]
pub struct FilterRegistry {
	filters: HashMap<String, FilterFn>,
}

impl fmt::Debug for FilterRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterRegistry")
			.field("filters", &self.names())
			.finish()
	}
}

impl Default for FilterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl FilterRegistry {
	/// Creates a registry with the built-in filters.
	pub fn new() -> Self {
		let mut registry = Self::empty();
		registry.register_value_filter("upper", upper);
		registry.register_value_filter("lower", lower);
		registry.register_value_filter("capitalize", capitalize);
		registry.register_value_filter("currency", currency);
		registry.register_value_filter("json", json);
		registry
	}

	/// Creates a registry without any filter.
	pub fn empty() -> Self {
		Self {
			filters: HashMap::new(),
		}
	}

	/// Registers a text filter, replacing any filter with the same name.
	///
	/// The filter receives the display text of the resolved value.
	/// Returns `true` when an existing filter was overwritten.
	pub fn register<F>(&mut self, name: impl Into<String>, filter: F) -> bool
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.register_value_filter(name, move |value: &Value| Ok(filter(&to_display(value))))
	}

	/// Registers a filter that sees the raw value and may fail.
	pub fn register_value_filter<F>(&mut self, name: impl Into<String>, filter: F) -> bool
	where
		F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
	{
		self.filters.insert(name.into(), Arc::new(filter)).is_some()
	}

	/// Returns the filter registered under `name`.
	pub fn get(&self, name: &str) -> Option<&FilterFn> {
		self.filters.get(name)
	}

	/// Returns `true` if `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.filters.contains_key(name)
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Applies the filter `name` to `value`.
	pub fn apply(&self, name: &str, value: &Value) -> Result<String> {
		let filter = self
			.get(name)
			.ok_or_else(|| TemplateError::UnknownFilter(name.to_string()))?;
		filter(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("upper", json!("Alice"), "ALICE")]
	#[case("lower", json!("Alice"), "alice")]
	#[case("capitalize", json!("hELLO wORLD"), "Hello world")]
	#[case("currency", json!(12.5), "$12.5")]
	#[case("json", json!(["a", 1]), r#"["a",1]"#)]
	#[case("json", json!("text"), r#""text""#)]
	fn test_builtin_filters(#[case] name: &str, #[case] value: Value, #[case] expected: &str) {
		let registry = FilterRegistry::new();
		assert_eq!(registry.apply(name, &value).unwrap(), expected);
	}

	#[rstest]
	fn test_unknown_filter() {
		let registry = FilterRegistry::new();
		assert_eq!(
			registry.apply("shout", &json!("x")),
			Err(TemplateError::UnknownFilter("shout".to_string()))
		);
	}

	#[rstest]
	fn test_register_and_overwrite() {
		let mut registry = FilterRegistry::new();
		assert!(!registry.register("reverse", |s| s.chars().rev().collect()));
		assert_eq!(registry.apply("reverse", &json!("abc")).unwrap(), "cba");

		assert!(registry.register("upper", |s| format!("<{}>", s)));
		assert_eq!(registry.apply("upper", &json!("abc")).unwrap(), "<abc>");
	}

	#[rstest]
	fn test_names_are_sorted() {
		let registry = FilterRegistry::new();
		assert_eq!(
			registry.names(),
			vec!["capitalize", "currency", "json", "lower", "upper"]
		);
		assert!(FilterRegistry::empty().names().is_empty());
	}
}
