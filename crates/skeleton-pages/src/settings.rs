//! Declarative list configuration
//!
//! A [`ListSettings`] names the container element and the template source,
//! and can be loaded from TOML:
//!
//! ```toml
//! element = "todo-list"
//! raw_html = false
//!
//! [template]
//! id = "todo-template"
//! ```
//!
//! or with the markup inline:
//!
//! ```toml
//! element = "todo-list"
//!
//! [template]
//! inline = "<li>{{ text }}</li>"
//! ```

use crate::error::{PagesError, Result};
use serde::{Deserialize, Serialize};

/// Where a list takes its template markup from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
	/// Markup given directly
	Inline(String),
	/// Inner markup of the document element with this `id`
	#[serde(rename = "id")]
	ElementId(String),
}

/// Container and template configuration for a [`List`](crate::List).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
	/// `id` of the container element
	pub element: String,
	/// Insert interpolated values as markup instead of text
	#[serde(default)]
	pub raw_html: bool,
	/// Template markup source
	pub template: TemplateSource,
}

impl ListSettings {
	/// Settings with an inline template.
	pub fn inline(element: impl Into<String>, template: impl Into<String>) -> Self {
		Self {
			element: element.into(),
			raw_html: false,
			template: TemplateSource::Inline(template.into()),
		}
	}

	/// Settings taking the template from an element id.
	pub fn template_id(element: impl Into<String>, template_id: impl Into<String>) -> Self {
		Self {
			element: element.into(),
			raw_html: false,
			template: TemplateSource::ElementId(template_id.into()),
		}
	}

	/// Parses settings from TOML.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source)
			.map_err(|e| PagesError::Validation(format!("invalid list settings: {}", e)))
	}

	/// Serializes settings to TOML.
	pub fn to_toml_string(&self) -> Result<String> {
		toml::to_string(self)
			.map_err(|e| PagesError::Validation(format!("cannot serialize list settings: {}", e)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_template_id_form() {
		let settings = ListSettings::from_toml_str(
			r#"
			element = "todo-list"
			raw_html = true

			[template]
			id = "todo-template"
			"#,
		)
		.unwrap();
		assert_eq!(settings, {
			let mut expected = ListSettings::template_id("todo-list", "todo-template");
			expected.raw_html = true;
			expected
		});
	}

	#[rstest]
	fn test_inline_form_defaults_raw_html() {
		let settings = ListSettings::from_toml_str(
			r#"
			element = "list"
			template = { inline = "<li>{{ text }}</li>" }
			"#,
		)
		.unwrap();
		assert_eq!(settings, ListSettings::inline("list", "<li>{{ text }}</li>"));
	}

	#[rstest]
	#[case("element = 'list'")]
	#[case("template = { inline = '<li></li>' }")]
	#[case("element = 'list'\ntemplate = { file = 'x' }")]
	#[case("element = ")]
	fn test_invalid_settings(#[case] source: &str) {
		assert!(matches!(
			ListSettings::from_toml_str(source),
			Err(PagesError::Validation(_))
		));
	}

	#[rstest]
	fn test_toml_round_trip() {
		let settings = ListSettings::template_id("list", "tpl");
		let text = settings.to_toml_string().unwrap();
		assert_eq!(ListSettings::from_toml_str(&text).unwrap(), settings);
	}
}
