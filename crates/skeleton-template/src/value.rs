//! Value helpers shared by the compiler and the directive evaluator
//!
//! Record attributes are plain [`serde_json::Value`]s. Templates follow
//! loose truthiness rules: `null`, `false`, `0`, `NaN` and `""` are falsy,
//! everything else (including empty arrays and objects) is truthy.

use crate::error::{Result, TemplateError};
use serde_json::Value;

/// The path keyword that refers to the whole rendering context.
pub const THIS: &str = "this";

/// Returns whether a value counts as "true" in directives and interpolation.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Converts a value to the text inserted into markup.
///
/// Arrays join their items with `,`; objects render as `[object Object]`.
pub fn to_display(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items.iter().map(to_display).collect::<Vec<_>>().join(","),
		Value::Object(_) => "[object Object]".to_string(),
	}
}

fn child<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
	match value {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	}
}

/// Resolves a dotted path strictly.
///
/// Every segment except the last must exist and be non-null, otherwise
/// [`TemplateError::Resolution`] is returned. A missing last segment yields
/// `Ok(None)`.
pub fn resolve<'v>(context: &'v Value, segments: &[String], source: &str) -> Result<Option<&'v Value>> {
	let mut current = Some(context);
	for segment in segments {
		let value = match current {
			Some(v) if !v.is_null() => v,
			_ => return Err(TemplateError::Resolution(source.to_string())),
		};
		current = child(value, segment);
	}
	Ok(current)
}

/// Resolves a dotted path leniently; any missing segment yields `None`.
pub fn lookup<'v>(context: &'v Value, path: &str) -> Option<&'v Value> {
	let path = path.trim();
	if path == THIS {
		return Some(context);
	}
	path.split('.')
		.try_fold(context, |value, segment| child(value, segment.trim()))
}

/// Truthiness of a dotted field on `context`; missing fields are falsy.
pub fn field_is_truthy(context: &Value, path: &str) -> bool {
	lookup(context, path).is_some_and(is_truthy)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), false)]
	#[case(json!(false), false)]
	#[case(json!(0), false)]
	#[case(json!(0.0), false)]
	#[case(json!(""), false)]
	#[case(json!(true), true)]
	#[case(json!(-1), true)]
	#[case(json!("0"), true)]
	#[case(json!([]), true)]
	#[case(json!({}), true)]
	fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!(true), "true")]
	#[case(json!(3), "3")]
	#[case(json!(2.5), "2.5")]
	#[case(json!("x"), "x")]
	#[case(json!(["a", 1, null]), "a,1,")]
	#[case(json!({"a": 1}), "[object Object]")]
	fn test_display(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(to_display(&value), expected);
	}

	#[rstest]
	fn test_resolve_nested() {
		let ctx = json!({"user": {"name": {"first": "Ada"}}, "tags": ["x", "y"]});
		let path = |p: &str| p.split('.').map(String::from).collect::<Vec<_>>();
		assert_eq!(
			resolve(&ctx, &path("user.name.first"), "user.name.first").unwrap(),
			Some(&json!("Ada"))
		);
		assert_eq!(resolve(&ctx, &path("tags.1"), "tags.1").unwrap(), Some(&json!("y")));
		assert_eq!(resolve(&ctx, &path("user.age"), "user.age").unwrap(), None);
	}

	#[rstest]
	fn test_resolve_missing_intermediate_fails() {
		let ctx = json!({"user": null});
		let path = vec!["user".to_string(), "name".to_string()];
		assert_eq!(
			resolve(&ctx, &path, "user.name"),
			Err(TemplateError::Resolution("user.name".to_string()))
		);
		let path = vec!["nope".to_string(), "a".to_string(), "b".to_string()];
		assert!(resolve(&ctx, &path, "nope.a.b").is_err());
	}

	#[rstest]
	fn test_lookup_is_lenient() {
		let ctx = json!({"a": {"b": 0}});
		assert_eq!(lookup(&ctx, "a.b"), Some(&json!(0)));
		assert_eq!(lookup(&ctx, "x.y.z"), None);
		assert_eq!(lookup(&ctx, "this"), Some(&ctx));
		assert!(!field_is_truthy(&ctx, "a.b"));
		assert!(field_is_truthy(&ctx, "a"));
	}
}
