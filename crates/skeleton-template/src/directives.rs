//! Directive evaluation
//!
//! After interpolation and loop expansion, directive attributes on the
//! rendered elements are applied against the record, in this order:
//!
//! 1. `data-checked="field"` sets or removes `checked`
//! 2. `data-hide="field"` sets `display: none` when truthy, clears it otherwise
//! 3. `data-show="field"` is the inverse of `data-hide`
//! 4. `data-style='{"prop":"field?onTrue:onFalse"}'` sets inline style values
//! 5. `data-class='{"name":"field"}'` toggles classes (`"!field"` negates)
//!
//! Each step runs over every element before the next one starts, so when two
//! directives touch the same style property the later step wins.

use crate::dom::{Document, NodeId};
use crate::error::{Result, TemplateError};
use crate::value::field_is_truthy;
use serde_json::{Map, Value};

/// Attribute toggling `checked`.
pub const CHECKED_ATTR: &str = "data-checked";
/// Attribute hiding an element when its field is truthy.
pub const HIDE_ATTR: &str = "data-hide";
/// Attribute showing an element only when its field is truthy.
pub const SHOW_ATTR: &str = "data-show";
/// Attribute mapping style properties to conditional values.
pub const STYLE_ATTR: &str = "data-style";
/// Attribute mapping class names to fields.
pub const CLASS_ATTR: &str = "data-class";

/// Applies all directives found in the subtrees of `roots`.
pub fn apply(doc: &mut Document, roots: &[NodeId], record: &Value) -> Result<()> {
	let elements: Vec<NodeId> = roots
		.iter()
		.flat_map(|&r| doc.subtree(r))
		.filter(|&n| doc.is_element(n))
		.collect();

	for &el in &elements {
		if let Some(field) = doc.attr(el, CHECKED_ATTR).map(str::to_owned) {
			if field_is_truthy(record, &field) {
				doc.set_attr(el, "checked", "");
			} else {
				doc.remove_attr(el, "checked");
			}
		}
	}
	for &el in &elements {
		if let Some(field) = doc.attr(el, HIDE_ATTR).map(str::to_owned) {
			let hidden = field_is_truthy(record, &field);
			set_display_none(doc, el, hidden);
		}
	}
	for &el in &elements {
		if let Some(field) = doc.attr(el, SHOW_ATTR).map(str::to_owned) {
			let shown = field_is_truthy(record, &field);
			set_display_none(doc, el, !shown);
		}
	}
	for &el in &elements {
		if let Some(spec) = doc.attr(el, STYLE_ATTR).map(str::to_owned) {
			for (property, expr) in parse_object(STYLE_ATTR, &spec)? {
				let expr = expect_string(STYLE_ATTR, &property, &expr)?;
				let (field, on_true, on_false) = parse_conditional(expr)?;
				let value = if field_is_truthy(record, field) {
					on_true
				} else {
					on_false
				};
				set_style_property(doc, el, &property, value);
			}
		}
	}
	for &el in &elements {
		if let Some(spec) = doc.attr(el, CLASS_ATTR).map(str::to_owned) {
			for (class, field) in parse_object(CLASS_ATTR, &spec)? {
				let field = expect_string(CLASS_ATTR, &class, &field)?.trim();
				let enabled = match field.strip_prefix('!') {
					Some(negated) => !field_is_truthy(record, negated.trim()),
					None => field_is_truthy(record, field),
				};
				toggle_class(doc, el, &class, enabled);
			}
		}
	}
	Ok(())
}

fn syntax(directive: &'static str, message: impl Into<String>) -> TemplateError {
	TemplateError::DirectiveSyntax {
		directive,
		message: message.into(),
	}
}

fn parse_object(directive: &'static str, spec: &str) -> Result<Map<String, Value>> {
	serde_json::from_str::<Map<String, Value>>(spec)
		.map_err(|e| syntax(directive, format!("invalid JSON object {}: {}", spec, e)))
}

fn expect_string<'v>(directive: &'static str, key: &str, value: &'v Value) -> Result<&'v str> {
	value
		.as_str()
		.ok_or_else(|| syntax(directive, format!("value for \"{}\" must be a string", key)))
}

/// Splits `field?onTrue:onFalse`.
fn parse_conditional(expr: &str) -> Result<(&str, &str, &str)> {
	let malformed = || syntax(STYLE_ATTR, format!("expected \"field?a:b\", got \"{}\"", expr));
	let (field, branches) = expr.split_once('?').ok_or_else(malformed)?;
	let (on_true, on_false) = branches.split_once(':').ok_or_else(malformed)?;
	let field = field.trim();
	if field.is_empty() {
		return Err(malformed());
	}
	Ok((field, on_true.trim(), on_false.trim()))
}

fn style_declarations(doc: &Document, el: NodeId) -> Vec<(String, String)> {
	doc.attr(el, "style")
		.unwrap_or_default()
		.split(';')
		.filter_map(|decl| {
			let (prop, value) = decl.split_once(':')?;
			let prop = prop.trim();
			(!prop.is_empty()).then(|| (prop.to_string(), value.trim().to_string()))
		})
		.collect()
}

fn write_style(doc: &mut Document, el: NodeId, decls: &[(String, String)]) {
	if decls.is_empty() {
		doc.remove_attr(el, "style");
		return;
	}
	let style = decls
		.iter()
		.map(|(p, v)| format!("{}: {};", p, v))
		.collect::<Vec<_>>()
		.join(" ");
	doc.set_attr(el, "style", style);
}

/// Sets an inline style property; an empty value removes it.
pub fn set_style_property(doc: &mut Document, el: NodeId, property: &str, value: &str) {
	let mut decls = style_declarations(doc, el);
	let existing = decls.iter().position(|(p, _)| p == property);
	match (existing, value.is_empty()) {
		(Some(i), true) => {
			decls.remove(i);
		}
		(Some(i), false) => decls[i].1 = value.to_string(),
		(None, true) => {}
		(None, false) => decls.push((property.to_string(), value.to_string())),
	}
	write_style(doc, el, &decls);
}

fn set_display_none(doc: &mut Document, el: NodeId, hidden: bool) {
	set_style_property(doc, el, "display", if hidden { "none" } else { "" });
}

/// Adds or removes a class name.
pub fn toggle_class(doc: &mut Document, el: NodeId, class: &str, enabled: bool) {
	let mut classes: Vec<String> = doc
		.attr(el, "class")
		.unwrap_or_default()
		.split_whitespace()
		.map(String::from)
		.collect();
	let present = classes.iter().any(|c| c == class);
	if enabled && !present {
		classes.push(class.to_string());
	} else if !enabled && present {
		classes.retain(|c| c != class);
	} else {
		return;
	}
	if classes.is_empty() {
		doc.remove_attr(el, "class");
	} else {
		doc.set_attr(el, "class", classes.join(" "));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn run(markup: &str, record: Value) -> Result<String> {
		let mut doc = Document::new();
		let roots = doc.parse_fragment(markup);
		apply(&mut doc, &roots, &record)?;
		Ok(roots.iter().map(|&r| doc.outer_html(r)).collect())
	}

	#[rstest]
	#[case(json!({"done": true}), r#"<input data-checked="done" checked>"#)]
	#[case(json!({"done": false}), r#"<input data-checked="done">"#)]
	fn test_checked(#[case] record: Value, #[case] expected: &str) {
		assert_eq!(run(r#"<input data-checked="done" checked>"#, record).unwrap(), expected);
	}

	#[rstest]
	fn test_hide_and_show() {
		let out = run(
			r#"<p data-hide="done" style="color: red"></p><p data-show="done" style="display: none"></p>"#,
			json!({"done": true}),
		)
		.unwrap();
		assert_eq!(
			out,
			r#"<p data-hide="done" style="color: red; display: none;"></p><p data-show="done"></p>"#
		);
	}

	#[rstest]
	fn test_show_wins_over_hide_on_same_element() {
		let out = run(r#"<p data-hide="a" data-show="a"></p>"#, json!({"a": 1})).unwrap();
		assert_eq!(out, r#"<p data-hide="a" data-show="a"></p>"#);
	}

	#[rstest]
	fn test_style() {
		let markup = r#"<span data-style='{"text-decoration":"done?line-through:none","color":"urgent?red:"}'></span>"#;
		let out = run(markup, json!({"done": true, "urgent": false})).unwrap();
		assert!(out.contains(r#"style="text-decoration: line-through;""#), "{}", out);
	}

	#[rstest]
	fn test_class_with_negation() {
		let markup = r#"<li class="item" data-class='{"completed":"done","active":"!done"}'></li>"#;
		let done = run(markup, json!({"done": true})).unwrap();
		assert!(done.contains(r#"class="item completed""#), "{}", done);
		let open = run(markup, json!({"done": false})).unwrap();
		assert!(open.contains(r#"class="item active""#), "{}", open);
	}

	#[rstest]
	fn test_directives_apply_to_descendants() {
		let out = run(
			r#"<li><input data-checked="done"><label data-hide="done">x</label></li>"#,
			json!({"done": true}),
		)
		.unwrap();
		assert_eq!(
			out,
			r#"<li><input data-checked="done" checked><label data-hide="done" style="display: none;">x</label></li>"#
		);
	}

	#[rstest]
	#[case(r#"<p data-style='{"color":'></p>"#)]
	#[case(r#"<p data-style='{"color":"done"}'></p>"#)]
	#[case(r#"<p data-style='{"color":"?a:b"}'></p>"#)]
	#[case(r#"<p data-style='{"color":1}'></p>"#)]
	#[case(r#"<p data-class='["a"]'></p>"#)]
	fn test_malformed_directives(#[case] markup: &str) {
		assert!(matches!(
			run(markup, json!({})),
			Err(TemplateError::DirectiveSyntax { .. })
		));
	}
}
