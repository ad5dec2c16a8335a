//! Integration tests for template rendering
//!
//! Covers the full pipeline on realistic list-item markup:
//! interpolation, loops, directives and registered filters together.

use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};
use skeleton_template::{Document, FilterRegistry, RenderOptions, Template, TemplateError};

const TODO_ITEM: &str = r#"<li data-class='{"completed":"isCompleted","editing":"!isCompleted"}'>
	<input class="toggle" type="checkbox" data-checked="isCompleted">
	<label data-style='{"text-decoration":"isCompleted?line-through:none"}'>{{ text }}</label>
	<button class="destroy" data-hide="locked" onclick="remove({{ index }})"></button>
</li>"#;

fn render(source: &str, record: &Value) -> Result<String, TemplateError> {
	Template::compile(source)?.render(record, &FilterRegistry::new(), &RenderOptions::default())
}

#[rstest]
fn test_todo_item_open() {
	// Arrange
	let record = json!({"text": "milk & eggs", "isCompleted": false, "index": 3});

	// Act
	let html = render(TODO_ITEM, &record).unwrap();

	// Assert
	assert!(html.contains(r#"class="editing""#), "{}", html);
	assert!(!html.contains(" checked"), "{}", html);
	assert!(html.contains(r#"style="text-decoration: none;">milk &amp; eggs</label>"#), "{}", html);
	assert!(html.contains(r#"onclick="remove(3)""#), "{}", html);
	assert!(!html.contains("display: none"), "{}", html);
}

#[rstest]
fn test_todo_item_completed_and_locked() {
	// Arrange
	let record = json!({"text": "milk", "isCompleted": true, "index": 0, "locked": true});

	// Act
	let html = render(TODO_ITEM, &record).unwrap();

	// Assert
	assert!(html.contains(r#"class="completed""#), "{}", html);
	assert!(html.contains(r#"data-checked="isCompleted" checked>"#), "{}", html);
	assert!(html.contains("text-decoration: line-through;"), "{}", html);
	assert!(html.contains(r#"style="display: none;""#), "{}", html);
}

#[rstest]
fn test_render_into_shared_document() {
	// Arrange
	let mut doc = Document::from_html(r#"<ul id="list"></ul>"#);
	let list = doc.element_by_id("list").unwrap();
	let template = Template::compile("<li>{{ name }}</li>").unwrap();
	let filters = FilterRegistry::new();

	// Act
	for name in ["a", "b"] {
		let roots = template
			.render_into(&mut doc, &json!({"name": name}), &filters, &RenderOptions::default())
			.unwrap();
		for root in roots {
			doc.append_child(list, root);
		}
	}

	// Assert
	assert_eq!(doc.inner_html(doc.root()), r#"<ul id="list"><li>a</li><li>b</li></ul>"#);
}

#[rstest]
fn test_failed_render_frees_partial_output() {
	// Arrange
	let mut doc = Document::new();
	let template = Template::compile(r#"<p>{{ ok }}</p><p data-loop="items"></p>"#).unwrap();
	let before = doc.len();

	// Act
	let result = template.render_into(
		&mut doc,
		&json!({"ok": "yes", "items": "nope"}),
		&FilterRegistry::new(),
		&RenderOptions::default(),
	);

	// Assert
	assert_eq!(result, Err(TemplateError::NotAnArray("items".to_string())));
	assert_eq!(doc.len(), before);
}

#[rstest]
#[case(json!({}), TemplateError::MissingLoopField("items".to_string()))]
#[case(json!({"items": null}), TemplateError::MissingLoopField("items".to_string()))]
#[case(json!({"items": {"a": 1}}), TemplateError::NotAnArray("items".to_string()))]
fn test_loop_errors(#[case] record: Value, #[case] expected: TemplateError) {
	assert_eq!(render(r#"<li data-loop="items"></li>"#, &record), Err(expected));
}

#[rstest]
fn test_custom_filter_chain() {
	// Arrange
	let mut filters = FilterRegistry::new();
	filters.register("reverse", |s| s.chars().rev().collect());
	let template = Template::compile("{{ word | reverse | upper | currency }}").unwrap();

	// Act
	let out = template
		.render(&json!({"word": "abc"}), &filters, &RenderOptions::default())
		.unwrap();

	// Assert
	assert_eq!(out, "$CBA");
}

#[rstest]
fn test_raw_html_parses_interpolated_markup() {
	// Arrange
	let template = Template::compile("<div>{{ body }} & more</div>").unwrap();
	let record = json!({"body": "<em>hi</em>"});

	// Act
	let escaped = template
		.render(&record, &FilterRegistry::new(), &RenderOptions::default())
		.unwrap();
	let raw = template
		.render(&record, &FilterRegistry::new(), &RenderOptions { raw_html: true })
		.unwrap();

	// Assert
	assert_eq!(escaped, "<div>&lt;em&gt;hi&lt;/em&gt; &amp; more</div>");
	assert_eq!(raw, "<div><em>hi</em> &amp; more</div>");
}

proptest! {
	#[test]
	fn prop_plain_text_survives_interpolation(text in "[^\u{0}]{1,40}") {
		// Act
		let out = render("<p>{{ text }}</p>", &json!({"text": text})).unwrap();

		// Assert
		let mut doc = Document::new();
		let roots = doc.parse_fragment(&out);
		prop_assert_eq!(roots.len(), 1);
		let text_node = doc.children(roots[0]).first().copied();
		prop_assert_eq!(text_node.and_then(|n| doc.text(n)), Some(text.as_str()));
	}
}
