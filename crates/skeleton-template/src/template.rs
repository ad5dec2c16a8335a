//! Template compiler
//!
//! A template is parsed once into a node list and evaluated per record:
//!
//! 1. interpolation (`{{ path }}`, `{{ path | filter }}`) against the record
//! 2. loop expansion: an element with `data-loop="field"` is repeated once per
//!    item of the array `field`, with `{{# path }}` resolved against the item
//! 3. directives (see [`crate::directives`])
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use skeleton_template::{FilterRegistry, RenderOptions, Template};
//!
//! let template = Template::compile("<p>Hi {{ name | upper }}</p>").unwrap();
//! let html = template
//! 	.render(&json!({"name": "Alice"}), &FilterRegistry::new(), &RenderOptions::default())
//! 	.unwrap();
//! assert_eq!(html, "<p>Hi ALICE</p>");
//! ```
//!
//! Falsy values (`null`, `false`, `0`, `""`) interpolate as empty text; with
//! a filter they are an error instead.
//!
//! List indices start at `0`, so `{{ index }}` renders nothing for the first
//! record of a list. Markup that needs the index of every record should read
//! the `data-id` attribute stamped on the rendered element. A filtered
//! `{{ index | f }}` does not help: it fails with
//! [`TemplateError::Resolution`] for that record.

mod expr;

pub use expr::{Expr, Path, Segment, parse_segments};

use crate::directives;
use crate::dom::{Document, NodeId, NodeKind, escape_text};
use crate::error::{Result, TemplateError};
use crate::filters::FilterRegistry;
use crate::value::{THIS, is_truthy, lookup, resolve, to_display};
use serde_json::Value;

/// Attribute marking a per-item loop element.
pub const LOOP_ATTR: &str = "data-loop";

/// Options controlling how interpolated text is inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
	/// Parse interpolated text as markup instead of inserting it as text.
	pub raw_html: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct ElementTemplate {
	tag: String,
	attrs: Vec<(String, Vec<Segment>)>,
	children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq)]
enum TemplateNode {
	Text(Vec<Segment>),
	Comment(String),
	Element(ElementTemplate),
	Loop {
		field: String,
		element: ElementTemplate,
	},
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
	source: String,
	nodes: Vec<TemplateNode>,
}

impl Template {
	/// Compiles template markup.
	pub fn compile(source: &str) -> Result<Self> {
		let doc = Document::from_html(source);
		let nodes = compile_children(&doc, doc.root())?;
		tracing::trace!(nodes = nodes.len(), "compiled template");
		Ok(Self {
			source: source.to_string(),
			nodes,
		})
	}

	/// The markup this template was compiled from.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Returns `true` if the template has a top-level element outside any
	/// `data-loop`, so every render yields at least one element root.
	pub fn has_element_root(&self) -> bool {
		self.nodes
			.iter()
			.any(|node| matches!(node, TemplateNode::Element(_)))
	}

	/// Renders `context` to a markup string.
	pub fn render(
		&self,
		context: &Value,
		filters: &FilterRegistry,
		options: &RenderOptions,
	) -> Result<String> {
		let mut doc = Document::new();
		let roots = self.render_into(&mut doc, context, filters, options)?;
		Ok(roots.iter().map(|&r| doc.outer_html(r)).collect())
	}

	/// Renders `context` into detached nodes of `doc` and returns the roots.
	///
	/// On error every node created by this call is freed again.
	pub fn render_into(
		&self,
		doc: &mut Document,
		context: &Value,
		filters: &FilterRegistry,
		options: &RenderOptions,
	) -> Result<Vec<NodeId>> {
		let mut roots = Vec::new();
		let mut renderer = Renderer {
			doc: &mut *doc,
			filters,
			options,
		};
		let scope = Scope {
			record: context,
			item: None,
		};
		let result = renderer
			.render_nodes(&self.nodes, scope, None, &mut roots)
			.and_then(|()| directives::apply(doc, &roots, context));
		if let Err(e) = result {
			for root in roots {
				doc.remove_node(root);
			}
			return Err(e);
		}
		Ok(roots)
	}
}

fn compile_children(doc: &Document, parent: NodeId) -> Result<Vec<TemplateNode>> {
	let mut nodes = Vec::new();
	for &child in doc.children(parent) {
		match doc.kind(child) {
			Some(NodeKind::Text(text)) => nodes.push(TemplateNode::Text(parse_segments(text)?)),
			Some(NodeKind::Comment(body)) => nodes.push(TemplateNode::Comment(body.clone())),
			Some(NodeKind::Element { tag, attrs }) => {
				let mut loop_field = None;
				let mut compiled_attrs = Vec::with_capacity(attrs.len());
				for (name, value) in attrs {
					if name == LOOP_ATTR {
						loop_field = Some(value.trim().to_string());
					} else {
						compiled_attrs.push((name.clone(), parse_segments(value)?));
					}
				}
				let element = ElementTemplate {
					tag: tag.clone(),
					attrs: compiled_attrs,
					children: compile_children(doc, child)?,
				};
				nodes.push(match loop_field {
					Some(field) if field.is_empty() => {
						return Err(TemplateError::Syntax(format!(
							"empty {} attribute on <{}>",
							LOOP_ATTR, element.tag
						)));
					}
					Some(field) => TemplateNode::Loop { field, element },
					None => TemplateNode::Element(element),
				});
			}
			None => {}
		}
	}
	Ok(nodes)
}

#[derive(Clone, Copy)]
struct Scope<'v> {
	record: &'v Value,
	item: Option<&'v Value>,
}

impl<'v> Scope<'v> {
	fn loop_context(&self) -> &'v Value {
		self.item.unwrap_or(self.record)
	}
}

struct Renderer<'a> {
	doc: &'a mut Document,
	filters: &'a FilterRegistry,
	options: &'a RenderOptions,
}

impl Renderer<'_> {
	fn attach(&mut self, parent: Option<NodeId>, node: NodeId, roots: &mut Vec<NodeId>) {
		match parent {
			Some(p) => self.doc.append_child(p, node),
			None => roots.push(node),
		}
	}

	fn render_nodes(
		&mut self,
		nodes: &[TemplateNode],
		scope: Scope<'_>,
		parent: Option<NodeId>,
		roots: &mut Vec<NodeId>,
	) -> Result<()> {
		for node in nodes {
			match node {
				TemplateNode::Text(segments) => self.render_text(segments, scope, parent, roots)?,
				TemplateNode::Comment(body) => {
					let comment = self.doc.create_comment(body.clone());
					self.attach(parent, comment, roots);
				}
				TemplateNode::Element(element) => {
					self.render_element(element, scope, parent, roots)?;
				}
				TemplateNode::Loop { field, element } => {
					let context = scope.loop_context();
					let target = if field == THIS {
						Some(context)
					} else {
						lookup(context, field)
					};
					let items = match target {
						None | Some(Value::Null) => {
							return Err(TemplateError::MissingLoopField(field.clone()));
						}
						Some(Value::Array(items)) => items,
						Some(_) => return Err(TemplateError::NotAnArray(field.clone())),
					};
					for item in items {
						let item_scope = Scope {
							record: scope.record,
							item: Some(item),
						};
						self.render_element(element, item_scope, parent, roots)?;
					}
				}
			}
		}
		Ok(())
	}

	fn render_element(
		&mut self,
		element: &ElementTemplate,
		scope: Scope<'_>,
		parent: Option<NodeId>,
		roots: &mut Vec<NodeId>,
	) -> Result<()> {
		let node = self.doc.create_element(&element.tag);
		// Attached before evaluation so a failure frees it with the roots.
		self.attach(parent, node, roots);
		for (name, segments) in &element.attrs {
			let value = self.eval_segments(segments, scope, false)?;
			self.doc.set_attr(node, name, value);
		}
		self.render_nodes(&element.children, scope, Some(node), roots)
	}

	fn render_text(
		&mut self,
		segments: &[Segment],
		scope: Scope<'_>,
		parent: Option<NodeId>,
		roots: &mut Vec<NodeId>,
	) -> Result<()> {
		let raw = self.options.raw_html && segments.iter().any(Segment::is_dynamic);
		let text = self.eval_segments(segments, scope, raw)?;
		if raw {
			for node in self.doc.parse_fragment(&text) {
				self.attach(parent, node, roots);
			}
		} else {
			let node = self.doc.create_text(text);
			self.attach(parent, node, roots);
		}
		Ok(())
	}

	fn eval_segments(&self, segments: &[Segment], scope: Scope<'_>, escape_literals: bool) -> Result<String> {
		let mut out = String::new();
		for segment in segments {
			match segment {
				Segment::Literal(text) if escape_literals => out.push_str(&escape_text(text)),
				Segment::Literal(text) => out.push_str(text),
				Segment::Interp(expr) => out.push_str(&self.eval_expr(expr, scope.record)?),
				Segment::LoopInterp(expr) => {
					out.push_str(&self.eval_expr(expr, scope.loop_context())?)
				}
			}
		}
		Ok(out)
	}

	fn eval_expr(&self, expr: &Expr, context: &Value) -> Result<String> {
		let value = match &expr.path {
			Path::This => Some(context),
			Path::Fields(fields) => resolve(context, fields, &expr.source)?,
		};
		let Some((first, rest)) = expr.filters.split_first() else {
			return Ok(value
				.filter(|v| is_truthy(v))
				.map(to_display)
				.unwrap_or_default());
		};
		let value = value
			.filter(|v| is_truthy(v))
			.ok_or_else(|| TemplateError::Resolution(expr.source.clone()))?;
		let mut out = self.filters.apply(first, value)?;
		for name in rest {
			out = self.filters.apply(name, &Value::String(out))?;
		}
		Ok(out)
	}
}
