//! Arena-backed markup tree
//!
//! A small document model used both to compile templates and to hold the
//! rendered content of list containers.
//!
//! ## Design
//!
//! - **Arena storage**: nodes live in a `Vec` and are addressed by [`NodeId`]
//!   handles, so owners can keep direct references to rendered nodes instead
//!   of querying the tree by attribute.
//! - **Tolerant parsing**: unknown tags, unclosed elements and stray end tags
//!   never fail; the parser recovers the way browsers do for the common cases.
//! - **Escaping on output**: text and attribute values are stored decoded and
//!   escaped when serialized.
//!
//! ## Example
//!
//! ```
//! use skeleton_template::dom::Document;
//!
//! let mut doc = Document::from_html(r#"<ul id="list"><li>one</li></ul>"#);
//! let list = doc.element_by_id("list").unwrap();
//! let item = doc.create_element("li");
//! let text = doc.create_text("two");
//! doc.append_child(item, text);
//! doc.append_child(list, item);
//! assert_eq!(doc.inner_html(list), "<li>one</li><li>two</li>");
//! ```

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Elements whose content is raw text (no markup, no entity decoding).
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Tag name of the synthetic document root.
const ROOT_TAG: &str = "#document";

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// An element with its tag name and attributes in source order
	Element {
		/// Lower-cased tag name
		tag: String,
		/// Attributes as decoded `(name, value)` pairs
		attrs: Vec<(String, String)>,
	},
	/// Decoded character data
	Text(String),
	/// Comment body (without `<!--` / `-->`)
	Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An owned markup tree.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<Option<NodeData>>,
	free: Vec<usize>,
	root: NodeId,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates an empty document containing only the synthetic root.
	pub fn new() -> Self {
		let root = NodeData {
			kind: NodeKind::Element {
				tag: ROOT_TAG.to_string(),
				attrs: Vec::new(),
			},
			parent: None,
			children: Vec::new(),
		};
		Self {
			nodes: vec![Some(root)],
			free: Vec::new(),
			root: NodeId(0),
		}
	}

	/// Parses `markup` into a new document.
	pub fn from_html(markup: &str) -> Self {
		let mut doc = Self::new();
		let root = doc.root;
		doc.set_inner_html(root, markup);
		doc
	}

	/// Returns the synthetic root node.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of live nodes, the root included.
	pub fn len(&self) -> usize {
		self.nodes.len() - self.free.len()
	}

	/// Returns `true` when only the root is present.
	pub fn is_empty(&self) -> bool {
		self.len() == 1
	}

	/// Returns `true` if `id` refers to a live node.
	pub fn contains(&self, id: NodeId) -> bool {
		self.node(id).is_some()
	}

	fn node(&self, id: NodeId) -> Option<&NodeData> {
		self.nodes.get(id.0).and_then(Option::as_ref)
	}

	fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
		self.nodes.get_mut(id.0).and_then(Option::as_mut)
	}

	fn alloc(&mut self, kind: NodeKind) -> NodeId {
		let data = NodeData {
			kind,
			parent: None,
			children: Vec::new(),
		};
		match self.free.pop() {
			Some(slot) => {
				self.nodes[slot] = Some(data);
				NodeId(slot)
			}
			None => {
				self.nodes.push(Some(data));
				NodeId(self.nodes.len() - 1)
			}
		}
	}

	/// Creates a detached element.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.alloc(NodeKind::Element {
			tag: tag.to_ascii_lowercase(),
			attrs: Vec::new(),
		})
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.alloc(NodeKind::Text(text.into()))
	}

	/// Creates a detached comment node.
	pub fn create_comment(&mut self, body: impl Into<String>) -> NodeId {
		self.alloc(NodeKind::Comment(body.into()))
	}

	/// Returns the payload of a node.
	pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
		self.node(id).map(|n| &n.kind)
	}

	/// Returns the tag name of an element node.
	pub fn tag(&self, id: NodeId) -> Option<&str> {
		match self.kind(id)? {
			NodeKind::Element { tag, .. } => Some(tag),
			_ => None,
		}
	}

	/// Returns `true` for element nodes (the document root excluded).
	pub fn is_element(&self, id: NodeId) -> bool {
		id != self.root && self.tag(id).is_some()
	}

	/// Returns the content of a text node.
	pub fn text(&self, id: NodeId) -> Option<&str> {
		match self.kind(id)? {
			NodeKind::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Returns the parent of a node, if attached.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.node(id).and_then(|n| n.parent)
	}

	/// Returns the children of a node in order.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
	}

	/// Returns the element children of a node in order.
	pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
		self.children(id)
			.iter()
			.copied()
			.filter(|&c| self.is_element(c))
			.collect()
	}

	/// Returns `id` and all of its descendants in document order.
	pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		let mut stack = vec![id];
		while let Some(current) = stack.pop() {
			if !self.contains(current) {
				continue;
			}
			out.push(current);
			stack.extend(self.children(current).iter().rev().copied());
		}
		out
	}

	/// Detaches a node from its parent, keeping it alive.
	pub fn detach(&mut self, id: NodeId) {
		let Some(parent) = self.parent(id) else {
			return;
		};
		if let Some(p) = self.node_mut(parent) {
			p.children.retain(|&c| c != id);
		}
		if let Some(n) = self.node_mut(id) {
			n.parent = None;
		}
	}

	/// Appends `child` as the last child of `parent`.
	///
	/// The child is detached from its current parent first.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		if parent == child || !self.contains(parent) || !self.contains(child) {
			return;
		}
		self.detach(child);
		if let Some(p) = self.node_mut(parent) {
			p.children.push(child);
		}
		if let Some(c) = self.node_mut(child) {
			c.parent = Some(parent);
		}
	}

	/// Inserts `child` as the first child of `parent`.
	pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
		if parent == child || !self.contains(parent) || !self.contains(child) {
			return;
		}
		self.detach(child);
		if let Some(p) = self.node_mut(parent) {
			p.children.insert(0, child);
		}
		if let Some(c) = self.node_mut(child) {
			c.parent = Some(parent);
		}
	}

	/// Inserts `child` immediately before `reference` in its parent.
	///
	/// Returns `false` (and does nothing) when `reference` is detached.
	pub fn insert_before(&mut self, reference: NodeId, child: NodeId) -> bool {
		if reference == child || !self.contains(child) {
			return false;
		}
		let Some(parent) = self.parent(reference) else {
			return false;
		};
		self.detach(child);
		let Some(p) = self.node_mut(parent) else {
			return false;
		};
		let position = p
			.children
			.iter()
			.position(|&c| c == reference)
			.unwrap_or(p.children.len());
		p.children.insert(position, child);
		if let Some(c) = self.node_mut(child) {
			c.parent = Some(parent);
		}
		true
	}

	/// Detaches a node and frees it together with its whole subtree.
	///
	/// Handles to freed nodes become invalid and their slots may be reused.
	pub fn remove_node(&mut self, id: NodeId) {
		if id == self.root || !self.contains(id) {
			return;
		}
		self.detach(id);
		for node in self.subtree(id) {
			self.nodes[node.0] = None;
			self.free.push(node.0);
		}
	}

	/// Removes and frees every child of `id`.
	pub fn clear_children(&mut self, id: NodeId) {
		for child in self.children(id).to_vec() {
			self.remove_node(child);
		}
	}

	/// Returns the attributes of an element.
	pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
		match self.kind(id) {
			Some(NodeKind::Element { attrs, .. }) => attrs,
			_ => &[],
		}
	}

	/// Returns an attribute value.
	pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
		self.attrs(id)
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	/// Returns `true` if the element carries attribute `name`.
	pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
		self.attr(id, name).is_some()
	}

	/// Sets an attribute, replacing an existing value in place.
	pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
		let value = value.into();
		if let Some(NodeData {
			kind: NodeKind::Element { attrs, .. },
			..
		}) = self.node_mut(id)
		{
			match attrs.iter_mut().find(|(n, _)| n == name) {
				Some(slot) => slot.1 = value,
				None => attrs.push((name.to_string(), value)),
			}
		}
	}

	/// Removes an attribute, returning whether it was present.
	pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
		if let Some(NodeData {
			kind: NodeKind::Element { attrs, .. },
			..
		}) = self.node_mut(id)
		{
			let before = attrs.len();
			attrs.retain(|(n, _)| n != name);
			return attrs.len() < before;
		}
		false
	}

	/// Finds the first attached element whose `id` attribute equals `id_value`.
	pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
		self.subtree(self.root)
			.into_iter()
			.find(|&n| self.is_element(n) && self.attr(n, "id") == Some(id_value))
	}

	/// Finds all attached elements with `name="value"` in document order.
	pub fn query_attr(&self, name: &str, value: &str) -> Vec<NodeId> {
		self.subtree(self.root)
			.into_iter()
			.filter(|&n| self.is_element(n) && self.attr(n, name) == Some(value))
			.collect()
	}

	/// Serializes the children of `id`.
	pub fn inner_html(&self, id: NodeId) -> String {
		let raw = self.tag(id).is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
		let mut out = String::new();
		for &child in self.children(id) {
			self.write_node(child, raw, &mut out);
		}
		out
	}

	/// Serializes `id` itself, including its own tag.
	pub fn outer_html(&self, id: NodeId) -> String {
		if id == self.root {
			return self.inner_html(id);
		}
		let raw = self
			.parent(id)
			.and_then(|p| self.tag(p))
			.is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
		let mut out = String::new();
		self.write_node(id, raw, &mut out);
		out
	}

	fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
		let Some(node) = self.node(id) else {
			return;
		};
		match &node.kind {
			NodeKind::Text(text) if raw_text => out.push_str(text),
			NodeKind::Text(text) => out.push_str(&escape_text(text)),
			NodeKind::Comment(body) => {
				out.push_str("<!--");
				out.push_str(body);
				out.push_str("-->");
			}
			NodeKind::Element { tag, attrs } => {
				out.push('<');
				out.push_str(tag);
				for (name, value) in attrs {
					out.push(' ');
					out.push_str(name);
					if !value.is_empty() {
						out.push_str("=\"");
						out.push_str(&escape_attr(value));
						out.push('"');
					}
				}
				out.push('>');
				if VOID_ELEMENTS.contains(&tag.as_str()) {
					return;
				}
				let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
				for &child in &node.children {
					self.write_node(child, raw, out);
				}
				out.push_str("</");
				out.push_str(tag);
				out.push('>');
			}
		}
	}

	/// Parses `markup` into detached nodes owned by this document.
	///
	/// Returns the top-level nodes in order.
	pub fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
		let holder = self.create_element("template");
		self.parse_into(holder, markup);
		let roots = self.children(holder).to_vec();
		for &r in &roots {
			self.detach(r);
		}
		self.remove_node(holder);
		roots
	}

	/// Replaces the children of `id` with the parsed `markup`.
	pub fn set_inner_html(&mut self, id: NodeId, markup: &str) {
		self.clear_children(id);
		self.parse_into(id, markup);
	}

	fn parse_into(&mut self, parent: NodeId, markup: &str) {
		let mut open = vec![parent];
		for token in Tokenizer::new(markup) {
			let top = open.last().copied().unwrap_or(parent);
			match token {
				Token::Text(text) => {
					let node = self.create_text(text);
					self.append_child(top, node);
				}
				Token::Comment(body) => {
					let node = self.create_comment(body);
					self.append_child(top, node);
				}
				Token::Start {
					tag,
					attrs,
					self_closing,
				} => {
					let node = self.create_element(&tag);
					for (name, value) in attrs {
						if !self.has_attr(node, &name) {
							self.set_attr(node, &name, value);
						}
					}
					self.append_child(top, node);
					if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
						open.push(node);
					}
				}
				Token::End(tag) => {
					// Stray end tags are ignored; the fragment parent is never popped.
					if let Some(pos) = open
						.iter()
						.skip(1)
						.rposition(|&n| self.tag(n) == Some(tag.as_str()))
					{
						open.truncate(pos + 1);
					}
				}
			}
		}
	}
}

/// Escapes character data for output.
pub fn escape_text(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Escapes a string for use in a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Decodes the character references the parser understands.
///
/// Unknown references are kept literally.
pub fn decode_entities(s: &str) -> String {
	if !s.contains('&') {
		return s.to_string();
	}
	let mut out = String::with_capacity(s.len());
	let mut rest = s;
	while let Some(amp) = rest.find('&') {
		out.push_str(&rest[..amp]);
		rest = &rest[amp..];
		let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
			let name = &rest[1..end];
			let ch = match name {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" | "#39" => Some('\''),
				"nbsp" => Some('\u{a0}'),
				_ => name
					.strip_prefix("#x")
					.or_else(|| name.strip_prefix("#X"))
					.and_then(|hex| u32::from_str_radix(hex, 16).ok())
					.or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
					.and_then(char::from_u32),
			};
			ch.map(|c| (c, end))
		});
		match decoded {
			Some((c, end)) => {
				out.push(c);
				rest = &rest[end + 1..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
	Text(String),
	Comment(String),
	Start {
		tag: String,
		attrs: Vec<(String, String)>,
		self_closing: bool,
	},
	End(String),
}

struct Tokenizer<'a> {
	src: &'a str,
	pos: usize,
	raw_until: Option<String>,
}

impl<'a> Tokenizer<'a> {
	fn new(src: &'a str) -> Self {
		Self {
			src,
			pos: 0,
			raw_until: None,
		}
	}

	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	fn skip_whitespace(&mut self) {
		let rest = self.rest();
		self.pos += rest.len() - rest.trim_start().len();
	}

	fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
		let rest = self.rest();
		let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
		self.pos += end;
		&rest[..end]
	}

	/// Like `take_while`, but a `{{ ... }}` run is taken whole.
	fn take_unquoted(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
		let rest = self.rest();
		let mut end = 0;
		while let Some(c) = rest[end..].chars().next() {
			if rest[end..].starts_with("{{") {
				if let Some(close) = rest[end + 2..].find("}}") {
					end += close + 4;
					continue;
				}
			}
			if !pred(c) {
				break;
			}
			end += c.len_utf8();
		}
		self.pos += end;
		&rest[..end]
	}

	fn raw_text(&mut self, tag: &str) -> Token {
		let rest = self.rest();
		let close = format!("</{}", tag);
		let end = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
		self.pos += end;
		Token::Text(rest[..end].to_string())
	}

	fn comment(&mut self) -> Token {
		let body_start = self.pos + 4;
		let (body, next) = match self.src[body_start..].find("-->") {
			Some(end) => (
				&self.src[body_start..body_start + end],
				body_start + end + 3,
			),
			None => (&self.src[body_start..], self.src.len()),
		};
		self.pos = next;
		Token::Comment(body.to_string())
	}

	fn skip_declaration(&mut self) {
		match self.rest().find('>') {
			Some(end) => self.pos += end + 1,
			None => self.pos = self.src.len(),
		}
	}

	fn end_tag(&mut self) -> Token {
		self.pos += 2;
		let name = self.take_while(|c| !c.is_whitespace() && c != '>');
		let name = name.to_ascii_lowercase();
		self.skip_declaration();
		Token::End(name)
	}

	fn start_tag(&mut self) -> Token {
		self.pos += 1;
		let tag = self
			.take_while(|c| !c.is_whitespace() && c != '>' && c != '/')
			.to_ascii_lowercase();
		let mut attrs = Vec::new();
		let mut self_closing = false;
		loop {
			self.skip_whitespace();
			let rest = self.rest();
			if rest.is_empty() {
				break;
			}
			if rest.starts_with("/>") {
				self.pos += 2;
				self_closing = true;
				break;
			}
			if rest.starts_with('>') {
				self.pos += 1;
				break;
			}
			if rest.starts_with('/') {
				self.pos += 1;
				continue;
			}
			let name = self.take_unquoted(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/');
			let name = if name.contains("{{") {
				name.to_string()
			} else {
				name.to_ascii_lowercase()
			};
			self.skip_whitespace();
			let value = if self.rest().starts_with('=') {
				self.pos += 1;
				self.skip_whitespace();
				self.attr_value()
			} else {
				String::new()
			};
			if !name.is_empty() {
				attrs.push((name, value));
			}
		}
		if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) && !self_closing {
			self.raw_until = Some(tag.clone());
		}
		Token::Start {
			tag,
			attrs,
			self_closing,
		}
	}

	fn attr_value(&mut self) -> String {
		let rest = self.rest();
		match rest.chars().next() {
			Some(quote @ ('"' | '\'')) => {
				let body = &rest[1..];
				let end = body.find(quote).unwrap_or(body.len());
				self.pos += 1 + end + usize::from(end < body.len());
				decode_entities(&body[..end])
			}
			_ => decode_entities(self.take_unquoted(|c| !c.is_whitespace() && c != '>')),
		}
	}

	fn text(&mut self) -> Token {
		let rest = self.rest();
		// A '<' that does not open a tag is kept as text.
		let mut end = rest.len();
		for (i, _) in rest.match_indices('<').filter(|&(i, _)| i > 0) {
			let after = &rest[i + 1..];
			if after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
				end = i;
				break;
			}
		}
		self.pos += end;
		Token::Text(decode_entities(&rest[..end]))
	}
}

impl Iterator for Tokenizer<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		if self.pos >= self.src.len() {
			return None;
		}
		if let Some(tag) = self.raw_until.take() {
			let token = self.raw_text(&tag);
			if matches!(&token, Token::Text(t) if !t.is_empty()) {
				return Some(token);
			}
			return self.next();
		}
		let rest = self.rest();
		let token = if rest.starts_with("<!--") {
			self.comment()
		} else if rest.starts_with("<!") || rest.starts_with("<?") {
			self.skip_declaration();
			return self.next();
		} else if rest.starts_with("</") {
			self.end_tag()
		} else if rest.starts_with('<')
			&& rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
		{
			self.start_tag()
		} else {
			self.text()
		};
		Some(token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("<p>hi</p>", "<p>hi</p>")]
	#[case("<input type=\"checkbox\" checked>", "<input type=\"checkbox\" checked>")]
	#[case("<br/><hr />", "<br><hr>")]
	#[case("<div class=a>x</div>", "<div class=\"a\">x</div>")]
	#[case("<!-- note --><b>x</b>", "<!-- note --><b>x</b>")]
	#[case("a &lt; b &amp; c", "a &lt; b &amp; c")]
	#[case("<ul><li>1<li>2</ul>", "<ul><li>1<li>2</li></li></ul>")]
	#[case("</span>text", "text")]
	#[case("1 < 2", "1 &lt; 2")]
	fn test_parse_and_serialize(#[case] input: &str, #[case] expected: &str) {
		let doc = Document::from_html(input);
		assert_eq!(doc.inner_html(doc.root()), expected);
	}

	#[rstest]
	fn test_single_quoted_attribute_keeps_json() {
		let doc = Document::from_html(r#"<p data-style='{"color":"done?red:blue"}'></p>"#);
		let p = doc.element_children(doc.root())[0];
		assert_eq!(doc.attr(p, "data-style"), Some(r#"{"color":"done?red:blue"}"#));
		assert_eq!(
			doc.outer_html(p),
			r#"<p data-style="{&quot;color&quot;:&quot;done?red:blue&quot;}"></p>"#
		);
	}

	#[rstest]
	fn test_unquoted_value_keeps_spaced_interpolation() {
		let doc = Document::from_html("<li class={{ c | upper }} title=x>y</li>");
		let li = doc.element_children(doc.root())[0];
		assert_eq!(doc.attr(li, "class"), Some("{{ c | upper }}"));
		assert_eq!(doc.attr(li, "title"), Some("x"));
	}

	#[rstest]
	fn test_script_content_is_raw() {
		let doc = Document::from_html("<script>if (a < b) {}</script>");
		assert_eq!(doc.inner_html(doc.root()), "<script>if (a < b) {}</script>");
	}

	#[rstest]
	fn test_element_by_id_and_query_attr() {
		let doc = Document::from_html(
			r#"<div id="outer"><span data-id="1"></span><span data-id="2"></span></div>"#,
		);
		let outer = doc.element_by_id("outer").unwrap();
		assert_eq!(doc.tag(outer), Some("div"));
		let found = doc.query_attr("data-id", "2");
		assert_eq!(found.len(), 1);
		assert_eq!(doc.parent(found[0]), Some(outer));
		assert!(doc.element_by_id("missing").is_none());
	}

	#[rstest]
	fn test_insert_prepend_and_remove() {
		let mut doc = Document::from_html(r#"<ul id="l"><li>b</li></ul>"#);
		let list = doc.element_by_id("l").unwrap();
		let existing = doc.children(list)[0];

		let first = doc.create_element("li");
		let a = doc.create_text("a");
		doc.append_child(first, a);
		doc.prepend_child(list, first);

		let middle = doc.create_element("li");
		doc.insert_before(existing, middle);
		assert_eq!(doc.inner_html(list), "<li>a</li><li></li><li>b</li>");

		let before = doc.len();
		doc.remove_node(first);
		assert_eq!(doc.len(), before - 2);
		assert!(!doc.contains(first));
		assert_eq!(doc.inner_html(list), "<li></li><li>b</li>");
	}

	#[rstest]
	fn test_freed_slots_are_reused() {
		let mut doc = Document::new();
		let a = doc.create_element("a");
		doc.remove_node(a);
		let b = doc.create_element("b");
		assert_eq!(a, b);
		assert_eq!(doc.tag(b), Some("b"));
	}

	#[rstest]
	fn test_parse_fragment_returns_detached_roots() {
		let mut doc = Document::new();
		let roots = doc.parse_fragment("<li>1</li> <li>2</li>");
		assert_eq!(roots.len(), 3);
		assert!(roots.iter().all(|&r| doc.parent(r).is_none()));
		assert_eq!(doc.outer_html(roots[2]), "<li>2</li>");
	}

	#[rstest]
	fn test_attribute_editing() {
		let mut doc = Document::from_html(r#"<input value="x">"#);
		let input = doc.element_children(doc.root())[0];
		doc.set_attr(input, "value", "y");
		doc.set_attr(input, "checked", "");
		assert!(doc.remove_attr(input, "value"));
		assert!(!doc.remove_attr(input, "value"));
		assert_eq!(doc.outer_html(input), "<input checked>");
	}

	#[rstest]
	#[case("&#65;&#x42;", "AB")]
	#[case("&unknown; &", "&unknown; &")]
	#[case("it&#39;s", "it's")]
	fn test_decode_entities(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(decode_entities(input), expected);
	}
}
