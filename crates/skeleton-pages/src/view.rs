//! List views
//!
//! A [`List`] binds a [`Collection`] to a container element of a shared
//! [`Document`] and a compiled [`Template`]. Every mutation updates the
//! collection, patches the container and then notifies listeners.
//!
//! Each rendered root element carries `data-id="<index>"`. The list itself
//! never scrapes the tree for it: it keeps the node handles of every rendered
//! record, keyed by index.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use skeleton_pages::{List, Model, shared_document};
//!
//! let document = shared_document(r#"<ul id="todos"></ul>"#);
//! let todos = List::builder(document)
//! 	.model(Model::with_defaults(json!({"text": "", "isCompleted": false})).unwrap())
//! 	.element("todos")
//! 	.template(r#"<li data-show="isCompleted">{{ text }}</li>"#)
//! 	.build()
//! 	.unwrap();
//!
//! todos.push(json!({"text": "milk", "isCompleted": true})).unwrap();
//! todos.push(json!({"text": "eggs"})).unwrap();
//! assert_eq!(
//! 	todos.html(),
//! 	concat!(
//! 		r#"<li data-show="isCompleted" data-id="0">milk</li>"#,
//! 		r#"<li data-show="isCompleted" style="display: none;" data-id="1">eggs</li>"#,
//! 	)
//! );
//! ```
//!
//! ## Reentrancy
//!
//! Listeners run after every internal borrow has been released, so a
//! listener may call back into the same list. Nested calls run to
//! completion before the outer notification continues with its next
//! listener.

use crate::collection::Collection;
use crate::error::{PagesError, Result};
use crate::events::{
	EventHub, EventKind, Listener, Notification, Subscription, dispatch, parse_kinds,
};
use crate::model::{INDEX_FIELD, Model, Record};
use crate::settings::{ListSettings, TemplateSource};
use crate::{debug_log, info_log};
use serde_json::Value;
use skeleton_template::{Document, FilterRegistry, NodeId, RenderOptions, Template, is_truthy};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

/// Attribute joining rendered root elements to record indices.
pub const DATA_ID_ATTR: &str = "data-id";

/// A document shared between lists and the application.
pub type SharedDocument = Rc<RefCell<Document>>;

/// Parses `markup` into a new [`SharedDocument`].
pub fn shared_document(markup: &str) -> SharedDocument {
	Rc::new(RefCell::new(Document::from_html(markup)))
}

struct ListState {
	collection: Collection,
	nodes: HashMap<usize, Vec<NodeId>>,
	filters: FilterRegistry,
}

struct ListInner {
	model: Model,
	document: SharedDocument,
	container: NodeId,
	template: Template,
	options: RenderOptions,
	state: RefCell<ListState>,
	hub: Rc<RefCell<EventHub>>,
}

impl ListInner {
	fn render(
		&self,
		doc: &mut Document,
		filters: &FilterRegistry,
		record: &Record,
	) -> Result<Vec<NodeId>> {
		let roots = self
			.template
			.render_into(doc, record.as_json(), filters, &self.options)?;
		if let Some(index) = record.index() {
			let id = index.to_string();
			for &root in &roots {
				if doc.is_element(root) {
					doc.set_attr(root, DATA_ID_ATTR, id.as_str());
				}
			}
		}
		Ok(roots)
	}

	/// Replaces the container content with the records in `order`.
	///
	/// Everything is rendered before the container is touched.
	fn rerender(&self, state: &mut ListState, doc: &mut Document, order: &[usize]) -> Result<()> {
		let mut rendered = Vec::with_capacity(order.len());
		for &index in order {
			let Some(record) = state.collection.get(index) else {
				continue;
			};
			match self.render(doc, &state.filters, record) {
				Ok(roots) => rendered.push((index, roots)),
				Err(e) => {
					free(doc, rendered.into_iter().flat_map(|(_, roots)| roots));
					return Err(e);
				}
			}
		}
		doc.clear_children(self.container);
		state.nodes.clear();
		for (index, roots) in rendered {
			for &root in &roots {
				doc.append_child(self.container, root);
			}
			state.nodes.insert(index, roots);
		}
		Ok(())
	}
}

fn free(doc: &mut Document, nodes: impl IntoIterator<Item = NodeId>) {
	for node in nodes {
		doc.remove_node(node);
	}
}

fn index_of(value: &Value) -> Option<u64> {
	value.get(INDEX_FIELD).and_then(Value::as_u64)
}

#[derive(Clone, Copy)]
enum Placement {
	Back,
	Front,
}

/// A collection of records rendered into a container element.
///
/// Cloning yields another handle to the same list.
#[derive(Clone)]
pub struct List {
	inner: Rc<ListInner>,
}

impl fmt::Debug for List {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.try_borrow();
		f.debug_struct("List")
			.field("container", &self.inner.container)
			.field("template", &self.inner.template.source())
			.field("size", &state.as_ref().map(|s| s.collection.len()).ok())
			.finish()
	}
}

impl List {
	/// Starts building a list rendered into `document`.
	pub fn builder(document: SharedDocument) -> ListBuilder {
		ListBuilder::new(document)
	}

	fn notify(&self, kind: EventKind, payload: Value) {
		dispatch(&self.inner.hub, &Notification::new(kind, payload));
	}

	fn insert(&self, mut record: Record, placement: Placement) -> Result<usize> {
		let (index, payload) = {
			let mut state = self.inner.state.borrow_mut();
			let mut doc = self.inner.document.borrow_mut();
			record.assign_index(state.collection.peek_index());
			let roots = self.inner.render(&mut doc, &state.filters, &record)?;
			let container = self.inner.container;
			let index = match placement {
				Placement::Back => {
					for &root in &roots {
						doc.append_child(container, root);
					}
					state.collection.insert_back(record)
				}
				Placement::Front => {
					for &root in roots.iter().rev() {
						doc.prepend_child(container, root);
					}
					state.collection.insert_front(record)
				}
			};
			state.nodes.insert(index, roots);
			let payload = state
				.collection
				.get(index)
				.map(Record::to_json)
				.unwrap_or_default();
			(index, payload)
		};
		debug_log!(index, "record inserted");
		self.notify(EventKind::Push, payload);
		Ok(index)
	}

	/// Appends a record built from `data`.
	///
	/// A falsy `data` (`null`, `false`, `0`, `""`) is ignored and yields
	/// `Ok(None)`. Notifies `push`.
	pub fn push(&self, data: Value) -> Result<Option<usize>> {
		if !is_truthy(&data) {
			return Ok(None);
		}
		let record = self.inner.model.create(data)?;
		self.insert(record, Placement::Back).map(Some)
	}

	/// Prepends a record built from `data`; otherwise like [`List::push`].
	pub fn unshift(&self, data: Value) -> Result<Option<usize>> {
		if !is_truthy(&data) {
			return Ok(None);
		}
		let record = self.inner.model.create(data)?;
		self.insert(record, Placement::Front).map(Some)
	}

	/// Appends an already constructed record.
	///
	/// The record must come from this list's model. It receives a fresh
	/// index. Notifies `push`.
	pub fn push_record(&self, record: Record) -> Result<usize> {
		if !record.model().same(&self.inner.model) {
			return Err(PagesError::InvalidArguments(
				"record was created from a different model".to_string(),
			));
		}
		self.insert(record, Placement::Back)
	}

	/// Appends every item of `items` as one batch.
	///
	/// All records are built and rendered before anything changes, so a
	/// failing item leaves the list untouched. Notifies `pushAll` with every
	/// record of the list.
	pub fn push_all<I>(&self, items: I) -> Result<Vec<usize>>
	where
		I: IntoIterator<Item = Value>,
	{
		let mut records = items
			.into_iter()
			.map(|data| self.inner.model.create(data))
			.collect::<Result<Vec<_>>>()?;
		let (indices, payload) = {
			let mut state = self.inner.state.borrow_mut();
			let mut doc = self.inner.document.borrow_mut();
			let first = state.collection.peek_index();
			let mut rendered = Vec::with_capacity(records.len());
			for (offset, record) in records.iter_mut().enumerate() {
				record.assign_index(first + offset);
				match self.inner.render(&mut doc, &state.filters, record) {
					Ok(roots) => rendered.push(roots),
					Err(e) => {
						free(&mut doc, rendered.into_iter().flatten());
						return Err(e);
					}
				}
			}
			let mut indices = Vec::with_capacity(records.len());
			for (record, roots) in records.into_iter().zip(rendered) {
				for &root in &roots {
					doc.append_child(self.inner.container, root);
				}
				let index = state.collection.insert_back(record);
				state.nodes.insert(index, roots);
				indices.push(index);
			}
			(indices, Value::Array(state.collection.to_json()))
		};
		debug_log!(count = indices.len(), "records appended");
		self.notify(EventKind::PushAll, payload);
		Ok(indices)
	}

	/// Removes the record at `index` and its rendered nodes.
	///
	/// Returns `None` without notifying when no record holds `index`.
	/// Notifies `remove` with the removed record.
	pub fn remove(&self, index: usize) -> Option<Value> {
		let removed = {
			let mut state = self.inner.state.borrow_mut();
			let record = state.collection.remove(index)?;
			if let Some(roots) = state.nodes.remove(&index) {
				free(&mut self.inner.document.borrow_mut(), roots);
			}
			record.to_json()
		};
		debug_log!(index, "record removed");
		self.notify(EventKind::Remove, removed.clone());
		Some(removed)
	}

	/// Removes every record and empties the container. Notifies `removeAll`.
	pub fn remove_all(&self) {
		let count = {
			let mut state = self.inner.state.borrow_mut();
			let count = state.collection.len();
			state.collection.clear();
			state.nodes.clear();
			self.inner
				.document
				.borrow_mut()
				.clear_children(self.inner.container);
			count
		};
		debug_log!(count, "all records removed");
		self.notify(EventKind::RemoveAll, Value::Null);
	}

	/// Merges `fields` into the record at `index` and re-renders it in place.
	///
	/// A falsy `fields` or an absent index is a no-op returning `Ok(None)`.
	/// Fails with [`PagesError::MissingDataId`] when the record has no
	/// rendered nodes (for example while hidden by [`List::filter`]). The
	/// record only changes once its new markup is in place. Notifies `edit`.
	pub fn edit(&self, index: usize, fields: Value) -> Result<Option<Value>> {
		if !is_truthy(&fields) {
			return Ok(None);
		}
		let updated = {
			let mut state = self.inner.state.borrow_mut();
			let Some(mut record) = state.collection.get(index).cloned() else {
				return Ok(None);
			};
			let anchor = state
				.nodes
				.get(&index)
				.and_then(|roots| roots.first().copied())
				.ok_or(PagesError::MissingDataId(index))?;
			record.merge(fields)?;
			let mut doc = self.inner.document.borrow_mut();
			let roots = self.inner.render(&mut doc, &state.filters, &record)?;
			for &root in &roots {
				doc.insert_before(anchor, root);
			}
			if let Some(old) = state.nodes.insert(index, roots) {
				free(&mut doc, old);
			}
			let json = record.to_json();
			if let Some(slot) = state.collection.get_mut(index) {
				*slot = record;
			}
			json
		};
		debug_log!(index, "record edited");
		self.notify(EventKind::Edit, updated.clone());
		Ok(Some(updated))
	}

	/// Renders only the records for which `predicate` holds.
	///
	/// The collection is left unchanged; only the container content is
	/// replaced. Notifies `filter` with the matching records.
	pub fn filter<F>(&self, predicate: F) -> Result<Vec<Value>>
	where
		F: Fn(&Value) -> bool,
	{
		let matched: Vec<Value> = self.models().into_iter().filter(|m| predicate(m)).collect();
		let matched = {
			let mut state = self.inner.state.borrow_mut();
			let mut doc = self.inner.document.borrow_mut();
			let order: Vec<usize> = matched
				.iter()
				.filter_map(index_of)
				.filter_map(|i| usize::try_from(i).ok())
				.filter(|&i| state.collection.contains(i))
				.collect();
			self.inner.rerender(&mut state, &mut doc, &order)?;
			order
				.iter()
				.filter_map(|&i| state.collection.get(i).map(Record::to_json))
				.collect::<Vec<_>>()
		};
		debug_log!(matched = matched.len(), "view filtered");
		self.notify(EventKind::Filter, Value::Array(matched.clone()));
		Ok(matched)
	}

	/// Sorts by index, ascending. Notifies `sort`.
	pub fn sort(&self) -> Result<Vec<Value>> {
		let order = self
			.inner
			.state
			.borrow()
			.collection
			.sorted_indices(|a, b| a.index().cmp(&b.index()));
		self.apply_order(order)
	}

	/// Reorders records with `compare` and re-renders every record.
	///
	/// The sort is stable. Indices stay attached to their records; only the
	/// display order changes. Notifies `sort` with the sorted records.
	pub fn sort_by<F>(&self, mut compare: F) -> Result<Vec<Value>>
	where
		F: FnMut(&Value, &Value) -> Ordering,
	{
		// `compare` runs on snapshots so it may read the list.
		let mut models = self.models();
		models.sort_by(|a, b| compare(a, b));
		let order = models
			.iter()
			.filter_map(index_of)
			.filter_map(|i| usize::try_from(i).ok())
			.collect();
		self.apply_order(order)
	}

	fn apply_order(&self, mut order: Vec<usize>) -> Result<Vec<Value>> {
		let sorted = {
			let mut state = self.inner.state.borrow_mut();
			let mut doc = self.inner.document.borrow_mut();
			order.retain(|&i| state.collection.contains(i));
			let listed: HashSet<usize> = order.iter().copied().collect();
			order.extend(
				state
					.collection
					.indices()
					.into_iter()
					.filter(|i| !listed.contains(i)),
			);
			self.inner.rerender(&mut state, &mut doc, &order)?;
			state.collection.reorder(&order);
			state.collection.to_json()
		};
		debug_log!(count = sorted.len(), "records sorted");
		self.notify(EventKind::Sort, Value::Array(sorted.clone()));
		Ok(sorted)
	}

	/// Re-renders every record in collection order without notifying.
	///
	/// Also undoes a previous [`List::filter`].
	pub fn update_view(&self) -> Result<()> {
		let mut state = self.inner.state.borrow_mut();
		let mut doc = self.inner.document.borrow_mut();
		let order = state.collection.indices();
		self.inner.rerender(&mut state, &mut doc, &order)?;
		debug_log!(count = order.len(), "view updated");
		Ok(())
	}

	/// Removes every record whose attributes equal all entries of `fields`.
	///
	/// Notifies `remove` once per removed record.
	pub fn remove_by_fields(&self, fields: &Value) -> Result<Vec<Value>> {
		let Value::Object(fields) = fields else {
			return Err(PagesError::InvalidArguments(format!(
				"expected an object of fields, got {}",
				fields
			)));
		};
		let indices = self.inner.state.borrow().collection.matching(fields);
		Ok(indices
			.into_iter()
			.filter_map(|index| self.remove(index))
			.collect())
	}

	/// JSON snapshot of the record at `index`.
	pub fn get(&self, index: usize) -> Option<Value> {
		self.inner
			.state
			.borrow()
			.collection
			.get(index)
			.map(Record::to_json)
	}

	/// Copy of the record at `index`.
	pub fn get_model(&self, index: usize) -> Option<Record> {
		self.inner.state.borrow().collection.get(index).cloned()
	}

	/// Number of records, rendered or not.
	pub fn size(&self) -> usize {
		self.inner.state.borrow().collection.len()
	}

	/// Smallest index present.
	pub fn first_index(&self) -> Option<usize> {
		self.inner.state.borrow().collection.first_index()
	}

	/// Largest index present.
	pub fn last_index(&self) -> Option<usize> {
		self.inner.state.borrow().collection.last_index()
	}

	/// JSON snapshots of all records in display order.
	pub fn models(&self) -> Vec<Value> {
		self.inner.state.borrow().collection.to_json()
	}

	/// Calls `f` with a snapshot of every record in display order.
	pub fn for_each<F>(&self, mut f: F)
	where
		F: FnMut(&Value),
	{
		for model in self.models() {
			f(&model);
		}
	}

	/// The model records of this list are created from.
	pub fn model(&self) -> &Model {
		&self.inner.model
	}

	/// Registers or replaces a template filter. Returns `true` on replace.
	///
	/// Already rendered records keep their markup until re-rendered.
	pub fn add_filter<F>(&self, name: impl Into<String>, filter: F) -> bool
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.inner.state.borrow_mut().filters.register(name, filter)
	}

	/// Subscribes `listener` to `push` and `remove`.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&Notification) + 'static,
	{
		self.subscribe_to(&[EventKind::Push, EventKind::Remove], listener)
	}

	/// Subscribes `listener` to the given kinds.
	pub fn subscribe_to<F>(&self, kinds: &[EventKind], listener: F) -> Subscription
	where
		F: Fn(&Notification) + 'static,
	{
		let listener: Listener = Rc::new(listener);
		let id = self.inner.hub.borrow_mut().subscribe(kinds, listener);
		Subscription::new(&self.inner.hub, id)
	}

	/// Subscribes `listener` to kinds given by name (`"push"`, `"pushAll"`, ...).
	///
	/// Fails with [`PagesError::UnknownEventKind`] before registering anything.
	pub fn subscribe_named<F>(&self, names: &[&str], listener: F) -> Result<Subscription>
	where
		F: Fn(&Notification) + 'static,
	{
		let kinds = parse_kinds(names)?;
		Ok(self.subscribe_to(&kinds, listener))
	}

	/// Number of listeners registered for `kind`.
	pub fn listener_count(&self, kind: EventKind) -> usize {
		self.inner.hub.borrow().listener_count(kind)
	}

	/// Markup currently inside the container.
	pub fn html(&self) -> String {
		self.inner.document.borrow().inner_html(self.inner.container)
	}

	/// `data-id` values of the container's element children, in order.
	pub fn rendered_indices(&self) -> Vec<usize> {
		let doc = self.inner.document.borrow();
		doc.element_children(self.inner.container)
			.into_iter()
			.filter_map(|el| doc.attr(el, DATA_ID_ATTR)?.parse().ok())
			.collect()
	}

	/// The container element.
	pub fn container(&self) -> NodeId {
		self.inner.container
	}

	/// The document this list renders into.
	pub fn document(&self) -> SharedDocument {
		Rc::clone(&self.inner.document)
	}

	/// A handle that does not keep the list alive.
	///
	/// Listeners that call back into their own list should capture one of
	/// these to avoid a reference cycle.
	pub fn downgrade(&self) -> WeakList {
		WeakList {
			inner: Rc::downgrade(&self.inner),
		}
	}
}

/// Non-owning handle to a [`List`].
#[derive(Clone)]
pub struct WeakList {
	inner: Weak<ListInner>,
}

impl fmt::Debug for WeakList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakList")
			.field("alive", &(self.inner.strong_count() > 0))
			.finish()
	}
}

impl WeakList {
	/// Returns the list if it still exists.
	pub fn upgrade(&self) -> Option<List> {
		self.inner.upgrade().map(|inner| List { inner })
	}
}

/// Builder for [`List`].
pub struct ListBuilder {
	document: SharedDocument,
	model: Option<Model>,
	element: Option<String>,
	template: Option<TemplateSource>,
	raw_html: bool,
	filters: FilterRegistry,
}

impl fmt::Debug for ListBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListBuilder")
			.field("model", &self.model.is_some())
			.field("element", &self.element)
			.field("template", &self.template)
			.field("raw_html", &self.raw_html)
			.field("filters", &self.filters)
			.finish()
	}
}

impl ListBuilder {
	/// Creates a builder rendering into `document`.
	pub fn new(document: SharedDocument) -> Self {
		Self {
			document,
			model: None,
			element: None,
			template: None,
			raw_html: false,
			filters: FilterRegistry::new(),
		}
	}

	/// Sets the record model.
	pub fn model(mut self, model: Model) -> Self {
		self.model = Some(model);
		self
	}

	/// Sets the container element id.
	pub fn element(mut self, id: impl Into<String>) -> Self {
		self.element = Some(id.into());
		self
	}

	/// Uses `markup` as the template.
	pub fn template(mut self, markup: impl Into<String>) -> Self {
		self.template = Some(TemplateSource::Inline(markup.into()));
		self
	}

	/// Uses the inner markup of the element with `id` as the template.
	pub fn template_id(mut self, id: impl Into<String>) -> Self {
		self.template = Some(TemplateSource::ElementId(id.into()));
		self
	}

	/// Sets the template source.
	pub fn template_source(mut self, source: TemplateSource) -> Self {
		self.template = Some(source);
		self
	}

	/// Inserts interpolated values as markup instead of text.
	pub fn raw_html(mut self, raw_html: bool) -> Self {
		self.raw_html = raw_html;
		self
	}

	/// Registers a template filter before the first render.
	pub fn filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.filters.register(name, filter);
		self
	}

	/// Applies container and template settings.
	pub fn settings(mut self, settings: &ListSettings) -> Self {
		self.element = Some(settings.element.clone());
		self.template = Some(settings.template.clone());
		self.raw_html = settings.raw_html;
		self
	}

	/// Validates the configuration and compiles the template.
	///
	/// Fails with [`PagesError::Validation`] when the model, container or
	/// template is missing, or when the template has no top-level element
	/// outside a `data-loop` to carry the `data-id`. Fails with
	/// [`PagesError::Template`] when the template does not compile.
	pub fn build(self) -> Result<List> {
		let model = self
			.model
			.ok_or_else(|| PagesError::Validation("a model is required".to_string()))?;
		let element = self
			.element
			.ok_or_else(|| PagesError::Validation("a container element is required".to_string()))?;
		let source = self
			.template
			.ok_or_else(|| PagesError::Validation("a template is required".to_string()))?;

		let (container, markup) = {
			let doc = self.document.borrow();
			let container = doc.element_by_id(&element).ok_or_else(|| {
				PagesError::Validation(format!("no element with id \"{}\"", element))
			})?;
			let markup = match source {
				TemplateSource::Inline(markup) => markup,
				TemplateSource::ElementId(id) => {
					let holder = doc.element_by_id(&id).ok_or_else(|| {
						PagesError::Validation(format!("no template element with id \"{}\"", id))
					})?;
					doc.inner_html(holder)
				}
			};
			(container, markup)
		};
		if markup.trim().is_empty() {
			return Err(PagesError::Validation("template is empty".to_string()));
		}
		let template = Template::compile(markup.trim())?;
		if !template.has_element_root() {
			return Err(PagesError::Validation(
				"template needs a top-level element outside data-loop to carry data-id".to_string(),
			));
		}
		info_log!(element = %element, "list created");

		Ok(List {
			inner: Rc::new(ListInner {
				model,
				document: self.document,
				container,
				template,
				options: RenderOptions {
					raw_html: self.raw_html,
				},
				state: RefCell::new(ListState {
					collection: Collection::new(),
					nodes: HashMap::new(),
					filters: self.filters,
				}),
				hub: Rc::new(RefCell::new(EventHub::new())),
			}),
		})
	}
}
