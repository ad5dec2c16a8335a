//! Record types
//!
//! A [`Model`] is an immutable record type: default attribute values, an
//! optional `init` hook and named behavior functions. [`Model::create`]
//! produces [`Record`]s, mutable attribute bags seeded from the defaults.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use skeleton_pages::Model;
//!
//! let todo = Model::builder()
//! 	.defaults(json!({"text": "", "isCompleted": false}))
//! 	.method("toggle", |record, _args| {
//! 		let done = record.get("isCompleted").is_some();
//! 		record.set("isCompleted", json!(!done));
//! 		json!(!done)
//! 	})
//! 	.build()
//! 	.unwrap();
//!
//! let mut record = todo.create(json!({"text": "milk"})).unwrap();
//! assert_eq!(record.get("text"), Some(&json!("milk")));
//! assert_eq!(record.call("toggle", &[]).unwrap(), json!(true));
//! ```

use crate::error::{PagesError, Result};
use crate::warn_log;
use serde_json::{Map, Value};
use skeleton_template::is_truthy;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Attribute reserved for the collection-assigned index.
pub const INDEX_FIELD: &str = "index";

/// Hook run once per record after its attributes are set.
pub type InitHook = Rc<dyn Fn(&mut Record)>;

/// Named behavior function callable through [`Record::call`].
pub type Method = Rc<dyn Fn(&mut Record, &[Value]) -> Value>;

struct ModelDef {
	defaults: Option<Map<String, Value>>,
	init: Option<InitHook>,
	methods: HashMap<String, Method>,
}

/// An immutable record type definition.
///
/// Cloning is cheap; clones share the definition.
#[derive(Clone)]
pub struct Model {
	def: Rc<ModelDef>,
}

impl fmt::Debug for Model {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut methods: Vec<&str> = self.def.methods.keys().map(String::as_str).collect();
		methods.sort_unstable();
		f.debug_struct("Model")
			.field("defaults", &self.def.defaults)
			.field("init", &self.def.init.is_some())
			.field("methods", &methods)
			.finish()
	}
}

impl Model {
	/// Starts a model definition.
	pub fn builder() -> ModelBuilder {
		ModelBuilder::default()
	}

	/// Shorthand for a model with only defaults.
	pub fn with_defaults(defaults: Value) -> Result<Self> {
		Self::builder().defaults(defaults).build()
	}

	/// Returns the default attributes, if declared.
	pub fn defaults(&self) -> Option<&Map<String, Value>> {
		self.def.defaults.as_ref()
	}

	/// Returns `true` if a behavior function named `name` exists.
	pub fn has_method(&self, name: &str) -> bool {
		self.def.methods.contains_key(name)
	}

	/// Returns `true` if both handles refer to the same definition.
	pub fn same(&self, other: &Model) -> bool {
		Rc::ptr_eq(&self.def, &other.def)
	}

	/// Creates a record: defaults, then `fields` on top, then `init`.
	///
	/// `fields` may be `null` (no overrides) or an object; keys absent from
	/// the defaults are stored as well.
	pub fn create(&self, fields: Value) -> Result<Record> {
		let defaults = self.def.defaults.as_ref().ok_or_else(|| {
			PagesError::Validation("model was declared without defaults".to_string())
		})?;
		let mut record = Record {
			model: self.clone(),
			attrs: Value::Object(defaults.clone()),
			index: None,
		};
		if !fields.is_null() {
			record.merge(fields)?;
		}
		if let Some(init) = self.def.init.clone() {
			init(&mut record);
		}
		Ok(record)
	}
}

/// Builder for [`Model`].
#[derive(Default)]
pub struct ModelBuilder {
	defaults: Option<Value>,
	init: Option<InitHook>,
	methods: HashMap<String, Method>,
}

impl ModelBuilder {
	/// Declares default attribute values (must be a JSON object).
	pub fn defaults(mut self, defaults: Value) -> Self {
		self.defaults = Some(defaults);
		self
	}

	/// Sets the `init` hook.
	pub fn init<F>(mut self, init: F) -> Self
	where
		F: Fn(&mut Record) + 'static,
	{
		self.init = Some(Rc::new(init));
		self
	}

	/// Adds a named behavior function.
	pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
	where
		F: Fn(&mut Record, &[Value]) -> Value + 'static,
	{
		self.methods.insert(name.into(), Rc::new(method));
		self
	}

	/// Finishes the definition.
	///
	/// Fails with [`PagesError::Validation`] when the defaults are not an object.
	pub fn build(self) -> Result<Model> {
		let defaults = match self.defaults {
			None => None,
			Some(Value::Object(map)) => Some(map),
			Some(other) => {
				return Err(PagesError::Validation(format!(
					"model defaults must be an object, got {}",
					other
				)));
			}
		};
		Ok(Model {
			def: Rc::new(ModelDef {
				defaults,
				init: self.init,
				methods: self.methods,
			}),
		})
	}
}

/// A mutable attribute bag created from a [`Model`].
#[derive(Clone)]
pub struct Record {
	model: Model,
	// Always a `Value::Object`.
	attrs: Value,
	index: Option<usize>,
}

impl fmt::Debug for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Record")
			.field("index", &self.index)
			.field("attrs", &self.attrs)
			.finish()
	}
}

impl Record {
	/// The model this record was created from.
	pub fn model(&self) -> &Model {
		&self.model
	}

	/// The collection-assigned index, once inserted.
	pub fn index(&self) -> Option<usize> {
		self.index
	}

	pub(crate) fn assign_index(&mut self, index: usize) {
		self.index = Some(index);
		if let Value::Object(map) = &mut self.attrs {
			map.insert(INDEX_FIELD.to_string(), Value::from(index));
		}
	}

	/// Returns an attribute, or `None` when it is unset or falsy.
	///
	/// `false`, `0` and `""` read as `None` just like a missing attribute;
	/// use [`Record::raw`] to tell them apart.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.raw(name).filter(|v| is_truthy(v))
	}

	/// Returns the stored attribute value exactly.
	pub fn raw(&self, name: &str) -> Option<&Value> {
		self.attrs.get(name)
	}

	/// Sets one attribute.
	///
	/// Writes to the reserved `index` attribute are ignored.
	pub fn set(&mut self, name: impl Into<String>, value: Value) {
		let name = name.into();
		if name == INDEX_FIELD {
			warn_log!(index = ?self.index, "ignored write to reserved field \"{}\"", INDEX_FIELD);
			return;
		}
		if let Value::Object(map) = &mut self.attrs {
			map.insert(name, value);
		}
	}

	/// Sets every attribute of a JSON object.
	///
	/// Fails with [`PagesError::InvalidArguments`] for any other value, in
	/// which case nothing is applied.
	pub fn merge(&mut self, fields: Value) -> Result<()> {
		let Value::Object(fields) = fields else {
			return Err(PagesError::InvalidArguments(format!(
				"expected an object of fields, got {}",
				fields
			)));
		};
		for (name, value) in fields {
			self.set(name, value);
		}
		Ok(())
	}

	/// Borrows the attributes as a JSON object.
	pub fn as_json(&self) -> &Value {
		&self.attrs
	}

	/// Returns a snapshot of the attributes.
	pub fn to_json(&self) -> Value {
		self.attrs.clone()
	}

	/// Invokes a behavior function declared on the model.
	pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
		let method = self.model.def.methods.get(name).cloned().ok_or_else(|| {
			PagesError::InvalidArguments(format!("model has no method \"{}\"", name))
		})?;
		Ok(method(self, args))
	}
}
