//! Key/value persistence collaborator
//!
//! Lists never touch storage themselves; applications persist from their
//! listeners:
//!
//! ```
//! use serde_json::{Value, json};
//! use skeleton_pages::{MemoryStorage, Storage};
//!
//! let mut storage = MemoryStorage::new();
//! storage.save("todos", json!([{"text": "milk"}]));
//! storage.save_all(json!({"filter": "active", "count": 1})).unwrap();
//!
//! assert_eq!(storage.fetch("filter"), Some(json!("active")));
//! assert_eq!(storage.fetch("missing"), None);
//! ```

use crate::error::{PagesError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// A string-keyed store of JSON values.
pub trait Storage {
	/// Stores `value` under `key`, replacing any previous value.
	fn save(&mut self, key: &str, value: Value);

	/// Stores every entry of a JSON object.
	///
	/// Fails with [`PagesError::InvalidArguments`] for any other value,
	/// without storing anything.
	fn save_all(&mut self, entries: Value) -> Result<()> {
		let Value::Object(entries) = entries else {
			return Err(PagesError::InvalidArguments(format!(
				"expected an object of entries, got {}",
				entries
			)));
		};
		for (key, value) in entries {
			self.save(&key, value);
		}
		Ok(())
	}

	/// Returns the value stored under `key`.
	fn fetch(&self, key: &str) -> Option<Value>;

	/// Removes every entry.
	fn clear(&mut self);

	/// Serializes `value` and stores it.
	fn save_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
	where
		Self: Sized,
	{
		let value = serde_json::to_value(value)
			.map_err(|e| PagesError::InvalidArguments(format!("cannot store \"{}\": {}", key, e)))?;
		self.save(key, value);
		Ok(())
	}

	/// Fetches and deserializes a value; a missing key is `Ok(None)`.
	fn fetch_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
	where
		Self: Sized,
	{
		self.fetch(key)
			.map(|value| {
				serde_json::from_value(value).map_err(|e| {
					PagesError::InvalidArguments(format!("cannot decode \"{}\": {}", key, e))
				})
			})
			.transpose()
	}
}

/// In-memory [`Storage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	data: HashMap<String, Value>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stored keys, sorted.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = self.data.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

impl Storage for MemoryStorage {
	fn save(&mut self, key: &str, value: Value) {
		self.data.insert(key.to_string(), value);
	}

	fn fetch(&self, key: &str) -> Option<Value> {
		self.data.get(key).cloned()
	}

	fn clear(&mut self) {
		self.data.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, Serialize, Deserialize, PartialEq)]
	struct Prefs {
		filter: String,
		count: u32,
	}

	#[rstest]
	fn test_save_overwrites() {
		let mut storage = MemoryStorage::new();
		storage.save("a", json!(1));
		storage.save("a", json!({"b": [2]}));
		assert_eq!(storage.fetch("a"), Some(json!({"b": [2]})));
		assert_eq!(storage.len(), 1);
	}

	#[rstest]
	#[case(json!([1, 2]))]
	#[case(json!("a"))]
	#[case(json!(null))]
	fn test_save_all_requires_object(#[case] entries: Value) {
		let mut storage = MemoryStorage::new();
		assert!(matches!(
			storage.save_all(entries),
			Err(PagesError::InvalidArguments(_))
		));
		assert!(storage.is_empty());
	}

	#[rstest]
	fn test_save_all_and_clear() {
		let mut storage = MemoryStorage::new();
		storage.save_all(json!({"b": 2, "a": 1})).unwrap();
		assert_eq!(storage.keys(), vec!["a", "b"]);
		storage.clear();
		assert!(storage.is_empty());
		assert_eq!(storage.fetch("a"), None);
	}

	#[rstest]
	fn test_typed_round_trip() {
		let mut storage = MemoryStorage::new();
		let prefs = Prefs {
			filter: "active".to_string(),
			count: 2,
		};
		storage.save_as("prefs", &prefs).unwrap();
		assert_eq!(storage.fetch_as::<Prefs>("prefs").unwrap(), Some(prefs));
		assert_eq!(storage.fetch_as::<Prefs>("missing").unwrap(), None);

		storage.save("broken", json!("nope"));
		assert!(storage.fetch_as::<Prefs>("broken").is_err());
	}
}
