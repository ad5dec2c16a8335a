//! Indexed record storage
//!
//! [`Collection`] keeps records keyed by a per-collection index. Indices come
//! from a counter that only grows, so an index is never handed out twice,
//! even after the record holding it was removed. Map order is display order.

use crate::model::Record;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Ordered mapping from index to [`Record`].
#[derive(Debug, Clone, Default)]
pub struct Collection {
	records: IndexMap<usize, Record>,
	next_index: usize,
}

impl Collection {
	/// Creates an empty collection whose first index is `0`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Hands out the next index.
	pub fn reserve_index(&mut self) -> usize {
		let index = self.next_index;
		self.next_index += 1;
		index
	}

	/// The index the next [`Collection::reserve_index`] call returns.
	pub fn peek_index(&self) -> usize {
		self.next_index
	}

	fn assign(&mut self, record: &mut Record) -> usize {
		let index = self.reserve_index();
		record.assign_index(index);
		index
	}

	/// Appends a record under a freshly reserved index.
	///
	/// Any index the record already carried is replaced.
	pub fn insert_back(&mut self, mut record: Record) -> usize {
		let index = self.assign(&mut record);
		self.records.insert(index, record);
		index
	}

	/// Prepends a record under a freshly reserved index.
	pub fn insert_front(&mut self, mut record: Record) -> usize {
		let index = self.assign(&mut record);
		self.records.shift_insert(0, index, record);
		index
	}

	/// Removes a record, keeping the order of the rest.
	pub fn remove(&mut self, index: usize) -> Option<Record> {
		self.records.shift_remove(&index)
	}

	/// Removes every record. The index counter keeps running.
	pub fn clear(&mut self) {
		self.records.clear();
	}

	/// Looks up a record.
	pub fn get(&self, index: usize) -> Option<&Record> {
		self.records.get(&index)
	}

	/// Looks up a record mutably.
	pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
		self.records.get_mut(&index)
	}

	/// Returns `true` if a record holds `index`.
	pub fn contains(&self, index: usize) -> bool {
		self.records.contains_key(&index)
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` when no record is stored.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Iterates records in display order.
	pub fn iter(&self) -> impl Iterator<Item = (usize, &Record)> {
		self.records.iter().map(|(&index, record)| (index, record))
	}

	/// Indices in display order.
	pub fn indices(&self) -> Vec<usize> {
		self.records.keys().copied().collect()
	}

	/// Smallest index present.
	pub fn first_index(&self) -> Option<usize> {
		self.records.keys().min().copied()
	}

	/// Largest index present.
	pub fn last_index(&self) -> Option<usize> {
		self.records.keys().max().copied()
	}

	/// Computes the order `compare` gives the records, without applying it.
	///
	/// The sort is stable, so records comparing equal keep their order.
	pub fn sorted_indices<F>(&self, mut compare: F) -> Vec<usize>
	where
		F: FnMut(&Record, &Record) -> Ordering,
	{
		let mut entries: Vec<(usize, &Record)> = self.iter().collect();
		entries.sort_by(|a, b| compare(a.1, b.1));
		entries.into_iter().map(|(index, _)| index).collect()
	}

	/// Moves records into the order given by `order`.
	///
	/// Indices in `order` that are not present are skipped; records missing
	/// from `order` keep their relative order after the listed ones.
	pub fn reorder(&mut self, order: &[usize]) {
		let mut rest = std::mem::take(&mut self.records);
		let mut records = IndexMap::with_capacity(rest.len());
		for index in order {
			if let Some(record) = rest.shift_remove(index) {
				records.insert(*index, record);
			}
		}
		records.extend(rest);
		self.records = records;
	}

	/// JSON snapshots of every record in display order.
	pub fn to_json(&self) -> Vec<Value> {
		self.records.values().map(Record::to_json).collect()
	}

	/// Indices of records whose attributes equal every entry of `fields`.
	pub fn matching(&self, fields: &Map<String, Value>) -> Vec<usize> {
		self.iter()
			.filter(|(_, record)| {
				fields
					.iter()
					.all(|(name, value)| record.raw(name) == Some(value))
			})
			.map(|(index, _)| index)
			.collect()
	}
}
