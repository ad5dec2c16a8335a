//! Property-based tests for index assignment and the data-id join

use proptest::prelude::*;
use serde_json::json;
use skeleton_pages::{List, Model, shared_document};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
	Push(String),
	Unshift(String),
	PushAll(Vec<String>),
	Remove(usize),
	Edit(usize, bool),
	Filter(bool),
	SortByText,
	Sort,
	RemoveAll,
	UpdateView,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		4 => "[a-z]{1,8}".prop_map(Op::Push),
		2 => "[a-z]{1,8}".prop_map(Op::Unshift),
		2 => proptest::collection::vec("[a-z]{1,8}", 0..4).prop_map(Op::PushAll),
		3 => (0usize..16).prop_map(Op::Remove),
		2 => (0usize..16, any::<bool>()).prop_map(|(i, done)| Op::Edit(i, done)),
		1 => any::<bool>().prop_map(Op::Filter),
		1 => Just(Op::SortByText),
		1 => Just(Op::Sort),
		1 => Just(Op::RemoveAll),
		1 => Just(Op::UpdateView),
	]
}

fn new_list() -> List {
	List::builder(shared_document(r#"<ul id="list"></ul>"#))
		.model(Model::with_defaults(json!({"text": "", "done": false})).unwrap())
		.element("list")
		.template(r#"<li data-class='{"done":"done"}'>{{ text }}</li>"#)
		.build()
		.unwrap()
}

fn stored_indices(list: &List) -> BTreeSet<usize> {
	list.models()
		.iter()
		.filter_map(|m| m["index"].as_u64())
		.map(|i| i as usize)
		.collect()
}

proptest! {
	#[test]
	fn prop_assigned_indices_strictly_increase(ops in proptest::collection::vec(op(), 1..40)) {
		// Arrange
		let list = new_list();
		let mut assigned = Vec::new();

		// Act
		for op in ops {
			match op {
				Op::Push(text) => assigned.extend(list.push(json!({"text": text})).unwrap()),
				Op::Unshift(text) => assigned.extend(list.unshift(json!({"text": text})).unwrap()),
				Op::PushAll(texts) => {
					assigned.extend(list.push_all(texts.into_iter().map(|t| json!({"text": t}))).unwrap())
				}
				Op::Remove(index) => {
					list.remove(index);
				}
				Op::RemoveAll => list.remove_all(),
				_ => {}
			}

			// Assert
			prop_assert_eq!(list.last_index(), stored_indices(&list).last().copied());
			prop_assert_eq!(list.first_index(), stored_indices(&list).first().copied());
		}
		prop_assert!(assigned.windows(2).all(|w| w[0] < w[1]));
	}

	#[test]
	fn prop_rendered_ids_match_collection(ops in proptest::collection::vec(op(), 1..40)) {
		let list = new_list();
		let mut filtered = false;

		for op in ops {
			match op {
				Op::Push(text) => {
					list.push(json!({"text": text})).unwrap();
				}
				Op::Unshift(text) => {
					list.unshift(json!({"text": text})).unwrap();
				}
				Op::PushAll(texts) => {
					list.push_all(texts.into_iter().map(|t| json!({"text": t}))).unwrap();
				}
				Op::Remove(index) => {
					list.remove(index);
				}
				Op::Edit(index, done) => {
					// hidden records cannot be edited in place
					if !filtered {
						list.edit(index, json!({"done": done})).unwrap();
					}
				}
				Op::Filter(done) => {
					list.filter(|m| m["done"] == done).unwrap();
					filtered = true;
				}
				Op::SortByText => {
					list.sort_by(|a, b| a["text"].as_str().cmp(&b["text"].as_str())).unwrap();
					filtered = false;
				}
				Op::Sort => {
					list.sort().unwrap();
					filtered = false;
				}
				Op::RemoveAll => {
					list.remove_all();
					filtered = false;
				}
				Op::UpdateView => {
					list.update_view().unwrap();
					filtered = false;
				}
			}

			let rendered: Vec<usize> = list.rendered_indices();
			let unique: BTreeSet<usize> = rendered.iter().copied().collect();
			prop_assert_eq!(unique.len(), rendered.len());
			if filtered {
				prop_assert!(unique.is_subset(&stored_indices(&list)));
			} else {
				prop_assert_eq!(unique, stored_indices(&list));
			}
		}
	}

	#[test]
	fn prop_filter_keeps_size(texts in proptest::collection::vec("[a-z]{1,4}", 0..12), pivot in "[a-z]") {
		let list = new_list();
		list.push_all(texts.iter().map(|t| json!({"text": t}))).unwrap();
		let before = list.size();

		let matched = list.filter(|m| m["text"].as_str().is_some_and(|t| t < pivot.as_str())).unwrap();

		prop_assert_eq!(list.size(), before);
		prop_assert_eq!(list.rendered_indices().len(), matched.len());
	}
}
