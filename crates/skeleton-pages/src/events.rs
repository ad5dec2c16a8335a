//! Typed mutation notifications
//!
//! Every [`List`](crate::List) owns an [`EventHub`]. Listeners register for
//! one or more [`EventKind`]s and are called synchronously, in registration
//! order, after the mutation completed.
//!
//! Delivery works on a snapshot of the listeners registered when the
//! notification started. A listener unsubscribed by an earlier listener of
//! the same notification is skipped; one subscribed during delivery only
//! sees later notifications.

use crate::error::{PagesError, Result};
use crate::{debug_log, warn_log};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Kind of mutation a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// A record was appended or prepended
	Push,
	/// A record was removed
	Remove,
	/// A record was edited in place
	Edit,
	/// The view was re-rendered from a predicate
	Filter,
	/// Records were reordered
	Sort,
	/// A batch of records was appended
	PushAll,
	/// Every record was removed
	RemoveAll,
}

impl EventKind {
	/// Every kind, in declaration order.
	pub const ALL: [EventKind; 7] = [
		Self::Push,
		Self::Remove,
		Self::Edit,
		Self::Filter,
		Self::Sort,
		Self::PushAll,
		Self::RemoveAll,
	];

	/// The event name used by [`FromStr`] and [`fmt::Display`].
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Push => "push",
			Self::Remove => "remove",
			Self::Edit => "edit",
			Self::Filter => "filter",
			Self::Sort => "sort",
			Self::PushAll => "pushAll",
			Self::RemoveAll => "removeAll",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EventKind {
	type Err = PagesError;

	fn from_str(s: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| PagesError::UnknownEventKind(s.to_string()))
	}
}

/// Parses a list of event names, failing on the first unknown one.
pub fn parse_kinds(names: &[&str]) -> Result<Vec<EventKind>> {
	names.iter().map(|name| name.parse()).collect()
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
	/// What happened
	pub kind: EventKind,
	/// Record JSON, array of record JSON, or `null` for `removeAll`
	pub payload: Value,
}

impl Notification {
	/// Creates a notification.
	pub fn new(kind: EventKind, payload: Value) -> Self {
		Self { kind, payload }
	}
}

/// Listener callback.
pub type Listener = Rc<dyn Fn(&Notification)>;

/// Identifies one registration in an [`EventHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration {
	id: ListenerId,
	kinds: Vec<EventKind>,
	listener: Listener,
}

/// Listener registry keyed by [`EventKind`].
#[derive(Default)]
pub struct EventHub {
	registrations: Vec<Registration>,
	next_id: u64,
}

impl fmt::Debug for EventHub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventHub")
			.field("listeners", &self.registrations.len())
			.field("next_id", &self.next_id)
			.finish()
	}
}

impl EventHub {
	/// Creates an empty hub.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `listener` for every kind in `kinds`.
	///
	/// Duplicate kinds are collapsed, so the listener runs once per
	/// notification.
	pub fn subscribe(&mut self, kinds: &[EventKind], listener: Listener) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		let mut unique = Vec::with_capacity(kinds.len());
		for kind in kinds {
			if !unique.contains(kind) {
				unique.push(*kind);
			}
		}
		debug_log!(id = id.0, kinds = ?unique, "listener subscribed");
		self.registrations.push(Registration {
			id,
			kinds: unique,
			listener,
		});
		id
	}

	/// Removes a registration. Returns `false` if it was already gone.
	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		let before = self.registrations.len();
		self.registrations.retain(|r| r.id != id);
		let removed = self.registrations.len() < before;
		if !removed {
			warn_log!(id = id.0, "unsubscribe of unknown listener");
		}
		removed
	}

	/// Snapshot of the listeners registered for `kind`, in registration order.
	pub fn listeners_for(&self, kind: EventKind) -> Vec<(ListenerId, Listener)> {
		self.registrations
			.iter()
			.filter(|r| r.kinds.contains(&kind))
			.map(|r| (r.id, Rc::clone(&r.listener)))
			.collect()
	}

	/// Returns `true` if `id` is still registered.
	pub fn is_registered(&self, id: ListenerId) -> bool {
		self.registrations.iter().any(|r| r.id == id)
	}

	/// Number of listeners registered for `kind`.
	pub fn listener_count(&self, kind: EventKind) -> usize {
		self.registrations
			.iter()
			.filter(|r| r.kinds.contains(&kind))
			.count()
	}

	/// Returns `true` if any listener is registered.
	pub fn has_listeners(&self) -> bool {
		!self.registrations.is_empty()
	}
}

/// Delivers `notification` and returns how many listeners ran.
///
/// No borrow of `hub` is held while a listener runs, so listeners may
/// subscribe, unsubscribe or trigger further notifications.
pub fn dispatch(hub: &RefCell<EventHub>, notification: &Notification) -> usize {
	let listeners = hub.borrow().listeners_for(notification.kind);
	let mut delivered = 0;
	for (id, listener) in listeners {
		if !hub.borrow().is_registered(id) {
			continue;
		}
		listener(notification);
		delivered += 1;
	}
	debug_log!(kind = %notification.kind, delivered, "notification delivered");
	delivered
}

/// Handle returned by subscribe calls.
///
/// Dropping it keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
	hub: Weak<RefCell<EventHub>>,
	id: ListenerId,
}

impl Subscription {
	pub(crate) fn new(hub: &Rc<RefCell<EventHub>>, id: ListenerId) -> Self {
		Self {
			hub: Rc::downgrade(hub),
			id,
		}
	}

	/// The registration this handle refers to.
	pub fn id(&self) -> ListenerId {
		self.id
	}

	/// Removes the listener. Returns `false` if it was already removed or
	/// the list no longer exists.
	pub fn unsubscribe(self) -> bool {
		let Some(hub) = self.hub.upgrade() else {
			return false;
		};
		hub.borrow_mut().unsubscribe(self.id)
	}
}
