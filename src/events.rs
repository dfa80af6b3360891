//! Typed broadcast between graph widgets: hover changes and click
//! suppression.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
	/// The pointer entered a node, or left every node (`None`).
	NodeHover { node_id: Option<String> },
	/// Ignore clicks on `node_id` for a while, e.g. after a toggle inside it.
	SuppressClick { node_id: String, duration_ms: u32 },
}

type Listener = Rc<dyn Fn(&MapEvent)>;

#[derive(Default)]
struct Listeners {
	next_id: u64,
	entries: Vec<(u64, Listener)>,
}

/// Single-threaded event bus. Clones share listeners.
#[derive(Clone, Default)]
pub struct EventBus {
	listeners: Rc<RefCell<Listeners>>,
}

/// Keeps a listener registered until dropped.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
	id: u64,
	listeners: Weak<RefCell<Listeners>>,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(listeners) = self.listeners.upgrade() {
			listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
		}
	}
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&self, listener: impl Fn(&MapEvent) + 'static) -> Subscription {
		let mut listeners = self.listeners.borrow_mut();
		listeners.next_id += 1;
		let id = listeners.next_id;
		listeners.entries.push((id, Rc::new(listener)));
		Subscription {
			id,
			listeners: Rc::downgrade(&self.listeners),
		}
	}

	/// Deliver `event` to every current listener. Listeners may emit or
	/// subscribe from inside the callback.
	pub fn emit(&self, event: &MapEvent) {
		let snapshot: Vec<Listener> = self
			.listeners
			.borrow()
			.entries
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		for listener in snapshot {
			listener(event);
		}
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().entries.len()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("listeners", &self.listener_count())
			.finish()
	}
}

/// Nodes whose clicks are currently ignored, keyed by when the block ends.
#[derive(Clone, Debug, Default)]
pub struct ClickGuard {
	blocked_until: HashMap<String, f64>,
}

impl ClickGuard {
	pub fn block(&mut self, node_id: &str, duration_ms: u32, now_ms: f64) {
		self.blocked_until
			.insert(node_id.to_owned(), now_ms + f64::from(duration_ms));
	}

	pub fn is_blocked(&self, node_id: &str, now_ms: f64) -> bool {
		self.blocked_until
			.get(node_id)
			.is_some_and(|&until| now_ms < until)
	}

	/// Forget blocks that have run out.
	pub fn prune(&mut self, now_ms: f64) {
		self.blocked_until.retain(|_, until| now_ms < *until);
	}

	pub fn blocked_count(&self) -> usize {
		self.blocked_until.len()
	}

	/// Apply a bus event. Hover events are ignored.
	pub fn handle(&mut self, event: &MapEvent, now_ms: f64) {
		if let MapEvent::SuppressClick {
			node_id,
			duration_ms,
		} = event
		{
			self.block(node_id, *duration_ms, now_ms);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn listeners_receive_until_dropped() {
		let bus = EventBus::new();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let sub = bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));

		let hover = MapEvent::NodeHover {
			node_id: Some("a".into()),
		};
		bus.emit(&hover);
		assert_eq!(bus.listener_count(), 1);

		drop(sub);
		assert_eq!(bus.listener_count(), 0);
		bus.emit(&MapEvent::NodeHover { node_id: None });
		assert_eq!(*seen.borrow(), [hover]);
	}

	#[test]
	fn listener_may_emit_reentrantly() {
		let bus = EventBus::new();
		let count = Rc::new(RefCell::new(0));
		let inner = bus.clone();
		let counter = Rc::clone(&count);
		let _sub = bus.subscribe(move |event| {
			*counter.borrow_mut() += 1;
			if let MapEvent::NodeHover { node_id: Some(_) } = event {
				inner.emit(&MapEvent::NodeHover { node_id: None });
			}
		});
		bus.emit(&MapEvent::NodeHover {
			node_id: Some("a".into()),
		});
		assert_eq!(*count.borrow(), 2);
	}

	#[test]
	fn suppressed_clicks_expire() {
		let mut guard = ClickGuard::default();
		guard.handle(
			&MapEvent::SuppressClick {
				node_id: "a".into(),
				duration_ms: 200,
			},
			1000.0,
		);
		guard.handle(&MapEvent::NodeHover { node_id: None }, 1000.0);
		assert!(guard.is_blocked("a", 1199.0));
		assert!(!guard.is_blocked("a", 1200.0));
		assert!(!guard.is_blocked("b", 1000.0));

		guard.prune(1200.0);
		assert_eq!(guard.blocked_count(), 0);
	}
}
