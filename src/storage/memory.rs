use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

use super::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
	values: HashMap<String, String>,
	writes: HashMap<String, usize>,
	fail_writes: bool,
}

/// In-memory storage. Clones share the same map, so a test can keep a handle
/// and inspect what a store wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a raw value without counting it as a write.
	pub fn with_item(self, key: &str, value: &str) -> Self {
		self.inner
			.borrow_mut()
			.values
			.insert(key.to_owned(), value.to_owned());
		self
	}

	/// Number of successful `set_item` calls for `key`.
	pub fn write_count(&self, key: &str) -> usize {
		self.inner.borrow().writes.get(key).copied().unwrap_or(0)
	}

	pub fn raw(&self, key: &str) -> Option<String> {
		self.inner.borrow().values.get(key).cloned()
	}

	/// Make every following write fail, like a full quota.
	pub fn fail_writes(&self, fail: bool) {
		self.inner.borrow_mut().fail_writes = fail;
	}
}

impl KeyValueStore for MemoryStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.raw(key))
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let mut inner = self.inner.borrow_mut();
		if inner.fail_writes {
			return Err(StorageError::write(key, "quota exceeded"));
		}
		inner.values.insert(key.to_owned(), value.to_owned());
		*inner.writes.entry(key.to_owned()).or_default() += 1;
		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		self.inner.borrow_mut().values.remove(key);
		Ok(())
	}
}
