//! Key-value persistence backends.
//!
//! Stores never talk to `localStorage` directly; they are handed a
//! [`KeyValueStore`] so the same code runs in the browser and under test.

mod browser;
mod memory;

pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// String key-value storage with interior mutability.
pub trait KeyValueStore: Clone + 'static {
	/// `Ok(None)` when the key was never written.
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Removing a missing key is not an error.
	fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Browser storage when the host has it, otherwise an in-memory map that
/// lives as long as the page.
#[derive(Clone, Debug)]
pub enum AnyStorage {
	Browser(BrowserStorage),
	Memory(MemoryStorage),
}

impl AnyStorage {
	pub fn detect() -> Self {
		match BrowserStorage::new() {
			Ok(storage) => Self::Browser(storage),
			Err(err) => {
				log::warn!("{err}; positions and visibility will not survive a reload");
				Self::Memory(MemoryStorage::new())
			}
		}
	}
}

impl KeyValueStore for AnyStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		match self {
			Self::Browser(s) => s.get_item(key),
			Self::Memory(s) => s.get_item(key),
		}
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		match self {
			Self::Browser(s) => s.set_item(key, value),
			Self::Memory(s) => s.set_item(key, value),
		}
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		match self {
			Self::Browser(s) => s.remove_item(key),
			Self::Memory(s) => s.remove_item(key),
		}
	}
}
