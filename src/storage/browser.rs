use crate::error::StorageError;

use super::KeyValueStore;

/// `window.localStorage`.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
	storage: web_sys::Storage,
}

impl BrowserStorage {
	pub fn new() -> Result<Self, StorageError> {
		let window = web_sys::window()
			.ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
		let storage = window
			.local_storage()
			.map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
			.ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_owned()))?;
		Ok(Self { storage })
	}
}

impl KeyValueStore for BrowserStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		self.storage
			.get_item(key)
			.map_err(|err| StorageError::read(key, format!("{err:?}")))
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.storage
			.set_item(key, value)
			.map_err(|err| StorageError::write(key, format!("{err:?}")))
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		self.storage
			.remove_item(key)
			.map_err(|err| StorageError::remove(key, format!("{err:?}")))
	}
}
