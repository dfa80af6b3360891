use std::collections::BTreeMap;

use log::{debug, warn};

use super::kind::VisibilityKind;
use crate::error::StoreError;
use crate::storage::KeyValueStore;

/// Persisted `id -> visible` flags. Unknown ids are hidden.
///
/// Every mutating call writes the whole record once. A failed write keeps the
/// in-memory change and is returned to the caller.
#[derive(Clone, Debug)]
pub struct VisibilityStore<S> {
	kind: VisibilityKind,
	storage: S,
	flags: BTreeMap<String, bool>,
	/// Last record read from or written to storage.
	saved: Option<String>,
}

impl<S: KeyValueStore> VisibilityStore<S> {
	/// Read the persisted record. Missing or malformed data gives an empty
	/// store.
	pub fn load(kind: VisibilityKind, storage: S) -> Self {
		let (flags, saved) = match storage.get_item(kind.key()) {
			Ok(Some(raw)) => match kind.decode(&raw) {
				Ok(flags) => (flags, Some(raw)),
				Err(err) => {
					warn!("Ignoring malformed {kind} visibility record: {err}");
					(BTreeMap::new(), None)
				}
			},
			Ok(None) => (BTreeMap::new(), None),
			Err(err) => {
				warn!("Failed to load {kind} visibility: {err}");
				(BTreeMap::new(), None)
			}
		};
		debug!("Loaded {} {kind} visibility entries", flags.len());
		Self {
			kind,
			storage,
			flags,
			saved,
		}
	}

	pub fn kind(&self) -> VisibilityKind {
		self.kind
	}

	fn persist(&mut self) -> Result<(), StoreError> {
		let raw = self.kind.encode(&self.flags)?;
		self.write(raw)
	}

	fn write(&mut self, raw: String) -> Result<(), StoreError> {
		self.storage.set_item(self.kind.key(), &raw)?;
		debug!("Saved {} visibility ({} entries)", self.kind, self.flags.len());
		self.saved = Some(raw);
		Ok(())
	}

	pub fn is_visible(&self, id: &str) -> bool {
		self.flags.get(id).copied().unwrap_or(false)
	}

	pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), StoreError> {
		self.flags.insert(id.to_owned(), visible);
		self.persist()
	}

	/// Flip `id` and return its new state.
	pub fn toggle_visible(&mut self, id: &str) -> Result<bool, StoreError> {
		let visible = !self.is_visible(id);
		self.set_visible(id, visible)?;
		Ok(visible)
	}

	fn set_many<I>(&mut self, ids: I, visible: bool) -> Result<(), StoreError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		for id in ids {
			self.flags.insert(id.as_ref().to_owned(), visible);
		}
		self.persist()
	}

	pub fn show_all<I>(&mut self, ids: I) -> Result<(), StoreError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		self.set_many(ids, true)
	}

	pub fn hide_all<I>(&mut self, ids: I) -> Result<(), StoreError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		self.set_many(ids, false)
	}

	/// Give every id an entry, hidden by default. Writes only when the
	/// encoded record differs from the stored one; returns whether it did.
	pub fn initialize<I>(&mut self, ids: I) -> Result<bool, StoreError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		for id in ids {
			let id = id.as_ref();
			if !self.flags.contains_key(id) {
				self.flags.insert(id.to_owned(), false);
			}
		}
		let raw = self.kind.encode(&self.flags)?;
		if self.saved.as_deref() == Some(raw.as_str()) {
			return Ok(false);
		}
		self.write(raw)?;
		Ok(true)
	}

	pub fn has_any_visible(&self) -> bool {
		self.flags.values().any(|&visible| visible)
	}

	/// Visible ids in sorted order.
	pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
		self.flags
			.iter()
			.filter(|&(_, &visible)| visible)
			.map(|(id, _)| id.as_str())
	}

	/// Forget everything and delete the persisted record.
	pub fn reset(&mut self) -> Result<(), StoreError> {
		self.flags.clear();
		self.saved = None;
		self.storage.remove_item(self.kind.key())?;
		Ok(())
	}

	/// Open `region` when it has visible locations and is still hidden.
	/// Never closes anything.
	pub fn auto_open_if_needed(&mut self, region: &str, has_visible: bool) -> Result<(), StoreError> {
		if has_visible && !self.is_visible(region) {
			debug!("Opening region {region:?}: it has visible locations");
			self.set_visible(region, true)?;
		}
		Ok(())
	}

	/// Set a location and, when revealing it, hand its region to `auto_open`.
	/// Hiding a location leaves its region alone.
	pub fn set_visible_with_region_update(
		&mut self,
		id: &str,
		visible: bool,
		region: &str,
		auto_open: impl FnOnce(&str, bool),
	) -> Result<(), StoreError> {
		let saved = self.set_visible(id, visible);
		if visible {
			auto_open(region, true);
		}
		saved
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storage::MemoryStorage;

	fn store(kind: VisibilityKind) -> (VisibilityStore<MemoryStorage>, MemoryStorage) {
		let storage = MemoryStorage::new();
		(VisibilityStore::load(kind, storage.clone()), storage)
	}

	#[test]
	fn unknown_ids_are_hidden() {
		let (mut locations, _) = store(VisibilityKind::Location);
		assert!(!locations.is_visible("never-seen"));
		locations.set_visible("a", true).unwrap();
		assert!(!locations.is_visible("never-seen"));
		assert!(locations.is_visible("a"));
	}

	#[test]
	fn every_mutation_writes_once() {
		let (mut paths, storage) = store(VisibilityKind::Path);
		let key = VisibilityKind::Path.key();

		paths.set_visible("r1", true).unwrap();
		assert_eq!(storage.write_count(key), 1);
		assert!(!paths.toggle_visible("r1").unwrap());
		assert_eq!(storage.write_count(key), 2);

		paths.show_all(["r1", "r2", "r3"]).unwrap();
		assert_eq!(storage.write_count(key), 3);
		paths.hide_all(["r2"]).unwrap();
		assert_eq!(storage.write_count(key), 4);

		assert_eq!(paths.visible_ids().collect::<Vec<_>>(), ["r1", "r3"]);
		assert_eq!(
			storage.raw(key).as_deref(),
			Some(r#"{"r1":true,"r2":false,"r3":true}"#)
		);
	}

	#[test]
	fn initialize_writes_only_when_record_changes() {
		let (mut paths, storage) = store(VisibilityKind::Path);
		let key = VisibilityKind::Path.key();

		assert!(paths.initialize(["a", "b"]).unwrap());
		assert_eq!(storage.write_count(key), 1);
		assert!(!paths.initialize(["b", "a"]).unwrap());
		assert_eq!(storage.write_count(key), 1);
		assert!(paths.initialize(["c"]).unwrap());
		assert_eq!(storage.write_count(key), 2);
		assert!(!paths.has_any_visible());
	}

	#[test]
	fn hidden_locations_do_not_rewrite_the_record() {
		let (mut locations, storage) = store(VisibilityKind::Location);
		let key = VisibilityKind::Location.key();

		// nothing stored yet
		assert!(locations.initialize(["a", "b"]).unwrap());
		assert_eq!(storage.raw(key).as_deref(), Some(r#"{"visibleLocations":[]}"#));
		// a new hidden id leaves the visible list alone
		assert!(!locations.initialize(["a", "b", "c"]).unwrap());
		assert_eq!(storage.write_count(key), 1);

		locations.set_visible("a", true).unwrap();
		let mut reloaded = VisibilityStore::load(VisibilityKind::Location, storage.clone());
		assert!(!reloaded.initialize(["a", "b", "c"]).unwrap());
		assert_eq!(storage.write_count(key), 2);
		assert!(reloaded.is_visible("a"));
	}

	#[test]
	fn flag_map_record_is_rewritten_as_list_once() {
		let storage = MemoryStorage::new().with_item("region-visibility", r#"{"North":true,"South":false}"#);
		let mut regions = VisibilityStore::load(VisibilityKind::Region, storage.clone());
		assert!(regions.initialize(["North", "South"]).unwrap());
		assert_eq!(
			storage.raw("region-visibility").as_deref(),
			Some(r#"{"visibleRegions":["North"]}"#)
		);

		let mut again = VisibilityStore::load(VisibilityKind::Region, storage.clone());
		assert!(!again.initialize(["North", "South"]).unwrap());
		assert_eq!(storage.write_count("region-visibility"), 1);
	}

	#[test]
	fn state_survives_reload() {
		let (mut regions, storage) = store(VisibilityKind::Region);
		regions.show_all(["North", "South"]).unwrap();
		regions.set_visible("South", false).unwrap();

		let reloaded = VisibilityStore::load(VisibilityKind::Region, storage.clone());
		assert!(reloaded.is_visible("North"));
		assert!(!reloaded.is_visible("South"));
		assert_eq!(
			storage.raw(VisibilityKind::Region.key()).as_deref(),
			Some(r#"{"visibleRegions":["North"]}"#)
		);
	}

	#[test]
	fn malformed_record_loads_empty() {
		let storage = MemoryStorage::new().with_item("location-visibility", "{oops");
		let store = VisibilityStore::load(VisibilityKind::Location, storage);
		assert!(!store.has_any_visible());
	}

	#[test]
	fn revealing_location_opens_region_and_hiding_does_not_close_it() {
		let (mut locations, _) = store(VisibilityKind::Location);
		let (mut regions, _) = store(VisibilityKind::Region);

		locations
			.set_visible_with_region_update("a", true, "North", |region, has_visible| {
				regions.auto_open_if_needed(region, has_visible).unwrap();
			})
			.unwrap();
		assert!(locations.is_visible("a"));
		assert!(regions.is_visible("North"));

		locations
			.set_visible_with_region_update("a", false, "North", |region, has_visible| {
				regions.auto_open_if_needed(region, has_visible).unwrap();
			})
			.unwrap();
		assert!(!locations.is_visible("a"));
		assert!(regions.is_visible("North"));
	}

	#[test]
	fn auto_open_leaves_open_region_unwritten() {
		let (mut regions, storage) = store(VisibilityKind::Region);
		regions.set_visible("North", true).unwrap();
		regions.auto_open_if_needed("North", true).unwrap();
		regions.auto_open_if_needed("South", false).unwrap();
		assert_eq!(storage.write_count(VisibilityKind::Region.key()), 1);
		assert!(!regions.is_visible("South"));
	}

	#[test]
	fn failed_write_keeps_memory_state() {
		let (mut paths, storage) = store(VisibilityKind::Path);
		storage.fail_writes(true);
		assert!(matches!(
			paths.set_visible("r1", true),
			Err(StoreError::Storage(_))
		));
		assert!(paths.is_visible("r1"));
	}

	#[test]
	fn reset_removes_the_record() {
		let (mut paths, storage) = store(VisibilityKind::Path);
		paths.set_visible("r1", true).unwrap();
		paths.reset().unwrap();
		assert!(!paths.is_visible("r1"));
		assert_eq!(storage.raw(VisibilityKind::Path.key()), None);
	}
}
