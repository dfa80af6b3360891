use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::debounce::{Debouncer, Ticket};
use crate::error::StoreError;
use crate::graph::{GraphNode, Position};
use crate::storage::KeyValueStore;

pub const POSITIONS_KEY: &str = "region-node-positions";

/// Moves smaller than this on both axes are not worth saving.
const DRAG_TOLERANCE: f64 = 1.0;

/// Persisted form of one override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
	pub id: String,
	pub x: f64,
	pub y: f64,
}

pub fn encode_positions(overrides: &BTreeMap<String, Position>) -> serde_json::Result<String> {
	let list: Vec<NodePosition> = overrides
		.iter()
		.map(|(id, p)| NodePosition {
			id: id.clone(),
			x: p.x,
			y: p.y,
		})
		.collect();
	serde_json::to_string(&list)
}

pub fn decode_positions(raw: &str) -> serde_json::Result<BTreeMap<String, Position>> {
	let list: Vec<NodePosition> = serde_json::from_str(raw)?;
	Ok(list
		.into_iter()
		.map(|p| (p.id, Position::new(p.x, p.y)))
		.collect())
}

/// Manually placed node coordinates. They win over any computed layout and
/// are saved as one array, either on request or after a quiet period
/// following the last drag.
#[derive(Clone, Debug)]
pub struct PositionStore<S> {
	storage: S,
	overrides: BTreeMap<String, Position>,
	debounce: Debouncer,
}

impl<S: KeyValueStore> PositionStore<S> {
	pub fn load(storage: S, debounce_ms: u32) -> Self {
		let overrides = match storage.get_item(POSITIONS_KEY) {
			Ok(Some(raw)) => decode_positions(&raw).unwrap_or_else(|err| {
				warn!("Ignoring malformed saved positions: {err}");
				BTreeMap::new()
			}),
			Ok(None) => BTreeMap::new(),
			Err(err) => {
				warn!("Failed to load saved positions: {err}");
				BTreeMap::new()
			}
		};
		debug!("Loaded {} position overrides", overrides.len());
		Self {
			storage,
			overrides,
			debounce: Debouncer::new(debounce_ms),
		}
	}

	pub fn get(&self, id: &str) -> Option<Position> {
		self.overrides.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.overrides.len()
	}

	pub fn is_empty(&self) -> bool {
		self.overrides.is_empty()
	}

	pub fn debounce_ms(&self) -> u32 {
		self.debounce.delay_ms()
	}

	/// In-memory upsert; nothing is written.
	pub fn update_position(&mut self, id: &str, x: f64, y: f64) {
		self.overrides.insert(id.to_owned(), Position::new(x, y));
	}

	/// Record where a drag ended. Returns the ticket of the save it scheduled,
	/// or `None` when the node did not really move.
	pub fn record_drag_stop(&mut self, id: &str, position: Position) -> Option<Ticket> {
		if let Some(saved) = self.get(id) {
			let moved = (saved.x - position.x).abs() > DRAG_TOLERANCE
				|| (saved.y - position.y).abs() > DRAG_TOLERANCE;
			if !moved {
				return None;
			}
		}
		self.update_position(id, position.x, position.y);
		Some(self.debounce.schedule())
	}

	/// Claim the scheduled save for `ticket`. A stale ticket claims nothing.
	pub fn take_scheduled(&mut self, ticket: Ticket) -> bool {
		self.debounce.take_if_current(ticket)
	}

	pub fn has_pending_save(&self) -> bool {
		self.debounce.is_pending()
	}

	pub fn cancel_pending(&mut self) {
		if self.debounce.cancel() {
			debug!("Cancelled pending position save");
		}
	}

	/// Write the whole override map as one array.
	pub fn save_all(&mut self) -> Result<(), StoreError> {
		let raw = encode_positions(&self.overrides)?;
		self.storage.set_item(POSITIONS_KEY, &raw)?;
		info!("Saved {} node positions", self.overrides.len());
		Ok(())
	}

	/// Copy of `nodes` with every overridden node moved to its saved spot.
	pub fn apply_overrides(&self, nodes: &[GraphNode]) -> Vec<GraphNode> {
		nodes
			.iter()
			.map(|node| match self.get(&node.id) {
				Some(position) => GraphNode {
					position,
					..node.clone()
				},
				None => node.clone(),
			})
			.collect()
	}

	/// Drop every override and the persisted key.
	pub fn reset(&mut self) -> Result<(), StoreError> {
		self.cancel_pending();
		self.overrides.clear();
		self.storage.remove_item(POSITIONS_KEY)?;
		info!("Cleared saved node positions");
		Ok(())
	}
}
