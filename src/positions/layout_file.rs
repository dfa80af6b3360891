//! Shareable layout files: top-level node positions plus a little metadata.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::NodePosition;
use crate::error::LayoutFileError;
use crate::graph::{GraphNode, Position};

pub const LAYOUT_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub campaign: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedLayout {
	#[serde(default)]
	pub version: String,
	/// Milliseconds since the Unix epoch.
	#[serde(default)]
	pub timestamp: f64,
	pub positions: Vec<NodePosition>,
	#[serde(default)]
	pub metadata: LayoutMetadata,
}

impl SavedLayout {
	/// Snapshot of the top-level nodes. Children are relative to their region
	/// and stay out of the file.
	pub fn export(nodes: &[GraphNode], metadata: LayoutMetadata, timestamp: f64) -> Self {
		let positions = nodes
			.iter()
			.filter(|node| node.is_top_level())
			.map(|node| NodePosition {
				id: node.id.clone(),
				x: node.position.x,
				y: node.position.y,
			})
			.collect();
		Self {
			version: LAYOUT_VERSION.to_owned(),
			timestamp,
			positions,
			metadata,
		}
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}

	/// Parse and validate a layout file. A different version only warns.
	pub fn import(json: &str) -> Result<Self, LayoutFileError> {
		let value: Value = serde_json::from_str(json)?;
		let entries = value
			.get("positions")
			.and_then(Value::as_array)
			.ok_or(LayoutFileError::MissingPositions)?;
		for (i, entry) in entries.iter().enumerate() {
			let id_ok = entry
				.get("id")
				.and_then(Value::as_str)
				.is_some_and(|id| !id.is_empty());
			let coords_ok = ["x", "y"]
				.iter()
				.all(|axis| entry.get(axis).is_some_and(Value::is_number));
			if !id_ok || !coords_ok {
				return Err(LayoutFileError::InvalidPosition(i));
			}
		}

		let layout: SavedLayout = serde_json::from_value(value)?;
		if layout.version != LAYOUT_VERSION {
			warn!(
				"Layout file version {:?} differs from {LAYOUT_VERSION}",
				layout.version
			);
		}
		Ok(layout)
	}

	/// Move top-level nodes named in the file; everything else is untouched.
	pub fn apply(&self, nodes: &[GraphNode]) -> Vec<GraphNode> {
		nodes
			.iter()
			.map(|node| {
				let imported = node
					.is_top_level()
					.then(|| self.positions.iter().find(|p| p.id == node.id))
					.flatten();
				match imported {
					Some(p) => GraphNode {
						position: Position::new(p.x, p.y),
						..node.clone()
					},
					None => node.clone(),
				}
			})
			.collect()
	}
}
