use serde::{Deserialize, Serialize};

use crate::campaign::Route;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Position) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

impl std::ops::Add for Position {
	type Output = Position;

	fn add(self, rhs: Position) -> Position {
		Position::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl std::ops::Sub for Position {
	type Output = Position;

	fn sub(self, rhs: Position) -> Position {
		Position::new(self.x - rhs.x, self.y - rhs.y)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Region,
	Location,
}

/// A positioned node. Children (`parent_id` set) carry coordinates relative to
/// their parent's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	/// Name of the region this node is (or belongs to).
	pub area: String,
	pub parent_id: Option<String>,
	pub position: Position,
	pub size: Option<Size>,
	pub color: &'static str,
}

impl GraphNode {
	pub fn is_top_level(&self) -> bool {
		self.parent_id.is_none()
	}

	pub fn is_location(&self) -> bool {
		self.kind == NodeKind::Location
	}

	pub fn size_or(&self, fallback: Size) -> Size {
		self.size.unwrap_or(fallback)
	}
}

/// A rendered route between two location nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub route: Route,
	/// Signed bend of the drawn curve. Sign is relative to the endpoint pair
	/// ordered by id, so routes running opposite ways still separate.
	pub curvature: f64,
	pub label: String,
	pub label_color: &'static str,
}

impl GraphEdge {
	pub fn is_incident(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// Position in canvas space: relative child coordinates are resolved
	/// against the parent.
	pub fn absolute_position(&self, id: &str) -> Option<Position> {
		let node = self.node(id)?;
		match &node.parent_id {
			Some(parent) => self
				.absolute_position(parent)
				.map(|origin| origin + node.position),
			None => Some(node.position),
		}
	}

	/// Edges whose endpoints both exist in the node set.
	pub fn connected_edges(&self) -> impl Iterator<Item = &GraphEdge> {
		self.edges
			.iter()
			.filter(|edge| self.contains(&edge.source) && self.contains(&edge.target))
	}

	/// Drop edges that reference missing nodes.
	pub fn retain_connected_edges(&mut self) {
		let ids: std::collections::HashSet<String> =
			self.nodes.iter().map(|node| node.id.clone()).collect();
		self.edges
			.retain(|edge| ids.contains(&edge.source) && ids.contains(&edge.target));
	}
}
