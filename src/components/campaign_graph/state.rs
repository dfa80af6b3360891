use std::collections::{HashMap, HashSet};

use crate::graph::{GraphData, GraphEdge, NodeKind, Position, Size, connected_nodes};

/// Size of the reveal toggle drawn in a location's top-right corner.
pub const BADGE_SIZE: f64 = 22.0;
const FIT_PADDING: f64 = 60.0;
const DEFAULT_NODE_SIZE: Size = Size::new(220.0, 110.0);

/// What the canvas draws: a laid-out graph plus which nodes players cannot
/// see yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphView {
	pub graph: GraphData,
	/// Ids drawn as hidden from players. Empty outside the GM map.
	pub hidden: HashSet<String>,
	/// Dim nodes that belong to another region (the focused map).
	pub faded: HashSet<String>,
}

#[derive(Clone, Debug)]
pub struct DrawNode {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub color: &'static str,
	/// Relative to the parent for children.
	pub position: Position,
	pub size: Size,
	pub parent: Option<usize>,
	pub hidden: bool,
	pub faded: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	/// Set once the pointer moved far enough to count as a drag.
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<String>,
	pub connected: HashSet<String>,
	pub highlight_t: f64,
	pub prev_node: Option<String>,
	pub prev_connected: HashSet<String>,
	delay_t: f64,
}

pub struct CampaignGraphState {
	pub nodes: Vec<DrawNode>,
	pub edges: Vec<GraphEdge>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub editable: bool,
	index: HashMap<String, usize>,
}

fn draw_nodes(view: &GraphView) -> (Vec<DrawNode>, HashMap<String, usize>) {
	let index: HashMap<String, usize> = view
		.graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id.clone(), i))
		.collect();
	let nodes = view
		.graph
		.nodes
		.iter()
		.map(|node| DrawNode {
			id: node.id.clone(),
			kind: node.kind,
			label: node.label.clone(),
			color: node.color,
			position: node.position,
			size: node.size_or(DEFAULT_NODE_SIZE),
			parent: node.parent_id.as_ref().and_then(|p| index.get(p).copied()),
			hidden: view.hidden.contains(&node.id),
			faded: view.faded.contains(&node.id),
		})
		.collect();
	(nodes, index)
}

impl CampaignGraphState {
	pub fn new(view: &GraphView, width: f64, height: f64, editable: bool) -> Self {
		let (nodes, index) = draw_nodes(view);
		let mut state = Self {
			nodes,
			edges: view.graph.connected_edges().cloned().collect(),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			editable,
			index,
		};
		state.fit();
		state
	}

	/// Swap in a new graph. Pan and zoom are kept unless the node set changed.
	pub fn set_view(&mut self, view: &GraphView) {
		let (nodes, index) = draw_nodes(view);
		let refit = index.len() != self.index.len()
			|| index.keys().any(|id| !self.index.contains_key(id));
		self.nodes = nodes;
		self.index = index;
		self.edges = view.graph.connected_edges().cloned().collect();
		if refit {
			self.drag = DragState::default();
		}
		let hovered = self
			.hover
			.node
			.take()
			.filter(|id| self.index.contains_key(id));
		self.set_hover(hovered);
		if refit {
			self.fit();
		}
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Top-left corner in graph space.
	pub fn absolute(&self, idx: usize) -> Position {
		let node = &self.nodes[idx];
		match node.parent {
			// parents always precede their children
			Some(parent) if parent < idx => self.absolute(parent) + node.position,
			_ => node.position,
		}
	}

	pub fn center(&self, idx: usize) -> Position {
		let origin = self.absolute(idx);
		let size = self.nodes[idx].size;
		Position::new(origin.x + size.width / 2.0, origin.y + size.height / 2.0)
	}

	/// Zoom and pan so every node fits the canvas.
	pub fn fit(&mut self) {
		if self.nodes.is_empty() {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for idx in 0..self.nodes.len() {
			let p = self.absolute(idx);
			let s = self.nodes[idx].size;
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x + s.width);
			max_y = max_y.max(p.y + s.height);
		}
		let (w, h) = (max_x - min_x, max_y - min_y);
		let k = ((self.width - 2.0 * FIT_PADDING) / w)
			.min((self.height - 2.0 * FIT_PADDING) / h)
			.clamp(0.1, 1.5);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (min_x + w / 2.0) * k,
			y: self.height / 2.0 - (min_y + h / 2.0) * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	fn contains(&self, idx: usize, p: Position) -> bool {
		let origin = self.absolute(idx);
		let size = self.nodes[idx].size;
		p.x >= origin.x && p.x <= origin.x + size.width && p.y >= origin.y && p.y <= origin.y + size.height
	}

	/// Topmost node under the pointer. Locations sit above regions.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		let hit = |kind: NodeKind| {
			(0..self.nodes.len())
				.rev()
				.find(|&idx| self.nodes[idx].kind == kind && self.contains(idx, p))
		};
		hit(NodeKind::Location).or_else(|| hit(NodeKind::Region))
	}

	/// Whether the pointer is on the reveal toggle of location `idx`.
	pub fn badge_hit(&self, idx: usize, sx: f64, sy: f64) -> bool {
		if self.nodes[idx].kind != NodeKind::Location {
			return false;
		}
		let p = self.screen_to_graph(sx, sy);
		let origin = self.absolute(idx);
		let right = origin.x + self.nodes[idx].size.width;
		p.x >= right - BADGE_SIZE && p.x <= right && p.y >= origin.y && p.y <= origin.y + BADGE_SIZE
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<String>) -> bool {
		if self.hover.node == node {
			return false;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old set around for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_connected = std::mem::take(&mut self.hover.connected);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_connected.clear();
		}

		self.hover.connected = match &node {
			Some(id) => {
				if !was_hovering {
					self.hover.delay_t = 0.0;
				}
				connected_nodes(id, &self.edges)
			}
			None => HashSet::new(),
		};
		self.hover.node = node;
		true
	}

	pub fn hover_id_at(&self, sx: f64, sy: f64) -> Option<String> {
		self.node_at_position(sx, sy)
			.map(|idx| self.nodes[idx].id.clone())
	}

	fn active_set(&self) -> Option<&HashSet<String>> {
		if self.hover.node.is_some() {
			Some(&self.hover.connected)
		} else if self.hover.prev_node.is_some() {
			Some(&self.hover.prev_connected)
		} else {
			None
		}
	}

	/// Dimmed while a hover highlight is showing.
	pub fn is_dimmed(&self, idx: usize) -> bool {
		let node = &self.nodes[idx];
		node.kind == NodeKind::Location
			&& self
				.active_set()
				.is_some_and(|set| !set.contains(&node.id))
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		let id = Some(&self.nodes[idx].id);
		self.hover.node.as_ref() == id || self.hover.prev_node.as_ref() == id
	}

	/// Edges not touching the hovered node fade out.
	pub fn is_edge_muted(&self, edge: &GraphEdge) -> bool {
		let hovered = self.hover.node.as_ref().or(self.hover.prev_node.as_ref());
		hovered.is_some_and(|id| !edge.is_incident(id))
	}

	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_connected.clear();
			}
		}
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start: self.nodes[idx].position,
			moved: false,
		};
	}

	/// Move the dragged node with the pointer. Children follow their region
	/// because their coordinates are relative.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
		if dx.hypot(dy) > 3.0 {
			self.drag.moved = true;
		}
		if self.editable && self.drag.moved {
			let k = self.transform.k;
			self.nodes[idx].position = self.drag.node_start + Position::new(dx / k, dy / k);
		}
	}

	/// End the drag. Returns the node and its new position when it moved.
	pub fn end_drag(&mut self) -> Option<(String, Position)> {
		let drag = std::mem::take(&mut self.drag);
		self.pan.active = false;
		let idx = drag.node_idx?;
		(self.editable && drag.moved).then(|| (self.nodes[idx].id.clone(), self.nodes[idx].position))
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::campaign::CampaignData;
	use crate::graph::parse_graph_data;

	fn view() -> GraphView {
		let data = CampaignData::from_json(
			r#"{"areas":[{"area":"North","pointsOfInterest":[
				{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]}]}"#,
			r#"{"routes":[{"id":"r1","from":"a","to":"b"},{"id":"r2","from":"a","to":"zz"}]}"#,
		)
		.unwrap();
		GraphView {
			graph: parse_graph_data(&data.areas, &data.routes),
			..GraphView::default()
		}
	}

	fn state() -> CampaignGraphState {
		let mut state = CampaignGraphState::new(&view(), 800.0, 600.0, true);
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		state
	}

	#[test]
	fn dangling_edges_are_not_drawn() {
		assert_eq!(state().edges.len(), 1);
	}

	#[test]
	fn hit_test_prefers_locations() {
		let state = state();
		let a = state.node_index("a").unwrap();
		let centre = state.center(a);
		assert_eq!(state.node_at_position(centre.x, centre.y), Some(a));

		// region header, above the first row of locations
		let region = state.absolute(0);
		assert_eq!(state.node_at_position(region.x + 5.0, region.y + 5.0), Some(0));
		assert_eq!(state.node_at_position(-1e6, -1e6), None);
	}

	#[test]
	fn badge_sits_in_the_corner() {
		let state = state();
		let a = state.node_index("a").unwrap();
		let origin = state.absolute(a);
		let width = state.nodes[a].size.width;
		assert!(state.badge_hit(a, origin.x + width - 5.0, origin.y + 5.0));
		assert!(!state.badge_hit(a, origin.x + 5.0, origin.y + 5.0));
		assert!(!state.badge_hit(0, origin.x + width - 5.0, origin.y + 5.0));
	}

	#[test]
	fn hover_dims_unconnected_locations() {
		let mut state = state();
		assert!(state.set_hover(Some("a".into())));
		assert!(!state.set_hover(Some("a".into())));
		let c = state.node_index("c").unwrap();
		let b = state.node_index("b").unwrap();
		assert!(state.is_dimmed(c));
		assert!(!state.is_dimmed(b));
		assert!(!state.is_dimmed(0));

		state.set_hover(None);
		// fading out still dims until the highlight is gone
		assert!(state.is_dimmed(c));
		state.hover.highlight_t = 0.005;
		state.tick(0.016);
		assert!(!state.is_dimmed(c));
	}

	#[test]
	fn dragging_a_region_moves_its_children() {
		let mut state = state();
		let a = state.node_index("a").unwrap();
		let before = state.absolute(a);
		state.begin_drag(0, 10.0, 10.0);
		state.drag_to(110.0, 60.0);
		let (id, position) = state.end_drag().unwrap();
		assert_eq!(id, "region-0");
		assert_eq!(position, Position::new(200.0, 150.0));
		assert_eq!(state.absolute(a), before + Position::new(100.0, 50.0));
	}

	#[test]
	fn small_moves_are_clicks_and_read_only_never_drags() {
		let mut state = state();
		state.begin_drag(0, 10.0, 10.0);
		state.drag_to(11.0, 11.0);
		assert_eq!(state.end_drag(), None);

		let mut read_only = CampaignGraphState::new(&view(), 800.0, 600.0, false);
		read_only.begin_drag(0, 10.0, 10.0);
		read_only.drag_to(300.0, 300.0);
		assert_eq!(read_only.end_drag(), None);
	}

	#[test]
	fn new_view_refits_only_when_nodes_change() {
		let mut state = state();
		let mut view = view();
		view.hidden.insert("a".into());
		state.set_view(&view);
		assert_eq!(state.transform.k, 1.0);
		assert!(state.nodes[state.node_index("a").unwrap()].hidden);

		view.graph.nodes.retain(|n| n.id != "c");
		state.set_view(&view);
		assert_eq!(state.node_index("c"), None);
		assert_ne!(state.transform.x, 0.0);
	}

	#[test]
	fn fit_keeps_everything_on_screen() {
		let state = CampaignGraphState::new(&view(), 800.0, 600.0, false);
		for idx in 0..state.nodes.len() {
			let p = state.absolute(idx);
			let sx = p.x * state.transform.k + state.transform.x;
			let sy = p.y * state.transform.k + state.transform.y;
			assert!((0.0..=800.0).contains(&sx) && (0.0..=600.0).contains(&sy));
		}
	}
}
