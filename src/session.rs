//! Everything one open campaign needs: data, derived graph, the persisted
//! stores and the operations the pages call.

use std::collections::HashSet;

use log::{debug, error, info};

use crate::campaign::{CampaignData, ConnectivityReport, Route};
use crate::config::MapSettings;
use crate::error::{CampaignDataError, LayoutFileError, StoreError};
use crate::events::{ClickGuard, EventBus, MapEvent};
use crate::graph::{GraphData, GraphNode, NodeKind, Position, parse_graph_data, player_view};
use crate::layout::{
	FocusedGraph, apply_circular_region_layout, apply_region_level_layout,
	build_region_focused_graph,
};
use crate::positions::{LayoutMetadata, PositionStore, SavedLayout, Ticket};
use crate::storage::KeyValueStore;
use crate::visibility::{VisibilityKind, VisibilityStore, is_path_shown};

const EMBEDDED_AREAS: &str = include_str!("../assets/campaign/areas.json");
const EMBEDDED_ROUTES: &str = include_str!("../assets/campaign/routes.json");

/// The campaign documents bundled with the app.
pub fn embedded_campaign() -> Result<CampaignData, CampaignDataError> {
	CampaignData::from_json(EMBEDDED_AREAS, EMBEDDED_ROUTES)
}

fn log_store_error(what: &str, result: Result<(), StoreError>) {
	if let Err(err) = result {
		error!("Failed to save {what}: {err}");
	}
}

pub struct CampaignSession<S> {
	pub data: CampaignData,
	/// Parsed graph before any layout or overrides.
	pub graph: GraphData,
	pub settings: MapSettings,
	pub locations: VisibilityStore<S>,
	pub regions: VisibilityStore<S>,
	pub paths: VisibilityStore<S>,
	pub positions: PositionStore<S>,
	pub events: EventBus,
	pub click_guard: ClickGuard,
}

impl<S: KeyValueStore> CampaignSession<S> {
	/// Load every store from `storage` and register all known ids, hidden.
	pub fn new(data: CampaignData, settings: MapSettings, storage: S) -> Self {
		let graph = parse_graph_data(&data.areas, &data.routes);
		let mut session = Self {
			locations: VisibilityStore::load(VisibilityKind::Location, storage.clone()),
			regions: VisibilityStore::load(VisibilityKind::Region, storage.clone()),
			paths: VisibilityStore::load(VisibilityKind::Path, storage.clone()),
			positions: PositionStore::load(storage, settings.position_save_debounce_ms),
			events: EventBus::new(),
			click_guard: ClickGuard::default(),
			data,
			graph,
			settings,
		};

		let results = [
			session.locations.initialize(session.data.location_ids()),
			session.regions.initialize(session.data.region_names()),
			session.paths.initialize(session.data.route_ids()),
		];
		for (kind, result) in VisibilityKind::ALL.iter().zip(results) {
			log_store_error(&format!("{kind} visibility"), result.map(drop));
		}
		info!(
			"Campaign loaded: {} regions, {} locations, {} routes",
			session.data.areas.len(),
			session.graph.nodes.len() - session.data.areas.len(),
			session.data.routes.len()
		);
		session
	}

	fn store_mut(&mut self, kind: VisibilityKind) -> &mut VisibilityStore<S> {
		match kind {
			VisibilityKind::Location => &mut self.locations,
			VisibilityKind::Region => &mut self.regions,
			VisibilityKind::Path => &mut self.paths,
		}
	}

	/// GM overview: regions on a ring, manual placement on top, dangling
	/// edges dropped.
	pub fn gm_graph(&self) -> GraphData {
		let laid_out = apply_circular_region_layout(&self.graph.nodes, &self.settings.region_layout);
		let mut graph = GraphData {
			nodes: self.positions.apply_overrides(&laid_out),
			edges: self.graph.edges.clone(),
		};
		graph.retain_connected_edges();
		graph
	}

	/// What players may see, laid out like the GM map.
	pub fn player_graph(&self) -> GraphData {
		let visible = player_view(
			&self.graph,
			|region| self.regions.is_visible(region),
			|location| self.locations.is_visible(location),
			|edge| self.is_route_shown(&edge.route),
		);
		let laid_out = apply_circular_region_layout(&visible.nodes, &self.settings.player_layout);
		GraphData {
			nodes: self.positions.apply_overrides(&laid_out),
			edges: visible.edges,
		}
	}

	pub fn region_focus(&self, area_name: &str) -> FocusedGraph {
		let mut focused = build_region_focused_graph(area_name, &self.data);
		let ids: HashSet<&str> =
			focused.nodes.iter().map(|n| n.id.as_str()).collect();
		let edges = std::mem::take(&mut focused.edges);
		focused.edges = edges
			.into_iter()
			.filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
			.collect();
		focused
	}

	/// Nodes of `graph` players cannot see: regions by name, locations by id.
	pub fn hidden_ids(&self, graph: &GraphData) -> HashSet<String> {
		graph
			.nodes
			.iter()
			.filter(|node| match node.kind {
				NodeKind::Region => !self.regions.is_visible(&node.area),
				NodeKind::Location => !self.locations.is_visible(&node.id),
			})
			.map(|node| node.id.clone())
			.collect()
	}

	pub fn is_route_shown(&self, route: &Route) -> bool {
		is_path_shown(
			route,
			self.settings.path_gating,
			|id| self.locations.is_visible(id),
			|id| self.paths.is_visible(id),
		)
	}

	/// Reveal or hide a location. Revealing also opens its region.
	pub fn set_location_visible(&mut self, id: &str, visible: bool) {
		let region = self
			.data
			.area_of(id)
			.map(|area| area.name.clone())
			.unwrap_or_default();
		let regions = &mut self.regions;
		let result = self
			.locations
			.set_visible_with_region_update(id, visible, &region, |region, has_visible| {
				if !region.is_empty() {
					log_store_error(
						"region visibility",
						regions.auto_open_if_needed(region, has_visible),
					);
				}
			});
		log_store_error("location visibility", result);
	}

	pub fn toggle_location(&mut self, id: &str) {
		let visible = !self.locations.is_visible(id);
		self.set_location_visible(id, visible);
	}

	pub fn toggle(&mut self, kind: VisibilityKind, id: &str) {
		if kind == VisibilityKind::Location {
			self.toggle_location(id);
			return;
		}
		let result = self.store_mut(kind).toggle_visible(id).map(drop);
		log_store_error(&format!("{kind} visibility"), result);
	}

	/// Reveal everything of one kind. Revealing all locations opens their
	/// regions too.
	pub fn show_all(&mut self, kind: VisibilityKind) {
		let ids = self.ids_of(kind);
		let result = self.store_mut(kind).show_all(&ids);
		log_store_error(&format!("{kind} visibility"), result);
		if kind == VisibilityKind::Location {
			let names = self.data.region_names();
			for name in names.iter().filter(|name| {
				self.data
					.area_by_name(name)
					.is_some_and(|area| !area.locations.is_empty())
			}) {
				log_store_error(
					"region visibility",
					self.regions.auto_open_if_needed(name, true),
				);
			}
		}
	}

	pub fn hide_all(&mut self, kind: VisibilityKind) {
		let ids = self.ids_of(kind);
		let result = self.store_mut(kind).hide_all(&ids);
		log_store_error(&format!("{kind} visibility"), result);
	}

	pub fn reset_visibility(&mut self, kind: VisibilityKind) {
		let result = self.store_mut(kind).reset();
		log_store_error(&format!("{kind} visibility"), result);
	}

	fn ids_of(&self, kind: VisibilityKind) -> Vec<String> {
		match kind {
			VisibilityKind::Location => self.data.location_ids(),
			VisibilityKind::Region => self.data.region_names(),
			VisibilityKind::Path => self.data.route_ids(),
		}
	}

	/// A drag ended at `position`. Returns the ticket for the debounced save
	/// when the node really moved.
	pub fn record_drag_stop(&mut self, id: &str, position: Position) -> Option<Ticket> {
		let ticket = self.positions.record_drag_stop(id, position);
		if ticket.is_some() {
			debug!("Node {id} moved to ({:.0}, {:.0})", position.x, position.y);
		}
		ticket
	}

	/// Debounce timer for `ticket` fired. `None` when a later drag superseded
	/// it.
	pub fn run_scheduled_save(&mut self, ticket: Ticket) -> Option<Result<(), StoreError>> {
		self.positions
			.take_scheduled(ticket)
			.then(|| self.positions.save_all())
	}

	pub fn save_positions(&mut self) -> Result<(), StoreError> {
		self.positions.cancel_pending();
		self.positions.save_all()
	}

	/// Pin the current GM layout so every top-level node has an override.
	pub fn save_current_layout(&mut self) -> Result<(), StoreError> {
		for node in self.gm_graph().nodes.iter().filter(|n| n.is_top_level()) {
			self.positions
				.update_position(&node.id, node.position.x, node.position.y);
		}
		self.save_positions()
	}

	/// Line the regions up with the layered layout and save the result.
	pub fn arrange_regions(&mut self) -> Result<(), StoreError> {
		let arranged = apply_region_level_layout(&self.graph.nodes, &self.settings.layered_layout);
		for node in arranged.iter().filter(|n| n.is_top_level()) {
			self.positions
				.update_position(&node.id, node.position.x, node.position.y);
		}
		self.save_positions()
	}

	pub fn reset_layout(&mut self) -> Result<(), StoreError> {
		self.positions.reset()
	}

	pub fn export_layout(&self, metadata: LayoutMetadata, timestamp: f64) -> SavedLayout {
		SavedLayout::export(&self.gm_graph().nodes, metadata, timestamp)
	}

	/// Apply a layout file to the GM map and save it. Returns how many
	/// regions moved.
	pub fn import_layout(&mut self, json: &str) -> Result<usize, LayoutFileError> {
		let layout = SavedLayout::import(json)?;
		let applied = layout.apply(&self.graph.nodes);
		let mut moved = 0;
		for node in applied.iter().filter(|n| n.is_top_level()) {
			if layout.positions.iter().any(|p| p.id == node.id) {
				self.positions
					.update_position(&node.id, node.position.x, node.position.y);
				moved += 1;
			}
		}
		log_store_error("node positions", self.save_positions());
		Ok(moved)
	}

	pub fn connectivity(&self) -> ConnectivityReport {
		ConnectivityReport::analyze(&self.data)
	}

	/// Block clicks on `node_id` for the configured time and tell listeners.
	/// Expired blocks are dropped first.
	pub fn suppress_click(&mut self, node_id: &str, now_ms: f64) {
		let event = MapEvent::SuppressClick {
			node_id: node_id.to_owned(),
			duration_ms: self.settings.click_suppression_ms,
		};
		self.click_guard.prune(now_ms);
		self.click_guard.handle(&event, now_ms);
		self.events.emit(&event);
	}

	pub fn is_click_blocked(&self, node_id: &str, now_ms: f64) -> bool {
		self.click_guard.is_blocked(node_id, now_ms)
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.graph.node(id)
	}
}
