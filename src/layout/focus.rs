//! One region's locations around its busiest location, with cross-border
//! neighbors on an outer ring.

use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use super::circular::{CircularLayoutOptions, apply_circular_location_layout};
use crate::campaign::{CampaignData, Location};
use crate::graph::{
	GraphEdge, GraphNode, LOCATION_HEIGHT, LOCATION_WIDTH, NodeKind, Position, Size, route_edge,
};

const FOCUS_CENTER: Position = Position::new(900.0, 700.0);
const MEMBER_RADIUS: f64 = 500.0;
const MEMBER_SPACING: f64 = 1.2;
const NEIGHBOR_RADIUS: f64 = 700.0;
const MIN_DISTANCE: f64 = 300.0;
const PUSH_FACTOR: f64 = 0.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusedGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Busiest location of the region, placed at the center.
	pub center_id: Option<String>,
	/// Locations outside the region that share a route with it.
	pub neighbor_ids: Vec<String>,
}

impl FocusedGraph {
	pub fn is_neighbor(&self, id: &str) -> bool {
		self.neighbor_ids.iter().any(|n| n == id)
	}
}

/// Internal route degree of every location in `members`. Routes with only one
/// end inside do not count.
fn internal_degrees<'a>(data: &CampaignData, members: &[&'a Location]) -> Vec<(&'a str, usize)> {
	let inside: HashSet<&str> = members.iter().map(|l| l.id.as_str()).collect();
	let mut degree: HashMap<&str, usize> = HashMap::new();
	for route in &data.routes {
		if inside.contains(route.from.as_str()) && inside.contains(route.to.as_str()) {
			*degree.entry(route.from.as_str()).or_default() += 1;
			*degree.entry(route.to.as_str()).or_default() += 1;
		}
	}
	members
		.iter()
		.map(|l| (l.id.as_str(), degree.get(l.id.as_str()).copied().unwrap_or(0)))
		.collect()
}

/// Push members that crowd an earlier member outward along their own angle.
///
/// Each position is checked against the unadjusted positions before it, in
/// order, so the result depends on input order and may keep overlaps.
fn relax(positions: &[Position]) -> Vec<Position> {
	positions
		.iter()
		.enumerate()
		.map(|(i, &pos)| {
			let mut adjusted = pos;
			for &earlier in &positions[..i] {
				let d = adjusted.distance(earlier);
				if d < MIN_DISTANCE {
					let angle = (adjusted.y - FOCUS_CENTER.y).atan2(adjusted.x - FOCUS_CENTER.x);
					let radius = MEMBER_RADIUS + (MIN_DISTANCE - d) * PUSH_FACTOR;
					adjusted = Position::new(
						FOCUS_CENTER.x + radius * angle.cos(),
						FOCUS_CENTER.y + radius * angle.sin(),
					);
				}
			}
			adjusted
		})
		.collect()
}

fn location_node(location: &Location, area: &str, position: Position, color: &'static str) -> GraphNode {
	GraphNode {
		id: location.id.clone(),
		kind: NodeKind::Location,
		label: location.name.clone(),
		area: area.to_owned(),
		parent_id: None,
		position,
		size: Some(Size::new(LOCATION_WIDTH, LOCATION_HEIGHT)),
		color,
	}
}

/// Build the focused map for `area_name`. An unknown area yields an empty graph.
pub fn build_region_focused_graph(area_name: &str, data: &CampaignData) -> FocusedGraph {
	let Some(area) = data.area_by_name(area_name) else {
		return FocusedGraph::default();
	};
	let members: Vec<&Location> = area.locations.iter().collect();
	let inside: HashSet<&str> = members.iter().map(|l| l.id.as_str()).collect();

	let mut edges = Vec::new();
	let mut neighbors: Vec<&str> = Vec::new();
	for (index, route) in data.routes.iter().enumerate() {
		let (from_in, to_in) = (
			inside.contains(route.from.as_str()),
			inside.contains(route.to.as_str()),
		);
		let (id, outside) = match (from_in, to_in) {
			(true, true) => (format!("edge-int-{index}"), None),
			(true, false) => (format!("edge-ext-{index}"), Some(route.to.as_str())),
			(false, true) => (format!("edge-ext-{index}"), Some(route.from.as_str())),
			(false, false) => continue,
		};
		if let Some(outside) = outside
			&& !neighbors.contains(&outside)
		{
			neighbors.push(outside);
		}
		edges.push(route_edge(id, route, 0.0));
	}

	let index = data.location_index();
	neighbors.retain(|id| index.contains_key(id));

	// first maximum wins
	let center_id = internal_degrees(data, &members)
		.into_iter()
		.fold(None::<(&str, usize)>, |best, (id, deg)| match best {
			Some((_, best_deg)) if best_deg >= deg => best,
			_ => Some((id, deg)),
		})
		.map(|(id, _)| id);

	let color = data.region_color(&area.name);
	let mut nodes = Vec::with_capacity(members.len() + neighbors.len());
	if let Some(center) = center_id.and_then(|id| members.iter().find(|l| l.id == id)) {
		nodes.push(location_node(center, &area.name, FOCUS_CENTER, color));
	}

	let others: Vec<&Location> = members
		.iter()
		.copied()
		.filter(|l| Some(l.id.as_str()) != center_id)
		.collect();
	let opts = CircularLayoutOptions {
		radius: Some(MEMBER_RADIUS),
		center: FOCUS_CENTER,
		spacing_factor: MEMBER_SPACING,
		..CircularLayoutOptions::locations()
	};
	let ring = relax(&apply_circular_location_layout(&others, &opts));
	for (location, position) in others.iter().zip(ring) {
		nodes.push(location_node(location, &area.name, position, color));
	}

	let count = neighbors.len().max(1) as f64;
	for (i, id) in neighbors.iter().enumerate() {
		let Some((location, owner)) = index.get(id) else {
			continue;
		};
		let angle = -FRAC_PI_2 + TAU * i as f64 / count;
		let position = Position::new(
			FOCUS_CENTER.x + NEIGHBOR_RADIUS * angle.cos(),
			FOCUS_CENTER.y + NEIGHBOR_RADIUS * angle.sin(),
		);
		nodes.push(location_node(
			location,
			&owner.name,
			position,
			data.region_color(&owner.name),
		));
	}

	FocusedGraph {
		nodes,
		edges,
		center_id: center_id.map(str::to_owned),
		neighbor_ids: neighbors.into_iter().map(str::to_owned).collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::campaign::region_color;

	fn data() -> CampaignData {
		CampaignData::from_json(
			r#"{"areas":[
				{"area":"Vale","pointsOfInterest":[
					{"id":"v1","name":"Mill"},{"id":"v2","name":"Keep"},
					{"id":"v3","name":"Ford"},{"id":"v4","name":"Shrine"}]},
				{"area":"Marsh","pointsOfInterest":[
					{"id":"m1","name":"Hut"},{"id":"m2","name":"Bog"}]}
			]}"#,
			r#"{"routes":[
				{"id":"r0","from":"v1","to":"v2"},
				{"id":"r1","from":"v2","to":"v3"},
				{"id":"r2","from":"v2","to":"v4"},
				{"id":"r3","from":"m1","to":"v3"},
				{"id":"r4","from":"v4","to":"m2"},
				{"id":"r5","from":"m1","to":"m2"},
				{"id":"r6","from":"v1","to":"ghost"},
				{"id":"r7","from":"v4","to":"m1"}
			]}"#,
		)
		.unwrap()
	}

	#[test]
	fn busiest_location_sits_at_the_center() {
		let focused = build_region_focused_graph("Vale", &data());
		assert_eq!(focused.center_id.as_deref(), Some("v2"));
		assert_eq!(focused.nodes[0].id, "v2");
		assert_eq!(focused.nodes[0].position, FOCUS_CENTER);
	}

	#[test]
	fn ties_go_to_the_first_location() {
		let data = CampaignData::from_json(
			r#"{"areas":[{"area":"Vale","pointsOfInterest":[
				{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]}]}"#,
			r#"{"routes":[{"id":"r","from":"b","to":"c"}]}"#,
		)
		.unwrap();
		let focused = build_region_focused_graph("Vale", &data);
		assert_eq!(focused.center_id.as_deref(), Some("b"));
	}

	#[test]
	fn edges_are_split_into_internal_and_external() {
		let focused = build_region_focused_graph("Vale", &data());
		let ids: Vec<_> = focused.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(
			ids,
			["edge-int-0", "edge-int-1", "edge-int-2", "edge-ext-3", "edge-ext-4", "edge-ext-6", "edge-ext-7"]
		);
	}

	#[test]
	fn neighbors_keep_insertion_order_and_own_color() {
		let focused = build_region_focused_graph("Vale", &data());
		assert_eq!(focused.neighbor_ids, ["m1", "m2"]);
		assert!(focused.is_neighbor("m2"));
		assert!(!focused.is_neighbor("ghost"));

		let m1 = focused.nodes.iter().find(|n| n.id == "m1").unwrap();
		assert_eq!(m1.area, "Marsh");
		assert_eq!(m1.color, region_color(1));
		// first neighbor at the top of the outer ring
		assert!((m1.position.x - 900.0).abs() < 1e-9);
		assert!((m1.position.y - 0.0).abs() < 1e-9);

		let members = focused.nodes.iter().filter(|n| n.area == "Vale");
		assert!(members.clone().all(|n| n.color == region_color(0)));
		assert_eq!(members.count(), 4);
	}

	#[test]
	fn members_ring_the_center() {
		let focused = build_region_focused_graph("Vale", &data());
		for node in focused.nodes.iter().filter(|n| n.area == "Vale").skip(1) {
			let d = node.position.distance(FOCUS_CENTER);
			assert!(d >= MEMBER_RADIUS - 1e-9, "{} at {d}", node.id);
		}
	}

	#[test]
	fn crowded_members_are_pushed_out() {
		// 12 points on r=500 are ~259 apart, closer than the minimum
		let positions = apply_circular_location_layout(
			&[(); 12],
			&CircularLayoutOptions::locations().with_radius(MEMBER_RADIUS),
		);
		let relaxed = relax(&positions);
		assert_eq!(relaxed[0], positions[0]);
		let gap = positions[0].distance(positions[1]);
		let expected = MEMBER_RADIUS + (MIN_DISTANCE - gap) * PUSH_FACTOR;
		assert!((relaxed[1].distance(FOCUS_CENTER) - expected).abs() < 1e-6);
	}

	#[test]
	fn unknown_area_is_empty() {
		let focused = build_region_focused_graph("Nowhere", &data());
		assert_eq!(focused, FocusedGraph::default());
	}
}
