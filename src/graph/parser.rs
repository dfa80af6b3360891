//! Turns campaign areas and routes into a flat, grouped node/edge list.

use std::collections::HashMap;

use super::types::{GraphData, GraphEdge, GraphNode, NodeKind, Position, Size};
use crate::campaign::{Area, Route, region_color};

pub const LOCATION_WIDTH: f64 = 220.0;
pub const LOCATION_HEIGHT: f64 = 110.0;
const PADDING_X: f64 = 32.0;
// extra room for the region header
const PADDING_Y: f64 = 48.0;
const STEP_X: f64 = 260.0;
const STEP_Y: f64 = 170.0;

const REGION_COLUMNS: usize = 2;
const REGION_GAP_X: f64 = 120.0;
const REGION_GAP_Y: f64 = 120.0;
const GRID_ORIGIN: f64 = 100.0;

const BASE_CURVATURE: f64 = 0.15;
const CURVATURE_STEP: f64 = 0.25;

/// Near-square `(cols, rows)` grid for `n` locations, never smaller than 1x1.
pub fn grid_dimensions(n: usize) -> (usize, usize) {
	let cols = ((n as f64).sqrt().ceil() as usize).max(1);
	let rows = n.div_ceil(cols).max(1);
	(cols, rows)
}

/// Size of a region holding `n` locations.
pub fn region_size(n: usize) -> Size {
	let (cols, rows) = grid_dimensions(n);
	Size::new(
		PADDING_X * 2.0 + LOCATION_WIDTH + (cols - 1) as f64 * STEP_X,
		PADDING_Y * 2.0 + LOCATION_HEIGHT + (rows - 1) as f64 * STEP_Y,
	)
}

/// Id of the region node for the area at `index`.
pub fn region_node_id(index: usize) -> String {
	format!("region-{index}")
}

/// Top-left corners for regions of the given sizes on a two-column grid.
/// Column widths and row heights take the largest region in them, so
/// regions never overlap.
pub fn tile_regions(sizes: &[Size]) -> Vec<Position> {
	let rows = sizes.len().div_ceil(REGION_COLUMNS);
	let mut col_widths = [0.0_f64; REGION_COLUMNS];
	let mut row_heights = vec![0.0_f64; rows];
	for (i, size) in sizes.iter().enumerate() {
		let (row, col) = (i / REGION_COLUMNS, i % REGION_COLUMNS);
		col_widths[col] = col_widths[col].max(size.width);
		row_heights[row] = row_heights[row].max(size.height);
	}

	let col_x: Vec<f64> = col_widths
		.iter()
		.scan(GRID_ORIGIN, |x, width| {
			let this = *x;
			*x += width + REGION_GAP_X;
			Some(this)
		})
		.collect();
	let row_y: Vec<f64> = row_heights
		.iter()
		.scan(GRID_ORIGIN, |y, height| {
			let this = *y;
			*y += height + REGION_GAP_Y;
			Some(this)
		})
		.collect();

	(0..sizes.len())
		.map(|i| Position::new(col_x[i % REGION_COLUMNS], row_y[i / REGION_COLUMNS]))
		.collect()
}

/// Curvature for the `offset`-th route between the same two locations:
/// pairs share a magnitude and alternate sign.
pub fn curvature_for_offset(offset: usize) -> f64 {
	let magnitude = BASE_CURVATURE + (offset / 2) as f64 * CURVATURE_STEP;
	if offset % 2 == 0 { magnitude } else { -magnitude }
}

fn pair_key(route: &Route) -> (&str, &str) {
	if route.from <= route.to {
		(route.from.as_str(), route.to.as_str())
	} else {
		(route.to.as_str(), route.from.as_str())
	}
}

/// Build region and location nodes plus one edge per route.
///
/// Route endpoints are not validated; edges to unknown locations are kept and
/// left for consumers to filter.
pub fn parse_graph_data(areas: &[Area], routes: &[Route]) -> GraphData {
	let sizes: Vec<Size> = areas
		.iter()
		.map(|area| region_size(area.locations.len()))
		.collect();
	let origins = tile_regions(&sizes);

	let location_count: usize = areas.iter().map(|a| a.locations.len()).sum();
	let mut nodes = Vec::with_capacity(areas.len() + location_count);
	for (index, area) in areas.iter().enumerate() {
		let region_id = region_node_id(index);
		let color = region_color(index);
		nodes.push(GraphNode {
			id: region_id.clone(),
			kind: NodeKind::Region,
			label: area.name.clone(),
			area: area.name.clone(),
			parent_id: None,
			position: origins[index],
			size: Some(sizes[index]),
			color,
		});

		let (cols, _) = grid_dimensions(area.locations.len());
		for (i, location) in area.locations.iter().enumerate() {
			let (col, row) = (i % cols, i / cols);
			nodes.push(GraphNode {
				id: location.id.clone(),
				kind: NodeKind::Location,
				label: location.name.clone(),
				area: area.name.clone(),
				parent_id: Some(region_id.clone()),
				position: Position::new(
					PADDING_X + col as f64 * STEP_X,
					PADDING_Y + row as f64 * STEP_Y,
				),
				size: Some(Size::new(LOCATION_WIDTH, LOCATION_HEIGHT)),
				color,
			});
		}
	}

	GraphData {
		nodes,
		edges: build_edges(routes, "edge"),
	}
}

/// One edge per route, with parallel routes fanned out by curvature.
pub fn build_edges(routes: &[Route], id_prefix: &str) -> Vec<GraphEdge> {
	let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
	routes
		.iter()
		.enumerate()
		.map(|(index, route)| {
			let count = seen.entry(pair_key(route)).or_insert(0);
			let offset = *count;
			*count += 1;
			route_edge(format!("{id_prefix}-{index}"), route, curvature_for_offset(offset))
		})
		.collect()
}

pub(crate) fn route_edge(id: String, route: &Route, curvature: f64) -> GraphEdge {
	GraphEdge {
		id,
		source: route.from.clone(),
		target: route.to.clone(),
		route: route.clone(),
		curvature,
		label: route.travel_time.clone(),
		label_color: route.path_type.label_color(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::campaign::CampaignData;

	fn campaign(sizes: &[usize], routes: &str) -> CampaignData {
		let areas: Vec<String> = sizes
			.iter()
			.enumerate()
			.map(|(a, n)| {
				let pois: Vec<String> = (0..*n)
					.map(|i| format!(r#"{{"id":"a{a}-{i}","name":"L{i}"}}"#))
					.collect();
				format!(r#"{{"area":"Area {a}","pointsOfInterest":[{}]}}"#, pois.join(","))
			})
			.collect();
		CampaignData::from_json(
			&format!(r#"{{"areas":[{}]}}"#, areas.join(",")),
			&format!(r#"{{"routes":[{routes}]}}"#),
		)
		.unwrap()
	}

	fn overlaps(a: (Position, Size), b: (Position, Size)) -> bool {
		a.0.x < b.0.x + b.1.width
			&& b.0.x < a.0.x + a.1.width
			&& a.0.y < b.0.y + b.1.height
			&& b.0.y < a.0.y + a.1.height
	}

	#[test]
	fn grid_is_near_square() {
		assert_eq!(grid_dimensions(0), (1, 1));
		assert_eq!(grid_dimensions(1), (1, 1));
		assert_eq!(grid_dimensions(3), (2, 2));
		assert_eq!(grid_dimensions(5), (3, 2));
		assert_eq!(grid_dimensions(9), (3, 3));
		assert_eq!(grid_dimensions(10), (4, 3));
	}

	#[test]
	fn region_size_covers_grid() {
		assert_eq!(region_size(1), Size::new(284.0, 206.0));
		assert_eq!(region_size(5), Size::new(804.0, 376.0));
	}

	#[test]
	fn locations_are_children_at_relative_cells() {
		let data = campaign(&[3], "");
		let graph = parse_graph_data(&data.areas, &data.routes);

		assert_eq!(graph.nodes.len(), 4);
		let region = &graph.nodes[0];
		assert_eq!(region.id, "region-0");
		assert_eq!(region.kind, NodeKind::Region);
		assert!(region.parent_id.is_none());

		let third = graph.node("a0-2").unwrap();
		assert_eq!(third.parent_id.as_deref(), Some("region-0"));
		assert_eq!(third.position, Position::new(32.0, 218.0));
		for node in graph.nodes.iter().filter(|n| n.is_location()) {
			let parent = node.parent_id.as_deref().unwrap();
			assert!(graph.contains(parent));
		}
	}

	#[test]
	fn tiled_regions_never_overlap() {
		let data = campaign(&[12, 1, 2, 9, 0, 7, 16], "");
		let graph = parse_graph_data(&data.areas, &data.routes);
		let boxes: Vec<_> = graph
			.nodes
			.iter()
			.filter(|n| n.is_top_level())
			.map(|n| (n.position, n.size.unwrap()))
			.collect();
		assert_eq!(boxes.len(), 7);
		for i in 0..boxes.len() {
			for j in (i + 1)..boxes.len() {
				assert!(!overlaps(boxes[i], boxes[j]), "regions {i} and {j} overlap");
			}
		}
	}

	#[test]
	fn parallel_routes_bend_opposite_ways() {
		let data = campaign(
			&[2],
			r#"{"id":"r1","from":"a0-0","to":"a0-1","pathType":"main_road"},
			{"id":"r2","from":"a0-0","to":"a0-1","pathType":"hidden_path"}"#,
		);
		let graph = parse_graph_data(&data.areas, &data.routes);
		assert_eq!(graph.edges.len(), 2);
		assert!((graph.edges[0].curvature - 0.15).abs() < 1e-12);
		assert!((graph.edges[1].curvature + 0.15).abs() < 1e-12);
		assert_eq!(graph.edges[0].label_color, "#1890ff");
		assert_eq!(graph.edges[1].label_color, "#fa8c16");
	}

	#[test]
	fn reversed_routes_share_a_group() {
		let data = campaign(
			&[2],
			r#"{"id":"r1","from":"a0-0","to":"a0-1"},
			{"id":"r2","from":"a0-1","to":"a0-0"},
			{"id":"r3","from":"a0-0","to":"a0-1"}"#,
		);
		let graph = parse_graph_data(&data.areas, &data.routes);
		let expected = [0.15, -0.15, 0.4];
		for (edge, want) in graph.edges.iter().zip(expected) {
			assert!((edge.curvature - want).abs() < 1e-9, "{} != {want}", edge.curvature);
		}
	}

	#[test]
	fn dangling_routes_are_kept() {
		let data = campaign(&[1], r#"{"id":"r1","from":"a0-0","to":"nowhere"}"#);
		let mut graph = parse_graph_data(&data.areas, &data.routes);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.connected_edges().count(), 0);
		graph.retain_connected_edges();
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn parsing_is_deterministic() {
		let data = campaign(&[3, 4], r#"{"id":"r1","from":"a0-0","to":"a1-2"}"#);
		assert_eq!(
			parse_graph_data(&data.areas, &data.routes),
			parse_graph_data(&data.areas, &data.routes)
		);
	}
}
