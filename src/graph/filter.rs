use std::collections::HashSet;

use super::types::{GraphData, GraphEdge};

/// The subset of `graph` players may see.
///
/// Regions are kept when their name is revealed, locations when they are
/// revealed and their region node survived, and edges when `path_allowed`
/// says so and both endpoints survived.
pub fn player_view(
	graph: &GraphData,
	region_visible: impl Fn(&str) -> bool,
	location_visible: impl Fn(&str) -> bool,
	path_allowed: impl Fn(&GraphEdge) -> bool,
) -> GraphData {
	let regions: HashSet<&str> = graph
		.nodes
		.iter()
		.filter(|node| node.is_top_level() && region_visible(node.area.as_str()))
		.map(|node| node.id.as_str())
		.collect();

	let nodes: Vec<_> = graph
		.nodes
		.iter()
		.filter(|node| match node.parent_id.as_deref() {
			None => regions.contains(node.id.as_str()),
			Some(parent) => regions.contains(parent) && location_visible(node.id.as_str()),
		})
		.cloned()
		.collect();

	let kept: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
	let edges = graph
		.edges
		.iter()
		.filter(|edge| {
			kept.contains(edge.source.as_str())
				&& kept.contains(edge.target.as_str())
				&& path_allowed(edge)
		})
		.cloned()
		.collect();

	GraphData { nodes, edges }
}
