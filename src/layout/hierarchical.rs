//! Layered placement of top-level nodes.
//!
//! Ranking, crossing reduction and coordinate assignment are dagre's, through
//! `dugong`. Nodes with a parent are never moved.

use std::collections::{HashMap, HashSet};

use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::graph::{GraphEdge, GraphNode, LOCATION_HEIGHT, LOCATION_WIDTH, Position, Size};

use super::circular::DEFAULT_REGION_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDirection {
	#[serde(rename = "TB")]
	TopBottom,
	#[serde(rename = "BT")]
	BottomTop,
	#[default]
	#[serde(rename = "LR")]
	LeftRight,
	#[serde(rename = "RL")]
	RightLeft,
}

impl From<RankDirection> for RankDir {
	fn from(direction: RankDirection) -> Self {
		match direction {
			RankDirection::TopBottom => RankDir::TB,
			RankDirection::BottomTop => RankDir::BT,
			RankDirection::LeftRight => RankDir::LR,
			RankDirection::RightLeft => RankDir::RL,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalLayoutOptions {
	pub direction: RankDirection,
	/// Gap between consecutive ranks.
	pub rank_sep: f64,
	/// Gap between neighbors within a rank.
	pub node_sep: f64,
	pub margin_x: f64,
	pub margin_y: f64,
	/// Size for nodes that carry none.
	pub node_size: Size,
}

impl Default for HierarchicalLayoutOptions {
	fn default() -> Self {
		Self {
			direction: RankDirection::LeftRight,
			rank_sep: 120.0,
			node_sep: 80.0,
			margin_x: 50.0,
			margin_y: 50.0,
			node_size: Size::new(LOCATION_WIDTH, LOCATION_HEIGHT),
		}
	}
}

impl HierarchicalLayoutOptions {
	/// Wider spacing for laying out whole regions.
	pub fn region_level() -> Self {
		Self {
			rank_sep: 160.0,
			node_sep: 120.0,
			margin_x: 80.0,
			margin_y: 80.0,
			node_size: DEFAULT_REGION_SIZE,
			..Self::default()
		}
	}

	pub fn with_direction(mut self, direction: RankDirection) -> Self {
		self.direction = direction;
		self
	}
}

/// Id of the top-level ancestor of `id`, if the chain resolves.
fn top_level_of<'a>(parents: &HashMap<&'a str, Option<&'a str>>, id: &'a str) -> Option<&'a str> {
	let mut current = id;
	// bounded walk; a malformed parent cycle gives up
	for _ in 0..=parents.len() {
		match *parents.get(current)? {
			None => return Some(current),
			Some(parent) => current = parent,
		}
	}
	None
}

/// Edges between top-level nodes, lifted from whatever level they were drawn
/// at. Self loops and duplicates are dropped.
fn lift_edges<'a>(nodes: &'a [GraphNode], edges: &'a [GraphEdge]) -> Vec<(&'a str, &'a str)> {
	let parents: HashMap<&str, Option<&str>> = nodes
		.iter()
		.map(|node| (node.id.as_str(), node.parent_id.as_deref()))
		.collect();
	let mut seen = HashSet::new();
	edges
		.iter()
		.filter_map(|edge| {
			let source = top_level_of(&parents, &edge.source)?;
			let target = top_level_of(&parents, &edge.target)?;
			(source != target && seen.insert((source, target))).then_some((source, target))
		})
		.collect()
}

/// Top-left positions for `top`, indexed like it.
fn layout_top_level(
	top: &[&GraphNode],
	links: &[(&str, &str)],
	opts: &HierarchicalLayoutOptions,
) -> Vec<Position> {
	if top.is_empty() {
		return Vec::new();
	}

	let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
		multigraph: true,
		compound: false,
		..Default::default()
	});
	g.set_graph(GraphLabel {
		rankdir: opts.direction.into(),
		nodesep: opts.node_sep,
		ranksep: opts.rank_sep,
		marginx: opts.margin_x,
		marginy: opts.margin_y,
		..Default::default()
	});

	for node in top {
		let size = node.size_or(opts.node_size);
		g.set_node(
			node.id.clone(),
			NodeLabel {
				width: size.width,
				height: size.height,
				..Default::default()
			},
		);
	}
	for (i, (source, target)) in links.iter().enumerate() {
		g.set_edge_named(
			source.to_string(),
			target.to_string(),
			Some(format!("link-{i}")),
			Some(EdgeLabel {
				minlen: 1,
				weight: 1.0,
				..Default::default()
			}),
		);
	}

	dugong::layout(&mut g);

	top.iter()
		.map(|node| {
			let size = node.size_or(opts.node_size);
			match g.node(&node.id) {
				Some(NodeLabel {
					x: Some(x),
					y: Some(y),
					..
				}) => Position::new(x - size.width / 2.0, y - size.height / 2.0),
				_ => {
					warn!("Layered layout left {} unplaced", node.id);
					node.position
				}
			}
		})
		.collect()
}

/// Layered layout of the top-level nodes, using `edges` lifted to the
/// top-level ancestors of their endpoints. Output keeps the input order;
/// children come back untouched.
pub fn apply_hierarchical_layout(
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	opts: &HierarchicalLayoutOptions,
) -> Vec<GraphNode> {
	let top: Vec<&GraphNode> = nodes.iter().filter(|n| n.is_top_level()).collect();
	let links = lift_edges(nodes, edges);
	let placed: HashMap<&str, Position> = top
		.iter()
		.map(|n| n.id.as_str())
		.zip(layout_top_level(&top, &links, opts))
		.collect();

	nodes
		.iter()
		.map(|node| match placed.get(node.id.as_str()) {
			Some(&position) if node.is_top_level() => GraphNode {
				position,
				..node.clone()
			},
			_ => node.clone(),
		})
		.collect()
}

/// Lay out regions only, chaining each to the next so they line up along the
/// rank direction. Returns the placed top-level nodes followed by children.
pub fn apply_region_level_layout(
	nodes: &[GraphNode],
	opts: &HierarchicalLayoutOptions,
) -> Vec<GraphNode> {
	let (top, children): (Vec<&GraphNode>, Vec<&GraphNode>) =
		nodes.iter().partition(|n| n.is_top_level());
	let chain: Vec<(&str, &str)> = top
		.windows(2)
		.map(|pair| (pair[0].id.as_str(), pair[1].id.as_str()))
		.collect();
	let positions = layout_top_level(&top, &chain, opts);

	top.into_iter()
		.zip(positions)
		.map(|(node, position)| GraphNode {
			position,
			..node.clone()
		})
		.chain(children.into_iter().cloned())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::campaign::CampaignData;
	use crate::graph::{GraphData, parse_graph_data};

	fn campaign(sizes: &[usize], routes: &str) -> GraphData {
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
		let data = CampaignData::from_json(
			&format!(r#"{{"areas":[{}]}}"#, areas.join(",")),
			&format!(r#"{{"routes":[{routes}]}}"#),
		)
		.unwrap();
		parse_graph_data(&data.areas, &data.routes)
	}

	#[test]
	fn routes_rank_regions_left_to_right() {
		let graph = campaign(
			&[1, 1, 1],
			r#"{"id":"r1","from":"a0-0","to":"a1-0"},{"id":"r2","from":"a1-0","to":"a2-0"}"#,
		);
		let laid_out = apply_hierarchical_layout(
			&graph.nodes,
			&graph.edges,
			&HierarchicalLayoutOptions::default(),
		);
		let x: Vec<f64> = laid_out
			.iter()
			.filter(|n| n.is_top_level())
			.map(|n| n.position.x)
			.collect();
		// the first rank sits on the margin
		assert!((x[0] - 50.0).abs() < 1e-6);
		assert!(x[0] < x[1] && x[1] < x[2]);
		// 284 wide regions with a 120 rank gap
		assert!((x[1] - x[0] - 404.0).abs() < 1e-6);
	}

	#[test]
	fn children_keep_relative_positions() {
		let graph = campaign(&[2, 3], r#"{"id":"r1","from":"a0-0","to":"a1-1"}"#);
		let laid_out = apply_hierarchical_layout(
			&graph.nodes,
			&graph.edges,
			&HierarchicalLayoutOptions::default(),
		);
		assert_eq!(laid_out.len(), graph.nodes.len());
		for (before, after) in graph.nodes.iter().zip(&laid_out) {
			assert_eq!(before.id, after.id);
			if !before.is_top_level() {
				assert_eq!(before.position, after.position);
			}
		}
	}

	#[test]
	fn cycles_still_produce_a_layout() {
		let graph = campaign(
			&[1, 1, 1],
			r#"{"id":"r1","from":"a0-0","to":"a1-0"},
			{"id":"r2","from":"a1-0","to":"a2-0"},
			{"id":"r3","from":"a2-0","to":"a0-0"}"#,
		);
		let laid_out = apply_hierarchical_layout(
			&graph.nodes,
			&graph.edges,
			&HierarchicalLayoutOptions::default().with_direction(RankDirection::TopBottom),
		);
		let tops: Vec<Position> = laid_out
			.iter()
			.filter(|n| n.is_top_level())
			.map(|n| n.position)
			.collect();
		for i in 0..tops.len() {
			for j in (i + 1)..tops.len() {
				assert_ne!(tops[i], tops[j]);
			}
		}
	}

	#[test]
	fn reversed_direction_mirrors_ranks() {
		let graph = campaign(&[1, 1], r#"{"id":"r1","from":"a0-0","to":"a1-0"}"#);
		let rl = apply_hierarchical_layout(
			&graph.nodes,
			&graph.edges,
			&HierarchicalLayoutOptions::default().with_direction(RankDirection::RightLeft),
		);
		let first = rl.iter().find(|n| n.id == "region-0").unwrap();
		let second = rl.iter().find(|n| n.id == "region-1").unwrap();
		assert!(first.position.x > second.position.x);
	}

	#[test]
	fn region_level_chains_regions() {
		let graph = campaign(&[4, 1, 9], "");
		let opts = HierarchicalLayoutOptions::region_level().with_direction(RankDirection::TopBottom);
		let laid_out = apply_region_level_layout(&graph.nodes, &opts);
		assert_eq!(laid_out.len(), graph.nodes.len());
		assert!(laid_out[..3].iter().all(GraphNode::is_top_level));
		let y: Vec<f64> = laid_out[..3].iter().map(|n| n.position.y).collect();
		assert!((y[0] - 80.0).abs() < 1e-6);
		assert!(y[0] < y[1] && y[1] < y[2]);
		// ranks never overlap
		assert!(y[1] >= y[0] + laid_out[0].size_or(opts.node_size).height + opts.rank_sep - 1e-6);
	}

	#[test]
	fn unrelated_regions_share_a_rank() {
		let graph = campaign(&[1, 1], "");
		let laid_out = apply_hierarchical_layout(
			&graph.nodes,
			&graph.edges,
			&HierarchicalLayoutOptions::default(),
		);
		let tops: Vec<Position> = laid_out
			.iter()
			.filter(|n| n.is_top_level())
			.map(|n| n.position)
			.collect();
		assert!((tops[0].x - tops[1].x).abs() < 1e-6);
		assert!(tops[0].y != tops[1].y);
	}

	#[test]
	fn empty_graph_is_fine() {
		let opts = HierarchicalLayoutOptions::default();
		assert!(apply_hierarchical_layout(&[], &[], &opts).is_empty());
		assert!(apply_region_level_layout(&[], &opts).is_empty());
	}

	#[test]
	fn direction_names_follow_rankdir() {
		let dir: RankDirection = serde_json::from_str(r#""TB""#).unwrap();
		assert_eq!(dir, RankDirection::TopBottom);
		assert_eq!(serde_json::to_string(&RankDirection::RightLeft).unwrap(), r#""RL""#);
	}
}
