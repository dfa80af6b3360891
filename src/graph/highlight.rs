use std::collections::HashSet;

use super::types::GraphEdge;

/// The hovered node plus every node sharing an edge with it.
pub fn connected_nodes(hovered: &str, edges: &[GraphEdge]) -> HashSet<String> {
	let mut connected = HashSet::from([hovered.to_owned()]);
	for edge in edges {
		if edge.source == hovered {
			connected.insert(edge.target.clone());
		}
		if edge.target == hovered {
			connected.insert(edge.source.clone());
		}
	}
	connected
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::campaign::CampaignData;
	use crate::graph::parse_graph_data;

	#[test]
	fn hover_keeps_neighbors() {
		let data = CampaignData::from_json(
			r#"{"areas":[{"area":"North","pointsOfInterest":[
				{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]}]}"#,
			r#"{"routes":[{"id":"r1","from":"b","to":"a"}]}"#,
		)
		.unwrap();
		let graph = parse_graph_data(&data.areas, &data.routes);

		let connected = connected_nodes("a", &graph.edges);
		assert_eq!(connected, HashSet::from(["a".to_owned(), "b".to_owned()]));
		assert_eq!(connected_nodes("c", &graph.edges), HashSet::from(["c".to_owned()]));
	}
}
