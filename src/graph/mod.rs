//! Graph model of the campaign world and the pure transforms over it.

mod filter;
mod highlight;
mod parser;
mod types;

pub use filter::player_view;
pub use highlight::connected_nodes;
pub use parser::{
	LOCATION_HEIGHT, LOCATION_WIDTH, build_edges, curvature_for_offset, grid_dimensions,
	parse_graph_data, region_node_id, region_size, tile_regions,
};
pub(crate) use parser::route_edge;
pub use types::{GraphData, GraphEdge, GraphNode, NodeKind, Position, Size};
