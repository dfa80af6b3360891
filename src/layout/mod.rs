//! Placement of graph nodes: circular rings, a region-focused map and a
//! layered fallback. Everything here is pure and total.

mod circular;
mod focus;
mod hierarchical;

pub use circular::{
	CircularLayoutOptions, DEFAULT_REGION_SIZE, apply_circular_location_layout,
	apply_circular_region_layout, location_auto_radius, region_auto_radius,
};
pub use focus::{FocusedGraph, build_region_focused_graph};
pub use hierarchical::{
	HierarchicalLayoutOptions, RankDirection, apply_hierarchical_layout,
	apply_region_level_layout,
};
