use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::graph::{GraphNode, Position, Size};

/// Fallback size for top-level nodes without one.
pub const DEFAULT_REGION_SIZE: Size = Size::new(360.0, 260.0);
const MIN_REGION_RADIUS: f64 = 800.0;
const MIN_LOCATION_RADIUS: f64 = 400.0;
const LOCATION_SPAN: f64 = 280.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularLayoutOptions {
	/// Explicit radius; `None` derives one from node count and size.
	pub radius: Option<f64>,
	pub center: Position,
	/// Angle of the first node, radians. `-PI/2` starts at the top.
	pub start_angle: f64,
	pub clockwise: bool,
	pub spacing_factor: f64,
}

impl Default for CircularLayoutOptions {
	fn default() -> Self {
		Self::regions()
	}
}

impl CircularLayoutOptions {
	/// Defaults for top-level region placement.
	pub fn regions() -> Self {
		Self {
			radius: None,
			center: Position::new(800.0, 700.0),
			start_angle: -FRAC_PI_2,
			clockwise: true,
			spacing_factor: 0.85,
		}
	}

	/// Defaults for locations laid out inside one region.
	pub fn locations() -> Self {
		Self {
			center: Position::new(900.0, 700.0),
			spacing_factor: 1.0,
			..Self::regions()
		}
	}

	pub fn with_radius(mut self, radius: f64) -> Self {
		self.radius = Some(radius);
		self
	}

	pub fn with_center(mut self, x: f64, y: f64) -> Self {
		self.center = Position::new(x, y);
		self
	}

	pub fn with_spacing(mut self, spacing_factor: f64) -> Self {
		self.spacing_factor = spacing_factor;
		self
	}

	fn angle(&self, i: usize, n: usize) -> f64 {
		let step = TAU * i as f64 / n as f64;
		if self.clockwise {
			self.start_angle + step
		} else {
			self.start_angle - step
		}
	}

	fn point(&self, radius: f64, angle: f64) -> Position {
		Position::new(
			self.center.x + radius * angle.cos(),
			self.center.y + radius * angle.sin(),
		)
	}
}

/// Radius the region layout picks for `n` nodes of average size `avg`.
pub fn region_auto_radius(n: usize, avg: Size, spacing_factor: f64) -> f64 {
	let n = n.max(1) as f64;
	MIN_REGION_RADIUS.max((n * avg.width.max(avg.height) * spacing_factor).ceil())
}

/// Radius the location layout picks for `n` items.
pub fn location_auto_radius(n: usize, spacing_factor: f64) -> f64 {
	let n = n.max(1) as f64;
	MIN_LOCATION_RADIUS.max((n * LOCATION_SPAN * spacing_factor * 0.8).ceil())
}

/// Place top-level nodes evenly on a circle. Children keep their
/// parent-relative coordinates and follow the top-level nodes in the output.
pub fn apply_circular_region_layout(
	nodes: &[GraphNode],
	opts: &CircularLayoutOptions,
) -> Vec<GraphNode> {
	let (top, children): (Vec<&GraphNode>, Vec<&GraphNode>) =
		nodes.iter().partition(|node| node.is_top_level());

	let n = top.len().max(1);
	let avg = if top.is_empty() {
		DEFAULT_REGION_SIZE
	} else {
		let (w, h) = top.iter().fold((0.0, 0.0), |(w, h), node| {
			let size = node.size_or(DEFAULT_REGION_SIZE);
			(w + size.width, h + size.height)
		});
		Size::new(w / top.len() as f64, h / top.len() as f64)
	};
	let radius = opts
		.radius
		.unwrap_or_else(|| region_auto_radius(n, avg, opts.spacing_factor));

	let placed = top.into_iter().enumerate().map(|(i, node)| {
		let size = node.size_or(DEFAULT_REGION_SIZE);
		let center = opts.point(radius, opts.angle(i, n));
		GraphNode {
			position: Position::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
			..node.clone()
		}
	});

	placed.chain(children.into_iter().cloned()).collect()
}

/// Points on a circle for `items`, without wrapping them in nodes.
pub fn apply_circular_location_layout<T>(
	items: &[T],
	opts: &CircularLayoutOptions,
) -> Vec<Position> {
	let n = items.len().max(1);
	let radius = opts
		.radius
		.unwrap_or_else(|| location_auto_radius(items.len(), opts.spacing_factor));
	(0..items.len())
		.map(|i| opts.point(radius, opts.angle(i, n)))
		.collect()
}
