use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{BADGE_SIZE, CampaignGraphState};
use crate::graph::{GraphEdge, NodeKind, Position};

const BACKGROUND: &str = "#1a1a2e";
const LOCATION_FILL: &str = "#24243e";
const HEADER_HEIGHT: f64 = 36.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Control point of the quadratic curve for `edge`. The bend is perpendicular
/// to the id-ordered endpoint pair, so opposite routes between the same two
/// locations still fan out to opposite sides.
pub fn control_point(edge: &GraphEdge, source: Position, target: Position) -> Position {
	let (a, b) = if edge.source <= edge.target {
		(source, target)
	} else {
		(target, source)
	};
	let mid = Position::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	// perpendicular scaled by distance, so the bend ratio is zoom independent
	Position::new(mid.x - dy * edge.curvature, mid.y + dx * edge.curvature)
}

/// Point at `t` on the quadratic curve.
fn curve_point(p0: Position, c: Position, p1: Position, t: f64) -> Position {
	let u = 1.0 - t;
	Position::new(
		u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
		u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
	)
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<(f64, f64)>, k: f64) {
	let pattern = match dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on / k), &JsValue::from_f64(off / k)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&pattern);
}

pub fn render(state: &CampaignGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_regions(state, ctx);
	draw_edges(state, ctx);
	draw_locations(state, ctx);
	ctx.restore();
}

fn draw_regions(state: &CampaignGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for (idx, node) in state.nodes.iter().enumerate() {
		if node.kind != NodeKind::Region {
			continue;
		}
		let p = state.absolute(idx);
		let alpha = if node.faded { 0.4 } else { 1.0 };

		ctx.set_global_alpha(0.12 * alpha);
		ctx.set_fill_style_str(node.color);
		ctx.fill_rect(p.x, p.y, node.size.width, node.size.height);
		ctx.set_global_alpha(0.35 * alpha);
		ctx.fill_rect(p.x, p.y, node.size.width, HEADER_HEIGHT);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(node.color);
		ctx.set_line_width(2.0 / k.max(0.5));
		set_dash(ctx, node.hidden.then_some((12.0, 6.0)), k.max(0.5));
		ctx.stroke_rect(p.x, p.y, node.size.width, node.size.height);
		set_dash(ctx, None, 1.0);

		ctx.set_fill_style_str("white");
		ctx.set_font("bold 18px sans-serif");
		let label = if node.hidden {
			format!("{} (hidden)", node.label)
		} else {
			node.label.clone()
		};
		let _ = ctx.fill_text(&label, p.x + 12.0, p.y + 24.0);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_edges(state: &CampaignGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in &state.edges {
		let (Some(s), Some(d)) = (state.node_index(&edge.source), state.node_index(&edge.target)) else {
			continue;
		};
		let muted = state.is_edge_muted(edge);
		// non-incident edges fade out entirely at full highlight
		let alpha = if muted { 0.85 * (1.0 - t) } else { 0.85 };
		if alpha < 0.01 {
			continue;
		}
		let (p0, p1) = (state.center(s), state.center(d));
		let c = control_point(edge, p0, p1);
		let path_type = edge.route.path_type;

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(path_type.stroke_color());
		ctx.set_line_width(path_type.stroke_width() * if muted { 1.0 } else { 1.0 + 0.3 * t });
		set_dash(ctx, path_type.dash(), 1.0);
		ctx.begin_path();
		ctx.move_to(p0.x, p0.y);
		ctx.quadratic_curve_to(c.x, c.y, p1.x, p1.y);
		ctx.stroke();
		set_dash(ctx, None, 1.0);

		if !edge.label.is_empty() {
			let at = curve_point(p0, c, p1, 0.5);
			ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
			let width = ctx.measure_text(&edge.label).map(|m| m.width()).unwrap_or(0.0);
			ctx.set_fill_style_str(BACKGROUND);
			ctx.fill_rect(at.x - width / 2.0 - 3.0, at.y - 10.0, width + 6.0, 14.0);
			ctx.set_fill_style_str(edge.label_color);
			let _ = ctx.fill_text(&edge.label, at.x - width / 2.0, at.y + 1.0);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_locations(state: &CampaignGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	for (idx, node) in state.nodes.iter().enumerate() {
		if node.kind != NodeKind::Location {
			continue;
		}
		let p = state.absolute(idx);
		let (w, h) = (node.size.width, node.size.height);
		let mut alpha = if state.is_dimmed(idx) { 1.0 - 0.7 * t } else { 1.0 };
		if node.hidden || node.faded {
			alpha *= 0.5;
		}

		if state.is_hovered(idx) && t > 0.01 {
			let center = state.center(idx);
			let glow = w.max(h) * (0.6 + 0.3 * t);
			if let Ok(gradient) =
				ctx.create_radial_gradient(center.x, center.y, w * 0.2, center.x, center.y, glow)
			{
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.3 * t));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", 0.1 * t));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(center.x, center.y, glow, 0.0, std::f64::consts::TAU);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(LOCATION_FILL);
		ctx.fill_rect(p.x, p.y, w, h);
		ctx.set_stroke_style_str(node.color);
		ctx.set_line_width(if state.is_hovered(idx) { 3.0 } else { 1.5 });
		set_dash(ctx, node.hidden.then_some((8.0, 4.0)), 1.0);
		ctx.stroke_rect(p.x, p.y, w, h);
		set_dash(ctx, None, 1.0);

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", 14.0 / k.max(0.75)));
		let _ = ctx.fill_text_with_max_width(&node.label, p.x + 10.0, p.y + h / 2.0 + 5.0, w - 20.0);

		if state.editable {
			draw_badge(ctx, p.x + w - BADGE_SIZE, p.y, node.hidden);
		}
	}
	ctx.set_global_alpha(1.0);
}

/// Reveal toggle: filled when players can see the location.
fn draw_badge(ctx: &CanvasRenderingContext2d, x: f64, y: f64, hidden: bool) {
	let r = BADGE_SIZE / 2.0;
	ctx.begin_path();
	let _ = ctx.arc(x + r, y + r, r - 4.0, 0.0, std::f64::consts::TAU);
	if hidden {
		ctx.set_stroke_style_str("#8c8c8c");
		ctx.set_line_width(1.5);
		ctx.stroke();
	} else {
		ctx.set_fill_style_str("#52c41a");
		ctx.fill();
	}
}
