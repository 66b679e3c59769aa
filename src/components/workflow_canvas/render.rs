//! Canvas rendering for the workflow editor.
//!
//! Drawing happens in passes for correct z-ordering:
//! 1. Background and dot grid
//! 2. Edges, then their delete controls (world space)
//! 3. The rubber-band line of an in-progress connection
//! 4. Node cards in creation order, so later nodes sit on top

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::controller::CanvasController;
use super::edge_path::{self, EdgePath, Point};
use super::scale::ScaledValues;
use super::state::{self, Gesture, Hit};
use super::theme::Theme;
use crate::graph::{Edge, EdgeKind, GraphStore, Node};

/// Everything the renderer needs for one frame.
pub struct Frame<'a> {
	pub graph: &'a GraphStore,
	pub controller: &'a CanvasController,
	pub theme: &'a Theme,
	pub width: f64,
	pub height: f64,
	/// Seconds since the canvas mounted; drives the dash animation.
	pub flow_time: f64,
}

/// Renders the complete editor canvas.
pub fn render(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let transform = frame.controller.transform();
	let scale = frame.controller.scaled();

	ctx.set_fill_style_str(&frame.theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_grid(frame, ctx, &scale);
	draw_edges(frame, ctx, &scale);
	draw_connection_preview(frame, ctx, &scale);
	draw_nodes(frame, ctx, &scale);

	ctx.restore();
}

fn draw_grid(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	if scale.grid_alpha < 0.01 {
		return;
	}
	let transform = frame.controller.transform();
	let (x0, y0) = transform.screen_to_world(0.0, 0.0);
	let (x1, y1) = transform.screen_to_world(frame.width, frame.height);
	let gap = scale.grid_gap;

	ctx.set_fill_style_str(
		&frame
			.theme
			.background
			.grid_color
			.with_alpha(scale.grid_alpha)
			.to_css(),
	);
	ctx.begin_path();
	let mut gx = (x0 / gap).floor() * gap;
	while gx <= x1 {
		let mut gy = (y0 / gap).floor() * gap;
		while gy <= y1 {
			ctx.move_to(gx + scale.grid_dot_radius, gy);
			let _ = ctx.arc(gx, gy, scale.grid_dot_radius, 0.0, std::f64::consts::TAU);
			gy += gap;
		}
		gx += gap;
	}
	ctx.fill();
}

fn draw_edges(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	let dash_offset = scale.dash_offset(frame.flow_time, frame.controller.scale_config().edge.flow_speed);
	let color = frame.theme.edge.color.to_css();

	ctx.set_line_width(scale.edge_line_width);
	ctx.set_stroke_style_str(&color);
	for edge in frame.graph.edges() {
		let Some(route) = state::edge_route(frame.graph, edge, scale) else {
			continue;
		};
		set_dash(ctx, edge, scale, dash_offset);
		stroke_path(ctx, &route.path, scale.edge_corner_radius);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for edge in frame.graph.edges() {
		if let Some(route) = state::edge_route(frame.graph, edge, scale) {
			let hovered = matches!(frame.controller.hovered(), Some(Hit::DeleteEdge(id)) if *id == edge.id);
			draw_edge_delete(frame, ctx, scale, route.label, hovered);
		}
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, edge: &Edge, scale: &ScaledValues, offset: f64) {
	// Fade dash pattern to solid when zoomed out
	let gap = scale.dash_pattern.1 * scale.dash_alpha;
	if edge.animated && gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(offset);
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn stroke_path(ctx: &CanvasRenderingContext2d, path: &EdgePath, corner_radius: f64) {
	ctx.begin_path();
	match path {
		EdgePath::Line { from, to } => {
			ctx.move_to(from.0, from.1);
			ctx.line_to(to.0, to.1);
		}
		EdgePath::Bezier { from, c1, c2, to } => {
			ctx.move_to(from.0, from.1);
			ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, to.0, to.1);
		}
		EdgePath::Orthogonal { points } => {
			let Some((first, rest)) = points.split_first() else {
				return;
			};
			ctx.move_to(first.0, first.1);
			for window in points.windows(3) {
				let (prev, corner, next) = (window[0], window[1], window[2]);
				let radius = corner_radius
					.min(distance(prev, corner) / 2.0)
					.min(distance(corner, next) / 2.0);
				let _ = ctx.arc_to(corner.0, corner.1, next.0, next.1, radius);
			}
			if let Some(last) = rest.last() {
				ctx.line_to(last.0, last.1);
			}
		}
	}
	ctx.stroke();
}

fn distance(a: Point, b: Point) -> f64 {
	((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn draw_edge_delete(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	at: Point,
	hovered: bool,
) {
	let style = &frame.theme.edge;
	let r = scale.edge_delete_radius;
	ctx.begin_path();
	let _ = ctx.arc(at.0, at.1, r, 0.0, std::f64::consts::TAU);
	ctx.set_fill_style_str(&style.delete_fill.to_css());
	ctx.fill();
	ctx.set_line_width(scale.edge_line_width);
	ctx.set_stroke_style_str(&if hovered {
		style.delete_glyph.to_css()
	} else {
		style.color.to_css()
	});
	ctx.stroke();
	draw_cross(ctx, at, r * 0.4, &style.delete_glyph.to_css(), scale.edge_line_width);
}

fn draw_cross(ctx: &CanvasRenderingContext2d, at: Point, half: f64, color: &str, width: f64) {
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(at.0 - half, at.1 - half);
	ctx.line_to(at.0 + half, at.1 + half);
	ctx.move_to(at.0 + half, at.1 - half);
	ctx.line_to(at.0 - half, at.1 + half);
	ctx.stroke();
}

fn draw_connection_preview(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	let Gesture::Connect { source, cursor } = frame.controller.gesture() else {
		return;
	};
	let Some(node) = frame.graph.node(source) else {
		return;
	};
	let route = edge_path::route(EdgeKind::Default, state::output_port(node, scale), *cursor);
	ctx.set_stroke_style_str(&frame.theme.edge.preview_color.to_css());
	ctx.set_line_width(scale.edge_line_width);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	stroke_path(ctx, &route.path, 0.0);
}

fn draw_nodes(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	let hovered = match frame.controller.hovered() {
		Some(Hit::NodeBody(id) | Hit::DeleteNode(id) | Hit::OutputPort(id) | Hit::InputPort(id)) => {
			Some(id.as_str())
		}
		_ => None,
	};
	let moving = match frame.controller.gesture() {
		Gesture::MoveNode { node_id, .. } => Some(node_id.as_str()),
		_ => None,
	};
	for node in frame.graph.nodes() {
		let active = hovered == Some(node.id.as_str()) || moving == Some(node.id.as_str());
		draw_node(frame, ctx, scale, node, active);
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	node: &Node,
	active: bool,
) {
	let style = &frame.theme.node;
	let (x, y) = (node.position.x, node.position.y);
	let (w, h) = (scale.node_width, scale.node_height);

	rounded_rect(ctx, x, y, w, h, scale.corner_radius);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&if active {
		style.border_hover.to_css()
	} else {
		style.border.to_css()
	});
	ctx.set_line_width(style.border_width / scale.k);
	ctx.stroke();

	let text_x = x + 14.0;
	ctx.set_fill_style_str(&style.title.to_css());
	ctx.set_font(&scale.title_font);
	let _ = ctx.fill_text(&node.label, text_x, y + h / 2.0 - 4.0);
	ctx.set_fill_style_str(&style.subtitle.to_css());
	ctx.set_font(&scale.subtitle_font);
	let _ = ctx.fill_text(&format!("Type: {}", node.node_type), text_x, y + h / 2.0 + 14.0);

	ctx.set_fill_style_str(&style.accent.to_css());
	for port in [state::input_port(node, scale), state::output_port(node, scale)] {
		ctx.begin_path();
		let _ = ctx.arc(port.0, port.1, scale.port_radius, 0.0, std::f64::consts::TAU);
		ctx.fill();
	}

	let (corner, size) = state::delete_box(node, scale);
	let center = (corner.0 + size / 2.0, corner.1 + size / 2.0);
	let delete_hovered =
		matches!(frame.controller.hovered(), Some(Hit::DeleteNode(id)) if *id == node.id);
	let glyph = if delete_hovered {
		style.accent.lighten(0.3)
	} else {
		style.accent
	};
	draw_cross(ctx, center, size * 0.25, &glyph.to_css(), 1.5 / scale.k);
}
