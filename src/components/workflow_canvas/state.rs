//! View transform, gesture state and node geometry for the canvas.

use super::edge_path::{self, EdgeRoute, Point};
use super::scale::ScaledValues;
use crate::graph::{Edge, GraphStore, Node, Position};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, min_k: f64, max_k: f64) {
		let new_k = (self.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// The pointer gesture currently owning pointer input. At most one is active.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	/// Dragging the empty canvas.
	Pan {
		start: Point,
		origin: Point,
	},
	/// Dragging a node body.
	MoveNode {
		node_id: String,
		start: Point,
		node_start: Position,
		moved: bool,
	},
	/// Drawing an edge out of `source`'s output port. `cursor` is world-space.
	Connect { source: String, cursor: Point },
	/// Pressed a delete control; it fires on release over the same control.
	Press(Hit),
}

/// What lies under a canvas point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	DeleteNode(String),
	OutputPort(String),
	InputPort(String),
	NodeBody(String),
	DeleteEdge(String),
}

/// World-space anchor of a node's input port (left edge, vertically centred).
pub fn input_port(node: &Node, scale: &ScaledValues) -> Point {
	(node.position.x, node.position.y + scale.node_height / 2.0)
}

/// World-space anchor of a node's output port (right edge, vertically centred).
pub fn output_port(node: &Node, scale: &ScaledValues) -> Point {
	(
		node.position.x + scale.node_width,
		node.position.y + scale.node_height / 2.0,
	)
}

/// Top-left corner and side of a node's delete control.
pub fn delete_box(node: &Node, scale: &ScaledValues) -> (Point, f64) {
	(
		(
			node.position.x + scale.node_width - scale.delete_inset - scale.delete_size,
			node.position.y + scale.delete_inset,
		),
		scale.delete_size,
	)
}

/// Route of `edge`, or `None` if either endpoint is missing.
pub fn edge_route(graph: &GraphStore, edge: &Edge, scale: &ScaledValues) -> Option<EdgeRoute> {
	let source = graph.node(&edge.source)?;
	let target = graph.node(&edge.target)?;
	Some(edge_path::route(
		edge.kind,
		output_port(source, scale),
		input_port(target, scale),
	))
}

fn within(p: Point, center: Point, radius: f64) -> bool {
	let (dx, dy) = (p.0 - center.0, p.1 - center.1);
	dx * dx + dy * dy <= radius * radius
}

fn inside(p: Point, origin: Point, w: f64, h: f64) -> bool {
	p.0 >= origin.0 && p.0 <= origin.0 + w && p.1 >= origin.1 && p.1 <= origin.1 + h
}

/// Hit-test a world-space point. Nodes drawn later (on top) win; node
/// controls take priority over edge controls.
pub fn hit_test(graph: &GraphStore, p: Point, scale: &ScaledValues) -> Option<Hit> {
	for node in graph.nodes().rev() {
		let (corner, size) = delete_box(node, scale);
		if inside(p, corner, size, size) {
			return Some(Hit::DeleteNode(node.id.clone()));
		}
		if within(p, output_port(node, scale), scale.port_hit_radius) {
			return Some(Hit::OutputPort(node.id.clone()));
		}
		if within(p, input_port(node, scale), scale.port_hit_radius) {
			return Some(Hit::InputPort(node.id.clone()));
		}
		let origin = (node.position.x, node.position.y);
		if inside(p, origin, scale.node_width, scale.node_height) {
			return Some(Hit::NodeBody(node.id.clone()));
		}
	}

	for edge in graph.edges().rev() {
		if let Some(route) = edge_route(graph, edge, scale) {
			if within(p, route.label, scale.edge_delete_radius) {
				return Some(Hit::DeleteEdge(edge.id.clone()));
			}
		}
	}
	None
}

/// Node whose input port is under `p`, if any.
pub fn input_port_at(graph: &GraphStore, p: Point, scale: &ScaledValues) -> Option<String> {
	graph
		.nodes()
		.rev()
		.find(|node| within(p, input_port(node, scale), scale.port_hit_radius))
		.map(|node| node.id.clone())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::workflow_canvas::scale::ScaleConfig;
	use crate::graph::EdgeKind;

	fn scale() -> ScaledValues {
		ScaledValues::new(&ScaleConfig::default(), 1.0)
	}

	#[test]
	fn screen_to_world_inverts_pan_and_zoom() {
		let t = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		};
		assert_eq!(t.screen_to_world(100.0, 50.0), (0.0, 0.0));
		assert_eq!(t.screen_to_world(300.0, 250.0), (100.0, 100.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed_and_clamps() {
		let mut t = ViewTransform::default();
		let before = t.screen_to_world(40.0, 30.0);
		t.zoom_at(40.0, 30.0, 1.5, 0.1, 4.0);
		let after = t.screen_to_world(40.0, 30.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..50 {
			t.zoom_at(0.0, 0.0, 1.5, 0.1, 4.0);
		}
		assert_eq!(t.k, 4.0);
	}

	#[test]
	fn hit_priorities() {
		let s = scale();
		let mut graph = GraphStore::new();
		let a = graph.add_node("API", Position::new(0.0, 0.0));
		let b = graph.add_node("Email", Position::new(400.0, 0.0));
		let edge = graph.add_edge(&a.id, &b.id, EdgeKind::Default).unwrap();

		assert_eq!(hit_test(&graph, (181.0, 19.0), &s), Some(Hit::DeleteNode(a.id.clone())));
		assert_eq!(hit_test(&graph, (203.0, 36.0), &s), Some(Hit::OutputPort(a.id.clone())));
		assert_eq!(hit_test(&graph, (398.0, 36.0), &s), Some(Hit::InputPort(b.id.clone())));
		assert_eq!(hit_test(&graph, (50.0, 50.0), &s), Some(Hit::NodeBody(a.id.clone())));
		assert_eq!(hit_test(&graph, (300.0, 36.0), &s), Some(Hit::DeleteEdge(edge.id)));
		assert_eq!(hit_test(&graph, (300.0, 300.0), &s), None);
		assert_eq!(input_port_at(&graph, (401.0, 40.0), &s), Some(b.id));
	}

	#[test]
	fn topmost_node_wins_on_overlap() {
		let s = scale();
		let mut graph = GraphStore::new();
		graph.add_node("API", Position::new(0.0, 0.0));
		let top = graph.add_node("Email", Position::new(50.0, 20.0));
		assert_eq!(hit_test(&graph, (60.0, 30.0), &s), Some(Hit::NodeBody(top.id)));
	}
}
