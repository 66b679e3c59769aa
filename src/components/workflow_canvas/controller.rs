//! Pointer and drop input translated into graph mutations.
//!
//! The controller holds only the view transform, the active gesture and the
//! hover target. Every graph change goes through [`GraphStore`] and is
//! reported back as [`Interaction::Committed`] so the caller can persist it.

use std::mem;

use log::{debug, warn};

use super::edge_path::Point;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{self, Gesture, Hit, ViewTransform};
use crate::config::EditorConfig;
use crate::graph::{EdgeKind, GraphStore, Position};
use crate::palette::DragPayload;

/// Wheel zoom step per notch.
const WHEEL_IN: f64 = 1.1;
const WHEEL_OUT: f64 = 0.9;
/// Zoom step of the zoom buttons.
const BUTTON_STEP: f64 = 1.2;
/// Margin around the nodes framed by `fit_view`, as a fraction of their extent.
const FIT_PADDING: f64 = 0.1;

/// A graph change that has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
	NodeAdded(String),
	NodeRemoved(String),
	NodeMoved(String),
	EdgeAdded(String),
	EdgeRemoved(String),
}

/// Outcome of feeding one input event to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
	/// Nothing visible changed.
	Ignored,
	/// View-only change (hover, pan, zoom, live drag).
	Redraw,
	/// The graph changed and should be persisted.
	Committed(Mutation),
}

#[derive(Clone, Debug)]
pub struct CanvasController {
	transform: ViewTransform,
	gesture: Gesture,
	hovered: Option<Hit>,
	scale: ScaleConfig,
	min_zoom: f64,
	max_zoom: f64,
	edge_kind: EdgeKind,
}

impl CanvasController {
	pub fn new(config: &EditorConfig) -> Self {
		Self {
			transform: ViewTransform::default(),
			gesture: Gesture::Idle,
			hovered: None,
			scale: ScaleConfig::default(),
			min_zoom: config.min_zoom,
			max_zoom: config.max_zoom,
			edge_kind: config.default_edge_kind,
		}
	}

	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	pub fn hovered(&self) -> Option<&Hit> {
		self.hovered.as_ref()
	}

	pub fn scale_config(&self) -> &ScaleConfig {
		&self.scale
	}

	/// Sizes at the current zoom level.
	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.transform.k)
	}

	fn world(&self, sx: f64, sy: f64) -> Point {
		self.transform.screen_to_world(sx, sy)
	}

	/// What lies under the screen point `(sx, sy)`.
	pub fn hit_test(&self, graph: &GraphStore, sx: f64, sy: f64) -> Option<Hit> {
		state::hit_test(graph, self.world(sx, sy), &self.scaled())
	}

	/// Place a node for a palette drop at screen point `(sx, sy)`. Payloads
	/// the palette does not recognise are ignored.
	pub fn drop_payload(
		&mut self,
		graph: &mut GraphStore,
		raw: Option<&str>,
		sx: f64,
		sy: f64,
	) -> Interaction {
		let Some(DragPayload::PaletteEntry(entry)) = DragPayload::parse(raw) else {
			debug!("workflow-canvas: ignoring drop with payload {:?}", raw);
			return Interaction::Ignored;
		};
		let (x, y) = self.world(sx, sy);
		let node = graph.add_node(entry.node_type, Position::new(x, y));
		Interaction::Committed(Mutation::NodeAdded(node.id))
	}

	/// Start a gesture. While one is active further presses are ignored.
	pub fn pointer_down(&mut self, graph: &GraphStore, sx: f64, sy: f64) -> Interaction {
		if self.gesture != Gesture::Idle {
			return Interaction::Ignored;
		}
		let world = self.world(sx, sy);
		self.gesture = match state::hit_test(graph, world, &self.scaled()) {
			Some(hit @ (Hit::DeleteNode(_) | Hit::DeleteEdge(_))) => Gesture::Press(hit),
			Some(Hit::OutputPort(source)) => Gesture::Connect {
				source,
				cursor: world,
			},
			Some(Hit::NodeBody(node_id) | Hit::InputPort(node_id)) => {
				let Some(node) = graph.node(&node_id) else {
					return Interaction::Ignored;
				};
				Gesture::MoveNode {
					start: (sx, sy),
					node_start: node.position,
					node_id,
					moved: false,
				}
			}
			None => Gesture::Pan {
				start: (sx, sy),
				origin: (self.transform.x, self.transform.y),
			},
		};
		Interaction::Redraw
	}

	pub fn pointer_move(&mut self, graph: &mut GraphStore, sx: f64, sy: f64) -> Interaction {
		let world = self.world(sx, sy);
		let scale = self.scaled();
		let k = self.transform.k;
		match &mut self.gesture {
			Gesture::Idle => {
				let hovered = state::hit_test(graph, world, &scale);
				if hovered == self.hovered {
					return Interaction::Ignored;
				}
				self.hovered = hovered;
			}
			Gesture::Pan { start, origin } => {
				self.transform.x = origin.0 + (sx - start.0);
				self.transform.y = origin.1 + (sy - start.1);
			}
			Gesture::MoveNode {
				node_id,
				start,
				node_start,
				moved,
			} => {
				let position = Position::new(
					node_start.x + (sx - start.0) / k,
					node_start.y + (sy - start.1) / k,
				);
				if graph.move_node(node_id, position) {
					*moved = true;
				}
			}
			Gesture::Connect { cursor, .. } => {
				*cursor = world;
				self.hovered = state::input_port_at(graph, world, &scale).map(Hit::InputPort);
			}
			Gesture::Press(_) => return Interaction::Ignored,
		}
		Interaction::Redraw
	}

	/// Resolve the active gesture. Releasing outside a valid target cancels
	/// it without touching the graph.
	pub fn pointer_up(&mut self, graph: &mut GraphStore, sx: f64, sy: f64) -> Interaction {
		let world = self.world(sx, sy);
		match mem::take(&mut self.gesture) {
			Gesture::Idle => Interaction::Ignored,
			Gesture::Pan { .. } => Interaction::Redraw,
			Gesture::MoveNode { node_id, moved, .. } => finish_move(graph, node_id, moved),
			Gesture::Connect { source, .. } => {
				self.hovered = None;
				let Some(target) = state::input_port_at(graph, world, &self.scaled()) else {
					debug!("workflow-canvas: connection from {} cancelled", source);
					return Interaction::Redraw;
				};
				match graph.add_edge(&source, &target, self.edge_kind) {
					Ok(edge) => Interaction::Committed(Mutation::EdgeAdded(edge.id)),
					Err(e) => {
						warn!("workflow-canvas: connection rejected: {}", e);
						Interaction::Redraw
					}
				}
			}
			Gesture::Press(hit) => {
				if state::hit_test(graph, world, &self.scaled()).as_ref() != Some(&hit) {
					return Interaction::Redraw;
				}
				match hit {
					Hit::DeleteNode(id) => self.delete_node(graph, &id),
					Hit::DeleteEdge(id) => self.delete_edge(graph, &id),
					_ => Interaction::Redraw,
				}
			}
		}
	}

	/// The pointer left the canvas: cancel pan, connect and press gestures;
	/// a node move ends where it is.
	pub fn pointer_leave(&mut self, graph: &GraphStore) -> Interaction {
		let had_hover = self.hovered.take().is_some();
		match mem::take(&mut self.gesture) {
			Gesture::MoveNode { node_id, moved, .. } => finish_move(graph, node_id, moved),
			Gesture::Idle if !had_hover => Interaction::Ignored,
			_ => Interaction::Redraw,
		}
	}

	/// Zoom around the cursor; negative `delta_y` zooms in.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> Interaction {
		let factor = if delta_y > 0.0 { WHEEL_OUT } else { WHEEL_IN };
		self.zoom_around(sx, sy, factor)
	}

	/// Zoom in around the centre of a `width` x `height` viewport.
	pub fn zoom_in(&mut self, width: f64, height: f64) -> Interaction {
		self.zoom_around(width / 2.0, height / 2.0, BUTTON_STEP)
	}

	pub fn zoom_out(&mut self, width: f64, height: f64) -> Interaction {
		self.zoom_around(width / 2.0, height / 2.0, 1.0 / BUTTON_STEP)
	}

	fn zoom_around(&mut self, sx: f64, sy: f64, factor: f64) -> Interaction {
		let before = self.transform.k;
		self.transform
			.zoom_at(sx, sy, factor, self.min_zoom, self.max_zoom);
		if self.transform.k == before {
			Interaction::Ignored
		} else {
			Interaction::Redraw
		}
	}

	/// Frame every node inside a `width` x `height` viewport. An empty graph
	/// resets the view.
	pub fn fit_view(&mut self, graph: &GraphStore, width: f64, height: f64) -> Interaction {
		let scale = self.scaled();
		let bounds = graph.nodes().fold(None, |acc: Option<(f64, f64, f64, f64)>, node| {
			let (x0, y0) = (node.position.x, node.position.y);
			let (x1, y1) = (x0 + scale.node_width, y0 + scale.node_height);
			Some(match acc {
				None => (x0, y0, x1, y1),
				Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
			})
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform::default();
			return Interaction::Redraw;
		};

		let (w, h) = ((x1 - x0) * (1.0 + 2.0 * FIT_PADDING), (y1 - y0) * (1.0 + 2.0 * FIT_PADDING));
		let k = (width / w).min(height / h).clamp(self.min_zoom, self.max_zoom);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		};
		Interaction::Redraw
	}

	/// Remove a node and its edges without confirmation.
	pub fn delete_node(&mut self, graph: &mut GraphStore, id: &str) -> Interaction {
		match graph.remove_node(id) {
			Some(node) => {
				self.hovered = None;
				Interaction::Committed(Mutation::NodeRemoved(node.id))
			}
			None => Interaction::Ignored,
		}
	}

	pub fn delete_edge(&mut self, graph: &mut GraphStore, id: &str) -> Interaction {
		match graph.remove_edge(id) {
			Some(edge) => {
				self.hovered = None;
				Interaction::Committed(Mutation::EdgeRemoved(edge.id))
			}
			None => Interaction::Ignored,
		}
	}
}

fn finish_move(graph: &GraphStore, node_id: String, moved: bool) -> Interaction {
	if moved && graph.contains_node(&node_id) {
		Interaction::Committed(Mutation::NodeMoved(node_id))
	} else {
		Interaction::Redraw
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;
	use crate::graph::Node;

	fn controller() -> CanvasController {
		CanvasController::new(&EditorConfig::default())
	}

	fn placed(c: &mut CanvasController, graph: &mut GraphStore, kind: &str, x: f64, y: f64) -> Node {
		let Interaction::Committed(Mutation::NodeAdded(id)) = c.drop_payload(graph, Some(kind), x, y)
		else {
			panic!("drop of {kind} did not add a node");
		};
		graph.node(&id).unwrap().clone()
	}

	#[test]
	fn drop_places_node_at_world_position() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		let node = placed(&mut c, &mut graph, "HTTP Request", 120.0, 80.0);

		assert_eq!(graph.nodes().count(), 1);
		assert_eq!(graph.edges().count(), 0);
		assert_eq!(node.position, Position::new(120.0, 80.0));
		assert_eq!(node.node_type, "HTTP Request");
		assert_eq!(node.label, "HTTP Request");
	}

	#[test]
	fn drop_respects_pan_and_zoom() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		c.pointer_down(&graph, 500.0, 500.0);
		c.pointer_move(&mut graph, 600.0, 550.0);
		c.pointer_up(&mut graph, 600.0, 550.0);
		c.transform.k = 2.0;

		let node = placed(&mut c, &mut graph, "Email", 300.0, 250.0);
		assert_eq!(node.position, Position::new(100.0, 100.0));
	}

	#[test]
	fn unknown_or_missing_payload_is_ignored() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		assert_eq!(c.drop_payload(&mut graph, Some("Teleporter"), 10.0, 10.0), Interaction::Ignored);
		assert_eq!(c.drop_payload(&mut graph, None, 10.0, 10.0), Interaction::Ignored);
		assert!(graph.state().is_empty());
	}

	#[test]
	fn connect_then_remove_source_cascades() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		let a = placed(&mut c, &mut graph, "HTTP Request", 0.0, 0.0);
		let b = placed(&mut c, &mut graph, "Email", 400.0, 0.0);

		assert_eq!(c.pointer_down(&graph, 200.0, 36.0), Interaction::Redraw);
		assert_matches!(c.gesture(), Gesture::Connect { source, .. } if *source == a.id);
		c.pointer_move(&mut graph, 300.0, 40.0);
		let edge_id = assert_matches!(
			c.pointer_up(&mut graph, 400.0, 36.0),
			Interaction::Committed(Mutation::EdgeAdded(id)) => id
		);
		let edge = graph.edge(&edge_id).unwrap();
		assert_eq!((edge.source.as_str(), edge.target.as_str()), (a.id.as_str(), b.id.as_str()));
		assert!(edge.animated);
		assert_eq!(edge.kind, EdgeKind::Default);

		assert_eq!(
			c.delete_node(&mut graph, &a.id),
			Interaction::Committed(Mutation::NodeRemoved(a.id.clone()))
		);
		assert_eq!(graph.nodes().count(), 1);
		assert_eq!(graph.edges().count(), 0);
		assert_eq!(c.delete_node(&mut graph, &a.id), Interaction::Ignored);
	}

	#[test]
	fn release_on_empty_canvas_cancels_connection() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		placed(&mut c, &mut graph, "HTTP Request", 0.0, 0.0);
		let before = graph.state().clone();

		c.pointer_down(&graph, 200.0, 36.0);
		c.pointer_move(&mut graph, 600.0, 600.0);
		assert_eq!(c.pointer_up(&mut graph, 600.0, 600.0), Interaction::Redraw);
		assert_eq!(graph.state(), &before);
		assert_eq!(c.gesture(), &Gesture::Idle);
	}

	#[test]
	fn leaving_the_canvas_cancels_connection() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		placed(&mut c, &mut graph, "HTTP Request", 0.0, 0.0);
		placed(&mut c, &mut graph, "Email", 400.0, 0.0);

		c.pointer_down(&graph, 200.0, 36.0);
		assert_eq!(c.pointer_leave(&graph), Interaction::Redraw);
		assert_eq!(c.pointer_up(&mut graph, 400.0, 36.0), Interaction::Ignored);
		assert_eq!(graph.edges().count(), 0);
	}

	#[test]
	fn gestures_are_modal() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		let a = placed(&mut c, &mut graph, "HTTP Request", 0.0, 0.0);

		c.pointer_down(&graph, 200.0, 36.0);
		// A second press while connecting neither pans nor starts a move.
		assert_eq!(c.pointer_down(&graph, 50.0, 50.0), Interaction::Ignored);
		assert_matches!(c.gesture(), Gesture::Connect { source, .. } if *source == a.id);
		c.pointer_move(&mut graph, 90.0, 90.0);
		assert_eq!(graph.node(&a.id).unwrap().position, Position::new(0.0, 0.0));
		assert_eq!(c.transform(), &ViewTransform::default());
	}

	#[test]
	fn dragging_a_node_commits_one_move() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		let a = placed(&mut c, &mut graph, "API", 0.0, 0.0);
		c.transform.k = 2.0;

		c.pointer_down(&graph, 20.0, 20.0);
		assert_eq!(c.pointer_move(&mut graph, 40.0, 30.0), Interaction::Redraw);
		assert_eq!(graph.node(&a.id).unwrap().position, Position::new(10.0, 5.0));
		assert_eq!(
			c.pointer_up(&mut graph, 40.0, 30.0),
			Interaction::Committed(Mutation::NodeMoved(a.id.clone()))
		);

		// A click without movement is not a mutation.
		c.pointer_down(&graph, 40.0, 30.0);
		assert_eq!(c.pointer_up(&mut graph, 40.0, 30.0), Interaction::Redraw);
	}

	#[test]
	fn delete_controls_fire_on_release_over_the_same_control() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		let a = placed(&mut c, &mut graph, "API", 0.0, 0.0);
		let b = placed(&mut c, &mut graph, "Email", 400.0, 0.0);
		let edge = graph.add_edge(&a.id, &b.id, EdgeKind::Default).unwrap();

		// Edge delete control sits at the route midpoint.
		c.pointer_down(&graph, 300.0, 36.0);
		assert_eq!(
			c.pointer_up(&mut graph, 300.0, 36.0),
			Interaction::Committed(Mutation::EdgeRemoved(edge.id))
		);

		// Sliding off the node's delete box aborts.
		c.pointer_down(&graph, 181.0, 19.0);
		assert_eq!(c.pointer_up(&mut graph, 100.0, 60.0), Interaction::Redraw);
		assert!(graph.contains_node(&a.id));

		c.pointer_down(&graph, 181.0, 19.0);
		assert_eq!(
			c.pointer_up(&mut graph, 182.0, 20.0),
			Interaction::Committed(Mutation::NodeRemoved(a.id))
		);
	}

	#[test]
	fn wheel_and_buttons_clamp_zoom() {
		let mut c = controller();
		for _ in 0..100 {
			c.wheel(0.0, 0.0, 1.0);
		}
		assert_eq!(c.transform().k, 0.1);
		assert_eq!(c.wheel(0.0, 0.0, 1.0), Interaction::Ignored);
		for _ in 0..100 {
			c.zoom_in(800.0, 600.0);
		}
		assert_eq!(c.transform().k, 4.0);
	}

	#[test]
	fn fit_view_frames_nodes_and_resets_when_empty() {
		let mut c = controller();
		let mut graph = GraphStore::new();
		c.fit_view(&graph, 800.0, 600.0);
		assert_eq!(c.transform(), &ViewTransform::default());

		placed(&mut c, &mut graph, "API", 0.0, 0.0);
		placed(&mut c, &mut graph, "Email", 600.0, 128.0);
		c.fit_view(&graph, 800.0, 600.0);
		let t = c.transform().clone();
		// Bounds are 800 x 200; padded width 960 limits the zoom.
		assert!((t.k - 800.0 / 960.0).abs() < 1e-9);
		let (cx, cy) = t.screen_to_world(400.0, 300.0);
		assert!((cx - 400.0).abs() < 1e-9 && (cy - 100.0).abs() < 1e-9);
	}
}
