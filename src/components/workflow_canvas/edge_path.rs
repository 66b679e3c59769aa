//! Edge routing between an output port and an input port.
//!
//! Routes are computed in world-space and shared by the renderer (to stroke
//! the path) and the controller (to hit the delete control at the label
//! point).

use crate::graph::EdgeKind;

/// Horizontal run out of and into a port before a smooth-step route turns.
const STEP_OFFSET: f64 = 20.0;
/// Minimum bezier handle length so short edges still leave ports sideways.
const MIN_HANDLE: f64 = 40.0;

pub type Point = (f64, f64);

/// Geometry to stroke for one edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgePath {
	Line { from: Point, to: Point },
	Bezier { from: Point, c1: Point, c2: Point, to: Point },
	/// Axis-aligned polyline; corners are rounded when drawn.
	Orthogonal { points: Vec<Point> },
}

/// Routed edge with the point where its label/delete control sits.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRoute {
	pub path: EdgePath,
	pub label: Point,
}

/// Route an edge of `kind` from `from` (output port) to `to` (input port).
pub fn route(kind: EdgeKind, from: Point, to: Point) -> EdgeRoute {
	let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
	match kind {
		EdgeKind::Straight => EdgeRoute {
			path: EdgePath::Line { from, to },
			label: mid,
		},
		EdgeKind::Default => {
			let handle = ((to.0 - from.0).abs() / 2.0).max(MIN_HANDLE);
			EdgeRoute {
				path: EdgePath::Bezier {
					from,
					c1: (from.0 + handle, from.1),
					c2: (to.0 - handle, to.1),
					to,
				},
				// Symmetric handles put the curve's t = 0.5 point at the midpoint.
				label: mid,
			}
		}
		EdgeKind::SmoothStep => smooth_step(from, to, mid),
	}
}

fn smooth_step(from: Point, to: Point, mid: Point) -> EdgeRoute {
	if to.0 >= from.0 + 2.0 * STEP_OFFSET {
		EdgeRoute {
			path: EdgePath::Orthogonal {
				points: vec![from, (mid.0, from.1), (mid.0, to.1), to],
			},
			label: mid,
		}
	} else {
		// Target sits behind the source: leave right, cross over, enter left.
		let (out_x, in_x) = (from.0 + STEP_OFFSET, to.0 - STEP_OFFSET);
		EdgeRoute {
			path: EdgePath::Orthogonal {
				points: vec![
					from,
					(out_x, from.1),
					(out_x, mid.1),
					(in_x, mid.1),
					(in_x, to.1),
					to,
				],
			},
			label: mid,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn straight_and_bezier_labels_sit_at_midpoint() {
		for kind in [EdgeKind::Straight, EdgeKind::Default] {
			assert_eq!(route(kind, (0.0, 0.0), (100.0, 50.0)).label, (50.0, 25.0));
		}
	}

	#[test]
	fn bezier_handles_have_minimum_length() {
		let EdgePath::Bezier { c1, c2, .. } = route(EdgeKind::Default, (0.0, 0.0), (10.0, 0.0)).path
		else {
			panic!("expected bezier");
		};
		assert_eq!(c1, (40.0, 0.0));
		assert_eq!(c2, (-30.0, 0.0));
	}

	#[test]
	fn forward_smooth_step_turns_once_at_midpoint() {
		let route = route(EdgeKind::SmoothStep, (0.0, 0.0), (200.0, 100.0));
		assert_eq!(
			route.path,
			EdgePath::Orthogonal {
				points: vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (200.0, 100.0)]
			}
		);
		assert_eq!(route.label, (100.0, 50.0));
	}

	#[test]
	fn backward_smooth_step_wraps_around() {
		let route = route(EdgeKind::SmoothStep, (200.0, 0.0), (0.0, 100.0));
		let EdgePath::Orthogonal { points } = route.path else {
			panic!("expected orthogonal path");
		};
		assert_eq!(points.len(), 6);
		assert_eq!(points[1], (220.0, 0.0));
		assert_eq!(points[4], (-20.0, 100.0));
		assert_eq!(route.label, (100.0, 50.0));
	}
}
