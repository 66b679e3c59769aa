//! Graph data structures persisted inside each workflow record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canvas (world) coordinates of a node's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A typed unit of work placed on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier, e.g. `node_1712345678901`. Edges reference it.
	pub id: String,
	/// Palette type label, e.g. "HTTP Request".
	#[serde(rename = "type")]
	pub node_type: String,
	pub position: Position,
	/// Display text. Defaults to the type label.
	pub label: String,
}

/// Visual routing style of an edge. Carries no meaning for graph integrity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Cubic bezier between the ports.
	#[default]
	Default,
	/// Orthogonal segments with rounded corners.
	SmoothStep,
	/// Straight line.
	Straight,
}

/// A directed connection from one node's output port to another's input port.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	pub kind: EdgeKind,
	/// Render with flowing dashes.
	pub animated: bool,
}

impl Edge {
	/// Whether this edge touches `node_id` on either end.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Nodes and edges of one workflow, keyed by id.
///
/// Relations are expressed purely through id fields; nodes hold no reference
/// to their edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
	#[serde(default)]
	pub nodes: BTreeMap<String, Node>,
	#[serde(default)]
	pub edges: BTreeMap<String, Edge>,
}

impl GraphState {
	/// Ids of edges whose source or target is not a node in this graph.
	pub fn dangling_edges(&self) -> Vec<String> {
		self.edges
			.values()
			.filter(|e| !self.nodes.contains_key(&e.source) || !self.nodes.contains_key(&e.target))
			.map(|e| e.id.clone())
			.collect()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}
