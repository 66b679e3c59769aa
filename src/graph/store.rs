//! Canonical node/edge store for one workflow with integrity guarantees.
//!
//! Every mutation takes `&mut self` and completes both maps before it
//! returns, so no caller can observe a node removed while its edges remain.

use log::{debug, warn};

use super::types::{Edge, EdgeKind, GraphState, Node, Position};
use crate::error::{Error, Result};
use crate::ids::IdAllocator;

/// Owns the graph of a single workflow and its id allocator.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	state: GraphState,
	ids: IdAllocator,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adopt a persisted graph. The allocator is seeded past every existing id
	/// and any edge pointing at a missing node is dropped.
	pub fn from_state(mut state: GraphState) -> Self {
		let dangling = state.dangling_edges();
		if !dangling.is_empty() {
			warn!(
				"workflow-canvas: pruning {} dangling edge(s) from stored graph",
				dangling.len()
			);
			for id in &dangling {
				state.edges.remove(id);
			}
		}

		let mut ids = IdAllocator::default();
		for id in state.nodes.keys().chain(state.edges.keys()) {
			ids.observe_id(id);
		}
		Self { state, ids }
	}

	pub fn state(&self) -> &GraphState {
		&self.state
	}

	pub fn into_state(self) -> GraphState {
		self.state
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.state.nodes.get(id)
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.state.edges.get(id)
	}

	/// Nodes in id order, which is creation order.
	pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
		self.state.nodes.values()
	}

	pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> {
		self.state.edges.values()
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.state.nodes.contains_key(id)
	}

	/// Insert a node of `node_type` at `position`, labelled with its type.
	pub fn add_node(&mut self, node_type: &str, position: Position) -> Node {
		let node = Node {
			id: self.ids.next_id("node"),
			node_type: node_type.to_string(),
			position,
			label: node_type.to_string(),
		};
		debug!("workflow-canvas: add node {} ({})", node.id, node.node_type);
		self.state.nodes.insert(node.id.clone(), node.clone());
		node
	}

	/// Remove a node together with every edge that references it.
	/// Unknown ids are a no-op and return `None`.
	pub fn remove_node(&mut self, id: &str) -> Option<Node> {
		let node = self.state.nodes.remove(id)?;
		let before = self.state.edges.len();
		self.state.edges.retain(|_, edge| !edge.touches(id));
		debug!(
			"workflow-canvas: remove node {} (+{} edge(s))",
			id,
			before - self.state.edges.len()
		);
		Some(node)
	}

	/// Reposition an existing node. Returns false if the id is unknown.
	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		match self.state.nodes.get_mut(id) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}

	/// Connect `source` to `target`. Both must be current node ids; duplicate
	/// and self-referencing edges are accepted.
	pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) -> Result<Edge> {
		for endpoint in [source, target] {
			if !self.contains_node(endpoint) {
				return Err(Error::InvalidReference {
					node_id: endpoint.to_string(),
				});
			}
		}

		let edge = Edge {
			id: self.ids.next_id("edge"),
			source: source.to_string(),
			target: target.to_string(),
			kind,
			animated: true,
		};
		debug!("workflow-canvas: add edge {} ({} -> {})", edge.id, source, target);
		self.state.edges.insert(edge.id.clone(), edge.clone());
		Ok(edge)
	}

	/// Remove an edge. Unknown ids are a no-op and return `None`.
	pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
		let edge = self.state.edges.remove(id)?;
		debug!("workflow-canvas: remove edge {}", id);
		Some(edge)
	}
}
