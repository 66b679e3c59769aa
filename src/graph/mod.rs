//! In-memory workflow graph: id-keyed nodes and edges.
//!
//! Edges refer to nodes by id only, so deleting a node is a filter over the
//! edge map rather than a walk over back-references.

mod store;
mod types;

pub use store::GraphStore;
pub use types::{Edge, EdgeKind, GraphState, Node, Position};
