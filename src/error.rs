//! Error taxonomy for the editing core.
//!
//! None of these are fatal: callers at the view boundary log them and fall
//! back to "do nothing" or "start from an empty state".

use crate::catalog::WorkflowId;

/// Errors raised by graph mutations, persistence and navigation lookups.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// An edge endpoint does not name a node currently in the graph.
	#[error("invalid node reference: {node_id}")]
	InvalidReference { node_id: String },

	/// The persisted collection could not be decoded.
	#[error("malformed workflow storage: {0}")]
	MalformedStorage(#[from] serde_json::Error),

	/// No workflow with this id exists in the persisted collection.
	#[error("workflow not found: {0}")]
	NotFound(WorkflowId),

	/// The browser refused to read or write the key/value store.
	#[error("storage unavailable: {0}")]
	StorageUnavailable(String),
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
