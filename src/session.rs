//! Editor-side synchronisation between one workflow's graph and storage.
//!
//! The session edits a single record's graph. Flushing re-reads the stored
//! collection and replaces only that record, so catalog-level data of other
//! workflows is never overwritten with a stale copy.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::catalog::{WorkflowId, WorkflowRecord};
use crate::error::{Error, Result};
use crate::graph::GraphStore;
use crate::storage::{KeyValueStore, WorkflowRepository};

/// Title shown for a workflow that could not be found.
pub const UNTITLED: &str = "My Workflow";

/// Graph under edit plus the record it belongs to.
#[derive(Debug)]
pub struct EditorSession<S> {
	repository: WorkflowRepository<S>,
	id: WorkflowId,
	/// `None` when the id was unknown: the session is a detached draft.
	record: Option<WorkflowRecord>,
	graph: GraphStore,
	dirty: bool,
}

impl<S: KeyValueStore + Clone> EditorSession<S> {
	/// Open the workflow `id`, failing with `NotFound` if it is not stored.
	pub fn try_open(repository: WorkflowRepository<S>, id: WorkflowId) -> Result<Self> {
		let record = repository
			.load_all()
			.into_iter()
			.find(|r| r.id == id)
			.ok_or(Error::NotFound(id))?;
		info!(
			"workflow-canvas: opened workflow {} ({} nodes, {} edges)",
			id,
			record.graph.nodes.len(),
			record.graph.edges.len()
		);
		let graph = GraphStore::from_state(record.graph.clone());
		Ok(Self {
			repository,
			id,
			record: Some(record),
			graph,
			dirty: false,
		})
	}

	/// Open the workflow `id`, or an empty detached draft if it is unknown.
	pub fn open(repository: WorkflowRepository<S>, id: WorkflowId) -> Self {
		match Self::try_open(repository.clone(), id) {
			Ok(session) => session,
			Err(e) => {
				warn!("workflow-canvas: {}; editing an unsaved draft", e);
				Self {
					repository,
					id,
					record: None,
					graph: GraphStore::new(),
					dirty: false,
				}
			}
		}
	}

	pub fn title(&self) -> &str {
		self.record
			.as_ref()
			.map(|r| r.project_name.as_str())
			.unwrap_or(UNTITLED)
	}

	pub fn is_detached(&self) -> bool {
		self.record.is_none()
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn graph(&self) -> &GraphStore {
		&self.graph
	}

	pub fn graph_mut(&mut self) -> &mut GraphStore {
		&mut self.graph
	}

	/// Note that the graph changed since the last flush.
	pub fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	/// Persist pending graph changes, stamping the record as updated at `now`.
	/// Returns whether anything was written.
	pub fn flush(&mut self, now: DateTime<Utc>) -> Result<bool> {
		if !self.dirty {
			return Ok(false);
		}
		let Some(record) = self.record.as_mut() else {
			debug!("workflow-canvas: draft {} has no stored record, not saving", self.id);
			self.dirty = false;
			return Ok(false);
		};
		record.graph = self.graph.state().clone();
		record.touch(now);

		let mut records = self.repository.try_load_all()?;
		let Some(slot) = records.iter_mut().find(|r| r.id == self.id) else {
			warn!("workflow-canvas: workflow {} was deleted, discarding edits", self.id);
			self.dirty = false;
			return Ok(false);
		};
		*slot = record.clone();
		self.repository.save_all(&records)?;
		self.dirty = false;
		debug!("workflow-canvas: saved workflow {}", self.id);
		Ok(true)
	}
}
