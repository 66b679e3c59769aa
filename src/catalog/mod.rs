//! Ordered collection of workflows shown by the overview list.
//!
//! The catalog owns the in-memory collection and its repository; every
//! catalog-level mutation persists the full collection before returning.

mod record;
mod schedule;

use chrono::{DateTime, Utc};
use log::{info, warn};

pub use record::{WorkflowId, WorkflowRecord, display_date, relative_age};
pub use schedule::RelabelSchedule;

use crate::ids::IdAllocator;
use crate::storage::{KeyValueStore, WorkflowRepository};

/// User-selected list order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
	/// Most recently updated first.
	#[default]
	Newest,
	/// Earliest created first.
	Oldest,
}

/// Workflow collection plus the list-level UI state that mutates it.
#[derive(Debug)]
pub struct WorkflowCatalog<S> {
	repository: WorkflowRepository<S>,
	records: Vec<WorkflowRecord>,
	sort_order: SortOrder,
	pending_delete: Option<WorkflowId>,
	ids: IdAllocator,
}

impl<S: KeyValueStore> WorkflowCatalog<S> {
	/// Load the stored collection. Unreadable storage yields an empty catalog.
	pub fn load(repository: WorkflowRepository<S>) -> Self {
		let records = repository.load_all();
		let mut ids = IdAllocator::default();
		for record in &records {
			ids.observe(record.id);
		}
		Self {
			repository,
			records,
			sort_order: SortOrder::default(),
			pending_delete: None,
			ids,
		}
	}

	/// Records in their current stored order.
	pub fn list(&self) -> &[WorkflowRecord] {
		&self.records
	}

	pub fn get(&self, id: WorkflowId) -> Option<&WorkflowRecord> {
		self.records.iter().find(|r| r.id == id)
	}

	pub fn sort_order(&self) -> SortOrder {
		self.sort_order
	}

	pub fn pending_delete(&self) -> Option<WorkflowId> {
		self.pending_delete
	}

	/// Create a workflow with an empty graph at the front of the list.
	/// Non-empty name and description are enforced by the input form.
	pub fn create(
		&mut self,
		project_name: &str,
		description: &str,
		now: DateTime<Utc>,
	) -> &WorkflowRecord {
		let id = self.ids.next_at(now.timestamp_millis());
		let record = WorkflowRecord::new(id, project_name, description, now);
		info!("workflow-canvas: created workflow {} ({})", id, project_name);
		self.records.insert(0, record);
		self.persist();
		&self.records[0]
	}

	/// Open the delete confirmation for `id`. A request while a confirmation
	/// is already open closes it instead.
	pub fn request_delete(&mut self, id: WorkflowId) {
		self.pending_delete = match self.pending_delete {
			Some(_) => None,
			None => Some(id),
		};
	}

	/// Close the confirmation without deleting anything.
	pub fn cancel_delete(&mut self) {
		self.pending_delete = None;
	}

	/// Delete `id` if it is the workflow awaiting confirmation. Confirming any
	/// other id only cancels the pending request.
	pub fn confirm_delete(&mut self, id: WorkflowId) -> Option<WorkflowRecord> {
		let pending = self.pending_delete.take();
		if pending != Some(id) {
			return None;
		}
		let index = self.records.iter().position(|r| r.id == id)?;
		let removed = self.records.remove(index);
		info!("workflow-canvas: deleted workflow {}", id);
		self.persist();
		Some(removed)
	}

	/// Records whose name or description contains `query`, ignoring case,
	/// in stored order.
	pub fn search(&self, query: &str) -> Vec<&WorkflowRecord> {
		let needle = query.to_lowercase();
		self.records.iter().filter(|r| r.matches(&needle)).collect()
	}

	/// Reorder the stored list. The order persists until the next sort.
	pub fn sort(&mut self, order: SortOrder) {
		self.sort_order = order;
		match order {
			SortOrder::Newest => self
				.records
				.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at)),
			SortOrder::Oldest => self.records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
		}
		self.persist();
	}

	/// Recompute every record's relative age label.
	pub fn relabel_ages(&mut self, now: DateTime<Utc>) {
		for record in &mut self.records {
			record.relabel(now);
		}
		self.persist();
	}

	fn persist(&self) {
		if let Err(e) = self.repository.save_all(&self.records) {
			warn!("workflow-canvas: failed to save workflows: {}", e);
		}
	}
}

#[cfg(test)]
mod tests {
	use chrono::{TimeDelta, TimeZone};

	use super::*;
	use crate::storage::MemoryStorage;

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
	}

	fn catalog() -> (WorkflowRepository<MemoryStorage>, WorkflowCatalog<MemoryStorage>) {
		let repo = WorkflowRepository::new(MemoryStorage::default(), "workflows");
		(repo.clone(), WorkflowCatalog::load(repo))
	}

	#[test]
	fn create_inserts_single_record_and_persists() {
		let (repo, mut catalog) = catalog();
		let id = catalog.create("Pipeline A", "desc", now()).id;

		assert_eq!(catalog.list().len(), 1);
		assert_eq!(catalog.sort_order(), SortOrder::Newest);
		assert_eq!(catalog.get(id).unwrap().project_name, "Pipeline A");
		assert_eq!(repo.load_all(), catalog.list());
	}

	#[test]
	fn newer_workflows_go_first() {
		let (_, mut catalog) = catalog();
		catalog.create("First", "one", now());
		catalog.create("Second", "two", now() + TimeDelta::minutes(1));
		let names: Vec<_> = catalog.list().iter().map(|r| r.project_name.as_str()).collect();
		assert_eq!(names, ["Second", "First"]);
	}

	#[test]
	fn ids_stay_unique_within_the_same_millisecond() {
		let (_, mut catalog) = catalog();
		let a = catalog.create("A", "a", now()).id;
		let b = catalog.create("B", "b", now()).id;
		assert_ne!(a, b);
	}

	#[test]
	fn confirm_on_different_id_cancels_request() {
		let (repo, mut catalog) = catalog();
		let a = catalog.create("Pipeline A", "desc", now()).id;
		let b = catalog.create("Pipeline B", "desc", now()).id;

		catalog.request_delete(a);
		assert_eq!(catalog.pending_delete(), Some(a));
		assert!(catalog.confirm_delete(b).is_none());
		assert_eq!(catalog.pending_delete(), None);

		// The earlier request no longer stands either.
		assert!(catalog.confirm_delete(a).is_none());
		assert_eq!(catalog.list().len(), 2);
		assert_eq!(repo.load_all().len(), 2);
	}

	#[test]
	fn confirmed_delete_removes_and_persists() {
		let (repo, mut catalog) = catalog();
		let a = catalog.create("Pipeline A", "desc", now()).id;
		catalog.create("Pipeline B", "desc", now());

		catalog.request_delete(a);
		let removed = catalog.confirm_delete(a).unwrap();
		assert_eq!(removed.id, a);
		assert!(catalog.get(a).is_none());
		assert_eq!(repo.load_all().len(), 1);
	}

	#[test]
	fn delete_without_request_or_after_cancel_does_nothing() {
		let (_, mut catalog) = catalog();
		let a = catalog.create("Pipeline A", "desc", now()).id;
		assert!(catalog.confirm_delete(a).is_none());

		catalog.request_delete(a);
		catalog.cancel_delete();
		assert!(catalog.confirm_delete(a).is_none());

		catalog.request_delete(a);
		catalog.request_delete(a);
		assert_eq!(catalog.pending_delete(), None);
		assert_eq!(catalog.list().len(), 1);
	}

	#[test]
	fn search_matches_description_ignoring_case_and_keeps_order() {
		let (_, mut catalog) = catalog();
		catalog.create("Alpha", "Sends the Nightly report", now());
		catalog.create("Beta", "nothing here", now());
		catalog.create("Gamma", "NIGHTLY cleanup", now());

		let order_before: Vec<_> = catalog.list().iter().map(|r| r.id).collect();
		let hits: Vec<_> = catalog
			.search("nIgHtLy")
			.iter()
			.map(|r| r.project_name.as_str())
			.collect();
		assert_eq!(hits, ["Gamma", "Alpha"]);
		assert_eq!(catalog.list().iter().map(|r| r.id).collect::<Vec<_>>(), order_before);
		assert_eq!(catalog.search("").len(), 3);
		assert!(catalog.search("zzz").is_empty());
	}

	#[test]
	fn sort_orders_by_update_or_creation() {
		let (repo, mut catalog) = catalog();
		let old = catalog.create("Old", "o", now() - TimeDelta::days(3)).id;
		let mid = catalog.create("Mid", "m", now() - TimeDelta::days(2)).id;
		let new = catalog.create("New", "n", now() - TimeDelta::days(1)).id;

		// Editing the oldest workflow makes it the most recently updated.
		let mut records = repo.load_all();
		records.iter_mut().find(|r| r.id == old).unwrap().touch(now());
		repo.save_all(&records).unwrap();
		let mut catalog = WorkflowCatalog::load(repo.clone());

		catalog.sort(SortOrder::Newest);
		let ids: Vec<_> = catalog.list().iter().map(|r| r.id).collect();
		assert_eq!(ids, [old, new, mid]);

		catalog.sort(SortOrder::Oldest);
		let ids: Vec<_> = catalog.list().iter().map(|r| r.id).collect();
		assert_eq!(ids, [old, mid, new]);
		assert_eq!(repo.load_all().iter().map(|r| r.id).collect::<Vec<_>>(), ids);
	}

	#[test]
	fn relabel_is_idempotent() {
		let (_, mut catalog) = catalog();
		catalog.create("A", "a", now());
		let later = now() + TimeDelta::hours(50);
		catalog.relabel_ages(later);
		let first: Vec<_> = catalog.list().to_vec();
		catalog.relabel_ages(later);
		assert_eq!(catalog.list(), first.as_slice());
		assert_eq!(catalog.list()[0].last_updated, "2 days ago");
	}

	#[test]
	fn create_survives_stored_id_at_upper_bound() {
		let store = MemoryStorage::default();
		store
			.set_item(
				"workflows",
				r#"[{"id":9223372036854775807,"projectName":"Imported","description":"d",
				"createdAt":"2026-10-01T10:00:00Z","lastUpdatedAt":"2026-10-01T10:00:00Z",
				"displayCreatedAt":"1 October","lastUpdated":"today"}]"#,
			)
			.unwrap();
		let mut catalog = WorkflowCatalog::load(WorkflowRepository::new(store, "workflows"));
		assert_eq!(catalog.list().len(), 1);

		catalog.create("New", "d", now());
		assert_eq!(catalog.list().len(), 2);
		assert_eq!(catalog.list()[0].project_name, "New");
	}

	#[test]
	fn malformed_storage_loads_empty_catalog() {
		let store = MemoryStorage::default();
		store.set_item("workflows", "[{]").unwrap();
		let catalog = WorkflowCatalog::load(WorkflowRepository::new(store, "workflows"));
		assert!(catalog.list().is_empty());
	}
}
