//! Persistence of the workflow collection in a key/value store.
//!
//! The whole collection lives as one JSON array under a single key and is
//! overwritten on every save (last writer wins). In the browser the store is
//! `window.localStorage`; tests use [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{info, warn};

use crate::catalog::WorkflowRecord;
use crate::error::{Error, Result};

/// Minimal string key/value store.
pub trait KeyValueStore {
	fn get_item(&self, key: &str) -> Result<Option<String>>;
	fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// `window.localStorage`, if the browser exposes it.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
	inner: Option<web_sys::Storage>,
}

impl BrowserStorage {
	/// Bind to `localStorage`. When it is unavailable (privacy mode, no
	/// window) reads return nothing and writes fail with `StorageUnavailable`.
	pub fn local() -> Self {
		let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
		if inner.is_none() {
			warn!("workflow-canvas: localStorage unavailable, workflows will not persist");
		}
		Self { inner }
	}
}

fn js_error(err: wasm_bindgen::JsValue) -> Error {
	Error::StorageUnavailable(format!("{err:?}"))
}

impl KeyValueStore for BrowserStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>> {
		match &self.inner {
			Some(storage) => storage.get_item(key).map_err(js_error),
			None => Ok(None),
		}
	}

	fn set_item(&self, key: &str, value: &str) -> Result<()> {
		match &self.inner {
			Some(storage) => storage.set_item(key, value).map_err(js_error),
			None => Err(Error::StorageUnavailable("localStorage is not available".into())),
		}
	}
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	items: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>> {
		Ok(self.items.borrow().get(key).cloned())
	}

	fn set_item(&self, key: &str, value: &str) -> Result<()> {
		self.items.borrow_mut().insert(key.to_string(), value.to_string());
		Ok(())
	}
}

/// Reads and writes the full workflow collection under one key.
#[derive(Clone, Debug)]
pub struct WorkflowRepository<S> {
	store: S,
	key: String,
}

impl<S: KeyValueStore> WorkflowRepository<S> {
	pub fn new(store: S, key: impl Into<String>) -> Self {
		Self {
			store,
			key: key.into(),
		}
	}

	/// Decode the stored collection, reporting why it could not be read.
	/// A missing key is an empty collection, not an error.
	pub fn try_load_all(&self) -> Result<Vec<WorkflowRecord>> {
		match self.store.get_item(&self.key)? {
			Some(json) => Ok(serde_json::from_str(&json)?),
			None => Ok(Vec::new()),
		}
	}

	/// Load the collection, substituting an empty one for unreadable data.
	pub fn load_all(&self) -> Vec<WorkflowRecord> {
		match self.try_load_all() {
			Ok(records) => {
				info!("workflow-canvas: loaded {} workflow(s)", records.len());
				records
			}
			Err(e) => {
				warn!("workflow-canvas: starting from an empty collection: {}", e);
				Vec::new()
			}
		}
	}

	/// Overwrite the stored collection.
	pub fn save_all(&self, records: &[WorkflowRecord]) -> Result<()> {
		let json = serde_json::to_string(records)?;
		self.store.set_item(&self.key, &json)
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use chrono::{TimeZone, Utc};

	use super::*;
	use crate::graph::{EdgeKind, GraphStore, Position};

	fn repository() -> (MemoryStorage, WorkflowRepository<MemoryStorage>) {
		let store = MemoryStorage::default();
		(store.clone(), WorkflowRepository::new(store, "workflows"))
	}

	fn sample_records() -> Vec<WorkflowRecord> {
		let now = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
		let mut graph = GraphStore::new();
		let a = graph.add_node("HTTP Request", Position::new(120.0, 80.0));
		let b = graph.add_node("Email", Position::new(420.5, -16.25));
		// Positions produced by zooming are arbitrary doubles.
		for i in 1..200 {
			let k = 1.1f64.powi(i % 40);
			graph.add_node("API", Position::new(123.0 / k + i as f64 / 3.0, -(987.65 / k)));
		}
		graph.add_edge(&a.id, &b.id, EdgeKind::SmoothStep).unwrap();

		let mut first = WorkflowRecord::new(1_760_688_000_000, "Pipeline A", "desc", now);
		first.graph = graph.into_state();
		let second = WorkflowRecord::new(1_760_688_000_001, "Reports", "Weekly export", now);
		vec![first, second]
	}

	#[test]
	fn missing_key_loads_empty() {
		let (_, repo) = repository();
		assert!(repo.try_load_all().unwrap().is_empty());
		assert!(repo.load_all().is_empty());
	}

	#[test]
	fn malformed_data_fails_soft() {
		let (store, repo) = repository();
		store.set_item("workflows", "{not json").unwrap();
		assert_matches!(repo.try_load_all(), Err(Error::MalformedStorage(_)));
		assert!(repo.load_all().is_empty());

		store.set_item("workflows", r#"[{"id":"wrong-type"}]"#).unwrap();
		assert!(repo.load_all().is_empty());
	}

	#[test]
	fn save_then_load_is_lossless() {
		let (_, repo) = repository();
		let records = sample_records();
		repo.save_all(&records).unwrap();

		let loaded = repo.load_all();
		assert_eq!(loaded, records);

		repo.save_all(&loaded).unwrap();
		assert_eq!(repo.load_all(), records);
	}

	#[test]
	fn records_without_graph_fields_load_with_empty_graph() {
		let (store, repo) = repository();
		store
			.set_item(
				"workflows",
				r#"[{"id":5,"projectName":"Old","description":"d",
				"createdAt":"2026-10-01T10:00:00.000Z","lastUpdatedAt":"2026-10-01T10:00:00.000Z",
				"displayCreatedAt":"1 October","lastUpdated":"today"}]"#,
			)
			.unwrap();
		let loaded = repo.load_all();
		assert_eq!(loaded.len(), 1);
		assert!(loaded[0].graph.is_empty());
	}

	#[test]
	fn save_overwrites_whole_collection() {
		let (_, repo) = repository();
		repo.save_all(&sample_records()).unwrap();
		repo.save_all(&sample_records()[1..]).unwrap();
		let loaded = repo.load_all();
		assert_eq!(loaded.len(), 1);
		assert_eq!(loaded[0].project_name, "Reports");
	}
}
