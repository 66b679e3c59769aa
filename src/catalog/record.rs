//! Persisted workflow record and its time labels.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::GraphState;

/// Workflow identifier: epoch milliseconds at creation.
pub type WorkflowId = i64;

/// One workflow: user metadata, timestamps and its embedded graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
	pub id: WorkflowId,
	pub project_name: String,
	pub description: String,
	pub created_at: DateTime<Utc>,
	pub last_updated_at: DateTime<Utc>,
	/// Creation date as shown in the list, e.g. "17 October". Computed once.
	pub display_created_at: String,
	/// Relative age of `last_updated_at`, refreshed periodically.
	pub last_updated: String,
	/// Flattened so the stored record carries `nodes` and `edges` directly.
	#[serde(flatten)]
	pub graph: GraphState,
}

impl WorkflowRecord {
	pub fn new(id: WorkflowId, project_name: &str, description: &str, now: DateTime<Utc>) -> Self {
		Self {
			id,
			project_name: project_name.to_string(),
			description: description.to_string(),
			created_at: now,
			last_updated_at: now,
			display_created_at: display_date(now),
			last_updated: relative_age(now, now),
			graph: GraphState::default(),
		}
	}

	/// Record a modification at `now`.
	pub fn touch(&mut self, now: DateTime<Utc>) {
		self.last_updated_at = now;
		self.last_updated = relative_age(now, now);
	}

	pub fn relabel(&mut self, now: DateTime<Utc>) {
		self.last_updated = relative_age(now, self.last_updated_at);
	}

	/// Case-insensitive substring match on name or description.
	/// `needle` must already be lowercase.
	pub(crate) fn matches(&self, needle: &str) -> bool {
		self.project_name.to_lowercase().contains(needle)
			|| self.description.to_lowercase().contains(needle)
	}
}

/// "today", "yesterday" or "N days ago" for the whole days between
/// `then` and `now`. Timestamps in the future count as today.
pub fn relative_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
	let days = (now - then).num_milliseconds().div_euclid(TimeDelta::days(1).num_milliseconds());
	match days {
		i64::MIN..=0 => "today".to_string(),
		1 => "yesterday".to_string(),
		n => format!("{n} days ago"),
	}
}

/// Day and long month name, e.g. "3 March".
pub fn display_date(at: DateTime<Utc>) -> String {
	at.format("%-d %B").to_string()
}
