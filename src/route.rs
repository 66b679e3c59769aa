//! Hash-based navigation between the overview list and the editor.

use crate::catalog::WorkflowId;

/// Top-level view addressed by the location hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
	/// `#/`: the workflow overview.
	#[default]
	Catalog,
	/// `#/workflow/<id>`: the editor for one workflow.
	Editor(WorkflowId),
}

impl Route {
	/// Parse a location hash. Anything unrecognised routes to the overview.
	pub fn parse(hash: &str) -> Self {
		let path = hash.trim_start_matches('#').trim_matches('/');
		match path.split_once('/') {
			Some(("workflow", id)) => id.parse().map(Route::Editor).unwrap_or_default(),
			_ => Route::Catalog,
		}
	}

	pub fn to_hash(self) -> String {
		match self {
			Route::Catalog => "#/".to_string(),
			Route::Editor(id) => format!("#/workflow/{id}"),
		}
	}

	/// Route of the current page.
	pub fn current() -> Self {
		web_sys::window()
			.and_then(|w| w.location().hash().ok())
			.map(|hash| Self::parse(&hash))
			.unwrap_or_default()
	}

	/// Navigate by rewriting the location hash; the `hashchange` listener
	/// installed by the app picks the change up.
	pub fn navigate(self) {
		if let Some(window) = web_sys::window() {
			if let Err(e) = window.location().set_hash(&self.to_hash()) {
				log::warn!("workflow-canvas: navigation failed: {:?}", e);
			}
		}
	}
}
