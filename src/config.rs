//! Runtime configuration read from the host page.

use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::graph::EdgeKind;

/// Id of the optional `<script type="application/json">` element holding
/// configuration overrides.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Editor-wide settings. Every field has a default so a partial (or absent)
/// configuration block is valid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
	/// Key of the persisted workflow collection.
	pub storage_key: String,
	/// Period of the relative-age refresh on the overview list.
	pub relabel_interval_secs: u64,
	/// Canvas zoom bounds.
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Routing style of edges drawn by the user.
	pub default_edge_kind: EdgeKind,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			storage_key: "workflows".to_string(),
			relabel_interval_secs: 60,
			min_zoom: 0.1,
			max_zoom: 4.0,
			default_edge_kind: EdgeKind::Default,
		}
	}
}

impl EditorConfig {
	/// Parse overrides from JSON, normalising nonsensical values.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		let mut config: Self = serde_json::from_str(json)?;
		if config.relabel_interval_secs == 0 {
			config.relabel_interval_secs = Self::default().relabel_interval_secs;
		}
		if !(config.min_zoom > 0.0 && config.min_zoom <= config.max_zoom) {
			let defaults = Self::default();
			config.min_zoom = defaults.min_zoom;
			config.max_zoom = defaults.max_zoom;
		}
		Ok(config)
	}

	pub fn relabel_interval(&self) -> Duration {
		Duration::from_secs(self.relabel_interval_secs)
	}

	/// Read the configuration block from the DOM, falling back to defaults.
	pub fn load() -> Self {
		let Some(json_text) = config_element_text() else {
			return Self::default();
		};
		match Self::from_json(&json_text) {
			Ok(config) => {
				info!("workflow-canvas: loaded configuration (storage key {:?})", config.storage_key);
				config
			}
			Err(e) => {
				warn!("workflow-canvas: failed to parse configuration: {}", e);
				Self::default()
			}
		}
	}
}

fn config_element_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
