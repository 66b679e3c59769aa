//! workflow-canvas: browser-based workflow editor.
//!
//! This crate provides a WASM application with a searchable overview of
//! stored workflows and a node-graph editor for each one. Workflows and their
//! graphs persist as a single JSON collection in `localStorage`.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};
use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod palette;
pub mod route;
pub mod session;
pub mod storage;

pub use catalog::{SortOrder, WorkflowCatalog, WorkflowId, WorkflowRecord};
pub use components::workflow_canvas::{CanvasController, Interaction, Mutation, WorkflowCanvas};
pub use components::{CatalogView, EditorView};
pub use config::EditorConfig;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeKind, GraphState, GraphStore, Node, Position};
pub use palette::{DragPayload, PaletteEntry, PaletteSource};
pub use route::Route;
pub use session::EditorSession;
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage, WorkflowRepository};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("workflow-canvas: logging initialized");
}

/// Keep `route` in sync with the location hash for the lifetime of the page.
fn track_route(route: RwSignal<Route>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let on_hashchange = Closure::<dyn FnMut()>::new(move || route.set(Route::current()));
	if window
		.add_event_listener_with_callback("hashchange", on_hashchange.as_ref().unchecked_ref())
		.is_ok()
	{
		// The app lives as long as the page.
		on_hashchange.forget();
	}
}

/// Main application component.
/// Loads configuration from the DOM and switches between the overview and
/// the editor by location hash.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	provide_context(EditorConfig::load());

	let route = RwSignal::new(Route::current());
	track_route(route);

	let page = move || match route.get() {
		Route::Catalog => view! { <CatalogView /> }.into_any(),
		Route::Editor(id) => view! { <EditorView id=id /> }.into_any(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Workflow Editor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="app">{page}</main>
	}
}
