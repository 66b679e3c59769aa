//! Editor page: header, palette and canvas for one workflow.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use log::warn;

use super::palette_sidebar::PaletteSidebar;
use super::workflow_canvas::{SharedSession, WorkflowCanvas};
use crate::catalog::WorkflowId;
use crate::config::EditorConfig;
use crate::route::Route;
use crate::session::EditorSession;
use crate::storage::{BrowserStorage, WorkflowRepository};

/// Edits the workflow `id`. Unknown ids open an unsaved draft.
#[component]
pub fn EditorView(id: WorkflowId) -> impl IntoView {
	let config = use_context::<EditorConfig>().unwrap_or_default();
	let repository = WorkflowRepository::new(BrowserStorage::local(), config.storage_key);
	let session: SharedSession = Rc::new(RefCell::new(EditorSession::open(repository, id)));
	let (title, detached) = {
		let s = session.borrow();
		(s.title().to_string(), s.is_detached())
	};
	let (saved, set_saved) = signal(None::<DateTime<Utc>>);

	let session_save = session.clone();
	let on_save = move |_: web_sys::MouseEvent| {
		let now = Utc::now();
		let mut s = session_save.borrow_mut();
		s.mark_dirty();
		match s.flush(now) {
			Ok(true) => set_saved.set(Some(now)),
			Ok(false) => {}
			Err(e) => warn!("workflow-canvas: failed to save workflow: {}", e),
		}
	};

	let status = move || {
		if detached {
			return "Unsaved draft".to_string();
		}
		match saved.get() {
			Some(at) => format!("Saved at {}", at.with_timezone(&Local).format("%H:%M")),
			None => String::new(),
		}
	};

	view! {
		<div class="editor">
			<header class="editor__header">
				<button class="editor__back" on:click=move |_| Route::Catalog.navigate()>
					"← Back"
				</button>
				<h1 class="editor__title">{title}</h1>
				<span class="editor__status">{status}</span>
				<button class="editor__save" disabled=detached on:click=on_save>
					"Save"
				</button>
			</header>
			<div class="editor__body">
				<PaletteSidebar />
				<div class="editor__canvas">
					<WorkflowCanvas session=session saved=set_saved />
				</div>
			</div>
		</div>
	}
}
