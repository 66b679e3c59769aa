//! Overview page: searchable, sortable list of workflows with create and
//! delete.

use chrono::Utc;
use leptos::prelude::*;
use web_sys::{MouseEvent, SubmitEvent};

use crate::catalog::{RelabelSchedule, SortOrder, WorkflowCatalog, WorkflowId, WorkflowRecord};
use crate::config::EditorConfig;
use crate::route::Route;
use crate::storage::{BrowserStorage, WorkflowRepository};

type CatalogSignal = RwSignal<WorkflowCatalog<BrowserStorage>, LocalStorage>;

/// Text shown when nothing matches `query`.
pub fn empty_message(query: &str) -> String {
	if query.trim().is_empty() {
		"No workflows yet. Create one to get started.".to_string()
	} else {
		format!("No workflows found matching “{}”", query)
	}
}

fn workflow_card(catalog: CatalogSignal, record: &WorkflowRecord) -> impl IntoView {
	let id: WorkflowId = record.id;
	let pending = move || catalog.with(|c| c.pending_delete() == Some(id));

	let on_more = move |ev: MouseEvent| {
		ev.stop_propagation();
		catalog.update(|c| c.request_delete(id));
	};
	let on_delete = move |ev: MouseEvent| {
		ev.stop_propagation();
		catalog.update(|c| {
			c.confirm_delete(id);
		});
	};

	view! {
		<li class="workflow-card" on:click=move |_| Route::Editor(id).navigate()>
			<div class="workflow-card__head">
				<h3 class="workflow-card__name">{record.project_name.clone()}</h3>
				<button
					class="workflow-card__more"
					title="More"
					on:mousedown=|ev: MouseEvent| ev.stop_propagation()
					on:click=on_more
				>
					"⋮"
				</button>
				<Show when=pending>
					<div class="workflow-card__menu" on:mousedown=|ev: MouseEvent| ev.stop_propagation()>
						<button class="workflow-card__delete" on:click=on_delete>
							"Delete"
						</button>
					</div>
				</Show>
			</div>
			<p class="workflow-card__description">{record.description.clone()}</p>
			<div class="workflow-card__meta">
				<span>"Created " {record.display_created_at.clone()}</span>
				<span>"Updated " {record.last_updated.clone()}</span>
			</div>
		</li>
	}
}

#[component]
fn CreateWorkflowForm(catalog: CatalogSignal, open: RwSignal<bool>) -> impl IntoView {
	let name = RwSignal::new(String::new());
	let description = RwSignal::new(String::new());

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let (n, d) = (name.get_untracked(), description.get_untracked());
		let (n, d) = (n.trim(), d.trim());
		if n.is_empty() || d.is_empty() {
			return;
		}
		let created = catalog.try_update(|c| c.create(n, d, Utc::now()).id);
		open.set(false);
		if let Some(id) = created {
			Route::Editor(id).navigate();
		}
	};

	view! {
		<div class="modal-overlay" on:click=move |_| open.set(false)>
			<form
				class="modal"
				on:click=|ev: MouseEvent| ev.stop_propagation()
				on:submit=on_submit
			>
				<h2>"New workflow"</h2>
				<label>
					"Project name"
					<input
						type="text"
						required=true
						prop:value=move || name.get()
						on:input=move |ev| name.set(event_target_value(&ev))
					/>
				</label>
				<label>
					"Description"
					<textarea
						required=true
						prop:value=move || description.get()
						on:input=move |ev| description.set(event_target_value(&ev))
					></textarea>
				</label>
				<div class="modal__actions">
					<button type="button" on:click=move |_| open.set(false)>
						"Cancel"
					</button>
					<button type="submit">"Create"</button>
				</div>
			</form>
		</div>
	}
}

/// Lists stored workflows and keeps their relative ages fresh.
#[component]
pub fn CatalogView() -> impl IntoView {
	let config = use_context::<EditorConfig>().unwrap_or_default();
	let repository = WorkflowRepository::new(BrowserStorage::local(), config.storage_key.clone());
	let catalog: CatalogSignal = RwSignal::new_local(WorkflowCatalog::load(repository));
	let query = RwSignal::new(String::new());
	let creating = RwSignal::new(false);

	catalog.update(|c| c.relabel_ages(Utc::now()));
	let mut schedule = RelabelSchedule::start(config.relabel_interval(), move || {
		catalog.update(|c| c.relabel_ages(Utc::now()));
	});
	on_cleanup(move || schedule.cancel());

	let sort_button = move |order: SortOrder, label: &'static str| {
		view! {
			<button
				class="catalog__sort"
				class:active=move || catalog.with(|c| c.sort_order() == order)
				on:click=move |_| catalog.update(|c| c.sort(order))
			>
				{label}
			</button>
		}
	};

	let cards = move || {
		let q = query.get();
		catalog.with(|c| {
			let matches = c.search(&q);
			if matches.is_empty() {
				view! { <p class="catalog__empty">{empty_message(&q)}</p> }.into_any()
			} else {
				view! {
					<ul class="catalog__list">
						{matches
							.into_iter()
							.map(|record| workflow_card(catalog, record))
							.collect_view()}
					</ul>
				}
				.into_any()
			}
		})
	};

	let on_outside = move |_: MouseEvent| {
		if catalog.with_untracked(|c| c.pending_delete().is_some()) {
			catalog.update(|c| c.cancel_delete());
		}
	};

	view! {
		<div class="catalog" on:mousedown=on_outside>
			<header class="catalog__header">
				<h1>"Workflows"</h1>
				<button class="catalog__create" on:click=move |_| creating.set(true)>
					"+ New workflow"
				</button>
			</header>
			<div class="catalog__toolbar">
				<input
					type="search"
					class="catalog__search"
					placeholder="Search workflows"
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
				{sort_button(SortOrder::Newest, "Newest")}
				{sort_button(SortOrder::Oldest, "Oldest")}
			</div>
			{cards}
			<Show when=move || creating.get()>
				<CreateWorkflowForm catalog=catalog open=creating />
			</Show>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_message_quotes_the_query() {
		assert_eq!(empty_message("etl"), "No workflows found matching “etl”");
		assert!(empty_message("  ").starts_with("No workflows yet"));
	}
}
