//! Sidebar listing the node types that can be dragged onto the canvas.

use leptos::prelude::*;
use log::warn;
use web_sys::DragEvent;

use crate::palette::{DRAG_MIME, PaletteEntry, PaletteSource};

fn palette_item(entry: &'static PaletteEntry) -> impl IntoView {
	let on_dragstart = move |ev: DragEvent| {
		let Some(dt) = ev.data_transfer() else {
			return;
		};
		if let Err(e) = dt.set_data(DRAG_MIME, entry.node_type) {
			warn!("workflow-canvas: could not start palette drag: {:?}", e);
		}
		dt.set_effect_allowed("move");
	};

	view! {
		<li class="palette__item" draggable="true" on:dragstart=on_dragstart>
			<span class="palette__icon" data-icon=entry.icon_ref></span>
			<span class="palette__label">{entry.node_type}</span>
		</li>
	}
}

/// Draggable palette entries in display order.
#[component]
pub fn PaletteSidebar() -> impl IntoView {
	view! {
		<aside class="palette">
			<h2 class="palette__title">"Nodes"</h2>
			<ul class="palette__list">
				{PaletteSource::list().iter().map(palette_item).collect_view()}
			</ul>
		</aside>
	}
}
