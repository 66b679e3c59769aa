//! Leptos component wrapping the workflow editor canvas.
//!
//! The component creates an HTML canvas element and wires pointer, wheel and
//! drag-and-drop handlers into a [`CanvasController`]. A
//! `requestAnimationFrame` loop repaints every frame so animated edges flow;
//! it stops once the component is cleaned up.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::controller::{CanvasController, Interaction};
use super::render::{self, Frame};
use super::state::{Gesture, Hit};
use super::theme::Theme;
use crate::config::EditorConfig;
use crate::palette::DRAG_MIME;
use crate::session::EditorSession;
use crate::storage::BrowserStorage;

/// Editor session shared between the canvas and the surrounding view.
pub type SharedSession = Rc<RefCell<EditorSession<BrowserStorage>>>;

/// Bundles the controller with per-canvas visual state.
struct CanvasContext {
	controller: CanvasController,
	theme: Theme,
	width: f64,
	height: f64,
	flow_time: f64,
}

type Shared = Rc<RefCell<CanvasContext>>;

fn local_point(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	client_x: i32,
	client_y: i32,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((client_x as f64 - rect.left(), client_y as f64 - rect.top()))
}

fn cursor_for(controller: &CanvasController) -> &'static str {
	match (controller.gesture(), controller.hovered()) {
		(Gesture::Pan { .. }, _) => "grabbing",
		(Gesture::MoveNode { .. }, _) => "move",
		(Gesture::Connect { .. }, _) => "crosshair",
		(_, Some(Hit::DeleteNode(_) | Hit::DeleteEdge(_))) => "pointer",
		(_, Some(Hit::OutputPort(_) | Hit::InputPort(_))) => "crosshair",
		(_, Some(Hit::NodeBody(_))) => "move",
		_ => "grab",
	}
}

/// Persist the session if it has pending changes.
fn flush(session: &SharedSession, saved: Option<WriteSignal<Option<DateTime<Utc>>>>) {
	let now = Utc::now();
	match session.borrow_mut().flush(now) {
		Ok(true) => {
			if let Some(saved) = saved {
				saved.set(Some(now));
			}
		}
		Ok(false) => {}
		Err(e) => warn!("workflow-canvas: failed to save workflow: {}", e),
	}
}

/// Renders the graph of `session` and edits it in place.
///
/// Committed edits mark the session dirty and flush it in a follow-up
/// microtask, after the triggering event handler has returned. `saved`, if
/// given, receives the time of each successful write.
#[component]
pub fn WorkflowCanvas(
	session: SharedSession,
	#[prop(optional)] saved: Option<WriteSignal<Option<DateTime<Utc>>>>,
) -> impl IntoView {
	let config = use_context::<EditorConfig>().unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared = Rc::new(RefCell::new(CanvasContext {
		controller: CanvasController::new(&config),
		theme: Theme::default(),
		width: 0.0,
		height: 0.0,
		flow_time: 0.0,
	}));
	let cursor = RwSignal::new("grab");
	let alive = Arc::new(AtomicBool::new(true));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	let (context_init, session_init, animate_init) = (context.clone(), session.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("workflow-canvas: 2d canvas context unavailable");
				return;
			}
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let start = js_sys::Date::now();
		let (context_anim, session_anim, animate_inner, alive_anim) = (
			context_init.clone(),
			session_init.clone(),
			animate_init.clone(),
			alive.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				debug!("workflow-canvas: render loop stopped");
				return;
			}
			{
				let mut c = context_anim.borrow_mut();
				// Track the parent's size so the canvas fills its container.
				if let Some(parent) = canvas.parent_element() {
					let (w, h) = (parent.client_width() as f64, parent.client_height() as f64);
					if w != c.width || h != c.height {
						canvas.set_width(w as u32);
						canvas.set_height(h as u32);
						c.width = w;
						c.height = h;
					}
				}
				c.flow_time = (js_sys::Date::now() - start) / 1000.0;

				let session = session_anim.borrow();
				render::render(
					&Frame {
						graph: session.graph(),
						controller: &c.controller,
						theme: &c.theme,
						width: c.width,
						height: c.height,
						flow_time: c.flow_time,
					},
					&ctx,
				);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Runs the outcome's side effects: a commit schedules a save.
	let settle = {
		let session = session.clone();
		let context = context.clone();
		move |outcome: Interaction| {
			cursor.set(cursor_for(&context.borrow().controller));
			if let Interaction::Committed(mutation) = outcome {
				debug!("workflow-canvas: committed {:?}", mutation);
				session.borrow_mut().mark_dirty();
				let session = session.clone();
				queue_microtask(move || flush(&session, saved));
			}
		}
	};

	let (context_md, session_md, settle_md) = (context.clone(), session.clone(), settle.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		let outcome = context_md
			.borrow_mut()
			.controller
			.pointer_down(session_md.borrow().graph(), x, y);
		settle_md(outcome);
	};

	let (context_mm, session_mm, settle_mm) = (context.clone(), session.clone(), settle.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		let outcome = context_mm
			.borrow_mut()
			.controller
			.pointer_move(session_mm.borrow_mut().graph_mut(), x, y);
		settle_mm(outcome);
	};

	let (context_mu, session_mu, settle_mu) = (context.clone(), session.clone(), settle.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		let outcome = context_mu
			.borrow_mut()
			.controller
			.pointer_up(session_mu.borrow_mut().graph_mut(), x, y);
		settle_mu(outcome);
	};

	let (context_ml, session_ml, settle_ml) = (context.clone(), session.clone(), settle.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let outcome = context_ml
			.borrow_mut()
			.controller
			.pointer_leave(session_ml.borrow().graph());
		settle_ml(outcome);
	};

	let (context_wh, settle_wh) = (context.clone(), settle.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		let outcome = context_wh.borrow_mut().controller.wheel(x, y, ev.delta_y());
		settle_wh(outcome);
	};

	let on_dragover = move |ev: DragEvent| {
		ev.prevent_default();
		if let Some(dt) = ev.data_transfer() {
			dt.set_drop_effect("move");
		}
	};

	let (context_dr, session_dr, settle_dr) = (context.clone(), session.clone(), settle.clone());
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		let raw = ev.data_transfer().and_then(|dt| dt.get_data(DRAG_MIME).ok());
		let outcome = context_dr.borrow_mut().controller.drop_payload(
			session_dr.borrow_mut().graph_mut(),
			raw.as_deref(),
			x,
			y,
		);
		settle_dr(outcome);
	};

	let (context_zi, settle_zi) = (context.clone(), settle.clone());
	let zoom_in = move |_: MouseEvent| {
		let mut c = context_zi.borrow_mut();
		let (w, h) = (c.width, c.height);
		let outcome = c.controller.zoom_in(w, h);
		drop(c);
		settle_zi(outcome);
	};

	let (context_zo, settle_zo) = (context.clone(), settle.clone());
	let zoom_out = move |_: MouseEvent| {
		let mut c = context_zo.borrow_mut();
		let (w, h) = (c.width, c.height);
		let outcome = c.controller.zoom_out(w, h);
		drop(c);
		settle_zo(outcome);
	};

	let (context_fv, session_fv) = (context.clone(), session.clone());
	let fit_view = move |_: MouseEvent| {
		let mut c = context_fv.borrow_mut();
		let (w, h) = (c.width, c.height);
		let outcome = c.controller.fit_view(session_fv.borrow().graph(), w, h);
		drop(c);
		settle(outcome);
	};

	view! {
		<div class="workflow-canvas">
			<canvas
				node_ref=canvas_ref
				class="workflow-canvas__surface"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dragover=on_dragover
				on:drop=on_drop
				style=move || format!("display: block; cursor: {};", cursor.get())
			/>
			<div class="workflow-canvas__controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Fit view" on:click=fit_view>"⤢"</button>
			</div>
		</div>
	}
}
