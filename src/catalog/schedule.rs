//! Periodic relabelling of workflow ages.

use std::time::Duration;

use leptos::prelude::{IntervalHandle, set_interval_with_handle};
use log::warn;

/// Owns the browser interval that refreshes relative ages. The interval is
/// cleared by [`RelabelSchedule::cancel`], which the catalog view calls on
/// cleanup.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelabelSchedule {
	handle: Option<IntervalHandle>,
}

impl RelabelSchedule {
	/// Run `tick` every `period`. If the browser refuses to create the
	/// interval, ages are simply not refreshed.
	pub fn start(period: Duration, tick: impl Fn() + 'static) -> Self {
		match set_interval_with_handle(tick, period) {
			Ok(handle) => Self {
				handle: Some(handle),
			},
			Err(e) => {
				warn!("workflow-canvas: could not schedule age relabelling: {:?}", e);
				Self::default()
			}
		}
	}

	/// Stop the interval. Safe to call more than once.
	pub fn cancel(&mut self) {
		if let Some(handle) = self.handle.take() {
			handle.clear();
		}
	}
}
