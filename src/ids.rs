//! Monotonic, time-derived id allocation.

use chrono::Utc;

/// Hands out strictly increasing values derived from the wall clock in
/// milliseconds. If the clock has not advanced (or went backwards) since the
/// last allocation, the previous value plus one is used instead.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
	last: i64,
}

impl IdAllocator {
	/// Make sure every value handed out from now on is greater than `value`.
	pub fn observe(&mut self, value: i64) {
		self.last = self.last.max(value);
	}

	/// Observe the numeric suffix of a prefixed id such as `node_1712345678901`.
	/// Ids without a numeric suffix are ignored.
	pub fn observe_id(&mut self, id: &str) {
		let suffix = id.rsplit('_').next().unwrap_or(id);
		if let Ok(value) = suffix.parse::<i64>() {
			self.observe(value);
		}
	}

	/// Allocate the next value given the current time in milliseconds.
	pub fn next_at(&mut self, now_ms: i64) -> i64 {
		let value = now_ms.max(self.last.saturating_add(1));
		self.last = value;
		value
	}

	/// Allocate the next value using the system clock.
	pub fn next(&mut self) -> i64 {
		self.next_at(Utc::now().timestamp_millis())
	}

	/// Allocate a prefixed string id, e.g. `node_1712345678901`.
	pub fn next_id(&mut self, prefix: &str) -> String {
		format!("{prefix}_{}", self.next())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn values_strictly_increase_when_clock_stalls() {
		let mut ids = IdAllocator::default();
		assert_eq!(ids.next_at(1_000), 1_000);
		assert_eq!(ids.next_at(1_000), 1_001);
		assert_eq!(ids.next_at(999), 1_002);
		assert_eq!(ids.next_at(5_000), 5_000);
	}

	#[test]
	fn observed_ids_are_never_reissued() {
		let mut ids = IdAllocator::default();
		ids.observe_id("node_2000");
		ids.observe_id("edge_3000");
		ids.observe_id("custom-label");
		assert_eq!(ids.next_at(10), 3_001);
	}

	#[test]
	fn observing_the_largest_value_does_not_overflow() {
		let mut ids = IdAllocator::default();
		ids.observe_id("node_9223372036854775807");
		assert_eq!(ids.next_at(1_000), i64::MAX);
		assert_eq!(ids.next_at(1_000), i64::MAX);
	}

	#[test]
	fn prefixed_ids_are_unique() {
		let mut ids = IdAllocator::default();
		let a = ids.next_id("node");
		let b = ids.next_id("node");
		assert_ne!(a, b);
		assert!(a.starts_with("node_"));
	}
}
