//! Named sequences for unique attribute values.
//!
//! Counters are process-wide and keyed by name, so two factories using the
//! same sequence name share one counter. Counters start at 1.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::attributes::{AttributeValue, LazyValue};

static SEQUENCES: Lazy<RwLock<HashMap<String, Arc<AtomicU64>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

fn counter(name: &str) -> Arc<AtomicU64> {
	if let Some(counter) = SEQUENCES.read().get(name) {
		return Arc::clone(counter);
	}
	Arc::clone(
		SEQUENCES
			.write()
			.entry(name.to_string())
			.or_insert_with(|| Arc::new(AtomicU64::new(0))),
	)
}

/// A named, auto-incrementing counter.
///
/// # Example
///
/// ```
/// use reinhardt_seeding::factory::Sequence;
///
/// let seq = Sequence::new("docs.sequence.user", "user_{n}");
/// assert_eq!(seq.next_value(), "user_1");
/// assert_eq!(seq.next_value(), "user_2");
/// ```
#[derive(Debug, Clone)]
pub struct Sequence {
	name: String,
	format: String,
	counter: Arc<AtomicU64>,
}

impl Sequence {
	/// Creates a handle on the counter `name`, formatting values with `format`.
	///
	/// `{n}` in `format` is replaced by the counter value.
	pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
		let name = name.into();
		let counter = counter(&name);
		Self {
			name,
			format: format.into(),
			counter,
		}
	}

	/// Sequence name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Advances the counter and returns its new value.
	pub fn next_number(&self) -> u64 {
		self.counter.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Advances the counter and returns the formatted value.
	pub fn next_value(&self) -> String {
		self.format.replace("{n}", &self.next_number().to_string())
	}

	/// Current counter value without advancing.
	pub fn current(&self) -> u64 {
		self.counter.load(Ordering::SeqCst)
	}

	/// Returns an attribute value that advances the sequence on every resolution.
	pub fn lazy(&self) -> AttributeValue {
		let sequence = self.clone();
		AttributeValue::Lazy(LazyValue::from_fn(move |_| {
			Ok(sequence.next_value().into())
		}))
	}
}

/// Advances the sequence `name` and returns `format` with `{n}` replaced.
pub fn sequence(name: &str, format: &str) -> String {
	Sequence::new(name, format).next_value()
}

/// Resets the sequence `name` so its next value is 1.
pub fn reset_sequence(name: &str) {
	if let Some(counter) = SEQUENCES.read().get(name) {
		counter.store(0, Ordering::SeqCst);
	}
}

/// Resets every sequence.
///
/// This is primarily useful for testing.
pub fn reset_sequences() {
	for counter in SEQUENCES.read().values() {
		counter.store(0, Ordering::SeqCst);
	}
}
