//! In-memory persistence context.
//!
//! Keeps an identity map of tracked records, the records pending the next
//! flush, and committed storage per model. Every lifecycle step is appended to
//! an event log, which makes the context useful for dry runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::PersistenceContext;
use crate::error::{SeedingError, SeedingResult};

/// A record registered with the context.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRecord {
	/// Model identifier.
	pub model: String,
	/// Record as registered.
	pub record: Value,
}

/// Lifecycle events, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceEvent {
	/// A record of the model was registered.
	Registered(String),
	/// Pending records were committed.
	Flushed {
		/// Number of records committed.
		records: usize,
	},
	/// The identity map was cleared.
	Cleared,
}

#[derive(Debug, Default)]
struct State {
	tracked: Vec<TrackedRecord>,
	pending: Vec<TrackedRecord>,
	committed: HashMap<String, Vec<Value>>,
	next_ids: HashMap<String, u64>,
	events: Vec<PersistenceEvent>,
	fail_create: Option<String>,
	fail_flush: Option<String>,
}

/// Persistence context storing records in memory.
///
/// Registered records with a `null` `id` attribute get the next id of their
/// model assigned.
///
/// # Example
///
/// ```
/// use reinhardt_seeding::persistence::{InMemoryPersistence, PersistenceContext};
/// use serde_json::{json, Map};
///
/// # tokio_test::block_on(async {
/// let memory = InMemoryPersistence::new();
/// let mut attributes = Map::new();
/// attributes.insert("name".to_string(), json!("Ada"));
///
/// memory.create_record("auth.User", attributes, true).await.unwrap();
/// assert_eq!(memory.tracked_count(), 1);
///
/// memory.flush().await.unwrap();
/// assert_eq!(memory.committed_count("auth.User"), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
	state: Mutex<State>,
}

impl InMemoryPersistence {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records tracked since the last clear.
	pub fn tracked(&self) -> Vec<TrackedRecord> {
		self.state.lock().tracked.clone()
	}

	/// Number of records tracked since the last clear.
	pub fn tracked_count(&self) -> usize {
		self.state.lock().tracked.len()
	}

	/// Number of records registered since the last flush.
	pub fn pending_count(&self) -> usize {
		self.state.lock().pending.len()
	}

	/// Committed records of `model`.
	pub fn committed(&self, model: &str) -> Vec<Value> {
		self.state
			.lock()
			.committed
			.get(model)
			.cloned()
			.unwrap_or_default()
	}

	/// Number of committed records of `model`.
	pub fn committed_count(&self, model: &str) -> usize {
		self.state.lock().committed.get(model).map_or(0, Vec::len)
	}

	/// Lifecycle events so far.
	pub fn events(&self) -> Vec<PersistenceEvent> {
		self.state.lock().events.clone()
	}

	/// Number of flushes so far.
	pub fn flush_count(&self) -> usize {
		self.count_events(|e| matches!(e, PersistenceEvent::Flushed { .. }))
	}

	/// Number of clears so far.
	pub fn clear_count(&self) -> usize {
		self.count_events(|e| matches!(e, PersistenceEvent::Cleared))
	}

	/// Makes every following `create_record` fail with `message`.
	pub fn fail_create(&self, message: impl Into<String>) {
		self.state.lock().fail_create = Some(message.into());
	}

	/// Makes every following `flush` fail with `message`.
	pub fn fail_flush(&self, message: impl Into<String>) {
		self.state.lock().fail_flush = Some(message.into());
	}

	/// Removes injected failures.
	pub fn reset_failures(&self) {
		let mut state = self.state.lock();
		state.fail_create = None;
		state.fail_flush = None;
	}

	fn count_events(&self, predicate: impl Fn(&PersistenceEvent) -> bool) -> usize {
		self.state
			.lock()
			.events
			.iter()
			.filter(|e| predicate(e))
			.count()
	}
}

#[async_trait]
impl PersistenceContext for InMemoryPersistence {
	async fn create_record(
		&self,
		model: &str,
		mut attributes: Map<String, Value>,
		persist: bool,
	) -> SeedingResult<Value> {
		let mut state = self.state.lock();
		if let Some(message) = &state.fail_create {
			return Err(SeedingError::PersistenceError(message.clone()));
		}
		if !persist {
			return Ok(Value::Object(attributes));
		}

		if attributes.get("id") == Some(&Value::Null) {
			let next = state.next_ids.entry(model.to_string()).or_insert(0);
			*next += 1;
			attributes.insert("id".to_string(), Value::from(*next));
		}

		let tracked = TrackedRecord {
			model: model.to_string(),
			record: Value::Object(attributes),
		};
		state.tracked.push(tracked.clone());
		state.pending.push(tracked.clone());
		state
			.events
			.push(PersistenceEvent::Registered(model.to_string()));
		Ok(tracked.record)
	}

	async fn flush(&self) -> SeedingResult<()> {
		let mut state = self.state.lock();
		if let Some(message) = &state.fail_flush {
			return Err(SeedingError::PersistenceError(message.clone()));
		}

		let pending = std::mem::take(&mut state.pending);
		let records = pending.len();
		for TrackedRecord { model, record } in pending {
			state.committed.entry(model).or_default().push(record);
		}
		state.events.push(PersistenceEvent::Flushed { records });
		Ok(())
	}

	async fn clear(&self) -> SeedingResult<()> {
		let mut state = self.state.lock();
		state.tracked.clear();
		state.pending.clear();
		state.events.push(PersistenceEvent::Cleared);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn attrs(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => panic!("expected an object"),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_unpersisted_records_are_not_tracked() {
		let memory = InMemoryPersistence::new();

		let record = memory
			.create_record("auth.User", attrs(json!({"name": "Ada"})), false)
			.await
			.unwrap();

		assert_eq!(record, json!({"name": "Ada"}));
		assert_eq!(memory.tracked_count(), 0);
		assert!(memory.events().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_flush_commits_pending_and_clear_detaches() {
		let memory = InMemoryPersistence::new();
		memory
			.create_record("auth.User", attrs(json!({"id": null})), true)
			.await
			.unwrap();
		memory
			.create_record("auth.User", attrs(json!({"id": null})), true)
			.await
			.unwrap();

		memory.flush().await.unwrap();
		assert_eq!(memory.pending_count(), 0);
		assert_eq!(memory.tracked_count(), 2);
		assert_eq!(
			memory.committed("auth.User"),
			vec![json!({"id": 1}), json!({"id": 2})]
		);

		memory.clear().await.unwrap();
		assert_eq!(memory.tracked_count(), 0);
		assert_eq!(memory.committed_count("auth.User"), 2);
		assert_eq!(memory.flush_count(), 1);
		assert_eq!(memory.clear_count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_explicit_ids_are_kept() {
		let memory = InMemoryPersistence::new();
		let record = memory
			.create_record("auth.User", attrs(json!({"id": 42})), true)
			.await
			.unwrap();
		assert_eq!(record, json!({"id": 42}));
	}

	#[rstest]
	#[tokio::test]
	async fn test_injected_failures() {
		let memory = InMemoryPersistence::new();

		memory.fail_create("read only");
		let result = memory.create_record("auth.User", Map::new(), true).await;
		assert!(matches!(result, Err(SeedingError::PersistenceError(_))));
		assert_eq!(memory.tracked_count(), 0);

		memory.reset_failures();
		memory.fail_flush("disk full");
		memory
			.create_record("auth.User", Map::new(), true)
			.await
			.unwrap();
		let result = memory.flush().await;
		assert!(matches!(result, Err(SeedingError::PersistenceError(ref m)) if m == "disk full"));
		assert_eq!(memory.pending_count(), 1);
	}
}
