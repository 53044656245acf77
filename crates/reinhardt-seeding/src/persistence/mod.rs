//! Persistence context abstraction.
//!
//! Factories and seeders talk to the database only through
//! [`PersistenceContext`]: instantiate a record (optionally registering it for
//! insertion), flush registered records, and clear the identity map. Query and
//! transaction machinery stays with the implementation.

mod memory;

pub use memory::{InMemoryPersistence, PersistenceEvent, TrackedRecord};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SeedingResult;

/// Unit-of-work interface consumed by factories and seeders.
///
/// Implementations use interior mutability; a single context is shared by every
/// factory and seeder of one seeding run. Failures are reported as
/// [`SeedingError::PersistenceError`](crate::SeedingError::PersistenceError) and
/// are passed through by this crate unchanged.
#[async_trait]
pub trait PersistenceContext: Send + Sync {
	/// Instantiates a record of `model` from resolved attributes.
	///
	/// When `persist` is true the record is registered for insertion on the next
	/// flush. The returned record is what the model is built from, so an
	/// implementation may fill in values of its own (keys, defaults).
	async fn create_record(
		&self,
		model: &str,
		attributes: Map<String, Value>,
		persist: bool,
	) -> SeedingResult<Value>;

	/// Commits every registered record.
	async fn flush(&self) -> SeedingResult<()>;

	/// Detaches every tracked record from the identity map.
	async fn clear(&self) -> SeedingResult<()>;
}

/// Shared handle to a persistence context.
pub type PersistenceHandle = Arc<dyn PersistenceContext>;
