//! Shared seeding context.
//!
//! A [`SharedContext`] is created once per top-level seeding run and handed by
//! mutable reference to every seeder reached through nested calls, so later
//! seeders can pick up entities created by earlier ones. Writes replace
//! earlier values under the same key.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{SeedingError, SeedingResult};
use crate::seeder::{SeederRegistry, SeederResolver};

/// Mutable key/value store scoped to one top-level seeding run.
///
/// The context also carries the resolver of the run, which nested
/// [`call`](crate::seeder::call)s use to turn references into seeders.
///
/// # Example
///
/// ```
/// use reinhardt_seeding::SharedContext;
///
/// let mut context = SharedContext::default();
/// context.insert("admin_id", 7_u64);
///
/// assert_eq!(context.get::<u64>("admin_id"), Some(&7));
/// assert_eq!(context.get::<String>("admin_id"), None);
/// ```
pub struct SharedContext {
	values: HashMap<String, Box<dyn Any + Send + Sync>>,
	resolver: Arc<dyn SeederResolver>,
}

impl SharedContext {
	/// Creates an empty context resolving nested calls through `resolver`.
	pub fn new(resolver: Arc<dyn SeederResolver>) -> Self {
		Self {
			values: HashMap::new(),
			resolver,
		}
	}

	/// Stores `value` under `key`, returning true if a value was replaced.
	pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> bool {
		self.values.insert(key.into(), Box::new(value)).is_some()
	}

	/// Returns the value under `key` if it has type `T`.
	pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
		self.values.get(key).and_then(|v| v.downcast_ref::<T>())
	}

	/// Returns the value under `key` mutably if it has type `T`.
	pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
		self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
	}

	/// Returns the value under `key`, failing when it is missing or of another type.
	pub fn require<T: Any>(&self, key: &str) -> SeedingResult<&T> {
		let value = self
			.values
			.get(key)
			.ok_or_else(|| SeedingError::ValidationError {
				field: key.to_string(),
				message: "missing from the seeding context".to_string(),
			})?;
		value
			.downcast_ref::<T>()
			.ok_or_else(|| SeedingError::ValidationError {
				field: key.to_string(),
				message: format!("expected a value of type {}", std::any::type_name::<T>()),
			})
	}

	/// Removes and returns the value under `key` if it has type `T`.
	///
	/// A value of another type is left in place.
	pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
		if !self.values.get(key).is_some_and(|v| v.is::<T>()) {
			return None;
		}
		self.values
			.remove(key)
			.and_then(|v| v.downcast::<T>().ok())
			.map(|v| *v)
	}

	/// Returns true if a value is stored under `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Iterates over the stored keys.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	/// Number of stored values.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Resolver used for nested calls.
	pub fn resolver(&self) -> &Arc<dyn SeederResolver> {
		&self.resolver
	}
}

impl Default for SharedContext {
	fn default() -> Self {
		Self::new(Arc::new(SeederRegistry::new()))
	}
}

impl fmt::Debug for SharedContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<_> = self.keys().collect();
		keys.sort_unstable();
		f.debug_struct("SharedContext")
			.field("keys", &keys)
			.finish_non_exhaustive()
	}
}
