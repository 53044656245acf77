//! Seeder registry.
//!
//! Maps seeder names to constructors so that seeders can be referenced by name
//! from management commands and nested calls. Discovering seeder modules is up
//! to the application; it only has to register what it finds.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{Seeder, SeederRef};
use crate::error::{SeedingError, SeedingResult};

/// Builds a fresh seeder instance.
pub type SeederConstructor = Arc<dyn Fn() -> Box<dyn Seeder> + Send + Sync>;

/// Resolves seeder references to constructors.
pub trait SeederResolver: Send + Sync {
	/// Resolves `reference`.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnitResolutionError`] if nothing matches.
	fn resolve(&self, reference: &SeederRef) -> SeedingResult<SeederConstructor>;
}

/// Name-to-constructor registry.
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```ignore
/// let registry = SeederRegistry::new();
/// registry.register::<DatabaseSeeder>("DatabaseSeeder");
///
/// assert!(registry.has("DatabaseSeeder"));
/// let construct = registry.resolve(&SeederRef::named("DatabaseSeeder"))?;
/// let seeder = construct();
/// ```
#[derive(Clone, Default)]
pub struct SeederRegistry {
	constructors: Arc<RwLock<HashMap<String, SeederConstructor>>>,
}

impl SeederRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers seeder type `S` under `name`, replacing any previous entry.
	pub fn register<S: Seeder + Default + 'static>(&self, name: impl Into<String>) {
		self.register_with(name, || -> Box<dyn Seeder> { Box::new(S::default()) });
	}

	/// Registers a constructor under `name`, replacing any previous entry.
	pub fn register_with<F>(&self, name: impl Into<String>, construct: F)
	where
		F: Fn() -> Box<dyn Seeder> + Send + Sync + 'static,
	{
		self.constructors
			.write()
			.insert(name.into(), Arc::new(construct));
	}

	/// Removes the entry for `name`, returning true if there was one.
	pub fn unregister(&self, name: &str) -> bool {
		self.constructors.write().remove(name).is_some()
	}

	/// Checks if a seeder is registered under `name`.
	pub fn has(&self, name: &str) -> bool {
		self.constructors.read().contains_key(name)
	}

	/// Returns all registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.constructors.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Returns the number of registered seeders.
	pub fn len(&self) -> usize {
		self.constructors.read().len()
	}

	/// Returns true if no seeders are registered.
	pub fn is_empty(&self) -> bool {
		self.constructors.read().is_empty()
	}

	/// Clears all registered seeders.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		self.constructors.write().clear();
	}
}

impl SeederResolver for SeederRegistry {
	fn resolve(&self, reference: &SeederRef) -> SeedingResult<SeederConstructor> {
		match reference {
			SeederRef::Constructor { construct, .. } => Ok(Arc::clone(construct)),
			SeederRef::Name(name) => self
				.constructors
				.read()
				.get(name)
				.cloned()
				.ok_or_else(|| SeedingError::UnitResolutionError(name.clone())),
		}
	}
}

/// Process-wide seeder registry.
static SEEDER_REGISTRY: Lazy<SeederRegistry> = Lazy::new(SeederRegistry::new);

/// Returns a handle to the process-wide registry.
pub fn global_registry() -> SeederRegistry {
	SEEDER_REGISTRY.clone()
}

/// Registers seeder type `S` under `name` in the process-wide registry.
///
/// # Example
///
/// ```ignore
/// register_seeder::<DatabaseSeeder>("DatabaseSeeder");
/// run_seed("DatabaseSeeder", em).await?;
/// ```
pub fn register_seeder<S: Seeder + Default + 'static>(name: impl Into<String>) {
	SEEDER_REGISTRY.register::<S>(name);
}
