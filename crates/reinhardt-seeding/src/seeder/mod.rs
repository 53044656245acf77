//! Seeders.
//!
//! A [`Seeder`] is a runnable seeding step. Seeders compose: inside `run`, a
//! seeder may [`call`] others, which run in order against the same persistence
//! context and the same [`SharedContext`]. Only the top-level run driven by
//! [`SeedManager`] flushes and clears the persistence context afterwards.

mod manager;
mod registry;

pub use manager::{SeedManager, SeedReport, SeedState, call, run_seed};
pub use registry::{
	SeederConstructor, SeederRegistry, SeederResolver, global_registry, register_seeder,
};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::SharedContext;
use crate::error::SeedingResult;
use crate::persistence::PersistenceHandle;

/// A runnable, composable seeding step.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct DatabaseSeeder;
///
/// #[async_trait]
/// impl Seeder for DatabaseSeeder {
///     async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
///         let admin = UserFactory.bind(em.clone()).create_one(None).await?;
///         context.insert("admin", admin);
///         self.call(em, context, &[SeederRef::of::<PostSeeder>()]).await
///     }
/// }
/// ```
#[async_trait]
pub trait Seeder: Send + Sync {
	/// Name used in logs and reports.
	fn name(&self) -> &str {
		short_type_name::<Self>()
	}

	/// Populates data through `em`, reading and writing `context`.
	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()>;

	/// Runs `seeders` in order with the same persistence context and shared
	/// context. Does not flush or clear.
	async fn call(
		&self,
		em: &PersistenceHandle,
		context: &mut SharedContext,
		seeders: &[SeederRef],
	) -> SeedingResult<()> {
		call(em, context, seeders).await
	}
}

/// Reference to a seeder, resolvable to a constructor.
#[derive(Clone)]
pub enum SeederRef {
	/// A name looked up in a registry.
	Name(String),
	/// A constructor that needs no lookup.
	Constructor {
		/// Seeder name.
		name: String,
		/// Builds a fresh seeder instance.
		construct: SeederConstructor,
	},
}

impl SeederRef {
	/// References a seeder by registered name.
	pub fn named(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}

	/// References seeder type `S` directly.
	pub fn of<S: Seeder + Default + 'static>() -> Self {
		Self::Constructor {
			name: short_type_name::<S>().to_string(),
			construct: Arc::new(|| -> Box<dyn Seeder> { Box::new(S::default()) }),
		}
	}

	/// References a seeder built by `construct`.
	pub fn from_fn<F>(name: impl Into<String>, construct: F) -> Self
	where
		F: Fn() -> Box<dyn Seeder> + Send + Sync + 'static,
	{
		Self::Constructor {
			name: name.into(),
			construct: Arc::new(construct),
		}
	}

	/// Name of the referenced seeder.
	pub fn name(&self) -> &str {
		match self {
			Self::Name(name) | Self::Constructor { name, .. } => name,
		}
	}
}

impl From<&str> for SeederRef {
	fn from(name: &str) -> Self {
		Self::named(name)
	}
}

impl From<String> for SeederRef {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl fmt::Debug for SeederRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
			Self::Constructor { name, .. } => f
				.debug_struct("Constructor")
				.field("name", name)
				.finish_non_exhaustive(),
		}
	}
}

/// Last path segment of a type name, e.g. `DatabaseSeeder`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
	let full = std::any::type_name::<T>();
	let base = full.split('<').next().unwrap_or(full);
	base.rsplit("::").next().unwrap_or(base)
}
