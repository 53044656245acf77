//! Relation building.
//!
//! Related entities are attached in one of two ways:
//!
//! - inline, while the definition runs: either by awaiting another factory
//!   directly (wrap the call in [`related`]) or by adding a related lazy value
//!   with [`Attributes::with_related`](super::Attributes::with_related);
//! - after instantiation, through `each` hooks that receive the mutable entity.
//!
//! Hooks run after inline construction, in registration order.
//!
//! While an entity is built by `create`, every entity another factory builds
//! in the meantime (inline or from a hook) is a related entity: it is registered
//! with its own persistence context right away, so the owner's single flush
//! commits it together with the owner.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::traits::Model;
use crate::error::{SeedingError, SeedingResult};

tokio::task_local! {
	/// Set while an entity being created is built.
	static CASCADE: ();
}

/// Builds an owner entity so that related entities built meanwhile are registered.
pub(crate) async fn cascade<T, Fut>(build: Fut) -> T
where
	Fut: Future<Output = T>,
{
	CASCADE.scope((), build).await
}

/// Returns true while an owner entity is being built by `create`.
pub(crate) fn cascading() -> bool {
	CASCADE.try_with(|_| ()).is_ok()
}

/// A post-build hook applied to every freshly built entity.
pub type EachHook<M> =
	Arc<dyn for<'a> Fn(&'a mut M) -> BoxFuture<'a, SeedingResult<()>> + Send + Sync>;

/// Wraps a closure as an [`EachHook`].
///
/// Passing the closure through this function lets the compiler infer the
/// higher-ranked signature, so `|entity| Box::pin(async move { .. })` works.
pub fn each_hook<M, H>(hook: H) -> EachHook<M>
where
	H: for<'a> Fn(&'a mut M) -> BoxFuture<'a, SeedingResult<()>> + Send + Sync + 'static,
{
	Arc::new(hook)
}

/// Ordered list of `each` hooks for one model.
pub struct RelationHooks<M> {
	hooks: Vec<EachHook<M>>,
}

impl<M: Model> RelationHooks<M> {
	/// Creates an empty hook list.
	pub fn new() -> Self {
		Self { hooks: Vec::new() }
	}

	/// Appends a hook.
	pub fn push(&mut self, hook: EachHook<M>) {
		self.hooks.push(hook);
	}

	/// Number of registered hooks.
	pub fn len(&self) -> usize {
		self.hooks.len()
	}

	/// Returns true if no hooks are registered.
	pub fn is_empty(&self) -> bool {
		self.hooks.is_empty()
	}

	/// Applies every hook to `entity` in registration order.
	///
	/// # Errors
	///
	/// The first failing hook aborts the chain with a
	/// [`SeedingError::RelationBuildError`] naming its position.
	pub async fn apply(&self, entity: &mut M) -> SeedingResult<()> {
		for (index, hook) in self.hooks.iter().enumerate() {
			hook(&mut *entity)
				.await
				.map_err(|e| SeedingError::relation(M::model_id(), format!("each[{}]", index), e))?;
		}
		Ok(())
	}
}

impl<M: Model> Default for RelationHooks<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> Clone for RelationHooks<M> {
	fn clone(&self) -> Self {
		Self {
			hooks: self.hooks.clone(),
		}
	}
}

impl<M> fmt::Debug for RelationHooks<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RelationHooks")
			.field("hooks", &self.hooks.len())
			.finish()
	}
}

/// Runs an inline nested factory call for `model.relation`.
///
/// Use it inside a definition when awaiting another factory directly, so that
/// its failure surfaces as a relation failure instead of a definition failure.
///
/// ```ignore
/// let author = related(Book::model_id(), "author", authors.make_one(None)).await?;
/// ```
pub async fn related<T, Fut>(model: &str, relation: &str, build: Fut) -> SeedingResult<T>
where
	Fut: Future<Output = SeedingResult<T>>,
{
	build
		.await
		.map_err(|e| SeedingError::relation(model, relation, e))
}
