//! Factory generation surface.
//!
//! [`FactoryBuilder`] binds a [`Factory`] to a persistence context and exposes
//! `make`, `make_one`, `create`, `create_one` and `each`.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::attributes::Attributes;
use super::relation::{RelationHooks, cascade, cascading, each_hook};
use super::resolver::AttributeResolver;
use super::traits::{Factory, Model};
use crate::error::SeedingResult;
use crate::persistence::PersistenceHandle;

/// A factory bound to a persistence context, with optional `each` hooks.
///
/// Cloning is cheap: the factory and hooks are shared.
///
/// # Example
///
/// ```ignore
/// let books = BookFactory.bind(em.clone());
/// let authors = AuthorFactory.bind(em.clone());
///
/// let books = books
///     .each(move |book| {
///         let authors = authors.clone();
///         Box::pin(async move {
///             book.author = Some(authors.make_one(None).await?);
///             Ok(())
///         })
///     })
///     .make(5, None)
///     .await?;
/// ```
pub struct FactoryBuilder<F: Factory + ?Sized> {
	factory: Arc<F>,
	em: PersistenceHandle,
	hooks: RelationHooks<F::Model>,
}

impl<F: Factory> FactoryBuilder<F> {
	/// Binds `factory` to `em`.
	pub fn new(factory: F, em: PersistenceHandle) -> Self {
		Self::from_arc(Arc::new(factory), em)
	}
}

impl<F: Factory + ?Sized> FactoryBuilder<F> {
	/// Binds a shared factory to `em`.
	pub fn from_arc(factory: Arc<F>, em: PersistenceHandle) -> Self {
		Self {
			factory,
			em,
			hooks: RelationHooks::new(),
		}
	}

	/// Returns the bound factory.
	pub fn factory(&self) -> &Arc<F> {
		&self.factory
	}

	/// Returns the persistence context.
	pub fn persistence(&self) -> &PersistenceHandle {
		&self.em
	}

	/// Number of registered `each` hooks.
	pub fn hook_count(&self) -> usize {
		self.hooks.len()
	}

	/// Returns a builder with `hook` registered after the existing hooks.
	///
	/// Hooks accumulate: every hook registered on the receiver is kept. The
	/// receiver itself is left unchanged.
	pub fn each<H>(&self, hook: H) -> Self
	where
		H: for<'a> Fn(&'a mut F::Model) -> BoxFuture<'a, SeedingResult<()>>
			+ Send
			+ Sync
			+ 'static,
	{
		let mut configured = self.clone();
		configured.hooks.push(each_hook(hook));
		configured
	}

	/// Builds `count` entities in memory.
	///
	/// None of them is registered with the persistence context, unless they are
	/// built as related entities of an entity being created.
	pub async fn make(
		&self,
		count: usize,
		overrides: Option<Attributes>,
	) -> SeedingResult<Vec<F::Model>> {
		tracing::debug!(model = F::Model::model_id(), count, "Making entities");
		let mut entities = Vec::with_capacity(count);
		for _ in 0..count {
			entities.push(self.build(overrides.as_ref()).await?);
		}
		Ok(entities)
	}

	/// Builds a single entity in memory.
	pub async fn make_one(&self, overrides: Option<Attributes>) -> SeedingResult<F::Model> {
		tracing::debug!(model = F::Model::model_id(), count = 1, "Making entities");
		self.build(overrides.as_ref()).await
	}

	/// Builds `count` entities, registers each of them and flushes once.
	///
	/// Related entities built along the way are registered as they are built
	/// and committed by the same flush. No owner is registered unless all
	/// `count` entities were built; related entities of a failed call stay
	/// registered but unflushed. A count of zero registers nothing and does not
	/// flush.
	pub async fn create(
		&self,
		count: usize,
		overrides: Option<Attributes>,
	) -> SeedingResult<Vec<F::Model>> {
		tracing::debug!(model = F::Model::model_id(), count, "Creating entities");
		let mut entities = Vec::with_capacity(count);
		for _ in 0..count {
			entities.push(cascade(self.instantiate(overrides.as_ref())).await?);
		}
		self.persist_all(entities).await
	}

	/// Builds, registers and flushes a single entity.
	pub async fn create_one(&self, overrides: Option<Attributes>) -> SeedingResult<F::Model> {
		let entity = cascade(self.instantiate(overrides.as_ref())).await?;
		let entity = self.register(entity).await?;
		self.em.flush().await?;
		tracing::debug!(model = F::Model::model_id(), count = 1, "Created entities");
		Ok(entity)
	}

	async fn build(&self, overrides: Option<&Attributes>) -> SeedingResult<F::Model> {
		let entity = self.instantiate(overrides).await?;
		if cascading() {
			return self.register(entity).await;
		}
		Ok(entity)
	}

	async fn instantiate(&self, overrides: Option<&Attributes>) -> SeedingResult<F::Model> {
		let model = F::Model::model_id();
		let attributes = AttributeResolver::resolve(self.factory.as_ref(), overrides).await?;
		let record = self.em.create_record(model, attributes, false).await?;
		let mut entity = F::Model::from_record(record)?;
		self.hooks.apply(&mut entity).await?;
		Ok(entity)
	}

	async fn persist_all(&self, entities: Vec<F::Model>) -> SeedingResult<Vec<F::Model>> {
		if entities.is_empty() {
			return Ok(entities);
		}

		let mut persisted = Vec::with_capacity(entities.len());
		for entity in entities {
			persisted.push(self.register(entity).await?);
		}
		self.em.flush().await?;
		tracing::debug!(
			model = F::Model::model_id(),
			count = persisted.len(),
			"Created entities"
		);
		Ok(persisted)
	}

	/// Registers a fully built entity; the context may fill in values such as keys.
	async fn register(&self, entity: F::Model) -> SeedingResult<F::Model> {
		let record = self
			.em
			.create_record(F::Model::model_id(), entity.to_record()?, true)
			.await?;
		F::Model::from_record(record)
	}
}

impl<F: Factory + ?Sized> Clone for FactoryBuilder<F> {
	fn clone(&self) -> Self {
		Self {
			factory: Arc::clone(&self.factory),
			em: Arc::clone(&self.em),
			hooks: self.hooks.clone(),
		}
	}
}

impl<F: Factory + ?Sized> fmt::Debug for FactoryBuilder<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryBuilder")
			.field("model", &F::Model::model_id())
			.field("hooks", &self.hooks)
			.finish_non_exhaustive()
	}
}
