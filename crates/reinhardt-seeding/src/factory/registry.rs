//! Factory registry for dynamic factory discovery.
//!
//! This module provides a global registry associating each model with one
//! factory, so seeders can look a factory up by model type instead of naming
//! it directly.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::builder::FactoryBuilder;
use super::traits::{Factory, Model};
use crate::error::{SeedingError, SeedingResult};
use crate::persistence::PersistenceHandle;

/// Shared factory for model `M`, with the concrete factory type erased.
pub type DynFactory<M> = Arc<dyn Factory<Model = M>>;

/// Global factory registry, keyed by model identifier.
///
/// Values are `DynFactory<M>` for the model the key names.
static FACTORY_REGISTRY: Lazy<RwLock<HashMap<&'static str, Box<dyn Any + Send + Sync>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `factory` as the factory for its model, replacing any previous one.
///
/// # Example
///
/// ```ignore
/// register_factory(UserFactory);
///
/// let users = factory_for::<User>(em.clone())?.create(10, None).await?;
/// ```
pub fn register_factory<F: Factory>(factory: F) {
	let model_id = F::Model::model_id();
	let factory: DynFactory<F::Model> = Arc::new(factory);
	if FACTORY_REGISTRY
		.write()
		.insert(model_id, Box::new(factory))
		.is_some()
	{
		tracing::debug!(model = model_id, "Replaced registered factory");
	}
}

/// Gets the factory registered for model `M`.
pub fn get_factory<M: Model>() -> Option<DynFactory<M>> {
	FACTORY_REGISTRY
		.read()
		.get(M::model_id())
		.and_then(|entry| entry.downcast_ref::<DynFactory<M>>())
		.cloned()
}

/// Binds the factory registered for model `M` to `em`.
///
/// # Errors
///
/// Returns [`SeedingError::RegistryError`] if no factory is registered for
/// `M`, or if the entry under its identifier was registered for another type.
pub fn factory_for<M: Model>(
	em: PersistenceHandle,
) -> SeedingResult<FactoryBuilder<dyn Factory<Model = M>>> {
	let factory = get_factory::<M>().ok_or_else(|| {
		SeedingError::RegistryError(format!("No factory registered for {}", M::model_id()))
	})?;
	Ok(FactoryBuilder::from_arc(factory, em))
}

/// Checks if a factory is registered for the model identifier.
pub fn has_factory(model_id: &str) -> bool {
	FACTORY_REGISTRY.read().contains_key(model_id)
}

/// Returns all registered model identifiers, sorted.
pub fn factory_model_ids() -> Vec<String> {
	let mut ids: Vec<String> = FACTORY_REGISTRY
		.read()
		.keys()
		.map(|id| id.to_string())
		.collect();
	ids.sort();
	ids
}

/// Removes the factory registered for the model identifier.
pub fn unregister_factory(model_id: &str) -> bool {
	FACTORY_REGISTRY.write().remove(model_id).is_some()
}

/// Clears all registered factories.
///
/// This is primarily useful for testing.
pub fn clear_factories() {
	FACTORY_REGISTRY.write().clear();
}

/// Returns the number of registered factories.
pub fn factory_count() -> usize {
	FACTORY_REGISTRY.read().len()
}

/// Factory registry handle for scoped operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactoryRegistry;

impl FactoryRegistry {
	/// Creates a new registry handle.
	pub fn new() -> Self {
		Self
	}

	/// Registers `factory` for its model.
	pub fn register<F: Factory>(&self, factory: F) {
		register_factory(factory);
	}

	/// Gets the factory registered for model `M`.
	pub fn get<M: Model>(&self) -> Option<DynFactory<M>> {
		get_factory::<M>()
	}

	/// Binds the factory registered for model `M` to `em`.
	pub fn bind<M: Model>(
		&self,
		em: PersistenceHandle,
	) -> SeedingResult<FactoryBuilder<dyn Factory<Model = M>>> {
		factory_for::<M>(em)
	}

	/// Checks if a factory is registered.
	pub fn has(&self, model_id: &str) -> bool {
		has_factory(model_id)
	}

	/// Returns all registered model IDs.
	pub fn model_ids(&self) -> Vec<String> {
		factory_model_ids()
	}

	/// Returns the number of registered factories.
	pub fn len(&self) -> usize {
		factory_count()
	}

	/// Returns true if no factories are registered.
	pub fn is_empty(&self) -> bool {
		factory_count() == 0
	}

	/// Clears all factories (primarily for testing).
	pub fn clear(&self) {
		clear_factories();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory::Attributes;
	use crate::persistence::InMemoryPersistence;
	use async_trait::async_trait;
	use rstest::rstest;
	use serde::{Deserialize, Serialize};
	use serial_test::serial;

	#[derive(Debug, Default, Serialize, Deserialize)]
	#[serde(default)]
	struct Widget {
		label: String,
	}

	impl Model for Widget {
		fn model_id() -> &'static str {
			"registry.Widget"
		}
	}

	#[derive(Debug, Default, Serialize, Deserialize)]
	struct Gadget {}

	impl Model for Gadget {
		fn model_id() -> &'static str {
			"registry.Gadget"
		}
	}

	struct WidgetFactory {
		label: &'static str,
	}

	#[async_trait]
	impl Factory for WidgetFactory {
		type Model = Widget;

		async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
			Ok(Attributes::new().with("label", self.label))
		}
	}

	struct GadgetFactory;

	#[async_trait]
	impl Factory for GadgetFactory {
		type Model = Gadget;

		async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
			Ok(Attributes::new())
		}
	}

	#[rstest]
	#[serial(factory_registry)]
	#[tokio::test]
	async fn test_register_and_bind() {
		clear_factories();
		register_factory(WidgetFactory { label: "first" });

		assert!(has_factory("registry.Widget"));
		assert!(!has_factory("registry.Gadget"));

		let em = Arc::new(InMemoryPersistence::new());
		let widget = factory_for::<Widget>(em).unwrap().make_one(None).await.unwrap();
		assert_eq!(widget.label, "first");
	}

	#[rstest]
	#[serial(factory_registry)]
	#[tokio::test]
	async fn test_register_replaces() {
		clear_factories();
		register_factory(WidgetFactory { label: "first" });
		register_factory(WidgetFactory { label: "second" });

		assert_eq!(factory_count(), 1);
		let em = Arc::new(InMemoryPersistence::new());
		let widget = factory_for::<Widget>(em).unwrap().make_one(None).await.unwrap();
		assert_eq!(widget.label, "second");
	}

	#[rstest]
	#[serial(factory_registry)]
	fn test_missing_factory() {
		clear_factories();

		let em = Arc::new(InMemoryPersistence::new());
		let result = factory_for::<Gadget>(em);
		assert!(matches!(result, Err(SeedingError::RegistryError(_))));
	}

	#[rstest]
	#[serial(factory_registry)]
	fn test_factory_registry_handle() {
		clear_factories();

		let registry = FactoryRegistry::new();
		assert!(registry.is_empty());

		registry.register(GadgetFactory);
		registry.register(WidgetFactory { label: "handle" });

		assert_eq!(registry.len(), 2);
		assert_eq!(
			registry.model_ids(),
			vec!["registry.Gadget".to_string(), "registry.Widget".to_string()]
		);
		assert!(registry.get::<Gadget>().is_some());
		assert!(unregister_factory("registry.Gadget"));
		assert!(!registry.has("registry.Gadget"));

		registry.clear();
		assert!(registry.is_empty());
	}
}
