//! Core factory traits.
//!
//! A [`Model`] is the record type a factory produces. A [`Factory`] binds
//! exactly one model to one definition procedure; the generation surface
//! (`make`, `create`, `each`, ...) lives on [`FactoryBuilder`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::attributes::Attributes;
use super::builder::FactoryBuilder;
use crate::error::{SeedingError, SeedingResult};
use crate::persistence::PersistenceHandle;

/// A schema-bound record type managed by the persistence layer.
///
/// Models are instantiated from resolved attribute mappings through serde.
/// Fields absent from the mapping fall back to the model's own defaults, so
/// models usually carry `#[serde(default)]`.
///
/// # Example
///
/// ```
/// use reinhardt_seeding::Model;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Author {
///     name: String,
///     email: String,
/// }
///
/// impl Model for Author {
///     fn model_id() -> &'static str {
///         "library.Author"
///     }
/// }
///
/// assert_eq!(Author::model_id(), "library.Author");
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
	/// Model identifier in format "app.Model" (e.g., "auth.User").
	fn model_id() -> &'static str;

	/// Instantiates the model from a record produced by the persistence context.
	///
	/// A record that does not fit the model is a definition failure.
	fn from_record(record: Value) -> SeedingResult<Self> {
		serde_json::from_value(record)
			.map_err(|e| SeedingError::definition(Self::model_id(), e.into()))
	}

	/// Serializes the model back into an attribute record.
	fn to_record(&self) -> SeedingResult<Map<String, Value>> {
		match serde_json::to_value(self)? {
			Value::Object(record) => Ok(record),
			_ => Err(SeedingError::ValidationError {
				field: Self::model_id().to_string(),
				message: "model must serialize to a JSON object".to_string(),
			}),
		}
	}
}

/// A factory definition for a single model type.
///
/// `definition` produces the default attribute mapping. It receives the
/// caller's overrides so it can branch on them (for instance reuse a supplied
/// related entity instead of generating one); the overrides are merged over its
/// output afterwards regardless.
///
/// # Example
///
/// ```ignore
/// struct AuthorFactory;
///
/// #[async_trait]
/// impl Factory for AuthorFactory {
///     type Model = Author;
///
///     async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
///         Ok(Attributes::new()
///             .with_value("name", FakerType::Name.lazy())
///             .with_value("email", FakerType::Email.lazy()))
///     }
/// }
///
/// let author = AuthorFactory.bind(em).make_one(None).await?;
/// ```
#[async_trait]
pub trait Factory: Send + Sync + 'static {
	/// The model type this factory creates.
	type Model: Model;

	/// Returns the default attribute mapping for one entity.
	async fn definition(&self, params: &Attributes) -> SeedingResult<Attributes>;
}

/// Extension methods available on every sized factory.
pub trait FactoryExt: Factory + Sized {
	/// Binds the factory to a persistence context, yielding the generation surface.
	fn bind(self, em: PersistenceHandle) -> FactoryBuilder<Self> {
		FactoryBuilder::new(self, em)
	}
}

impl<F: Factory> FactoryExt for F {}
