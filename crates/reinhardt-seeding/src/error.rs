//! Error types for the seeding module.
//!
//! Every failure raised by factories, persistence contexts and seeders is a
//! [`SeedingError`]. Nested failures keep their cause as a source so that the
//! originating kind is never lost on the way up to the top-level run.

use thiserror::Error;

/// Errors that can occur during seeding operations.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// The definition procedure of a factory failed or produced an attribute
	/// mapping that could not be turned into the model.
	#[error("Definition error for {model}: {source}")]
	DefinitionError {
		/// Model identifier of the factory.
		model: String,
		/// Underlying cause.
		#[source]
		source: Box<SeedingError>,
	},

	/// A relation hook or an inline nested factory call failed.
	#[error("Relation build error for {model}.{relation}: {source}")]
	RelationBuildError {
		/// Model identifier of the owning entity.
		model: String,
		/// Relation (or hook) being built.
		relation: String,
		/// Underlying cause.
		#[source]
		source: Box<SeedingError>,
	},

	/// The persistence context rejected an operation.
	#[error("Persistence error: {0}")]
	PersistenceError(String),

	/// A seeder reference could not be resolved to a constructible seeder.
	#[error("Seeder not found: {0}")]
	UnitResolutionError(String),

	/// A seeder reported a failure of its own.
	#[error("Seeder {seeder} failed: {message}")]
	UnitRunError {
		/// Seeder name.
		seeder: String,
		/// Failure message.
		message: String,
	},

	/// Faker data generation failed.
	#[error("Faker error: {0}")]
	FakerError(String),

	/// Validation failed for a specific field.
	#[error("Validation error: {field}: {message}")]
	ValidationError {
		/// Field that failed validation.
		field: String,
		/// Validation error message.
		message: String,
	},

	/// Registry error.
	#[error("Registry error: {0}")]
	RegistryError(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),
}

impl SeedingError {
	/// Wraps `source` as a definition failure of `model`.
	///
	/// Relation and persistence failures raised while the definition ran are
	/// returned unchanged, so that their kind survives.
	pub fn definition(model: impl Into<String>, source: SeedingError) -> Self {
		match source {
			Self::RelationBuildError { .. } | Self::PersistenceError(_) => source,
			other => Self::DefinitionError {
				model: model.into(),
				source: Box::new(other),
			},
		}
	}

	/// Wraps `source` as a relation failure of `model.relation`.
	pub fn relation(
		model: impl Into<String>,
		relation: impl Into<String>,
		source: SeedingError,
	) -> Self {
		Self::RelationBuildError {
			model: model.into(),
			relation: relation.into(),
			source: Box::new(source),
		}
	}

	/// Creates a failure reported by a seeder itself.
	pub fn unit_run(seeder: impl Into<String>, message: impl Into<String>) -> Self {
		Self::UnitRunError {
			seeder: seeder.into(),
			message: message.into(),
		}
	}

	/// Returns true for [`SeedingError::DefinitionError`].
	pub fn is_definition(&self) -> bool {
		matches!(self, Self::DefinitionError { .. })
	}

	/// Returns true for [`SeedingError::RelationBuildError`].
	pub fn is_relation(&self) -> bool {
		matches!(self, Self::RelationBuildError { .. })
	}
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;
