//! Attribute resolution.
//!
//! Resolution runs the factory definition with the caller's overrides, merges
//! the overrides over the definition output, then evaluates lazy values in
//! mapping order against every concrete value.

use serde_json::{Map, Value};

use super::attributes::{AttributeValue, Attributes, LazyKind};
use super::traits::{Factory, Model};
use crate::error::{SeedingError, SeedingResult};

/// Resolves the final attribute record for one entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeResolver;

impl AttributeResolver {
	/// Resolves attributes for one entity of `F::Model`.
	///
	/// Overrides always win over the definition output, key by key, even if the
	/// definition never looked at them.
	///
	/// # Errors
	///
	/// - [`SeedingError::DefinitionError`] if the definition or a lazy value fails
	/// - [`SeedingError::RelationBuildError`] if a related lazy value fails
	pub async fn resolve<F>(
		factory: &F,
		overrides: Option<&Attributes>,
	) -> SeedingResult<Map<String, Value>>
	where
		F: Factory + ?Sized,
	{
		let model = F::Model::model_id();
		let empty = Attributes::new();
		let params = overrides.unwrap_or(&empty);

		let mut attributes = factory
			.definition(params)
			.await
			.map_err(|e| SeedingError::definition(model, e))?;
		attributes.merge(params);

		Self::evaluate(model, attributes).await
	}

	/// Evaluates every lazy value of `attributes` in order.
	///
	/// Each lazy value sees every concrete attribute, wherever it sits in the
	/// mapping, plus the lazy values evaluated before it. The output keeps the
	/// mapping order.
	pub async fn evaluate(model: &str, attributes: Attributes) -> SeedingResult<Map<String, Value>> {
		let entries: Vec<(String, AttributeValue)> = attributes.into_iter().collect();
		let mut resolved: Map<String, Value> = entries
			.iter()
			.filter_map(|(key, value)| value.as_value().map(|v| (key.clone(), v.clone())))
			.collect();

		for (key, value) in &entries {
			let AttributeValue::Lazy(lazy) = value else {
				continue;
			};
			let value = match lazy.evaluate(&resolved).await {
				Ok(value) => value,
				Err(e) if lazy.kind() == LazyKind::Relation => {
					return Err(SeedingError::relation(model, key.as_str(), e));
				}
				Err(e) => return Err(SeedingError::definition(model, e)),
			};
			resolved.insert(key.clone(), value);
		}

		let mut ordered = Map::new();
		for (key, _) in entries {
			if let Some(value) = resolved.remove(&key) {
				ordered.insert(key, value);
			}
		}
		Ok(ordered)
	}
}
