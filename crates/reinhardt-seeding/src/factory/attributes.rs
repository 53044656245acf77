//! Attribute mappings produced by factory definitions.
//!
//! An [`Attributes`] value is an ordered map from field name to either a
//! concrete JSON value or a [`LazyValue`] that is evaluated during resolution.
//! Lazy values see every attribute resolved before them, which lets one
//! default depend on another.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::traits::Model;
use crate::error::{SeedingError, SeedingResult};

type Thunk = dyn Fn(&Map<String, Value>) -> BoxFuture<'static, SeedingResult<Value>> + Send + Sync;

/// What a lazy value produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyKind {
	/// A plain generated value.
	Value,
	/// A related entity built by a nested factory.
	Relation,
}

/// A deferred attribute value.
///
/// The thunk is shared, so cloning an attribute mapping never evaluates it and
/// every generated entity gets its own evaluation.
#[derive(Clone)]
pub struct LazyValue {
	kind: LazyKind,
	thunk: Arc<Thunk>,
}

impl LazyValue {
	/// Creates a lazy value from an async closure.
	///
	/// The closure receives the attributes resolved before this one.
	pub fn new<F, Fut>(f: F) -> Self
	where
		F: Fn(&Map<String, Value>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = SeedingResult<Value>> + Send + 'static,
	{
		Self {
			kind: LazyKind::Value,
			thunk: Arc::new(move |resolved| Box::pin(f(resolved))),
		}
	}

	/// Creates a lazy value from a synchronous closure.
	pub fn from_fn<F>(f: F) -> Self
	where
		F: Fn(&Map<String, Value>) -> SeedingResult<Value> + Send + Sync + 'static,
	{
		Self {
			kind: LazyKind::Value,
			thunk: Arc::new(move |resolved| {
				let value = f(resolved);
				Box::pin(async move { value })
			}),
		}
	}

	/// Creates a lazy value holding a related entity built by a nested factory call.
	///
	/// A failure of the nested call is reported as a relation failure.
	pub fn related<M, F, Fut>(f: F) -> Self
	where
		M: Model,
		F: Fn(&Map<String, Value>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = SeedingResult<M>> + Send + 'static,
	{
		Self {
			kind: LazyKind::Relation,
			thunk: Arc::new(move |resolved| {
				let build = f(resolved);
				Box::pin(async move {
					let entity = build.await?;
					Ok(serde_json::to_value(entity)?)
				})
			}),
		}
	}

	/// Returns what this value produces.
	pub fn kind(&self) -> LazyKind {
		self.kind
	}

	/// Evaluates the value against the attributes resolved so far.
	pub async fn evaluate(&self, resolved: &Map<String, Value>) -> SeedingResult<Value> {
		(self.thunk)(resolved).await
	}
}

impl fmt::Debug for LazyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyValue")
			.field("kind", &self.kind)
			.finish_non_exhaustive()
	}
}

/// A single attribute value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
	/// A concrete value.
	Value(Value),
	/// A value computed during resolution.
	Lazy(LazyValue),
}

impl AttributeValue {
	/// Returns the concrete value, if this is not lazy.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			Self::Lazy(_) => None,
		}
	}

	/// Returns true if the value is computed during resolution.
	pub fn is_lazy(&self) -> bool {
		matches!(self, Self::Lazy(_))
	}
}

impl From<Value> for AttributeValue {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl From<LazyValue> for AttributeValue {
	fn from(lazy: LazyValue) -> Self {
		Self::Lazy(lazy)
	}
}

/// Ordered attribute mapping for one entity.
///
/// # Example
///
/// ```
/// use reinhardt_seeding::Attributes;
/// use serde_json::json;
///
/// let mut defaults = Attributes::new()
///     .with("name", "Generated")
///     .with("email", "generated@example.com");
/// let overrides = Attributes::new().with("name", "John Snow");
///
/// defaults.merge(&overrides);
/// assert_eq!(defaults.value("name"), Some(&json!("John Snow")));
/// assert_eq!(defaults.keys().collect::<Vec<_>>(), vec!["name", "email"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Attributes {
	entries: IndexMap<String, AttributeValue>,
}

impl Attributes {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a mapping from a JSON object.
	///
	/// # Errors
	///
	/// Returns a validation error when `value` is not an object.
	pub fn from_json(value: Value) -> SeedingResult<Self> {
		match value {
			Value::Object(map) => Ok(map.into()),
			other => Err(SeedingError::ValidationError {
				field: "attributes".to_string(),
				message: format!("expected a JSON object, got {}", other),
			}),
		}
	}

	/// Adds a concrete value.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.entries
			.insert(key.into(), AttributeValue::Value(value.into()));
		self
	}

	/// Adds an attribute value, concrete or lazy.
	pub fn with_value(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
		self.entries.insert(key.into(), value.into());
		self
	}

	/// Adds a value computed from the attributes resolved before it.
	pub fn with_lazy<F, Fut>(self, key: impl Into<String>, f: F) -> Self
	where
		F: Fn(&Map<String, Value>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = SeedingResult<Value>> + Send + 'static,
	{
		self.with_value(key, LazyValue::new(f))
	}

	/// Adds a related entity built by a nested factory call during resolution.
	pub fn with_related<M, F, Fut>(self, key: impl Into<String>, f: F) -> Self
	where
		M: Model,
		F: Fn(&Map<String, Value>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = SeedingResult<M>> + Send + 'static,
	{
		self.with_value(key, LazyValue::related(f))
	}

	/// Inserts a value, returning the one it replaced.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<AttributeValue>,
	) -> Option<AttributeValue> {
		self.entries.insert(key.into(), value.into())
	}

	/// Removes a value, keeping the order of the remaining keys.
	pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
		self.entries.shift_remove(key)
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&AttributeValue> {
		self.entries.get(key)
	}

	/// Returns the concrete value stored under `key`.
	///
	/// Lazy values are not evaluated and yield `None`.
	pub fn value(&self, key: &str) -> Option<&Value> {
		self.get(key).and_then(AttributeValue::as_value)
	}

	/// Returns true if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Iterates over the keys in mapping order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Iterates over the entries in mapping order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Shallow merge: every entry of `other` replaces the entry with the same key.
	///
	/// Replaced keys keep their position; new keys are appended.
	pub fn merge(&mut self, other: &Attributes) {
		for (key, value) in &other.entries {
			self.entries.insert(key.clone(), value.clone());
		}
	}
}

impl From<Map<String, Value>> for Attributes {
	fn from(map: Map<String, Value>) -> Self {
		map.into_iter()
			.map(|(k, v)| (k, AttributeValue::Value(v)))
			.collect()
	}
}

impl FromIterator<(String, AttributeValue)> for Attributes {
	fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

impl IntoIterator for Attributes {
	type Item = (String, AttributeValue);
	type IntoIter = indexmap::map::IntoIter<String, AttributeValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_from_json_object() {
		let attrs = Attributes::from_json(json!({"name": "Ada", "age": 36})).unwrap();
		assert_eq!(attrs.len(), 2);
		assert_eq!(attrs.value("age"), Some(&json!(36)));
	}

	#[rstest]
	#[case(json!([1, 2]))]
	#[case(json!("name"))]
	#[case(json!(null))]
	fn test_from_json_rejects_non_objects(#[case] value: Value) {
		let result = Attributes::from_json(value);
		assert!(matches!(
			result,
			Err(SeedingError::ValidationError { .. })
		));
	}

	#[rstest]
	fn test_merge_is_shallow_and_keeps_order() {
		let mut defaults = Attributes::new()
			.with("title", "Default")
			.with("meta", json!({"pages": 10, "lang": "en"}))
			.with("isbn", "000");
		let overrides = Attributes::new()
			.with("meta", json!({"pages": 99}))
			.with("extra", true);

		defaults.merge(&overrides);

		assert_eq!(
			defaults.keys().collect::<Vec<_>>(),
			vec!["title", "meta", "isbn", "extra"]
		);
		// nested objects are replaced, not merged
		assert_eq!(defaults.value("meta"), Some(&json!({"pages": 99})));
	}

	#[rstest]
	fn test_lazy_value_is_not_concrete() {
		let attrs = Attributes::new().with_lazy("code", |_| async { Ok(json!("c-1")) });
		assert!(attrs.contains_key("code"));
		assert!(attrs.get("code").unwrap().is_lazy());
		assert_eq!(attrs.value("code"), None);
	}

	#[rstest]
	fn test_remove_keeps_order() {
		let mut attrs = Attributes::new().with("a", 1).with("b", 2).with("c", 3);
		assert!(attrs.remove("b").is_some());
		assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["a", "c"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_lazy_sees_resolved_attributes() {
		let lazy = LazyValue::from_fn(|resolved| {
			let name = resolved
				.get("name")
				.and_then(Value::as_str)
				.unwrap_or_default();
			Ok(json!(format!("{}@example.com", name.to_lowercase())))
		});
		let mut resolved = Map::new();
		resolved.insert("name".to_string(), json!("Ada"));

		let value = lazy.evaluate(&resolved).await.unwrap();
		assert_eq!(value, json!("ada@example.com"));
		assert_eq!(lazy.kind(), LazyKind::Value);
	}
}
