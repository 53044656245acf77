//! Fake data generators.
//!
//! Thin wrappers over the `fake` crate for the value kinds factories use most.
//! Every call produces a fresh value; use [`FakerType::lazy`] inside a
//! definition so that each generated entity gets its own.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use serde_json::Value;

use super::attributes::{AttributeValue, LazyValue};
use crate::error::{SeedingError, SeedingResult};

/// Kind of fake value to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakerType {
	/// Full person name.
	Name,
	/// Given name.
	FirstName,
	/// Family name.
	LastName,
	/// Login name.
	Username,
	/// Email address on a reserved example domain.
	Email,
	/// Company name.
	CompanyName,
	/// City name.
	CityName,
	/// Single lorem word.
	Word,
	/// Lorem sentence of three to seven words.
	Sentence,
	/// One or two lorem sentences.
	Paragraph,
	/// Random v4 UUID.
	Uuid,
	/// RFC 3339 timestamp within the past year.
	DateTime,
}

impl FakerType {
	/// All generator kinds.
	pub const ALL: [FakerType; 12] = [
		Self::Name,
		Self::FirstName,
		Self::LastName,
		Self::Username,
		Self::Email,
		Self::CompanyName,
		Self::CityName,
		Self::Word,
		Self::Sentence,
		Self::Paragraph,
		Self::Uuid,
		Self::DateTime,
	];

	/// Generates a fresh value.
	pub fn generate(&self) -> String {
		match self {
			Self::Name => Name().fake(),
			Self::FirstName => FirstName().fake(),
			Self::LastName => LastName().fake(),
			Self::Username => Username().fake(),
			Self::Email => SafeEmail().fake(),
			Self::CompanyName => CompanyName().fake(),
			Self::CityName => CityName().fake(),
			Self::Word => Word().fake(),
			Self::Sentence => Sentence(3..8).fake(),
			Self::Paragraph => Paragraph(1..3).fake(),
			Self::Uuid => uuid::Uuid::new_v4().to_string(),
			Self::DateTime => {
				let days: i64 = (0..365).fake();
				(Utc::now() - Duration::days(days)).to_rfc3339()
			}
		}
	}

	/// Generates a fresh value as a JSON string.
	pub fn value(&self) -> Value {
		Value::String(self.generate())
	}

	/// Returns an attribute value that generates on every resolution.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_seeding::factory::{Attributes, FakerType};
	///
	/// let attributes = Attributes::new()
	///     .with_value("email", FakerType::Email.lazy());
	///
	/// assert!(attributes.get("email").unwrap().is_lazy());
	/// ```
	pub fn lazy(self) -> AttributeValue {
		AttributeValue::Lazy(LazyValue::from_fn(move |_| Ok(self.value())))
	}

	/// Snake case name of the generator kind.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::Username => "username",
			Self::Email => "email",
			Self::CompanyName => "company_name",
			Self::CityName => "city_name",
			Self::Word => "word",
			Self::Sentence => "sentence",
			Self::Paragraph => "paragraph",
			Self::Uuid => "uuid",
			Self::DateTime => "date_time",
		}
	}
}

impl fmt::Display for FakerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FakerType {
	type Err = SeedingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| SeedingError::FakerError(format!("Unknown faker type: {}", s)))
	}
}

/// Generates a value for the generator kind named `name`.
///
/// # Errors
///
/// Returns [`SeedingError::FakerError`] for an unknown name.
pub fn generate_fake(name: &str) -> SeedingResult<String> {
	Ok(name.parse::<FakerType>()?.generate())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FakerType::Name)]
	#[case(FakerType::FirstName)]
	#[case(FakerType::LastName)]
	#[case(FakerType::Username)]
	#[case(FakerType::CompanyName)]
	#[case(FakerType::CityName)]
	#[case(FakerType::Word)]
	#[case(FakerType::Sentence)]
	#[case(FakerType::Paragraph)]
	fn test_generates_non_empty_text(#[case] kind: FakerType) {
		assert!(!kind.generate().is_empty());
	}

	#[rstest]
	fn test_email_shape() {
		let email = FakerType::Email.generate();
		assert!(email.contains('@'));
	}

	#[rstest]
	fn test_uuid_parses() {
		let value = FakerType::Uuid.generate();
		assert!(uuid::Uuid::parse_str(&value).is_ok());
	}

	#[rstest]
	fn test_date_time_is_rfc3339_in_the_past() {
		let value = FakerType::DateTime.generate();
		let parsed = chrono::DateTime::parse_from_rfc3339(&value).unwrap();
		assert!(parsed <= Utc::now());
	}

	#[rstest]
	fn test_parse_round_trips_names() {
		for kind in FakerType::ALL {
			assert_eq!(kind.as_str().parse::<FakerType>().unwrap(), kind);
		}
	}

	#[rstest]
	fn test_parse_unknown() {
		let result = "phone_number".parse::<FakerType>();
		assert!(matches!(result, Err(SeedingError::FakerError(_))));
		assert!(generate_fake("phone_number").is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_lazy_generates_per_evaluation() {
		let AttributeValue::Lazy(lazy) = FakerType::Uuid.lazy() else {
			panic!("expected a lazy value");
		};
		let resolved = serde_json::Map::new();
		let first = lazy.evaluate(&resolved).await.unwrap();
		let second = lazy.evaluate(&resolved).await.unwrap();
		assert_ne!(first, second);
	}
}
