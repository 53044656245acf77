//! Seeding settings.
//!
//! Plain data that applications deserialize from their own configuration
//! sources; this crate does not read files or the environment.

use serde::{Deserialize, Serialize};

/// Name of the seeder run when no seeder is named explicitly.
pub const DEFAULT_SEEDER: &str = "DatabaseSeeder";

/// Settings for [`SeedManager`](crate::seeder::SeedManager).
///
/// # Examples
///
/// ```
/// use reinhardt_seeding::SeedingSettings;
///
/// let settings = SeedingSettings::new()
///     .with_default_seeder("DemoSeeder")
///     .with_verbosity(2);
///
/// assert_eq!(settings.default_seeder, "DemoSeeder");
/// assert_eq!(settings.verbosity, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingSettings {
	/// Seeder run by `seed_default` and by the `seed` command without arguments.
	pub default_seeder: String,

	/// Verbosity level (0=quiet, 1=summary, 2=per seeder detail).
	pub verbosity: u8,
}

impl SeedingSettings {
	/// Creates default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default seeder.
	pub fn with_default_seeder(mut self, name: impl Into<String>) -> Self {
		self.default_seeder = name.into();
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

impl Default for SeedingSettings {
	fn default() -> Self {
		Self {
			default_seeder: DEFAULT_SEEDER.to_string(),
			verbosity: 0,
		}
	}
}
