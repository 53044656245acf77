//! seed command implementation.
//!
//! This command runs registered seeders against a persistence context.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{SeedingError, SeedingResult};
use crate::persistence::PersistenceHandle;
use crate::seeder::{SeedManager, SeedReport, SeederResolver, global_registry};
use crate::settings::SeedingSettings;

/// Arguments for the seed command.
#[derive(Debug, Clone, Default)]
pub struct SeedArgs {
	/// Registered seeder names to run, in order. Empty runs the default seeder.
	pub seeders: Vec<String>,
}

impl SeedArgs {
	/// Creates arguments naming `seeders`.
	pub fn new<I, S>(seeders: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			seeders: seeders.into_iter().map(Into::into).collect(),
		}
	}
}

/// Options for the seed command.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
	/// Overrides the default seeder from the settings.
	pub default_seeder: Option<String>,

	/// Verbosity level.
	pub verbosity: u8,
}

impl SeedOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default seeder.
	pub fn with_default_seeder(mut self, name: impl Into<String>) -> Self {
		self.default_seeder = Some(name.into());
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Outcome of a seed command.
#[derive(Debug, Clone, Default)]
pub struct SeedResult {
	/// One report per seeder run, in order.
	pub reports: Vec<SeedReport>,
}

impl SeedResult {
	/// Number of seeders run.
	pub fn seeders_run(&self) -> usize {
		self.reports.len()
	}

	/// Total time spent across all seeders.
	pub fn elapsed(&self) -> Duration {
		self.reports.iter().map(|r| r.elapsed).sum()
	}
}

/// The seed command for populating the database through seeders.
///
/// Every named seeder is a top-level run of its own: it gets a fresh shared
/// context, and the persistence context is flushed and cleared after it.
///
/// # Example
///
/// ```ignore
/// let command = SeedCommand::new(em.clone());
/// let args = SeedArgs::new(["UserSeeder", "PostSeeder"]);
/// let options = SeedOptions::new().with_verbosity(1);
/// let result = command.execute(args, options).await?;
/// println!("Ran {} seeder(s)", result.seeders_run());
/// ```
pub struct SeedCommand {
	em: PersistenceHandle,
	resolver: Arc<dyn SeederResolver>,
	settings: SeedingSettings,
}

impl SeedCommand {
	/// Creates a new seed command resolving names through the process-wide registry.
	pub fn new(em: PersistenceHandle) -> Self {
		Self {
			em,
			resolver: Arc::new(global_registry()),
			settings: SeedingSettings::default(),
		}
	}

	/// Sets the resolver used to find seeders.
	pub fn with_resolver(mut self, resolver: Arc<dyn SeederResolver>) -> Self {
		self.resolver = resolver;
		self
	}

	/// Sets the base settings; options passed to `execute` take precedence.
	pub fn with_settings(mut self, settings: SeedingSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"seed"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Seeds the database using registered seeders"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: seed [options] [seeder ...]

Seeds the database by running the named seeder(s) in order.
Without arguments, runs the default seeder.

Arguments:
  seeder               Name of a registered seeder

Options:
  --default NAME       Seeder to run when none is named (default: DatabaseSeeder)
  --verbosity LEVEL    Verbosity level (0=minimal, 1=normal, 2=verbose)
"#
	}

	/// Executes the seed command.
	///
	/// # Arguments
	///
	/// * `args` - Command arguments (seeder names)
	/// * `options` - Command options
	///
	/// # Returns
	///
	/// Returns one report per seeder run.
	pub async fn execute(&self, args: SeedArgs, options: SeedOptions) -> SeedingResult<SeedResult> {
		if let Some(name) = args.seeders.iter().find(|name| name.trim().is_empty()) {
			return Err(SeedingError::ValidationError {
				field: "seeders".to_string(),
				message: format!("Invalid seeder name: {:?}", name),
			});
		}

		let mut settings = self.settings.clone().with_verbosity(options.verbosity);
		if let Some(default_seeder) = options.default_seeder {
			settings = settings.with_default_seeder(default_seeder);
		}

		let manager = SeedManager::new(Arc::clone(&self.em))
			.with_resolver(Arc::clone(&self.resolver))
			.with_settings(settings);

		let reports = if args.seeders.is_empty() {
			vec![manager.seed_default().await?]
		} else {
			manager.seed_by_name(args.seeders.as_slice()).await?
		};
		let result = SeedResult { reports };

		if options.verbosity > 0 {
			self.print_result(&result, options.verbosity);
		}

		Ok(result)
	}

	/// Prints the seed result summary.
	fn print_result(&self, result: &SeedResult, verbosity: u8) {
		if verbosity > 1 {
			for report in &result.reports {
				println!("  {} ({} ms)", report.seeder, report.elapsed.as_millis());
			}
		}
		println!("Ran {} seeder(s)", result.seeders_run());
	}
}
