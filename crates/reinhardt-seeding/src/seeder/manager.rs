//! Seeding orchestration.
//!
//! [`SeedManager::run`] drives one top-level seeding run:
//!
//! 1. resolve the reference and construct the seeder
//! 2. create a fresh [`SharedContext`]
//! 3. run the seeder (`Running`)
//! 4. flush, then clear the persistence context (`Completed`)
//!
//! A failure at any step propagates unchanged and leaves the persistence
//! context as it is (`Failed`). Nested [`call`]s never flush or clear.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::registry::{SeederResolver, global_registry};
use super::{Seeder, SeederRef};
use crate::context::SharedContext;
use crate::error::SeedingResult;
use crate::persistence::PersistenceHandle;
use crate::settings::SeedingSettings;

/// State of the most recent top-level run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedState {
	/// Nothing has run yet.
	#[default]
	Idle,
	/// A seeder is running.
	Running,
	/// The seeder finished and the context was flushed and cleared.
	Completed,
	/// The run failed.
	Failed,
}

/// Summary of a completed top-level run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
	/// Name of the top-level seeder.
	pub seeder: String,
	/// Final state.
	pub state: SeedState,
	/// Wall time of the run, flush and clear included.
	pub elapsed: Duration,
}

/// Runs seeders against a persistence context.
///
/// # Example
///
/// ```ignore
/// let manager = SeedManager::new(em.clone())
///     .with_settings(SeedingSettings::new().with_verbosity(1));
///
/// let report = manager.run(SeederRef::of::<DatabaseSeeder>()).await?;
/// assert_eq!(report.state, SeedState::Completed);
/// ```
pub struct SeedManager {
	em: PersistenceHandle,
	resolver: Arc<dyn SeederResolver>,
	settings: SeedingSettings,
	state: RwLock<SeedState>,
}

impl SeedManager {
	/// Creates a manager resolving names through the process-wide registry.
	pub fn new(em: PersistenceHandle) -> Self {
		Self {
			em,
			resolver: Arc::new(global_registry()),
			settings: SeedingSettings::default(),
			state: RwLock::new(SeedState::Idle),
		}
	}

	/// Sets the resolver used for top-level and nested references.
	pub fn with_resolver(mut self, resolver: Arc<dyn SeederResolver>) -> Self {
		self.resolver = resolver;
		self
	}

	/// Sets the settings.
	pub fn with_settings(mut self, settings: SeedingSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Returns the settings.
	pub fn settings(&self) -> &SeedingSettings {
		&self.settings
	}

	/// Returns the persistence context.
	pub fn persistence(&self) -> &PersistenceHandle {
		&self.em
	}

	/// Returns the state of the most recent top-level run.
	pub fn state(&self) -> SeedState {
		*self.state.read()
	}

	/// Runs `reference` as a top-level seeder.
	///
	/// The seeder gets a fresh [`SharedContext`]. After it returns successfully
	/// the persistence context is flushed and then cleared, exactly once.
	///
	/// # Errors
	///
	/// Resolution, seeder and persistence failures are returned unchanged; on
	/// failure no flush or clear is attempted after the failing step.
	pub async fn run(&self, reference: impl Into<SeederRef>) -> SeedingResult<SeedReport> {
		let reference = reference.into();
		let construct = match self.resolver.resolve(&reference) {
			Ok(construct) => construct,
			Err(error) => {
				self.set_state(SeedState::Failed);
				tracing::warn!(seeder = reference.name(), error = %error, "Seeder could not be resolved");
				return Err(error);
			}
		};
		let seeder = construct();
		self.run_seeder(reference.name(), seeder.as_ref()).await
	}

	/// Runs each reference as its own top-level run, in order.
	///
	/// Stops at the first failure.
	pub async fn seed(&self, references: &[SeederRef]) -> SeedingResult<Vec<SeedReport>> {
		let mut reports = Vec::with_capacity(references.len());
		for reference in references {
			reports.push(self.run(reference.clone()).await?);
		}
		Ok(reports)
	}

	/// Runs registered seeders by name.
	///
	/// Every name is resolved before anything runs, so an unknown name fails
	/// the call without side effects.
	pub async fn seed_by_name<S: AsRef<str>>(&self, names: &[S]) -> SeedingResult<Vec<SeedReport>> {
		let mut references = Vec::with_capacity(names.len());
		for name in names {
			let name = name.as_ref();
			let construct = match self.resolver.resolve(&SeederRef::named(name)) {
				Ok(construct) => construct,
				Err(error) => {
					self.set_state(SeedState::Failed);
					tracing::warn!(seeder = name, error = %error, "Seeder could not be resolved");
					return Err(error);
				}
			};
			references.push(SeederRef::Constructor {
				name: name.to_string(),
				construct,
			});
		}
		self.seed(&references).await
	}

	/// Runs the default seeder from the settings.
	pub async fn seed_default(&self) -> SeedingResult<SeedReport> {
		self.run(SeederRef::named(self.settings.default_seeder.clone()))
			.await
	}

	/// Runs `seeder` as a top-level run, reporting it under `name`.
	async fn run_seeder(&self, name: &str, seeder: &dyn Seeder) -> SeedingResult<SeedReport> {
		let name = name.to_string();
		let started = Instant::now();
		let mut context = SharedContext::new(Arc::clone(&self.resolver));

		self.set_state(SeedState::Running);
		if self.settings.verbosity > 0 {
			tracing::info!(seeder = %name, "Running seeder");
		}

		let outcome = match seeder.run(&self.em, &mut context).await {
			Ok(()) => self.finish().await,
			Err(error) => Err(error),
		};
		if let Err(error) = outcome {
			self.set_state(SeedState::Failed);
			tracing::warn!(seeder = %name, error = %error, "Seeder failed");
			return Err(error);
		}

		self.set_state(SeedState::Completed);
		let elapsed = started.elapsed();
		if self.settings.verbosity > 0 {
			tracing::info!(
				seeder = %name,
				elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
				"Seeder completed"
			);
		}
		Ok(SeedReport {
			seeder: name,
			state: SeedState::Completed,
			elapsed,
		})
	}

	async fn finish(&self) -> SeedingResult<()> {
		self.em.flush().await?;
		self.em.clear().await
	}

	fn set_state(&self, state: SeedState) {
		*self.state.write() = state;
	}
}

/// Runs `seeders` in order against `em`, sharing `context`.
///
/// This is the composition primitive used from inside [`Seeder::run`]. Each
/// reference is resolved through the context's resolver and run to completion
/// before the next one starts. It never flushes or clears; that is left to the
/// top-level run.
pub async fn call(
	em: &PersistenceHandle,
	context: &mut SharedContext,
	seeders: &[SeederRef],
) -> SeedingResult<()> {
	for reference in seeders {
		let construct = context.resolver().resolve(reference)?;
		let seeder = construct();
		tracing::debug!(seeder = seeder.name(), "Calling seeder");
		seeder.run(em, context).await?;
	}
	Ok(())
}

/// Runs `reference` as a top-level seeder, resolving names through the
/// process-wide registry.
pub async fn run_seed(reference: impl Into<SeederRef>, em: PersistenceHandle) -> SeedingResult<()> {
	SeedManager::new(em).run(reference).await.map(|_| ())
}
