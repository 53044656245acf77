//! Integration tests for seeding orchestration.

mod helpers;

use std::sync::Arc;

use helpers::library::{Author, Book, DatabaseSeeder, memory, registry};
use parking_lot::Mutex;
use reinhardt_seeding::persistence::PersistenceEvent;
use reinhardt_seeding::prelude::*;
use rstest::rstest;
use serde_json::Map;
use serial_test::serial;

/// Registers one `seeding.Step` record and appends its label to `"trail"`.
struct Step {
	label: &'static str,
}

#[async_trait]
impl Seeder for Step {
	fn name(&self) -> &str {
		self.label
	}

	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
		em.create_record("seeding.Step", Map::new(), true).await?;
		match context.get_mut::<Vec<&'static str>>("trail") {
			Some(trail) => trail.push(self.label),
			None => {
				context.insert("trail", vec![self.label]);
			}
		}
		Ok(())
	}
}

fn step(label: &'static str) -> SeederRef {
	SeederRef::from_fn(label, move || Box::new(Step { label }))
}

/// Calls two steps, then records what they left in the context.
struct Parent {
	seen: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Seeder for Parent {
	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
		self.call(em, context, &[step("a"), step("b")]).await?;
		*self.seen.lock() = context.require::<Vec<&'static str>>("trail")?.clone();
		Ok(())
	}
}

#[rstest]
#[tokio::test]
async fn test_flush_and_clear_once_after_nested_calls() {
	let em = memory();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let parent = {
		let seen = Arc::clone(&seen);
		SeederRef::from_fn("Parent", move || {
			Box::new(Parent {
				seen: Arc::clone(&seen),
			})
		})
	};

	let report = SeedManager::new(em.clone()).run(parent).await.unwrap();

	assert_eq!(report.seeder, "Parent");
	assert_eq!(report.state, SeedState::Completed);
	assert_eq!(*seen.lock(), vec!["a", "b"]);
	assert_eq!(
		em.events(),
		vec![
			PersistenceEvent::Registered("seeding.Step".to_string()),
			PersistenceEvent::Registered("seeding.Step".to_string()),
			PersistenceEvent::Flushed { records: 2 },
			PersistenceEvent::Cleared,
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_context_flows_between_nested_seeders() {
	let em = memory();
	let manager = SeedManager::new(em.clone()).with_resolver(Arc::new(registry()));

	manager.run(SeederRef::of::<DatabaseSeeder>()).await.unwrap();

	let authors = em.committed(Author::model_id());
	let books = em.committed(Book::model_id());
	assert_eq!(authors.len(), 2);
	assert_eq!(books.len(), 2);
	// every book points at an author created by the previous seeder
	let author_ids: Vec<_> = authors.iter().map(|a| a["id"].clone()).collect();
	let book_author_ids: Vec<_> = books.iter().map(|b| b["author"]["id"].clone()).collect();
	assert_eq!(author_ids, book_author_ids);

	assert_eq!(em.clear_count(), 1);
	assert_eq!(em.events().last(), Some(&PersistenceEvent::Cleared));
	assert_eq!(em.tracked_count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_nested_seeders_by_name() {
	let em = memory();
	let manager = SeedManager::new(em.clone()).with_resolver(Arc::new(registry()));

	let reports = manager
		.seed_by_name(&["AuthorSeeder", "AuthorSeeder"])
		.await
		.unwrap();

	assert_eq!(reports.len(), 2);
	assert!(reports.iter().all(|r| r.seeder == "AuthorSeeder"));
	assert_eq!(em.committed_count(Author::model_id()), 4);
	assert_eq!(em.clear_count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_each_top_level_run_gets_a_fresh_context() {
	let em = memory();
	let manager = SeedManager::new(em.clone()).with_resolver(Arc::new(registry()));

	manager.run("AuthorSeeder").await.unwrap();
	let error = manager.run("BookSeeder").await.unwrap_err();

	assert!(matches!(error, SeedingError::ValidationError { ref field, .. } if field == "author_ids"));
	assert_eq!(manager.state(), SeedState::Failed);
}

#[rstest]
#[tokio::test]
async fn test_failed_run_leaves_partial_state() {
	let em = memory();
	let manager = SeedManager::new(em.clone()).with_resolver(Arc::new(registry()));

	let error = manager.run("FailingSeeder").await.unwrap_err();

	assert!(matches!(error, SeedingError::UnitRunError { ref seeder, .. } if seeder == "FailingSeeder"));
	assert_eq!(manager.state(), SeedState::Failed);
	// the factory flushed its own author; the run never reached its flush and clear
	assert_eq!(em.committed_count(Author::model_id()), 1);
	assert_eq!(em.flush_count(), 1);
	assert_eq!(em.clear_count(), 0);
	assert_eq!(em.tracked_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_unresolvable_nested_reference() {
	struct Dangling;

	#[async_trait]
	impl Seeder for Dangling {
		async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
			call(em, context, &[SeederRef::named("Nowhere")]).await
		}
	}

	let em = memory();
	let manager = SeedManager::new(em.clone()).with_resolver(Arc::new(registry()));

	let result = manager
		.run(SeederRef::from_fn("Dangling", || Box::new(Dangling)))
		.await;

	assert!(matches!(result, Err(SeedingError::UnitResolutionError(ref name)) if name == "Nowhere"));
	assert_eq!(em.flush_count(), 0);
}

#[rstest]
#[serial(seeder_registry)]
#[tokio::test]
async fn test_run_seed_uses_global_registry() {
	register_seeder::<DatabaseSeeder>("DatabaseSeeder");
	let em = memory();

	run_seed("DatabaseSeeder", em.clone()).await.unwrap();

	assert_eq!(em.committed_count(Book::model_id()), 2);
	assert_eq!(em.clear_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_seed_command_runs_default_seeder() {
	let em = memory();
	let command = SeedCommand::new(em.clone()).with_resolver(Arc::new(registry()));

	let result = command
		.execute(SeedArgs::default(), SeedOptions::new().with_verbosity(1))
		.await
		.unwrap();

	assert_eq!(result.seeders_run(), 1);
	assert_eq!(result.reports[0].seeder, "DatabaseSeeder");
	assert_eq!(em.committed_count(Author::model_id()), 2);
}
