//! Factories and database seeding for the Reinhardt framework.
//!
//! This crate provides two layers:
//!
//! - **Factory Engine**: Generate model instances from default attribute
//!   definitions, with overrides, lazy values, fake data and related entities
//! - **Seeding Orchestration**: Run composable seeders against a shared
//!   persistence context, flushing and clearing once per top-level run
//!
//! # Quick Start
//!
//! ## Defining Factories
//!
//! ```ignore
//! use reinhardt_seeding::prelude::*;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! pub struct Author {
//!     pub id: Option<u64>,
//!     pub name: String,
//!     pub email: String,
//! }
//!
//! impl Model for Author {
//!     fn model_id() -> &'static str {
//!         "library.Author"
//!     }
//! }
//!
//! pub struct AuthorFactory;
//!
//! #[async_trait]
//! impl Factory for AuthorFactory {
//!     type Model = Author;
//!
//!     async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
//!         Ok(Attributes::new()
//!             .with_value("name", FakerType::Name.lazy())
//!             .with_value("email", FakerType::Email.lazy()))
//!     }
//! }
//!
//! let authors = AuthorFactory.bind(em.clone());
//! let draft = authors.make_one(None).await?;                        // In memory only
//! let saved = authors.create(10, None).await?;                      // Registered and flushed
//! let john = authors
//!     .make_one(Some(Attributes::new().with("name", "John Snow")))
//!     .await?;
//! ```
//!
//! ## Writing Seeders
//!
//! ```ignore
//! #[derive(Default)]
//! pub struct DatabaseSeeder;
//!
//! #[async_trait]
//! impl Seeder for DatabaseSeeder {
//!     async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
//!         let admin = AuthorFactory.bind(em.clone()).create_one(None).await?;
//!         context.insert("admin", admin);
//!         self.call(em, context, &[SeederRef::of::<BookSeeder>()]).await
//!     }
//! }
//!
//! register_seeder::<DatabaseSeeder>("DatabaseSeeder");
//! run_seed("DatabaseSeeder", em).await?;
//! ```
//!
//! # Architecture
//!
//! ## Factory System
//!
//! - [`Model`](factory::Model) - Record type built from resolved attributes
//! - [`Factory`](factory::Factory) trait - Default attribute definition
//! - [`FactoryBuilder`](factory::FactoryBuilder) - `make`, `create` and `each`
//! - [`Attributes`](factory::Attributes) - Ordered attribute mapping with lazy values
//! - [`FakerType`](factory::FakerType) - Fake data generators
//! - [`Sequence`](factory::Sequence) - Auto-incrementing values
//!
//! ## Seeding
//!
//! - [`Seeder`](seeder::Seeder) trait - Runnable, composable seeding step
//! - [`SeedManager`](seeder::SeedManager) - Top-level runs and their lifecycle
//! - [`SeederRegistry`](seeder::SeederRegistry) - Name to seeder resolution
//! - [`SharedContext`](context::SharedContext) - Values shared across one run
//! - [`SeedCommand`](commands::SeedCommand) - `seed` management command
//!
//! ## Persistence
//!
//! Everything goes through [`PersistenceContext`](persistence::PersistenceContext).
//! [`InMemoryPersistence`](persistence::InMemoryPersistence) is a complete
//! implementation for tests.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod context;
pub mod error;
pub mod factory;
pub mod persistence;
pub mod prelude;
pub mod seeder;
pub mod settings;

// Re-export commonly used types at crate root
pub use context::SharedContext;
pub use error::{SeedingError, SeedingResult};
pub use factory::{
	Attributes, Factory, FactoryBuilder, FactoryExt, FakerType, Model, Sequence,
};
pub use persistence::{InMemoryPersistence, PersistenceContext, PersistenceHandle};
pub use seeder::{SeedManager, Seeder, SeederRef, call, run_seed};
pub use settings::SeedingSettings;
