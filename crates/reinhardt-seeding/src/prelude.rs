//! Convenience re-exports for common usage.
//!
//! This module provides a single import for the most commonly used items
//! from the reinhardt-seeding crate.
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_seeding::prelude::*;
//!
//! // Now you have access to:
//! // - Factory traits and attribute types
//! // - Seeder types
//! // - Persistence types
//! // - Error types
//! ```

// Error types
pub use crate::error::{SeedingError, SeedingResult};

// Factory types
pub use crate::factory::{
	AttributeValue, Attributes, Factory, FactoryBuilder, FactoryExt, FactoryRegistry, FakerType,
	LazyValue, Model, Sequence,
};

// Factory functions
pub use crate::factory::{
	each_hook, factory_for, generate_fake, register_factory, related, sequence,
};

// Seeder types
pub use crate::context::SharedContext;
pub use crate::seeder::{
	SeedManager, SeedReport, SeedState, Seeder, SeederRef, SeederRegistry, call,
	register_seeder, run_seed,
};
pub use crate::settings::SeedingSettings;

// Persistence types
pub use crate::persistence::{InMemoryPersistence, PersistenceContext, PersistenceHandle};

// Command types
pub use crate::commands::{SeedArgs, SeedCommand, SeedOptions, SeedResult};

// Commonly needed alongside factory and seeder impls
pub use async_trait::async_trait;
pub use futures::future::BoxFuture;
