//! Factory system for generating model instances.
//!
//! A [`Factory`] supplies the default attributes of one [`Model`]; binding it
//! to a persistence context yields a [`FactoryBuilder`] with the generation
//! surface:
//!
//! - `make` / `make_one` build entities in memory
//! - `create` / `create_one` build, register and flush, together with the
//!   related entities built along the way
//! - `each` adds a hook applied to every built entity
//!
//! Related entities are built either inline in the definition (see
//! [`LazyValue::related`]) or from an `each` hook.
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_seeding::prelude::*;
//!
//! struct BookFactory;
//!
//! #[async_trait]
//! impl Factory for BookFactory {
//!     type Model = Book;
//!
//!     async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
//!         Ok(Attributes::new()
//!             .with_value("title", FakerType::Sentence.lazy())
//!             .with_value("isbn", Sequence::new("book.isbn", "978-{n}").lazy()))
//!     }
//! }
//!
//! let books = BookFactory.bind(em).create(3, None).await?;
//! ```

mod attributes;
mod builder;
mod faker;
mod registry;
mod relation;
mod resolver;
mod sequence;
mod traits;

pub use attributes::{AttributeValue, Attributes, LazyKind, LazyValue};
pub use builder::FactoryBuilder;
pub use faker::{FakerType, generate_fake};
pub use registry::{
	DynFactory, FactoryRegistry, clear_factories, factory_count, factory_for,
	factory_model_ids, get_factory, has_factory, register_factory, unregister_factory,
};
pub use relation::{EachHook, RelationHooks, each_hook, related};
pub use resolver::AttributeResolver;
pub use sequence::{Sequence, reset_sequence, reset_sequences, sequence};
pub use traits::{Factory, FactoryExt, Model};
