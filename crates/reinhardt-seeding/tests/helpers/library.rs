//! A small library domain: authors, books, and seeders populating them.

use std::sync::Arc;

use reinhardt_seeding::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
	pub id: Option<u64>,
	pub name: String,
	pub email: String,
}

impl Model for Author {
	fn model_id() -> &'static str {
		"library.Author"
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
	pub id: Option<u64>,
	pub title: String,
	pub isbn: String,
	pub author: Option<Author>,
}

impl Model for Book {
	fn model_id() -> &'static str {
		"library.Book"
	}
}

/// `{name, email}`, both freshly generated per author.
pub struct AuthorFactory;

#[async_trait]
impl Factory for AuthorFactory {
	type Model = Author;

	async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
		Ok(Attributes::new()
			.with_value("name", FakerType::Name.lazy())
			.with_value("email", FakerType::Email.lazy()))
	}
}

/// Builds the author inline unless one is supplied, and derives the title from it.
pub struct BookFactory {
	pub authors: FactoryBuilder<AuthorFactory>,
}

impl BookFactory {
	pub fn new(em: PersistenceHandle) -> Self {
		Self {
			authors: AuthorFactory.bind(em),
		}
	}
}

#[async_trait]
impl Factory for BookFactory {
	type Model = Book;

	async fn definition(&self, params: &Attributes) -> SeedingResult<Attributes> {
		let mut attributes = Attributes::new();
		if !params.contains_key("author") {
			let authors = self.authors.clone();
			attributes = attributes.with_related("author", move |_| {
				let authors = authors.clone();
				async move { authors.make_one(None).await }
			});
		}
		Ok(attributes
			.with_lazy("title", |resolved| {
				let name = resolved
					.get("author")
					.and_then(|author| author.get("name"))
					.and_then(|name| name.as_str())
					.unwrap_or("Anonymous")
					.to_string();
				async move { Ok::<_, SeedingError>(format!("Collected Works of {}", name).into()) }
			})
			.with_value("isbn", Sequence::new("library.book.isbn", "978-{n}").lazy()))
	}
}

/// Always fails its definition.
pub struct BrokenFactory;

#[async_trait]
impl Factory for BrokenFactory {
	type Model = Author;

	async fn definition(&self, _params: &Attributes) -> SeedingResult<Attributes> {
		Err(SeedingError::ValidationError {
			field: "name".to_string(),
			message: "no names left".to_string(),
		})
	}
}

/// Creates two authors and stores their ids under `"author_ids"`.
#[derive(Default)]
pub struct AuthorSeeder;

#[async_trait]
impl Seeder for AuthorSeeder {
	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
		let authors = AuthorFactory.bind(Arc::clone(em)).create(2, None).await?;
		let ids: Vec<u64> = authors.iter().filter_map(|a| a.id).collect();
		context.insert("author_ids", ids);
		Ok(())
	}
}

/// Creates one book per author id found in the context.
#[derive(Default)]
pub struct BookSeeder;

#[async_trait]
impl Seeder for BookSeeder {
	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
		let ids = context.require::<Vec<u64>>("author_ids")?.clone();
		let books = BookFactory::new(Arc::clone(em)).bind(Arc::clone(em));
		for id in &ids {
			let author = Author {
				id: Some(*id),
				..Author::default()
			};
			let overrides = Attributes::new().with("author", serde_json::to_value(author)?);
			books.create_one(Some(overrides)).await?;
		}
		context.insert("books_seeded", ids.len());
		Ok(())
	}
}

/// Calls the author and book seeders in order.
#[derive(Default)]
pub struct DatabaseSeeder;

#[async_trait]
impl Seeder for DatabaseSeeder {
	async fn run(&self, em: &PersistenceHandle, context: &mut SharedContext) -> SeedingResult<()> {
		self.call(
			em,
			context,
			&[SeederRef::of::<AuthorSeeder>(), SeederRef::of::<BookSeeder>()],
		)
		.await
	}
}

/// Fails after registering one author.
#[derive(Default)]
pub struct FailingSeeder;

#[async_trait]
impl Seeder for FailingSeeder {
	async fn run(&self, em: &PersistenceHandle, _context: &mut SharedContext) -> SeedingResult<()> {
		AuthorFactory.bind(Arc::clone(em)).create_one(None).await?;
		Err(SeedingError::unit_run(self.name(), "library is closed"))
	}
}

pub fn memory() -> Arc<InMemoryPersistence> {
	Arc::new(InMemoryPersistence::new())
}

pub fn registry() -> SeederRegistry {
	let registry = SeederRegistry::new();
	registry.register::<AuthorSeeder>("AuthorSeeder");
	registry.register::<BookSeeder>("BookSeeder");
	registry.register::<DatabaseSeeder>("DatabaseSeeder");
	registry.register::<FailingSeeder>("FailingSeeder");
	registry
}
