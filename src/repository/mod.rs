//! Repository layer for catalog storage
//!
//! Each entity kind has its own store trait. The PostgreSQL implementations
//! live next to the trait they implement; `memory` implements all of them
//! over a single in-process catalog.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorStore;
pub use book_instances::BookInstanceStore;
pub use books::BookStore;
pub use genres::GenreStore;
pub use memory::MemoryCatalog;

/// Main repository struct holding one store per entity kind
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    /// Create a repository backed by an in-process catalog
    pub fn in_memory(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            authors: catalog.clone(),
            genres: catalog.clone(),
            book_instances: catalog.clone(),
            books: catalog,
        }
    }
}
