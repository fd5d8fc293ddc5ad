//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod genres;

use crate::{error::AppResult, models::book::Book, repository::Repository};

/// An entity looked up together with the books that reference it.
///
/// The entity is optional because both lookups run concurrently and the
/// books are fetched by identifier whether or not the entity exists.
#[derive(Debug, Clone)]
pub struct WithBooks<T> {
    pub entity: Option<T>,
    pub books: Vec<Book>,
}

/// Result of a delete guarded by the dependents pre-check
#[derive(Debug, Clone)]
pub enum DeleteOutcome<T> {
    Deleted,
    /// Books still reference the entity; nothing was removed
    Blocked(WithBooks<T>),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub book_instances: book_instances::BookInstancesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            repository,
        }
    }

    /// Check the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}
