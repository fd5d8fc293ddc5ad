//! Genre service

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, genre::Genre},
    repository::Repository,
};

use super::{DeleteOutcome, WithBooks};

/// What a genre create request ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum GenreCreation {
    Created(Genre),
    /// A genre with the same name was already there
    Existing(Genre),
}

impl GenreCreation {
    pub fn genre(&self) -> &Genre {
        match self {
            GenreCreation::Created(genre) | GenreCreation::Existing(genre) => genre,
        }
    }
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Fetch a genre and its books concurrently
    pub async fn find_with_books(&self, id: i32) -> AppResult<WithBooks<Genre>> {
        let (entity, books) = tokio::try_join!(
            self.repository.genres.get(id),
            self.repository.books.list_by_genre(id),
        )?;
        Ok(WithBooks { entity, books })
    }

    pub async fn get_with_books(&self, id: i32) -> AppResult<(Genre, Vec<Book>)> {
        let found = self.find_with_books(id).await?;
        let genre = found.entity.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok((genre, found.books))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Genre> {
        self.repository
            .genres
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Create a genre unless one with exactly this name exists
    pub async fn create(&self, name: &str) -> AppResult<GenreCreation> {
        if let Some(existing) = self.repository.genres.find_by_name(name).await? {
            tracing::info!("Genre create: reusing existing genre id={}", existing.id);
            return Ok(GenreCreation::Existing(existing));
        }

        let genre = self.repository.genres.create(name).await?;
        tracing::info!("Genre created: id={}", genre.id);
        Ok(GenreCreation::Created(genre))
    }

    pub async fn update(&self, id: i32, name: &str) -> AppResult<Genre> {
        let genre = self
            .repository
            .genres
            .update(id, name)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        tracing::info!("Genre updated: id={}", genre.id);
        Ok(genre)
    }

    /// Delete a genre unless books are still tagged with it
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<Genre>> {
        let found = self.find_with_books(id).await?;
        if !found.books.is_empty() {
            tracing::warn!(
                "Genre delete blocked: id={} still has {} book(s)",
                id,
                found.books.len()
            );
            return Ok(DeleteOutcome::Blocked(found));
        }

        if self.repository.genres.delete(id).await? {
            tracing::info!("Genre deleted: id={}", id);
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::NewBook,
        repository::{genres::MockGenreStore, MemoryCatalog},
    };

    fn service() -> (GenresService, Arc<MemoryCatalog>) {
        let catalog = Arc::new(MemoryCatalog::new());
        (GenresService::new(Repository::in_memory(catalog.clone())), catalog)
    }

    #[tokio::test]
    async fn test_create_deduplicates_by_exact_name() {
        let (service, _) = service();
        let first = service.create("Fiction").await.unwrap();
        assert!(matches!(first, GenreCreation::Created(_)));

        let second = service.create("Fiction").await.unwrap();
        assert_eq!(second, GenreCreation::Existing(first.genre().clone()));

        // case-sensitive
        let lower = service.create("fiction").await.unwrap();
        assert!(matches!(lower, GenreCreation::Created(_)));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_blocked_by_books() {
        let (service, catalog) = service();
        let genre = service.create("Poetry").await.unwrap().genre().clone();
        catalog
            .insert_book(NewBook {
                title: "Odes".into(),
                author_id: 1,
                genre_ids: vec![genre.id],
                ..Default::default()
            })
            .await;

        assert!(matches!(service.delete(genre.id).await.unwrap(), DeleteOutcome::Blocked(_)));
        assert_eq!(service.get_by_id(genre.id).await.unwrap(), genre);
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let (service, _) = service();
        let genre = service.create("Poetry").await.unwrap().genre().clone();
        assert!(matches!(service.delete(genre.id).await.unwrap(), DeleteOutcome::Deleted));
        assert!(matches!(service.get_with_books(genre.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_lookup_failure_creates_nothing() {
        let catalog = Arc::new(MemoryCatalog::new());
        let mut genres = MockGenreStore::new();
        genres
            .expect_find_by_name()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        genres.expect_create().never();

        let mut repository = Repository::in_memory(catalog);
        repository.genres = Arc::new(genres);
        let service = GenresService::new(repository);

        assert!(matches!(service.create("Fiction").await, Err(AppError::Database(_))));
    }
}
