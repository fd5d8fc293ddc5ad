//! Author service

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorData},
        book::Book,
    },
    repository::Repository,
};

use super::{DeleteOutcome, WithBooks};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Fetch an author and their books concurrently
    pub async fn find_with_books(&self, id: i32) -> AppResult<WithBooks<Author>> {
        let (entity, books) = tokio::try_join!(
            self.repository.authors.get(id),
            self.repository.books.list_by_author(id),
        )?;
        Ok(WithBooks { entity, books })
    }

    /// Author and books for the detail page; the author must exist
    pub async fn get_with_books(&self, id: i32) -> AppResult<(Author, Vec<Book>)> {
        let found = self.find_with_books(id).await?;
        let author = found.entity.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok((author, found.books))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    pub async fn create(&self, data: &AuthorData) -> AppResult<Author> {
        let author = self.repository.authors.create(data).await?;
        tracing::info!("Author created: id={} ({})", author.id, author.name());
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: &AuthorData) -> AppResult<Author> {
        let author = self
            .repository
            .authors
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        tracing::info!("Author updated: id={}", author.id);
        Ok(author)
    }

    /// Delete an author unless books still reference them
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<Author>> {
        let found = self.find_with_books(id).await?;
        if !found.books.is_empty() {
            tracing::warn!(
                "Author delete blocked: id={} still has {} book(s)",
                id,
                found.books.len()
            );
            return Ok(DeleteOutcome::Blocked(found));
        }

        if self.repository.authors.delete(id).await? {
            tracing::info!("Author deleted: id={}", id);
        }
        Ok(DeleteOutcome::Deleted)
    }
}
