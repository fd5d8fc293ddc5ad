//! Book instance (copy) service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        book_instance::{BookInstance, BookInstanceData},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.book_instances.list().await
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<BookInstance>> {
        self.repository.book_instances.get(id).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookInstance> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Books offered by the copy form's selector
    pub async fn books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// A copy and the selectable books, fetched concurrently
    pub async fn get_with_books(&self, id: i32) -> AppResult<(BookInstance, Vec<Book>)> {
        let (instance, books) = tokio::try_join!(
            self.repository.book_instances.get(id),
            self.repository.books.list(),
        )?;
        let instance = instance.ok_or_else(|| AppError::NotFound("Book instance not found".to_string()))?;
        Ok((instance, books))
    }

    pub async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.create(data).await?;
        tracing::info!("Book instance created: id={} book={}", instance.id, instance.book_id);
        Ok(instance)
    }

    pub async fn update(&self, id: i32, data: &BookInstanceData) -> AppResult<BookInstance> {
        let instance = self
            .repository
            .book_instances
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound("Book instance not found".to_string()))?;
        tracing::info!("Book instance updated: id={}", instance.id);
        Ok(instance)
    }

    /// Copies have no dependents; deleting a missing copy is a no-op
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if self.repository.book_instances.delete(id).await? {
            tracing::info!("Book instance deleted: id={}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::{BookInstanceStatus, NewBook},
        repository::{books::MockBookStore, MemoryCatalog},
    };

    async fn seeded() -> (BookInstancesService, Book) {
        let catalog = Arc::new(MemoryCatalog::new());
        let book = catalog
            .insert_book(NewBook { title: "Emma".into(), author_id: 1, ..Default::default() })
            .await;
        (BookInstancesService::new(Repository::in_memory(catalog)), book)
    }

    fn copy_of(book: &Book) -> BookInstanceData {
        BookInstanceData {
            book_id: book.id,
            imprint: "Penguin Classics".into(),
            status: BookInstanceStatus::Available,
            due_back: None,
        }
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let (service, book) = seeded().await;
        let created = service.create(&copy_of(&book)).await.unwrap();
        assert_eq!(created.book_title.as_deref(), Some("Emma"));

        let (instance, books) = service.get_with_books(created.id).await.unwrap();
        assert_eq!(instance, created);
        assert_eq!(books, vec![book.clone()]);

        let loaned = BookInstanceData { status: BookInstanceStatus::Loaned, ..copy_of(&book) };
        let updated = service.update(created.id, &loaned).await.unwrap();
        assert_eq!(updated.status, BookInstanceStatus::Loaned);

        service.delete(created.id).await.unwrap();
        assert!(matches!(service.get_by_id(created.id).await, Err(AppError::NotFound(_))));
        assert!(service.find(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_copy() {
        let (service, book) = seeded().await;
        assert!(matches!(service.get_with_books(5).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.update(5, &copy_of(&book)).await, Err(AppError::NotFound(_))));
        assert!(service.delete(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_book_list_failure_propagates() {
        let catalog = Arc::new(MemoryCatalog::new());
        let mut books = MockBookStore::new();
        books
            .expect_list()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let mut repository = Repository::in_memory(catalog);
        repository.books = Arc::new(books);
        let service = BookInstancesService::new(repository);

        assert!(matches!(service.books().await, Err(AppError::Database(_))));
        assert!(matches!(service.get_with_books(1).await, Err(AppError::Database(_))));
    }
}
