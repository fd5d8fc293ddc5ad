//! In-process catalog implementing every store trait

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreStore};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorData},
        book::{Book, NewBook},
        book_instance::{BookInstance, BookInstanceData},
        genre::Genre,
    },
};

/// Rows of one table plus its id sequence
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), last_id: 0 }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

struct StoredBook {
    book: Book,
    genre_ids: Vec<i32>,
}

#[derive(Default)]
struct CatalogData {
    authors: Table<Author>,
    genres: Table<Genre>,
    books: Table<StoredBook>,
    book_instances: Table<BookInstance>,
}

impl CatalogData {
    fn with_title(&self, mut instance: BookInstance) -> BookInstance {
        instance.book_title = self
            .books
            .rows
            .get(&instance.book_id)
            .map(|stored| stored.book.title.clone());
        instance
    }

    fn books_where(&self, keep: impl Fn(&StoredBook) -> bool) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .books
            .rows
            .values()
            .filter(|stored| keep(stored))
            .map(|stored| stored.book.clone())
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        books
    }
}

/// Catalog kept entirely in memory, guarded by a single lock
#[derive(Default)]
pub struct MemoryCatalog {
    data: RwLock<CatalogData>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book; books have no write path through the controllers
    pub async fn insert_book(&self, new_book: NewBook) -> Book {
        let mut data = self.data.write().await;
        let id = data.books.next_id();
        let book = Book {
            id,
            title: new_book.title,
            summary: new_book.summary,
            author_id: new_book.author_id,
        };
        data.books.rows.insert(
            id,
            StoredBook {
                book: book.clone(),
                genre_ids: new_book.genre_ids,
            },
        );
        book
    }
}

#[async_trait]
impl AuthorStore for MemoryCatalog {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let data = self.data.read().await;
        let mut authors: Vec<Author> = data.authors.rows.values().cloned().collect();
        authors.sort_by(|a, b| a.family_name.cmp(&b.family_name));
        Ok(authors)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        Ok(self.data.read().await.authors.rows.get(&id).cloned())
    }

    async fn create(&self, author: &AuthorData) -> AppResult<Author> {
        let mut data = self.data.write().await;
        let id = data.authors.next_id();
        let created = Author {
            id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        };
        data.authors.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, author: &AuthorData) -> AppResult<Option<Author>> {
        let mut data = self.data.write().await;
        Ok(data.authors.rows.get_mut(&id).map(|existing| {
            existing.first_name = author.first_name.clone();
            existing.family_name = author.family_name.clone();
            existing.date_of_birth = author.date_of_birth;
            existing.date_of_death = author.date_of_death;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.data.write().await.authors.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl GenreStore for MemoryCatalog {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let data = self.data.read().await;
        let mut genres: Vec<Genre> = data.genres.rows.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Genre>> {
        Ok(self.data.read().await.genres.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let data = self.data.read().await;
        Ok(data.genres.rows.values().find(|genre| genre.name == name).cloned())
    }

    async fn create(&self, name: &str) -> AppResult<Genre> {
        let mut data = self.data.write().await;
        let id = data.genres.next_id();
        let genre = Genre { id, name: name.to_string() };
        data.genres.rows.insert(id, genre.clone());
        Ok(genre)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Genre>> {
        let mut data = self.data.write().await;
        Ok(data.genres.rows.get_mut(&id).map(|genre| {
            genre.name = name.to_string();
            genre.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.data.write().await.genres.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl BookInstanceStore for MemoryCatalog {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let data = self.data.read().await;
        Ok(data
            .book_instances
            .rows
            .values()
            .map(|instance| data.with_title(instance.clone()))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let data = self.data.read().await;
        Ok(data
            .book_instances
            .rows
            .get(&id)
            .map(|instance| data.with_title(instance.clone())))
    }

    async fn create(&self, instance: &BookInstanceData) -> AppResult<BookInstance> {
        let mut data = self.data.write().await;
        let id = data.book_instances.next_id();
        let created = BookInstance {
            id,
            book_id: instance.book_id,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
            book_title: None,
        };
        data.book_instances.rows.insert(id, created.clone());
        Ok(data.with_title(created))
    }

    async fn update(&self, id: i32, instance: &BookInstanceData) -> AppResult<Option<BookInstance>> {
        let mut data = self.data.write().await;
        let updated = data.book_instances.rows.get_mut(&id).map(|existing| {
            existing.book_id = instance.book_id;
            existing.imprint = instance.imprint.clone();
            existing.status = instance.status;
            existing.due_back = instance.due_back;
            existing.clone()
        });
        Ok(updated.map(|instance| data.with_title(instance)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.data.write().await.book_instances.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl BookStore for MemoryCatalog {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.data.read().await.books_where(|_| true))
    }

    async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        Ok(self
            .data
            .read()
            .await
            .books_where(|stored| stored.book.author_id == author_id))
    }

    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        Ok(self
            .data
            .read()
            .await
            .books_where(|stored| stored.genre_ids.contains(&genre_id)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
