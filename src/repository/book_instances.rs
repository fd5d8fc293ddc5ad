//! Book instance storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, BookInstanceData},
};

/// Copies are always returned with their book's title attached
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BookInstance>>;

    async fn get(&self, id: i32) -> AppResult<Option<BookInstance>>;

    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance>;

    async fn update(&self, id: i32, data: &BookInstanceData) -> AppResult<Option<BookInstance>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

const SELECT_WITH_TITLE: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} ORDER BY bi.id", SELECT_WITH_TITLE);
        let rows = sqlx::query_as::<_, BookInstance>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_TITLE);
        let row = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            WITH inserted AS (
                INSERT INTO book_instances (book_id, imprint, status, due_back)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT i.id, i.book_id, i.imprint, i.status, i.due_back, b.title AS book_title
            FROM inserted i
            LEFT JOIN books b ON b.id = i.book_id
            "#,
        )
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, data: &BookInstanceData) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            WITH updated AS (
                UPDATE book_instances
                SET book_id = $1, imprint = $2, status = $3, due_back = $4
                WHERE id = $5
                RETURNING *
            )
            SELECT u.id, u.book_id, u.imprint, u.status, u.due_back, b.title AS book_title
            FROM updated u
            LEFT JOIN books b ON b.id = u.book_id
            "#,
        )
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
