//! Book model (read-only from the catalog controllers)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub author_id: i32,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Book record for seeding a store
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub summary: String,
    pub author_id: i32,
    pub genre_ids: Vec<i32>,
}
