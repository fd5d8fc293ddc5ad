//! View models: entities plus the derived fields templates display

use serde::Serialize;

use crate::models::{
    author::{format_date, Author},
    book::Book,
    book_instance::{BookInstance, BookInstanceStatus},
    form::FieldError,
    genre::Genre,
};

#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub id: i32,
    pub url: String,
    pub name: String,
    pub first_name: String,
    pub family_name: String,
    pub lifespan: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            url: author.url(),
            name: author.name(),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            lifespan: author.lifespan(),
            date_of_birth: format_date(author.date_of_birth),
            date_of_death: format_date(author.date_of_death),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreView {
    pub id: i32,
    pub url: String,
    pub name: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            url: genre.url(),
            name: genre.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookView {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub summary: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            url: book.url(),
            title: book.title.clone(),
            summary: book.summary.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookInstanceView {
    pub id: i32,
    pub url: String,
    pub book_id: i32,
    pub book_url: String,
    pub book_title: String,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: String,
    pub is_available: bool,
    pub is_maintenance: bool,
}

impl From<&BookInstance> for BookInstanceView {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: instance.id,
            url: instance.url(),
            book_id: instance.book_id,
            book_url: format!("/catalog/book/{}", instance.book_id),
            book_title: instance.book_title.clone().unwrap_or_default(),
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back_formatted(),
            is_available: instance.status == BookInstanceStatus::Available,
            is_maintenance: instance.status == BookInstanceStatus::Maintenance,
        }
    }
}

/// One entry of the book selector on copy forms
#[derive(Debug, Serialize)]
pub struct BookOption {
    pub id: i32,
    pub title: String,
    pub selected: bool,
}

impl BookOption {
    pub fn list(books: &[Book], selected: Option<i32>) -> Vec<Self> {
        books
            .iter()
            .map(|book| Self {
                id: book.id,
                title: book.title.clone(),
                selected: Some(book.id) == selected,
            })
            .collect()
    }
}

/// One entry of the status selector on copy forms
#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

impl StatusOption {
    /// All statuses; an unrecognised selection falls back to the default
    pub fn list(selected: &str) -> Vec<Self> {
        let selected = selected.parse::<BookInstanceStatus>().unwrap_or_default();
        BookInstanceStatus::ALL
            .iter()
            .map(|status| Self {
                value: status.as_str(),
                selected: *status == selected,
            })
            .collect()
    }
}

/// Field error as shown next to a form
#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub param: &'static str,
    pub msg: String,
}

impl ErrorView {
    pub fn list(errors: &[FieldError]) -> Vec<Self> {
        errors
            .iter()
            .map(|e| Self {
                param: e.field,
                msg: e.message().to_string(),
            })
            .collect()
    }
}
