//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use super::{
    author::format_date,
    book::Book,
    form::{date_input_value, parse_iso_date, rule, sanitize_text, FieldError, FieldRule, FormRules, Rule},
};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub const NAMES: &'static [&'static str] = &["Maintenance", "Available", "Loaned", "Reserved"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::str::FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown book instance status: {}", s))
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
    // Populated when queried with the book JOIN, None otherwise
    #[serde(default)]
    pub book_title: Option<String>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        book_instance_url(self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back)
    }
}

impl<'r> FromRow<'r, PgRow> for BookInstance {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            book_id: row.try_get("book_id")?,
            imprint: row.try_get("imprint")?,
            status: status.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: e.into(),
            })?,
            due_back: row.try_get("due_back")?,
            book_title: row.try_get("book_title").ok().flatten(),
        })
    }
}

pub fn book_instance_url(id: i32) -> String {
    format!("/catalog/bookinstance/{}", id)
}

pub const BOOK_INSTANCE_LIST_URL: &str = "/catalog/bookinstances";

/// Validated copy fields ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceData {
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Book instance create/update form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInstanceForm {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

impl FormRules for BookInstanceForm {
    const RULES: &'static [FieldRule] = &[
        rule("book", Rule::Identifier, "Book must be specified"),
        rule("imprint", Rule::Required, "Imprint must be specified"),
        rule("status", Rule::OneOf(BookInstanceStatus::NAMES), "Invalid status"),
        rule("due_back", Rule::IsoDate, "Invalid date"),
    ];

    fn field(&self, name: &str) -> &str {
        match name {
            "book" => &self.book,
            "imprint" => &self.imprint,
            "status" => &self.status,
            "due_back" => &self.due_back,
            _ => "",
        }
    }
}

impl BookInstanceForm {
    pub fn sanitize(self) -> Self {
        Self {
            book: sanitize_text(&self.book),
            imprint: sanitize_text(&self.imprint),
            status: sanitize_text(&self.status),
            due_back: self.due_back.trim().to_string(),
        }
    }

    /// Book id the form points at, if it parses
    pub fn selected_book(&self) -> Option<i32> {
        self.book.parse().ok()
    }

    pub fn validate(&self) -> Result<BookInstanceData, Vec<FieldError>> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(BookInstanceData {
            book_id: self.selected_book().unwrap_or_default(),
            imprint: self.imprint.clone(),
            status: self.status.parse().unwrap_or_default(),
            due_back: parse_iso_date(&self.due_back),
        })
    }

    /// Validate, also requiring the selected book to be one of `books`
    pub fn validate_against(&self, books: &[Book]) -> Result<BookInstanceData, Vec<FieldError>> {
        let known = |id: i32| books.iter().any(|book| book.id == id);
        let unknown_book = || Self::RULES[0].error(&self.book);
        match self.validate() {
            Ok(data) if known(data.book_id) => Ok(data),
            Ok(_) => Err(vec![unknown_book()]),
            Err(mut errors) => {
                let flagged = errors.first().is_some_and(|e| e.field == "book");
                if !flagged && !self.selected_book().is_some_and(known) {
                    errors.insert(0, unknown_book());
                }
                Err(errors)
            }
        }
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book_id.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: date_input_value(instance.due_back),
        }
    }
}

/// Book instance delete confirmation form
#[derive(Debug, Deserialize)]
pub struct DeleteBookInstanceForm {
    pub id: i32,
}
