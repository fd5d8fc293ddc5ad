//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod form;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorData, AuthorForm};
pub use book::{Book, NewBook};
pub use book_instance::{BookInstance, BookInstanceData, BookInstanceForm, BookInstanceStatus};
pub use form::{FieldError, FormRules};
pub use genre::{Genre, GenreForm};
