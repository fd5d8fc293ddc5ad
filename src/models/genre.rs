//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::form::{rule, sanitize_text, FieldError, FieldRule, FormRules, Rule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        genre_url(self.id)
    }
}

pub fn genre_url(id: i32) -> String {
    format!("/catalog/genre/{}", id)
}

pub const GENRE_LIST_URL: &str = "/catalog/genres";

/// Genre create/update form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreForm {
    pub name: String,
}

impl FormRules for GenreForm {
    const RULES: &'static [FieldRule] = &[rule("name", Rule::Required, "Genre name required")];

    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            _ => "",
        }
    }
}

impl GenreForm {
    pub fn sanitize(self) -> Self {
        Self { name: sanitize_text(&self.name) }
    }

    /// The genre name to persist
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let errors = self.check();
        if errors.is_empty() {
            Ok(self.name.clone())
        } else {
            Err(errors)
        }
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self { name: genre.name.clone() }
    }
}

/// Genre delete confirmation form
#[derive(Debug, Deserialize)]
pub struct DeleteGenreForm {
    pub id: i32,
}
