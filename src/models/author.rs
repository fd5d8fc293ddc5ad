//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::form::{date_input_value, parse_iso_date, rule, sanitize_text, FieldError, FieldRule, FormRules, Rule};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    pub fn url(&self) -> String {
        author_url(self.id)
    }
}

pub fn author_url(id: i32) -> String {
    format!("/catalog/author/{}", id)
}

pub const AUTHOR_LIST_URL: &str = "/catalog/authors";

/// Display format for calendar dates, e.g. "Dec 16, 1775"
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string()).unwrap_or_default()
}

/// Validated author fields ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorData {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author create/update form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorForm {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl FormRules for AuthorForm {
    const RULES: &'static [FieldRule] = &[
        rule("first_name", Rule::Required, "First name must be specified."),
        rule("first_name", Rule::Alphanumeric, "First name has non-alphanumeric characters."),
        rule("family_name", Rule::Required, "Family name must be specified."),
        rule("family_name", Rule::Alphanumeric, "Family name has non-alphanumeric characters."),
        rule("date_of_birth", Rule::IsoDate, "Invalid date of birth"),
        rule("date_of_death", Rule::IsoDate, "Invalid date of death"),
    ];

    fn field(&self, name: &str) -> &str {
        match name {
            "first_name" => &self.first_name,
            "family_name" => &self.family_name,
            "date_of_birth" => &self.date_of_birth,
            "date_of_death" => &self.date_of_death,
            _ => "",
        }
    }
}

impl AuthorForm {
    pub fn sanitize(self) -> Self {
        Self {
            first_name: sanitize_text(&self.first_name),
            family_name: sanitize_text(&self.family_name),
            date_of_birth: self.date_of_birth.trim().to_string(),
            date_of_death: self.date_of_death.trim().to_string(),
        }
    }

    /// Run the declared rules; on success produce the fields to persist
    pub fn validate(&self) -> Result<AuthorData, Vec<FieldError>> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(AuthorData {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: parse_iso_date(&self.date_of_birth),
            date_of_death: parse_iso_date(&self.date_of_death),
        })
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: date_input_value(author.date_of_birth),
            date_of_death: date_input_value(author.date_of_death),
        }
    }
}

/// Author delete confirmation form
#[derive(Debug, Deserialize)]
pub struct DeleteAuthorForm {
    pub authorid: i32,
}
