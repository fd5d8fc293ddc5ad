//! Submitted-form validation and sanitization.
//!
//! Each form declares an ordered list of `(field, rule, message)` entries.
//! Forms are sanitized first (trimmed, HTML-escaped) and the rules then run
//! against the sanitized values, so the errors come back in declaration order.

use std::borrow::Cow;

use chrono::{Days, NaiveDate, NaiveTime, Weekday};
use validator::{ValidateLength, ValidateRange, ValidationError};

/// A single check applied to one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty once trimmed
    Required,
    /// ASCII letters and digits only; an empty value fails
    Alphanumeric,
    /// Empty, or an ISO-8601 date / timestamp
    IsoDate,
    /// A numeric record identifier; an empty value fails
    Identifier,
    /// Empty, or one of the listed values
    OneOf(&'static [&'static str]),
}

impl Rule {
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Alphanumeric => "alphanumeric",
            Rule::IsoDate => "iso8601",
            Rule::Identifier => "identifier",
            Rule::OneOf(_) => "one_of",
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Rule::Required => value.trim().validate_length(Some(1), None, None),
            Rule::Alphanumeric => {
                value.validate_length(Some(1), None, None) && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            Rule::IsoDate => value.is_empty() || parse_iso_date(value).is_some(),
            Rule::Identifier => value
                .parse::<i32>()
                .is_ok_and(|id| id.validate_range(Some(1), None, None, None)),
            Rule::OneOf(allowed) => value.is_empty() || allowed.contains(&value),
        }
    }

    /// Run the rule the way a `validator` custom function does
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::new(self.code()))
        }
    }
}

/// One declared rule for a named field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

pub const fn rule(field: &'static str, rule: Rule, message: &'static str) -> FieldRule {
    FieldRule { field, rule, message }
}

impl FieldRule {
    /// The failure this declaration reports for `value`
    pub fn error(&self, value: &str) -> FieldError {
        let mut error = ValidationError::new(self.rule.code());
        error.message = Some(Cow::Borrowed(self.message));
        error.add_param(Cow::Borrowed("value"), &value);
        FieldError { field: self.field, error }
    }
}

/// A failed rule, tagged with the field it was declared on
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub error: ValidationError,
}

impl FieldError {
    pub fn message(&self) -> &str {
        self.error.message.as_deref().unwrap_or_default()
    }
}

/// A submitted form with declared rules
pub trait FormRules {
    const RULES: &'static [FieldRule];

    /// Current value of a declared field
    fn field(&self, name: &str) -> &str;

    /// Apply every rule in order, collecting the failures
    fn check(&self) -> Vec<FieldError> {
        Self::RULES
            .iter()
            .filter_map(|declared| {
                let value = self.field(declared.field);
                declared.rule.validate(value).err().map(|_| declared.error(value))
            })
            .collect()
    }
}

/// Trim and HTML-escape a text field
pub fn sanitize_text(value: &str) -> String {
    handlebars::html_escape(value.trim())
}

/// Parse an ISO-8601 date or timestamp, keeping the calendar date.
///
/// Accepts extended and basic forms with reduced precision (`1817`,
/// `1817-07`, `18170718`), ordinal (`1817-199`) and week (`1817-W29-5`)
/// dates, optionally followed by a time with fractional seconds and an
/// offset. Reduced forms resolve to their first day.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !value.is_ascii() {
        return None;
    }
    let (date, time) = match value.find(|c: char| matches!(c, 'T' | 't' | ' ')) {
        Some(at) => (&value[..at], Some(&value[at + 1..])),
        None => (value, None),
    };
    if time.is_some_and(|time| !is_iso_time(time)) {
        return None;
    }
    parse_calendar_date(date)
}

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 {
        digits(s)
    } else {
        None
    }
}

fn parse_calendar_date(date: &str) -> Option<NaiveDate> {
    let year = digits(date.get(..4)?)? as i32;
    let rest = &date[4..];
    if rest.is_empty() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    let (body, extended) = match rest.strip_prefix('-') {
        Some(body) => (body, true),
        None => (rest, false),
    };

    if let Some(week) = body.strip_prefix('W') {
        let number = two_digits(week.get(..2)?)?;
        let day = match (&week[2..], extended) {
            ("", _) => 1,
            (day, true) => digits(day.strip_prefix('-')?).filter(|_| day.len() == 2)?,
            (day, false) => digits(day).filter(|_| day.len() == 1)?,
        };
        if !(1..=7).contains(&day) {
            return None;
        }
        let monday = NaiveDate::from_isoywd_opt(year, number, Weekday::Mon)?;
        return monday.checked_add_days(Days::new(u64::from(day - 1)));
    }

    match (body.len(), extended) {
        (2, true) => NaiveDate::from_ymd_opt(year, two_digits(body)?, 1),
        (3, _) => NaiveDate::from_yo_opt(year, digits(body)?),
        (4, false) => NaiveDate::from_ymd_opt(year, two_digits(&body[..2])?, two_digits(&body[2..])?),
        (5, true) if &body[2..3] == "-" => {
            NaiveDate::from_ymd_opt(year, two_digits(&body[..2])?, two_digits(&body[3..])?)
        }
        _ => None,
    }
}

/// `HH[:MM[:SS]][.fff]` or basic `HH[MM[SS]]`, then `Z` or `±HH[:MM]`
fn is_iso_time(time: &str) -> bool {
    let time = time
        .strip_suffix('Z')
        .or_else(|| time.strip_suffix('z'))
        .unwrap_or(time);
    let (clock, offset) = match time.rfind(|c: char| c == '+' || c == '-') {
        Some(at) => (&time[..at], Some(&time[at + 1..])),
        None => (time, None),
    };
    if let Some(offset) = offset {
        let offset = offset.replace(':', "");
        let valid = match offset.len() {
            2 => two_digits(&offset).is_some_and(|h| h < 24),
            4 => two_digits(&offset[..2]).is_some_and(|h| h < 24) && two_digits(&offset[2..]).is_some_and(|m| m < 60),
            _ => false,
        };
        if !valid {
            return false;
        }
    }

    let (clock, fraction) = match clock.find(|c: char| c == '.' || c == ',') {
        Some(at) => (&clock[..at], Some(&clock[at + 1..])),
        None => (clock, None),
    };
    if fraction.is_some_and(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit())) {
        return false;
    }

    let fields: Option<Vec<u32>> = if clock.contains(':') {
        clock.split(':').map(two_digits).collect()
    } else if clock.len() % 2 == 0 {
        (0..clock.len()).step_by(2).map(|at| two_digits(&clock[at..at + 2])).collect()
    } else {
        None
    };
    match fields.as_deref() {
        Some([h]) => NaiveTime::from_hms_opt(*h, 0, 0).is_some(),
        Some([h, m]) => NaiveTime::from_hms_opt(*h, *m, 0).is_some(),
        Some([h, m, s]) => NaiveTime::from_hms_opt(*h, *m, *s).is_some(),
        _ => false,
    }
}

/// Date as the `YYYY-MM-DD` value an `<input type="date">` expects
pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}
