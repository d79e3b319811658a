//! Field-level checks shared by the request types.
//!
//! Request structs collect every violation into a [`FieldErrors`] and convert it into a single
//! `AppError::Validation`, so a client sees all bad fields in one response.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, problem: impl Display) {
        self.0.push(format!("{field} {problem}"));
    }

    /// Trim `value` and check its length in characters. Returns the trimmed value when valid.
    pub fn name(&mut self, field: &str, value: &str, max: usize) -> Option<String> {
        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if length == 0 || length > max {
            self.add(field, format_args!("must be between 1 and {max} characters"));
            return None;
        }

        Some(trimmed.to_string())
    }

    /// Parse one of a closed set of values; `allowed` is only used for the message.
    pub fn one_of<T: FromStr>(&mut self, field: &str, value: &str, allowed: &str) -> Option<T> {
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.add(field, format_args!("must be one of: {allowed}"));
                None
            }
        }
    }

    pub fn uuid(&mut self, field: &str, value: &str) -> Option<Uuid> {
        match Uuid::parse_str(value.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                self.add(field, "must be a valid UUID");
                None
            }
        }
    }

    pub fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(value.trim(), DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, "must be a date in YYYY-MM-DD format");
                None
            }
        }
    }

    /// Exactly three characters, normalized to upper case.
    pub fn currency(&mut self, field: &str, value: &str) -> Option<String> {
        let value = value.trim();

        if value.chars().count() != 3 {
            self.add(field, "must be exactly 3 characters");
            return None;
        }

        Some(value.to_uppercase())
    }

    /// Turn the collected errors into a result, yielding `value` when nothing was recorded.
    ///
    /// `value` is built lazily because it usually unwraps the `Option`s returned by the checks
    /// above, which are only all `Some` when no error was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

/// Treat empty query values (`?status=`) as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
