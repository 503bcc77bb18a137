//! Request payload validation
//!
//! Turns untrusted payloads into [`AuthorInput`] / [`BookInput`] or a map of
//! per-field messages. The duplicate-title rule needs the database, so book
//! validation is async and takes the books repository.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::{AuthorInput, AuthorPayload, BookInput, BookPayload},
    repository::books::BooksRepository,
};

const MISSING_FIELD: &str = "Missing data for required field.";

/// Field name to validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merge `other` with every field renamed to `prefix.field`
    pub fn merge_nested(&mut self, prefix: &str, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0
                .entry(format!("{}.{}", prefix, field))
                .or_default()
                .extend(messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Validate an author payload
pub fn validate_author(payload: AuthorPayload) -> Result<AuthorInput, FieldErrors> {
    let mut errors = match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    match (payload.first_name, payload.last_name) {
        (Some(first_name), Some(last_name)) if errors.is_empty() => Ok(AuthorInput {
            author_id: payload.author_id,
            first_name,
            middle_name: payload.middle_name,
            last_name,
        }),
        _ => {
            if errors.is_empty() {
                errors.add("_schema", "Invalid author data.");
            }
            Err(errors)
        }
    }
}

/// Validate a book payload, rejecting titles already in use.
///
/// `current_id` names the book being replaced, whose own title does not count
/// as a duplicate.
pub async fn validate_book(
    books: &BooksRepository,
    payload: BookPayload,
    current_id: Option<i64>,
) -> AppResult<BookInput> {
    let mut errors = match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if let Some(ref title) = payload.title {
        if let Some(existing) = books.get_by_title(title).await? {
            if Some(existing.id) != current_id {
                errors.add("title", duplicate_title_message(title));
            }
        }
    }

    let author = match payload.author {
        Some(author) => match validate_author(author) {
            Ok(author) => Some(author),
            Err(nested) => {
                errors.merge_nested("author", nested);
                None
            }
        },
        None => {
            errors.add("author", MISSING_FIELD);
            None
        }
    };

    match (payload.title, author) {
        (Some(title), Some(author)) if errors.is_empty() => Ok(BookInput { title, author }),
        _ => Err(AppError::Validation(errors)),
    }
}

pub fn duplicate_title_message(title: &str) -> String {
    format!("A book with this title {} already exists.", title)
}
