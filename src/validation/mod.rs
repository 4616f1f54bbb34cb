//! Rule checks for candidate client records.
//!
//! Every rule runs on its own and all violations are reported together.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Client, ClientData, ClientDraft, ClientField};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex"));

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const EMAIL_DUPLICATE: &str = "A client with this email already exists";
pub const STATUS_REQUIRED: &str = "Status is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    RequiredField,
    InvalidFormat,
    DuplicateValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(kind: ValidationErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }
}

/// Field-scoped errors from a failed validation, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<ClientField, FieldError>);

impl ValidationErrors {
    pub fn get(&self, field: ClientField) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClientField, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    pub fn insert(&mut self, field: ClientField, error: FieldError) {
        self.0.insert(field, error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.iter().map(|(_, error)| error.message).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Check `draft` against the static rules and against `clients` for email uniqueness.
///
/// `existing` is the record being edited; its own email never counts as a duplicate.
/// Name and email are trimmed; phone is never checked.
pub fn validate(
    draft: &ClientDraft,
    existing: Option<&Client>,
    clients: &[Client],
) -> Result<ClientData, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let name = draft.name.trim();
    let email = draft.email.trim();

    if name.is_empty() {
        errors.insert(
            ClientField::Name,
            FieldError::new(ValidationErrorKind::RequiredField, NAME_REQUIRED),
        );
    }

    if email.is_empty() {
        errors.insert(
            ClientField::Email,
            FieldError::new(ValidationErrorKind::RequiredField, EMAIL_REQUIRED),
        );
    } else if !is_valid_email(email) {
        errors.insert(
            ClientField::Email,
            FieldError::new(ValidationErrorKind::InvalidFormat, EMAIL_INVALID),
        );
    } else if is_duplicate_email(email, existing, clients) {
        errors.insert(
            ClientField::Email,
            FieldError::new(ValidationErrorKind::DuplicateValue, EMAIL_DUPLICATE),
        );
    }

    if draft.status.is_none() {
        errors.insert(
            ClientField::Status,
            FieldError::new(ValidationErrorKind::RequiredField, STATUS_REQUIRED),
        );
    }

    match draft.status {
        Some(status) if errors.is_empty() => Ok(ClientData {
            name: name.to_string(),
            email: email.to_string(),
            phone: draft.phone.trim().to_string(),
            status,
        }),
        _ => Err(errors),
    }
}

/// Exact, case-sensitive comparison against every other record.
pub fn is_duplicate_email(email: &str, existing: Option<&Client>, clients: &[Client]) -> bool {
    clients
        .iter()
        .any(|client| client.email == email && existing.is_none_or(|current| current.id != client.id))
}
