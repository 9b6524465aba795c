//! Catalog entry and domain error types.

use thiserror::Error;

/// Outward status class of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    BadRequest,
    NotFound,
    Conflict,
    Unprocessable,
    Internal,
    ServiceUnavailable,
    GatewayTimeout,
}

impl StatusClass {
    /// Equivalent HTTP status code.
    pub fn as_u16(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::NotFound => 404,
            StatusClass::Conflict => 409,
            StatusClass::Unprocessable => 422,
            StatusClass::Internal => 500,
            StatusClass::ServiceUnavailable => 503,
            StatusClass::GatewayTimeout => 504,
        }
    }
}

/// A stable catalog entry.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorEntry {
    pub code: &'static str,
    pub message: &'static str,
    pub status: StatusClass,
}

/// A catalog entry resolved for one call, with the backend's raw code and
/// message preserved for audit and display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .entry.code, .entry.message)]
pub struct DomainError {
    pub entry: &'static ErrorEntry,
    pub legacy_code: Option<String>,
    pub legacy_message: Option<String>,
}

impl DomainError {
    pub fn new(entry: &'static ErrorEntry) -> Self {
        Self {
            entry,
            legacy_code: None,
            legacy_message: None,
        }
    }

    pub fn with_legacy(
        entry: &'static ErrorEntry,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entry,
            legacy_code: Some(code.into()),
            legacy_message: Some(message.into()),
        }
    }

    pub fn code(&self) -> &'static str {
        self.entry.code
    }

    pub fn message(&self) -> &'static str {
        self.entry.message
    }

    pub fn status(&self) -> StatusClass {
        self.entry.status
    }
}
