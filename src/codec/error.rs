//! Error types for the message codec.

use thiserror::Error;

use crate::codec::layout::FieldKind;

/// A request that cannot be laid out into its fixed-width body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("layout expects {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("field {field}: expected a {expected:?} value")]
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
    },

    #[error("field {field}: value needs {len} positions but width is {width}")]
    Overflow {
        field: &'static str,
        width: usize,
        len: usize,
    },

    #[error("field {field}: amount must be non-negative and fit the scaled range")]
    InvalidAmount { field: &'static str },
}

/// A reply whose shape does not match its operation's layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reply too short: need {needed} runes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("field {field}: invalid number {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("field {field}: invalid date {raw:?}")]
    InvalidDate { field: &'static str, raw: String },

    #[error("field {field}: invalid time {raw:?}")]
    InvalidTime { field: &'static str, raw: String },

    #[error("field {field} missing from decoded record")]
    MissingField { field: &'static str },

    #[error("field {field} decoded with an unexpected kind")]
    WrongKind { field: &'static str },
}
