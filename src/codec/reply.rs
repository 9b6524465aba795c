//! Reply classification: error windows first, fields only when both are empty.
//!
//! # Precedence
//! ```text
//! business window (per-operation offsets)  non-empty → Rejected
//!   else header window [67,73) / [73,123)   non-empty → Rejected
//!   else decode fields                      failure   → Malformed
//!                                           success   → Decoded
//! ```

use crate::catalog::{lookup_business, lookup_header, DomainError};
use crate::codec::error::DecodeError;
use crate::codec::fixed::FixedText;
use crate::codec::header::{
    RESPONSE_CODE_OFFSET, RESPONSE_CODE_WIDTH, RESPONSE_MESSAGE_OFFSET, RESPONSE_MESSAGE_WIDTH,
};
use crate::codec::layout::{decode_fields, ErrorWindow, Record, ReplyLayout, Span};

/// The header-technical error window, common to every operation.
pub const HEADER_WINDOW: ErrorWindow = ErrorWindow {
    code: Span::new(RESPONSE_CODE_OFFSET, RESPONSE_CODE_WIDTH),
    message: Span::new(RESPONSE_MESSAGE_OFFSET, RESPONSE_MESSAGE_WIDTH),
};

/// Outcome of decoding one reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// Both error windows were empty and every field decoded.
    Decoded(T),
    /// The backend signalled an error in one of the windows.
    Rejected(DomainError),
    /// The reply did not match the operation's layout.
    Malformed(DecodeError),
}

impl<T> Reply<T> {
    /// Build a typed value from a decoded one; failures become `Malformed`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, DecodeError>) -> Reply<U> {
        match self {
            Reply::Decoded(v) => match f(v) {
                Ok(u) => Reply::Decoded(u),
                Err(e) => Reply::Malformed(e),
            },
            Reply::Rejected(e) => Reply::Rejected(e),
            Reply::Malformed(e) => Reply::Malformed(e),
        }
    }
}

/// Read the code and message of an error window. `None` when the code is blank.
pub fn read_window(text: &FixedText, window: &ErrorWindow) -> Option<(String, String)> {
    let code = text.read_string(window.code.offset, window.code.width);
    if code.is_empty() {
        return None;
    }
    let message = text.read_string(window.message.offset, window.message.width);
    Some((code, message))
}

/// Check both error windows, business first.
pub fn extract_error(text: &FixedText, business: &ErrorWindow) -> Option<DomainError> {
    if let Some((code, message)) = read_window(text, business) {
        return Some(DomainError::with_legacy(lookup_business(&code), code, message));
    }
    if let Some((code, message)) = read_window(text, &HEADER_WINDOW) {
        return Some(DomainError::with_legacy(lookup_header(&code), code, message));
    }
    None
}

/// Classify and decode one reply line (already transcoded to Unicode).
pub fn decode_reply(layout: &ReplyLayout, line: &str) -> Reply<Record> {
    let text = FixedText::new(line);
    if let Some(err) = extract_error(&text, &layout.business) {
        return Reply::Rejected(err);
    }
    match decode_fields(layout, &text) {
        Ok(record) => Reply::Decoded(record),
        Err(e) => Reply::Malformed(e),
    }
}
