//! Legacy wire codec subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound:
//!     typed request
//!     → layout.rs (field table → fixed-width body)
//!     → header.rs (123-rune envelope prepended)
//!     → charset.rs (Unicode → legacy code page bytes)
//!
//! Inbound:
//!     reply bytes
//!     → charset.rs (legacy bytes → Unicode)
//!     → reply.rs (business window, then header window)
//!     → layout.rs (scalar fields, count, repeated blocks)
//!     → typed response
//! ```
//!
//! # Design Decisions
//! - Widths and offsets count runes; transcoding happens after padding
//! - One generic engine driven by per-operation field tables
//! - Decode results are a tagged enum, never an untyped payload

pub mod charset;
pub mod error;
pub mod fixed;
pub mod header;
pub mod layout;
pub mod reply;

pub use charset::EncodingError;
pub use error::{CodecError, DecodeError};
pub use header::{HeaderBuilder, HEADER_LEN};
pub use layout::{Field, FieldKind, Record, ReplyLayout, Value};
pub use reply::{decode_reply, Reply};
