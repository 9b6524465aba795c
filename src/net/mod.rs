//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Encoded request bytes
//!     → transport.rs (dial, write once, read one LF-terminated line)
//!     → Reply bytes (line terminator stripped) or TransportError
//!
//! Connection States:
//!     Dialing → Writing → Reading → Closed
//! ```
//!
//! # Design Decisions
//! - One TCP connection per call, no pooling or keep-alive
//! - Every phase is bounded by its own timeout
//! - Cancellation is opt-in; the plain call ignores it

pub mod transport;

pub use transport::{Transport, TransportError};
