//! Domain error catalog.
//!
//! # Data Flow
//! ```text
//! Reply line
//!     → business window code  ─┐
//!     → header window code    ─┴→ codes.rs lookup (exact, else catch-all)
//!     → DomainError { entry, legacy code/message }
//!
//! Gateway failures (resolution, transport, decode)
//!     → classified onto the same catalog by gateway::GatewayError
//! ```
//!
//! # Design Decisions
//! - Closed set of static entries, never mutated
//! - Unknown legacy codes never leak through untyped; they map to
//!   the "unexpected system error" entry with the raw code attached
//! - Status class is transport-neutral; the HTTP layer maps it to a status code

pub mod codes;
pub mod domain;

pub use codes::{lookup_business, lookup_header};
pub use domain::{DomainError, ErrorEntry, StatusClass};
