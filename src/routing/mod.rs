//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! (route key, destination name, operation name)
//!     → resolver.rs (route metadata, destination lookup, transport check)
//!     → selector.rs (pick one port from the operation's candidates)
//!     → Return: Resolved { route, addr } or ResolutionError
//! ```
//!
//! # Design Decisions
//! - Route and destination maps are loaded once and immutable at runtime
//! - Fail closed: any missing piece refuses the call before a socket is opened
//! - Port choice is a trait seam; the default draws uniformly per call

pub mod resolver;
pub mod selector;

pub use resolver::{Resolved, ResolutionError, Resolver};
pub use selector::{PortSelector, RandomPort};
