//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     read config → install logging → validate (warnings logged) → metrics → bind
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → HTTP server stops accepting → in-flight calls finish → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config read, logging, config validation, metrics, then listener
//! - In-flight backend calls are not cancelled; their own timeouts bound them

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{configure, StartupError};
