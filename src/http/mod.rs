//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one POST route per operation)
//!     → request.rs (request ID assigned or adopted)
//!     → gateway::Gateway (legacy call)
//!     → observability::audit (one line per exchange)
//!     → response.rs (success envelope or catalog error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
