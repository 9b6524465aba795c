//! Legacy card system gateway library.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod operations;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use gateway::{Call, CallContext, Exchange, Gateway, GatewayError, Outcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
