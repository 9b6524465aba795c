//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check route codes fit their envelope widths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Transport type and empty port lists are left to the resolver, which
//!   fails closed per call

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::codec::header::{FORMAT_WIDTH, LENGTH_WIDTH, SERVICE_WIDTH, SYSTEM_WIDTH};
use crate::config::schema::{GatewayConfig, RouteConfig, TCP};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("transport.max_reply_bytes must be greater than zero")]
    ZeroReplyLimit,

    #[error("route {route:?}: {field} {value:?} exceeds {width} characters")]
    RouteFieldTooWide {
        route: String,
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("route {route:?}: request_length {value:?} must be exactly 5 digits")]
    RequestLength { route: String, value: String },

    #[error("destination {destination:?}: ip {value:?} is not an IP address")]
    DestinationIp { destination: String, value: String },

    #[error("destination {destination:?}: operation {operation:?} port {value:?} is not a valid port")]
    Port {
        destination: String,
        operation: String,
        value: String,
    },
}

/// Check the whole configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.dial_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("dial_ms"));
    }
    if config.timeouts.read_write_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("read_write_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.transport.max_reply_bytes == 0 {
        errors.push(ValidationError::ZeroReplyLimit);
    }

    let mut routes: Vec<_> = config.routes.iter().collect();
    routes.sort_by(|a, b| a.0.cmp(b.0));
    for (key, route) in routes {
        validate_route(key, route, &mut errors);
    }

    let mut destinations: Vec<_> = config.destinations.iter().collect();
    destinations.sort_by(|a, b| a.0.cmp(b.0));
    for (name, destination) in destinations {
        if destination.ip.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::DestinationIp {
                destination: name.clone(),
                value: destination.ip.clone(),
            });
        }
        if destination.kind != TCP {
            tracing::warn!(destination = %name, kind = %destination.kind, "Destination is not tcp; calls to it will be refused");
        }

        let mut operations: Vec<_> = destination.ports.iter().collect();
        operations.sort_by(|a, b| a.0.cmp(b.0));
        for (operation, ports) in operations {
            if ports.is_empty() {
                tracing::warn!(destination = %name, operation = %operation, "Empty port list; calls to it will be refused");
            }
            for port in ports {
                if !matches!(port.parse::<u16>(), Ok(p) if p != 0) {
                    errors.push(ValidationError::Port {
                        destination: name.clone(),
                        operation: operation.clone(),
                        value: port.clone(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(key: &str, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    let widths = [
        ("system", &route.system, SYSTEM_WIDTH),
        ("service", &route.service, SERVICE_WIDTH),
        ("format", &route.format, FORMAT_WIDTH),
    ];
    for (field, value, width) in widths {
        if value.chars().count() > width {
            errors.push(ValidationError::RouteFieldTooWide {
                route: key.to_string(),
                field,
                value: value.clone(),
                width,
            });
        }
    }

    let length = &route.request_length;
    if length.len() != LENGTH_WIDTH || !length.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ValidationError::RequestLength {
            route: key.to_string(),
            value: length.clone(),
        });
    }
}
