//! Route and destination resolution.
//!
//! Maps a call's `(route key, destination, operation)` to the route's
//! protocol metadata and one concrete backend socket address.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::TCP;
use crate::config::{DestinationConfig, GatewayConfig, RouteConfig};
use crate::routing::selector::{PortSelector, RandomPort};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no route configured for {0:?}")]
    RouteNotFound(String),

    #[error("destination {0:?} is not configured")]
    DestinationNotFound(String),

    #[error("destination {destination:?} uses unsupported transport {kind:?}")]
    UnsupportedTransport { destination: String, kind: String },

    #[error("destination {destination:?} has no ports for operation {operation:?}")]
    NoPorts { destination: String, operation: String },

    #[error("invalid backend address {0:?}")]
    InvalidAddress(String),
}

/// Everything the gateway needs to frame and send one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub route: RouteConfig,
    pub destination: String,
    pub addr: SocketAddr,
}

/// Immutable lookup tables plus the port selection strategy.
#[derive(Debug)]
pub struct Resolver {
    routes: HashMap<String, RouteConfig>,
    destinations: HashMap<String, DestinationConfig>,
    selector: Box<dyn PortSelector>,
}

impl Resolver {
    pub fn new(
        routes: HashMap<String, RouteConfig>,
        destinations: HashMap<String, DestinationConfig>,
    ) -> Self {
        Self::with_selector(routes, destinations, Box::new(RandomPort::new()))
    }

    pub fn with_selector(
        routes: HashMap<String, RouteConfig>,
        destinations: HashMap<String, DestinationConfig>,
        selector: Box<dyn PortSelector>,
    ) -> Self {
        Self {
            routes,
            destinations,
            selector,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.routes.clone(), config.destinations.clone())
    }

    /// Resolve one call. Checks run in a fixed order and the first failure
    /// wins.
    pub fn resolve(
        &self,
        route_key: &str,
        destination: &str,
        operation: &str,
    ) -> Result<Resolved, ResolutionError> {
        let route = self
            .routes
            .get(route_key)
            .ok_or_else(|| ResolutionError::RouteNotFound(route_key.to_string()))?;

        let target = self
            .destinations
            .get(destination)
            .ok_or_else(|| ResolutionError::DestinationNotFound(destination.to_string()))?;

        if target.kind != TCP {
            return Err(ResolutionError::UnsupportedTransport {
                destination: destination.to_string(),
                kind: target.kind.clone(),
            });
        }

        let port = target
            .ports
            .get(operation)
            .and_then(|candidates| self.selector.select(candidates))
            .ok_or_else(|| ResolutionError::NoPorts {
                destination: destination.to_string(),
                operation: operation.to_string(),
            })?;

        let addr = parse_addr(&target.ip, port)?;

        tracing::debug!(
            route = %route_key,
            destination = %destination,
            operation = %operation,
            addr = %addr,
            "Resolved backend"
        );

        Ok(Resolved {
            route: route.clone(),
            destination: destination.to_string(),
            addr,
        })
    }
}

fn parse_addr(ip: &str, port: &str) -> Result<SocketAddr, ResolutionError> {
    let invalid = || ResolutionError::InvalidAddress(format!("{ip}:{port}"));
    let ip: IpAddr = ip.parse().map_err(|_| invalid())?;
    let port: u16 = port.parse().map_err(|_| invalid())?;
    Ok(SocketAddr::new(ip, port))
}
