//! Gateway failure taxonomy and its mapping onto the catalog.

use thiserror::Error;

use crate::catalog::codes::{INTERNAL_ERROR, SERVICE_UNAVAILABLE, TIMEOUT};
use crate::catalog::DomainError;
use crate::codec::{CodecError, DecodeError, EncodingError};
use crate::gateway::Exchange;
use crate::net::TransportError;
use crate::routing::ResolutionError;

/// A call that produced no business outcome.
///
/// Business rejections are not errors; they arrive as
/// [`Outcome::Rejected`](crate::gateway::Outcome::Rejected).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("request encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("request body invalid: {0}")]
    Codec(#[from] CodecError),

    #[error("declared length {declared:?} does not match body length {actual}")]
    LengthMismatch { declared: String, actual: usize },

    #[error("backend call failed: {source}")]
    Transport {
        #[source]
        source: TransportError,
        exchange: Exchange,
    },

    #[error("reply decode failed: {source}")]
    Decode {
        #[source]
        source: DecodeError,
        exchange: Exchange,
    },
}

impl GatewayError {
    /// Catalog classification of this failure.
    pub fn domain_error(&self) -> DomainError {
        match self {
            GatewayError::Transport { source, .. } if source.is_timeout() => {
                DomainError::new(&TIMEOUT)
            }
            GatewayError::Encoding(_)
            | GatewayError::Codec(_)
            | GatewayError::LengthMismatch { .. }
            | GatewayError::Decode { .. } => DomainError::new(&INTERNAL_ERROR),
            GatewayError::Resolution(_) | GatewayError::Transport { .. } => {
                DomainError::new(&SERVICE_UNAVAILABLE)
            }
        }
    }

    /// The partial exchange, when the call got as far as the socket.
    pub fn exchange(&self) -> Option<&Exchange> {
        match self {
            GatewayError::Transport { exchange, .. } | GatewayError::Decode { exchange, .. } => {
                Some(exchange)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn exchange() -> Exchange {
        Exchange {
            service: "SPEND".into(),
            raw_request: "REQ".into(),
            raw_reply: String::new(),
        }
    }

    #[test]
    fn timeouts_map_to_gateway_timeout() {
        let err = GatewayError::Transport {
            source: TransportError::ReadTimeout(Duration::from_secs(30)),
            exchange: exchange(),
        };
        assert_eq!(err.domain_error().code(), "GW-50401");
        assert_eq!(err.exchange().map(|e| e.raw_request.as_str()), Some("REQ"));
    }

    #[test]
    fn other_transport_and_resolution_map_to_unavailable() {
        let cancelled = GatewayError::Transport {
            source: TransportError::Cancelled,
            exchange: exchange(),
        };
        assert_eq!(cancelled.domain_error().code(), "GW-50302");

        let unresolved = GatewayError::from(ResolutionError::RouteNotFound("POST /x".into()));
        assert_eq!(unresolved.domain_error().code(), "GW-50302");
        assert!(unresolved.exchange().is_none());
    }

    #[test]
    fn local_failures_map_to_internal() {
        let mismatch = GatewayError::LengthMismatch {
            declared: "00123".into(),
            actual: 80,
        };
        assert_eq!(mismatch.domain_error().code(), "GW-50002");

        let decode = GatewayError::Decode {
            source: DecodeError::MissingField { field: "card_no" },
            exchange: exchange(),
        };
        assert_eq!(decode.domain_error().code(), "GW-50002");
    }
}
