//! Call orchestration against the legacy backend.
//!
//! # Data Flow
//! ```text
//! (CallContext, typed request)
//!     → routing::Resolver (route metadata + backend address)
//!     → Operation::encode_request (fixed-width body)
//!     → declared length check
//!     → HeaderBuilder (123-rune envelope)
//!     → charset::encode (Windows-874 bytes)
//!     → net::Transport (one TCP exchange)
//!     → charset::decode
//!     → Operation::decode_reply (error windows, then fields)
//!     → Call { outcome, exchange } or GatewayError
//! ```
//!
//! # Design Decisions
//! - Business rejections are successful calls with a `Rejected` outcome
//! - Nothing is retried
//! - Raw request and reply text is kept for the audit line on every path
//!   that reached the socket

pub mod error;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::DomainError;
use crate::codec::fixed::pad_int_zero;
use crate::codec::header::LENGTH_WIDTH;
use crate::codec::{charset, HeaderBuilder, Reply};
use crate::config::GatewayConfig;
use crate::net::Transport;
use crate::observability::metrics;
use crate::operations::Operation;
use crate::routing::Resolver;

pub use error::GatewayError;

/// Who is calling and where the call should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// `"<METHOD> <path>"` key into the route table.
    pub route_key: String,
    pub destination: String,
    /// Port-list key; defaults to the operation's name.
    pub operation: String,
    /// Correlation id, at most 20 characters, written verbatim to the envelope.
    pub request_id: String,
}

impl CallContext {
    pub fn new<O: Operation>(
        route_key: impl Into<String>,
        destination: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            route_key: route_key.into(),
            destination: destination.into(),
            operation: O::NAME.to_string(),
            request_id: request_id.into(),
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }
}

/// Raw text of one exchange, for audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub service: String,
    /// Envelope plus body before transcoding.
    pub raw_request: String,
    /// Decoded reply line, or the transport error text when none arrived.
    pub raw_reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(DomainError),
}

/// A call that reached the backend and got a well-formed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<T> {
    pub outcome: Outcome<T>,
    pub exchange: Exchange,
}

/// Shared, stateless apart from the resolver's port selector.
#[derive(Debug, Clone)]
pub struct Gateway {
    resolver: Arc<Resolver>,
    transport: Transport,
    header: HeaderBuilder,
}

impl Gateway {
    pub fn new(resolver: Arc<Resolver>, transport: Transport) -> Self {
        Self {
            resolver,
            transport,
            header: HeaderBuilder::default(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            Arc::new(Resolver::from_config(config)),
            Transport::from_config(config),
        )
    }

    /// Replace the envelope builder, typically to pin the clock.
    pub fn with_header_builder(mut self, header: HeaderBuilder) -> Self {
        self.header = header;
        self
    }

    /// Run one call. Only the transport's fixed timeouts bound it.
    pub async fn call<O: Operation>(
        &self,
        ctx: &CallContext,
        request: &O::Request,
    ) -> Result<Call<O::Response>, GatewayError> {
        self.call_until::<O, _>(ctx, request, std::future::pending())
            .await
    }

    /// Run one call, abandoning it when `cancel` resolves first.
    pub async fn call_until<O, F>(
        &self,
        ctx: &CallContext,
        request: &O::Request,
        cancel: F,
    ) -> Result<Call<O::Response>, GatewayError>
    where
        O: Operation,
        F: Future<Output = ()>,
    {
        let start = Instant::now();
        let result = self.execute::<O, F>(ctx, request, cancel).await;

        match &result {
            Ok(Call {
                outcome: Outcome::Accepted(_),
                ..
            }) => {
                metrics::record_call(O::NAME, "accepted", start);
                tracing::info!(
                    request_id = %ctx.request_id,
                    operation = O::NAME,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Backend call accepted"
                );
            }
            Ok(Call {
                outcome: Outcome::Rejected(err),
                ..
            }) => {
                metrics::record_call(O::NAME, "rejected", start);
                metrics::record_domain_error(err.code());
                tracing::info!(
                    request_id = %ctx.request_id,
                    operation = O::NAME,
                    code = err.code(),
                    legacy_code = err.legacy_code.as_deref().unwrap_or(""),
                    "Backend call rejected"
                );
            }
            Err(err) => {
                let domain = err.domain_error();
                metrics::record_call(O::NAME, "failed", start);
                metrics::record_domain_error(domain.code());
                if let GatewayError::Transport { source, .. } = err {
                    metrics::record_transport_error(source.kind());
                }
                tracing::warn!(
                    request_id = %ctx.request_id,
                    operation = O::NAME,
                    code = domain.code(),
                    error = %err,
                    "Backend call failed"
                );
            }
        }

        result
    }

    async fn execute<O, F>(
        &self,
        ctx: &CallContext,
        request: &O::Request,
        cancel: F,
    ) -> Result<Call<O::Response>, GatewayError>
    where
        O: Operation,
        F: Future<Output = ()>,
    {
        let resolved = self
            .resolver
            .resolve(&ctx.route_key, &ctx.destination, &ctx.operation)?;
        let route = &resolved.route;

        let body = O::encode_request(request)?;
        let actual = body.chars().count();
        // The declared length goes into the envelope verbatim, so it must be
        // the exact zero-padded form of the body length.
        if route.request_length != pad_int_zero(actual as u64, LENGTH_WIDTH) {
            return Err(GatewayError::LengthMismatch {
                declared: route.request_length.clone(),
                actual,
            });
        }

        let mut raw_request = self.header.build(
            &route.system,
            &route.service,
            &route.format,
            &ctx.request_id,
            &route.request_length,
        );
        raw_request.push_str(&body);
        let bytes = charset::encode(&raw_request)?;

        tracing::debug!(
            request_id = %ctx.request_id,
            addr = %resolved.addr,
            raw_request = %raw_request,
            "Sending legacy request"
        );

        let reply = match self
            .transport
            .send_and_receive_until(resolved.addr, &bytes, cancel)
            .await
        {
            Ok(reply) => reply,
            Err(source) => {
                let exchange = Exchange {
                    service: route.service.clone(),
                    raw_request,
                    raw_reply: source.to_string(),
                };
                return Err(GatewayError::Transport { source, exchange });
            }
        };

        let raw_reply = charset::decode(&reply);
        tracing::debug!(request_id = %ctx.request_id, raw_reply = %raw_reply, "Received legacy reply");

        let decoded = O::decode_reply(&raw_reply);
        let exchange = Exchange {
            service: route.service.clone(),
            raw_request,
            raw_reply,
        };

        match decoded {
            Reply::Decoded(response) => Ok(Call {
                outcome: Outcome::Accepted(response),
                exchange,
            }),
            Reply::Rejected(err) => Ok(Call {
                outcome: Outcome::Rejected(err),
                exchange,
            }),
            Reply::Malformed(source) => Err(GatewayError::Decode { source, exchange }),
        }
    }
}
