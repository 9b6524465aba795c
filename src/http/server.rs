//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one POST handler per operation
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the gateway and write the audit line
//! - Map call results to responses

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::codes::INTERNAL_ERROR;
use crate::catalog::DomainError;
use crate::config::GatewayConfig;
use crate::gateway::{Call, CallContext, Gateway, Outcome};
use crate::http::request::{assign_request_id, RequestId};
use crate::http::response::{success, ApiError};
use crate::lifecycle::Shutdown;
use crate::observability::audit::{self, AuditRecord};
use crate::operations::{
    CardInquiry, CardInquiryRequest, Operation, PaymentPosting, PaymentRequest, SpendingHistory,
    SpendingHistoryRequest,
};

pub const INQUIRY_PATH: &str = "/v1/cards/inquiry";
pub const SPENDING_PATH: &str = "/v1/cards/spending";
pub const PAYMENTS_PATH: &str = "/v1/cards/payments";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    /// Destination every endpoint calls.
    pub destination: String,
}

/// HTTP front for the legacy gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server whose gateway is built from `config`.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_gateway(config, Gateway::from_config(config))
    }

    pub fn with_gateway(config: &GatewayConfig, gateway: Gateway) -> Self {
        let state = AppState {
            gateway: Arc::new(gateway),
            destination: config.gateway.destination.clone(),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(INQUIRY_PATH, post(card_inquiry))
            .route(SPENDING_PATH, post(spending_history))
            .route(PAYMENTS_PATH, post(payment_posting))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(assign_request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for serving elsewhere.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` triggers.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn card_inquiry(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CardInquiryRequest>,
) -> Response {
    dispatch::<CardInquiry>(&state, &request_id, INQUIRY_PATH, &request).await
}

async fn spending_history(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SpendingHistoryRequest>,
) -> Response {
    dispatch::<SpendingHistory>(&state, &request_id, SPENDING_PATH, &request).await
}

async fn payment_posting(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PaymentRequest>,
) -> Response {
    dispatch::<PaymentPosting>(&state, &request_id, PAYMENTS_PATH, &request).await
}

/// Call the backend, write the audit line, shape the response.
async fn dispatch<O>(
    state: &AppState,
    request_id: &RequestId,
    path: &'static str,
    request: &O::Request,
) -> Response
where
    O: Operation,
    O::Response: Serialize,
{
    let route_key = format!("POST {path}");
    let ctx = CallContext::new::<O>(route_key.as_str(), state.destination.as_str(), request_id.as_str());

    let (exchange, result) = match state.gateway.call::<O>(&ctx, request).await {
        Ok(Call {
            outcome: Outcome::Accepted(data),
            exchange,
        }) => (Some(exchange), Ok(data)),
        Ok(Call {
            outcome: Outcome::Rejected(err),
            exchange,
        }) => (Some(exchange), Err(err)),
        Err(err) => (err.exchange().cloned(), Err(err.domain_error())),
    };

    if let Some(exchange) = exchange {
        let record = AuditRecord::new(&exchange, request_id.as_str(), &route_key, result.as_ref().err());
        if let Err(e) = audit::emit(&record) {
            tracing::error!(request_id = %request_id, error = %e, "Failed to write audit line");
            return ApiError::new(DomainError::new(&INTERNAL_ERROR), request_id).into_response();
        }
    }

    match result {
        Ok(data) => success(request_id, data),
        Err(err) => ApiError::new(err, request_id).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut config = GatewayConfig::default();
        config.gateway.destination = "nowhere".into();
        HttpServer::new(&config).router()
    }

    fn post(path: &str, body: &str) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", "unit-1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn unresolvable_call_is_service_unavailable() {
        let response = router()
            .oneshot(post(INQUIRY_PATH, r#"{"card_no":"4111111111111111"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()["x-request-id"], "unit-1");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: crate::http::response::ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "GW-50302");
        assert_eq!(body.request_id, "unit-1");
        assert_eq!(body.legacy_code, None);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_before_the_gateway() {
        let response = router()
            .oneshot(post(SPENDING_PATH, r#"{"card_no": 42}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(response.headers()["x-request-id"], "unit-1");
    }

    #[tokio::test]
    async fn only_post_is_routed() {
        let response = router()
            .oneshot(Request::get(PAYMENTS_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
