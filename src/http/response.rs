//! Response shaping.
//!
//! # Responsibilities
//! - Wrap operation results in the success envelope
//! - Map catalog errors to their HTTP status and error body
//!
//! # Design Decisions
//! - Backend codes and messages are passed through next to the stable code
//! - Status comes from the catalog entry, never from the backend

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::catalog::DomainError;
use crate::http::RequestId;

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody<T> {
    pub request_id: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub legacy_code: Option<String>,
    pub legacy_message: Option<String>,
    pub request_id: String,
}

pub fn success<T: Serialize>(request_id: &RequestId, data: T) -> Response {
    Json(SuccessBody {
        request_id: request_id.to_string(),
        data,
    })
    .into_response()
}

/// A catalog error bound to the request it answers.
#[derive(Debug)]
pub struct ApiError {
    pub error: DomainError,
    pub request_id: RequestId,
}

impl ApiError {
    pub fn new(error: DomainError, request_id: &RequestId) -> Self {
        Self {
            error,
            request_id: request_id.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            code: self.error.code().to_string(),
            message: self.error.message().to_string(),
            legacy_code: self.error.legacy_code,
            legacy_message: self.error.legacy_message,
            request_id: self.request_id.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
