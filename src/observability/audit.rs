//! Audit line generation.
//!
//! Every backend call produces one JSON line carrying the raw request, the
//! raw reply (or transport error text) and the resolved error, emitted under
//! the `audit` tracing target.

use serde::{Deserialize, Serialize};

use crate::catalog::DomainError;
use crate::gateway::Exchange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub service: String,
    pub request_id: String,
    pub route_key: String,
    pub raw_request: String,
    pub raw_response: String,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub legacy_code: Option<String>,
}

impl AuditRecord {
    pub fn new(
        exchange: &Exchange,
        request_id: &str,
        route_key: &str,
        error: Option<&DomainError>,
    ) -> Self {
        Self {
            service: exchange.service.clone(),
            request_id: request_id.to_string(),
            route_key: route_key.to_string(),
            raw_request: exchange.raw_request.clone(),
            raw_response: exchange.raw_reply.clone(),
            error_code: error.map(|e| e.code().to_string()),
            error_message: error.map(|e| e.message().to_string()),
            legacy_code: error.and_then(|e| e.legacy_code.clone()),
        }
    }
}

/// Serialize a record into a single line.
pub fn audit_line(record: &AuditRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Serialize and emit a record. The caller decides how to surface failure.
pub fn emit(record: &AuditRecord) -> Result<(), serde_json::Error> {
    let line = audit_line(record)?;
    tracing::info!(target: "audit", "{line}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::codes::INVALID_CARD_NO;

    fn exchange() -> Exchange {
        Exchange {
            service: "SPEND".into(),
            raw_request: "CRS       SPEND".into(),
            raw_reply: "CRS       SPEND ... 04Invalid".into(),
        }
    }

    #[test]
    fn line_carries_resolved_and_legacy_codes() {
        let error = DomainError::with_legacy(&INVALID_CARD_NO, "04", "INVALID CARD");
        let record = AuditRecord::new(&exchange(), "req-1", "POST /v1/cards/spending", Some(&error));
        let line = audit_line(&record).unwrap();

        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["service"], "SPEND");
        assert_eq!(value["error_code"], "GW-40001");
        assert_eq!(value["error_message"], "Invalid Card No.");
        assert_eq!(value["legacy_code"], "04");
    }

    #[test]
    fn success_has_null_error_fields() {
        let record = AuditRecord::new(&exchange(), "req-2", "POST /v1/cards/spending", None);
        let value: serde_json::Value = serde_json::from_str(&audit_line(&record).unwrap()).unwrap();
        assert!(value["error_code"].is_null());
        assert!(value["legacy_code"].is_null());
        assert_eq!(value["raw_request"], "CRS       SPEND");
    }
}
