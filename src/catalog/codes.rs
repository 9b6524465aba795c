//! Static catalog entries and legacy code lookup.

use crate::catalog::domain::{ErrorEntry, StatusClass};

pub static CARD_NOT_FOUND: ErrorEntry = ErrorEntry {
    code: "GW-40401",
    message: "Card Not Found",
    status: StatusClass::NotFound,
};

pub static CARD_EXPIRED: ErrorEntry = ErrorEntry {
    code: "GW-42201",
    message: "Card Expired",
    status: StatusClass::Unprocessable,
};

pub static CARD_BLOCKED: ErrorEntry = ErrorEntry {
    code: "GW-42202",
    message: "Card Blocked",
    status: StatusClass::Unprocessable,
};

pub static INVALID_CARD_NO: ErrorEntry = ErrorEntry {
    code: "GW-40001",
    message: "Invalid Card No.",
    status: StatusClass::BadRequest,
};

pub static INVALID_DATE_RANGE: ErrorEntry = ErrorEntry {
    code: "GW-40002",
    message: "Invalid Date Range",
    status: StatusClass::BadRequest,
};

pub static DATA_NOT_FOUND: ErrorEntry = ErrorEntry {
    code: "GW-40402",
    message: "Data Not Found",
    status: StatusClass::NotFound,
};

pub static INSUFFICIENT_LIMIT: ErrorEntry = ErrorEntry {
    code: "GW-42203",
    message: "Insufficient Credit Limit",
    status: StatusClass::Unprocessable,
};

pub static DUPLICATE_TRANSACTION: ErrorEntry = ErrorEntry {
    code: "GW-40901",
    message: "Duplicate Transaction",
    status: StatusClass::Conflict,
};

pub static INVALID_AMOUNT: ErrorEntry = ErrorEntry {
    code: "GW-40003",
    message: "Invalid Amount",
    status: StatusClass::BadRequest,
};

/// Catch-all for any non-empty legacy code without a mapping.
pub static UNEXPECTED: ErrorEntry = ErrorEntry {
    code: "GW-50001",
    message: "Unexpected System Error",
    status: StatusClass::Internal,
};

pub static INTERNAL_ERROR: ErrorEntry = ErrorEntry {
    code: "GW-50002",
    message: "Internal Error",
    status: StatusClass::Internal,
};

/// The backend itself reported it is unavailable (header window).
pub static SYSTEM_UNAVAILABLE: ErrorEntry = ErrorEntry {
    code: "GW-50301",
    message: "Backend System Unavailable",
    status: StatusClass::ServiceUnavailable,
};

/// The gateway could not reach or route to the backend.
pub static SERVICE_UNAVAILABLE: ErrorEntry = ErrorEntry {
    code: "GW-50302",
    message: "Service Unavailable",
    status: StatusClass::ServiceUnavailable,
};

pub static TIMEOUT: ErrorEntry = ErrorEntry {
    code: "GW-50401",
    message: "Gateway Timeout",
    status: StatusClass::GatewayTimeout,
};

/// Header window code the backend uses to signal it is down.
pub const HEADER_SYSTEM_UNAVAILABLE: &str = "SU0001";

/// Map a business window code. Callers only pass non-empty codes.
pub fn lookup_business(code: &str) -> &'static ErrorEntry {
    match code {
        "01" => &CARD_NOT_FOUND,
        "02" => &CARD_EXPIRED,
        "03" => &CARD_BLOCKED,
        "04" => &INVALID_CARD_NO,
        "05" => &INVALID_DATE_RANGE,
        "06" => &DATA_NOT_FOUND,
        "07" => &INSUFFICIENT_LIMIT,
        "08" => &DUPLICATE_TRANSACTION,
        "09" => &INVALID_AMOUNT,
        _ => &UNEXPECTED,
    }
}

/// Map a header window code. Callers only pass non-empty codes.
pub fn lookup_header(code: &str) -> &'static ErrorEntry {
    match code {
        HEADER_SYSTEM_UNAVAILABLE => &SYSTEM_UNAVAILABLE,
        _ => &UNEXPECTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    static ALL: [&ErrorEntry; 14] = [
        &CARD_NOT_FOUND,
        &CARD_EXPIRED,
        &CARD_BLOCKED,
        &INVALID_CARD_NO,
        &INVALID_DATE_RANGE,
        &DATA_NOT_FOUND,
        &INSUFFICIENT_LIMIT,
        &DUPLICATE_TRANSACTION,
        &INVALID_AMOUNT,
        &UNEXPECTED,
        &INTERNAL_ERROR,
        &SYSTEM_UNAVAILABLE,
        &SERVICE_UNAVAILABLE,
        &TIMEOUT,
    ];

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = ALL.iter().map(|e| e.code).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn known_business_codes_map_exactly() {
        assert_eq!(lookup_business("04"), &INVALID_CARD_NO);
        assert_eq!(lookup_business("08"), &DUPLICATE_TRANSACTION);
    }

    #[test]
    fn unknown_codes_fall_back_to_unexpected() {
        assert_eq!(lookup_business("ZZ"), &UNEXPECTED);
        assert_eq!(lookup_header("XX9999"), &UNEXPECTED);
        assert_eq!(lookup_header("SU0001"), &SYSTEM_UNAVAILABLE);
    }
}
