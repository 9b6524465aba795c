//! Per-operation message definitions.
//!
//! # Data Flow
//! ```text
//! typed request
//!     → Operation::values (fields in table order)
//!     → codec::layout::encode_body (REQUEST table)
//!
//! reply line
//!     → codec::reply::decode_reply (REPLY layout, error windows)
//!     → Operation::decode (Record → typed response)
//! ```
//!
//! # Design Decisions
//! - Each operation is a unit type carrying two const tables, nothing else
//! - Reply error windows are declared per operation, not assumed universal

pub mod card_inquiry;
pub mod payment_posting;
pub mod spending_history;

use crate::codec::layout::{body_width, encode_body, Field, Record, ReplyLayout, Value};
use crate::codec::reply::{decode_reply, Reply};
use crate::codec::{CodecError, DecodeError};

pub use card_inquiry::{CardInquiry, CardInquiryRequest, CardInquiryResponse};
pub use payment_posting::{PaymentPosting, PaymentRequest, PaymentResponse};
pub use spending_history::{SpendingHistory, SpendingHistoryRequest, SpendingHistoryResponse, Transaction};

/// A logical backend operation.
pub trait Operation {
    /// Operation name, used as the destination port-list key.
    const NAME: &'static str;
    /// Request body field table, contiguous from offset zero.
    const REQUEST: &'static [Field];
    /// Reply layout with this operation's error window.
    const REPLY: &'static ReplyLayout;

    type Request: Send + Sync;
    type Response: Send;

    /// Field values in `REQUEST` order.
    fn values(request: &Self::Request) -> Vec<Value>;

    /// Build the typed response from a decoded record.
    fn decode(record: Record) -> Result<Self::Response, DecodeError>;

    fn body_width() -> usize {
        body_width(Self::REQUEST)
    }

    fn encode_request(request: &Self::Request) -> Result<String, CodecError> {
        encode_body(Self::REQUEST, &Self::values(request))
    }

    fn decode_reply(line: &str) -> Reply<Self::Response> {
        decode_reply(Self::REPLY, line).and_then(Self::decode)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::codec::fixed::pad_or_truncate;
    use crate::codec::header::HEADER_LEN;

    /// Envelope echo + request echo + business window + data.
    pub fn reply_line(echo_width: usize, code: &str, message: &str, data: &str) -> String {
        let mut line = pad_or_truncate("CRS", HEADER_LEN);
        line.push_str(&pad_or_truncate("", echo_width));
        line.push_str(&pad_or_truncate(code, 2));
        line.push_str(&pad_or_truncate(message, 50));
        line.push_str(data);
        line
    }
}
