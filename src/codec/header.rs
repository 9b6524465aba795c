//! Protocol envelope construction.
//!
//! # Layout (rune offsets)
//! ```text
//!   0..10   system code
//!  10..25   service code
//!  25..28   format code
//!  28..48   request id
//!  48..56   date      YYYYMMDD
//!  56..62   time      HHMMSS
//!  62..67   declared request (body) length
//!  67..73   response code     (blank on send, header error window on reply)
//!  73..123  response message  (blank on send, header error window on reply)
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::codec::fixed::pad_or_truncate;

pub const SYSTEM_WIDTH: usize = 10;
pub const SERVICE_WIDTH: usize = 15;
pub const FORMAT_WIDTH: usize = 3;
pub const REQUEST_ID_WIDTH: usize = 20;
pub const DATE_WIDTH: usize = 8;
pub const TIME_WIDTH: usize = 6;
pub const LENGTH_WIDTH: usize = 5;
pub const RESPONSE_CODE_OFFSET: usize = 67;
pub const RESPONSE_CODE_WIDTH: usize = 6;
pub const RESPONSE_MESSAGE_OFFSET: usize = 73;
pub const RESPONSE_MESSAGE_WIDTH: usize = 50;

/// Total envelope width in runes.
pub const HEADER_LEN: usize = 123;

/// Source of wall-clock time for the envelope date/time fields.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, read at call time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Assemble the 123-rune envelope.
pub fn build_header(
    system: &str,
    service: &str,
    format: &str,
    request_id: &str,
    declared_length: &str,
    now: NaiveDateTime,
) -> String {
    let mut header = String::with_capacity(HEADER_LEN);
    header.push_str(&pad_or_truncate(system, SYSTEM_WIDTH));
    header.push_str(&pad_or_truncate(service, SERVICE_WIDTH));
    header.push_str(&pad_or_truncate(format, FORMAT_WIDTH));
    header.push_str(&pad_or_truncate(request_id, REQUEST_ID_WIDTH));
    header.push_str(&now.format("%Y%m%d").to_string());
    header.push_str(&now.format("%H%M%S").to_string());
    header.push_str(&pad_or_truncate(declared_length, LENGTH_WIDTH));
    header.push_str(&pad_or_truncate("", RESPONSE_CODE_WIDTH));
    header.push_str(&pad_or_truncate("", RESPONSE_MESSAGE_WIDTH));
    header
}

/// Builds envelopes against an injectable clock.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    clock: Arc<dyn Clock>,
}

impl HeaderBuilder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn build(
        &self,
        system: &str,
        service: &str,
        format: &str,
        request_id: &str,
        declared_length: &str,
    ) -> String {
        build_header(
            system,
            service,
            format,
            request_id,
            declared_length,
            self.clock.now(),
        )
    }
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
