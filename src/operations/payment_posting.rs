//! Card payment posting.
//!
//! The request body is 80 runes, so the echoed reply puts the business error
//! window at `[203,205)` / `[205,255)`, unlike the 123-rune operations.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::layout::{ErrorWindow, Field, Record, ReplyLayout, Value};
use crate::codec::DecodeError;
use crate::operations::Operation;

const REQUEST_FIELDS: [Field; 7] = [
    Field::text("card_no", 0, 16),
    Field::amount("amount", 16, 13),
    Field::date("payment_date", 29),
    Field::time("payment_time", 37),
    Field::text("channel", 43, 10),
    Field::text("reference_no", 53, 20),
    Field::text("filler", 73, 7),
];

const REPLY_FIELDS: [Field; 4] = [
    Field::text("reference_no", 255, 20),
    Field::text("receipt_no", 275, 20),
    Field::amount("posted_amount", 295, 13),
    Field::amount("available_credit", 308, 13),
];

const REPLY_LAYOUT: ReplyLayout = ReplyLayout {
    business: ErrorWindow::at(203),
    fields: &REPLY_FIELDS,
    repeat: None,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub card_no: String,
    pub amount: Decimal,
    pub paid_at: NaiveDateTime,
    #[serde(default)]
    pub channel: String,
    pub reference_no: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub reference_no: String,
    pub receipt_no: String,
    pub posted_amount: Decimal,
    pub available_credit: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct PaymentPosting;

impl Operation for PaymentPosting {
    const NAME: &'static str = "payment_posting";
    const REQUEST: &'static [Field] = &REQUEST_FIELDS;
    const REPLY: &'static ReplyLayout = &REPLY_LAYOUT;

    type Request = PaymentRequest;
    type Response = PaymentResponse;

    fn values(request: &Self::Request) -> Vec<Value> {
        vec![
            Value::Text(request.card_no.clone()),
            Value::Amount(request.amount),
            Value::Date(Some(request.paid_at.date())),
            Value::Time(Some(request.paid_at.time())),
            Value::Text(request.channel.clone()),
            Value::Text(request.reference_no.clone()),
            Value::Text(String::new()),
        ]
    }

    fn decode(record: Record) -> Result<Self::Response, DecodeError> {
        Ok(PaymentResponse {
            reference_no: record.text("reference_no")?,
            receipt_no: record.text("receipt_no")?,
            posted_amount: record.amount("posted_amount")?,
            available_credit: record.amount("available_credit")?,
        })
    }
}
