//! Card profile and limit inquiry.
//!
//! Request body is 123 runes; the reply echoes it, so the business error
//! window sits at `[246,248)` / `[248,298)` and data starts at 298.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::layout::{ErrorWindow, Field, Record, ReplyLayout, Value};
use crate::codec::DecodeError;
use crate::operations::Operation;

const REQUEST_FIELDS: [Field; 4] = [
    Field::text("card_no", 0, 16),
    Field::text("citizen_id", 16, 13),
    Field::text("channel", 29, 10),
    Field::text("filler", 39, 84),
];

const REPLY_FIELDS: [Field; 10] = [
    Field::text("card_no", 298, 16),
    Field::text("holder_name_th", 314, 50),
    Field::text("holder_name_en", 364, 50),
    Field::text("card_status", 414, 2),
    Field::date("expiry_date", 416),
    Field::amount("credit_limit", 424, 13),
    Field::amount("available_credit", 437, 13),
    Field::amount("outstanding_balance", 450, 13),
    Field::amount("minimum_payment", 463, 13),
    Field::date("payment_due_date", 476),
];

const REPLY_LAYOUT: ReplyLayout = ReplyLayout {
    business: ErrorWindow::at(246),
    fields: &REPLY_FIELDS,
    repeat: None,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInquiryRequest {
    pub card_no: String,
    #[serde(default)]
    pub citizen_id: String,
    #[serde(default)]
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInquiryResponse {
    pub card_no: String,
    pub holder_name_th: String,
    pub holder_name_en: String,
    pub card_status: String,
    pub expiry_date: Option<NaiveDate>,
    pub credit_limit: Decimal,
    pub available_credit: Decimal,
    pub outstanding_balance: Decimal,
    pub minimum_payment: Decimal,
    pub payment_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct CardInquiry;

impl Operation for CardInquiry {
    const NAME: &'static str = "card_inquiry";
    const REQUEST: &'static [Field] = &REQUEST_FIELDS;
    const REPLY: &'static ReplyLayout = &REPLY_LAYOUT;

    type Request = CardInquiryRequest;
    type Response = CardInquiryResponse;

    fn values(request: &Self::Request) -> Vec<Value> {
        vec![
            Value::Text(request.card_no.clone()),
            Value::Text(request.citizen_id.clone()),
            Value::Text(request.channel.clone()),
            Value::Text(String::new()),
        ]
    }

    fn decode(record: Record) -> Result<Self::Response, DecodeError> {
        Ok(CardInquiryResponse {
            card_no: record.text("card_no")?,
            holder_name_th: record.text("holder_name_th")?,
            holder_name_en: record.text("holder_name_en")?,
            card_status: record.text("card_status")?,
            expiry_date: record.date("expiry_date")?,
            credit_limit: record.amount("credit_limit")?,
            available_credit: record.amount("available_credit")?,
            outstanding_balance: record.amount("outstanding_balance")?,
            minimum_payment: record.amount("minimum_payment")?,
            payment_due_date: record.date("payment_due_date")?,
        })
    }
}
