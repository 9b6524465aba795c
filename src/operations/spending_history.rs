//! Card spending history with repeated transaction blocks.
//!
//! Reply data after the business window `[246,248)` / `[248,298)`:
//! ```text
//! 298..314  card no
//! 314..329  total amount (2 implied decimals)
//! 329..330  more-pages flag ("Y")
//! 330..333  transaction count
//! 333..     count × 84-rune transaction blocks
//! ```

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::layout::{ErrorWindow, Field, Record, Repeat, ReplyLayout, Value};
use crate::codec::DecodeError;
use crate::operations::Operation;

const REQUEST_FIELDS: [Field; 5] = [
    Field::text("card_no", 0, 16),
    Field::date("from_date", 16),
    Field::date("to_date", 24),
    Field::number("page_no", 32, 3),
    Field::text("filler", 35, 88),
];

const REPLY_FIELDS: [Field; 3] = [
    Field::text("card_no", 298, 16),
    Field::amount("total_amount", 314, 15),
    Field::text("more_flag", 329, 1),
];

const BLOCK_FIELDS: [Field; 7] = [
    Field::date("transaction_date", 0),
    Field::time("transaction_time", 8),
    Field::date("posting_date", 14),
    Field::text("merchant_name", 22, 40),
    Field::amount("amount", 62, 13),
    Field::text("currency", 75, 3),
    Field::text("authorization_code", 78, 6),
];

const REPLY_LAYOUT: ReplyLayout = ReplyLayout {
    business: ErrorWindow::at(246),
    fields: &REPLY_FIELDS,
    repeat: Some(Repeat {
        count: Field::number("transaction_count", 330, 3),
        block_width: 84,
        fields: &BLOCK_FIELDS,
    }),
};

fn first_page() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingHistoryRequest {
    pub card_no: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(default = "first_page")]
    pub page: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_date: Option<NaiveDate>,
    pub transaction_time: Option<NaiveTime>,
    pub posting_date: Option<NaiveDate>,
    pub merchant_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub authorization_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingHistoryResponse {
    pub card_no: String,
    pub total_amount: Decimal,
    pub has_more: bool,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy)]
pub struct SpendingHistory;

impl Operation for SpendingHistory {
    const NAME: &'static str = "spending_history";
    const REQUEST: &'static [Field] = &REQUEST_FIELDS;
    const REPLY: &'static ReplyLayout = &REPLY_LAYOUT;

    type Request = SpendingHistoryRequest;
    type Response = SpendingHistoryResponse;

    fn values(request: &Self::Request) -> Vec<Value> {
        vec![
            Value::Text(request.card_no.clone()),
            Value::Date(Some(request.from_date)),
            Value::Date(Some(request.to_date)),
            Value::Number(request.page),
            Value::Text(String::new()),
        ]
    }

    fn decode(record: Record) -> Result<Self::Response, DecodeError> {
        let transactions = record
            .blocks()
            .iter()
            .map(|block| {
                Ok(Transaction {
                    transaction_date: block.date("transaction_date")?,
                    transaction_time: block.time("transaction_time")?,
                    posting_date: block.date("posting_date")?,
                    merchant_name: block.text("merchant_name")?,
                    amount: block.amount("amount")?,
                    currency: block.text("currency")?,
                    authorization_code: block.text("authorization_code")?,
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        Ok(SpendingHistoryResponse {
            card_no: record.text("card_no")?,
            total_amount: record.amount("total_amount")?,
            has_more: record.text("more_flag")? == "Y",
            transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixed::pad_or_truncate;
    use crate::codec::layout::is_contiguous;
    use crate::codec::Reply;
    use crate::operations::fixtures::reply_line;
    use rust_decimal_macros::dec;

    fn block(date: &str, time: &str, merchant: &str, amount: &str, auth: &str) -> String {
        let block = [
            date.to_string(),
            time.to_string(),
            date.to_string(),
            pad_or_truncate(merchant, 40),
            amount.to_string(),
            "THB".to_string(),
            pad_or_truncate(auth, 6),
        ]
        .concat();
        assert_eq!(block.chars().count(), 84);
        block
    }

    fn prefix(total: &str, more: &str, count: &str) -> String {
        [pad_or_truncate("4111111111111111", 16), total.to_string(), more.to_string(), count.to_string()].concat()
    }

    #[test]
    fn request_body_is_123_runes() {
        assert!(is_contiguous(SpendingHistory::REQUEST));
        assert_eq!(SpendingHistory::body_width(), 123);
        let body = SpendingHistory::encode_request(&SpendingHistoryRequest {
            card_no: "4111111111111111".into(),
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            page: 2,
        })
        .unwrap();
        assert_eq!(body.chars().count(), 123);
        assert_eq!(&body[16..35], "2024010120240131002");
    }

    #[test]
    fn block_fields_fit_their_block() {
        let repeat = SpendingHistory::REPLY.repeat.unwrap();
        assert!(is_contiguous(repeat.fields));
        let used: usize = repeat.fields.iter().map(|f| f.width).sum();
        assert_eq!(used, repeat.block_width);
        assert_eq!(repeat.block_start(0), 333);
    }

    #[test]
    fn decodes_repeated_transactions() {
        let data = [
            prefix("000000000150075", "Y", "002"),
            block("20240105", "134501", "ร้านกาแฟ สาขา 1", "0000000012000", "A1B2C3"),
            block("20240107", "090000", "ONLINE STORE", "0000000138075", "ZZ9999"),
        ]
        .concat();
        let line = reply_line(123, "", "", &data);

        let Reply::Decoded(history) = SpendingHistory::decode_reply(&line) else {
            panic!("expected decoded reply");
        };
        assert_eq!(history.total_amount, dec!(1500.75));
        assert!(history.has_more);
        assert_eq!(history.transactions.len(), 2);

        let first = &history.transactions[0];
        assert_eq!(first.merchant_name, "ร้านกาแฟ สาขา 1");
        assert_eq!(first.amount, dec!(120.00));
        assert_eq!(first.transaction_time, NaiveTime::from_hms_opt(13, 45, 1));
        assert_eq!(first.currency, "THB");

        let second = &history.transactions[1];
        assert_eq!(second.transaction_date, NaiveDate::from_ymd_opt(2024, 1, 7));
        assert_eq!(second.amount, dec!(1380.75));
        assert_eq!(second.authorization_code, "ZZ9999");
    }

    #[test]
    fn empty_history() {
        let line = reply_line(123, "", "", &prefix("000000000000000", "N", "000"));
        let Reply::Decoded(history) = SpendingHistory::decode_reply(&line) else {
            panic!("expected decoded reply");
        };
        assert!(!history.has_more);
        assert!(history.transactions.is_empty());
    }

    #[test]
    fn count_larger_than_payload_is_malformed() {
        let data = [
            prefix("000000000012000", "N", "003"),
            block("20240105", "134501", "SHOP", "0000000012000", "A1"),
        ]
        .concat();
        let line = reply_line(123, "", "", &data);
        assert!(matches!(
            SpendingHistory::decode_reply(&line),
            Reply::Malformed(DecodeError::Truncated { needed: 585, .. })
        ));
    }

    #[test]
    fn invalid_block_date_is_malformed() {
        let data = [
            prefix("000000000012000", "N", "001"),
            block("20241399", "134501", "SHOP", "0000000012000", "A1"),
        ]
        .concat();
        let line = reply_line(123, "", "", &data);
        assert!(matches!(
            SpendingHistory::decode_reply(&line),
            Reply::Malformed(DecodeError::InvalidDate { field: "transaction_date", .. })
        ));
    }
}
