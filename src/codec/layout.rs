//! Declarative field tables and the generic encode/decode engine.
//!
//! # Responsibilities
//! - Describe each fixed-width field once: name, offset, width, kind
//! - Lay request values out into an exact-width body
//! - Read scalar fields and repeated blocks back out of a reply
//!
//! # Design Decisions
//! - Request fields are written in table order; offsets are relative to the
//!   body start and must be contiguous
//! - Reply scalar offsets are absolute within the reply line (envelope echo
//!   included); block field offsets are relative to the block start
//! - Blank numeric fields read as zero, blank dates/times as `None`

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::codec::error::{CodecError, DecodeError};
use crate::codec::fixed::{pad_decimal_zero, pad_int_zero, pad_or_truncate, FixedError, FixedText};

const DATE_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H%M%S";

/// How a field's characters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Space-padded text.
    Text,
    /// Zero-padded unsigned integer.
    Number,
    /// Implicit fixed-point decimal with `scale` implied digits.
    Amount { scale: u32 },
    /// YYYYMMDD.
    Date,
    /// HHMMSS.
    Time,
}

/// One fixed-width field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn text(name: &'static str, offset: usize, width: usize) -> Self {
        Self { name, offset, width, kind: FieldKind::Text }
    }

    pub const fn number(name: &'static str, offset: usize, width: usize) -> Self {
        Self { name, offset, width, kind: FieldKind::Number }
    }

    /// Currency-like value with two implied decimals.
    pub const fn amount(name: &'static str, offset: usize, width: usize) -> Self {
        Self::scaled(name, offset, width, 2)
    }

    pub const fn scaled(name: &'static str, offset: usize, width: usize, scale: u32) -> Self {
        Self { name, offset, width, kind: FieldKind::Amount { scale } }
    }

    pub const fn date(name: &'static str, offset: usize) -> Self {
        Self { name, offset, width: 8, kind: FieldKind::Date }
    }

    pub const fn time(name: &'static str, offset: usize) -> Self {
        Self { name, offset, width: 6, kind: FieldKind::Time }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// A typed field value, on either side of the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Number(u64),
    Amount(Decimal),
    Date(Option<NaiveDate>),
    Time(Option<NaiveTime>),
}

/// A `(offset, width)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub width: usize,
}

impl Span {
    pub const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }
}

/// Where an operation's reply carries its business error code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorWindow {
    pub code: Span,
    pub message: Span,
}

impl ErrorWindow {
    /// A two-character code immediately followed by a 50-character message.
    pub const fn at(offset: usize) -> Self {
        Self {
            code: Span::new(offset, 2),
            message: Span::new(offset + 2, 50),
        }
    }
}

/// A count field followed by `count` fixed-width blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub count: Field,
    pub block_width: usize,
    pub fields: &'static [Field],
}

impl Repeat {
    /// Absolute offset of block `index`.
    pub const fn block_start(&self, index: usize) -> usize {
        self.count.end() + index * self.block_width
    }

    /// End offset of `count` blocks, or `None` when it does not fit a `usize`.
    pub fn blocks_end(&self, count: u64) -> Option<usize> {
        usize::try_from(count)
            .ok()?
            .checked_mul(self.block_width)?
            .checked_add(self.count.end())
    }
}

/// Everything needed to decode one operation's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyLayout {
    pub business: ErrorWindow,
    pub fields: &'static [Field],
    pub repeat: Option<Repeat>,
}

impl ReplyLayout {
    /// Runes that must be present before any block is read.
    pub fn fixed_len(&self) -> usize {
        let scalars = self.fields.iter().map(Field::end).max().unwrap_or(0);
        match &self.repeat {
            Some(repeat) => scalars.max(repeat.count.end()),
            None => scalars,
        }
    }
}

/// Total body width of a request layout.
pub fn body_width(layout: &[Field]) -> usize {
    layout.iter().map(|f| f.width).sum()
}

/// True when every field starts where the previous one ended, from zero.
pub fn is_contiguous(layout: &[Field]) -> bool {
    let mut next = 0;
    for field in layout {
        if field.offset != next {
            return false;
        }
        next = field.end();
    }
    true
}

/// Lay values out in table order into the fixed-width body.
pub fn encode_body(layout: &[Field], values: &[Value]) -> Result<String, CodecError> {
    if layout.len() != values.len() {
        return Err(CodecError::ValueCount {
            expected: layout.len(),
            actual: values.len(),
        });
    }

    let mut body = String::with_capacity(body_width(layout));
    for (field, value) in layout.iter().zip(values) {
        body.push_str(&encode_field(field, value)?);
    }
    Ok(body)
}

fn encode_field(field: &Field, value: &Value) -> Result<String, CodecError> {
    let mismatch = || CodecError::KindMismatch {
        field: field.name,
        expected: field.kind,
    };

    let encoded = match (field.kind, value) {
        (FieldKind::Text, Value::Text(s)) => pad_or_truncate(s, field.width),
        (FieldKind::Number, Value::Number(n)) => pad_int_zero(*n, field.width),
        (FieldKind::Amount { scale }, Value::Amount(v)) => pad_decimal_zero(*v, field.width, scale)
            .ok_or(CodecError::InvalidAmount { field: field.name })?,
        (FieldKind::Date, Value::Date(d)) => match d {
            Some(d) => d.format(DATE_FORMAT).to_string(),
            None => pad_or_truncate("", field.width),
        },
        (FieldKind::Time, Value::Time(t)) => match t {
            Some(t) => t.format(TIME_FORMAT).to_string(),
            None => pad_or_truncate("", field.width),
        },
        _ => return Err(mismatch()),
    };

    let len = encoded.chars().count();
    if len > field.width {
        return Err(CodecError::Overflow {
            field: field.name,
            width: field.width,
            len,
        });
    }
    Ok(encoded)
}

/// Decoded fields of one reply (or one repeated block).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<(&'static str, Value)>,
    blocks: Vec<Record>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    fn require(&self, name: &'static str) -> Result<&Value, DecodeError> {
        self.get(name).ok_or(DecodeError::MissingField { field: name })
    }

    pub fn text(&self, name: &'static str) -> Result<String, DecodeError> {
        match self.require(name)? {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(DecodeError::WrongKind { field: name }),
        }
    }

    pub fn number(&self, name: &'static str) -> Result<u64, DecodeError> {
        match self.require(name)? {
            Value::Number(n) => Ok(*n),
            _ => Err(DecodeError::WrongKind { field: name }),
        }
    }

    pub fn amount(&self, name: &'static str) -> Result<Decimal, DecodeError> {
        match self.require(name)? {
            Value::Amount(v) => Ok(*v),
            _ => Err(DecodeError::WrongKind { field: name }),
        }
    }

    pub fn date(&self, name: &'static str) -> Result<Option<NaiveDate>, DecodeError> {
        match self.require(name)? {
            Value::Date(d) => Ok(*d),
            _ => Err(DecodeError::WrongKind { field: name }),
        }
    }

    pub fn time(&self, name: &'static str) -> Result<Option<NaiveTime>, DecodeError> {
        match self.require(name)? {
            Value::Time(t) => Ok(*t),
            _ => Err(DecodeError::WrongKind { field: name }),
        }
    }

    /// Repeated blocks, in wire order.
    pub fn blocks(&self) -> &[Record] {
        &self.blocks
    }
}

/// Decode scalar fields and repeated blocks. Error windows are not consulted
/// here; see [`crate::codec::reply::decode_reply`].
pub fn decode_fields(layout: &ReplyLayout, text: &FixedText) -> Result<Record, DecodeError> {
    let needed = layout.fixed_len();
    if text.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            actual: text.len(),
        });
    }

    let mut record = Record {
        values: decode_table(layout.fields, text, 0)?,
        blocks: Vec::new(),
    };

    if let Some(repeat) = &layout.repeat {
        let count = text
            .read_int(repeat.count.offset, repeat.count.width)
            .map_err(|e| number_error(repeat.count.name, e))?;

        let needed = repeat.blocks_end(count).unwrap_or(usize::MAX);
        if text.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                actual: text.len(),
            });
        }
        // Bounded by the text length checked above.
        let count = count as usize;

        record.blocks = (0..count)
            .map(|i| {
                decode_table(repeat.fields, text, repeat.block_start(i)).map(|values| Record {
                    values,
                    blocks: Vec::new(),
                })
            })
            .collect::<Result<_, _>>()?;
    }

    Ok(record)
}

fn decode_table(
    fields: &[Field],
    text: &FixedText,
    base: usize,
) -> Result<Vec<(&'static str, Value)>, DecodeError> {
    fields
        .iter()
        .map(|field| decode_field(field, text, base + field.offset).map(|v| (field.name, v)))
        .collect()
}

fn decode_field(field: &Field, text: &FixedText, offset: usize) -> Result<Value, DecodeError> {
    let value = match field.kind {
        FieldKind::Text => Value::Text(text.read_string(offset, field.width)),
        FieldKind::Number => Value::Number(
            text.read_int(offset, field.width)
                .map_err(|e| number_error(field.name, e))?,
        ),
        FieldKind::Amount { scale } => Value::Amount(
            text.read_scaled_decimal(offset, field.width, scale)
                .map_err(|e| number_error(field.name, e))?,
        ),
        FieldKind::Date => {
            let raw = text.read_string(offset, field.width);
            if raw.is_empty() || raw.bytes().all(|b| b == b'0') {
                Value::Date(None)
            } else {
                let date = NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                    .map_err(|_| DecodeError::InvalidDate { field: field.name, raw })?;
                Value::Date(Some(date))
            }
        }
        FieldKind::Time => {
            let raw = text.read_string(offset, field.width);
            if raw.is_empty() {
                Value::Time(None)
            } else {
                let time = NaiveTime::parse_from_str(&raw, TIME_FORMAT)
                    .map_err(|_| DecodeError::InvalidTime { field: field.name, raw })?;
                Value::Time(Some(time))
            }
        }
    };
    Ok(value)
}

fn number_error(field: &'static str, err: FixedError) -> DecodeError {
    match err {
        FixedError::InvalidNumber { raw, .. } => DecodeError::InvalidNumber { field, raw },
    }
}
