//! Fixed-width read/write primitives.
//!
//! All widths and offsets count runes (Unicode scalar values), never bytes.
//! Padding happens before transcoding, so a Thai character occupies exactly
//! one position on the wire just like an ASCII one.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Failure reading a numeric field out of a fixed-width line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedError {
    #[error("non-numeric value {raw:?} at offset {offset} width {width}")]
    InvalidNumber {
        offset: usize,
        width: usize,
        raw: String,
    },
}

/// Keep the first `width` runes of `s`, or right-pad it with spaces.
pub fn pad_or_truncate(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Zero-pad `n` on the left to `width` digits.
///
/// A value with more digits than `width` is written in full, so the result is
/// wider than requested. Callers that need an exact width must check the
/// length; the layout engine reports this as an overflow.
pub fn pad_int_zero(n: u64, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

/// Implicit fixed-point encoding: `v * 10^scale`, rounded half away from
/// zero, then zero-padded like [`pad_int_zero`].
///
/// Returns `None` for negative values or values too large for a `u64` once
/// scaled.
pub fn pad_decimal_zero(v: Decimal, width: usize, scale: u32) -> Option<String> {
    if v.is_sign_negative() && !v.is_zero() {
        return None;
    }
    let factor = Decimal::from(10u64.checked_pow(scale)?);
    let scaled = v
        .checked_mul(factor)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Some(pad_int_zero(scaled.to_u64()?, width))
}

/// A decoded reply line addressed by rune offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedText {
    runes: Vec<char>,
}

impl FixedText {
    pub fn new(text: &str) -> Self {
        Self {
            runes: text.chars().collect(),
        }
    }

    /// Length in runes.
    pub fn len(&self) -> usize {
        self.runes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runes.is_empty()
    }

    /// Untrimmed slice. Offsets past the end yield an empty string; a window
    /// running past the end is clamped to what is available.
    pub fn slice(&self, offset: usize, width: usize) -> String {
        if offset >= self.runes.len() {
            return String::new();
        }
        let end = offset.saturating_add(width).min(self.runes.len());
        self.runes[offset..end].iter().collect()
    }

    /// Slice and trim surrounding whitespace.
    pub fn read_string(&self, offset: usize, width: usize) -> String {
        self.slice(offset, width).trim().to_string()
    }

    /// Read an unsigned integer. A blank field reads as zero.
    pub fn read_int(&self, offset: usize, width: usize) -> Result<u64, FixedError> {
        let raw = self.read_string(offset, width);
        if raw.is_empty() {
            return Ok(0);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FixedError::InvalidNumber { offset, width, raw });
        }
        raw.parse()
            .map_err(|_| FixedError::InvalidNumber { offset, width, raw })
    }

    /// Read an implicit fixed-point decimal: the digits divided by `10^scale`.
    pub fn read_scaled_decimal(
        &self,
        offset: usize,
        width: usize,
        scale: u32,
    ) -> Result<Decimal, FixedError> {
        let n = self.read_int(offset, width)?;
        Decimal::try_from_i128_with_scale(n as i128, scale).map_err(|_| {
            FixedError::InvalidNumber {
                offset,
                width,
                raw: self.read_string(offset, width),
            }
        })
    }
}

impl From<&str> for FixedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
