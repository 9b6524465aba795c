//! Unicode ↔ legacy Thai single-byte code page (Windows-874 / TIS-620).
//!
//! # Responsibilities
//! - Encode outbound text rune by rune, failing hard on anything the
//!   backend cannot represent
//! - Decode inbound bytes with the full code page table (never fails)
//!
//! # Design Decisions
//! - Encode accepts only ASCII and the Thai block U+0E01..=U+0E5B
//! - Thai runes map linearly onto 0xA1..=0xFB in both directions
//! - Decode also covers the Windows-874 punctuation in 0x80..=0x97 because
//!   backend messages carry it; undefined bytes become U+FFFD

use thiserror::Error;

/// First code point of the Thai block accepted by the encoder.
pub const THAI_FIRST: char = '\u{0E01}';
/// Last code point of the Thai block accepted by the encoder.
pub const THAI_LAST: char = '\u{0E5B}';

const THAI_BASE_BYTE: u8 = 0xA1;
const THAI_LAST_BYTE: u8 = 0xFB;

/// A character with no mapping in the legacy code page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot encode {rune:?} (U+{code:04X}) at char index {index}")]
pub struct EncodingError {
    pub rune: char,
    pub code: u32,
    pub index: usize,
}

/// Encode text into legacy bytes.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(text.len());
    for (index, rune) in text.chars().enumerate() {
        let code = rune as u32;
        if code <= 0x7F {
            out.push(code as u8);
        } else if (THAI_FIRST..=THAI_LAST).contains(&rune) {
            out.push((code - THAI_FIRST as u32) as u8 + THAI_BASE_BYTE);
        } else {
            return Err(EncodingError { rune, code, index });
        }
    }
    Ok(out)
}

/// Decode legacy bytes into text.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

/// Map a single legacy byte to its Unicode character.
pub fn decode_byte(byte: u8) -> char {
    match byte {
        0x00..=0x7F => byte as char,
        0x80 => '\u{20AC}',
        0x85 => '\u{2026}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0xA0 => '\u{00A0}',
        THAI_BASE_BYTE..=THAI_LAST_BYTE => {
            let code = (byte - THAI_BASE_BYTE) as u32 + THAI_FIRST as u32;
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
        _ => char::REPLACEMENT_CHARACTER,
    }
}
