//! Literal classification and bit-arithmetic helpers shared by the patterns.
//!
//! Parse failures are never fatal: callers get `None`, log the site, and move
//! on, so one malformed literal cannot abort a run.

use regex::Regex;

/// True for a decimal integer literal, optionally negative.
pub fn is_decimal(text: &str) -> bool {
    static PATTERN: &str = r"^-?\d+$";
    Regex::new(PATTERN).expect("static regex").is_match(text)
}

/// True for a `0x`/`0X` hexadecimal literal.
pub fn is_hex(text: &str) -> bool {
    static PATTERN: &str = r"^0[xX][0-9a-fA-F]+$";
    Regex::new(PATTERN).expect("static regex").is_match(text)
}

/// True for the literals `true`/`false` (case-insensitive, as `stdbool.h`
/// code is commonly written).
pub fn is_bool(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
}

/// Parses a decimal or hexadecimal integer literal.
///
/// Suffixed literals (`5U`, `0x10UL`) are not recognized; they fail the shape
/// checks above and the caller skips them.
pub fn parse_int(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else if is_decimal(text) {
        text.parse::<i64>().ok()
    } else {
        None
    }
}

/// Hamming weight of `value`: the bit-flip distance from zero. A branch
/// constant with low weight can be reached from zero by few faults.
pub fn hamming_weight(value: i64) -> u32 {
    value.count_ones()
}
