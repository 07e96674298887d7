//! Line parsing: `<key>;<value>` into a key view and a value in tenths.
//!
//! Values carry at most one fractional digit, so every well-formed value is
//! an exact integer number of tenths. The default parser accumulates digits
//! directly into that integer; no float is ever involved, which keeps the
//! aggregation bit-exact. A float-roundtrip parser exists as an alternate
//! strategy and must agree with the fixed-point one on well-formed input.

use memchr::memchr;

use crate::config::ParserStrategy;

/// Splits one line (newline already stripped) into key bytes and tenths.
///
/// Returns `None` for malformed lines: missing separator, empty or
/// non-numeric value. Malformed lines are dropped by the caller with no
/// effect on any aggregate.
#[inline]
#[must_use]
pub fn parse_line(line: &[u8], strategy: ParserStrategy) -> Option<(&[u8], i64)> {
    let sep = memchr(b';', line)?;
    let value = match strategy {
        ParserStrategy::FixedPoint => parse_tenths(&line[sep + 1..])?,
        ParserStrategy::Float => parse_tenths_via_float(&line[sep + 1..])?,
    };
    Some((&line[..sep], value))
}

/// Digit-scanning fixed-point parser.
///
/// Accepts an optional leading `-`, one or more integer digits, and an
/// optional `.` followed by exactly one fractional digit. When no
/// fractional digit is present the result is scaled by ten so the unit is
/// always tenths. A value whose tenths representation overflows `i64` is
/// rejected like any other malformed value.
#[inline]
#[must_use]
pub fn parse_tenths(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.split_first()? {
        (b'-', rest) => (true, rest),
        _ => (false, bytes),
    };

    let mut value: i64 = 0;
    let mut int_digits = 0_u32;
    let mut frac_digits = 0_u32;
    let mut in_fraction = false;
    for &byte in digits {
        match byte {
            b'0'..=b'9' => {
                if in_fraction {
                    if frac_digits == 1 {
                        return None;
                    }
                    frac_digits += 1;
                } else {
                    int_digits += 1;
                }
                value = value
                    .checked_mul(10)?
                    .checked_add(i64::from(byte - b'0'))?;
            }
            b'.' => {
                if in_fraction || int_digits == 0 {
                    return None;
                }
                in_fraction = true;
            }
            _ => return None,
        }
    }
    if int_digits == 0 || (in_fraction && frac_digits == 0) {
        return None;
    }
    if frac_digits == 0 {
        value = value.checked_mul(10)?;
    }
    Some(if negative { -value } else { value })
}

/// Reference parser: f64 roundtrip, scale by ten, round to nearest.
#[inline]
#[must_use]
pub fn parse_tenths_via_float(bytes: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(bytes).ok()?;
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some((value * 10.0).round() as i64)
}
