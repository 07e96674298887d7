//! Deterministic rendering of the final table.
//!
//! One line per key, ascending byte order, `<key>=<min>/<mean>/<max>` with
//! exactly one fractional digit each. Values are formatted straight from
//! their tenths representation; no float is involved, so there is no
//! negative-zero artifact to begin with and zero always prints as `0.0`.

use std::fmt::Write;

use crate::agg::AggregationTable;
use crate::error::{Error, Result};

/// Renders the final table into the complete output text.
///
/// Keys aggregate and sort by their raw bytes, but render through
/// `from_utf8_lossy`, so two distinct non-UTF-8 keys can print an
/// identical `U+FFFD` spelling while keeping their own lines and
/// aggregates.
///
/// A zero-count record cannot be produced by the pipeline; hitting one here
/// is an internal bug, reported as an invariant violation rather than
/// papered over with a division by zero.
pub fn render(table: &AggregationTable) -> Result<String> {
    let entries = table.sorted_entries();
    let mut out = String::with_capacity(entries.len() * 32);
    for (key, record) in entries {
        if record.count == 0 {
            return Err(Error::Invariant("zero-count record reached the formatter"));
        }
        out.push_str(&String::from_utf8_lossy(key));
        out.push('=');
        push_tenths(&mut out, record.min);
        out.push('/');
        push_tenths(&mut out, record.mean_tenths());
        out.push('/');
        push_tenths(&mut out, record.max);
        out.push('\n');
    }
    Ok(out)
}

/// Writes a tenths value as a decimal with one fractional digit.
fn push_tenths(out: &mut String, tenths: i64) {
    if tenths < 0 {
        out.push('-');
    }
    let magnitude = tenths.unsigned_abs();
    let _ = write!(out, "{}.{}", magnitude / 10, magnitude % 10);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::AggregationTable;

    fn render_rows(rows: &[(&[u8], i64)]) -> String {
        let mut table = AggregationTable::default();
        for (key, value) in rows {
            table.observe(key, *value);
        }
        render(&table).unwrap()
    }

    #[test]
    fn tenths_formatting() {
        let mut out = String::new();
        push_tenths(&mut out, 123);
        out.push(' ');
        push_tenths(&mut out, -98);
        out.push(' ');
        push_tenths(&mut out, 0);
        out.push(' ');
        push_tenths(&mut out, -5);
        out.push(' ');
        push_tenths(&mut out, 1000);
        assert_eq!(out, "12.3 -9.8 0.0 -0.5 100.0");
    }

    #[test]
    fn negative_zero_never_appears() {
        // values summing to zero across signs must print 0.0 for the mean
        let out = render_rows(&[(b"k", -5), (b"k", 5)]);
        assert_eq!(out, "k=-0.5/0.0/0.5\n");
        assert!(!out.contains("-0.0"));
    }

    #[test]
    fn keys_render_in_byte_order() {
        let out = render_rows(&[(b"b", 10), (b"a", 10), (b"c", 10)]);
        assert_eq!(out, "a=1.0/1.0/1.0\nb=1.0/1.0/1.0\nc=1.0/1.0/1.0\n");
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert_eq!(render(&AggregationTable::default()).unwrap(), "");
    }
}
