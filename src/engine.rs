//! The aggregation pipeline: partition, scan in parallel, merge, render.
//!
//! Workers share nothing mutable. Each one gets a disjoint line-aligned
//! range of the read-only input, scans it into its own table, and hands the
//! table back. The only synchronization point is the join before the merge.
//! Any worker error aborts the whole run; merging a subset would silently
//! present incomplete results as complete.

use std::path::Path;
use std::time::Instant;

use memchr::memchr_iter;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::agg::{self, AggregationTable};
use crate::config::{EngineConfig, ParserStrategy};
use crate::error::Result;
use crate::format;
use crate::input::SharedInput;
use crate::parse;

pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline and returns the rendered output text.
    pub fn run(&self, path: &Path) -> Result<String> {
        let table = self.aggregate(path)?;
        format::render(&table)
    }

    /// Runs everything up to and including the merge.
    pub fn aggregate(&self, path: &Path) -> Result<AggregationTable> {
        let started = Instant::now();
        let workers = self.config.workers();

        // Open/map failures surface here, before any worker exists.
        let input = SharedInput::open(path, self.config.reader)?;
        let ranges = input.split(workers)?;
        debug!(
            bytes = input.len(),
            chunks = ranges.len(),
            workers,
            "input partitioned"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;
        let parser = self.config.parser;
        let partials = pool.install(|| {
            ranges
                .par_iter()
                .map(|range| {
                    let bytes = input.chunk(*range)?;
                    Ok(scan_chunk(&bytes, parser))
                })
                .collect::<Result<Vec<AggregationTable>>>()
        })?;

        let merged = agg::merge(partials);
        info!(
            keys = merged.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "aggregation complete"
        );
        Ok(merged)
    }
}

/// Scans one chunk's bytes into a fresh table.
///
/// Lines are delimited by `\n`; a trailing line without one is still
/// processed. Malformed lines are dropped and counted, nothing more.
#[must_use]
pub fn scan_chunk(bytes: &[u8], parser: ParserStrategy) -> AggregationTable {
    // rough key-cardinality guess from the chunk size
    let mut table = AggregationTable::with_capacity((bytes.len() / 256).max(8));
    let mut skipped = 0_u64;

    let mut start = 0;
    for newline in memchr_iter(b'\n', bytes) {
        ingest(&bytes[start..newline], parser, &mut table, &mut skipped);
        start = newline + 1;
    }
    if start < bytes.len() {
        ingest(&bytes[start..], parser, &mut table, &mut skipped);
    }

    if skipped > 0 {
        debug!(skipped, "dropped malformed lines");
    }
    table
}

#[inline]
fn ingest(line: &[u8], parser: ParserStrategy, table: &mut AggregationTable, skipped: &mut u64) {
    match parse::parse_line(line, parser) {
        Some((key, value)) => table.observe(key, value),
        None => *skipped += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserStrategy;

    #[test]
    fn scan_handles_trailing_line_without_newline() {
        let table = scan_chunk(b"a;1.0\nb;2.0\na;3.0", ParserStrategy::FixedPoint);
        assert_eq!(table.len(), 2);
        let a = table.get(b"a").unwrap();
        assert_eq!((a.min, a.max, a.sum, a.count), (10, 30, 40, 2));
    }

    #[test]
    fn malformed_lines_do_not_contaminate() {
        let table = scan_chunk(
            b"a;1.0\nC;abc\n\nno separator\nb;2.0\n",
            ParserStrategy::FixedPoint,
        );
        assert_eq!(table.len(), 2);
        assert!(table.get(b"C").is_none());
        assert_eq!(table.get(b"b").unwrap().sum, 20);
    }

    #[test]
    fn empty_chunk_is_empty_table() {
        assert!(scan_chunk(b"", ParserStrategy::FixedPoint).is_empty());
    }

    #[test]
    fn both_parsers_scan_identically() {
        let data = b"x;12.3\ny;-9.8\nx;100\nz;-0.5\n";
        let fixed = scan_chunk(data, ParserStrategy::FixedPoint);
        let float = scan_chunk(data, ParserStrategy::Float);
        for (key, record) in fixed.sorted_entries() {
            assert_eq!(float.get(key), Some(record));
        }
        assert_eq!(fixed.len(), float.len());
    }
}
