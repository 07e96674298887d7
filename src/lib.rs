//! Parallel min/mean/max aggregation over huge `<key>;<value>` text files.
//!
//! The input is partitioned into line-aligned byte ranges, one per worker.
//! Each worker scans its range through a shared read-only view of the file,
//! folding every line into a private aggregation table keyed by raw bytes,
//! with values held as scaled integers (tenths). The partial tables are
//! merged with a commutative, associative combine and rendered in byte-
//! lexicographic key order, so the output is bit-exact regardless of worker
//! count or scheduling.
//!
//! ```no_run
//! use rowstats::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let output = engine.run("measurements.txt".as_ref())?;
//! print!("{output}");
//! # Ok::<(), rowstats::Error>(())
//! ```

pub mod agg;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod input;
pub mod parse;

pub use agg::{AggregateRecord, AggregationTable};
pub use chunk::ChunkRange;
pub use config::{EngineConfig, ParserStrategy, ReaderStrategy};
pub use engine::Engine;
pub use error::{Error, Result};
pub use input::SharedInput;
