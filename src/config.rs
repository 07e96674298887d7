use std::thread;

/// How workers obtain the bytes of their assigned chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderStrategy {
    /// One process-wide read-only memory map, shared by all workers.
    #[default]
    Mmap,
    /// Each worker opens the file itself and seek+reads its range.
    Seek,
}

/// How the numeric field of each line is converted to tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserStrategy {
    /// Direct digit scanning into a scaled integer. Deterministic, no
    /// intermediate float.
    #[default]
    FixedPoint,
    /// Parse as f64, scale by ten, round to nearest. Agrees with
    /// `FixedPoint` on every well-formed value; kept as a cross-check.
    Float,
}

/// Tuning knobs for one aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Upper bound on worker parallelism. Capped to available hardware
    /// parallelism; also the target chunk count.
    pub max_threads: usize,
    pub reader: ReaderStrategy,
    pub parser: ParserStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_threads: available_parallelism(),
            reader: ReaderStrategy::default(),
            parser: ParserStrategy::default(),
        }
    }
}

impl EngineConfig {
    /// Effective worker count: at least one, never more than the machine
    /// can actually run.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.max_threads.clamp(1, available_parallelism())
    }
}

fn available_parallelism() -> usize {
    thread::available_parallelism().map_or(1, usize::from)
}
