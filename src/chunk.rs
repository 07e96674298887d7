use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};

use memchr::memchr;

/// A line-aligned byte range of the input, `[start, end)`.
///
/// The ordered ranges produced by the splitters tile the whole file with no
/// gaps or overlaps. `start` is 0 or the byte right after a newline; `end`
/// is the byte right after a newline, or the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: usize,
    pub end: usize,
}

impl ChunkRange {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Splits in-memory (or mapped) bytes into about `workers` line-aligned
/// ranges.
///
/// Each boundary candidate is pushed forward to the next newline, so the
/// per-boundary cost is one short forward scan, not a pass over the file.
/// A file with fewer lines than workers degrades to fewer, larger chunks;
/// an empty input yields no ranges.
#[must_use]
pub fn split_slice(data: &[u8], workers: usize) -> Vec<ChunkRange> {
    let len = data.len();
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let target = (len / workers).max(1);

    let mut ranges = Vec::with_capacity(workers + 1);
    let mut start = 0;
    while start < len {
        let candidate = start + target;
        let end = if candidate >= len {
            len
        } else {
            match memchr(b'\n', &data[candidate..]) {
                Some(offset) => candidate + offset + 1,
                // no newline between the candidate and EOF
                None => len,
            }
        };
        ranges.push(ChunkRange { start, end });
        start = end;
    }
    ranges
}

/// Same contract as [`split_slice`], but scans boundaries by seeking the
/// file and reading to the end of the current line, never loading the file.
pub fn split_file(file: &File, workers: usize) -> io::Result<Vec<ChunkRange>> {
    let len = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
    if len == 0 || workers == 0 {
        return Ok(Vec::new());
    }
    let target = (len / workers).max(1);

    let mut reader = BufReader::new(file);
    let mut skipped = Vec::new();
    let mut ranges = Vec::with_capacity(workers + 1);
    let mut start = 0;
    while start < len {
        let candidate = start + target;
        let end = if candidate >= len {
            len
        } else {
            reader.seek(SeekFrom::Start(candidate as u64))?;
            skipped.clear();
            let read = reader.read_until(b'\n', &mut skipped)?;
            (candidate + read).min(len)
        };
        ranges.push(ChunkRange { start, end });
        start = end;
    }
    Ok(ranges)
}
