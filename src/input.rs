use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;

use crate::chunk::{self, ChunkRange};
use crate::config::ReaderStrategy;
use crate::error::{Error, Result};

/// Read-only handle to the input file, shared explicitly with every worker.
///
/// The file is assumed unmodified for the duration of the run. Workers only
/// ever touch disjoint ranges, so no synchronization is needed on top of
/// the handle itself.
#[derive(Debug)]
pub enum SharedInput {
    /// One process-wide memory map, created before any worker starts.
    Mapped(memmap2::Mmap),
    /// No map; each chunk access opens the file and seek+reads its range.
    Seek { path: PathBuf, len: usize },
}

impl SharedInput {
    /// Opens the input. Any failure here is fatal for the whole run and
    /// happens before a single worker is spawned.
    pub fn open(path: &Path, strategy: ReaderStrategy) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| Error::Open {
                path: path.to_owned(),
                source,
            })?
            .len();
        let len = usize::try_from(len).unwrap_or(usize::MAX);

        // Zero-length files cannot be mapped on every platform; they also
        // never produce a chunk, so the seek representation costs nothing.
        if len == 0 || strategy == ReaderStrategy::Seek {
            return Ok(Self::Seek {
                path: path.to_owned(),
                len,
            });
        }

        let map = unsafe { MmapOptions::new().map(&file) }.map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self::Mapped(map))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Mapped(map) => map.len(),
            Self::Seek { len, .. } => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Partitions the whole input into line-aligned ranges, one per worker.
    pub fn split(&self, workers: usize) -> Result<Vec<ChunkRange>> {
        match self {
            Self::Mapped(map) => Ok(chunk::split_slice(map, workers)),
            Self::Seek { path, len } => {
                if *len == 0 {
                    return Ok(Vec::new());
                }
                let file = File::open(path)?;
                Ok(chunk::split_file(&file, workers)?)
            }
        }
    }

    /// Bytes of one assigned range: borrowed straight out of the map, or
    /// read into a worker-owned buffer.
    pub fn chunk(&self, range: ChunkRange) -> Result<Cow<'_, [u8]>> {
        match self {
            Self::Mapped(map) => Ok(Cow::Borrowed(&map[range.start..range.end])),
            Self::Seek { path, .. } => {
                let mut file = File::open(path)?;
                file.seek(SeekFrom::Start(range.start as u64))?;
                let mut buf = vec![0_u8; range.len()];
                file.read_exact(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }
}
