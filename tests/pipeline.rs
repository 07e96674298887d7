//! End-to-end tests over real files: partition, parallel scan, merge,
//! render, for every reader/parser strategy combination.

use std::io::Write;

use rowstats::engine::scan_chunk;
use rowstats::{Engine, EngineConfig, Error, ParserStrategy, ReaderStrategy, SharedInput};

fn write_input(data: &[u8]) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(data).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn engine(threads: usize, reader: ReaderStrategy, parser: ParserStrategy) -> Engine {
    Engine::new(EngineConfig {
        max_threads: threads,
        reader,
        parser,
    })
}

const STRATEGIES: &[(ReaderStrategy, ParserStrategy)] = &[
    (ReaderStrategy::Mmap, ParserStrategy::FixedPoint),
    (ReaderStrategy::Mmap, ParserStrategy::Float),
    (ReaderStrategy::Seek, ParserStrategy::FixedPoint),
    (ReaderStrategy::Seek, ParserStrategy::Float),
];

#[test]
fn two_chunk_example_is_bit_exact() {
    let tmp = write_input(b"A;1.0\nB;-2.5\nA;3.0\n");
    for &(reader, parser) in STRATEGIES {
        let out = engine(2, reader, parser).run(tmp.path()).unwrap();
        assert_eq!(out, "A=1.0/2.0/3.0\nB=-2.5/-2.5/-2.5\n");
    }
}

#[test]
fn chunk_count_does_not_change_the_answer() {
    let mut data = Vec::new();
    for i in 0..500_i32 {
        let station = ["Oslo", "Lima", "Cairo", "Hanoi", "Perth"][i as usize % 5];
        let tenths = (i * 37) % 1999 - 999;
        let sign = if tenths < 0 { "-" } else { "" };
        let magnitude = tenths.unsigned_abs();
        writeln!(
            data,
            "{station};{sign}{}.{}",
            magnitude / 10,
            magnitude % 10
        )
        .unwrap();
    }
    let tmp = write_input(&data);

    let baseline = engine(1, ReaderStrategy::Mmap, ParserStrategy::FixedPoint)
        .run(tmp.path())
        .unwrap();
    for threads in [2, 3, 7, 16] {
        for &(reader, parser) in STRATEGIES {
            let out = engine(threads, reader, parser).run(tmp.path()).unwrap();
            assert_eq!(out, baseline, "threads={threads} {reader:?} {parser:?}");
        }
    }
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let tmp = write_input(b"A;1.0\nC;abc\nbroken line\n\nB;2.0\nA;2.0\n");
    let out = engine(3, ReaderStrategy::Mmap, ParserStrategy::FixedPoint)
        .run(tmp.path())
        .unwrap();
    assert_eq!(out, "A=1.0/1.5/2.0\nB=2.0/2.0/2.0\n");
}

#[test]
fn trailing_line_without_newline_counts() {
    let tmp = write_input(b"A;1.0\nA;3.0");
    for &(reader, parser) in STRATEGIES {
        let out = engine(4, reader, parser).run(tmp.path()).unwrap();
        assert_eq!(out, "A=1.0/2.0/3.0\n");
    }
}

#[test]
fn empty_file_produces_empty_output() {
    let tmp = write_input(b"");
    for &(reader, parser) in STRATEGIES {
        let out = engine(4, reader, parser).run(tmp.path()).unwrap();
        assert_eq!(out, "");
    }
}

#[test]
fn missing_input_fails_before_any_work() {
    let err = engine(4, ReaderStrategy::Mmap, ParserStrategy::FixedPoint)
        .run("does-not-exist.txt".as_ref())
        .unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}

#[test]
fn worker_read_failure_aborts_with_no_partial_result() {
    let tmp = write_input(b"A;1.0\nB;2.0\nC;3.0\nD;4.0\n");
    let input = SharedInput::open(tmp.path(), ReaderStrategy::Seek).unwrap();
    let ranges = input.split(4).unwrap();
    assert!(ranges.len() > 1);

    // the file shrinks under the run; later chunks now point past EOF
    tmp.as_file().set_len(3).unwrap();

    // same fail-fast collection the engine's worker phase uses: the first
    // chunk-read error wins and nothing reaches the merge
    let partials: rowstats::Result<Vec<_>> = ranges
        .iter()
        .map(|range| {
            let bytes = input.chunk(*range)?;
            Ok(scan_chunk(&bytes, ParserStrategy::FixedPoint))
        })
        .collect();
    assert!(matches!(partials.unwrap_err(), Error::Io(_)));
}

#[test]
fn keys_are_strictly_ascending_bytes() {
    let tmp = write_input("Zürich;1.0\nOslo;2.0\nÅrhus;3.0\nOslo;4.0\n".as_bytes());
    let out = engine(2, ReaderStrategy::Mmap, ParserStrategy::FixedPoint)
        .run(tmp.path())
        .unwrap();
    let keys: Vec<&str> = out
        .lines()
        .map(|line| line.split_once('=').unwrap().0)
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 3, "no duplicate keys");
}

#[test]
fn no_negative_zero_in_output() {
    // mean of each key is exactly zero with negative contributions
    let tmp = write_input(b"A;-0.5\nA;0.5\nB;-10.0\nB;10.0\n");
    for &(reader, parser) in STRATEGIES {
        let out = engine(2, reader, parser).run(tmp.path()).unwrap();
        assert!(!out.contains("-0.0"), "{out}");
        assert_eq!(out, "A=-0.5/0.0/0.5\nB=-10.0/0.0/10.0\n");
    }
}
