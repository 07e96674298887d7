use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use rowstats::{Engine, EngineConfig, ParserStrategy, ReaderStrategy};

/// Per-key min/mean/max over a `<key>;<value>` text file.
#[derive(Parser)]
#[command(name = "rowstats", version, about)]
struct Cli {
    /// Input file, one `<key>;<value>` record per line.
    input: PathBuf,

    /// Maximum worker parallelism (default: all hardware threads).
    #[arg(long)]
    threads: Option<usize>,

    /// How workers read their chunk of the file.
    #[arg(long, value_enum, default_value_t = ReaderChoice::Mmap)]
    reader: ReaderChoice,

    /// How numeric values are parsed.
    #[arg(long, value_enum, default_value_t = ParserChoice::FixedPoint)]
    parser: ParserChoice,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReaderChoice {
    /// Shared read-only memory map.
    Mmap,
    /// Independent seek+read per worker.
    Seek,
}

#[derive(Clone, Copy, ValueEnum)]
enum ParserChoice {
    /// Scaled-integer digit scanning.
    FixedPoint,
    /// Float roundtrip cross-check.
    Float,
}

fn main() -> ExitCode {
    // diagnostics go to stderr; stdout carries only the results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EngineConfig::default();
    if let Some(threads) = cli.threads {
        config.max_threads = threads;
    }
    config.reader = match cli.reader {
        ReaderChoice::Mmap => ReaderStrategy::Mmap,
        ReaderChoice::Seek => ReaderStrategy::Seek,
    };
    config.parser = match cli.parser {
        ParserChoice::FixedPoint => ParserStrategy::FixedPoint,
        ParserChoice::Float => ParserStrategy::Float,
    };

    match Engine::new(config).run(&cli.input) {
        Ok(output) => {
            let stdout = std::io::stdout();
            let mut stdout = stdout.lock();
            if let Err(err) = stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                error!("writing results: {err}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
