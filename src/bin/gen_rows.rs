//! Sample-input generator for exercising the aggregator at scale.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::Rng;

const STATIONS: &[&str] = &[
    "Abha", "Accra", "Athens", "Baghdad", "Bangkok", "Bogotá", "Bucharest",
    "Cairo", "Cape Town", "Chicago", "Darwin", "Denver", "Dhaka", "Dublin",
    "Hamburg", "Hanoi", "Havana", "Helsinki", "Istanbul", "Jakarta",
    "Karachi", "Kinshasa", "Lagos", "Lima", "Lisbon", "London", "Madrid",
    "Manila", "Melbourne", "Mexico City", "Moscow", "Mumbai", "Nairobi",
    "Oslo", "Paris", "Prague", "Reykjavík", "Riyadh", "Rome", "San Juan",
    "Seoul", "Singapore", "Sofia", "Sydney", "Tokyo", "Toronto", "Vienna",
    "Warsaw", "Wellington", "Zagreb", "Zürich", "Ürümqi",
];

/// Writes random `<station>;<value>` rows, one decimal place each.
#[derive(Parser)]
#[command(name = "gen-rows", version, about)]
struct Cli {
    /// Output file.
    output: PathBuf,

    /// Number of rows to write.
    #[arg(long, default_value_t = 1_000_000)]
    rows: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let file = match File::create(&cli.output) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot create {}: {err}", cli.output.display());
            return ExitCode::FAILURE;
        }
    };

    let mut out = BufWriter::new(file);
    let mut rng = rand::thread_rng();
    for _ in 0..cli.rows {
        let station = STATIONS.choose(&mut rng).unwrap_or(&STATIONS[0]);
        let tenths: i32 = rng.gen_range(-999..=999);
        let sign = if tenths < 0 { "-" } else { "" };
        let magnitude = tenths.unsigned_abs();
        if let Err(err) = writeln!(
            out,
            "{station};{sign}{}.{}",
            magnitude / 10,
            magnitude % 10
        ) {
            eprintln!("write failed: {err}");
            return ExitCode::FAILURE;
        }
    }
    if let Err(err) = out.flush() {
        eprintln!("write failed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
