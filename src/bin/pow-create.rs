use anyhow::{Context, Result};
use clap::Parser;
use filepow::{
    create_record_from_path, init_tracing, SearchConfigBuilder, SystemClock,
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOKEN_LENGTH,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Find a proof-of-work token for a file and print its header
#[derive(Parser, Debug)]
#[command(name = "pow-create")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create a proof-of-work header for a file", long_about = None)]
struct Args {
    /// Required number of leading zero bits
    #[arg(value_name = "NBITS")]
    nbits: u32,

    /// File to bind the proof to
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Give up after this many draws
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u64,

    /// Length of the random token
    #[arg(long, default_value_t = DEFAULT_TOKEN_LENGTH)]
    token_length: usize,

    /// Number of search threads
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Seed the token streams for a reproducible search
    #[arg(long)]
    seed: Option<u64>,

    /// Print the record as JSON instead of header text
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<()> {
    let mut builder = SearchConfigBuilder::default()
        .target_bits(args.nbits)
        .max_iterations(args.max_iterations)
        .token_length(args.token_length)
        .workers(args.threads);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build_validated()?;

    let record = create_record_from_path(&args.file, &config, &SystemClock)?;
    if args.json {
        let json = serde_json::to_string_pretty(&record).context("encoding record as JSON")?;
        println!("{json}");
    } else {
        print!("{}", record.to_header());
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing("warn");
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
