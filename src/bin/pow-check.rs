use anyhow::{Context, Result};
use clap::Parser;
use filepow::{init_tracing, verify_paths, CheckRun};
use std::path::PathBuf;
use std::process::ExitCode;

/// Verify a proof-of-work header against a file
#[derive(Parser, Debug)]
#[command(name = "pow-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check a proof-of-work header against a file", long_about = None)]
struct Args {
    /// Header produced by pow-create
    #[arg(value_name = "POWHEADER")]
    header: PathBuf,

    /// File the header claims to cover
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Exit with status 2 when a check fails
    #[arg(long)]
    strict: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let run = CheckRun::from_result(verify_paths(&args.header, &args.file), args.strict)?;
    if args.json {
        let json = serde_json::to_string_pretty(&run).context("encoding report as JSON")?;
        println!("{json}");
    } else {
        for line in run.lines() {
            println!("{line}");
        }
    }
    Ok(ExitCode::from(run.exit_code))
}

fn main() -> ExitCode {
    init_tracing("warn");
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
