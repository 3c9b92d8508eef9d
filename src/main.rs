use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter};

use merkle_cmp::cli::Cli;
use merkle_cmp::logging::init_logging;
use merkle_cmp::{CmpConfig, compare_files};

fn run(cli: Cli) -> Result<()> {
    let config = CmpConfig::load(cli.config.as_deref())?;
    let report = compare_files(&cli.file_a, &cli.file_b, &config)?;

    let stdout = io::stdout();
    report
        .write_to(&mut BufWriter::new(stdout.lock()))
        .context("无法写入比较结果")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse().check().unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("cmp: {:#}", err);
        std::process::exit(1);
    }
}
