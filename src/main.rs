//! blockhash - ordered block digests of one file

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use blockhash::{Algorithm, BlockConfig, DigestPipeline, DrainPolicy};

#[derive(Parser, Debug)]
#[command(name = "blockhash")]
#[command(version, about = "Hash a file in fixed-size blocks, one digest per line")]
struct Cli {
    /// Read from this file
    #[arg(value_name = "INFILE")]
    input: Option<PathBuf>,

    /// Read from this file
    #[arg(short = 'i', long = "infile", value_name = "INFILE", conflicts_with = "input")]
    infile: Option<PathBuf>,

    /// Output to this file (default: stdout)
    #[arg(short, long, value_name = "OUTFILE")]
    outfile: Option<PathBuf>,

    /// Read blocks of size n MiB
    #[arg(short, long, value_name = "N", default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..))]
    blocksize: u32,

    /// Digest algorithm
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Md5)]
    algorithm: AlgorithmArg,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    jobs: usize,

    /// How eagerly finished digests are written while reading
    #[arg(long, value_enum, default_value_t = DrainArg::Greedy)]
    drain: DrainArg,

    /// Maximum number of blocks held in memory at once
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_in_flight: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Md5,
    Sha256,
    #[cfg(feature = "hash-blake3")]
    Blake3,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => Algorithm::Md5,
            AlgorithmArg::Sha256 => Algorithm::Sha256,
            #[cfg(feature = "hash-blake3")]
            AlgorithmArg::Blake3 => Algorithm::Blake3,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DrainArg {
    Greedy,
    Single,
}

impl From<DrainArg> for DrainPolicy {
    fn from(arg: DrainArg) -> Self {
        match arg {
            DrainArg::Greedy => DrainPolicy::Greedy,
            DrainArg::Single => DrainPolicy::Single,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout may carry the digests
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(input) = cli.input.clone().or_else(|| cli.infile.clone()) else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = BlockConfig::from_mib(cli.blocksize as usize)?
        .with_algorithm(cli.algorithm.into())
        .with_workers(cli.jobs)
        .with_drain(cli.drain.into())
        .with_max_in_flight(cli.max_in_flight.map(|n| n as usize));

    info!(
        infile = %input.display(),
        blocksize_mib = cli.blocksize,
        algorithm = %config.algorithm(),
        "reading"
    );

    // Open the output first so an unwritable path fails before any hashing
    let sink: Box<dyn Write> = match &cli.outfile {
        Some(path) => {
            info!(outfile = %path.display(), "writing");
            let file = File::create(path)
                .with_context(|| format!("failed to open write file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let reader = File::open(&input)
        .with_context(|| format!("failed to open read file {}", input.display()))?;

    let pipeline = DigestPipeline::new(config)?;
    pipeline
        .run(reader, sink)
        .with_context(|| format!("failed to hash {}", input.display()))?;

    Ok(())
}
