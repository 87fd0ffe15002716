//! Benchmark runner for the transpose strategies.
//!
//! For each size: fill a random matrix, cache it to `data.txt` and read it
//! back as the reference copy, then time every algorithm. After each run
//! the matrix is restored with the serial transpose and compared against
//! the reference, so a broken strategy stops the run instead of
//! producing a timing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, bail};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};
use transpose_mt::{
    Algorithm, SquareMatrix, TransposeConfig, is_power_of_two, read_matrix, transpose,
    transpose_serial, write_matrix,
};

const TIMINGS_FILE: &str = "timings.txt";
const CACHE_FILE: &str = "data.txt";
const COLUMN_WIDTH: usize = 20;

const SIZES: [usize; 4] = [128, 1024, 2048, 4096];
const LONG_SIZES: [usize; 10] = [64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768];

const USAGE: &str = "usage: transpose-mt [-v|--verbose] [-l|--long]

  -v, --verbose   log progress and the worker count
  -l, --long      sweep sizes 64..32768 instead of 128, 1024, 2048, 4096

The worker count comes from TRANSPOSE_NUM_THREADS (default 8).";

#[derive(Debug, Default)]
struct Args {
    verbose: bool,
    long: bool,
}

fn parse_args() -> Option<Args> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "-l" | "--long" => args.long = true,
            "-h" | "--help" => return None,
            other => eprintln!("ignoring unknown argument {:?}", other),
        }
    }
    Some(args)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> anyhow::Result<()> {
    let Some(args) = parse_args() else {
        println!("{}", USAGE);
        return Ok(());
    };
    init_logging(args.verbose);

    let config = TransposeConfig::from_env();
    config.validate()?;
    info!(workers = config.workers, tile = config.tile_size, "maximum threads");
    println!("Timing algorithms...");

    let start_time = Instant::now();

    let file = File::create(TIMINGS_FILE)
        .with_context(|| format!("unable to open {} for writing", TIMINGS_FILE))?;
    let mut out = BufWriter::new(file);

    write!(out, "{:<w$}", "#N0=N1", w = COLUMN_WIDTH)?;
    for algorithm in Algorithm::ALL {
        write!(out, "{:<w$}", algorithm.label(), w = COLUMN_WIDTH)?;
    }
    writeln!(out)?;

    let sizes: &[usize] = if args.long { &LONG_SIZES } else { &SIZES };
    for &n in sizes {
        if !is_power_of_two(n) {
            bail!("matrix size {} is not a power of two", n);
        }
        info!(size = n, "timing size");

        let mut a = SquareMatrix::new(n)?;
        a.randomize_values();
        write_matrix(CACHE_FILE, &a)?;
        let reference = read_matrix(CACHE_FILE)?;

        write!(out, "{:<w$}", n, w = COLUMN_WIDTH)?;
        for (idx, algorithm) in Algorithm::ALL.into_iter().enumerate() {
            info!(
                "timing algorithm {}/{} ({})",
                idx + 1,
                Algorithm::ALL.len(),
                algorithm
            );

            let t = Instant::now();
            transpose(&mut a, algorithm, &config)
                .with_context(|| format!("{} transpose of {}x{} failed", algorithm, n, n))?;
            let elapsed = t.elapsed().as_secs_f64();

            // undo, then check against the cached copy
            transpose_serial(&mut a)?;
            if let Some((i, j)) = a.first_mismatch(&reference)? {
                bail!(
                    "{} transpose is wrong for N={}: mismatch at ({}, {})",
                    algorithm,
                    n,
                    i,
                    j
                );
            }

            write!(out, "{:<w$.7}", elapsed, w = COLUMN_WIDTH)?;
        }
        writeln!(out)?;
    }
    out.flush()
        .with_context(|| format!("unable to write {}", TIMINGS_FILE))?;

    println!();
    info!(
        seconds = start_time.elapsed().as_secs_f64(),
        "executable runtime"
    );
    println!("Timing complete: to view run 'cat {}'", TIMINGS_FILE);
    Ok(())
}
