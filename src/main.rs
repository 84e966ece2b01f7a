//! daxpy-bench CLI
//!
//! Runs the DAXPY walkthrough and benchmark and prints the report to stdout
//! as each section finishes. Diagnostics go to stderr through `tracing` (set
//! `RUST_LOG=debug` for per-size spans).

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use daxpy_bench::{config, run_with, BenchConfig, OutputFormat, ReportWriter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "daxpy-bench")]
#[command(author, version, about = "Benchmark Z = A*X + Y: reference loop vs register-resident kernel")]
struct Cli {
    /// Timed runs per kernel per size
    #[arg(short, long, default_value_t = config::DEFAULT_RUNS)]
    runs: usize,

    /// Absolute tolerance for the correctness check
    #[arg(short, long, default_value_t = config::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Scalar multiplier A for the benchmark (the walkthrough always uses 2.0)
    #[arg(short = 'a', long, default_value_t = config::DEFAULT_SCALAR, allow_negative_numbers = true)]
    scalar: f64,

    /// Benchmark n = 2^K (repeatable)
    #[arg(short = 'k', long = "size-exp", value_name = "K")]
    size_exps: Vec<u32>,

    /// Benchmark an exact vector length (repeatable)
    #[arg(short = 'n', long = "size", value_name = "N")]
    sizes: Vec<usize>,

    /// Skip the n=3 walkthrough
    #[arg(long)]
    skip_walkthrough: bool,

    /// Output as JSON Lines, one object per finished section
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// `-k` and `-n` values merged in command-line order
    #[arg(skip)]
    size_order: Vec<SizeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeArg {
    Exponent(u32),
    Exact(usize),
}

impl SizeArg {
    fn resolve(self) -> daxpy_bench::Result<usize> {
        match self {
            SizeArg::Exponent(k) => config::size_from_exponent(k),
            SizeArg::Exact(n) => Ok(n),
        }
    }
}

impl Cli {
    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;

        let mut order = Vec::with_capacity(cli.size_exps.len() + cli.sizes.len());
        if let Some(indices) = matches.indices_of("size_exps") {
            order.extend(indices.zip(cli.size_exps.iter().map(|&k| SizeArg::Exponent(k))));
        }
        if let Some(indices) = matches.indices_of("sizes") {
            order.extend(indices.zip(cli.sizes.iter().map(|&n| SizeArg::Exact(n))));
        }
        order.sort_by_key(|&(index, _)| index);
        cli.size_order = order.into_iter().map(|(_, size)| size).collect();

        Ok(cli)
    }

    fn into_config(self) -> anyhow::Result<BenchConfig> {
        let mut config = BenchConfig {
            runs: self.runs,
            epsilon: self.epsilon,
            scalar: self.scalar,
            walkthrough: !self.skip_walkthrough,
            ..BenchConfig::default()
        };

        if !self.size_order.is_empty() {
            config.sizes = self
                .size_order
                .iter()
                .map(|size| size.resolve())
                .collect::<daxpy_bench::Result<Vec<_>>>()?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(args)?;
    Cli::from_matches(&matches)
}

/// Exit status for a parse error: 0 for `--help`/`--version`, 1 for misuse
fn usage_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_status(&e));
        }
    };

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = cli.into_config().context("invalid benchmark configuration")?;

    let mut out = ReportWriter::new(io::stdout().lock(), format);
    run_with(&config, |event| {
        out.write_event(&event).context("failed to write report")
    })
    .context("benchmark failed")?;

    Ok(())
}
