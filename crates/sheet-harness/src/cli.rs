#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sheet_core::SheetConfig;
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::replay::{GestureScript, ReplayReport, replay};

#[derive(Debug, Parser)]
#[command(
    name = "sheet-harness",
    about = "Replay gesture scripts against the draggable sheet controller",
    version
)]
pub struct Cli {
    /// Log controller decisions to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON gesture script and print the report.
    Replay(ReplayArgs),

    /// Print the default sheet configuration as JSON.
    Defaults,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Path to the gesture script.
    pub script: PathBuf,

    /// Emit one JSON object per line instead of a single report.
    #[arg(long)]
    pub jsonl: bool,

    /// Write the report to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch(cli.command, &mut out)
}

/// Execute `command`, writing its output to `out`.
pub fn dispatch<W: Write>(command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Replay(args) => run_replay(&args, out),
        Commands::Defaults => {
            serde_json::to_writer_pretty(&mut *out, &SheetConfig::default())?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn run_replay<W: Write>(args: &ReplayArgs, out: &mut W) -> Result<()> {
    let script = GestureScript::from_path(&args.script)?;
    let report = replay(&script)?;

    match &args.output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write_report(&report, args.jsonl, &mut file)?;
            file.flush()?;
            Ok(())
        }
        None => write_report(&report, args.jsonl, out),
    }
}

fn write_report<W: Write>(report: &ReplayReport, jsonl: bool, out: &mut W) -> Result<()> {
    if jsonl {
        report.write_jsonl(out)
    } else {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "sheet_core=debug,sheet_harness=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
