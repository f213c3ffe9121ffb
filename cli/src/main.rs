mod logging;
mod repl;
mod runner;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use v8_embed::{EngineConfig, Instance};

use crate::runner::SourceUnit;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_DESCRIBE"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Compiles and runs JavaScript in an embedded V8 isolate.
///
/// Files and `--eval` snippets run in order in a single isolate, so later units see the globals
/// of earlier ones. Without any input, a line REPL is started on stdin.
#[derive(Parser, Debug)]
#[command(name = "jsrun", version, long_version = LONG_VERSION)]
struct Args {
    /// Script files to run.
    files: Vec<PathBuf>,
    /// Source snippets to run after the files.
    #[arg(short, long = "eval", value_name = "SOURCE")]
    eval: Vec<String>,
    /// JSON engine config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logging::setup_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("failed to set up logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a script failed to compile or run; that error has already been
/// printed.
fn run(args: Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    debug!("engine config: {:?}", config);

    let instance = Instance::with_config(config).context("failed to create engine instance")?;
    info!("running on V8 {}", instance.engine_version());
    let isolate = instance
        .new_isolate()
        .context("failed to create isolate")?;

    let mut units = Vec::with_capacity(args.files.len() + args.eval.len());
    for path in &args.files {
        units.push(SourceUnit::from_file(path)?);
    }
    units.extend(
        args.eval
            .into_iter()
            .enumerate()
            .map(|(i, source)| SourceUnit::inline(i + 1, source)),
    );

    if units.is_empty() {
        repl::run(&isolate)?;
        return Ok(true);
    }

    for unit in &units {
        match runner::evaluate(&isolate, &unit.source, &unit.location) {
            Ok(output) => {
                if let Some(output) = output {
                    println!("{}", output);
                }
            }
            Err(err) => {
                eprintln!("{}", err);
                return Ok(false);
            }
        }
    }

    Ok(true)
}
