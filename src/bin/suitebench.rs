use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use suitebench::error::Result;
use suitebench::registry::Registry;
use suitebench::report::{ConsoleReporter, JsonReporter, Reporter};
use suitebench::suites;
use suitebench::SuiteKind;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available benchmark suites.
    List,

    /// Execute benchmark suites.
    Run {
        /// Benchmark suite to run. May be repeated; defaults to all suites.
        #[arg(long, value_enum, value_name = "NAME")]
        suite: Vec<SuiteKind>,

        /// Number of iterations per benchmark operation.
        #[arg(long, value_name = "N", default_value_t = 1)]
        iterations: usize,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,

        /// Directory containing pre-made fixture files. When omitted, each
        /// suite writes its built-in fixtures to a temp directory.
        #[arg(long, value_name = "PATH")]
        suite_dir: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "suitebench")]
#[command(about = "Benchmark runner for the test-automation engine")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,
}

fn cmd_list() {
    println!("Available benchmark suites:");
    for kind in SuiteKind::all() {
        println!("  {:<12}  {}", kind.as_str(), kind.description());
    }
}

fn cmd_run(
    selected: Vec<SuiteKind>,
    iterations: usize,
    format: OutputFormat,
    suite_dir: Option<PathBuf>,
) -> Result<()> {
    let selected = if selected.is_empty() {
        SuiteKind::all().to_vec()
    } else {
        selected
    };

    let mut all_results = Registry::new();
    for kind in selected {
        let results = suites::run_kind(kind, iterations, suite_dir.clone())?;
        all_results.merge(results);
    }

    match format {
        OutputFormat::Console => ConsoleReporter::stdout().report(&all_results),
        OutputFormat::Json => JsonReporter::stdout().report(&all_results),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.cmd {
        Some(Command::List) => {
            cmd_list();
            ExitCode::SUCCESS
        }
        Some(Command::Run {
            suite,
            iterations,
            format,
            suite_dir,
        }) => match cmd_run(suite, iterations, format, suite_dir) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("benchmark run failed: {err}");
                ExitCode::FAILURE
            }
        },
        None => {
            // No subcommand: show usage and signal failure.
            let _ = Args::command().print_help();
            println!();
            ExitCode::FAILURE
        }
    }
}
