use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use library_catalog::{Console, ConsoleConfig, Library, OutputFormat, RunSummary};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the library catalog console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose output with detailed operation logs
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Read commands from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

impl Args {
    /// Default log filter when `RUST_LOG` is not set
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Console settings derived from the flags
    fn console_config(&self) -> ConsoleConfig {
        let interactive = self.script.is_none() && self.format == OutputFormat::Text;
        ConsoleConfig { format: self.format, color: !self.no_color, prompt: interactive }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(summary) => {
            tracing::info!(
                executed = summary.executed,
                failed = summary.failed,
                "session finished"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(error = ?error, "console failed");
            eprintln!("{} {error:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber on stderr so stdout stays clean
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Drive a fresh library from stdin or the script file
fn run(args: &Args) -> anyhow::Result<RunSummary> {
    let library = Library::with_default_observers();
    let config = args.console_config();
    if !config.color {
        colored::control::set_override(false);
    }
    let stdout = io::stdout().lock();

    let result = if let Some(path) = &args.script {
        let file = File::open(path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        Console::new(library, BufReader::new(file), stdout, config).run()
    } else {
        Console::new(library, io::stdin().lock(), stdout, config).run()
    };

    result.context("console I/O failed")
}
