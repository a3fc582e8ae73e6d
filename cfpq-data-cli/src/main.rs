//! Entry point for the `cfpq-data` binary.
//!
//! Parses arguments with clap, builds the requested graphs, prints one line
//! per written graph to stdout and maps failures to a non-zero exit code.
//! Logging is initialised first so every later step can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cfpq_data_cli::{
    cli::{Cli, CliError, ExecutionSummary, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the summary and flush the
/// output stream.
fn try_main() -> Result<ExecutionSummary> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(summary)
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(summary) if summary.is_complete() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(failed = summary.failures.len(), "some graphs were not generated");
            ExitCode::FAILURE
        }
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map(CliError::code);
            let message = format!("{err:#}");
            error!(
                error = %message,
                code = code.map(field::display),
                "command execution failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
