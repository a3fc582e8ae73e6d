//! Command-line interface for generating CFPQ scale-free datasets.
//!
//! The `scale-free` command builds either one `(vertices_number,
//! vertices_degree)` pair or the whole preset batch into the data root.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FormatArg, PresetFailure, ScaleFreeCommand,
    render_summary, run_cli,
};
