//! Support library for the `cfpq-data` binary.
//!
//! Re-exports the CLI module so doctests and unit tests can exercise the
//! command pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
