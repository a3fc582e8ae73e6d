//! Command implementations and argument parsing for the `cfpq-data` CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cfpq_data_core::{GenerationError, LabelSet, ScaleFreeParams};
use cfpq_data_store::{
    ArtifactCache, DATA_DIR_ENV, GraphArtifact, GraphFormat, GraphStore, ScaleFreeBuilder,
    StoreError,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, error, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "cfpq-data", about = "Generate graphs for CFPQ benchmarks.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate preferential-attachment (scale-free) graphs.
    ScaleFree(ScaleFreeCommand),
}

/// Options accepted by the `scale-free` command.
#[derive(Debug, Args, Clone)]
pub struct ScaleFreeCommand {
    /// Build every preset `(vertices_number, vertices_degree)` pair, then the
    /// pair given by `-n`/`-k` if both are present.
    #[arg(short = 'p', long)]
    pub preset: bool,

    /// Number of vertices in the generated graph.
    #[arg(short = 'n', long = "vertices-number", visible_alias = "vertices_number")]
    pub vertices_number: Option<usize>,

    /// Number of edges each vertex contributes.
    #[arg(short = 'k', long = "vertices-degree", visible_alias = "vertices_degree")]
    pub vertices_degree: Option<usize>,

    /// Seed for reproducible output; omitted seeds draw from entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated edge label alphabet (defaults to `A,B,C,D`).
    #[arg(long)]
    pub labels: Option<String>,

    /// Interchange format of the written graphs.
    #[arg(long, value_enum, default_value_t = FormatArg::Xml)]
    pub format: FormatArg,

    /// Root directory datasets are written under.
    #[arg(long, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,
}

/// Formats selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    /// RDF/XML.
    Xml,
    /// N-Triples.
    Nt,
}

impl From<FormatArg> for GraphFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Xml => Self::RdfXml,
            FormatArg::Nt => Self::NTriples,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither `--preset` nor both `-n` and `-k` were supplied.
    #[error("either --preset or both -n/--vertices-number and -k/--vertices-degree are required")]
    MissingParameters,
    /// Parameters or labels were rejected by the generator.
    #[error(transparent)]
    Core(#[from] GenerationError),
    /// Writing or recording a graph failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CliError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParameters => "CLI_MISSING_PARAMETERS",
            Self::Core(error) => error.code().as_str(),
            Self::Store(error) => error.code(),
        }
    }
}

/// A preset pair that could not be built.
#[derive(Debug)]
pub struct PresetFailure {
    /// Pair that failed.
    pub params: ScaleFreeParams,
    /// Why it failed.
    pub error: StoreError,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Default)]
pub struct ExecutionSummary {
    /// Graphs written, in request order; presets precede an explicit pair.
    pub artifacts: Vec<GraphArtifact>,
    /// Preset pairs that failed; always empty for single-pair runs.
    pub failures: Vec<PresetFailure>,
}

impl ExecutionSummary {
    /// Whether every requested graph was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the arguments are incomplete or invalid, or when
/// a single-pair build fails. Preset failures are reported through
/// [`ExecutionSummary::failures`] instead.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use cfpq_data_cli::cli::{Cli, Command, FormatArg, ScaleFreeCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     command: Command::ScaleFree(ScaleFreeCommand {
///         preset: false,
///         vertices_number: Some(100),
///         vertices_degree: Some(3),
///         seed: Some(1),
///         labels: None,
///         format: FormatArg::Xml,
///         data_dir: Some(dir.path().to_path_buf()),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.artifacts[0].metadata.edges, 300);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::ScaleFree(command) => {
            Span::current().record("command", field::display("scale-free"));
            run_scale_free(command)
        }
    }
}

#[instrument(
    name = "cli.scale_free",
    err,
    skip(command),
    fields(mode = field::Empty, format = field::Empty, data_dir = field::Empty),
)]
pub(super) fn run_scale_free(command: ScaleFreeCommand) -> Result<ExecutionSummary, CliError> {
    let ScaleFreeCommand {
        preset,
        vertices_number,
        vertices_degree,
        seed,
        labels,
        format,
        data_dir,
    } = command;

    let plan = BuildPlan::new(preset, vertices_number, vertices_degree)?;
    let labels = match labels {
        Some(raw) => raw.parse::<LabelSet>().map_err(GenerationError::from)?,
        None => LabelSet::default(),
    };
    let store = data_dir.map_or_else(GraphStore::from_env, GraphStore::new);

    let span = Span::current();
    span.record("format", field::display(GraphFormat::from(format)));
    span.record("data_dir", field::display(store.root().display()));

    let builder = ScaleFreeBuilder::new(store)
        .with_labels(labels)
        .with_format(format.into())
        .with_seed(seed);

    span.record("mode", field::display(plan.mode()));
    let mut summary = if plan.presets {
        run_presets(&builder)
    } else {
        ExecutionSummary::default()
    };
    if let Some(params) = plan.pair {
        summary.artifacts.push(builder.build(params)?);
    }

    info!(
        written = summary.artifacts.len(),
        failed = summary.failures.len(),
        "command completed"
    );
    Ok(summary)
}

/// Which graphs a `scale-free` invocation builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BuildPlan {
    /// Build the preset pairs.
    pub(super) presets: bool,
    /// Explicit pair, built after any presets.
    pub(super) pair: Option<ScaleFreeParams>,
}

impl BuildPlan {
    /// Resolves the flags into a plan. A lone `-n` or `-k` is ignored when
    /// `--preset` is given and rejected otherwise.
    pub(super) fn new(
        preset: bool,
        vertices_number: Option<usize>,
        vertices_degree: Option<usize>,
    ) -> Result<Self, CliError> {
        let pair = match (vertices_number, vertices_degree) {
            (Some(vertices), Some(degree)) => {
                Some(ScaleFreeParams::new(vertices, degree).map_err(GenerationError::from)?)
            }
            _ if preset => None,
            _ => return Err(CliError::MissingParameters),
        };
        Ok(Self {
            presets: preset,
            pair,
        })
    }

    pub(super) const fn mode(&self) -> &'static str {
        match (self.presets, self.pair.is_some()) {
            (true, true) => "preset+single",
            (true, false) => "preset",
            (false, _) => "single",
        }
    }
}

fn run_presets(builder: &ScaleFreeBuilder) -> ExecutionSummary {
    let cache = ArtifactCache::new();
    let mut summary = ExecutionSummary::default();
    for outcome in builder.build_presets(&cache) {
        match outcome.result {
            Ok(artifact) => summary.artifacts.push(artifact),
            Err(error) => {
                error!(
                    params = %outcome.params,
                    code = error.code(),
                    error = %error,
                    "preset build failed"
                );
                summary.failures.push(PresetFailure {
                    params: outcome.params,
                    error,
                });
            }
        }
    }
    summary
}

/// Renders one `Generated {file_name} to {directory}` line per written graph.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use cfpq_data_cli::cli::{ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut buffer = Vec::new();
/// render_summary(&ExecutionSummary::default(), &mut buffer)?;
/// assert!(buffer.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    for artifact in &summary.artifacts {
        let directory = artifact.path.parent().unwrap_or_else(|| Path::new("."));
        writeln!(
            writer,
            "Generated {} to {}",
            artifact.metadata.file_name,
            directory.display()
        )?;
    }
    Ok(())
}
