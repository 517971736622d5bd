//! Kiln CLI: checks FPGA architecture files and derives grid layouts.
//!
//! Provides `kiln check` for parsing and validating an architecture file and
//! `kiln grid` for sizing a placement grid on top of it.

#![warn(missing_docs)]

mod check;
mod grid;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Kiln: FPGA architecture description tools.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln FPGA architecture tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate an architecture file.
    Check(CheckArgs),
    /// Derive the placement grid for a circuit on an architecture.
    Grid(GridArgs),
}

/// Architecture selection shared by every command.
#[derive(Args, Debug, Default)]
pub struct ArchArgs {
    /// Architecture file (defaults to `arch.file` from `kiln.toml`).
    pub arch: Option<PathBuf>,

    /// Routing mode to validate for.
    #[arg(long, value_enum)]
    pub route_type: Option<RouteTypeArg>,
}

/// Arguments for `kiln check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Architecture selection.
    #[command(flatten)]
    pub arch: ArchArgs,

    /// Write the human-readable echo report to this path.
    #[arg(long)]
    pub echo: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `kiln grid`.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Architecture selection.
    #[command(flatten)]
    pub arch: ArchArgs,

    /// Logic blocks to place.
    #[arg(long)]
    pub blocks: Option<u32>,

    /// Primary inputs.
    #[arg(long)]
    pub inputs: Option<u32>,

    /// Primary outputs.
    #[arg(long)]
    pub outputs: Option<u32>,

    /// Columns divided by rows when sizing automatically.
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Fixed number of logic columns.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Fixed number of logic rows.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Peak channel width in tracks; fills and prints per-channel widths.
    #[arg(long)]
    pub chan_width: Option<u32>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Routing mode as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RouteTypeArg {
    /// Global routing.
    Global,
    /// Detailed routing.
    Detailed,
}

impl From<RouteTypeArg> for kiln_config::RouteType {
    fn from(arg: RouteTypeArg) -> Self {
        match arg {
            RouteTypeArg::Global => kiln_config::RouteType::Global,
            RouteTypeArg::Detailed => kiln_config::RouteType::Detailed,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format for results and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("TERM").is_some_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Grid(ref args) => grid::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the logger; `RUST_LOG` takes precedence over the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
