//! Shared pipeline helpers for CLI commands.
//!
//! Settings resolution (config file plus flags), architecture loading, and
//! diagnostic output used by both `check` and `grid`.

use std::error::Error;
use std::path::Path;

use kiln_arch::{ArchitectureDescription, RouteMode};
use kiln_config::{KilnConfig, Overrides, ResolvedSettings, RouteType};
use kiln_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use kiln_source::{FileId, SourceDb};

use crate::{GlobalArgs, ReportFormat};

/// Loads the configuration named by `--config`, or `kiln.toml` in the
/// current directory when present, or the defaults.
pub fn load_project_config(global: &GlobalArgs) -> Result<KilnConfig, Box<dyn Error>> {
    if let Some(ref path) = global.config {
        return Ok(kiln_config::load_config(path)?);
    }
    let cwd = std::env::current_dir()?;
    match kiln_config::find_config(&cwd) {
        Some(path) => {
            log::debug!("using configuration {}", path.display());
            Ok(kiln_config::load_config(&path)?)
        }
        None => Ok(KilnConfig::default()),
    }
}

/// Loads the configuration and merges `overrides` over it.
pub fn resolve(
    global: &GlobalArgs,
    overrides: &Overrides,
) -> Result<ResolvedSettings, Box<dyn Error>> {
    let config = load_project_config(global)?;
    Ok(kiln_config::resolve_settings(&config, overrides)?)
}

/// Maps the configured routing type onto the parser's mode.
pub fn route_mode(route_type: RouteType) -> RouteMode {
    match route_type {
        RouteType::Global => RouteMode::Global,
        RouteType::Detailed => RouteMode::Detailed,
    }
}

/// Loads and parses the architecture file, emitting any failure into `sink`.
pub fn load_arch(
    path: &Path,
    mode: RouteMode,
    db: &mut SourceDb,
    sink: &DiagnosticSink,
) -> Option<(FileId, ArchitectureDescription)> {
    match kiln_arch::load_architecture(path, mode, db) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            sink.extend(e.to_diagnostics());
            None
        }
    }
}

/// Renders diagnostics as text on stderr or as a JSON array on stdout.
pub fn emit_diagnostics(
    diagnostics: &[Diagnostic],
    db: &SourceDb,
    global: &GlobalArgs,
    format: ReportFormat,
) {
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                eprintln!("{}", renderer.render(diag, db));
            }
            if !global.quiet {
                eprintln!("   Result: {} error(s)", diagnostics.len());
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}
