//! Conformance test helpers for the Kiln architecture tools.
//!
//! Provides shared pipeline functions that run architecture text through the
//! full pipeline (load → discover → load fields → validate → diagnostics) and
//! return structured results for assertion in integration tests.

#![warn(missing_docs)]

use kiln_arch::{ArchError, ArchitectureDescription, RouteMode};
use kiln_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use kiln_source::SourceDb;

/// A minimal valid architecture: two single-pin classes on a 4-LUT cluster.
pub const MINIMAL_ARCH: &str = "\
io_rat 4
chan_width_x uniform 1.0
chan_width_y uniform 1.0
chan_width_io 1.0
outpin class: 0 top
inpin class: 1 bottom
subblocks_per_cluster 4
subblock_lut_size 4
";

/// The five statements detailed routing additionally requires.
pub const DETAILED_FIELDS: &str = "\
Fc_type fractional
Fc_output 1
Fc_input 0.5
Fc_pad 1
switch_block_type subset
";

/// Result of running architecture text through the full pipeline.
pub struct PipelineResult {
    /// The validated architecture, when parsing succeeded.
    pub arch: Option<ArchitectureDescription>,
    /// The error, when parsing failed.
    pub error: Option<ArchError>,
    /// Diagnostics emitted for the failure.
    pub diagnostics: Vec<Diagnostic>,
    /// Each diagnostic rendered without color.
    pub rendered: Vec<String>,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
}

impl PipelineResult {
    /// Returns the architecture, panicking with the rendered diagnostics if
    /// parsing failed.
    pub fn unwrap_arch(self) -> ArchitectureDescription {
        match self.arch {
            Some(arch) => arch,
            None => panic!("expected success, got:\n{}", self.rendered.join("\n")),
        }
    }

    /// Returns the error, panicking if parsing succeeded.
    pub fn unwrap_error(self) -> ArchError {
        match self.error {
            Some(err) => err,
            None => panic!("expected a parse error"),
        }
    }
}

/// Runs the full pipeline on `source` in global routing mode.
pub fn full_pipeline_global(source: &str) -> PipelineResult {
    full_pipeline(source, RouteMode::Global)
}

/// Runs the full pipeline on `source` in detailed routing mode.
pub fn full_pipeline_detailed(source: &str) -> PipelineResult {
    full_pipeline(source, RouteMode::Detailed)
}

/// Runs the full pipeline on `source`, registered as `test.arch`.
pub fn full_pipeline(source: &str, mode: RouteMode) -> PipelineResult {
    let mut source_db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let file_id = source_db.add_source("test.arch", source.to_string());

    match kiln_arch::parse_architecture(&source_db, file_id, mode) {
        Ok(arch) => PipelineResult {
            arch: Some(arch),
            error: None,
            diagnostics: Vec::new(),
            rendered: Vec::new(),
            error_count: 0,
        },
        Err(err) => {
            sink.extend(err.to_diagnostics());
            let diagnostics = sink.take_all();
            let renderer = TerminalRenderer::new(false);
            let rendered = diagnostics
                .iter()
                .map(|d| renderer.render(d, &source_db))
                .collect();
            let error_count = diagnostics.iter().filter(|d| d.severity.is_error()).count();
            PipelineResult {
                arch: None,
                error: Some(err),
                diagnostics,
                rendered,
                error_count,
            }
        }
    }
}

/// Replaces the first statement starting with `keyword` by `line`, or
/// appends `line` when no such statement exists.
pub fn with_statement(source: &str, keyword: &str, line: &str) -> String {
    let mut replaced = false;
    let mut out = String::with_capacity(source.len() + line.len() + 1);
    for existing in source.lines() {
        let matches = existing.split_whitespace().next() == Some(keyword);
        if matches && !replaced {
            out.push_str(line);
            replaced = true;
        } else {
            out.push_str(existing);
        }
        out.push('\n');
    }
    if !replaced {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Removes every statement starting with `keyword`.
pub fn without_statement(source: &str, keyword: &str) -> String {
    source
        .lines()
        .filter(|l| l.split_whitespace().next() != Some(keyword))
        .map(|l| format!("{l}\n"))
        .collect()
}

/// Asserts two floats agree to within a relative tolerance.
pub fn assert_close(a: f64, b: f64) {
    let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tolerance, "{a} != {b}");
}
