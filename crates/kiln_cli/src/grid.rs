//! `kiln grid`: size and lay out the placement grid for a circuit.

use std::error::Error;

use kiln_config::Overrides;
use kiln_diagnostics::DiagnosticSink;
use kiln_grid::{CellKind, GridLayout};
use kiln_source::SourceDb;

use crate::pipeline::{emit_diagnostics, load_arch, resolve, route_mode};
use crate::{GlobalArgs, GridArgs, ReportFormat};

/// Runs the `kiln grid` command.
///
/// Returns exit code 0 when a grid was derived, 1 otherwise.
pub fn run(args: &GridArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let overrides = Overrides {
        arch_file: args.arch.arch.clone(),
        route_type: args.arch.route_type.map(Into::into),
        aspect_ratio: args.aspect_ratio,
        width: args.width,
        height: args.height,
        blocks: args.blocks,
        inputs: args.inputs,
        outputs: args.outputs,
        echo: None,
    };
    let settings = resolve(global, &overrides)?;
    let mode = route_mode(settings.route_type);

    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let Some((_, arch)) = load_arch(&settings.arch_file, mode, &mut db, &sink) else {
        emit_diagnostics(&sink.diagnostics(), &db, global, args.format);
        return Ok(1);
    };

    let grid = match kiln_grid::layout_for(
        &arch,
        settings.blocks,
        settings.pads,
        settings.aspect_ratio,
        settings.fixed_size,
        args.chan_width,
    ) {
        Ok(grid) => grid,
        Err(e) => {
            emit_diagnostics(&[e.to_diagnostic()], &db, global, args.format);
            return Ok(1);
        }
    };

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", describe(&grid, args.chan_width.is_some()));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&grid)?),
    }
    Ok(0)
}

/// Extents, capacities, the cell map, and optionally channel widths.
pub fn describe(grid: &GridLayout, with_channels: bool) -> String {
    let mut out = format!(
        "    Grid {} x {} ({} logic sites, {} pad slots)\n",
        grid.width(),
        grid.height(),
        grid.count(CellKind::Logic),
        grid.io_capacity()
    );
    out.push_str(&grid.render_map());
    if with_channels {
        out.push_str(&format!("chan_width_x: {}\n", join(grid.chan_width_x())));
        out.push_str(&format!("chan_width_y: {}\n", join(grid.chan_width_y())));
    }
    out
}

fn join(widths: &[u32]) -> String {
    widths
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
