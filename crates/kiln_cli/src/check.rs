//! `kiln check`: parse and validate an architecture file.
//!
//! 1. Resolve settings from `kiln.toml` and the flags
//! 2. Run both parsing passes and the validator
//! 3. Render diagnostics, or print a summary (or JSON) of the architecture
//! 4. Write the echo report when requested

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use kiln_arch::{ArchitectureDescription, Keyword, RouteMode};
use kiln_config::Overrides;
use kiln_diagnostics::DiagnosticSink;
use kiln_source::SourceDb;

use crate::pipeline::{emit_diagnostics, load_arch, resolve, route_mode};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `kiln check` command.
///
/// Returns exit code 0 if the architecture is valid, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let overrides = Overrides {
        arch_file: args.arch.arch.clone(),
        route_type: args.arch.route_type.map(Into::into),
        echo: args.echo.clone(),
        ..Overrides::default()
    };
    let settings = resolve(global, &overrides)?;
    let mode = route_mode(settings.route_type);

    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let Some((file, arch)) = load_arch(&settings.arch_file, mode, &mut db, &sink) else {
        emit_diagnostics(&sink.diagnostics(), &db, global, args.format);
        return Ok(1);
    };

    if let Some(ref echo) = settings.echo {
        let mut out = BufWriter::new(File::create(echo)?);
        kiln_arch::write_echo(&arch, &settings.arch_file.display().to_string(), mode, &mut out)?;
        out.flush()?;
        log::info!("wrote echo report to {}", echo.display());
    }

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                let name = settings.arch_file.display().to_string();
                let hash = db.get_file(file).content_hash.short();
                print!("{}", summary(&arch, &name, &hash, mode));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&arch)?),
    }
    Ok(0)
}

/// A short human-readable overview of a valid architecture.
pub fn summary(
    arch: &ArchitectureDescription,
    name: &str,
    hash: &str,
    mode: RouteMode,
) -> String {
    let mut out = format!("    Checked {name} [{hash}] ({mode} routing)\n");
    out.push_str(&format!(
        "      {} pins in {} classes, io_rat {}\n",
        arch.pins_per_block(),
        arch.num_classes(),
        arch.io_rat
    ));
    for (axis, dist) in [("x", &arch.chan_x), ("y", &arch.chan_y)] {
        out.push_str(&format!(
            "      chan_width_{axis}: {} peak {}\n",
            dist.kind().keyword(),
            dist.peak()
        ));
    }
    out.push_str(&format!(
        "      {} subblocks of {}-LUT per cluster\n",
        arch.max_subblocks_per_block, arch.subblock_lut_size
    ));
    if let Some(ref detailed) = arch.detailed_routing {
        out.push_str(&format!(
            "      Fc {} (out {}, in {}, pad {}), {} switch blocks\n",
            detailed.fc_type.keyword(),
            detailed.fc_output,
            detailed.fc_input,
            detailed.fc_pad,
            detailed.switch_block_type.keyword()
        ));
    }
    out
}
