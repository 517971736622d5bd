//! Human-readable echo of a parsed architecture.
//!
//! The report lists every field and both pin tables so a user can check what
//! was read. It is write-only; nothing parses it back.

use crate::types::{
    ArchitectureDescription, ChannelDistribution, FcType, Keyword, RouteMode, Side,
};
use std::io::{self, Write};

/// Writes the echo report for `arch` to `out`.
///
/// The Fc and switch-block section is included only in detailed mode.
pub fn write_echo<W: Write>(
    arch: &ArchitectureDescription,
    source_name: &str,
    mode: RouteMode,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Architecture file: {source_name}")?;
    writeln!(out, "Routing: {mode}")?;
    writeln!(out)?;
    writeln!(out, "io_rat: {}", arch.io_rat)?;
    writeln!(
        out,
        "chan_width_io: {}  pins per block: {}",
        arch.chan_width_io,
        arch.pins_per_block()
    )?;
    writeln!(out)?;
    write_channel(out, "chan_width_x", &arch.chan_x)?;
    write_channel(out, "chan_width_y", &arch.chan_y)?;
    writeln!(out)?;

    write!(out, "Pin\tclass")?;
    for side in Side::ALL {
        write!(out, "\t{}", side.keyword())?;
    }
    writeln!(out)?;
    for pin in &arch.pins {
        write!(out, "{}\t{}", pin.index, pin.class)?;
        for side in Side::ALL {
            write!(out, "\t{}", u8::from(pin.sides.contains(*side)))?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(out, "Class\tdirection\tpins\tmembers")?;
    for class in &arch.pin_classes {
        let members: Vec<String> = class.members.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            class.id,
            class.direction,
            class.members.len(),
            members.join(" ")
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "subblocks_per_cluster (maximum): {}",
        arch.max_subblocks_per_block
    )?;
    writeln!(out, "subblock_lut_size: {}", arch.subblock_lut_size)?;

    if mode == RouteMode::Detailed {
        if let Some(det) = &arch.detailed_routing {
            writeln!(out)?;
            match det.fc_type {
                FcType::Absolute => writeln!(out, "Fc is an absolute number of tracks.")?,
                FcType::Fractional => writeln!(out, "Fc is a fraction of the tracks in a channel.")?,
            }
            writeln!(
                out,
                "Fc_output: {}  Fc_input: {}  Fc_pad: {}",
                det.fc_output, det.fc_input, det.fc_pad
            )?;
            writeln!(
                out,
                "switch_block_type: {}",
                det.switch_block_type.keyword()
            )?;
        }
    }
    Ok(())
}

/// Renders the echo report into a string.
pub fn echo_to_string(arch: &ArchitectureDescription, source_name: &str, mode: RouteMode) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_echo(arch, source_name, mode, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_channel<W: Write>(out: &mut W, name: &str, dist: &ChannelDistribution) -> io::Result<()> {
    write!(
        out,
        "{name}: {}  peak: {}",
        dist.kind().keyword(),
        dist.peak()
    )?;
    if let Some(width) = dist.width() {
        write!(out, "  width: {width}")?;
    }
    if let Some(xpeak) = dist.xpeak() {
        write!(out, "  xpeak: {xpeak}")?;
    }
    writeln!(out, "  dc: {}", dist.dc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_architecture_str;

    const ARCH: &str = "\
io_rat 2
chan_width_x uniform 1
chan_width_y gaussian 0.5 0.25 0.5 0.1
chan_width_io 1
inpin class: 0 bottom left
inpin class: 0 top
outpin class: 1 right
subblocks_per_cluster 1
subblock_lut_size 4
Fc_output 1
Fc_input 1
Fc_pad 1
Fc_type fractional
switch_block_type universal
";

    #[test]
    fn echo_lists_fields_and_tables() {
        let arch = parse_architecture_str(ARCH, RouteMode::Global).unwrap();
        let text = echo_to_string(&arch, "k4.arch", RouteMode::Global);
        assert!(text.starts_with("Architecture file: k4.arch\nRouting: global\n"));
        assert!(text.contains("chan_width_io: 1  pins per block: 3"));
        assert!(text.contains("chan_width_x: uniform  peak: 1  dc: 0\n"));
        assert!(text.contains("chan_width_y: gaussian  peak: 0.5  width: 0.25  xpeak: 0.5  dc: 0.1\n"));
        assert!(text.contains("Pin\tclass\ttop\tbottom\tleft\tright\n"));
        assert!(text.contains("\n0\t0\t0\t1\t1\t0\n"));
        assert!(text.contains("\n2\t1\t0\t0\t0\t1\n"));
        assert!(text.contains("\n0\treceiver\t2\t0 1\n"));
        assert!(text.contains("\n1\tdriver\t1\t2\n"));
        assert!(text.contains("subblock_lut_size: 4"));
        assert!(!text.contains("Fc_output"));
    }

    #[test]
    fn echo_includes_detailed_section() {
        let src = ARCH.replace(
            "chan_width_y gaussian 0.5 0.25 0.5 0.1",
            "chan_width_y uniform 1",
        );
        let arch = parse_architecture_str(&src, RouteMode::Detailed).unwrap();
        let text = echo_to_string(&arch, "k4.arch", RouteMode::Detailed);
        assert!(text.contains("Fc is a fraction of the tracks in a channel."));
        assert!(text.contains("Fc_output: 1  Fc_input: 1  Fc_pad: 1"));
        assert!(text.trim_end().ends_with("switch_block_type: universal"));
    }
}
