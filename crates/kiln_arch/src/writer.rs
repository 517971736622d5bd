//! Serializes an [`ArchitectureDescription`] back into architecture-file text.
//!
//! Floats are written with Rust's shortest round-trip formatting, so parsing
//! the output gives back an equal description.

use crate::field::Field;
use crate::types::{ArchitectureDescription, ChannelDistribution, Keyword, PinDirection};
use std::fmt::Write;

/// Writes `arch` in canonical form: one statement per field, pins in index
/// order, detailed-routing statements last.
pub fn write_architecture(arch: &ArchitectureDescription) -> String {
    let mut out = String::new();
    // `fmt::Write` for `String` never fails.
    let _ = write_into(arch, &mut out);
    out
}

fn write_into(arch: &ArchitectureDescription, out: &mut String) -> std::fmt::Result {
    writeln!(out, "{} {}", Field::IoRat, arch.io_rat)?;
    writeln!(out, "{} {}", Field::ChanWidthX, distribution(&arch.chan_x))?;
    writeln!(out, "{} {}", Field::ChanWidthY, distribution(&arch.chan_y))?;
    writeln!(out, "{} {}", Field::ChanWidthIo, arch.chan_width_io)?;
    writeln!(out)?;

    for pin in &arch.pins {
        let direction = arch
            .class(pin.class)
            .map_or(PinDirection::Receiver, |c| c.direction);
        write!(out, "{} class: {}", direction.statement(), pin.class)?;
        for side in pin.sides.iter() {
            write!(out, " {}", side.keyword())?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(out, "{} {}", Field::SubblocksPerCluster, arch.max_subblocks_per_block)?;
    writeln!(out, "{} {}", Field::SubblockLutSize, arch.subblock_lut_size)?;

    if let Some(det) = &arch.detailed_routing {
        writeln!(out)?;
        writeln!(out, "{} {}", Field::FcOutput, det.fc_output)?;
        writeln!(out, "{} {}", Field::FcInput, det.fc_input)?;
        writeln!(out, "{} {}", Field::FcPad, det.fc_pad)?;
        writeln!(out, "{} {}", Field::FcType, det.fc_type.keyword())?;
        writeln!(
            out,
            "{} {}",
            Field::SwitchBlockType,
            det.switch_block_type.keyword()
        )?;
    }
    Ok(())
}

fn distribution(dist: &ChannelDistribution) -> String {
    let kind = dist.kind().keyword();
    match *dist {
        ChannelDistribution::Uniform { peak } => format!("{kind} {peak}"),
        ChannelDistribution::Gaussian {
            peak,
            width,
            xpeak,
            dc,
        }
        | ChannelDistribution::Pulse {
            peak,
            width,
            xpeak,
            dc,
        } => format!("{kind} {peak} {width} {xpeak} {dc}"),
        ChannelDistribution::Delta { peak, xpeak, dc } => format!("{kind} {peak} {xpeak} {dc}"),
    }
}
