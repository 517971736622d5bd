//! Cross-field checks that turn a [`ParseContext`] into an
//! [`ArchitectureDescription`].
//!
//! Checks run in three stages: presence of every mandatory field (all
//! problems are collected), then pin classes, then the extra constraints of
//! detailed routing. Nothing is returned unless every check passes.

use crate::error::ArchError;
use crate::field::Field;
use crate::loader::ParseContext;
use crate::types::{
    ArchitectureDescription, ChannelDistribution, DetailedRoutingArch, FcType, Keyword, RouteMode,
};
use kiln_common::InternalError;

/// Validates the loaded fields for `mode` and assembles the description.
pub fn validate(ctx: ParseContext, mode: RouteMode) -> Result<ArchitectureDescription, ArchError> {
    check_presence(&ctx, mode)?;

    let ParseContext {
        tables,
        io_rat,
        chan_width_io,
        chan_x,
        chan_y,
        max_subblocks_per_block,
        subblock_lut_size,
        fc_output,
        fc_input,
        fc_pad,
        fc_type,
        switch_block_type,
        last_line,
        end_span,
        ..
    } = ctx;

    let (slots, pins) = tables.finish();
    let mut pin_classes = Vec::with_capacity(slots.len());
    for slot in slots {
        let id = slot.id;
        // Discovery only sizes classes it saw a pin for.
        let class = slot.into_class().ok_or_else(|| {
            InternalError::new(format!("class {id} was discovered but never loaded"))
        })?;
        if class.members.is_empty() {
            return Err(InternalError::new(format!("class {id} has no member pins")).into());
        }
        pin_classes.push(class);
    }

    let detailed_routing = match (fc_output, fc_input, fc_pad, fc_type, switch_block_type) {
        (Some(fc_output), Some(fc_input), Some(fc_pad), Some(fc_type), Some(switch_block_type)) => {
            Some(DetailedRoutingArch {
                fc_output,
                fc_input,
                fc_pad,
                fc_type,
                switch_block_type,
            })
        }
        _ => None,
    };

    let arch = ArchitectureDescription {
        io_rat: required(io_rat, Field::IoRat)?,
        chan_width_io: required(chan_width_io, Field::ChanWidthIo)?,
        chan_x: required(chan_x, Field::ChanWidthX)?,
        chan_y: required(chan_y, Field::ChanWidthY)?,
        pin_classes,
        pins,
        max_subblocks_per_block: required(max_subblocks_per_block, Field::SubblocksPerCluster)?,
        subblock_lut_size: required(subblock_lut_size, Field::SubblockLutSize)?,
        detailed_routing,
    };

    if mode == RouteMode::Detailed {
        let inconsistent = |reason: String| ArchError::InconsistentDetailedRouting {
            reason,
            line: last_line,
            span: end_span,
        };
        check_detailed(&arch).map_err(inconsistent)?;
    }

    Ok(arch)
}

fn check_presence(ctx: &ParseContext, mode: RouteMode) -> Result<(), ArchError> {
    let mut errors = Vec::new();
    for field in Field::ALL {
        if field.is_pin() || (field.is_detailed_only() && mode != RouteMode::Detailed) {
            continue;
        }
        match ctx.presence.count(field) {
            1 => {}
            0 => errors.push(ArchError::MissingField {
                field,
                line: ctx.last_line,
                span: ctx.end_span,
            }),
            count => errors.push(ArchError::DuplicateField {
                field,
                count,
                line: ctx.last_line,
                span: ctx.end_span,
            }),
        }
    }
    if ctx.presence.pin_statements() == 0 {
        errors.push(ArchError::NoPinsDefined {
            line: ctx.last_line,
            span: ctx.end_span,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ArchError::Invalid(errors)),
    }
}

fn check_detailed(arch: &ArchitectureDescription) -> Result<(), String> {
    let (x_peak, y_peak) = match (arch.chan_x, arch.chan_y) {
        (ChannelDistribution::Uniform { peak: x }, ChannelDistribution::Uniform { peak: y }) => {
            (x, y)
        }
        (x, y) => {
            return Err(format!(
                "channel widths must be uniform, got chan_width_x {} and chan_width_y {}",
                x.kind().keyword(),
                y.kind().keyword()
            ))
        }
    };
    if x_peak != y_peak {
        return Err(format!(
            "chan_width_x peak ({x_peak}) and chan_width_y peak ({y_peak}) must be equal"
        ));
    }
    if x_peak != arch.chan_width_io {
        return Err(format!(
            "chan_width_io ({}) must equal the core channel peak ({x_peak})",
            arch.chan_width_io
        ));
    }

    let Some(det) = arch.detailed_routing else {
        return Err("Fc and switch-block parameters are missing".to_string());
    };
    let fcs = [
        (Field::FcOutput, det.fc_output),
        (Field::FcInput, det.fc_input),
        (Field::FcPad, det.fc_pad),
    ];
    for (field, value) in fcs {
        match det.fc_type {
            FcType::Absolute if value < 1.0 => {
                return Err(format!(
                    "{field} is {value} but absolute Fc values must be at least 1"
                ))
            }
            FcType::Fractional if value > 1.0 => {
                return Err(format!(
                    "{field} is {value} but fractional Fc values must not exceed 1"
                ))
            }
            _ => {}
        }
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: Field) -> Result<T, ArchError> {
    value.ok_or_else(|| {
        InternalError::new(format!("`{field}` passed the presence check but has no value")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_classes;
    use crate::lexer::TokenStream;
    use crate::loader::load_fields;
    use crate::tables::PinTables;
    use kiln_source::FileId;

    const BASE: &str = "\
io_rat 2
chan_width_x uniform 1
chan_width_y uniform 1
chan_width_io 1
outpin class: 0 top
inpin class: 1 bottom
subblocks_per_cluster 1
subblock_lut_size 4
";

    const DETAILED: &str = "\
Fc_output 1
Fc_input 1
Fc_pad 1
Fc_type fractional
switch_block_type subset
";

    fn run(src: &str, mode: RouteMode) -> Result<ArchitectureDescription, ArchError> {
        let mut stream = TokenStream::new(src, FileId::from_raw(0));
        let schema = discover_classes(&mut stream)?;
        stream.rewind();
        let ctx = load_fields(&mut stream, PinTables::allocate(&schema))?;
        validate(ctx, mode)
    }

    #[test]
    fn global_ignores_detailed_fields() {
        let arch = run(BASE, RouteMode::Global).unwrap();
        assert_eq!(arch.num_classes(), 2);
        assert!(arch.detailed_routing.is_none());
    }

    #[test]
    fn detailed_routing_kept_in_global_mode() {
        let src = format!("{BASE}{DETAILED}");
        let arch = run(&src, RouteMode::Global).unwrap();
        assert!(arch.detailed_routing.is_some());
    }

    #[test]
    fn missing_field_reported() {
        let src = BASE.replace("subblock_lut_size 4\n", "");
        match run(&src, RouteMode::Global).unwrap_err() {
            ArchError::MissingField { field, line, .. } => {
                assert_eq!(field, Field::SubblockLutSize);
                assert_eq!(line, 7);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_field_reported() {
        let src = format!("{BASE}io_rat 2\n");
        assert!(matches!(
            run(&src, RouteMode::Global).unwrap_err(),
            ArchError::DuplicateField {
                field: Field::IoRat,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn all_presence_problems_collected() {
        let err = run("io_rat 2\n", RouteMode::Detailed).unwrap_err();
        let fields: Vec<_> = err
            .flatten()
            .into_iter()
            .filter_map(|e| match e {
                ArchError::MissingField { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields.len(), 10);
        assert!(fields.contains(&Field::FcType));
        assert!(err
            .flatten()
            .iter()
            .any(|e| matches!(e, ArchError::NoPinsDefined { .. })));
    }

    #[test]
    fn no_pins_defined() {
        let src: String = BASE
            .lines()
            .filter(|l| !l.contains("pin"))
            .map(|l| format!("{l}\n"))
            .collect();
        assert!(matches!(
            run(&src, RouteMode::Global).unwrap_err(),
            ArchError::NoPinsDefined { .. }
        ));
    }

    #[test]
    fn detailed_accepts_consistent_file() {
        let src = format!("{BASE}{DETAILED}");
        let arch = run(&src, RouteMode::Detailed).unwrap();
        let det = arch.detailed_routing.unwrap();
        assert_eq!(det.fc_type, FcType::Fractional);
    }

    #[test]
    fn detailed_requires_equal_peaks() {
        let src = format!("{BASE}{DETAILED}")
            .replace("chan_width_y uniform 1", "chan_width_y uniform 0.5");
        match run(&src, RouteMode::Detailed).unwrap_err() {
            ArchError::InconsistentDetailedRouting { reason, .. } => {
                assert!(reason.contains("must be equal"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn detailed_requires_io_width_match() {
        let src = format!("{BASE}{DETAILED}").replace("chan_width_io 1", "chan_width_io 2");
        assert!(matches!(
            run(&src, RouteMode::Detailed).unwrap_err(),
            ArchError::InconsistentDetailedRouting { .. }
        ));
    }

    #[test]
    fn fc_bounds_follow_fc_type() {
        let fractional = format!("{BASE}{DETAILED}").replace("Fc_pad 1", "Fc_pad 1.5");
        assert!(matches!(
            run(&fractional, RouteMode::Detailed).unwrap_err(),
            ArchError::InconsistentDetailedRouting { .. }
        ));
        let absolute = format!("{BASE}{DETAILED}")
            .replace("fractional", "absolute")
            .replace("Fc_input 1", "Fc_input 0.5");
        match run(&absolute, RouteMode::Detailed).unwrap_err() {
            ArchError::InconsistentDetailedRouting { reason, .. } => {
                assert!(reason.starts_with("Fc_input"), "{reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
        let ok = format!("{BASE}{DETAILED}")
            .replace("fractional", "absolute")
            .replace("Fc_pad 1", "Fc_pad 3");
        assert!(run(&ok, RouteMode::Detailed).is_ok());
    }
}
