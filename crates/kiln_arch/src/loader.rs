//! Second pass: read every field into a [`ParseContext`].
//!
//! The stream must be rewound before this pass. Each logical line is
//! dispatched on its keyword; lines with unknown keywords are skipped so
//! newer files still load. Pins are appended to the [`PinTables`] sized by
//! discovery.

use crate::error::ArchError;
use crate::field::{Field, FieldPresence};
use crate::lexer::{LineCursor, TokenStream};
use crate::scalar::{self, expect_end, parse_class_id, parse_float, parse_int, parse_keyword};
use crate::tables::PinTables;
use crate::types::{
    ChannelDistribution, DistributionKind, FcType, Keyword, PinDirection, Side, SideSet,
    SwitchBlockType,
};
use kiln_common::InternalError;
use kiln_source::Span;

/// Everything read by the loading pass, before validation.
///
/// Scalars stay `None` until their statement is read; the last occurrence
/// wins, and [`FieldPresence`] records how many there were.
#[derive(Clone, Debug)]
pub struct ParseContext {
    /// Occurrence count of every field.
    pub presence: FieldPresence,
    /// Pin and class tables.
    pub tables: PinTables,
    /// `io_rat`
    pub io_rat: Option<u32>,
    /// `chan_width_io`
    pub chan_width_io: Option<f64>,
    /// `chan_width_x`
    pub chan_x: Option<ChannelDistribution>,
    /// `chan_width_y`
    pub chan_y: Option<ChannelDistribution>,
    /// `subblocks_per_cluster`
    pub max_subblocks_per_block: Option<u32>,
    /// `subblock_lut_size`
    pub subblock_lut_size: Option<u32>,
    /// `Fc_output`
    pub fc_output: Option<f64>,
    /// `Fc_input`
    pub fc_input: Option<f64>,
    /// `Fc_pad`
    pub fc_pad: Option<f64>,
    /// `Fc_type`
    pub fc_type: Option<FcType>,
    /// `switch_block_type`
    pub switch_block_type: Option<SwitchBlockType>,
    /// Line of the last token in the file, used to locate validator errors.
    pub last_line: u32,
    /// Empty span just past the last token in the file.
    pub end_span: Span,
}

impl ParseContext {
    /// An empty context around freshly allocated tables.
    pub fn new(tables: PinTables) -> Self {
        Self {
            presence: FieldPresence::new(),
            tables,
            io_rat: None,
            chan_width_io: None,
            chan_x: None,
            chan_y: None,
            max_subblocks_per_block: None,
            subblock_lut_size: None,
            fc_output: None,
            fc_input: None,
            fc_pad: None,
            fc_type: None,
            switch_block_type: None,
            last_line: 0,
            end_span: Span::DUMMY,
        }
    }
}

/// Reads the whole stream from its current position into a context.
pub fn load_fields(
    stream: &mut TokenStream<'_>,
    tables: PinTables,
) -> Result<ParseContext, ArchError> {
    let mut ctx = ParseContext::new(tables);
    let mut tail = None;

    while let Some(line) = stream.next_line() {
        tail = line.tokens().last().copied();
        let keyword = line.keyword();
        let Some(field) = Field::from_keyword(keyword.text) else {
            log::debug!(
                "line {}: skipping unknown statement `{}`",
                keyword.line,
                keyword.text
            );
            continue;
        };
        let mut cursor = line.cursor();
        read_statement(&mut ctx, field, &mut cursor)?;
    }

    // Trailing blank and comment lines would put the end past the last statement.
    match tail {
        Some(tok) => {
            ctx.last_line = tok.line;
            ctx.end_span = Span::new(tok.span.file, tok.span.end, tok.span.end);
        }
        None => {
            ctx.last_line = stream.last_line();
            ctx.end_span = stream.end_span();
        }
    }
    Ok(ctx)
}

fn read_statement(
    ctx: &mut ParseContext,
    field: Field,
    cursor: &mut LineCursor<'_, '_>,
) -> Result<(), ArchError> {
    match field {
        Field::IoRat => ctx.io_rat = Some(read_int(cursor, field)?),
        Field::SubblocksPerCluster => ctx.max_subblocks_per_block = Some(read_int(cursor, field)?),
        Field::SubblockLutSize => ctx.subblock_lut_size = Some(read_int(cursor, field)?),
        Field::ChanWidthIo => {
            ctx.chan_width_io = Some(read_float(cursor, field, scalar::CHAN_WIDTH_IO)?)
        }
        Field::FcOutput => ctx.fc_output = Some(read_float(cursor, field, scalar::FC)?),
        Field::FcInput => ctx.fc_input = Some(read_float(cursor, field, scalar::FC)?),
        Field::FcPad => ctx.fc_pad = Some(read_float(cursor, field, scalar::FC)?),
        Field::FcType => {
            ctx.fc_type = Some(parse_keyword(cursor, field)?);
            expect_end(cursor, field)?;
        }
        Field::SwitchBlockType => {
            ctx.switch_block_type = Some(parse_keyword(cursor, field)?);
            expect_end(cursor, field)?;
        }
        Field::ChanWidthX | Field::ChanWidthY => {
            // Counted as soon as the kind is recognized.
            let kind = read_distribution_kind(cursor, field)?;
            ctx.presence.record(field);
            let dist = read_distribution(cursor, field, kind)?;
            if field == Field::ChanWidthX {
                ctx.chan_x = Some(dist);
            } else {
                ctx.chan_y = Some(dist);
            }
            return Ok(());
        }
        Field::Outpin => read_pin(ctx, cursor, field, PinDirection::Driver)?,
        Field::Inpin => read_pin(ctx, cursor, field, PinDirection::Receiver)?,
    }
    ctx.presence.record(field);
    Ok(())
}

fn read_int(cursor: &mut LineCursor<'_, '_>, field: Field) -> Result<u32, ArchError> {
    let value = parse_int(cursor, field)?;
    expect_end(cursor, field)?;
    Ok(value)
}

fn read_float(
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
    range: scalar::FloatRange,
) -> Result<f64, ArchError> {
    let value = parse_float(cursor, field, "value", range)?;
    expect_end(cursor, field)?;
    Ok(value)
}

fn read_distribution_kind(
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
) -> Result<DistributionKind, ArchError> {
    let tok = scalar::require(cursor, field, "a distribution kind")?;
    DistributionKind::from_keyword(tok.text).ok_or_else(|| ArchError::UnknownDistributionKind {
        field,
        text: tok.text.to_string(),
        line: tok.line,
        span: tok.span,
    })
}

fn read_distribution(
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
    kind: DistributionKind,
) -> Result<ChannelDistribution, ArchError> {
    let dist = match kind {
        DistributionKind::Uniform => ChannelDistribution::Uniform {
            peak: parse_float(cursor, field, "peak", scalar::UNIFORM_PEAK)?,
        },
        DistributionKind::Delta => ChannelDistribution::Delta {
            peak: parse_float(cursor, field, "peak", scalar::DELTA_PEAK)?,
            xpeak: parse_float(cursor, field, "xpeak", scalar::FRACTION)?,
            dc: parse_float(cursor, field, "dc", scalar::FRACTION)?,
        },
        DistributionKind::Gaussian | DistributionKind::Pulse => {
            let peak = parse_float(cursor, field, "peak", scalar::SHAPED_PEAK)?;
            let width = parse_float(cursor, field, "width", scalar::WIDTH)?;
            let xpeak = parse_float(cursor, field, "xpeak", scalar::FRACTION)?;
            let dc = parse_float(cursor, field, "dc", scalar::FRACTION)?;
            if kind == DistributionKind::Gaussian {
                ChannelDistribution::Gaussian {
                    peak,
                    width,
                    xpeak,
                    dc,
                }
            } else {
                ChannelDistribution::Pulse {
                    peak,
                    width,
                    xpeak,
                    dc,
                }
            }
        }
    };
    expect_end(cursor, field)?;
    Ok(dist)
}

fn read_pin(
    ctx: &mut ParseContext,
    cursor: &mut LineCursor<'_, '_>,
    field: Field,
    direction: PinDirection,
) -> Result<(), ArchError> {
    let (class, class_tok) = parse_class_id(cursor, field)?;
    let slot = ctx.tables.class_mut(class).ok_or_else(|| {
        InternalError::new(format!(
            "line {}: class {class} was not sized by discovery",
            class_tok.line
        ))
    })?;
    match slot.direction {
        None => slot.direction = Some(direction),
        Some(expected) if expected != direction => {
            return Err(ArchError::MixedDirectionClass {
                class,
                expected,
                found: direction,
                line: class_tok.line,
                span: class_tok.span,
            });
        }
        Some(_) => {}
    }

    if cursor.is_at_end() {
        return Err(ArchError::NoPinLocation {
            field,
            line: class_tok.line,
            span: cursor.end_span(),
        });
    }
    let mut sides = SideSet::EMPTY;
    while let Some(tok) = cursor.next() {
        let side = Side::from_keyword(tok.text).ok_or_else(|| ArchError::InvalidPinLocation {
            field,
            text: tok.text.to_string(),
            line: tok.line,
            span: tok.span,
        })?;
        sides.insert(side);
    }

    let pin = ctx.tables.commit_pin(class, sides)?;
    log::trace!("{field} {pin}: class {class}, sides {sides:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_classes;
    use kiln_source::FileId;

    fn load(src: &str) -> Result<ParseContext, ArchError> {
        let mut stream = TokenStream::new(src, FileId::from_raw(0));
        let schema = discover_classes(&mut stream)?;
        stream.rewind();
        load_fields(&mut stream, PinTables::allocate(&schema))
    }

    #[test]
    fn reads_scalars() {
        let ctx = load(
            "io_rat 4\nchan_width_io 0.75\nsubblocks_per_cluster 2\nsubblock_lut_size 5\n\
             Fc_output 0.5\nFc_input 1\nFc_pad 2\nFc_type fractional\nswitch_block_type wilton\n",
        )
        .unwrap();
        assert_eq!(ctx.io_rat, Some(4));
        assert_eq!(ctx.chan_width_io, Some(0.75));
        assert_eq!(ctx.max_subblocks_per_block, Some(2));
        assert_eq!(ctx.subblock_lut_size, Some(5));
        assert_eq!(ctx.fc_output, Some(0.5));
        assert_eq!(ctx.fc_pad, Some(2.0));
        assert_eq!(ctx.fc_type, Some(FcType::Fractional));
        assert_eq!(ctx.switch_block_type, Some(SwitchBlockType::Wilton));
        assert_eq!(ctx.presence.count(Field::IoRat), 1);
        assert_eq!(ctx.last_line, 9);
    }

    #[test]
    fn duplicate_statements_are_counted() {
        let ctx = load("io_rat 1\nio_rat 3\n").unwrap();
        assert_eq!(ctx.io_rat, Some(3));
        assert_eq!(ctx.presence.count(Field::IoRat), 2);
    }

    #[test]
    fn reads_every_distribution_kind() {
        let ctx = load(
            "chan_width_x gaussian -0.5 0.3 0.2 0.1\nchan_width_y delta 2.5 0.5 0\n",
        )
        .unwrap();
        assert_eq!(
            ctx.chan_x,
            Some(ChannelDistribution::Gaussian {
                peak: -0.5,
                width: 0.3,
                xpeak: 0.2,
                dc: 0.1
            })
        );
        assert_eq!(
            ctx.chan_y,
            Some(ChannelDistribution::Delta {
                peak: 2.5,
                xpeak: 0.5,
                dc: 0.0
            })
        );
        let ctx = load("chan_width_x pulse 1 0.5 0.5 0\nchan_width_y uniform 1\n").unwrap();
        assert_eq!(ctx.chan_x.unwrap().kind(), DistributionKind::Pulse);
        assert_eq!(ctx.chan_y, Some(ChannelDistribution::Uniform { peak: 1.0 }));
    }

    #[test]
    fn unknown_distribution_kind() {
        let err = load("chan_width_x triangle 1\n").unwrap_err();
        assert!(matches!(
            err,
            ArchError::UnknownDistributionKind { field: Field::ChanWidthX, ref text, .. } if text == "triangle"
        ));
    }

    #[test]
    fn distribution_rejects_extra_values() {
        let err = load("chan_width_y uniform 1 0.5\n").unwrap_err();
        assert!(matches!(err, ArchError::TrailingTokens { .. }));
        let err = load("chan_width_y delta 1 0.5\n").unwrap_err();
        assert!(matches!(err, ArchError::MissingValue { expected: "dc", .. }));
    }

    #[test]
    fn chan_width_io_requires_a_number() {
        let err = load("chan_width_io uniform 0.5\n").unwrap_err();
        assert!(matches!(err, ArchError::InvalidNumber { field: Field::ChanWidthIo, .. }));
    }

    #[test]
    fn unknown_keywords_are_skipped() {
        let ctx = load("frobnicate 12 yes\nio_rat 2\n").unwrap();
        assert_eq!(ctx.io_rat, Some(2));
    }

    #[test]
    fn pins_fill_tables() {
        let ctx = load(
            "inpin class: 0 bottom top\ninpin class: 0 left\noutpin class: 1 right right\n",
        )
        .unwrap();
        assert_eq!(ctx.presence.pin_statements(), 3);
        let (classes, pins) = ctx.tables.finish();
        assert_eq!(classes[0].direction, Some(PinDirection::Receiver));
        assert_eq!(classes[1].direction, Some(PinDirection::Driver));
        assert_eq!(classes[0].members.len(), 2);
        assert_eq!(pins[0].sides.len(), 2);
        assert!(pins[2].sides.contains(Side::Right));
        assert_eq!(pins[2].sides.len(), 1);
    }

    #[test]
    fn mixed_direction_class() {
        let err = load("inpin class: 0 top\noutpin class: 0 bottom\n").unwrap_err();
        match err {
            ArchError::MixedDirectionClass {
                class,
                expected,
                found,
                line,
                ..
            } => {
                assert_eq!(class, 0);
                assert_eq!(expected, PinDirection::Receiver);
                assert_eq!(found, PinDirection::Driver);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn end_anchors_on_last_statement() {
        let ctx = load("io_rat 4\nsubblock_lut_size 5  # trailing\n\n# done\n\n").unwrap();
        assert_eq!(ctx.last_line, 2);
        assert_eq!((ctx.end_span.start, ctx.end_span.end), (28, 28));
    }

    #[test]
    fn pin_without_sides() {
        let err = load("inpin class: 0\n").unwrap_err();
        assert!(matches!(err, ArchError::NoPinLocation { line: 1, .. }));
    }

    #[test]
    fn pin_with_bad_side() {
        let err = load("outpin class: 0 top north\n").unwrap_err();
        assert!(matches!(
            err,
            ArchError::InvalidPinLocation { ref text, .. } if text == "north"
        ));
    }
}
