//! The statement keywords of the architecture format and their occurrence
//! counters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized statement keyword.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Field {
    /// `io_rat <int>`
    IoRat,
    /// `chan_width_x <distribution>`
    ChanWidthX,
    /// `chan_width_y <distribution>`
    ChanWidthY,
    /// `chan_width_io <float>`
    ChanWidthIo,
    /// `outpin class: <id> <sides>`
    Outpin,
    /// `inpin class: <id> <sides>`
    Inpin,
    /// `subblocks_per_cluster <int>`
    SubblocksPerCluster,
    /// `subblock_lut_size <int>`
    SubblockLutSize,
    /// `Fc_output <float>`
    FcOutput,
    /// `Fc_input <float>`
    FcInput,
    /// `Fc_pad <float>`
    FcPad,
    /// `Fc_type absolute|fractional`
    FcType,
    /// `switch_block_type subset|wilton|universal`
    SwitchBlockType,
}

impl Field {
    /// Every field, in the order the validator reports them.
    pub const ALL: [Field; 13] = [
        Field::IoRat,
        Field::ChanWidthX,
        Field::ChanWidthY,
        Field::ChanWidthIo,
        Field::Outpin,
        Field::Inpin,
        Field::SubblocksPerCluster,
        Field::SubblockLutSize,
        Field::FcOutput,
        Field::FcInput,
        Field::FcPad,
        Field::FcType,
        Field::SwitchBlockType,
    ];

    /// The keyword as written in the file.
    pub fn keyword(self) -> &'static str {
        match self {
            Field::IoRat => "io_rat",
            Field::ChanWidthX => "chan_width_x",
            Field::ChanWidthY => "chan_width_y",
            Field::ChanWidthIo => "chan_width_io",
            Field::Outpin => "outpin",
            Field::Inpin => "inpin",
            Field::SubblocksPerCluster => "subblocks_per_cluster",
            Field::SubblockLutSize => "subblock_lut_size",
            Field::FcOutput => "Fc_output",
            Field::FcInput => "Fc_input",
            Field::FcPad => "Fc_pad",
            Field::FcType => "Fc_type",
            Field::SwitchBlockType => "switch_block_type",
        }
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn from_keyword(text: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.keyword() == text)
    }

    /// Fields only required when routing is detailed.
    pub fn is_detailed_only(self) -> bool {
        matches!(
            self,
            Field::FcOutput
                | Field::FcInput
                | Field::FcPad
                | Field::FcType
                | Field::SwitchBlockType
        )
    }

    /// Pin statements, which may occur many times.
    pub fn is_pin(self) -> bool {
        matches!(self, Field::Outpin | Field::Inpin)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How often each field was read during the loading pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FieldPresence {
    counts: [u32; 13],
}

impl FieldPresence {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `field`.
    pub fn record(&mut self, field: Field) {
        let slot = &mut self.counts[field.slot()];
        *slot = slot.saturating_add(1);
    }

    /// Number of recorded occurrences of `field`.
    pub fn count(&self, field: Field) -> u32 {
        self.counts[field.slot()]
    }

    /// Combined count of `inpin` and `outpin` statements.
    pub fn pin_statements(&self) -> u32 {
        self.count(Field::Inpin) + self.count(Field::Outpin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::from_keyword(field.keyword()), Some(field));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Field::from_keyword("Fc_pad"), Some(Field::FcPad));
        assert_eq!(Field::from_keyword("fc_pad"), None);
        assert_eq!(Field::from_keyword("IO_RAT"), None);
    }

    #[test]
    fn detailed_only_fields() {
        let detailed: Vec<_> = Field::ALL
            .into_iter()
            .filter(|f| f.is_detailed_only())
            .collect();
        assert_eq!(
            detailed,
            vec![
                Field::FcOutput,
                Field::FcInput,
                Field::FcPad,
                Field::FcType,
                Field::SwitchBlockType
            ]
        );
        assert!(Field::Inpin.is_pin() && Field::Outpin.is_pin());
        assert!(!Field::IoRat.is_pin());
    }

    #[test]
    fn presence_counts_independently() {
        let mut p = FieldPresence::new();
        p.record(Field::IoRat);
        p.record(Field::IoRat);
        p.record(Field::Inpin);
        p.record(Field::Outpin);
        p.record(Field::Outpin);
        assert_eq!(p.count(Field::IoRat), 2);
        assert_eq!(p.count(Field::ChanWidthIo), 0);
        assert_eq!(p.pin_statements(), 3);
    }
}
