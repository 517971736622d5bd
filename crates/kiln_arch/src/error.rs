//! Errors raised while reading or validating an architecture file.
//!
//! Every error is fatal: the parse stops at the first problem found by a
//! scanning pass, and the validator returns everything it found at once as
//! [`ArchError::Invalid`].

use crate::field::Field;
use crate::types::PinDirection;
use kiln_common::InternalError;
use kiln_diagnostics::{Diagnostic, DiagnosticCode, Label};
use kiln_source::Span;
use std::path::PathBuf;

/// Errors produced by [`parse_architecture`](crate::parse_architecture).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArchError {
    /// A statement ended before a required operand.
    #[error("line {line}: missing {expected} for `{field}`")]
    MissingValue {
        /// The statement being read.
        field: Field,
        /// What was expected in the missing position.
        expected: &'static str,
        /// 1-based line number.
        line: u32,
        /// Where the operand should have been.
        span: Span,
    },

    /// A numeric operand is not a number.
    #[error("line {line}: `{text}` is not a valid number for `{field}`")]
    InvalidNumber {
        /// The statement being read.
        field: Field,
        /// The offending token.
        text: String,
        /// 1-based line number.
        line: u32,
        /// Location of the token.
        span: Span,
    },

    /// A numeric operand lies outside its permitted range.
    #[error("line {line}: bad value {text} for `{field}`, expected {expected}")]
    OutOfRange {
        /// The statement being read.
        field: Field,
        /// The offending token.
        text: String,
        /// Human-readable description of the permitted range.
        expected: String,
        /// 1-based line number.
        line: u32,
        /// Location of the token.
        span: Span,
    },

    /// Tokens follow the last operand of a statement.
    #[error("line {line}: unexpected `{text}` at end of `{field}` statement")]
    TrailingTokens {
        /// The statement being read.
        field: Field,
        /// The first extra token.
        text: String,
        /// 1-based line number.
        line: u32,
        /// Location of the first extra token.
        span: Span,
    },

    /// An enumerated operand is not one of the accepted keywords.
    #[error("line {line}: bad `{field}` value `{text}`, expected one of {expected}")]
    UnknownKeyword {
        /// The statement being read.
        field: Field,
        /// The offending token.
        text: String,
        /// The accepted keywords.
        expected: String,
        /// 1-based line number.
        line: u32,
        /// Location of the token.
        span: Span,
    },

    /// A channel-width statement names an unknown distribution.
    #[error("line {line}: `{field}` distribution `{text}` unknown")]
    UnknownDistributionKind {
        /// `chan_width_x` or `chan_width_y`.
        field: Field,
        /// The offending token.
        text: String,
        /// 1-based line number.
        line: u32,
        /// Location of the token.
        span: Span,
    },

    /// Pin-class IDs are not contiguous from zero.
    #[error("line {line}: pin class {class} is never used; class ids must be consecutive from 0")]
    ClassIdGap {
        /// The unused class ID.
        class: u32,
        /// Line of the first class declared above the gap.
        line: u32,
        /// Location of that class ID.
        span: Span,
    },

    /// A class holds both input and output pins.
    #[error("line {line}: class {class} contains both input and output pins")]
    MixedDirectionClass {
        /// The offending class.
        class: u32,
        /// Direction established by the class's first pin.
        expected: PinDirection,
        /// Direction of the pin on this line.
        found: PinDirection,
        /// 1-based line number.
        line: u32,
        /// Location of the class ID on this line.
        span: Span,
    },

    /// A pin statement gives no side.
    #[error("line {line}: `{field}` statement specifies no locations")]
    NoPinLocation {
        /// `inpin` or `outpin`.
        field: Field,
        /// 1-based line number.
        line: u32,
        /// End of the statement.
        span: Span,
    },

    /// A pin side is not `top`, `bottom`, `left` or `right`.
    #[error("line {line}: bad pin location `{text}`")]
    InvalidPinLocation {
        /// `inpin` or `outpin`.
        field: Field,
        /// The offending token.
        text: String,
        /// 1-based line number.
        line: u32,
        /// Location of the token.
        span: Span,
    },

    /// A mandatory statement never appeared.
    #[error("line {line}: `{field}` not set in architecture file")]
    MissingField {
        /// The missing statement.
        field: Field,
        /// Line of the last statement in the file.
        line: u32,
        /// Just past the last statement in the file.
        span: Span,
    },

    /// A statement that must appear once appeared several times.
    #[error("line {line}: `{field}` set {count} times in architecture file")]
    DuplicateField {
        /// The repeated statement.
        field: Field,
        /// Number of occurrences.
        count: u32,
        /// Line of the last statement in the file.
        line: u32,
        /// Just past the last statement in the file.
        span: Span,
    },

    /// No `inpin` or `outpin` statement appeared.
    #[error("line {line}: no pins defined; at least one `inpin` or `outpin` is required")]
    NoPinsDefined {
        /// Line of the last statement in the file.
        line: u32,
        /// Just past the last statement in the file.
        span: Span,
    },

    /// Detailed-routing parameters contradict each other.
    #[error("line {line}: inconsistent detailed routing: {reason}")]
    InconsistentDetailedRouting {
        /// What is inconsistent.
        reason: String,
        /// Line of the last statement in the file.
        line: u32,
        /// Just past the last statement in the file.
        span: Span,
    },

    /// The architecture file could not be read.
    #[error("cannot read architecture file {}: {reason}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The passes disagreed about the file contents.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Several validation problems found together.
    #[error("architecture file has {} errors", .0.len())]
    Invalid(Vec<ArchError>),
}

impl ArchError {
    /// The 1-based line the error refers to, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            ArchError::MissingValue { line, .. }
            | ArchError::InvalidNumber { line, .. }
            | ArchError::OutOfRange { line, .. }
            | ArchError::TrailingTokens { line, .. }
            | ArchError::UnknownKeyword { line, .. }
            | ArchError::UnknownDistributionKind { line, .. }
            | ArchError::ClassIdGap { line, .. }
            | ArchError::MixedDirectionClass { line, .. }
            | ArchError::NoPinLocation { line, .. }
            | ArchError::InvalidPinLocation { line, .. }
            | ArchError::MissingField { line, .. }
            | ArchError::DuplicateField { line, .. }
            | ArchError::NoPinsDefined { line, .. }
            | ArchError::InconsistentDetailedRouting { line, .. } => Some(*line),
            ArchError::Invalid(errors) => errors.first().and_then(ArchError::line),
            ArchError::Io { .. } | ArchError::Internal(_) => None,
        }
    }

    /// The source location of the error, or [`Span::DUMMY`].
    pub fn span(&self) -> Span {
        match self {
            ArchError::MissingValue { span, .. }
            | ArchError::InvalidNumber { span, .. }
            | ArchError::OutOfRange { span, .. }
            | ArchError::TrailingTokens { span, .. }
            | ArchError::UnknownKeyword { span, .. }
            | ArchError::UnknownDistributionKind { span, .. }
            | ArchError::ClassIdGap { span, .. }
            | ArchError::MixedDirectionClass { span, .. }
            | ArchError::NoPinLocation { span, .. }
            | ArchError::InvalidPinLocation { span, .. }
            | ArchError::MissingField { span, .. }
            | ArchError::DuplicateField { span, .. }
            | ArchError::NoPinsDefined { span, .. }
            | ArchError::InconsistentDetailedRouting { span, .. } => *span,
            ArchError::Invalid(errors) => errors.first().map_or(Span::DUMMY, ArchError::span),
            ArchError::Io { .. } | ArchError::Internal(_) => Span::DUMMY,
        }
    }

    /// The individual errors, with [`ArchError::Invalid`] expanded.
    pub fn flatten(&self) -> Vec<&ArchError> {
        match self {
            ArchError::Invalid(errors) => errors.iter().flat_map(ArchError::flatten).collect(),
            other => vec![other],
        }
    }

    /// Stable diagnostic code for a single (non-aggregate) error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ArchError::Io { .. } => 1,
            ArchError::MissingValue { .. } => 101,
            ArchError::OutOfRange { .. } => 102,
            ArchError::TrailingTokens { .. } => 103,
            ArchError::InvalidNumber { .. } => 104,
            ArchError::UnknownKeyword { .. } => 105,
            ArchError::UnknownDistributionKind { .. } => 106,
            ArchError::ClassIdGap { .. } => 201,
            ArchError::MixedDirectionClass { .. } => 202,
            ArchError::NoPinLocation { .. } => 203,
            ArchError::InvalidPinLocation { .. } => 204,
            ArchError::DuplicateField { .. } => 301,
            ArchError::MissingField { .. } => 302,
            ArchError::NoPinsDefined { .. } => 303,
            ArchError::InconsistentDetailedRouting { .. } => 304,
            ArchError::Internal(_) | ArchError::Invalid(_) => 900,
        };
        DiagnosticCode::error(number)
    }

    /// Converts the error into one diagnostic per underlying problem.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        self.flatten().into_iter().map(ArchError::to_diagnostic).collect()
    }

    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        match self {
            ArchError::MissingField { field, .. } if field.is_detailed_only() => diag
                .with_label(Label::primary(self.span(), "end of file"))
                .with_note("required when routing is detailed"),
            ArchError::MissingField { field, .. } => {
                diag.with_help(format!("add a `{field}` statement"))
            }
            ArchError::UnknownKeyword { expected, .. } => {
                diag.with_help(format!("expected one of {expected}"))
            }
            ArchError::UnknownDistributionKind { .. } => {
                diag.with_help("expected one of uniform|gaussian|pulse|delta")
            }
            ArchError::InvalidPinLocation { .. } | ArchError::NoPinLocation { .. } => {
                diag.with_help("pin sides are top, bottom, left and right")
            }
            ArchError::MixedDirectionClass { expected, .. } => diag.with_note(format!(
                "the class was first used by a {} pin",
                expected
            )),
            ArchError::InconsistentDetailedRouting { .. } => diag
                .with_note("the routing-graph builder supports only uniform, equal-width channels"),
            ArchError::Internal(_) => diag.with_note("this is a bug in kiln"),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_source::FileId;

    fn missing(field: Field) -> ArchError {
        ArchError::MissingField {
            field,
            line: 9,
            span: Span::new(FileId::from_raw(0), 120, 120),
        }
    }

    #[test]
    fn display_includes_line() {
        let err = ArchError::OutOfRange {
            field: Field::IoRat,
            text: "0".to_string(),
            expected: "an integer > 0".to_string(),
            line: 3,
            span: Span::DUMMY,
        };
        assert_eq!(
            err.to_string(),
            "line 3: bad value 0 for `io_rat`, expected an integer > 0"
        );
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn flatten_expands_nested() {
        let err = ArchError::Invalid(vec![
            missing(Field::FcInput),
            ArchError::Invalid(vec![missing(Field::FcPad)]),
        ]);
        let flat = err.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1], &missing(Field::FcPad));
        assert_eq!(err.line(), Some(9));
        assert_eq!(err.span().start, 120);
    }

    #[test]
    fn codes_are_grouped() {
        assert_eq!(missing(Field::IoRat).code().to_string(), "E302");
        let gap = ArchError::ClassIdGap {
            class: 1,
            line: 2,
            span: Span::DUMMY,
        };
        assert_eq!(gap.code().to_string(), "E201");
        let io = ArchError::Io {
            path: PathBuf::from("k4.arch"),
            reason: "not found".to_string(),
        };
        assert_eq!(io.line(), None);
        assert!(io.span().is_dummy());
        assert_eq!(io.code().to_string(), "E001");
    }

    #[test]
    fn diagnostics_one_per_problem() {
        let err = ArchError::Invalid(vec![missing(Field::FcType), missing(Field::IoRat)]);
        let diags = err.to_diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].notes, vec!["required when routing is detailed"]);
        assert_eq!(diags[1].help, vec!["add a `io_rat` statement"]);
        assert_eq!(diags[1].primary_span.start, 120);
    }

    #[test]
    fn internal_is_transparent() {
        let err: ArchError = InternalError::new("pin table overflow").into();
        assert_eq!(err.to_string(), "internal error: pin table overflow");
    }
}
