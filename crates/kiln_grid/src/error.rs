//! Errors raised while sizing the grid.

use kiln_diagnostics::{Diagnostic, DiagnosticCode};
use kiln_source::Span;

/// Errors produced by [`derive_grid`](crate::derive_grid).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A user-fixed size cannot hold the circuit.
    #[error(
        "user-specified size {width}x{height} is too small for {blocks} blocks and {pads} pads"
    )]
    SizeTooSmall {
        /// Requested columns.
        width: u32,
        /// Requested rows.
        height: u32,
        /// Logic blocks to place.
        blocks: u32,
        /// I/O pads to place.
        pads: u32,
    },

    /// The grid has a single logic site but blocks need placing.
    #[error("cannot place {blocks} blocks on a grid with only one logic location")]
    DegenerateGrid {
        /// Logic blocks to place.
        blocks: u32,
    },

    /// A dimension does not fit the 16-bit coordinates used downstream.
    #[error("grid {width}x{height} too large; width and height must not exceed {max}")]
    CoordinateOverflow {
        /// Columns, saturated to `u64`.
        width: u64,
        /// Rows, saturated to `u64`.
        height: u64,
        /// Largest allowed dimension.
        max: u32,
    },

    /// The aspect ratio is not a positive finite number.
    #[error("aspect ratio must be a finite number > 0, got {value}")]
    InvalidAspectRatio {
        /// The rejected ratio.
        value: f64,
    },
}

impl GridError {
    /// Stable diagnostic code.
    pub fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(match self {
            GridError::SizeTooSmall { .. } => 401,
            GridError::DegenerateGrid { .. } => 402,
            GridError::CoordinateOverflow { .. } => 403,
            GridError::InvalidAspectRatio { .. } => 404,
        })
    }

    /// Converts the error into a diagnostic with no source location.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), Span::DUMMY);
        match self {
            GridError::SizeTooSmall { .. } => {
                diag.with_help("omit --width/--height to size the grid automatically")
            }
            GridError::DegenerateGrid { .. } => {
                diag.with_note("a single placement site leaves the placer no legal moves")
            }
            _ => diag,
        }
    }
}
