//! Chooses the grid's logic-block extent.
//!
//! The grid has `width` x `height` logic sites surrounded by a ring of I/O
//! cells, each holding `io_rat` pads. A user-fixed size is only checked for
//! capacity; otherwise the smallest grid with the requested aspect ratio
//! that holds every block and pad is chosen.

use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Largest width or height; routing coordinates are 16-bit.
pub const MAX_DIMENSION: u32 = 32766;

/// Inputs to grid sizing.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct GridRequest {
    /// Logic blocks to place.
    pub blocks: u32,
    /// Primary inputs plus primary outputs.
    pub pads: u32,
    /// Pads per I/O cell.
    pub io_rat: u32,
    /// Columns divided by rows.
    pub aspect_ratio: f64,
    /// User-supplied `(width, height)`.
    pub fixed: Option<(u32, u32)>,
}

impl GridRequest {
    /// A square, automatically sized request.
    pub fn new(blocks: u32, pads: u32, io_rat: u32) -> Self {
        Self {
            blocks,
            pads,
            io_rat,
            aspect_ratio: 1.0,
            fixed: None,
        }
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Fixes the size instead of deriving it.
    pub fn with_fixed_size(mut self, width: u32, height: u32) -> Self {
        self.fixed = Some((width, height));
        self
    }
}

/// Returns the `(width, height)` in logic blocks for `req`.
pub fn derive_grid(req: &GridRequest) -> Result<(u32, u32), GridError> {
    let (width, height) = match req.fixed {
        Some((width, height)) => {
            check_fits(req, width, height)?;
            (u64::from(width), u64::from(height))
        }
        None => auto_size(req)?,
    };

    if width > u64::from(MAX_DIMENSION) || height > u64::from(MAX_DIMENSION) {
        return Err(GridError::CoordinateOverflow {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    if width == 1 && height == 1 && req.blocks != 0 {
        return Err(GridError::DegenerateGrid { blocks: req.blocks });
    }

    log::info!(
        "grid {width}x{height} for {} blocks and {} pads",
        req.blocks,
        req.pads
    );
    Ok((width as u32, height as u32))
}

fn check_fits(req: &GridRequest, width: u32, height: u32) -> Result<(), GridError> {
    let logic = u64::from(width) * u64::from(height);
    let io = 2 * u64::from(req.io_rat) * (u64::from(width) + u64::from(height));
    if width == 0 || height == 0 || u64::from(req.blocks) > logic || u64::from(req.pads) > io {
        return Err(GridError::SizeTooSmall {
            width,
            height,
            blocks: req.blocks,
            pads: req.pads,
        });
    }
    Ok(())
}

fn auto_size(req: &GridRequest) -> Result<(u64, u64), GridError> {
    let aspect = req.aspect_ratio;
    if !(aspect.is_finite() && aspect > 0.0) {
        return Err(GridError::InvalidAspectRatio { value: aspect });
    }

    // area = height^2 * aspect, perimeter = 2 * height * (1 + aspect)
    let by_area = (f64::from(req.blocks) / aspect).sqrt().ceil();
    let by_pads = if req.pads == 0 {
        0.0
    } else {
        (f64::from(req.pads) / (2.0 * f64::from(req.io_rat) * (1.0 + aspect))).ceil()
    };
    let height = by_area.max(by_pads).max(1.0);
    let width = (height * aspect).ceil().max(1.0);

    // Float-to-int casts saturate, so oversized grids stay oversized.
    Ok((width as u64, height as u64))
}
