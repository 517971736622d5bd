//! Grid sizing and layout for island-style FPGA fabrics.
//!
//! Given the number of logic blocks and pads a circuit needs, [`derive_grid`]
//! chooses the grid extent and [`GridLayout`] lays out the cells: an I/O ring
//! around an interior of logic sites, with unusable corners. Channel widths
//! are filled from the architecture's distribution profiles by
//! [`GridLayout::fill_channel_widths`].
//!
//! Sizing depends only on scalar architecture values (`io_rat`), never on
//! the pin tables.
//!
//! ```
//! use kiln_grid::{CellKind, GridLayout, GridRequest};
//!
//! let grid = GridLayout::build(&GridRequest::new(100, 20, 2)).unwrap();
//! assert_eq!((grid.width(), grid.height()), (10, 10));
//! assert_eq!(grid.cell(0, 0).unwrap().kind, CellKind::Illegal);
//! ```

#![warn(missing_docs)]

pub mod channel;
pub mod error;
pub mod layout;
pub mod sizing;

pub use channel::relative_width;
pub use error::GridError;
pub use layout::{CellKind, GridCell, GridLayout};
pub use sizing::{derive_grid, GridRequest, MAX_DIMENSION};

use kiln_arch::ArchitectureDescription;

/// Builds a grid for `blocks` logic blocks and `pads` pads on `arch`, then
/// fills its channel widths for a peak of `cfactor` tracks when given.
pub fn layout_for(
    arch: &ArchitectureDescription,
    blocks: u32,
    pads: u32,
    aspect_ratio: f64,
    fixed: Option<(u32, u32)>,
    cfactor: Option<u32>,
) -> Result<GridLayout, GridError> {
    let req = GridRequest {
        blocks,
        pads,
        io_rat: arch.io_rat,
        aspect_ratio,
        fixed,
    };
    let mut grid = GridLayout::build(&req)?;
    if let Some(cfactor) = cfactor {
        grid.fill_channel_widths(cfactor, &arch.chan_x, &arch.chan_y, arch.chan_width_io);
    }
    Ok(grid)
}
