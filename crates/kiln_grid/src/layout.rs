//! The cell grid and its channel-width arrays.
//!
//! Cells are addressed by `(x, y)` with `0 <= x <= width + 1` and
//! `0 <= y <= height + 1`. Row 0, row `height + 1`, column 0 and column
//! `width + 1` form the I/O ring; the four corners are unusable.

use crate::error::GridError;
use crate::sizing::{derive_grid, GridRequest};
use serde::{Deserialize, Serialize};

/// What a grid cell can hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CellKind {
    /// Perimeter cell holding up to `io_rat` pads.
    Io,
    /// Interior logic-block site.
    Logic,
    /// Corner cell; nothing may be placed here.
    Illegal,
}

impl CellKind {
    /// Single-character symbol used by [`GridLayout::render_map`].
    pub fn symbol(self) -> char {
        match self {
            CellKind::Io => 'I',
            CellKind::Logic => 'L',
            CellKind::Illegal => '.',
        }
    }
}

/// One cell of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GridCell {
    /// Cell type.
    pub kind: CellKind,
    /// How many blocks or pads fit.
    pub capacity: u32,
    /// How many are placed; always 0 until placement runs.
    pub occupancy: u32,
}

/// The fabric: cell types plus per-channel track counts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GridLayout {
    width: u32,
    height: u32,
    io_rat: u32,
    cells: Vec<GridCell>,
    pub(crate) chan_width_x: Vec<u32>,
    pub(crate) chan_width_y: Vec<u32>,
}

impl GridLayout {
    /// Lays out a `width` x `height` grid with `io_rat` pads per I/O cell.
    ///
    /// Channel widths start at zero; see
    /// [`fill_channel_widths`](GridLayout::fill_channel_widths).
    pub fn new(width: u32, height: u32, io_rat: u32) -> Self {
        let columns = width as usize + 2;
        let rows = height as usize + 2;
        let mut cells = Vec::with_capacity(columns * rows);
        for y in 0..rows {
            for x in 0..columns {
                let on_x_edge = x == 0 || x == columns - 1;
                let on_y_edge = y == 0 || y == rows - 1;
                let cell = match (on_x_edge, on_y_edge) {
                    (true, true) => GridCell {
                        kind: CellKind::Illegal,
                        capacity: 0,
                        occupancy: 0,
                    },
                    (false, false) => GridCell {
                        kind: CellKind::Logic,
                        capacity: 1,
                        occupancy: 0,
                    },
                    _ => GridCell {
                        kind: CellKind::Io,
                        capacity: io_rat,
                        occupancy: 0,
                    },
                };
                cells.push(cell);
            }
        }
        Self {
            width,
            height,
            io_rat,
            cells,
            chan_width_x: vec![0; height as usize + 1],
            chan_width_y: vec![0; width as usize + 1],
        }
    }

    /// Sizes the grid for `req` and lays it out.
    pub fn build(req: &GridRequest) -> Result<Self, GridError> {
        let (width, height) = derive_grid(req)?;
        Ok(Self::new(width, height, req.io_rat))
    }

    /// Logic columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logic rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pads per I/O cell.
    pub fn io_rat(&self) -> u32 {
        self.io_rat
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn cell(&self, x: u32, y: u32) -> Option<&GridCell> {
        if x > self.width + 1 || y > self.height + 1 {
            return None;
        }
        self.cells
            .get(y as usize * (self.width as usize + 2) + x as usize)
    }

    /// Every cell with its coordinates, row by row from `y = 0`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &GridCell)> + '_ {
        let columns = self.width as usize + 2;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i % columns) as u32, (i / columns) as u32, c))
    }

    /// Number of cells of `kind`.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Logic sites available.
    pub fn logic_capacity(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Pads the I/O ring can hold.
    pub fn io_capacity(&self) -> u64 {
        2 * u64::from(self.io_rat) * (u64::from(self.width) + u64::from(self.height))
    }

    /// Tracks in each horizontal channel, indexed by row `0..=height`.
    pub fn chan_width_x(&self) -> &[u32] {
        &self.chan_width_x
    }

    /// Tracks in each vertical channel, indexed by column `0..=width`.
    pub fn chan_width_y(&self) -> &[u32] {
        &self.chan_width_y
    }

    /// Draws the grid, top row first, one character per cell.
    pub fn render_map(&self) -> String {
        let columns = self.width as usize + 2;
        let mut out = String::with_capacity(self.cells.len() + self.height as usize + 2);
        for row in self.cells.chunks(columns).rev() {
            out.extend(row.iter().map(|c| c.kind.symbol()));
            out.push('\n');
        }
        out
    }
}
