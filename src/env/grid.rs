//! Occupancy grid.

use crate::layout::{Rect, BOUNDS_EPSILON};

/// Half-open cell range `[col0, col1) x [row0, row1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub col0: usize,
    pub col1: usize,
    pub row0: usize,
    pub row1: usize,
}

/// Row-major grid of covered (1) and free (0) cells over the board.
///
/// A footprint covers every cell it touches, so two footprints on
/// disjoint cells never overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    cells_per_mm: f64,
    cells: Vec<f32>,
}

impl OccupancyGrid {
    /// Creates a free grid covering `width x height` millimetres.
    pub fn new(width: f64, height: f64, cells_per_mm: f64) -> Self {
        let cols = (width * cells_per_mm).ceil().max(0.0) as usize;
        let rows = (height * cells_per_mm).ceil().max(0.0) as usize;
        Self {
            cols,
            rows,
            cells_per_mm,
            cells: vec![0.0; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    pub fn is_covered(&self, col: usize, row: usize) -> bool {
        self.cells[row * self.cols + col] > 0.0
    }

    /// Cells covered by `rect`, or `None` if it reaches past the grid.
    /// Every footprint covers at least one cell.
    pub fn range(&self, rect: &Rect) -> Option<CellRange> {
        if rect.x < 0.0 || rect.y < 0.0 {
            return None;
        }
        let c = self.cells_per_mm;
        let col0 = (rect.x * c).floor() as usize;
        let row0 = (rect.y * c).floor() as usize;
        let col1 = ((rect.right() * c - BOUNDS_EPSILON).ceil() as usize).max(col0 + 1);
        let row1 = ((rect.bottom() * c - BOUNDS_EPSILON).ceil() as usize).max(row0 + 1);
        (col1 <= self.cols && row1 <= self.rows).then_some(CellRange {
            col0,
            col1,
            row0,
            row1,
        })
    }

    pub fn is_free(&self, range: &CellRange) -> bool {
        (range.row0..range.row1).all(|row| {
            let start = row * self.cols;
            self.cells[start + range.col0..start + range.col1]
                .iter()
                .all(|&v| v == 0.0)
        })
    }

    pub fn mark(&mut self, range: &CellRange) {
        for row in range.row0..range.row1 {
            let start = row * self.cols;
            self.cells[start + range.col0..start + range.col1].fill(1.0);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v > 0.0).count()
    }
}
