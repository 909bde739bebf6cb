//! Temperature field produced by the simulator.

use crate::layout::Rect;

/// A row-major grid of cell temperatures in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalField {
    cols: usize,
    rows: usize,
    cells_per_mm: f64,
    data: Vec<f64>,
}

impl ThermalField {
    pub(crate) fn filled(cols: usize, rows: usize, cells_per_mm: f64, value: f64) -> Self {
        Self {
            cols,
            rows,
            cells_per_mm,
            data: vec![value; cols * rows],
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cells_per_mm(&self) -> f64 {
        self.cells_per_mm
    }

    /// Raw cell values, row-major.
    pub fn cells(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col < self.cols && row < self.rows {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// `(col, row)` of the hottest cell. Ties resolve to the first cell in
    /// row-major order.
    pub fn argmax(&self) -> (usize, usize) {
        let mut best = 0;
        for (i, &t) in self.data.iter().enumerate() {
            if t > self.data[best] {
                best = i;
            }
        }
        (best % self.cols, best / self.cols)
    }

    /// Mean temperature over the cells covered by `rect`, using the same
    /// discretization as heat sources. `None` if no cell is covered.
    pub fn mean_over(&self, rect: &Rect) -> Option<f64> {
        let span = CellSpan::covering(rect, self.cells_per_mm, self.cols, self.rows, 1)?;
        let mut sum = 0.0;
        for row in span.row0..span.row1 {
            for col in span.col0..span.col1 {
                sum += self.data[row * self.cols + col];
            }
        }
        Some(sum / span.clipped_cells() as f64)
    }
}

/// Half-open range of grid cells covered by a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellSpan {
    pub col0: usize,
    pub col1: usize,
    pub row0: usize,
    pub row1: usize,
    /// Unclipped cell counts of the footprint.
    pub full_cols: usize,
    pub full_rows: usize,
}

impl CellSpan {
    /// Discretizes `rect`: the start cell is the floor of the scaled
    /// origin (clamped into the grid), the extent is the floor of the
    /// scaled size but at least `min_cells`, clipped to the grid.
    pub fn covering(
        rect: &Rect,
        cells_per_mm: f64,
        cols: usize,
        rows: usize,
        min_cells: usize,
    ) -> Option<Self> {
        if cols == 0 || rows == 0 {
            return None;
        }
        let start = |v: f64, limit: usize| {
            ((v * cells_per_mm).floor().max(0.0) as usize).min(limit - 1)
        };
        let extent = |v: f64| ((v * cells_per_mm).floor().max(0.0) as usize).max(min_cells);

        let col0 = start(rect.x, cols);
        let row0 = start(rect.y, rows);
        let full_cols = extent(rect.width);
        let full_rows = extent(rect.height);
        let col1 = (col0 + full_cols).min(cols);
        let row1 = (row0 + full_rows).min(rows);
        if col1 <= col0 || row1 <= row0 {
            return None;
        }
        Some(Self {
            col0,
            col1,
            row0,
            row1,
            full_cols,
            full_rows,
        })
    }

    pub fn clipped_cells(&self) -> usize {
        (self.col1 - self.col0) * (self.row1 - self.row0)
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        (self.col0..self.col1).contains(&col) && (self.row0..self.row1).contains(&row)
    }
}
