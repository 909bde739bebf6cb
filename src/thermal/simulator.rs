//! Fixed-iteration grid relaxation.

use super::config::ThermalConfig;
use super::field::{CellSpan, ThermalField};
use crate::layout::{Layout, Problem};
use log::trace;

/// Approximates the steady-state temperature distribution of a layout.
///
/// The simulation is a deterministic explicit relaxation with a fixed
/// iteration count; it never checks for convergence and never fails.
/// Extreme power or zero diffusivity simply produce runaway or flat
/// fields.
#[derive(Debug, Clone, Default)]
pub struct ThermalSimulator {
    config: ThermalConfig,
}

impl ThermalSimulator {
    pub fn new(config: ThermalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThermalConfig {
        &self.config
    }

    /// Grid dimensions `(cols, rows)` for a problem's board.
    pub fn grid_size(&self, problem: &Problem) -> (usize, usize) {
        let board = problem.board();
        let cells = |mm: f64| ((mm * self.config.cells_per_mm).floor() as usize).max(1);
        (cells(board.width), cells(board.height))
    }

    /// Runs the relaxation for `layout` and returns the final field.
    pub fn simulate(&self, problem: &Problem, layout: &Layout) -> ThermalField {
        let cfg = &self.config;
        let ambient = cfg.ambient_temperature;
        let (cols, rows) = self.grid_size(problem);
        let cell_area = 1.0 / (cfg.cells_per_mm * cfg.cells_per_mm);

        let mut source = vec![0.0; cols * rows];
        for (idx, placement) in layout.iter_placed() {
            let power = problem.component(idx).power;
            if power <= 0.0 {
                continue;
            }
            let rect = problem.footprint(idx, &placement);
            let Some(span) = CellSpan::covering(&rect, cfg.cells_per_mm, cols, rows, 1) else {
                continue;
            };
            let area = (span.full_cols * span.full_rows) as f64 * cell_area;
            let intensity = power * cfg.power_scale / area;
            for row in span.row0..span.row1 {
                for col in span.col0..span.col1 {
                    source[row * cols + col] += intensity;
                }
            }
        }

        let mut mask = vec![0.0_f64; cols * rows];
        for hs in &cfg.heatsinks {
            let Some(span) = CellSpan::covering(&hs.area, cfg.cells_per_mm, cols, rows, 0) else {
                continue;
            };
            for row in span.row0..span.row1 {
                for col in span.col0..span.col1 {
                    let m = &mut mask[row * cols + col];
                    *m = m.max(hs.efficiency);
                }
            }
        }
        let has_heatsinks = mask.iter().any(|&m| m > 0.0);

        let mut field = ThermalField::filled(cols, rows, cfg.cells_per_mm, ambient);
        let mut previous = vec![ambient; cols * rows];

        for _ in 0..cfg.iterations {
            let temp = field.data_mut();
            previous.copy_from_slice(temp);
            let at = |c: isize, r: isize| {
                if c < 0 || r < 0 || c >= cols as isize || r >= rows as isize {
                    ambient
                } else {
                    previous[r as usize * cols + c as usize]
                }
            };

            for row in 0..rows {
                for col in 0..cols {
                    let (c, r) = (col as isize, row as isize);
                    let i = row * cols + col;
                    let neighbours = at(c, r - 1) + at(c, r + 1) + at(c - 1, r) + at(c + 1, r);
                    let laplacian = neighbours - 4.0 * previous[i];
                    temp[i] = previous[i] + cfg.diffusivity * laplacian + source[i];
                }
            }

            if has_heatsinks {
                for (t, &m) in temp.iter_mut().zip(&mask) {
                    *t = *t * (1.0 - m) + ambient * m;
                }
            }

            for col in 0..cols {
                temp[col] = ambient;
                temp[(rows - 1) * cols + col] = ambient;
            }
            for row in 0..rows {
                temp[row * cols] = ambient;
                temp[row * cols + cols - 1] = ambient;
            }
        }

        trace!(
            "thermal field {cols}x{rows} after {} iterations, peak {:.2}",
            cfg.iterations,
            field.max()
        );
        field
    }

    /// Peak temperature of the simulated field.
    pub fn max_temperature(&self, problem: &Problem, layout: &Layout) -> f64 {
        self.simulate(problem, layout).max()
    }

    /// Mean temperature over a placed component's footprint, or `None` if
    /// the component is unplaced.
    pub fn component_temperature(
        &self,
        problem: &Problem,
        layout: &Layout,
        idx: usize,
    ) -> Option<f64> {
        let rect = problem.rect_in(layout, idx)?;
        self.simulate(problem, layout).mean_over(&rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Board, Component, Placement, Rect};
    use crate::thermal::HeatsinkArea;

    fn single_hot_component(power: f64) -> (Problem, Layout) {
        let problem = Problem::new(
            Board::new(20.0, 20.0),
            vec![Component::new("U1", 2.0, 2.0).with_power(power)],
            vec![],
        )
        .unwrap();
        let mut layout = problem.empty_layout();
        layout.place(0, Placement::at(9.0, 9.0));
        (problem, layout)
    }

    #[test]
    fn test_zero_power_field_stays_ambient() {
        let problem = Problem::new(
            Board::new(15.0, 12.0),
            vec![Component::new("A", 3.0, 2.0), Component::new("B", 4.0, 4.0)],
            vec![],
        )
        .unwrap();
        let mut layout = problem.empty_layout();
        layout.place(0, Placement::at(1.0, 1.0));
        layout.place(1, Placement::at(6.0, 5.0));

        for iterations in [0, 1, 7, 50] {
            let sim = ThermalSimulator::new(ThermalConfig::default().with_iterations(iterations));
            let field = sim.simulate(&problem, &layout);
            assert_eq!((field.cols(), field.rows()), (15, 12));
            assert!(field.cells().iter().all(|&t| (t - 25.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_hot_component_peak_near_footprint() {
        let (problem, layout) = single_hot_component(10.0);
        let sim = ThermalSimulator::default();
        let field = sim.simulate(&problem, &layout);

        assert!(field.max() > 25.0);
        let (col, row) = field.argmax();
        // Footprint covers cells 9..11; allow one cell of slack.
        assert!((8..=11).contains(&col), "argmax col {col}");
        assert!((8..=11).contains(&row), "argmax row {row}");
    }

    #[test]
    fn test_border_is_ambient() {
        let (problem, layout) = single_hot_component(10.0);
        let field = ThermalSimulator::default().simulate(&problem, &layout);
        for col in 0..field.cols() {
            assert_eq!(field.get(col, 0), Some(25.0));
            assert_eq!(field.get(col, field.rows() - 1), Some(25.0));
        }
        for row in 0..field.rows() {
            assert_eq!(field.get(0, row), Some(25.0));
            assert_eq!(field.get(field.cols() - 1, row), Some(25.0));
        }
    }

    #[test]
    fn test_deterministic() {
        let (problem, layout) = single_hot_component(3.0);
        let sim = ThermalSimulator::default();
        assert_eq!(sim.simulate(&problem, &layout), sim.simulate(&problem, &layout));
    }

    #[test]
    fn test_full_heatsink_clamps_to_ambient() {
        let (problem, layout) = single_hot_component(10.0);
        let config = ThermalConfig::default()
            .with_heatsink(HeatsinkArea::new(Rect::new(0.0, 0.0, 20.0, 20.0), 1.0));
        let field = ThermalSimulator::new(config).simulate(&problem, &layout);
        assert!((field.max() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_heatsink_cools() {
        let (problem, layout) = single_hot_component(10.0);
        let plain = ThermalSimulator::default().max_temperature(&problem, &layout);
        let config = ThermalConfig::default()
            .with_heatsink(HeatsinkArea::new(Rect::new(8.0, 8.0, 4.0, 4.0), 0.5));
        let cooled = ThermalSimulator::new(config).max_temperature(&problem, &layout);
        assert!(cooled < plain, "{cooled} should be below {plain}");
    }

    #[test]
    fn test_component_temperature() {
        let (problem, mut layout) = single_hot_component(10.0);
        let sim = ThermalSimulator::default();
        let t = sim.component_temperature(&problem, &layout, 0).unwrap();
        assert!(t > 25.0);
        layout.unplace(0);
        assert_eq!(sim.component_temperature(&problem, &layout, 0), None);
    }

    #[test]
    fn test_more_power_is_hotter() {
        let (problem_lo, layout) = single_hot_component(1.0);
        let (problem_hi, _) = single_hot_component(5.0);
        let sim = ThermalSimulator::default();
        let lo = sim.max_temperature(&problem_lo, &layout);
        assert!(sim.max_temperature(&problem_hi, &layout) > lo);
    }
}
