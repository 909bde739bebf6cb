//! Layout cost: weighted wire length plus peak-temperature penalty.

use crate::error::{PlaceError, PlaceResult};
use crate::layout::{Layout, Problem};
use crate::thermal::{ThermalConfig, ThermalSimulator};

/// Weights of the two cost terms.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub wire: f64,
    /// Zero disables the thermal simulation entirely.
    pub thermal: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            wire: 1.0,
            thermal: 0.0,
        }
    }
}

impl CostWeights {
    pub fn new(wire: f64, thermal: f64) -> Self {
        Self { wire, thermal }
    }

    pub fn validate(&self) -> PlaceResult<()> {
        for (name, w) in [("wire", self.wire), ("thermal", self.thermal)] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(PlaceError::InvalidConfig(format!(
                    "{name} weight must be finite and >= 0, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Cost of one layout, term by term.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub wire_length: f64,
    /// Peak field temperature; `None` when the thermal term is disabled.
    pub max_temperature: Option<f64>,
    pub thermal_cost: f64,
    pub total_cost: f64,
}

/// Weighted Euclidean center-to-center length over all connections whose
/// endpoints are both placed. Unplaced endpoints contribute nothing.
pub fn wire_length(problem: &Problem, layout: &Layout) -> f64 {
    problem
        .links()
        .iter()
        .filter_map(|link| {
            let a = problem.rect_in(layout, link.a)?.center();
            let b = problem.rect_in(layout, link.b)?.center();
            Some(link.weight * a.distance(&b))
        })
        .sum()
}

/// Evaluates layouts of a single problem.
///
/// Every call re-runs the thermal simulation from scratch when the
/// thermal weight is positive; nothing is cached between layouts.
#[derive(Debug, Clone)]
pub struct CostEvaluator<'a> {
    problem: &'a Problem,
    simulator: ThermalSimulator,
    weights: CostWeights,
}

impl<'a> CostEvaluator<'a> {
    pub fn new(problem: &'a Problem, thermal: ThermalConfig, weights: CostWeights) -> Self {
        Self {
            problem,
            simulator: ThermalSimulator::new(thermal),
            weights,
        }
    }

    /// Wire-length-only evaluator.
    pub fn wire_only(problem: &'a Problem) -> Self {
        Self::new(problem, ThermalConfig::default(), CostWeights::default())
    }

    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    pub fn simulator(&self) -> &ThermalSimulator {
        &self.simulator
    }

    pub fn evaluate(&self, layout: &Layout) -> CostBreakdown {
        let wire = wire_length(self.problem, layout);
        let ambient = self.simulator.config().ambient_temperature;

        let (max_temperature, thermal_cost) = if self.weights.thermal > 0.0 {
            let peak = self.simulator.max_temperature(self.problem, layout);
            (Some(peak), (peak - ambient).max(0.0))
        } else {
            (None, 0.0)
        };

        CostBreakdown {
            wire_length: wire,
            max_temperature,
            thermal_cost,
            total_cost: self.weights.wire * wire + self.weights.thermal * thermal_cost,
        }
    }

    /// Shorthand for `evaluate(layout).total_cost`.
    pub fn total(&self, layout: &Layout) -> f64 {
        self.evaluate(layout).total_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Board, Component, Connection, Placement};

    fn problem() -> Problem {
        Problem::new(
            Board::new(20.0, 20.0),
            vec![
                Component::new("A", 2.0, 2.0).with_power(5.0),
                Component::new("B", 2.0, 2.0),
                Component::new("C", 4.0, 2.0),
            ],
            vec![
                Connection::new("A", "B", 1.0),
                Connection::new("A", "B", 2.0),
                Connection::new("B", "C", 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_wire_length_parallel_connections_add() {
        let p = problem();
        let mut layout = p.empty_layout();
        layout.place(0, Placement::at(0.0, 0.0));
        layout.place(1, Placement::at(3.0, 4.0));
        // Centers (1,1) and (4,5): distance 5, weights 1 + 2.
        assert!((wire_length(&p, &layout) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_unplaced_endpoints_contribute_nothing() {
        let p = problem();
        let mut layout = p.empty_layout();
        assert_eq!(wire_length(&p, &layout), 0.0);
        layout.place(2, Placement::at(10.0, 10.0));
        assert_eq!(wire_length(&p, &layout), 0.0);
    }

    #[test]
    fn test_thermal_weight_zero_skips_simulation() {
        let p = problem();
        let mut layout = p.empty_layout();
        layout.place(0, Placement::at(9.0, 9.0));
        let eval = CostEvaluator::new(&p, ThermalConfig::default(), CostWeights::new(2.0, 0.0));
        let b = eval.evaluate(&layout);
        assert_eq!(b.max_temperature, None);
        assert_eq!(b.thermal_cost, 0.0);
        assert_eq!(b.total_cost, 0.0);
    }

    #[test]
    fn test_total_combines_terms() {
        let p = problem();
        let mut layout = p.empty_layout();
        layout.place(0, Placement::at(9.0, 9.0));
        layout.place(1, Placement::at(0.0, 0.0));
        let eval = CostEvaluator::new(&p, ThermalConfig::default(), CostWeights::new(1.5, 0.25));
        let b = eval.evaluate(&layout);
        let peak = b.max_temperature.unwrap();
        assert!(peak > 25.0);
        assert!((b.thermal_cost - (peak - 25.0)).abs() < 1e-9);
        let expected = 1.5 * b.wire_length + 0.25 * b.thermal_cost;
        assert!((b.total_cost - expected).abs() < 1e-9);
        assert_eq!(eval.total(&layout), b.total_cost);
    }

    #[test]
    fn test_cold_board_has_no_thermal_cost() {
        let p = problem();
        let mut layout = p.empty_layout();
        layout.place(1, Placement::at(5.0, 5.0));
        let eval = CostEvaluator::new(&p, ThermalConfig::default(), CostWeights::new(1.0, 1.0));
        let b = eval.evaluate(&layout);
        assert_eq!(b.max_temperature, Some(25.0));
        assert_eq!(b.thermal_cost, 0.0);
    }

    #[test]
    fn test_weights_validate() {
        assert!(CostWeights::new(1.0, 0.0).validate().is_ok());
        assert!(CostWeights::new(-1.0, 0.0).validate().is_err());
        assert!(CostWeights::new(1.0, f64::NAN).validate().is_err());
    }
}
