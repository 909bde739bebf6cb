//! Thermal simulation parameters and heatsink regions.

use crate::error::{PlaceError, PlaceResult};
use crate::layout::Rect;

/// A board region with boosted heat dissipation.
///
/// Each relaxation step blends the cells under the heatsink back toward
/// ambient by `efficiency` (0 = no effect, 1 = clamped to ambient).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatsinkArea {
    pub area: Rect,
    pub efficiency: f64,
}

impl HeatsinkArea {
    pub fn new(area: Rect, efficiency: f64) -> Self {
        Self { area, efficiency }
    }
}

/// Configuration of the grid relaxation.
///
/// # Examples
///
/// ```
/// use pcb_placer::layout::Rect;
/// use pcb_placer::thermal::{HeatsinkArea, ThermalConfig};
///
/// let config = ThermalConfig::default()
///     .with_ambient_temperature(30.0)
///     .with_cells_per_mm(2.0)
///     .with_heatsink(HeatsinkArea::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.8));
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalConfig {
    /// Ambient (and boundary) temperature in °C.
    pub ambient_temperature: f64,

    /// Grid resolution in cells per millimetre.
    pub cells_per_mm: f64,

    /// Number of relaxation iterations.
    pub iterations: usize,

    /// Diffusivity applied to the discrete Laplacian. Values above 0.25
    /// make the explicit update unstable.
    pub diffusivity: f64,

    /// Multiplier converting W/mm² into the per-step source term.
    pub power_scale: f64,

    /// Heatsink regions.
    pub heatsinks: Vec<HeatsinkArea>,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            ambient_temperature: 25.0,
            cells_per_mm: 1.0,
            iterations: 50,
            diffusivity: 0.1,
            power_scale: 1000.0,
            heatsinks: Vec::new(),
        }
    }
}

impl ThermalConfig {
    pub fn with_ambient_temperature(mut self, t: f64) -> Self {
        self.ambient_temperature = t;
        self
    }

    pub fn with_cells_per_mm(mut self, cells: f64) -> Self {
        self.cells_per_mm = cells;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_diffusivity(mut self, d: f64) -> Self {
        self.diffusivity = d;
        self
    }

    pub fn with_power_scale(mut self, scale: f64) -> Self {
        self.power_scale = scale;
        self
    }

    pub fn with_heatsink(mut self, heatsink: HeatsinkArea) -> Self {
        self.heatsinks.push(heatsink);
        self
    }

    /// Validates the configuration.
    ///
    /// The simulator itself never fails; this is for callers that want to
    /// reject nonsensical settings before a search starts.
    pub fn validate(&self) -> PlaceResult<()> {
        if !self.ambient_temperature.is_finite() {
            return Err(PlaceError::InvalidConfig(
                "ambient_temperature must be finite".into(),
            ));
        }
        if !(self.cells_per_mm.is_finite() && self.cells_per_mm > 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "cells_per_mm must be positive, got {}",
                self.cells_per_mm
            )));
        }
        if !(self.diffusivity.is_finite() && self.diffusivity >= 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "diffusivity must be >= 0, got {}",
                self.diffusivity
            )));
        }
        if !(self.power_scale.is_finite() && self.power_scale >= 0.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "power_scale must be >= 0, got {}",
                self.power_scale
            )));
        }
        for hs in &self.heatsinks {
            if !(0.0..=1.0).contains(&hs.efficiency) {
                return Err(PlaceError::InvalidConfig(format!(
                    "heatsink efficiency must be in [0, 1], got {}",
                    hs.efficiency
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = ThermalConfig::default();
        assert_eq!(c.ambient_temperature, 25.0);
        assert_eq!(c.iterations, 50);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_resolution() {
        assert!(ThermalConfig::default()
            .with_cells_per_mm(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_efficiency() {
        let c = ThermalConfig::default()
            .with_heatsink(HeatsinkArea::new(Rect::new(0.0, 0.0, 1.0, 1.0), 1.5));
        assert!(c.validate().is_err());
    }
}
