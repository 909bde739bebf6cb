//! Geometry primitives and the component/connection descriptions.

use crate::error::{PlaceError, PlaceResult};

/// Tolerance used when checking that a rectangle lies on the board.
pub const BOUNDS_EPSILON: f64 = 1e-9;

/// Default junction-to-ambient thermal resistance in °C/W.
pub const DEFAULT_THERMAL_RESISTANCE: f64 = 10.0;

/// A point on the board in millimetres. The origin is the top-left corner.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle, `(x, y)` being the top-left corner.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Open-interval overlap test. Rectangles that only share an edge do
    /// not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// The fixed rectangular board components are placed on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub width: f64,
    pub height: f64,
}

impl Board {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> PlaceResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.width) || !ok(self.height) {
            return Err(PlaceError::InvalidBoard {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns `true` if `rect` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.x >= -BOUNDS_EPSILON
            && rect.y >= -BOUNDS_EPSILON
            && rect.right() <= self.width + BOUNDS_EPSILON
            && rect.bottom() <= self.height + BOUNDS_EPSILON
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A rectangular component to be placed.
///
/// Components are immutable descriptions. Whether and where a component
/// is placed is recorded in a [`Layout`](super::Layout).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Dissipated power in watts.
    pub power: f64,
    /// Thermal resistance in °C/W.
    pub thermal_resistance: f64,
}

impl Component {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            power: 0.0,
            thermal_resistance: DEFAULT_THERMAL_RESISTANCE,
        }
    }

    pub fn with_power(mut self, watts: f64) -> Self {
        self.power = watts;
        self
    }

    pub fn with_thermal_resistance(mut self, r: f64) -> Self {
        self.thermal_resistance = r;
        self
    }

    /// Footprint dimensions, swapped when the component is rotated.
    pub fn dimensions(&self, rotated: bool) -> (f64, f64) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn validate(&self) -> PlaceResult<()> {
        let invalid = |reason: String| PlaceError::InvalidComponent {
            id: self.id.clone(),
            reason,
        };
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(invalid(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.power.is_finite() && self.power >= 0.0) {
            return Err(invalid(format!("power must be >= 0, got {}", self.power)));
        }
        if !(self.thermal_resistance.is_finite() && self.thermal_resistance >= 0.0) {
            return Err(invalid(format!(
                "thermal resistance must be >= 0, got {}",
                self.thermal_resistance
            )));
        }
        Ok(())
    }
}

/// A weighted, unordered connection between two components.
///
/// Parallel connections between the same pair are kept as separate
/// entries and their weights add up.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub a: String,
    pub b: String,
    pub weight: f64,
}

impl Connection {
    pub fn new(a: impl Into<String>, b: impl Into<String>, weight: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(4.0, 0.0, 4.0, 4.0);
        let c = Rect::new(0.0, 4.0, 4.0, 4.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Rect::new(3.9, 3.9, 1.0, 1.0)));
    }

    #[test]
    fn test_board_contains() {
        let board = Board::new(8.0, 8.0);
        assert!(board.contains(&Rect::new(4.0, 4.0, 4.0, 4.0)));
        assert!(!board.contains(&Rect::new(4.5, 0.0, 4.0, 4.0)));
        assert!(!board.contains(&Rect::new(-0.5, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn test_board_validate() {
        assert!(Board::new(10.0, 10.0).validate().is_ok());
        assert!(Board::new(0.0, 10.0).validate().is_err());
        assert!(Board::new(10.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_component_validate() {
        assert!(Component::new("R1", 2.0, 1.0).validate().is_ok());
        assert!(Component::new("R1", 0.0, 1.0).validate().is_err());
        assert!(Component::new("R1", 2.0, 1.0)
            .with_power(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rotated_dimensions() {
        let c = Component::new("U1", 10.0, 8.0);
        assert_eq!(c.dimensions(false), (10.0, 8.0));
        assert_eq!(c.dimensions(true), (8.0, 10.0));
    }

    #[test]
    fn test_center_distance() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0).center();
        let b = Rect::new(4.0, 0.0, 4.0, 4.0).center();
        assert!((a.distance(&b) - 4.0).abs() < 1e-12);
    }
}
