//! Error types shared by every placement engine component.

use thiserror::Error;

/// Root error type for placement engine failures.
///
/// Everything except [`PlaceError::PlacementInfeasible`] is a
/// configuration error: it is detected before any search starts and
/// retrying with the same input will fail the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaceError {
    /// Board dimensions are not strictly positive (or not finite).
    #[error("invalid board {width}x{height} mm: dimensions must be positive")]
    InvalidBoard { width: f64, height: f64 },

    /// A component has a non-positive size or a negative power rating.
    #[error("invalid component `{id}`: {reason}")]
    InvalidComponent { id: String, reason: String },

    /// A component footprint exceeds the board in at least one dimension.
    #[error(
        "component `{id}` ({width}x{height} mm) does not fit on a \
         {board_width}x{board_height} mm board"
    )]
    ComponentTooLarge {
        id: String,
        width: f64,
        height: f64,
        board_width: f64,
        board_height: f64,
    },

    /// Two components share the same id.
    #[error("duplicate component id `{0}`")]
    DuplicateComponent(String),

    /// A connection endpoint names a component that does not exist.
    #[error("connection references unknown component `{0}`")]
    UnknownComponent(String),

    /// A connection has a negative or non-finite weight.
    #[error("invalid connection {a} <-> {b}: weight must be finite and >= 0, got {weight}")]
    InvalidConnection { a: String, b: String, weight: f64 },

    /// An algorithm configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A random layout could not avoid overlap within the attempt budget.
    #[error("could not place component `{id}` without overlap after {attempts} attempts")]
    PlacementInfeasible { id: String, attempts: usize },
}

impl PlaceError {
    /// Returns `true` for errors caused by invalid input or configuration.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, PlaceError::PlacementInfeasible { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type PlaceResult<T> = Result<T, PlaceError>;
