//! Layout model: board, components, connections and placements.
//!
//! A [`Problem`] is built once per problem instance from externally
//! supplied descriptions and validated on construction. Search code then
//! works on [`Layout`] values, which record the [`Placement`] of each
//! component by index.

#[cfg(feature = "serde")]
mod document;
mod problem;
mod types;

#[cfg(feature = "serde")]
pub use document::{ComponentRecord, ConnectionRecord, LayoutDocument};
pub use problem::{Layout, LayoutViolation, Link, Placement, Problem};
pub use types::{
    Board, Component, Connection, Point, Rect, BOUNDS_EPSILON, DEFAULT_THERMAL_RESISTANCE,
};
