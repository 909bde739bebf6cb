//! Serializable interchange form of a placed problem.
//!
//! Mirrors the JSON object layout viewers exchange: `board_size`,
//! `components[]` and `connections[]`. The crate only converts between
//! this form and [`Problem`] + [`Layout`]; reading and writing files is
//! left to the caller.

use super::problem::{Layout, Placement, Problem};
use super::types::{Board, Component, Connection, Point, DEFAULT_THERMAL_RESISTANCE};
use crate::error::PlaceResult;
use serde::{Deserialize, Serialize};

/// A board, its components (with optional positions) and connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub board_size: [f64; 2],
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    pub size: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub power: f64,
    #[serde(default = "default_thermal_resistance")]
    pub thermal_resistance: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rotated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub comp1: String,
    pub comp2: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_thermal_resistance() -> f64 {
    DEFAULT_THERMAL_RESISTANCE
}

fn default_weight() -> f64 {
    1.0
}

impl LayoutDocument {
    /// Captures a problem and the placement state of `layout`.
    pub fn from_layout(problem: &Problem, layout: &Layout) -> Self {
        let board = problem.board();
        let components = problem
            .components()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let placement = layout.get(i);
                ComponentRecord {
                    name: c.id.clone(),
                    size: [c.width, c.height],
                    position: placement.map(|p| [p.origin.x, p.origin.y]),
                    power: c.power,
                    thermal_resistance: c.thermal_resistance,
                    rotated: placement.is_some_and(|p| p.rotated),
                }
            })
            .collect();
        let connections = problem
            .connections()
            .iter()
            .map(|c| ConnectionRecord {
                comp1: c.a.clone(),
                comp2: c.b.clone(),
                weight: c.weight,
            })
            .collect();
        Self {
            board_size: [board.width, board.height],
            components,
            connections,
        }
    }

    /// Validates the document and rebuilds the problem and layout.
    ///
    /// Components without a `position` are left unplaced.
    pub fn into_problem(self) -> PlaceResult<(Problem, Layout)> {
        let board = Board::new(self.board_size[0], self.board_size[1]);
        let placements: Vec<Option<Placement>> = self
            .components
            .iter()
            .map(|r| {
                r.position.map(|[x, y]| Placement {
                    origin: Point::new(x, y),
                    rotated: r.rotated,
                })
            })
            .collect();
        let components = self
            .components
            .into_iter()
            .map(|r| {
                Component::new(r.name, r.size[0], r.size[1])
                    .with_power(r.power)
                    .with_thermal_resistance(r.thermal_resistance)
            })
            .collect();
        let connections = self
            .connections
            .into_iter()
            .map(|r| Connection::new(r.comp1, r.comp2, r.weight))
            .collect();

        let problem = Problem::new(board, components, connections)?;
        let mut layout = problem.empty_layout();
        for (i, p) in placements.into_iter().enumerate() {
            if let Some(p) = p {
                layout.place(i, p);
            }
        }
        Ok((problem, layout))
    }
}
