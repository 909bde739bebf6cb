//! Validated placement problems and layouts.

use super::types::{Board, Component, Connection, Point, Rect};
use crate::error::{PlaceError, PlaceResult};
use std::collections::{BTreeMap, HashMap};

/// A connection with both endpoints resolved to component indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// A validated placement problem: board, components and connections.
///
/// Construction checks every configuration invariant up front, so search
/// code never has to deal with oversized components or dangling
/// connection endpoints.
#[derive(Debug, Clone)]
pub struct Problem {
    board: Board,
    components: Vec<Component>,
    connections: Vec<Connection>,
    links: Vec<Link>,
    index: HashMap<String, usize>,
}

impl Problem {
    /// Builds and validates a problem.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the board or a component has a
    /// non-positive dimension, a component does not fit on the board in
    /// either dimension, ids are duplicated, or a connection references an
    /// unknown component or carries a negative weight.
    pub fn new(
        board: Board,
        components: Vec<Component>,
        connections: Vec<Connection>,
    ) -> PlaceResult<Self> {
        board.validate()?;

        let mut index = HashMap::with_capacity(components.len());
        for (i, comp) in components.iter().enumerate() {
            comp.validate()?;
            if comp.width > board.width || comp.height > board.height {
                return Err(PlaceError::ComponentTooLarge {
                    id: comp.id.clone(),
                    width: comp.width,
                    height: comp.height,
                    board_width: board.width,
                    board_height: board.height,
                });
            }
            if index.insert(comp.id.clone(), i).is_some() {
                return Err(PlaceError::DuplicateComponent(comp.id.clone()));
            }
        }

        let mut links = Vec::with_capacity(connections.len());
        for conn in &connections {
            if !(conn.weight.is_finite() && conn.weight >= 0.0) {
                return Err(PlaceError::InvalidConnection {
                    a: conn.a.clone(),
                    b: conn.b.clone(),
                    weight: conn.weight,
                });
            }
            let lookup = |id: &String| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| PlaceError::UnknownComponent(id.clone()))
            };
            links.push(Link {
                a: lookup(&conn.a)?,
                b: lookup(&conn.b)?,
                weight: conn.weight,
            });
        }

        Ok(Self {
            board,
            components,
            connections,
            links,
            index,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, idx: usize) -> &Component {
        &self.components[idx]
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns a layout with every component unplaced.
    pub fn empty_layout(&self) -> Layout {
        Layout::empty(self.components.len())
    }

    /// Footprint of component `idx` at the given placement.
    pub fn footprint(&self, idx: usize, placement: &Placement) -> Rect {
        let (w, h) = self.components[idx].dimensions(placement.rotated);
        Rect::new(placement.origin.x, placement.origin.y, w, h)
    }

    /// Footprint of component `idx` in `layout`, if placed.
    pub fn rect_in(&self, layout: &Layout, idx: usize) -> Option<Rect> {
        layout.get(idx).map(|p| self.footprint(idx, &p))
    }

    /// Returns `true` if `rect` (the candidate footprint of `idx`) lies on
    /// the board and overlaps no other placed component of `layout`.
    pub fn fits(&self, layout: &Layout, idx: usize, rect: &Rect) -> bool {
        if !self.board.contains(rect) {
            return false;
        }
        layout
            .iter_placed()
            .filter(|&(other, _)| other != idx)
            .all(|(other, p)| !self.footprint(other, &p).overlaps(rect))
    }

    /// Checks the result invariants of a layout: every placed footprint
    /// on the board and no two footprints overlapping.
    pub fn check_layout(&self, layout: &Layout) -> Result<(), LayoutViolation> {
        let rects: Vec<(usize, Rect)> = layout
            .iter_placed()
            .map(|(i, p)| (i, self.footprint(i, &p)))
            .collect();
        for (pos, &(i, rect)) in rects.iter().enumerate() {
            if !self.board.contains(&rect) {
                return Err(LayoutViolation::OutOfBounds(self.components[i].id.clone()));
            }
            for &(j, other) in &rects[pos + 1..] {
                if rect.overlaps(&other) {
                    return Err(LayoutViolation::Overlap(
                        self.components[i].id.clone(),
                        self.components[j].id.clone(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A broken result invariant found by [`Problem::check_layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutViolation {
    OutOfBounds(String),
    Overlap(String, String),
}

/// Where a single component sits: top-left corner plus orientation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Point,
    /// Width and height swapped (90° rotation).
    pub rotated: bool,
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            rotated: false,
        }
    }
}

/// Placement state of every component of a [`Problem`], by index.
///
/// A `None` slot is an unplaced component.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    slots: Vec<Option<Placement>>,
}

impl Layout {
    pub fn empty(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Placement> {
        self.slots.get(idx).copied().flatten()
    }

    pub fn is_placed(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    pub fn place(&mut self, idx: usize, placement: Placement) {
        self.slots[idx] = Some(placement);
    }

    pub fn unplace(&mut self, idx: usize) {
        self.slots[idx] = None;
    }

    pub fn placed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterates `(index, placement)` over placed components.
    pub fn iter_placed(&self) -> impl Iterator<Item = (usize, Placement)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|p| (i, p)))
    }

    /// Component id → top-left position, restricted to placed components.
    pub fn to_map(&self, problem: &Problem) -> BTreeMap<String, Point> {
        self.iter_placed()
            .map(|(i, p)| (problem.component(i).id.clone(), p.origin))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Problem {
        Problem::new(
            Board::new(8.0, 8.0),
            vec![Component::new("A", 4.0, 4.0), Component::new("B", 4.0, 4.0)],
            vec![Connection::new("A", "B", 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_problem_resolves_links() {
        let p = two_by_two();
        assert_eq!(p.links(), &[Link { a: 0, b: 1, weight: 1.0 }]);
        assert_eq!(p.index_of("B"), Some(1));
        assert_eq!(p.index_of("C"), None);
    }

    #[test]
    fn test_component_wider_than_board_rejected() {
        let err = Problem::new(
            Board::new(10.0, 10.0),
            vec![Component::new("U1", 12.0, 2.0)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, PlaceError::ComponentTooLarge { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_duplicate_and_unknown_ids() {
        let dup = Problem::new(
            Board::new(10.0, 10.0),
            vec![Component::new("U1", 1.0, 1.0), Component::new("U1", 1.0, 1.0)],
            vec![],
        );
        assert_eq!(dup.unwrap_err(), PlaceError::DuplicateComponent("U1".into()));

        let unknown = Problem::new(
            Board::new(10.0, 10.0),
            vec![Component::new("U1", 1.0, 1.0)],
            vec![Connection::new("U1", "U9", 1.0)],
        );
        assert_eq!(unknown.unwrap_err(), PlaceError::UnknownComponent("U9".into()));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = Problem::new(
            Board::new(10.0, 10.0),
            vec![Component::new("A", 1.0, 1.0), Component::new("B", 1.0, 1.0)],
            vec![Connection::new("A", "B", -1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, PlaceError::InvalidConnection { .. }));
    }

    #[test]
    fn test_fits_and_check_layout() {
        let p = two_by_two();
        let mut layout = p.empty_layout();
        layout.place(0, Placement::at(0.0, 0.0));
        assert!(p.fits(&layout, 1, &Rect::new(4.0, 0.0, 4.0, 4.0)));
        assert!(!p.fits(&layout, 1, &Rect::new(2.0, 0.0, 4.0, 4.0)));
        assert!(!p.fits(&layout, 1, &Rect::new(5.0, 0.0, 4.0, 4.0)));

        layout.place(1, Placement::at(4.0, 4.0));
        assert_eq!(p.check_layout(&layout), Ok(()));

        layout.place(1, Placement::at(3.0, 3.0));
        assert_eq!(
            p.check_layout(&layout),
            Err(LayoutViolation::Overlap("A".into(), "B".into()))
        );
    }

    #[test]
    fn test_layout_map_skips_unplaced() {
        let p = two_by_two();
        let mut layout = p.empty_layout();
        layout.place(1, Placement::at(4.0, 0.0));
        let map = layout.to_map(&p);
        assert_eq!(map.len(), 1);
        assert_eq!(map["B"], Point::new(4.0, 0.0));
        assert_eq!(layout.placed_count(), 1);
        layout.unplace(1);
        assert_eq!(layout.placed_count(), 0);
    }

    #[test]
    fn test_rotated_footprint() {
        let p = Problem::new(
            Board::new(20.0, 20.0),
            vec![Component::new("U1", 10.0, 4.0)],
            vec![],
        )
        .unwrap();
        let placement = Placement {
            origin: Point::new(1.0, 2.0),
            rotated: true,
        };
        assert_eq!(p.footprint(0, &placement), Rect::new(1.0, 2.0, 4.0, 10.0));
    }
}
