use std::collections::HashMap;

use glam::Vec2;

use crate::{
    core::{body::Body, types::Rect},
    utils::{
        allocator::{Arena, EntityId},
        math::cell_coord,
    },
};

/// One occupied grid cell and the movable bodies currently inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub bodies: Vec<EntityId>,
}

impl Cell {
    fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            bodies: Vec::new(),
        }
    }

    pub fn coord(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// How the grid strategies walk the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Iterate occupied cells; cheaper when bodies outnumber cells.
    PerCell,
    /// Iterate bodies and look up their cell.
    PerEntity,
}

/// Sparse uniform grid over visible movable bodies.
///
/// Each tracked body sits in exactly one cell,
/// `floor((shape_centre - offset) / cell_size)`, where the shape centre is the
/// body position for circles and the bounds centre for boxes. Static bodies
/// are not tracked; the grid strategies test them in a separate pass.
#[derive(Debug, Clone)]
pub struct SpatialHashingGrid {
    cell_size: f32,
    offset: Vec2,
    cells: HashMap<(i32, i32), Cell>,
    membership: HashMap<EntityId, (i32, i32)>,
    needs_rebuild: bool,
}

impl SpatialHashingGrid {
    pub fn new(cell_size: f32, offset: Vec2) -> Self {
        Self {
            cell_size,
            offset,
            cells: HashMap::new(),
            membership: HashMap::new(),
            needs_rebuild: true,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn cell_coord(&self, position: Vec2) -> (i32, i32) {
        cell_coord(position, self.offset, self.cell_size)
    }

    /// Inclusive cell range covered by `bounds`.
    pub fn cell_range(&self, bounds: &Rect) -> ((i32, i32), (i32, i32)) {
        (self.cell_coord(bounds.min()), self.cell_coord(bounds.max()))
    }

    /// Moves the grid origin; membership is rebuilt on the next update.
    pub fn recenter(&mut self, offset: Vec2) {
        if offset != self.offset {
            self.offset = offset;
            self.needs_rebuild = true;
        }
    }

    /// Changes the cell size; membership is rebuilt on the next update.
    pub fn resize(&mut self, cell_size: f32) {
        if cell_size != self.cell_size {
            self.cell_size = cell_size;
            self.needs_rebuild = true;
        }
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// Drops all membership; the next update rebuilds from scratch.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.membership.clear();
        self.needs_rebuild = true;
    }

    /// Registers every tracked body from scratch.
    pub fn rebuild(&mut self, bodies: &Arena<Body>) {
        self.cells.clear();
        self.membership.clear();

        for (id, body) in bodies.iter().filter(|(_, body)| body.is_grid_tracked()) {
            let coord = self.cell_coord(body.shape_centre());
            self.insert(id, coord);
        }

        self.needs_rebuild = false;
        log::debug!(
            "rebuilt spatial hash: {} bodies in {} cells (cell size {})",
            self.membership.len(),
            self.cells.len(),
            self.cell_size
        );
    }

    /// Brings membership in line with current positions. Returns how many
    /// bodies changed cell.
    pub fn update(&mut self, bodies: &Arena<Body>) -> usize {
        if self.needs_rebuild {
            self.rebuild(bodies);
            return self.membership.len();
        }

        let mut moved = 0;
        for (id, body) in bodies.iter().filter(|(_, body)| body.is_grid_tracked()) {
            let coord = self.cell_coord(body.shape_centre());
            match self.membership.get(&id).copied() {
                Some(current) if current == coord => {}
                Some(current) => {
                    self.detach(id, current);
                    self.insert(id, coord);
                    moved += 1;
                }
                None => {
                    self.insert(id, coord);
                    moved += 1;
                }
            }
        }

        let stale: Vec<(EntityId, (i32, i32))> = self
            .membership
            .iter()
            .filter(|(id, _)| !bodies.get(**id).is_some_and(Body::is_grid_tracked))
            .map(|(id, coord)| (*id, *coord))
            .collect();
        for (id, coord) in stale {
            self.membership.remove(&id);
            self.detach(id, coord);
        }

        moved
    }

    fn insert(&mut self, id: EntityId, coord: (i32, i32)) {
        self.cells
            .entry(coord)
            .or_insert_with(|| Cell::new(coord.0, coord.1))
            .bodies
            .push(id);
        self.membership.insert(id, coord);
    }

    fn detach(&mut self, id: EntityId, coord: (i32, i32)) {
        let Some(cell) = self.cells.get_mut(&coord) else {
            return;
        };
        if let Some(slot) = cell.bodies.iter().position(|other| *other == id) {
            cell.bodies.swap_remove(slot);
        }
        if cell.bodies.is_empty() {
            self.cells.remove(&coord);
        }
    }

    /// Missing cells read as `None`, i.e. no bodies.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cells.get(&(x, y))
    }

    pub fn cell_of(&self, id: EntityId) -> Option<(i32, i32)> {
        self.membership.get(&id).copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn tracked_count(&self) -> usize {
        self.membership.len()
    }

    /// Occupied cells of the 3x3 block centred on `(x, y)`.
    ///
    /// Coordinates past the `i32` range are skipped, so a cell on the edge of
    /// the range has fewer neighbours and none is visited twice.
    pub fn neighbourhood(&self, x: i32, y: i32) -> impl Iterator<Item = &Cell> + '_ {
        (-1..=1)
            .filter_map(move |dy| y.checked_add(dy))
            .flat_map(move |ny| {
                (-1..=1)
                    .filter_map(move |dx| x.checked_add(dx))
                    .map(move |nx| (nx, ny))
            })
            .filter_map(move |coord| self.cells.get(&coord))
    }

    /// Occupied cells overlapping `bounds` grown by one cell on every side.
    pub fn cells_around(&self, bounds: &Rect) -> impl Iterator<Item = &Cell> + '_ {
        let ((min_x, min_y), (max_x, max_y)) = self.cell_range(bounds);
        (min_y.saturating_sub(1)..=max_y.saturating_add(1))
            .flat_map(move |y| {
                (min_x.saturating_sub(1)..=max_x.saturating_add(1)).map(move |x| (x, y))
            })
            .filter_map(move |coord| self.cells.get(&coord))
    }

    /// Walks cells when the live colliders outnumber occupied cells.
    pub fn traversal_mode(&self, live_colliders: usize) -> TraversalMode {
        if live_colliders > self.cells.len() {
            TraversalMode::PerCell
        } else {
            TraversalMode::PerEntity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collider::Collider;

    fn spawn(bodies: &mut Arena<Body>, position: Vec2) -> EntityId {
        bodies.insert_with(|id| Body {
            id,
            ..Body::new(position, Collider::circle(8.0).enemy().build())
        })
    }

    #[test]
    fn update_follows_moving_bodies() {
        let mut bodies = Arena::new();
        let id = spawn(&mut bodies, Vec2::new(5.0, 5.0));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);
        assert_eq!(grid.cell_of(id), Some((0, 0)));

        bodies.get_mut(id).unwrap().position = Vec2::new(-40.0, 70.0);
        assert_eq!(grid.update(&bodies), 1);
        assert_eq!(grid.cell_of(id), Some((-2, 2)));
        // old cell is pruned once empty
        assert!(grid.cell(0, 0).is_none());
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn static_and_hidden_bodies_are_not_tracked() {
        let mut bodies = Arena::new();
        let wall = bodies.insert(Body::new(
            Vec2::ZERO,
            Collider::rect(48.0, 48.0).environment().build(),
        ));
        let hidden = bodies.insert(Body::builder().visible(false).build());
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);

        assert_eq!(grid.cell_of(wall), None);
        assert_eq!(grid.cell_of(hidden), None);
        assert_eq!(grid.tracked_count(), 0);
    }

    #[test]
    fn removed_and_hidden_bodies_leave_the_grid() {
        let mut bodies = Arena::new();
        let a = spawn(&mut bodies, Vec2::new(1.0, 1.0));
        let b = spawn(&mut bodies, Vec2::new(2.0, 2.0));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);
        assert_eq!(grid.cell(0, 0).map(|c| c.bodies.len()), Some(2));

        bodies.remove(a);
        bodies.get_mut(b).unwrap().visible = false;
        grid.update(&bodies);
        assert_eq!(grid.tracked_count(), 0);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn neighbourhood_skips_missing_cells() {
        let mut bodies = Arena::new();
        spawn(&mut bodies, Vec2::new(1.0, 1.0));
        spawn(&mut bodies, Vec2::new(33.0, 33.0));
        spawn(&mut bodies, Vec2::new(100.0, 1.0));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);

        let mut coords: Vec<_> = grid.neighbourhood(0, 0).map(Cell::coord).collect();
        coords.sort();
        assert_eq!(coords, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn recenter_rebuilds_on_next_update() {
        let mut bodies = Arena::new();
        let id = spawn(&mut bodies, Vec2::new(10.0, 10.0));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);

        grid.recenter(Vec2::new(20.0, 20.0));
        assert!(grid.needs_rebuild());
        grid.update(&bodies);
        assert_eq!(grid.cell_of(id), Some((-1, -1)));

        grid.resize(8.0);
        grid.update(&bodies);
        assert_eq!(grid.cell_of(id), Some((-2, -2)));
    }

    #[test]
    fn traversal_follows_body_to_cell_ratio() {
        let mut bodies = Arena::new();
        spawn(&mut bodies, Vec2::new(1.0, 1.0));
        spawn(&mut bodies, Vec2::new(2.0, 1.0));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);
        assert_eq!(grid.traversal_mode(bodies.len()), TraversalMode::PerCell);

        grid.resize(1.0);
        grid.update(&bodies);
        assert_eq!(grid.traversal_mode(bodies.len()), TraversalMode::PerEntity);
    }

    #[test]
    fn queries_at_the_edge_of_the_coordinate_range_stay_in_range() {
        let mut bodies = Arena::new();
        let id = spawn(&mut bodies, Vec2::new(1e12, 1e12));
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);
        assert_eq!(grid.cell_of(id), Some((i32::MAX, i32::MAX)));

        assert_eq!(grid.neighbourhood(i32::MAX, i32::MAX).count(), 1);
        assert_eq!(grid.neighbourhood(i32::MIN, i32::MIN).count(), 0);
        let bounds = Rect::centered(16.0, 16.0).translated(Vec2::new(1e12, 1e12));
        assert_eq!(grid.cells_around(&bounds).count(), 1);
    }

    #[test]
    fn offset_boxes_are_filed_under_their_shape() {
        let mut bodies = Arena::new();
        let id = bodies.insert_with(|id| Body {
            id,
            ..Body::new(
                Vec2::ZERO,
                Collider::builder()
                    .box_shape(Rect::new(80.0, 0.0, 16.0, 16.0))
                    .build(),
            )
        });
        let mut grid = SpatialHashingGrid::new(32.0, Vec2::ZERO);
        grid.update(&bodies);
        assert_eq!(grid.cell_of(id), Some((2, 0)));
    }
}
