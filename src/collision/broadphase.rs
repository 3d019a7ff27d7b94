//! Pair discovery shared by every strategy.
//!
//! Scans only read the body store. Each worker fills a local buffer and hands
//! it to a sink once, so shared storage is locked once per worker rather than
//! once per pair.

use crate::{
    collision::{
        contact::CollisionRecord,
        grid::{Cell, SpatialHashingGrid, TraversalMode},
        narrowphase::NarrowPhase,
    },
    core::body::Body,
    utils::allocator::Arena,
};

/// Bodies detection considers, in ascending id order.
pub fn participants(bodies: &Arena<Body>) -> Vec<&Body> {
    bodies.values().filter(|body| body.participates()).collect()
}

/// Tests `body` against `other` with `body` as the owning side.
///
/// Skips self pairs and pairs owned by the other body (`other.id <= body.id`),
/// pairs the owner's filter rejects, and static-static pairs.
pub fn test_pair(body: &Body, other: &Body) -> Option<CollisionRecord> {
    if other.id <= body.id {
        return None;
    }
    if !body.collider.accepts(&other.collider) {
        return None;
    }
    if body.is_static() && other.is_static() {
        return None;
    }

    let contact = NarrowPhase::collide(
        body.position,
        &body.collider,
        other.position,
        &other.collider,
    )?;
    Some(CollisionRecord::new(body.id, other.id, &contact))
}

/// Same as [`test_pair`] with whichever body has the lower id as owner.
pub fn test_unordered(a: &Body, b: &Body) -> Option<CollisionRecord> {
    if a.id < b.id {
        test_pair(a, b)
    } else {
        test_pair(b, a)
    }
}

/// Runs `visit` over `items`, on the rayon pool when `parallel` is set.
///
/// Every worker flushes its non-empty local buffer through `sink` exactly once.
pub fn fan_out<T, V, S>(items: &[T], parallel: bool, visit: V, sink: S)
where
    T: Sync,
    V: Fn(usize, &T, &mut Vec<CollisionRecord>) + Sync,
    S: Fn(Vec<CollisionRecord>) + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            items
                .par_iter()
                .enumerate()
                .fold(Vec::new, |mut local, (index, item)| {
                    visit(index, item, &mut local);
                    local
                })
                .for_each(|local| {
                    if !local.is_empty() {
                        sink(local);
                    }
                });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut local = Vec::new();
    for (index, item) in items.iter().enumerate() {
        visit(index, item, &mut local);
    }
    if !local.is_empty() {
        sink(local);
    }
}

/// Brute-force scan over every participant pair.
pub fn scan_all_pairs<S>(participants: &[&Body], parallel: bool, sink: S)
where
    S: Fn(Vec<CollisionRecord>) + Sync,
{
    fan_out(
        participants,
        parallel,
        |index, body, local| {
            local.extend(
                participants[index + 1..]
                    .iter()
                    .filter_map(|other| test_pair(body, other)),
            );
        },
        sink,
    );
}

fn scan_cell_neighbourhood(
    bodies: &Arena<Body>,
    grid: &SpatialHashingGrid,
    body: &Body,
    (x, y): (i32, i32),
    local: &mut Vec<CollisionRecord>,
) {
    for cell in grid.neighbourhood(x, y) {
        local.extend(
            cell.bodies
                .iter()
                .filter_map(|id| bodies.get(*id))
                .filter_map(|other| test_pair(body, other)),
        );
    }
}

/// Grid scan over movable bodies, walking cells or bodies per `mode`.
pub fn scan_grid<S>(
    bodies: &Arena<Body>,
    grid: &SpatialHashingGrid,
    mode: TraversalMode,
    parallel: bool,
    sink: S,
) where
    S: Fn(Vec<CollisionRecord>) + Sync,
{
    match mode {
        TraversalMode::PerCell => {
            let cells: Vec<&Cell> = grid.cells().collect();
            fan_out(
                &cells,
                parallel,
                |_, cell, local| {
                    for body in cell.bodies.iter().filter_map(|id| bodies.get(*id)) {
                        scan_cell_neighbourhood(bodies, grid, body, cell.coord(), local);
                    }
                },
                sink,
            );
        }
        TraversalMode::PerEntity => {
            let tracked: Vec<&Body> = bodies
                .values()
                .filter(|body| body.is_grid_tracked())
                .collect();
            fan_out(
                &tracked,
                parallel,
                |_, body, local| {
                    if let Some(coord) = grid.cell_of(body.id) {
                        scan_cell_neighbourhood(bodies, grid, body, coord, local);
                    }
                },
                sink,
            );
        }
    }
}

/// Tests static bodies against movable bodies in the cells around them.
///
/// The grid only tracks movable bodies, so this pass is what lets walls
/// collide under the grid strategies.
pub fn scan_static<S>(bodies: &Arena<Body>, grid: &SpatialHashingGrid, parallel: bool, sink: S)
where
    S: Fn(Vec<CollisionRecord>) + Sync,
{
    let statics: Vec<&Body> = bodies.values().filter(|body| body.is_static()).collect();
    fan_out(
        &statics,
        parallel,
        |_, wall, local| {
            let bounds = wall.collider.shape_bounds(wall.position);
            for cell in grid.cells_around(&bounds) {
                local.extend(
                    cell.bodies
                        .iter()
                        .filter_map(|id| bodies.get(*id))
                        .filter_map(|other| test_unordered(wall, other)),
                );
            }
        },
        sink,
    );
}
