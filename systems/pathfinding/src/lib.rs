#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic breadth-first route search for grid maps.

use std::collections::VecDeque;

use path_defence_core::{CellCoord, PathFinder, PathGrid};

/// Route search that descends a reverse breadth-first distance field.
///
/// Distances are seeded from the destination and expanded through walkable
/// cells. The route is then recovered by walking from the origin to any
/// neighbour with a strictly smaller distance, probing neighbours in a fixed
/// north, east, south, west order so equal-length alternatives always resolve
/// the same way.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirst;

impl BreadthFirst {
    /// Creates a new breadth-first route search.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PathFinder for BreadthFirst {
    fn find_path(
        &self,
        grid: &dyn PathGrid,
        start: CellCoord,
        end: CellCoord,
    ) -> Option<Vec<CellCoord>> {
        if !grid.is_walkable(start) || !grid.is_walkable(end) {
            return None;
        }

        let field = DistanceField::build(grid, end);
        field.trace(start)
    }
}

/// Dense distance grid storing the number of steps to the destination.
///
/// Unreachable cells hold `u32::MAX`.
#[derive(Clone, Debug)]
struct DistanceField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    fn build(grid: &dyn PathGrid, destination: CellCoord) -> Self {
        let width = grid.width();
        let height = grid.height();
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        let mut field = Self {
            width,
            height,
            distances: vec![u32::MAX; cell_count],
        };

        let Some(origin) = field.index(destination) else {
            return field;
        };
        field.distances[origin] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(destination);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = field.index(cell) else {
                continue;
            };
            let next_distance = field.distances[current_index].saturating_add(1);

            for neighbor in neighbors(cell, width, height) {
                if !grid.is_walkable(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = field.index(neighbor) else {
                    continue;
                };

                if field.distances[neighbor_index] <= next_distance {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        field
    }

    fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != u32::MAX)
    }

    fn trace(&self, start: CellCoord) -> Option<Vec<CellCoord>> {
        let mut current = start;
        let mut current_distance = self.distance(current)?;
        let capacity = usize::try_from(current_distance).unwrap_or(0).saturating_add(1);
        let mut route = Vec::with_capacity(capacity);

        loop {
            route.push(current);

            if current_distance == 0 {
                return Some(route);
            }

            let mut next_cell = None;
            for neighbor in neighbors(current, self.width, self.height) {
                let Some(distance) = self.distance(neighbor) else {
                    continue;
                };

                if distance < current_distance {
                    next_cell = Some((neighbor, distance));
                    break;
                }
            }

            let (next, distance) = next_cell?;
            current = next;
            current_distance = distance;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
