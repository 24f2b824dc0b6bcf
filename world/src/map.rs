//! Level construction: cell classification and the enemy corridor.

use std::num::NonZeroU32;

use path_defence_core::{Cell, CellCoord, PathGrid};

/// Smallest edge length that fits the S-shaped corridor without touching legs.
const S_CURVE_MIN_EDGE: u32 = 7;

/// Dense row-major grid of cell classifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl CellGrid {
    fn filled(columns: u32, rows: u32, cell: Cell) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![cell; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Classification of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterates every cell in row-major order together with its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| CellCoord::new(column, row)))
            .filter_map(move |cell| self.get(cell).map(|classification| (cell, classification)))
    }

    /// Counts the cells holding the provided classification.
    #[must_use]
    pub fn count(&self, classification: Cell) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == classification)
            .count()
    }

    pub(crate) fn set(&mut self, cell: CellCoord, classification: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = classification;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl PathGrid for CellGrid {
    fn width(&self) -> u32 {
        self.columns
    }

    fn height(&self) -> u32 {
        self.rows
    }

    fn is_walkable(&self, cell: CellCoord) -> bool {
        self.get(cell) == Some(Cell::Path)
    }
}

/// Freshly built level: classified cells plus the corridor endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    /// Cell classification with the corridor carved as [`Cell::Path`].
    pub cells: CellGrid,
    /// Corridor entrance where enemies spawn.
    pub start: CellCoord,
    /// Corridor exit enemies try to reach.
    pub end: CellCoord,
}

/// Builds the level grid for the provided dimensions.
///
/// Grids of at least seven cells on each edge receive an S-shaped corridor
/// that enters on the left edge, snakes right, left, and right again, and
/// exits on the right edge. Parallel legs stay at least two cells apart, so
/// the corridor never touches itself and forms a single unbranched route.
/// Smaller grids receive a straight corridor across the middle row.
#[must_use]
pub fn build_map(columns: NonZeroU32, rows: NonZeroU32) -> MapLayout {
    let waypoints = corridor_waypoints(columns.get(), rows.get());
    let mut cells = CellGrid::filled(columns.get(), rows.get(), Cell::Buildable);

    for leg in waypoints.windows(2) {
        carve(&mut cells, leg[0], leg[1]);
    }
    if let [only] = waypoints.as_slice() {
        cells.set(*only, Cell::Path);
    }

    MapLayout {
        cells,
        start: waypoints[0],
        end: waypoints[waypoints.len() - 1],
    }
}

fn corridor_waypoints(columns: u32, rows: u32) -> Vec<CellCoord> {
    if columns < S_CURVE_MIN_EDGE || rows < S_CURVE_MIN_EDGE {
        let row = rows / 2;
        return vec![CellCoord::new(0, row), CellCoord::new(columns - 1, row)];
    }

    let upper = rows / 6;
    let middle = rows / 2;
    let lower = rows - 1 - rows / 6;
    let near = 2;
    let far = columns - 3;

    vec![
        CellCoord::new(0, upper),
        CellCoord::new(far, upper),
        CellCoord::new(far, middle),
        CellCoord::new(near, middle),
        CellCoord::new(near, lower),
        CellCoord::new(columns - 1, lower),
    ]
}

fn carve(cells: &mut CellGrid, from: CellCoord, to: CellCoord) {
    let (column_start, column_end) = ordered(from.column(), to.column());
    let (row_start, row_end) = ordered(from.row(), to.row());

    for row in row_start..=row_end {
        for column in column_start..=column_end {
            cells.set(CellCoord::new(column, row), Cell::Path);
        }
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
