//! Level layout: tile grid, path cells and the waypoints enemies follow.

use std::collections::BTreeSet;

use tower_inferno_core::{Axis, CellCoord, Corner, LevelConfig, PathShape, TileKind, WorldPoint};

const CLASSIC_COLUMNS: u32 = 18;
const CLASSIC_ROWS: u32 = 11;
const CLASSIC_TILE_LENGTH: f32 = 72.0;
const CLASSIC_ROUTE: [(u32, u32); 6] = [(0, 0), (10, 0), (10, 6), (5, 6), (5, 10), (12, 10)];

/// Largest number of tiles a level may hold.
pub const MAX_TILES: u64 = 1 << 16;

/// Reasons a level layout may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LevelError {
    /// The grid has no columns or no rows.
    #[error("grid must contain at least one column and one row")]
    EmptyGrid,
    /// The grid holds more than [`MAX_TILES`] tiles.
    #[error("grid of {columns}x{rows} tiles exceeds the limit of {MAX_TILES}")]
    TooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// Tiles must have a positive, finite side length.
    #[error("tile length {0} must be positive")]
    InvalidTileLength(f32),
    /// The path contains no cells.
    #[error("path must contain at least one cell")]
    EmptyPath,
    /// A path cell lies outside the grid.
    #[error("path cell ({column}, {row}) lies outside the grid")]
    OutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// Two consecutive path cells are not orthogonal neighbours.
    #[error("path step from ({from_column}, {from_row}) to ({to_column}, {to_row}) is not a single orthogonal move")]
    DisjointStep {
        /// Column of the cell the step starts from.
        from_column: u32,
        /// Row of the cell the step starts from.
        from_row: u32,
        /// Column of the cell the step ends on.
        to_column: u32,
        /// Row of the cell the step ends on.
        to_row: u32,
    },
    /// The path visits a cell more than once.
    #[error("path visits ({column}, {row}) more than once")]
    RevisitedCell {
        /// Column of the revisited cell.
        column: u32,
        /// Row of the revisited cell.
        row: u32,
    },
}

/// Ordered polyline of world-space waypoints enemies walk along.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<WorldPoint>,
}

impl Path {
    /// Creates a path visiting the provided waypoints in order.
    ///
    /// Any polyline is accepted. Paths with fewer than two waypoints finish
    /// enemies on the spot.
    #[must_use]
    pub fn from_waypoints(waypoints: Vec<WorldPoint>) -> Self {
        Self { waypoints }
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Point where enemies enter the board.
    #[must_use]
    pub fn start(&self) -> WorldPoint {
        self.waypoints.first().copied().unwrap_or_default()
    }

    /// Waypoint stored at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<WorldPoint> {
        self.waypoints.get(index).copied()
    }
}

/// Immutable description of the playing field.
#[derive(Clone, Debug)]
pub struct Level {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
    path: Path,
}

impl Level {
    /// Builds a level from the ordered cells of its path.
    ///
    /// Consecutive cells must be orthogonal neighbours and no cell may be
    /// visited twice. Waypoints are placed on the centre of the first cell,
    /// every corner, and the last cell.
    pub fn from_cells(
        columns: u32,
        rows: u32,
        tile_length: f32,
        cells: Vec<CellCoord>,
    ) -> Result<Self, LevelError> {
        if columns == 0 || rows == 0 {
            return Err(LevelError::EmptyGrid);
        }
        if u64::from(columns) * u64::from(rows) > MAX_TILES {
            return Err(LevelError::TooLarge { columns, rows });
        }
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(LevelError::InvalidTileLength(tile_length));
        }
        if cells.is_empty() {
            return Err(LevelError::EmptyPath);
        }

        let mut visited = BTreeSet::new();
        for cell in &cells {
            if cell.column() >= columns || cell.row() >= rows {
                return Err(LevelError::OutOfBounds {
                    column: cell.column(),
                    row: cell.row(),
                });
            }
            if !visited.insert(*cell) {
                return Err(LevelError::RevisitedCell {
                    column: cell.column(),
                    row: cell.row(),
                });
            }
        }

        for pair in cells.windows(2) {
            if pair[0].direction_to(pair[1]).is_none() {
                return Err(LevelError::DisjointStep {
                    from_column: pair[0].column(),
                    from_row: pair[0].row(),
                    to_column: pair[1].column(),
                    to_row: pair[1].row(),
                });
            }
        }

        Ok(Self::build(columns, rows, tile_length, &cells))
    }

    /// Builds a level from its serialized configuration.
    pub fn from_config(config: &LevelConfig) -> Result<Self, LevelError> {
        Self::from_cells(
            config.columns,
            config.rows,
            config.tile_length,
            config.path.clone(),
        )
    }

    /// Built-in 18x11 serpentine route.
    #[must_use]
    pub fn classic() -> Self {
        Self::build(
            CLASSIC_COLUMNS,
            CLASSIC_ROWS,
            CLASSIC_TILE_LENGTH,
            &trace_route(&CLASSIC_ROUTE),
        )
    }

    /// Replaces the derived waypoints with a custom polyline.
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Callers keep the grid within [`MAX_TILES`].
    fn build(columns: u32, rows: u32, tile_length: f32, cells: &[CellCoord]) -> Self {
        let capacity = (columns as usize) * (rows as usize);
        let mut level = Self {
            columns,
            rows,
            tile_length,
            tiles: vec![TileKind::Ground; capacity],
            path: Path::default(),
        };

        let mut waypoints = Vec::new();
        for (index, cell) in cells.iter().enumerate() {
            let previous = index.checked_sub(1).and_then(|prev| cells.get(prev));
            let next = cells.get(index + 1);
            let shape = classify(*cell, previous.copied(), next.copied());

            let is_endpoint = previous.is_none() || next.is_none();
            if is_endpoint || matches!(shape, PathShape::Corner(_)) {
                waypoints.push(level.cell_center(*cell));
            }

            if let Some(slot) = level.index(*cell) {
                level.tiles[slot] = TileKind::Path(shape);
            }
        }

        level.path = Path::from_waypoints(waypoints);
        level
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Iterates every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Waypoints enemies follow.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        let half = self.tile_length / 2.0;
        WorldPoint::new(
            cell.column() as f32 * self.tile_length + half,
            cell.row() as f32 * self.tile_length + half,
        )
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::classic()
    }
}

fn classify(cell: CellCoord, previous: Option<CellCoord>, next: Option<CellCoord>) -> PathShape {
    let towards_previous = previous.and_then(|other| cell.direction_to(other));
    let towards_next = next.and_then(|other| cell.direction_to(other));

    match (towards_previous, towards_next) {
        (Some(back), Some(ahead)) => match Corner::joining(back, ahead) {
            Some(corner) => PathShape::Corner(corner),
            None => PathShape::Straight(ahead.axis()),
        },
        (Some(side), None) | (None, Some(side)) => PathShape::Straight(side.axis()),
        (None, None) => PathShape::Straight(Axis::Horizontal),
    }
}

fn trace_route(vertices: &[(u32, u32)]) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    let Some(&(column, row)) = vertices.first() else {
        return cells;
    };
    cells.push(CellCoord::new(column, row));

    for pair in vertices.windows(2) {
        let (mut column, mut row) = pair[0];
        let (to_column, to_row) = pair[1];
        while (column, row) != (to_column, to_row) {
            if column != to_column {
                column = if to_column > column { column + 1 } else { column - 1 };
            } else {
                row = if to_row > row { row + 1 } else { row - 1 };
            }
            cells.push(CellCoord::new(column, row));
        }
    }

    cells
}
