//! Tile grid and the fixed path carved through it.

use glam::Vec2;
use path_defence_core::{TileCoord, TileKind};

/// Corners of the path in travel order, as `(column, row)` pairs.
pub const PATH_CORNERS: [(u32, u32); 8] = [
    (0, 7),
    (5, 7),
    (5, 4),
    (10, 4),
    (10, 10),
    (15, 10),
    (15, 7),
    (19, 7),
];

/// Smallest `(columns, rows)` that contains every path corner.
#[must_use]
pub fn minimum_dimensions() -> (u32, u32) {
    PATH_CORNERS
        .iter()
        .fold((0, 0), |(columns, rows), &(column, row)| {
            (columns.max(column + 1), rows.max(row + 1))
        })
}

/// Immutable tile matrix with the ordered list of path tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
    path: Vec<TileCoord>,
}

impl Grid {
    /// Builds a grid of the provided size and carves the path into it.
    ///
    /// Every tile on a straight segment between consecutive corners becomes
    /// [`TileKind::Path`]; the remaining tiles are [`TileKind::Buildable`]. The
    /// path list preserves travel direction and never repeats a tile twice in
    /// a row. Dimensions below [`minimum_dimensions`] are raised to it, so the
    /// path is always contiguous.
    #[must_use]
    pub fn create(columns: u32, rows: u32) -> Self {
        let (min_columns, min_rows) = minimum_dimensions();
        let (columns, rows) = (columns.max(min_columns), rows.max(min_rows));
        let mut grid = Self {
            columns,
            rows,
            tiles: vec![TileKind::Buildable; columns as usize * rows as usize],
            path: Vec::new(),
        };

        for pair in PATH_CORNERS.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            for tile in segment(from, to) {
                grid.carve(tile);
            }
        }

        grid
    }

    fn carve(&mut self, tile: TileCoord) {
        let Some(index) = self.index(tile) else {
            return;
        };
        self.tiles[index] = TileKind::Path;
        if self.path.last() != Some(&tile) {
            self.path.push(tile);
        }
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() >= self.columns || tile.row() >= self.rows {
            return None;
        }
        Some(tile.row() as usize * self.columns as usize + tile.column() as usize)
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

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Kind of the tile, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(&self, tile: TileCoord) -> Option<TileKind> {
        self.index(tile).map(|index| self.tiles[index])
    }

    /// Reports whether the tile is inside the grid and accepts towers.
    ///
    /// Occupancy by existing towers is not considered here.
    #[must_use]
    pub fn can_build_at(&self, tile: TileCoord) -> bool {
        self.tile_at(tile) == Some(TileKind::Buildable)
    }

    /// Path tiles in travel order.
    #[must_use]
    pub fn path(&self) -> &[TileCoord] {
        &self.path
    }

    /// World-space centers of the path tiles in travel order.
    #[must_use]
    pub fn path_world_positions(&self, tile_length: f32) -> Vec<Vec2> {
        self.path
            .iter()
            .map(|tile| tile.center(tile_length))
            .collect()
    }

    /// Buildable tiles that share an edge with a path tile, in row-major order.
    #[must_use]
    pub fn buildable_beside_path(&self) -> Vec<TileCoord> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| TileCoord::new(column, row)))
            .filter(|tile| self.can_build_at(*tile))
            .filter(|tile| self.path.iter().any(|path| path.is_adjacent(*tile)))
            .collect()
    }
}

fn segment(from: (u32, u32), to: (u32, u32)) -> Vec<TileCoord> {
    let (from_column, from_row) = from;
    let (to_column, to_row) = to;

    if from_column == to_column {
        span(from_row, to_row)
            .map(|row| TileCoord::new(from_column, row))
            .collect()
    } else {
        span(from_column, to_column)
            .map(|column| TileCoord::new(column, from_row))
            .collect()
    }
}

fn span(from: u32, to: u32) -> Box<dyn Iterator<Item = u32>> {
    if from <= to {
        Box::new(from..=to)
    } else {
        Box::new((to..=from).rev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_grid_has_thirty_two_path_tiles() {
        let grid = Grid::create(20, 15);

        assert_eq!(grid.path().len(), 32);
        assert_eq!(grid.path().first(), Some(&TileCoord::new(0, 7)));
        assert_eq!(grid.path().last(), Some(&TileCoord::new(19, 7)));
        for pair in grid.path().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn path_tiles_are_not_buildable() {
        let grid = Grid::create(20, 15);

        assert_eq!(grid.tile_at(TileCoord::new(5, 5)), Some(TileKind::Path));
        assert!(!grid.can_build_at(TileCoord::new(5, 5)));
        assert!(grid.can_build_at(TileCoord::new(0, 0)));
        assert_eq!(grid.tile_at(TileCoord::new(20, 0)), None);
        assert!(!grid.can_build_at(TileCoord::new(0, 15)));
    }

    #[test]
    fn path_turns_follow_travel_direction() {
        let grid = Grid::create(20, 15);
        let corner = grid
            .path()
            .iter()
            .position(|tile| *tile == TileCoord::new(5, 7))
            .expect("corner on path");

        assert_eq!(grid.path()[corner + 1], TileCoord::new(5, 6));
    }

    #[test]
    fn waypoints_are_tile_centers() {
        let grid = Grid::create(20, 15);
        let waypoints = grid.path_world_positions(32.0);

        assert_eq!(waypoints[0], Vec2::new(16.0, 240.0));
        assert_eq!(waypoints[31], Vec2::new(624.0, 240.0));
    }

    #[test]
    fn minimum_dimensions_cover_every_corner() {
        assert_eq!(minimum_dimensions(), (20, 11));
    }

    #[test]
    fn undersized_grid_is_raised_to_hold_the_path() {
        let grid = Grid::create(12, 9);

        assert_eq!((grid.columns(), grid.rows()), minimum_dimensions());
        assert_eq!(grid.path().len(), 32);
        for pair in grid.path().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }
}
