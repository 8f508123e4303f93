//! Core data types shared by the solver and the board.
//!
//! Cells are addressed as `(row, col)`. Flat per-cell storage uses row-major
//! layout: `index = row * width + col`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A board coordinate.
///
/// Ordered row-major, so sets of cells iterate top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[inline(always)]
    pub fn in_bounds(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Largest board (in cells) the crate builds per-cell tables for.
pub const MAX_CELLS: usize = 1 << 20;

/// Number of cells on a `height x width` board.
///
/// `None` if a side is zero, the product overflows, or it exceeds [`MAX_CELLS`].
pub fn board_cells(height: usize, width: usize) -> Option<usize> {
    match height.checked_mul(width) {
        Some(total) if total > 0 && total <= MAX_CELLS => Some(total),
        _ => None,
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to board bounds) for every cell.
/// Indexed by `row * width + col`, each entry is a slice of cells.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    pub height: usize,
    pub width: usize,
    /// Flat storage of all neighbors.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a board of the given dimensions.
    /// Callers check the size with [`board_cells`] first.
    pub(crate) fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }

    /// Get the pre-computed neighbors of `cell`. Out-of-bounds cells have none.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        if !cell.in_bounds(self.height, self.width) {
            return &[];
        }
        let idx = cell.row * self.width + cell.col;
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_order_is_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 2), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::from((3, 4)).to_string(), "(3, 4)");
    }

    #[test]
    fn test_neighbor_cache_corners() {
        let nc = NeighborCache::new(5, 5);
        // Corner (0,0) should have 3 neighbors
        assert_eq!(nc.get(Cell::new(0, 0)).len(), 3);
        // Edge (0,2) should have 5 neighbors
        assert_eq!(nc.get(Cell::new(0, 2)).len(), 5);
        // Center (2,2) should have 8 neighbors
        assert_eq!(nc.get(Cell::new(2, 2)).len(), 8);
    }

    #[test]
    fn test_neighbor_cache_non_square() {
        let nc = NeighborCache::new(2, 4);
        let mut got = nc.get(Cell::new(1, 3)).to_vec();
        got.sort();
        assert_eq!(got, vec![Cell::new(0, 2), Cell::new(0, 3), Cell::new(1, 2)]);
        assert!(nc.get(Cell::new(2, 0)).is_empty());
    }

    #[test]
    fn test_single_cell_board_has_no_neighbors() {
        let nc = NeighborCache::new(1, 1);
        assert!(nc.get(Cell::new(0, 0)).is_empty());

        let strip = NeighborCache::new(1, 3);
        assert_eq!(strip.get(Cell::new(0, 1)), &[Cell::new(0, 0), Cell::new(0, 2)]);
    }

    #[test]
    fn test_board_cells_bounds() {
        assert_eq!(board_cells(3, 4), Some(12));
        assert_eq!(board_cells(1, MAX_CELLS), Some(MAX_CELLS));
        assert_eq!(board_cells(0, 4), None);
        assert_eq!(board_cells(2, MAX_CELLS), None);
        assert_eq!(board_cells(usize::MAX, 2), None);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let nc = NeighborCache::new(10, 10);
        for &n in nc.get(Cell::new(5, 5)) {
            assert!(n.in_bounds(10, 10));
            let dr = n.row as i64 - 5;
            let dc = n.col as i64 - 5;
            assert!(dr.abs() <= 1 && dc.abs() <= 1);
            assert!(dr != 0 || dc != 0);
        }
    }
}
