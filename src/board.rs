//! Board collaborator: mine placement and neighbor counts.
//!
//! The solver never looks at mines directly. It only needs the board's
//! dimensions and the count reported for each revealed cell, which is what
//! the [`Board`] trait exposes. [`Minesweeper`] is the reference board used
//! by the driver and as the ground-truth oracle in tests.

use crate::error::{Result, SolverError};
use crate::rng::GameRng;
use crate::types::{board_cells, Cell, NeighborCache};
use std::collections::BTreeSet;
use std::fmt;

/// What a driver needs from a board.
pub trait Board {
    fn height(&self) -> usize;
    fn width(&self) -> usize;
    /// Ground truth. Only the board and the driver may ask this.
    fn is_mine(&self, cell: Cell) -> bool;
    /// Mines among the in-bounds 8-neighborhood of `cell`, excluding `cell`.
    fn nearby_mines(&self, cell: Cell) -> usize;
}

/// A Minesweeper board with a fixed mine layout.
#[derive(Debug, Clone)]
pub struct Minesweeper {
    height: usize,
    width: usize,
    /// Row-major mine flags.
    cells: Vec<bool>,
    mines: BTreeSet<Cell>,
    mines_found: BTreeSet<Cell>,
    neighbors: NeighborCache,
}

impl Minesweeper {
    /// Place exactly `mines` mines uniformly at random.
    pub fn new(height: usize, width: usize, mines: usize, rng: &mut GameRng) -> Result<Self> {
        let mut board = Self::empty(height, width)?;
        if mines > board.cells.len() {
            return Err(SolverError::TooManyMines {
                mines,
                height,
                width,
            });
        }

        while board.mines.len() < mines {
            let cell = Cell::new(rng.gen_range(height), rng.gen_range(width));
            board.place(cell);
        }
        Ok(board)
    }

    /// Build a board with the given mines, for replays and tests.
    pub fn from_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self> {
        let mut board = Self::empty(height, width)?;
        for cell in mines {
            if !cell.in_bounds(height, width) {
                return Err(SolverError::OutOfBounds {
                    cell,
                    height,
                    width,
                });
            }
            board.place(cell);
        }
        Ok(board)
    }

    fn empty(height: usize, width: usize) -> Result<Self> {
        let total =
            board_cells(height, width).ok_or(SolverError::InvalidDimensions { height, width })?;
        Ok(Self {
            height,
            width,
            cells: vec![false; total],
            mines: BTreeSet::new(),
            mines_found: BTreeSet::new(),
            neighbors: NeighborCache::new(height, width),
        })
    }

    fn place(&mut self, cell: Cell) {
        self.cells[cell.row * self.width + cell.col] = true;
        self.mines.insert(cell);
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.mines_found
    }

    /// Record that the player identified `cell` as a mine.
    pub fn flag(&mut self, cell: Cell) {
        self.mines_found.insert(cell);
    }

    /// True when the flagged cells are exactly the mines.
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }
}

impl Board for Minesweeper {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    fn is_mine(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width) && self.cells[cell.row * self.width + cell.col]
    }

    fn nearby_mines(&self, cell: Cell) -> usize {
        self.neighbors
            .get(cell)
            .iter()
            .filter(|&&n| self.is_mine(n))
            .count()
    }
}

/// Text grid of where the mines are: `|X` for a mine, `| ` otherwise.
impl fmt::Display for Minesweeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{}", rule)?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell::new(row, col)) { "|X" } else { "| " };
                write!(f, "{}", mark)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_mines_count() {
        let mut rng = GameRng::from_seed(42);
        let board = Minesweeper::new(16, 30, 99, &mut rng).unwrap();
        assert_eq!(board.mines().len(), 99);
        let flagged = (0..16)
            .flat_map(|r| (0..30).map(move |c| Cell::new(r, c)))
            .filter(|&c| board.is_mine(c))
            .count();
        assert_eq!(flagged, 99);
    }

    #[test]
    fn test_too_many_mines() {
        let mut rng = GameRng::from_seed(1);
        assert!(matches!(
            Minesweeper::new(2, 2, 5, &mut rng),
            Err(SolverError::TooManyMines { mines: 5, .. })
        ));
        let full = Minesweeper::new(2, 2, 4, &mut rng).unwrap();
        assert_eq!(full.mines().len(), 4);
    }

    #[test]
    fn test_nearby_mines_center() {
        let board = Minesweeper::from_mines(3, 3, [Cell::new(1, 1)]).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                let cell = Cell::new(row, col);
                if cell != Cell::new(1, 1) {
                    assert_eq!(board.nearby_mines(cell), 1);
                }
            }
        }
        // the cell itself is not counted
        assert_eq!(board.nearby_mines(Cell::new(1, 1)), 0);
    }

    #[test]
    fn test_nearby_mines_corner() {
        let board = Minesweeper::from_mines(3, 3, [Cell::new(0, 0)]).unwrap();
        assert_eq!(board.nearby_mines(Cell::new(0, 1)), 1);
        assert_eq!(board.nearby_mines(Cell::new(1, 0)), 1);
        assert_eq!(board.nearby_mines(Cell::new(1, 1)), 1);
        assert_eq!(board.nearby_mines(Cell::new(0, 2)), 0);
        assert_eq!(board.nearby_mines(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_rejects_oversized_board() {
        let mut rng = GameRng::from_seed(1);
        assert!(matches!(
            Minesweeper::new(usize::MAX, 2, 1, &mut rng),
            Err(SolverError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Minesweeper::from_mines(1 << 16, 1 << 16, Vec::new()),
            Err(SolverError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Minesweeper::from_mines(0, 5, Vec::new()),
            Err(SolverError::InvalidDimensions { height: 0, width: 5 })
        ));
    }

    #[test]
    fn test_from_mines_rejects_out_of_bounds() {
        assert!(matches!(
            Minesweeper::from_mines(2, 2, [Cell::new(2, 0)]),
            Err(SolverError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_won_after_flagging_all_mines() {
        let mut board = Minesweeper::from_mines(2, 3, [Cell::new(0, 0), Cell::new(1, 2)]).unwrap();
        assert!(!board.won());
        board.flag(Cell::new(0, 0));
        assert!(!board.won());
        board.flag(Cell::new(1, 2));
        assert!(board.won());
    }

    #[test]
    fn test_display() {
        let board = Minesweeper::from_mines(2, 2, [Cell::new(0, 1)]).unwrap();
        assert_eq!(board.to_string(), "-----\n| |X|\n-----\n| | |\n-----\n");
    }
}
