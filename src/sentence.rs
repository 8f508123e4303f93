//! Logical sentences about a Minesweeper board.
//!
//! A sentence states that exactly `count` of its `cells` are mines. Sentences
//! never look at global state: the knowledge base tells them which cells were
//! classified and they narrow themselves accordingly.

use crate::error::{Result, SolverError};
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// "Exactly `count` of `cells` are mines."
///
/// The cell set is kept sorted, which makes sentences comparable by value and
/// lets the knowledge base sort and deduplicate them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: i32,
}

impl Sentence {
    /// Build a sentence. Duplicate cells collapse; the count is taken as is,
    /// use [`Sentence::validate`] to check it.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: i32) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Every cell is a mine when the count equals the number of cells.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count >= 0 && self.count as usize == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell is safe when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Drop a cell now known to be a mine. Returns whether it was present.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if self.cells.remove(&cell) {
            self.count -= 1;
            true
        } else {
            false
        }
    }

    /// Drop a cell now known to be safe. Returns whether it was present.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    pub fn is_subset_of(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Resolution: `self - other` when `other`'s cells are a subset of ours.
    pub fn subtract(&self, other: &Sentence) -> Sentence {
        Sentence {
            cells: self.cells.difference(&other.cells).copied().collect(),
            count: self.count - other.count,
        }
    }

    /// `0 <= count <= |cells|`.
    pub fn is_consistent(&self) -> bool {
        self.count >= 0 && self.count as usize <= self.cells.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_consistent() {
            Ok(())
        } else {
            Err(SolverError::Contradiction(format!(
                "sentence {} claims {} mines among {} cells",
                self,
                self.count,
                self.cells.len()
            )))
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
