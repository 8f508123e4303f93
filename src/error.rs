//! Error types for the inference engine and its collaborators.

use crate::types::Cell;
use thiserror::Error;

/// Everything that can go wrong while feeding or driving the solver.
///
/// "No move available" is not an error: the move queries return `None`.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The observations contradict each other. Taints the knowledge base.
    #[error("Contradiction: {0}")]
    Contradiction(String),

    /// The knowledge base already hit a contradiction and is no longer trustworthy.
    #[error("Knowledge base is tainted by an earlier contradiction")]
    Tainted,

    /// A caller passed a coordinate outside the board.
    #[error("Cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("Invalid board dimensions: {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("Cannot place {mines} mines on a {height}x{width} board")]
    TooManyMines {
        mines: usize,
        height: usize,
        width: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolverError {
    /// True for errors that leave the knowledge base untrustworthy.
    pub fn is_contradiction(&self) -> bool {
        matches!(self, SolverError::Contradiction(_))
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SolverError>;
