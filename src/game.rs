//! Driver loop: lets the knowledge base play a whole game against a board.
//!
//! Each turn asks for a known-safe move first and only guesses when none is
//! left. The board is asked for a count only after confirming the chosen
//! cell is not a mine.

use crate::board::{Board, Minesweeper};
use crate::config::GameConfig;
use crate::error::Result;
use crate::rng::GameRng;
use crate::solver::KnowledgeBase;
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Outcome {
    /// Every non-mine cell was revealed.
    Won,
    /// A guess hit a mine.
    Lost { cell: Cell },
}

/// Summary of one played game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: Outcome,
    /// Cells revealed, including the losing one.
    pub moves: usize,
    /// Moves that were not proven safe.
    pub guesses: usize,
    pub mines_identified: usize,
}

/// Set up a board, an empty knowledge base and the RNG for `config`.
pub fn new_game(config: &GameConfig) -> Result<(Minesweeper, KnowledgeBase, GameRng)> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => GameRng::from_seed(seed),
        None => GameRng::new(),
    };
    let board = Minesweeper::new(config.height, config.width, config.mines, &mut rng)?;
    let kb = KnowledgeBase::new(config.height, config.width)?;
    Ok((board, kb, rng))
}

/// Play until the board is cleared or a guess hits a mine.
pub fn play<B: Board>(board: &B, kb: &mut KnowledgeBase, rng: &mut GameRng) -> Result<GameReport> {
    let mut moves = 0usize;
    let mut guesses = 0usize;

    let outcome = loop {
        let cell = match kb.make_safe_move() {
            Some(cell) => cell,
            None => match kb.make_random_move(rng) {
                Some(cell) => {
                    guesses += 1;
                    debug!(%cell, "no safe move, guessing");
                    cell
                }
                None => break Outcome::Won,
            },
        };

        moves += 1;
        if board.is_mine(cell) {
            break Outcome::Lost { cell };
        }
        kb.add_knowledge(cell, board.nearby_mines(cell))?;
    };

    let report = GameReport {
        outcome,
        moves,
        guesses,
        mines_identified: kb.mines().len(),
    };
    info!(outcome = ?report.outcome, moves, guesses, mines = report.mines_identified, "game over");
    Ok(report)
}

/// Play on a [`Minesweeper`] and flag every mine the knowledge base proved.
pub fn play_minesweeper(
    board: &mut Minesweeper,
    kb: &mut KnowledgeBase,
    rng: &mut GameRng,
) -> Result<GameReport> {
    let report = play(&*board, kb, rng)?;
    for &cell in kb.mines() {
        board.flag(cell);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mine_free_board_is_won_with_one_guess() {
        let board = Minesweeper::from_mines(4, 4, Vec::new()).unwrap();
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        let mut rng = GameRng::from_seed(5);

        let report = play(&board, &mut kb, &mut rng).unwrap();
        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.guesses, 1);
        assert_eq!(report.moves, 16);
        assert_eq!(kb.moves_made().len(), 16);
        assert_eq!(kb.make_safe_move(), None);
    }

    #[test]
    fn test_losing_move_is_reported() {
        // every cell is a mine, so the first guess loses
        let all: Vec<Cell> = (0..2)
            .flat_map(|r| (0..2).map(move |c| Cell::new(r, c)))
            .collect();
        let board = Minesweeper::from_mines(2, 2, all).unwrap();
        let mut kb = KnowledgeBase::new(2, 2).unwrap();
        let mut rng = GameRng::from_seed(5);

        let report = play(&board, &mut kb, &mut rng).unwrap();
        assert!(matches!(report.outcome, Outcome::Lost { .. }));
        assert_eq!(report.moves, 1);
        assert!(kb.moves_made().is_empty());
    }

    #[test]
    fn test_won_game_flags_every_mine() {
        // a single mine in the corner of a strip is always deducible
        let mut board = Minesweeper::from_mines(1, 3, [Cell::new(0, 2)]).unwrap();
        let mut kb = KnowledgeBase::new(1, 3).unwrap();
        kb.add_knowledge(Cell::new(0, 0), 0).unwrap();
        let mut rng = GameRng::from_seed(11);

        let report = play_minesweeper(&mut board, &mut kb, &mut rng).unwrap();
        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.guesses, 0);
        assert!(board.won());
    }

    #[test]
    fn test_new_game_from_config() {
        let config = GameConfig {
            height: 6,
            width: 5,
            mines: 4,
            seed: Some(8),
        };
        let (board, kb, _rng) = new_game(&config).unwrap();
        assert_eq!(board.mines().len(), 4);
        assert_eq!((kb.height(), kb.width()), (6, 5));
    }

    #[test]
    fn test_report_serializes() {
        let report = GameReport {
            outcome: Outcome::Lost { cell: Cell::new(1, 2) },
            moves: 3,
            guesses: 2,
            mines_identified: 0,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""result":"lost""#));
        let back: GameReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
