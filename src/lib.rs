//! Knowledge-based Minesweeper AI.
//!
//! The engine keeps a list of [`Sentence`]s ("exactly N of these cells are
//! mines"), propagates them to a fixpoint after every observation and answers
//! safe-move and random-move queries. The board, the RNG and the game loop are
//! thin collaborators around [`KnowledgeBase`].
//!
//! On `wasm32` the same API is exported to JavaScript via wasm-bindgen.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rng;
pub mod sentence;
pub mod solver;
pub mod types;

pub use board::{Board, Minesweeper};
pub use config::GameConfig;
pub use error::{Result, SolverError};
pub use game::{GameReport, Outcome};
pub use rng::GameRng;
pub use sentence::Sentence;
pub use solver::KnowledgeBase;
pub use types::Cell;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use std::collections::BTreeSet;

    use wasm_bindgen::prelude::*;

    use crate::config::GameConfig;
    use crate::rng::GameRng;
    use crate::solver::KnowledgeBase;
    use crate::types::Cell;
    use crate::{game, SolverError};

    fn to_js_error(err: SolverError) -> JsError {
        JsError::new(&err.to_string())
    }

    /// Cells as a JS array of `[row, col]` pairs.
    fn cells_to_array(cells: &BTreeSet<Cell>) -> js_sys::Array {
        cells
            .iter()
            .map(|cell| {
                let pair = js_sys::Array::new();
                pair.push(&(cell.row as u32).into());
                pair.push(&(cell.col as u32).into());
                JsValue::from(pair)
            })
            .collect()
    }

    fn cell_to_js(cell: Option<Cell>) -> JsValue {
        match cell {
            Some(cell) => serde_wasm_bindgen::to_value(&cell).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// One game's knowledge base, owned by the JS side.
    #[wasm_bindgen(js_name = "KnowledgeBase")]
    pub struct WasmKnowledgeBase {
        inner: KnowledgeBase,
        rng: GameRng,
    }

    #[wasm_bindgen(js_class = "KnowledgeBase")]
    impl WasmKnowledgeBase {
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize) -> Result<WasmKnowledgeBase, JsError> {
            Ok(Self {
                inner: KnowledgeBase::new(height, width).map_err(to_js_error)?,
                rng: GameRng::new(),
            })
        }

        #[wasm_bindgen(js_name = "addKnowledge")]
        pub fn add_knowledge(&mut self, row: usize, col: usize, count: usize) -> Result<(), JsError> {
            self.inner
                .add_knowledge(Cell::new(row, col), count)
                .map_err(to_js_error)
        }

        /// Returns `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "makeSafeMove")]
        pub fn make_safe_move(&self) -> JsValue {
            cell_to_js(self.inner.make_safe_move())
        }

        /// Returns `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "makeRandomMove")]
        pub fn make_random_move(&mut self) -> JsValue {
            cell_to_js(self.inner.make_random_move(&mut self.rng))
        }

        pub fn mines(&self) -> js_sys::Array {
            cells_to_array(self.inner.mines())
        }

        pub fn safes(&self) -> js_sys::Array {
            cells_to_array(self.inner.safes())
        }
    }

    /// Let the AI play a random board. Returns the game report as a JS object.
    #[wasm_bindgen(js_name = "playGame")]
    pub fn wasm_play_game(
        height: usize,
        width: usize,
        mines: usize,
        seed: Option<u64>,
    ) -> Result<JsValue, JsError> {
        let config = GameConfig {
            height,
            width,
            mines,
            seed,
        };
        let (mut board, mut kb, mut rng) = game::new_game(&config).map_err(to_js_error)?;
        let report = game::play_minesweeper(&mut board, &mut kb, &mut rng).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM solver ready".to_string()
    }
}
