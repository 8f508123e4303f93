//! Knowledge base for the Minesweeper AI.
//!
//! Holds what is certain (moves made, known mines, known safes) and the active
//! sentences, and runs propagation to a fixpoint after every observation:
//! - Phase 1: classify cells forced by single sentences
//! - Phase 2: prune empty and duplicate sentences
//! - Phase 3: subset resolution (`A - B` whenever `B ⊆ A`)
//!
//! Each phase reads a snapshot and applies its results afterwards, so no
//! sentence is mutated while the list is being walked.

use crate::error::{Result, SolverError};
use crate::rng::GameRng;
use crate::sentence::Sentence;
use crate::types::{board_cells, Cell, NeighborCache};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace, warn};

/// The solver state for one game.
///
/// Between public calls `knowledge` is sorted, duplicate-free and holds no
/// empty sentence, and no sentence mentions a classified cell.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    neighbors: NeighborCache,
    moves_made: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    knowledge: Vec<Sentence>,
    tainted: bool,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if board_cells(height, width).is_none() {
            return Err(SolverError::InvalidDimensions { height, width });
        }
        Ok(Self {
            height,
            width,
            neighbors: NeighborCache::new(height, width),
            moves_made: BTreeSet::new(),
            mines: BTreeSet::new(),
            safes: BTreeSet::new(),
            knowledge: Vec::new(),
            tainted: false,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// True once a contradiction was detected. A tainted knowledge base
    /// refuses every further update.
    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    // ─── Public updates ─────────────────────────────────────────────────────

    /// Record that `cell` is a mine and propagate.
    ///
    /// Returns whether the cell was newly classified.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        self.ensure_usable()?;
        self.check_bounds(cell)?;
        let result = self.apply_mine(cell).and_then(|added| {
            self.run_to_fixpoint()?;
            Ok(added)
        });
        self.settle(result)
    }

    /// Record that `cell` is safe and propagate.
    ///
    /// Returns whether the cell was newly classified.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        self.ensure_usable()?;
        self.check_bounds(cell)?;
        let result = self.apply_safe(cell).and_then(|added| {
            self.run_to_fixpoint()?;
            Ok(added)
        });
        self.settle(result)
    }

    /// Ingest the board's report that `cell` is safe and has `count` mines
    /// among its neighbors.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.ensure_usable()?;
        self.check_bounds(cell)?;

        let result = self.observe(cell, count);
        self.settle(result)
    }

    /// Ingest an arbitrary constraint over in-bounds cells.
    pub fn add_sentence(&mut self, sentence: Sentence) -> Result<()> {
        self.ensure_usable()?;
        for &cell in sentence.cells() {
            self.check_bounds(cell)?;
        }

        let result = self.absorb(sentence);
        self.settle(result)
    }

    /// Run propagation until nothing changes. Returns whether anything did.
    ///
    /// Every update already ends at a fixpoint, so a call right after one
    /// returns `false` and leaves the state untouched.
    pub fn propagate(&mut self) -> Result<bool> {
        self.ensure_usable()?;
        let result = self.run_to_fixpoint();
        self.settle(result)
    }

    // ─── Move queries ───────────────────────────────────────────────────────

    /// A known-safe cell that has not been played yet, smallest first.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly random cell that is neither played nor a known mine.
    pub fn make_random_move(&self, rng: &mut GameRng) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .all_cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        rng.choose(&candidates)
    }

    fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn ensure_usable(&self) -> Result<()> {
        if self.tainted {
            Err(SolverError::Tainted)
        } else {
            Ok(())
        }
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if cell.in_bounds(self.height, self.width) {
            Ok(())
        } else {
            Err(SolverError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Taint the knowledge base if `result` carries a contradiction.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_contradiction() {
                warn!(%err, "knowledge base tainted");
                self.tainted = true;
            }
        }
        result
    }

    fn observe(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.moves_made.insert(cell);
        self.apply_safe(cell)?;

        let count = i32::try_from(count).unwrap_or(i32::MAX);
        let sentence = Sentence::new(self.neighbors.get(cell).iter().copied(), count);
        self.absorb(sentence)
    }

    /// Drop already classified cells from `sentence`, store it if it still says
    /// something new, then propagate.
    fn absorb(&mut self, mut sentence: Sentence) -> Result<()> {
        let classified: Vec<Cell> = sentence
            .cells()
            .iter()
            .copied()
            .filter(|cell| self.mines.contains(cell) || self.safes.contains(cell))
            .collect();
        for cell in classified {
            if self.mines.contains(&cell) {
                sentence.mark_mine(cell);
            } else {
                sentence.mark_safe(cell);
            }
        }
        sentence.validate()?;

        self.tidy();
        if !sentence.is_empty() {
            if let Err(pos) = self.knowledge.binary_search(&sentence) {
                debug!(%sentence, "new sentence");
                self.knowledge.insert(pos, sentence);
            }
        }

        self.run_to_fixpoint()?;
        Ok(())
    }

    fn apply_mine(&mut self, cell: Cell) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Err(SolverError::Contradiction(format!(
                "cell {} is known safe and cannot be a mine",
                cell
            )));
        }
        let added = self.mines.insert(cell);
        if added {
            debug!(%cell, "marked mine");
        }
        for sentence in &mut self.knowledge {
            if sentence.mark_mine(cell) {
                sentence.validate()?;
            }
        }
        Ok(added)
    }

    fn apply_safe(&mut self, cell: Cell) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Err(SolverError::Contradiction(format!(
                "cell {} is a known mine and cannot be safe",
                cell
            )));
        }
        let added = self.safes.insert(cell);
        if added {
            debug!(%cell, "marked safe");
        }
        for sentence in &mut self.knowledge {
            if sentence.mark_safe(cell) {
                sentence.validate()?;
            }
        }
        Ok(added)
    }

    /// Remove empty and duplicate sentences and restore sorted order.
    /// Returns whether a sentence was removed.
    fn tidy(&mut self) -> bool {
        let before = self.knowledge.len();
        self.knowledge.retain(|sentence| !sentence.is_empty());
        self.knowledge.sort();
        self.knowledge.dedup();
        self.knowledge.len() != before
    }

    fn run_to_fixpoint(&mut self) -> Result<bool> {
        let mut changed = false;
        let mut passes = 0usize;
        while self.propagate_once()? {
            changed = true;
            passes += 1;
        }
        trace!(passes, sentences = self.knowledge.len(), "fixpoint reached");
        Ok(changed)
    }

    /// One propagation pass. Returns whether it changed anything.
    fn propagate_once(&mut self) -> Result<bool> {
        let mut changed = false;

        // Phase 1: collect forced cells from every sentence, then apply them.
        let mut new_mines = BTreeSet::new();
        let mut new_safes = BTreeSet::new();
        for sentence in &self.knowledge {
            new_mines.extend(
                sentence
                    .known_mines()
                    .into_iter()
                    .filter(|cell| !self.mines.contains(cell)),
            );
            new_safes.extend(
                sentence
                    .known_safes()
                    .into_iter()
                    .filter(|cell| !self.safes.contains(cell)),
            );
        }
        if let Some(cell) = new_mines.intersection(&new_safes).next() {
            return Err(SolverError::Contradiction(format!(
                "cell {} is forced to be both a mine and safe",
                cell
            )));
        }
        for cell in new_mines {
            self.apply_mine(cell)?;
            changed = true;
        }
        for cell in new_safes {
            self.apply_safe(cell)?;
            changed = true;
        }

        // Phase 2: drop empty and duplicate sentences.
        if self.tidy() {
            changed = true;
        }

        // Phase 3: resolve every ordered pair with B ⊆ A.
        let mut derived = BTreeSet::new();
        for (i, a) in self.knowledge.iter().enumerate() {
            for (j, b) in self.knowledge.iter().enumerate() {
                if i == j || b.len() > a.len() || !b.is_subset_of(a) {
                    continue;
                }
                let inferred = a.subtract(b);
                inferred.validate()?;
                if !inferred.is_empty() && self.knowledge.binary_search(&inferred).is_err() {
                    derived.insert(inferred);
                }
            }
        }
        if !derived.is_empty() {
            for sentence in &derived {
                debug!(%sentence, "derived sentence");
            }
            self.knowledge.extend(derived);
            self.knowledge.sort();
            changed = true;
        }

        trace!(
            changed,
            mines = self.mines.len(),
            safes = self.safes.len(),
            sentences = self.knowledge.len(),
            "propagation pass"
        );
        Ok(changed)
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x{} board: {} moves, {} mines, {} safes",
            self.height,
            self.width,
            self.moves_made.len(),
            self.mines.len(),
            self.safes.len()
        )?;
        for sentence in &self.knowledge {
            writeln!(f, "  {}", sentence)?;
        }
        Ok(())
    }
}
