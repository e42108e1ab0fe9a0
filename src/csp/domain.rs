//! Per-variable candidate sets.
//!
//! Each variable owns a stable list of candidate [`WordId`]s and a membership bit-vector over
//! the whole dictionary. Removals only clear bits, so iteration order never changes while a
//! domain shrinks.
//!
//! Speculative pruning is undone through a trail, in the same way a SAT trail unassigns
//! literals when backjumping: [`DomainStore::checkpoint`] opens a level, every removal made
//! while at least one level is open is pushed onto the trail, and [`DomainStore::restore`]
//! pops the trail back to the level's mark, re-inserting each word. Removals made with no
//! level open are permanent.

use crate::crossword::{Crossword, VarId, WordId};
use bit_vec::BitVec;

/// A restore point returned by [`DomainStore::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(usize);

/// Candidate words of every variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    candidates: Vec<Vec<WordId>>,
    present: Vec<BitVec>,
    sizes: Vec<usize>,
    trail: Vec<(VarId, WordId)>,
    marks: Vec<usize>,
}

impl DomainStore {
    /// Creates a store where every variable may take any dictionary word.
    #[must_use]
    pub fn new(puzzle: &Crossword) -> Self {
        let num_vars = puzzle.num_vars();
        let num_words = puzzle.num_words();

        Self {
            candidates: vec![(0..num_words).collect::<Vec<_>>(); num_vars],
            present: vec![BitVec::from_elem(num_words, true); num_vars],
            sizes: vec![num_words; num_vars],
            trail: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Number of variables covered by the store.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.sizes.len()
    }

    /// Number of candidates left for `var`.
    #[must_use]
    pub fn len(&self, var: VarId) -> usize {
        self.sizes[var]
    }

    /// Whether `var` has no candidate left.
    #[must_use]
    pub fn is_empty(&self, var: VarId) -> bool {
        self.sizes[var] == 0
    }

    /// Whether `word` is still a candidate for `var`.
    #[must_use]
    pub fn contains(&self, var: VarId, word: WordId) -> bool {
        self.present[var].get(word).unwrap_or(false)
    }

    /// Iterates the remaining candidates of `var` in ascending [`WordId`] order.
    pub fn iter(&self, var: VarId) -> impl Iterator<Item = WordId> + '_ {
        let present = &self.present[var];
        self.candidates[var]
            .iter()
            .copied()
            .filter(move |&w| present[w])
    }

    /// Removes `word` from the domain of `var`. Returns `false` if it was already gone.
    pub fn remove(&mut self, var: VarId, word: WordId) -> bool {
        if !self.contains(var, word) {
            return false;
        }

        self.present[var].set(word, false);
        self.sizes[var] -= 1;
        if !self.marks.is_empty() {
            self.trail.push((var, word));
        }
        true
    }

    /// Reduces the domain of `var` to the single candidate `word`.
    ///
    /// Returns the number of candidates removed.
    pub fn restrict_to(&mut self, var: VarId, word: WordId) -> usize {
        let others = self.iter(var).filter(|&w| w != word).collect::<Vec<_>>();
        for &w in &others {
            self.remove(var, w);
        }
        others.len()
    }

    /// Opens a new level. Removals from now on can be undone with [`DomainStore::restore`].
    pub fn checkpoint(&mut self) -> Level {
        self.marks.push(self.trail.len());
        Level(self.marks.len() - 1)
    }

    /// Re-inserts every word removed since `level` was opened and closes it, together with
    /// any level opened after it.
    pub fn restore(&mut self, level: Level) {
        let Some(&mark) = self.marks.get(level.0) else {
            return;
        };

        for (var, word) in self.trail.drain(mark..).rev() {
            self.present[var].set(word, true);
            self.sizes[var] += 1;
        }
        self.marks.truncate(level.0);
    }

    /// Number of open levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Removes every candidate whose length differs from its variable's length.
    ///
    /// Returns the number of candidates removed. When no level is open the removed words are
    /// also dropped from the iteration lists, since they can never come back.
    pub fn enforce_node_consistency(&mut self, puzzle: &Crossword) -> usize {
        let mut removed = 0;
        for (var, variable) in puzzle.variables().iter().enumerate() {
            let wrong_length = self
                .iter(var)
                .filter(|&w| puzzle.word(w).len() != variable.length)
                .collect::<Vec<_>>();
            for w in wrong_length {
                self.remove(var, w);
                removed += 1;
            }
        }

        self.compact();
        removed
    }

    /// Drops permanently removed words from the iteration lists.
    ///
    /// Does nothing while a level is open.
    pub fn compact(&mut self) {
        if !self.marks.is_empty() {
            return;
        }
        for (candidates, present) in self.candidates.iter_mut().zip(&self.present) {
            candidates.retain(|&w| present[w]);
        }
    }
}
