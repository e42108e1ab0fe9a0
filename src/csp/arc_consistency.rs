//! The AC-3 consistency engine.
//!
//! An arc `(x, y)` is consistent when every candidate left for `x` has at least one candidate
//! for `y` carrying the same letter at their shared cell. [`Propagator::revise`] makes a single
//! arc consistent; [`Propagator::enforce`] repeats that over a worklist until a fixpoint is
//! reached or some domain runs empty.
//!
//! The order in which arcs leave the worklist changes how many revisions are needed, not the
//! fixpoint itself. Both a FIFO ([`ArcQueue`]) and a LIFO ([`ArcStack`]) worklist are
//! provided; the queue is the default.

use crate::crossword::{Crossword, VarId};
use crate::csp::domain::DomainStore;
use clap::ValueEnum;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fmt::{Debug, Display};

/// An ordered pair of overlapping variables, `(x, y)` meaning "revise `x` against `y`".
pub type Arc = (VarId, VarId);

/// Raised when a revision leaves a variable without any candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wipeout {
    /// The variable whose domain ran empty.
    pub var: VarId,
}

/// Storage for arcs waiting to be revised.
pub trait Worklist: Debug + Default {
    /// Adds an arc.
    fn push(&mut self, arc: Arc);

    /// Takes the next arc to revise.
    fn pop(&mut self) -> Option<Arc>;

    /// Drops every waiting arc.
    fn clear(&mut self);
}

/// First in, first out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArcQueue(VecDeque<Arc>);

impl Worklist for ArcQueue {
    fn push(&mut self, arc: Arc) {
        self.0.push_back(arc);
    }

    fn pop(&mut self) -> Option<Arc> {
        self.0.pop_front()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Last in, first out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArcStack(Vec<Arc>);

impl Worklist for ArcStack {
    fn push(&mut self, arc: Arc) {
        self.0.push(arc);
    }

    fn pop(&mut self) -> Option<Arc> {
        self.0.pop()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Runtime choice between the worklist implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorklistImpls {
    /// See [`ArcQueue`].
    Queue(ArcQueue),
    /// See [`ArcStack`].
    Stack(ArcStack),
}

impl Default for WorklistImpls {
    fn default() -> Self {
        Self::Queue(ArcQueue::default())
    }
}

impl Worklist for WorklistImpls {
    fn push(&mut self, arc: Arc) {
        match self {
            Self::Queue(q) => q.push(arc),
            Self::Stack(s) => s.push(arc),
        }
    }

    fn pop(&mut self) -> Option<Arc> {
        match self {
            Self::Queue(q) => q.pop(),
            Self::Stack(s) => s.pop(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Queue(q) => q.clear(),
            Self::Stack(s) => s.clear(),
        }
    }
}

/// Worklist discipline selectable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum WorklistType {
    /// Revise arcs in the order they were added.
    #[default]
    Fifo,
    /// Revise the most recently added arc first.
    Lifo,
}

impl Display for WorklistType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fifo => write!(f, "fifo"),
            Self::Lifo => write!(f, "lifo"),
        }
    }
}

impl WorklistType {
    /// Converts the `WorklistType` to a concrete `WorklistImpls`.
    #[must_use]
    pub fn to_impl(self) -> WorklistImpls {
        match self {
            Self::Fifo => WorklistImpls::Queue(ArcQueue::default()),
            Self::Lifo => WorklistImpls::Stack(ArcStack::default()),
        }
    }
}

/// Runs AC-3 over a [`DomainStore`].
///
/// The propagator keeps its worklist between calls to reuse the allocation, and counts the
/// revisions and wipeouts it has seen.
#[derive(Debug, Clone, Default)]
pub struct Propagator<W: Worklist = ArcQueue> {
    worklist: W,
    pending: FxHashSet<Arc>,
    revisions: usize,
    wipeouts: usize,
}

impl<W: Worklist> Propagator<W> {
    /// Creates a propagator around the given worklist.
    #[must_use]
    pub fn new(worklist: W) -> Self {
        Self {
            worklist,
            pending: FxHashSet::default(),
            revisions: 0,
            wipeouts: 0,
        }
    }

    /// Number of `revise` calls so far.
    #[must_use]
    pub const fn revisions(&self) -> usize {
        self.revisions
    }

    /// Number of domain wipeouts so far.
    #[must_use]
    pub const fn wipeouts(&self) -> usize {
        self.wipeouts
    }

    /// Makes `x` arc consistent with `y`.
    ///
    /// Removes from the domain of `x` every word that has no partner in the domain of `y`
    /// agreeing on their shared letter. Returns whether anything was removed; a pair without
    /// an overlap is left alone and reports no change.
    pub fn revise(
        &mut self,
        puzzle: &Crossword,
        domains: &mut DomainStore,
        x: VarId,
        y: VarId,
    ) -> bool {
        self.revisions += 1;

        let Some(overlap) = puzzle.overlap(x, y) else {
            return false;
        };

        let mut supported = [false; 256];
        for w in domains.iter(y) {
            supported[usize::from(puzzle.letter(w, overlap.y_index))] = true;
        }

        let unsupported = domains
            .iter(x)
            .filter(|&w| !supported[usize::from(puzzle.letter(w, overlap.x_index))])
            .collect::<Vec<_>>();

        for &w in &unsupported {
            domains.remove(x, w);
        }

        if !unsupported.is_empty() {
            log::trace!(
                "revise({x}, {y}) removed {} candidates, {} left",
                unsupported.len(),
                domains.len(x)
            );
        }
        !unsupported.is_empty()
    }

    /// Enforces arc consistency.
    ///
    /// Starts from `arcs`, or from every ordered pair of overlapping variables when `arcs` is
    /// `None`. Whenever a revision shrinks the domain of `x`, every arc `(z, x)` with `z` a
    /// neighbour of `x` other than `y` is queued again. Arcs already waiting are not queued
    /// twice.
    ///
    /// # Errors
    ///
    /// Returns a [`Wipeout`] as soon as a domain becomes empty. The worklist is emptied, but
    /// removals made up to that point stay in the store; callers wanting to undo them should
    /// take a checkpoint first.
    pub fn enforce(
        &mut self,
        puzzle: &Crossword,
        domains: &mut DomainStore,
        arcs: Option<&[Arc]>,
    ) -> Result<(), Wipeout> {
        self.worklist.clear();
        self.pending.clear();

        match arcs {
            Some(arcs) => arcs.iter().for_each(|&arc| self.enqueue(arc)),
            None => puzzle.arcs().into_iter().for_each(|arc| self.enqueue(arc)),
        }

        while let Some((x, y)) = self.worklist.pop() {
            self.pending.remove(&(x, y));

            if !self.revise(puzzle, domains, x, y) {
                continue;
            }

            if domains.is_empty(x) {
                log::debug!("domain of {} wiped out", puzzle.variable(x));
                self.wipeouts += 1;
                self.worklist.clear();
                self.pending.clear();
                return Err(Wipeout { var: x });
            }

            for &z in puzzle.neighbors(x) {
                if z != y {
                    self.enqueue((z, x));
                }
            }
        }

        Ok(())
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.pending.insert(arc) {
            self.worklist.push(arc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn grid(rows: &[&str]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|r| r.chars().map(|c| c == '_').collect())
            .collect()
    }

    fn prepared(rows: &[&str], words: &[&str]) -> (Crossword, DomainStore) {
        let puzzle = Crossword::new(grid(rows), words.iter().copied());
        let mut domains = DomainStore::new(&puzzle);
        domains.enforce_node_consistency(&puzzle);
        (puzzle, domains)
    }

    fn words_of(puzzle: &Crossword, domains: &DomainStore, var: VarId) -> Vec<String> {
        domains
            .iter(var)
            .map(|w| puzzle.word(w).to_string())
            .collect()
    }

    fn assert_arc_consistent(puzzle: &Crossword, domains: &DomainStore) {
        for (x, y) in puzzle.arcs() {
            let overlap = puzzle.overlap(x, y).unwrap();
            for wx in domains.iter(x) {
                assert!(
                    domains.iter(y).any(|wy| puzzle.letter(wx, overlap.x_index)
                        == puzzle.letter(wy, overlap.y_index)),
                    "{} has no support in {y}",
                    puzzle.word(wx)
                );
            }
        }
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let (puzzle, mut domains) = prepared(&["#_#", "___", "#_#"], &["CAT", "HAT", "TOP"]);
        domains.restrict_to(1, puzzle.word_id("CAT").unwrap());

        let mut p = Propagator::<ArcQueue>::default();
        assert!(p.revise(&puzzle, &mut domains, 0, 1));
        assert_eq!(words_of(&puzzle, &domains, 0), vec!["CAT", "HAT"]);
        assert!(!p.revise(&puzzle, &mut domains, 0, 1));
        assert_eq!(p.revisions(), 2);
    }

    #[test]
    fn test_revise_without_overlap_is_a_no_op() {
        let (puzzle, mut domains) = prepared(&["___", "###", "___"], &["CAT", "DOG"]);
        let before = domains.clone();

        let mut p = Propagator::<ArcQueue>::default();
        assert!(!p.revise(&puzzle, &mut domains, 0, 1));
        assert_eq!(domains, before);
    }

    #[test]
    fn test_enforce_reaches_arc_consistency() {
        let (puzzle, mut domains) = prepared(
            &["#___#", "#_##_", "#_##_", "#_##_", "#____"],
            &[
                "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
            ],
        );

        let mut p = Propagator::<ArcQueue>::default();
        assert_eq!(p.enforce(&puzzle, &mut domains, None), Ok(()));
        assert_arc_consistent(&puzzle, &domains);

        assert_eq!(words_of(&puzzle, &domains, 1), vec!["SEVEN"]);
        assert_eq!(words_of(&puzzle, &domains, 3), vec!["NINE"]);
        assert_eq!(words_of(&puzzle, &domains, 0), vec!["SIX"]);
        assert_eq!(words_of(&puzzle, &domains, 2), vec!["FIVE", "NINE"]);
    }

    #[test]
    fn test_enforce_reports_wipeout() {
        let (puzzle, mut domains) = prepared(&["#_#", "___", "#_#"], &["CAT", "DOG"]);
        domains.restrict_to(0, puzzle.word_id("CAT").unwrap());
        domains.restrict_to(1, puzzle.word_id("DOG").unwrap());

        let mut p = Propagator::<ArcQueue>::default();
        let result = p.enforce(&puzzle, &mut domains, None);
        assert_eq!(result, Err(Wipeout { var: 0 }));
        assert_eq!(p.wipeouts(), 1);
    }

    #[test]
    fn test_enforce_with_explicit_arcs_only_touches_them() {
        let (puzzle, mut domains) = prepared(&["#_#", "___", "#_#"], &["CAT", "HAT", "TOP"]);
        domains.restrict_to(1, puzzle.word_id("TOP").unwrap());

        let mut p = Propagator::<ArcQueue>::default();
        assert_eq!(p.enforce(&puzzle, &mut domains, Some(&[][..])), Ok(()));
        assert_eq!(domains.len(0), 3);

        assert_eq!(p.enforce(&puzzle, &mut domains, Some(&[(0, 1)][..])), Ok(()));
        assert_eq!(words_of(&puzzle, &domains, 0), vec!["TOP"]);
    }

    #[test]
    fn test_fifo_and_lifo_reach_the_same_fixpoint() {
        let rows = ["_____", "_#_#_", "_____", "_#_#_", "_____"];
        let words = [
            "ABACA", "ABBOT", "ACTOR", "ADOPT", "AGENT", "ALOFT", "BATON", "CABIN", "CAROL",
            "DELTA", "EAGLE", "ELBOW", "OCEAN", "OTTER", "RAVEN", "TENOR", "TIGER", "TOAST",
            "ULTRA", "ZEBRA",
        ];
        let (puzzle, start) = prepared(&rows, &words);

        let mut fifo_domains = start.clone();
        let mut fifo = Propagator::new(WorklistType::Fifo.to_impl());
        let fifo_result = fifo.enforce(&puzzle, &mut fifo_domains, None);

        let mut lifo_domains = start;
        let mut lifo = Propagator::new(WorklistType::Lifo.to_impl());
        let lifo_result = lifo.enforce(&puzzle, &mut lifo_domains, None);

        assert_eq!(fifo_result.is_ok(), lifo_result.is_ok());
        if fifo_result.is_ok() {
            for var in 0..puzzle.num_vars() {
                assert_eq!(
                    fifo_domains.iter(var).collect_vec(),
                    lifo_domains.iter(var).collect_vec()
                );
            }
        }
    }

    #[test]
    fn test_worklist_disciplines() {
        let mut queue = ArcQueue::default();
        let mut stack = ArcStack::default();
        for arc in [(0, 1), (1, 2), (2, 3)] {
            queue.push(arc);
            stack.push(arc);
        }

        assert_eq!(queue.pop(), Some((0, 1)));
        assert_eq!(stack.pop(), Some((2, 3)));
        queue.clear();
        assert_eq!(queue.pop(), None);
    }
}
