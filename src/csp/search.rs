//! Depth-first backtracking over partial assignments.
//!
//! Each level of the recursion picks one unassigned variable, tries its candidates in the
//! order given by the value ordering heuristic and recurses on every candidate that keeps the
//! assignment consistent. With inference on, a tentative assignment also restricts the
//! variable's domain to the chosen word and re-establishes arc consistency around it, so dead
//! ends are found before the search walks into them.
//!
//! Domain pruning done on behalf of a candidate happens inside a [`DomainStore`] checkpoint
//! and is rolled back before the next candidate is tried, whatever the outcome of the branch.
//! When the search returns, the store is exactly as it was handed in.

use crate::crossword::{Crossword, VarId, WordId};
use crate::csp::arc_consistency::{Propagator, WorklistImpls};
use crate::csp::assignment::Assignment;
use crate::csp::domain::DomainStore;
use crate::csp::value_ordering::{ValueOrdering, ValueOrderingImpls};
use crate::csp::variable_selection::{VariableSelection, VariableSelectionImpls};
use std::time::Instant;

/// Counters collected while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Tentative assignments made.
    pub decisions: usize,
    /// Tentative assignments undone after their branch failed.
    pub backtracks: usize,
    /// Calls to `revise`, including those of the initial AC-3 pass.
    pub revisions: usize,
    /// Domains that ran empty during propagation.
    pub wipeouts: usize,
}

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A complete, consistent assignment.
    Found(Assignment),
    /// Every candidate was tried without success.
    Exhausted,
    /// The deadline passed before the search could finish.
    Interrupted,
}

/// A backtracking search over one puzzle.
#[derive(Debug, Clone)]
pub struct Backtracking<'p> {
    puzzle: &'p Crossword,
    selector: VariableSelectionImpls,
    ordering: ValueOrderingImpls,
    propagator: Propagator<WorklistImpls>,
    inference: bool,
    deadline: Option<Instant>,
    decisions: usize,
    backtracks: usize,
}

impl<'p> Backtracking<'p> {
    /// Creates a search with inference on and no deadline.
    ///
    /// The propagator is reused for inference; counts it already holds are carried into
    /// [`Backtracking::stats`].
    #[must_use]
    pub fn new(
        puzzle: &'p Crossword,
        selector: VariableSelectionImpls,
        ordering: ValueOrderingImpls,
        propagator: Propagator<WorklistImpls>,
    ) -> Self {
        Self {
            puzzle,
            selector,
            ordering,
            propagator,
            inference: true,
            deadline: None,
            decisions: 0,
            backtracks: 0,
        }
    }

    /// Turns arc consistency maintenance after each decision on or off.
    #[must_use]
    pub fn with_inference(mut self, inference: bool) -> Self {
        self.inference = inference;
        self
    }

    /// Stops the search once `deadline` has passed.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        SearchStats {
            decisions: self.decisions,
            backtracks: self.backtracks,
            revisions: self.propagator.revisions(),
            wipeouts: self.propagator.wipeouts(),
        }
    }

    /// Searches for a complete assignment extending the empty one.
    ///
    /// `domains` is only modified inside checkpoints and is left unchanged on return.
    pub fn run(&mut self, domains: &mut DomainStore) -> SearchOutcome {
        let mut assignment = Assignment::new(self.puzzle.num_vars());
        let outcome = self.backtrack(domains, &mut assignment);
        debug_assert!(assignment.is_empty());
        outcome
    }

    fn backtrack(
        &mut self,
        domains: &mut DomainStore,
        assignment: &mut Assignment,
    ) -> SearchOutcome {
        if assignment.is_complete() {
            return SearchOutcome::Found(assignment.clone());
        }

        let Some(var) = self.selector.pick(self.puzzle, domains, assignment) else {
            return SearchOutcome::Exhausted;
        };

        for word in self.ordering.order(self.puzzle, domains, assignment, var) {
            if self.expired() {
                return SearchOutcome::Interrupted;
            }

            if !assignment.is_consistent_with(self.puzzle, var, word) {
                continue;
            }

            self.decisions += 1;
            assignment.assign(var, word);
            log::trace!(
                "depth {}: {} = {}",
                assignment.len(),
                self.puzzle.variable(var),
                self.puzzle.word(word)
            );

            let level = domains.checkpoint();
            let outcome = if self.infer(domains, var, word) {
                self.backtrack(domains, assignment)
            } else {
                SearchOutcome::Exhausted
            };
            domains.restore(level);
            assignment.unassign(var);

            match outcome {
                SearchOutcome::Exhausted => self.backtracks += 1,
                done => return done,
            }
        }

        SearchOutcome::Exhausted
    }

    /// Restricts `var` to `word` and makes every neighbour arc consistent with it again.
    /// Returns `false` on a wipeout.
    fn infer(&mut self, domains: &mut DomainStore, var: VarId, word: WordId) -> bool {
        if !self.inference {
            return true;
        }

        domains.restrict_to(var, word);
        let arcs = self
            .puzzle
            .neighbors(var)
            .iter()
            .map(|&z| (z, var))
            .collect::<Vec<_>>();
        self.propagator
            .enforce(self.puzzle, domains, Some(arcs.as_slice()))
            .is_ok()
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
