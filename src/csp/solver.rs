use crate::crossword::Crossword;
use crate::csp::arc_consistency::{Propagator, WorklistType};
use crate::csp::assignment::Assignment;
use crate::csp::domain::DomainStore;
use crate::csp::search::{Backtracking, SearchOutcome, SearchStats};
use crate::csp::value_ordering::ValueOrderingType;
use crate::csp::variable_selection::VariableSelectionType;
use std::time::{Duration, Instant};

/// Knobs of a solving session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// How the next variable is chosen.
    pub variable_selection: VariableSelectionType,
    /// How the candidates of that variable are ordered.
    pub value_ordering: ValueOrderingType,
    /// Worklist discipline of the arc consistency engine.
    pub worklist: WorklistType,
    /// Whether arc consistency is maintained after every decision.
    pub inference: bool,
    /// Give up on the search after this long.
    pub time_limit: Option<Duration>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            variable_selection: VariableSelectionType::default(),
            value_ordering: ValueOrderingType::default(),
            worklist: WorklistType::default(),
            inference: true,
            time_limit: None,
        }
    }
}

/// Result of [`CrosswordCreator::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every slot has a word and all constraints hold.
    Solved(Assignment),
    /// No fill exists.
    Unsatisfiable,
    /// The time limit ran out first.
    TimedOut {
        /// Time spent before giving up.
        elapsed: Duration,
    },
}

impl SolveStatus {
    /// The solution, if one was found.
    #[must_use]
    pub const fn solution(&self) -> Option<&Assignment> {
        match self {
            Self::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }

    /// Consumes the status, returning the solution if one was found.
    #[must_use]
    pub fn into_solution(self) -> Option<Assignment> {
        match self {
            Self::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }

    /// Whether a solution was found.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

/// A solving session over one puzzle.
///
/// The puzzle is only borrowed; domains, statistics and every other piece of mutable state
/// live in the session, so several sessions can share one [`Crossword`].
///
/// # Examples
///
/// ```
/// use crossword_csp::crossword::Crossword;
/// use crossword_csp::csp::CrosswordCreator;
///
/// let structure = vec![
///     vec![false, true, false],
///     vec![true, true, true],
///     vec![false, true, false],
/// ];
/// let puzzle = Crossword::new(structure, ["CAT", "HAT", "TOP"]);
///
/// let mut creator = CrosswordCreator::new(&puzzle);
/// let solution = creator.solve().into_solution().unwrap();
/// let words: Vec<_> = solution.entries(&puzzle).map(|(_, w)| w).collect();
/// assert_eq!(words, ["CAT", "HAT"]);
/// ```
#[derive(Debug, Clone)]
pub struct CrosswordCreator<'p> {
    puzzle: &'p Crossword,
    options: SolverOptions,
    domains: DomainStore,
    stats: SearchStats,
}

impl<'p> CrosswordCreator<'p> {
    /// Creates a session with default options.
    #[must_use]
    pub fn new(puzzle: &'p Crossword) -> Self {
        Self::with_options(puzzle, SolverOptions::default())
    }

    /// Creates a session with the given options. Every domain starts as the full dictionary.
    #[must_use]
    pub fn with_options(puzzle: &'p Crossword, options: SolverOptions) -> Self {
        Self {
            puzzle,
            options,
            domains: DomainStore::new(puzzle),
            stats: SearchStats::default(),
        }
    }

    /// The puzzle being solved.
    #[must_use]
    pub const fn puzzle(&self) -> &'p Crossword {
        self.puzzle
    }

    /// The options of this session.
    #[must_use]
    pub const fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Counters of the last [`CrosswordCreator::solve`] call.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The domains as left by the last [`CrosswordCreator::solve`] call: node and arc
    /// consistent, with all search-time pruning undone.
    #[must_use]
    pub const fn domains(&self) -> &DomainStore {
        &self.domains
    }

    /// Enforces node consistency, then arc consistency, then searches for a fill.
    ///
    /// An empty domain after either consistency pass is reported as
    /// [`SolveStatus::Unsatisfiable`] without searching.
    pub fn solve(&mut self) -> SolveStatus {
        let start = Instant::now();
        let deadline = self
            .options
            .time_limit
            .and_then(|limit| start.checked_add(limit));
        self.stats = SearchStats::default();

        log::info!(
            "Solving {}x{} grid: {} slots, {} words",
            self.puzzle.height(),
            self.puzzle.width(),
            self.puzzle.num_vars(),
            self.puzzle.num_words()
        );

        let removed = self.domains.enforce_node_consistency(self.puzzle);
        log::debug!("Node consistency removed {removed} candidates");

        if let Some(var) = (0..self.puzzle.num_vars()).find(|&v| self.domains.is_empty(v)) {
            log::info!("No word fits slot {}", self.puzzle.variable(var));
            return SolveStatus::Unsatisfiable;
        }

        let mut propagator = Propagator::new(self.options.worklist.to_impl());
        if let Err(wipeout) = propagator.enforce(self.puzzle, &mut self.domains, None) {
            self.stats.revisions = propagator.revisions();
            self.stats.wipeouts = propagator.wipeouts();
            log::info!(
                "Arc consistency emptied slot {}",
                self.puzzle.variable(wipeout.var)
            );
            return SolveStatus::Unsatisfiable;
        }
        self.domains.compact();

        for (var, variable) in self.puzzle.variables().iter().enumerate() {
            log::debug!("{variable}: {} candidates", self.domains.len(var));
        }

        let mut search = Backtracking::new(
            self.puzzle,
            self.options.variable_selection.to_impl(),
            self.options.value_ordering.to_impl(),
            propagator,
        )
        .with_inference(self.options.inference)
        .with_deadline(deadline);

        let outcome = search.run(&mut self.domains);
        self.stats = search.stats();

        let status = match outcome {
            SearchOutcome::Found(assignment) => SolveStatus::Solved(assignment),
            SearchOutcome::Exhausted => SolveStatus::Unsatisfiable,
            SearchOutcome::Interrupted => SolveStatus::TimedOut {
                elapsed: start.elapsed(),
            },
        };

        log::info!(
            "Search finished after {} decisions and {} backtracks: {}",
            self.stats.decisions,
            self.stats.backtracks,
            match &status {
                SolveStatus::Solved(_) => "solved",
                SolveStatus::Unsatisfiable => "no solution",
                SolveStatus::TimedOut { .. } => "timed out",
            }
        );
        status
    }
}
