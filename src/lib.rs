#![deny(missing_docs)]
//! This crate fills crossword grids with dictionary words by treating every slot as a variable
//! of a constraint-satisfaction problem and solving it with arc consistency and backtracking.

/// The `crossword` module holds the immutable puzzle definition together with the text parser
/// for structure and word files and the text renderer for filled grids.
pub mod crossword;

/// The `csp` module implements the solver: domain store, AC-3, ordering heuristics and
/// backtracking search.
pub mod csp;
