#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Constraint-satisfaction solver for crossword puzzles.

/// Partial and complete mappings from variables to words.
pub mod assignment;

/// Per-variable candidate sets with checkpoint/restore.
pub mod domain;

/// The AC-3 consistency engine.
pub mod arc_consistency;

/// Heuristics choosing the next variable to assign.
pub mod variable_selection;

/// Heuristics ordering the candidates of the chosen variable.
pub mod value_ordering;

/// Depth-first backtracking search.
pub mod search;

/// The solving session tying all components together.
pub mod solver;

pub use assignment::Assignment;
pub use solver::{CrosswordCreator, SolveStatus, SolverOptions};
