#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle definition, input parsing and output rendering for crossword grids.

/// Variables, directions and the overlap table derived from a grid structure.
pub mod puzzle;

/// Parsers for the structure and word list text formats.
pub mod parse;

/// Projection of an assignment back onto the grid.
pub mod render;

pub use puzzle::{Crossword, Direction, Overlap, VarId, Variable, WordId};
