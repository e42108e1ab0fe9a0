//! The immutable definition of a crossword puzzle.
//!
//! A [`Crossword`] bundles the grid structure, the slots (variables) derived from it, the
//! overlap table between every pair of intersecting slots and the dictionary shared by all
//! slots. It is built once and only ever read by the solver, so a single definition can back
//! any number of solving sessions.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// Index of a variable in [`Crossword::variables`].
pub type VarId = usize;

/// Index of a word in [`Crossword::words`].
pub type WordId = usize;

/// Neighbour list of a single variable.
pub type Neighbors = SmallVec<[VarId; 8]>;

/// The direction in which a slot is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Left to right.
    Across,
    /// Top to bottom.
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Across => write!(f, "across"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A single slot of the grid.
///
/// Two variables are equal iff start cell, direction and length all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    /// Row of the first cell.
    pub i: usize,
    /// Column of the first cell.
    pub j: usize,
    /// Reading direction.
    pub direction: Direction,
    /// Number of letters.
    pub length: usize,
}

impl Variable {
    /// Creates a new slot starting at `(i, j)`.
    #[must_use]
    pub const fn new(i: usize, j: usize, direction: Direction, length: usize) -> Self {
        Self {
            i,
            j,
            direction,
            length,
        }
    }

    /// Returns the grid cell holding the `k`-th letter of this slot.
    #[must_use]
    pub const fn cell(&self, k: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.i, self.j + k),
            Direction::Down => (self.i + k, self.j),
        }
    }

    /// Iterates the cells covered by this slot, in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(|k| self.cell(k))
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {} : {}",
            self.i, self.j, self.direction, self.length
        )
    }
}

/// Letter positions that two intersecting variables must agree on.
///
/// For the ordered pair `(x, y)`, the `x_index`-th letter of the word assigned to `x` must
/// equal the `y_index`-th letter of the word assigned to `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Overlap {
    /// Letter index in the first variable.
    pub x_index: usize,
    /// Letter index in the second variable.
    pub y_index: usize,
}

impl Overlap {
    /// Returns the same constraint seen from the other variable.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self {
            x_index: self.y_index,
            y_index: self.x_index,
        }
    }
}

/// An immutable crossword puzzle definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossword {
    height: usize,
    width: usize,
    structure: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    words: Vec<String>,
    overlaps: FxHashMap<(VarId, VarId), Overlap>,
    neighbors: Vec<Neighbors>,
}

impl Crossword {
    /// Builds a puzzle from an occupancy matrix and a word list.
    ///
    /// Rows shorter than the longest row are padded with blocked cells. Every maximal run of
    /// two or more open cells becomes a variable; variables are numbered in row-major order
    /// of their first cell, across before down when both start in the same cell.
    ///
    /// Words are handled as ASCII, one byte per letter; see [`Crossword::from_variables`].
    pub fn new<I, S>(structure: Vec<Vec<bool>>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let structure = pad(structure);
        let variables = derive_variables(&structure);
        Self::from_variables(structure, variables, words)
    }

    /// Builds a puzzle from an already derived set of variables.
    ///
    /// The overlap table is computed from the variables' geometry. The word list is
    /// deduplicated and stored in lexicographic order, so [`WordId`]s follow that order.
    /// Words containing non-ASCII characters are dropped, since lengths and overlap letters
    /// are measured in bytes.
    pub fn from_variables<I, S>(
        structure: Vec<Vec<bool>>,
        variables: Vec<Variable>,
        words: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let structure = pad(structure);
        let height = structure.len();
        let width = structure.first().map_or(0, Vec::len);

        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| {
                let ascii = w.is_ascii();
                if !ascii {
                    log::warn!("Dropping non-ASCII word {w:?}");
                }
                ascii
            })
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect_vec();

        let overlaps = compute_overlaps(&variables);

        let mut neighbors = vec![Neighbors::new(); variables.len()];
        for &(x, y) in overlaps.keys() {
            neighbors[x].push(y);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        Self {
            height,
            width,
            structure,
            variables,
            words,
            overlaps,
            neighbors,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether the cell `(i, j)` belongs to the crossword.
    #[must_use]
    pub fn is_open(&self, i: usize, j: usize) -> bool {
        self.structure
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }

    /// The occupancy matrix, `height` rows of `width` cells.
    #[must_use]
    pub fn structure(&self) -> &[Vec<bool>] {
        &self.structure
    }

    /// All variables, indexed by [`VarId`].
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The variable with the given id.
    #[must_use]
    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var]
    }

    /// Number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The deduplicated, sorted dictionary, indexed by [`WordId`].
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The word with the given id.
    #[must_use]
    pub fn word(&self, word: WordId) -> &str {
        &self.words[word]
    }

    /// Number of dictionary words.
    #[must_use]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Id of `word` in the dictionary, if present.
    #[must_use]
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .ok()
    }

    /// Byte at position `index` of the given word.
    ///
    /// Words are expected to be ASCII, which the parser guarantees.
    #[must_use]
    pub fn letter(&self, word: WordId, index: usize) -> u8 {
        self.words[word].as_bytes()[index]
    }

    /// The overlap between `x` and `y`, or `None` if they share no cell.
    #[must_use]
    pub fn overlap(&self, x: VarId, y: VarId) -> Option<Overlap> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// The variables sharing a cell with `var`, in ascending order.
    #[must_use]
    pub fn neighbors(&self, var: VarId) -> &[VarId] {
        &self.neighbors[var]
    }

    /// Number of neighbours of `var`.
    #[must_use]
    pub fn degree(&self, var: VarId) -> usize {
        self.neighbors[var].len()
    }

    /// Every ordered pair of overlapping variables, grouped by first variable.
    #[must_use]
    pub fn arcs(&self) -> Vec<(VarId, VarId)> {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(x, ys)| ys.iter().map(move |&y| (x, y)))
            .collect()
    }
}

fn pad(mut structure: Vec<Vec<bool>>) -> Vec<Vec<bool>> {
    let width = structure.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut structure {
        row.resize(width, false);
    }
    structure
}

fn derive_variables(structure: &[Vec<bool>]) -> Vec<Variable> {
    let open = |i: usize, j: usize| {
        structure
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    };

    let mut variables = Vec::new();
    for (i, row) in structure.iter().enumerate() {
        for j in 0..row.len() {
            if !open(i, j) {
                continue;
            }

            if j == 0 || !open(i, j - 1) {
                let length = (j..row.len()).take_while(|&k| open(i, k)).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Across, length));
                }
            }

            if i == 0 || !open(i - 1, j) {
                let length = (i..structure.len()).take_while(|&k| open(k, j)).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Down, length));
                }
            }
        }
    }
    variables
}

fn compute_overlaps(variables: &[Variable]) -> FxHashMap<(VarId, VarId), Overlap> {
    let mut cells: FxHashMap<(usize, usize), SmallVec<[(VarId, usize); 2]>> =
        FxHashMap::default();
    for (var, variable) in variables.iter().enumerate() {
        for (k, cell) in variable.cells().enumerate() {
            cells.entry(cell).or_default().push((var, k));
        }
    }

    let mut overlaps = FxHashMap::default();
    for occupants in cells.values() {
        for (&(x, ix), &(y, iy)) in occupants.iter().tuple_combinations() {
            if x == y {
                continue;
            }
            let overlap = Overlap {
                x_index: ix,
                y_index: iy,
            };
            // Only the first shared cell is kept, matching a single constraint per pair.
            overlaps.entry((x, y)).or_insert(overlap);
            overlaps.entry((y, x)).or_insert(overlap.flipped());
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|r| r.chars().map(|c| c == '_').collect())
            .collect()
    }

    #[test]
    fn test_single_across_slot() {
        let puzzle = Crossword::new(grid(&["___"]), ["CAT", "DOG"]);

        assert_eq!(puzzle.height(), 1);
        assert_eq!(puzzle.width(), 3);
        assert_eq!(
            puzzle.variables(),
            &[Variable::new(0, 0, Direction::Across, 3)]
        );
        assert!(puzzle.arcs().is_empty());
    }

    #[test]
    fn test_plus_shape_overlaps_in_the_middle() {
        let puzzle = Crossword::new(grid(&["#_#", "___", "#_#"]), ["CAT"]);

        assert_eq!(
            puzzle.variables(),
            &[
                Variable::new(0, 1, Direction::Down, 3),
                Variable::new(1, 0, Direction::Across, 3),
            ]
        );
        assert_eq!(
            puzzle.overlap(0, 1),
            Some(Overlap {
                x_index: 1,
                y_index: 1
            })
        );
        assert_eq!(puzzle.neighbors(0), &[1]);
        assert_eq!(puzzle.neighbors(1), &[0]);
        assert_eq!(puzzle.arcs(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_overlap_is_flipped_for_reverse_pair() {
        let puzzle = Crossword::new(grid(&["#___#", "#_##_", "#_##_", "#_##_", "#____"]), ["A"]);

        assert_eq!(
            puzzle.variables(),
            &[
                Variable::new(0, 1, Direction::Across, 3),
                Variable::new(0, 1, Direction::Down, 5),
                Variable::new(1, 4, Direction::Down, 4),
                Variable::new(4, 1, Direction::Across, 4),
            ]
        );

        let forward = puzzle.overlap(1, 3).unwrap();
        let backward = puzzle.overlap(3, 1).unwrap();
        assert_eq!(forward, Overlap { x_index: 4, y_index: 0 });
        assert_eq!(backward, forward.flipped());
        assert_eq!(puzzle.overlap(2, 3), Some(Overlap { x_index: 3, y_index: 3 }));
        assert_eq!(puzzle.overlap(0, 2), None);
        assert_eq!(puzzle.degree(1), 2);
    }

    #[test]
    fn test_words_are_sorted_and_deduplicated() {
        let puzzle = Crossword::new(grid(&["___"]), ["DOG", "CAT", "DOG", "ANT"]);

        assert_eq!(puzzle.words(), &["ANT", "CAT", "DOG"]);
        assert_eq!(puzzle.word_id("CAT"), Some(1));
        assert_eq!(puzzle.word_id("COW"), None);
        assert_eq!(puzzle.letter(2, 1), b'O');
    }

    #[test]
    fn test_non_ascii_words_are_dropped() {
        let puzzle = Crossword::new(grid(&["___"]), ["CAT", "CAFÉ", "ÉTÉ"]);

        assert_eq!(puzzle.words(), &["CAT"]);
        assert_eq!(puzzle.word_id("CAFÉ"), None);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let puzzle = Crossword::new(grid(&["___", "_"]), ["AB"]);

        assert_eq!(puzzle.width(), 3);
        assert!(puzzle.is_open(1, 0));
        assert!(!puzzle.is_open(1, 2));
        assert!(!puzzle.is_open(5, 5));
    }

    #[test]
    fn test_single_cells_are_not_slots() {
        let puzzle = Crossword::new(grid(&["_#_", "###", "_#_"]), ["A"]);
        assert_eq!(puzzle.num_vars(), 0);
    }

    #[test]
    fn test_variable_cells() {
        let down = Variable::new(1, 2, Direction::Down, 3);
        assert_eq!(down.cells().collect_vec(), vec![(1, 2), (2, 2), (3, 2)]);

        let across = Variable::new(1, 2, Direction::Across, 2);
        assert_eq!(across.cells().collect_vec(), vec![(1, 2), (1, 3)]);
        assert_eq!(across.to_string(), "(1, 2) across : 2");
    }
}
