use crate::crossword::Crossword;
use crate::csp::Assignment;
use std::fmt::{self, Display};

/// Printed for cells outside the crossword.
pub const BLOCKED: char = '█';

/// Projects an assignment onto the grid.
///
/// Returns `height` rows of `width` cells. Open cells covered by an assigned variable hold
/// that variable's letter; every other cell is `None`.
#[must_use]
pub fn letter_grid(puzzle: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; puzzle.width()]; puzzle.height()];
    for (variable, word) in assignment.entries(puzzle) {
        for ((i, j), letter) in variable.cells().zip(word.chars()) {
            letters[i][j] = Some(letter);
        }
    }
    letters
}

/// A filled grid ready to print.
///
/// Open cells show their letter, or a space if no word covers them yet; blocked cells show
/// [`BLOCKED`]. Every row ends with a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<'a> {
    puzzle: &'a Crossword,
    letters: Vec<Vec<Option<char>>>,
}

impl<'a> Rendered<'a> {
    /// Renders `assignment`, which may be partial.
    #[must_use]
    pub fn new(puzzle: &'a Crossword, assignment: &Assignment) -> Self {
        Self {
            puzzle,
            letters: letter_grid(puzzle, assignment),
        }
    }

    /// The letters as computed by [`letter_grid`].
    #[must_use]
    pub fn letters(&self) -> &[Vec<Option<char>>] {
        &self.letters
    }
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.letters.iter().enumerate() {
            for (j, letter) in row.iter().enumerate() {
                let c = if self.puzzle.is_open(i, j) {
                    letter.unwrap_or(' ')
                } else {
                    BLOCKED
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Crossword, Assignment) {
        let structure = ["#___#", "#_##_", "#_##_", "#_##_", "#____"]
            .iter()
            .map(|r| r.chars().map(|c| c == '_').collect())
            .collect();
        let puzzle = Crossword::new(structure, ["SIX", "SEVEN", "FIVE", "NINE"]);

        let mut assignment = Assignment::new(puzzle.num_vars());
        for (var, word) in ["SIX", "SEVEN", "FIVE", "NINE"].into_iter().enumerate() {
            assignment.assign(var, puzzle.word_id(word).unwrap());
        }
        (puzzle, assignment)
    }

    #[test]
    fn test_full_grid() {
        let (puzzle, assignment) = sample();
        let rendered = Rendered::new(&puzzle, &assignment);

        assert_eq!(
            rendered.to_string(),
            "█SIX█\n█E██F\n█V██I\n█E██V\n█NINE\n"
        );
        assert_eq!(rendered.letters()[4][4], Some('E'));
        assert_eq!(rendered.letters()[0][0], None);
    }

    #[test]
    fn test_partial_assignment_leaves_blanks() {
        let (puzzle, mut assignment) = sample();
        assignment.unassign(1);
        assignment.unassign(2);

        let rendered = Rendered::new(&puzzle, &assignment).to_string();
        assert_eq!(rendered, "█SIX█\n█ ██ \n█ ██ \n█ ██ \n█NINE\n");
    }

    #[test]
    fn test_letter_grid_dimensions() {
        let (puzzle, _) = sample();
        let letters = letter_grid(&puzzle, &Assignment::new(puzzle.num_vars()));

        assert_eq!(letters.len(), 5);
        assert!(letters.iter().all(|row| row.len() == 5));
        assert!(letters.iter().flatten().all(Option::is_none));
    }
}
