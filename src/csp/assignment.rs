use crate::crossword::{Crossword, VarId, Variable, WordId};
use core::ops::Index;

/// A mapping from variables to chosen words, built up one variable at a time.
///
/// Each variable holds at most one word. The assignment is complete once every variable of
/// the puzzle it was created for has a word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    assigned: usize,
}

impl Index<VarId> for Assignment {
    type Output = Option<WordId>;

    fn index(&self, index: VarId) -> &Self::Output {
        &self.words[index]
    }
}

impl Assignment {
    /// Creates an empty assignment over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            words: vec![None; num_vars],
            assigned: 0,
        }
    }

    /// Assigns `word` to `var`, replacing any previous word.
    pub fn assign(&mut self, var: VarId, word: WordId) {
        if self.words[var].replace(word).is_none() {
            self.assigned += 1;
        }
    }

    /// Removes the word assigned to `var`, returning it.
    pub fn unassign(&mut self, var: VarId) -> Option<WordId> {
        let previous = self.words[var].take();
        if previous.is_some() {
            self.assigned -= 1;
        }
        previous
    }

    /// The word assigned to `var`, if any.
    #[must_use]
    pub fn get(&self, var: VarId) -> Option<WordId> {
        self.words.get(var).copied().flatten()
    }

    /// Whether `var` has a word.
    #[must_use]
    pub fn is_assigned(&self, var: VarId) -> bool {
        self.get(var).is_some()
    }

    /// Number of assigned variables.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.assigned
    }

    /// Whether no variable is assigned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// Whether every variable has a word.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.assigned == self.words.len()
    }

    /// Iterates `(variable, word)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, WordId)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(var, word)| word.map(|w| (var, w)))
    }

    /// Iterates the assigned variables together with their words as text.
    pub fn entries<'a>(
        &'a self,
        puzzle: &'a Crossword,
    ) -> impl Iterator<Item = (&'a Variable, &'a str)> + 'a {
        self.iter()
            .map(|(var, word)| (puzzle.variable(var), puzzle.word(word)))
    }

    /// Checks the whole assignment against the puzzle's constraints.
    ///
    /// An assignment is consistent when no word is used twice, every word has its variable's
    /// length and every pair of assigned, overlapping variables agrees on the shared letter.
    #[must_use]
    pub fn is_consistent(&self, puzzle: &Crossword) -> bool {
        // Lengths first: overlap letters are only defined for words that fit.
        if !self.iter().all(|(var, word)| fits(puzzle, var, word)) {
            return false;
        }

        let mut seen = vec![false; puzzle.num_words()];
        for (var, word) in self.iter() {
            if std::mem::replace(&mut seen[word], true) {
                return false;
            }
            if !agrees_with_neighbors(self, puzzle, var, word) {
                return false;
            }
        }
        true
    }

    /// Checks whether assigning `word` to `var` keeps an already consistent assignment
    /// consistent.
    ///
    /// Given that `self` without `var` is consistent, this gives the same answer as
    /// [`Assignment::is_consistent`] on the extended assignment.
    #[must_use]
    pub fn is_consistent_with(&self, puzzle: &Crossword, var: VarId, word: WordId) -> bool {
        fits(puzzle, var, word)
            && !self.iter().any(|(other, w)| other != var && w == word)
            && agrees_with_neighbors(self, puzzle, var, word)
    }
}

fn fits(puzzle: &Crossword, var: VarId, word: WordId) -> bool {
    puzzle.word(word).len() == puzzle.variable(var).length
}

fn agrees_with_neighbors(
    assignment: &Assignment,
    puzzle: &Crossword,
    var: VarId,
    word: WordId,
) -> bool {
    puzzle.neighbors(var).iter().all(|&other| {
        let Some(other_word) = assignment.get(other) else {
            return true;
        };
        puzzle.overlap(var, other).is_none_or(|overlap| {
            puzzle.letter(word, overlap.x_index) == puzzle.letter(other_word, overlap.y_index)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus(words: &[&str]) -> Crossword {
        let structure = vec![
            vec![false, true, false],
            vec![true, true, true],
            vec![false, true, false],
        ];
        Crossword::new(structure, words.iter().copied())
    }

    #[test]
    fn test_assign_and_unassign_track_length() {
        let mut a = Assignment::new(3);
        assert!(a.is_empty());

        a.assign(0, 4);
        a.assign(2, 1);
        a.assign(2, 3);
        assert_eq!(a.len(), 2);
        assert_eq!(a[2], Some(3));
        assert!(!a.is_complete());

        assert_eq!(a.unassign(2), Some(3));
        assert_eq!(a.unassign(2), None);
        assert_eq!(a.len(), 1);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 4)]);
    }

    #[test]
    fn test_complete_when_every_variable_assigned() {
        let mut a = Assignment::new(2);
        a.assign(0, 0);
        a.assign(1, 1);
        assert!(a.is_complete());
        assert!(Assignment::new(0).is_complete());
    }

    #[test]
    fn test_consistency_requires_matching_overlap() {
        let puzzle = plus(&["CAT", "HAT", "TOP"]);
        let cat = puzzle.word_id("CAT").unwrap();
        let hat = puzzle.word_id("HAT").unwrap();
        let top = puzzle.word_id("TOP").unwrap();

        let mut a = Assignment::new(2);
        a.assign(0, cat);
        assert!(a.is_consistent_with(&puzzle, 1, hat));
        assert!(!a.is_consistent_with(&puzzle, 1, top));

        a.assign(1, top);
        assert!(!a.is_consistent(&puzzle));
        a.assign(1, hat);
        assert!(a.is_consistent(&puzzle));
    }

    #[test]
    fn test_consistency_rejects_duplicates_and_wrong_lengths() {
        let puzzle = plus(&["CAT", "CATS"]);
        let cat = puzzle.word_id("CAT").unwrap();
        let cats = puzzle.word_id("CATS").unwrap();

        let mut a = Assignment::new(2);
        a.assign(0, cat);
        assert!(!a.is_consistent_with(&puzzle, 1, cat));
        assert!(!a.is_consistent_with(&puzzle, 1, cats));

        a.assign(1, cat);
        assert!(!a.is_consistent(&puzzle));
    }

    #[test]
    fn test_short_neighbor_word_is_inconsistent() {
        // A down and an across slot meeting at the bottom-right corner.
        let structure = ["##_", "##_", "___"]
            .iter()
            .map(|r| r.chars().map(|c| c == '_').collect())
            .collect();
        let puzzle = Crossword::new(structure, ["CAT", "OX"]);
        let cat = puzzle.word_id("CAT").unwrap();
        let ox = puzzle.word_id("OX").unwrap();
        assert_eq!(puzzle.overlap(0, 1).map(|o| (o.x_index, o.y_index)), Some((2, 2)));

        let mut a = Assignment::new(2);
        a.assign(0, cat);
        a.assign(1, ox);
        assert!(!a.is_consistent(&puzzle));

        a.assign(0, ox);
        a.assign(1, cat);
        assert!(!a.is_consistent(&puzzle));
    }

    #[test]
    fn test_entries_resolve_words() {
        let puzzle = plus(&["CAT", "HAT"]);
        let mut a = Assignment::new(2);
        a.assign(1, puzzle.word_id("HAT").unwrap());

        let entries = a.entries(&puzzle).collect::<Vec<_>>();
        assert_eq!(entries, vec![(puzzle.variable(1), "HAT")]);
    }
}
