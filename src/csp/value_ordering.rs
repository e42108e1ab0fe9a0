use crate::crossword::{Crossword, VarId, WordId};
use crate::csp::assignment::Assignment;
use crate::csp::domain::DomainStore;
use clap::ValueEnum;
use itertools::Itertools;
use std::fmt::{Debug, Display};

/// Decides in which order the candidates of a variable are tried.
pub trait ValueOrdering: Debug {
    /// Returns the remaining candidates of `var`, best first.
    fn order(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
        var: VarId,
    ) -> Vec<WordId>;
}

/// Least constraining value.
///
/// A candidate is ranked by how many unassigned neighbours still hold the very same word, since
/// choosing it would take that option away from them. Fewer first; ties keep dictionary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeastConstrainingValue;

impl LeastConstrainingValue {
    /// Number of unassigned neighbours of `var` whose domain contains `word`.
    #[must_use]
    pub fn ruled_out(
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
        var: VarId,
        word: WordId,
    ) -> usize {
        puzzle
            .neighbors(var)
            .iter()
            .filter(|&&n| !assignment.is_assigned(n) && domains.contains(n, word))
            .count()
    }
}

impl ValueOrdering for LeastConstrainingValue {
    fn order(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
        var: VarId,
    ) -> Vec<WordId> {
        domains
            .iter(var)
            .sorted_by_cached_key(|&w| Self::ruled_out(puzzle, domains, assignment, var, w))
            .collect()
    }
}

/// Candidates in dictionary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DictionaryOrder;

impl ValueOrdering for DictionaryOrder {
    fn order(
        &self,
        _: &Crossword,
        domains: &DomainStore,
        _: &Assignment,
        var: VarId,
    ) -> Vec<WordId> {
        domains.iter(var).collect()
    }
}

/// Runtime choice between the value ordering heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrderingImpls {
    /// See [`LeastConstrainingValue`].
    LeastConstraining(LeastConstrainingValue),
    /// See [`DictionaryOrder`].
    Dictionary(DictionaryOrder),
}

impl ValueOrdering for ValueOrderingImpls {
    fn order(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
        var: VarId,
    ) -> Vec<WordId> {
        match self {
            Self::LeastConstraining(o) => o.order(puzzle, domains, assignment, var),
            Self::Dictionary(o) => o.order(puzzle, domains, assignment, var),
        }
    }
}

/// Value ordering heuristic selectable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum ValueOrderingType {
    /// Candidates that take the fewest options from neighbours first.
    #[default]
    LeastConstraining,
    /// Candidates in dictionary order.
    Dictionary,
}

impl Display for ValueOrderingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeastConstraining => write!(f, "least-constraining"),
            Self::Dictionary => write!(f, "dictionary"),
        }
    }
}

impl ValueOrderingType {
    /// Converts the `ValueOrderingType` to a concrete `ValueOrderingImpls`.
    #[must_use]
    pub const fn to_impl(self) -> ValueOrderingImpls {
        match self {
            Self::LeastConstraining => {
                ValueOrderingImpls::LeastConstraining(LeastConstrainingValue)
            }
            Self::Dictionary => ValueOrderingImpls::Dictionary(DictionaryOrder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three down slots of length 3 crossed by one across slot of length 3 on row 1:
    // variables are 0 = down (0, 0), 1 = down (0, 2), 2 = across (1, 0).
    fn puzzle(words: &[&str]) -> Crossword {
        let structure = vec![
            vec![true, false, true],
            vec![true, true, true],
            vec![true, false, true],
        ];
        Crossword::new(structure, words.iter().copied())
    }

    #[test]
    fn test_least_constraining_counts_shared_candidates() {
        let p = puzzle(&["AAA", "BBB", "CCC"]);
        let mut d = DomainStore::new(&p);
        d.enforce_node_consistency(&p);
        let a = Assignment::new(p.num_vars());
        let words = |order: Vec<WordId>| order.iter().map(|&w| p.word(w)).collect_vec();

        let aaa = p.word_id("AAA").unwrap();
        let bbb = p.word_id("BBB").unwrap();
        let ccc = p.word_id("CCC").unwrap();

        // Every candidate is shared with both neighbours: dictionary order.
        assert_eq!(
            words(LeastConstrainingValue.order(&p, &d, &a, 2)),
            vec!["AAA", "BBB", "CCC"]
        );

        d.remove(0, ccc);
        d.remove(1, ccc);
        d.remove(1, aaa);
        assert_eq!(LeastConstrainingValue::ruled_out(&p, &d, &a, 2, aaa), 1);
        assert_eq!(LeastConstrainingValue::ruled_out(&p, &d, &a, 2, bbb), 2);
        assert_eq!(LeastConstrainingValue::ruled_out(&p, &d, &a, 2, ccc), 0);
        assert_eq!(
            words(LeastConstrainingValue.order(&p, &d, &a, 2)),
            vec!["CCC", "AAA", "BBB"]
        );

        d.remove(0, bbb);
        d.remove(1, bbb);
        assert_eq!(
            words(LeastConstrainingValue.order(&p, &d, &a, 2)),
            vec!["BBB", "CCC", "AAA"]
        );
    }

    #[test]
    fn test_assigned_neighbours_are_ignored() {
        let p = puzzle(&["AAA", "BBB"]);
        let d = DomainStore::new(&p);
        let mut a = Assignment::new(p.num_vars());
        let aaa = p.word_id("AAA").unwrap();

        assert_eq!(LeastConstrainingValue::ruled_out(&p, &d, &a, 2, aaa), 2);
        a.assign(0, p.word_id("BBB").unwrap());
        assert_eq!(LeastConstrainingValue::ruled_out(&p, &d, &a, 2, aaa), 1);
    }

    #[test]
    fn test_dictionary_order() {
        let p = puzzle(&["CCC", "AAA", "BBB"]);
        let d = DomainStore::new(&p);
        let a = Assignment::new(p.num_vars());

        let order = ValueOrderingType::Dictionary.to_impl().order(&p, &d, &a, 0);
        let words = order.iter().map(|&w| p.word(w)).collect_vec();
        assert_eq!(words, vec!["AAA", "BBB", "CCC"]);
    }
}
