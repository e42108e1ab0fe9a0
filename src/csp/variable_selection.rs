#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::crossword::{Crossword, VarId};
use crate::csp::assignment::Assignment;
use crate::csp::domain::DomainStore;
use clap::ValueEnum;
use std::cmp::Reverse;
use std::fmt::{Debug, Display};

/// Picks the next unassigned variable for the search to branch on.
pub trait VariableSelection: Debug {
    /// Returns an unassigned variable, or `None` if every variable is assigned.
    fn pick(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
    ) -> Option<VarId>;
}

/// Minimum remaining values, ties broken by highest degree, then by lowest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinimumRemainingValues;

impl VariableSelection for MinimumRemainingValues {
    fn pick(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
    ) -> Option<VarId> {
        (0..puzzle.num_vars())
            .filter(|&var| !assignment.is_assigned(var))
            .min_by_key(|&var| (domains.len(var), Reverse(puzzle.degree(var))))
    }
}

/// The first unassigned variable in id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(
        &self,
        puzzle: &Crossword,
        _: &DomainStore,
        assignment: &Assignment,
    ) -> Option<VarId> {
        (0..puzzle.num_vars()).find(|&var| !assignment.is_assigned(var))
    }
}

/// Runtime choice between the variable selection heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSelectionImpls {
    /// See [`MinimumRemainingValues`].
    MrvDegree(MinimumRemainingValues),
    /// See [`FixedOrder`].
    FixedOrder(FixedOrder),
}

impl VariableSelection for VariableSelectionImpls {
    fn pick(
        &self,
        puzzle: &Crossword,
        domains: &DomainStore,
        assignment: &Assignment,
    ) -> Option<VarId> {
        match self {
            Self::MrvDegree(s) => s.pick(puzzle, domains, assignment),
            Self::FixedOrder(s) => s.pick(puzzle, domains, assignment),
        }
    }
}

/// Variable selection heuristic selectable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum VariableSelectionType {
    /// Fewest remaining candidates first, most neighbours on a tie.
    #[default]
    MrvDegree,
    /// Variables in the order they appear in the grid.
    FixedOrder,
}

impl Display for VariableSelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MrvDegree => write!(f, "mrv-degree"),
            Self::FixedOrder => write!(f, "fixed-order"),
        }
    }
}

impl VariableSelectionType {
    /// Converts the `VariableSelectionType` to a concrete `VariableSelectionImpls`.
    #[must_use]
    pub const fn to_impl(self) -> VariableSelectionImpls {
        match self {
            Self::MrvDegree => VariableSelectionImpls::MrvDegree(MinimumRemainingValues),
            Self::FixedOrder => VariableSelectionImpls::FixedOrder(FixedOrder),
        }
    }
}
