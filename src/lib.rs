#![deny(missing_docs)]

//! Decide whether a palette of [polyominoes](https://en.wikipedia.org/wiki/Polyomino)
//! can be packed into rectangular regions.
//!
//! Each region asks for a fixed number of copies of every shape. Shapes may be
//! rotated and mirrored, must stay inside the region and must not overlap, but
//! cells are allowed to stay empty. The question is answered by modelling the
//! region as a generalized [exact cover](https://en.wikipedia.org/wiki/Exact_cover)
//! problem (one row per placement, a multiplicity column per shape and an
//! optional column per cell) and searching it with a dancing-links style
//! solver.

pub mod batch;
pub mod generate;
pub(crate) mod grid;
pub mod packing;
pub mod puzzle;
pub mod render;
pub mod shape;
pub(crate) mod solver;

pub use batch::{solve_puzzle, BatchOptions, BatchReport, SolveError, Tally, UnknownPolicy};
pub use generate::{GenerateError, GeneratorOptions};
pub use packing::{
    solve_region, Arrangement, ArrangementError, BuildError, CountMismatch, PackingModel,
    Placement, Region, RegionReport, Rejection, Resolution, SolveOptions,
};
pub use puzzle::{ParseError, ParseErrorKind, Puzzle};
pub use shape::{Orientation, Outline, Shape, ShapeCatalog, Symmetry};
pub use solver::{SearchLimits, SearchStatus, Solver, Verdict};

/// An instance of a generalized exact cover problem.
///
/// Every constraint is a column with a multiplicity `m`. A primary column
/// must be satisfied by exactly `m` selected possibilities, an optional one
/// by at most `m`. With every multiplicity equal to one this is the classic
/// exact cover problem solved by Algorithm X.
pub trait ExactCover {
    /// The type of values that are elements of a solution to the exact cover
    /// problem.
    type Possibility: core::fmt::Debug;

    /// The type of value that are constraints on a given instance of an exact
    /// cover problem.
    type Constraint: core::fmt::Debug;

    /// Return true if the given `Possibility` will satisfy the given
    /// `Constraint`.
    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool;

    /// Return true if the given `Constraint` is optional.
    fn is_optional(&self, cons: &Self::Constraint) -> bool;

    /// Return how many selected possibilities the given `Constraint` accepts.
    ///
    /// Primary constraints need exactly this many, optional constraints at
    /// most this many.
    fn multiplicity(&self, _cons: &Self::Constraint) -> usize {
        1
    }

    /// Return a list of possibilities for this instance of the problem.
    fn possibilities(&self) -> &[Self::Possibility];

    /// Return a list of constraints that must be satisfied for this instance of
    /// the problem.
    fn constraints(&self) -> &[Self::Constraint];

    /// Return the indices (into `constraints()`) of every constraint satisfied
    /// by the possibility at `poss_index`, in increasing order.
    ///
    /// The default implementation checks every constraint with `satisfies`.
    /// Problems that know their structure should override it, since the scan
    /// is quadratic over the whole problem.
    fn satisfied_constraints(&self, poss_index: usize) -> Vec<usize> {
        let poss = &self.possibilities()[poss_index];

        self.constraints()
            .iter()
            .enumerate()
            .filter(|(_, cons)| self.satisfies(poss, cons))
            .map(|(col_idx, _)| col_idx)
            .collect()
    }

    /// Return an iterator over all solutions to this instance of the exact
    /// cover problem.
    fn solver(&self) -> Solver<Self>
    where
        Self: Sized,
    {
        Solver::new(self)
    }

    /// Return an iterator over all solutions which gives up once the given
    /// limits are exceeded.
    fn solver_with_limits(&self, limits: SearchLimits) -> Solver<Self>
    where
        Self: Sized,
    {
        Solver::with_limits(self, limits)
    }
}

impl<E> ExactCover for &E
where
    E: ExactCover,
{
    type Constraint = E::Constraint;
    type Possibility = E::Possibility;

    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool {
        <E as ExactCover>::satisfies(self, poss, cons)
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        <E as ExactCover>::is_optional(self, cons)
    }

    fn multiplicity(&self, cons: &Self::Constraint) -> usize {
        <E as ExactCover>::multiplicity(self, cons)
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        <E as ExactCover>::possibilities(self)
    }

    fn constraints(&self) -> &[Self::Constraint] {
        <E as ExactCover>::constraints(self)
    }

    fn satisfied_constraints(&self, poss_index: usize) -> Vec<usize> {
        <E as ExactCover>::satisfied_constraints(self, poss_index)
    }
}
