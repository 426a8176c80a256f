use crate::{
    grid::{Branch, Grid},
    ExactCover,
};

/// Resource budget for a single search.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of search nodes to expand before giving up. `None`
    /// searches until the problem is exhausted.
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    /// Limits that never stop the search.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limits that stop the search after `max_nodes` expanded nodes.
    pub fn nodes(max_nodes: u64) -> Self {
        Self {
            max_nodes: Some(max_nodes),
        }
    }
}

/// Progress of a `Solver` through its search space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// There may be more solutions to find.
    InProgress,
    /// The whole search space has been explored.
    Complete,
    /// The search stopped because the `SearchLimits` were exceeded. Solutions
    /// may remain undiscovered.
    LimitReached,
}

/// Three valued answer to "does this problem have a solution?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// A solution exists, and here is one.
    Feasible(T),
    /// The search space was exhausted without finding a solution.
    Infeasible,
    /// The search gave up before reaching either conclusion.
    Unknown,
}

impl<T> Verdict<T> {
    /// Return true for `Feasible`.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Verdict::Feasible(_))
    }

    /// Return true for `Infeasible`.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Verdict::Infeasible)
    }

    /// Return true for `Unknown`.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Verdict::Unknown)
    }

    /// Return the witness of a `Feasible` verdict.
    pub fn witness(&self) -> Option<&T> {
        match self {
            Verdict::Feasible(witness) => Some(witness),
            _ => None,
        }
    }

    /// Transform the witness of a `Feasible` verdict.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Verdict<U> {
        match self {
            Verdict::Feasible(witness) => Verdict::Feasible(f(witness)),
            Verdict::Infeasible => Verdict::Infeasible,
            Verdict::Unknown => Verdict::Unknown,
        }
    }
}

/// Solver that iteratively returns solutions to exact cover problems.
#[derive(Debug)]
pub struct Solver<'e, E: ExactCover> {
    problem: &'e E,
    limits: SearchLimits,

    // Values used to track the state of solving
    grid: Grid,
    partial_solution: Vec<usize>,
    stack: Vec<Frame>,
    started: bool,
    nodes: u64,
    status: SearchStatus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FrameState {
    // Before adding the row to the partial solution
    Include,
    // After the include branch, before trying without the row
    Exclude,
    // Both branches done, before restoring the grid
    Exhausted,
}

#[derive(Debug)]
struct Frame {
    row: usize,
    mark: usize,
    state: FrameState,
}

impl<'e, E> Solver<'e, E>
where
    E: ExactCover,
{
    /// Create a new `Solver` with the given instance of an exact cover problem.
    pub fn new(problem: &'e E) -> Self {
        Self::with_limits(problem, SearchLimits::unlimited())
    }

    /// Create a new `Solver` which stops once the given limits are exceeded.
    pub fn with_limits(problem: &'e E, limits: SearchLimits) -> Self {
        let grid = Self::populate_grid(problem);

        log::debug!(
            "Populated grid with [{}] rows and [{}] columns.",
            grid.num_rows(),
            problem.constraints().len()
        );

        Self {
            problem,
            limits,

            grid,
            partial_solution: Vec::new(),
            stack: Vec::new(),
            started: false,
            nodes: 0,
            status: SearchStatus::InProgress,
        }
    }

    /// Reset all solver state except for the stored possibilities and
    /// constraints.
    pub fn reset(&mut self) {
        self.grid = Self::populate_grid(self.problem);
        self.partial_solution.clear();
        self.stack.clear();
        self.started = false;
        self.nodes = 0;
        self.status = SearchStatus::InProgress;
    }

    fn populate_grid(problem: &E) -> Grid {
        let columns: Vec<_> = problem
            .constraints()
            .iter()
            .map(|cons| (problem.multiplicity(cons), !problem.is_optional(cons)))
            .collect();

        let rows = (0..problem.possibilities().len())
            .map(|row_idx| problem.satisfied_constraints(row_idx))
            .collect();

        Grid::new(&columns, rows)
    }

    /// Return the current status of the search.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Return the number of search nodes expanded so far.
    pub fn nodes_visited(&self) -> u64 {
        self.nodes
    }

    /// Return all possible solutions.
    ///
    /// If the search is cut short by its limits, this is only the solutions
    /// found before that point; check `status` afterwards.
    pub fn all_solutions(&mut self) -> Vec<Vec<&'e E::Possibility>> {
        self.collect()
    }

    /// Search for the first solution and classify the outcome.
    pub fn decide(&mut self) -> Verdict<Vec<&'e E::Possibility>> {
        match self.next_solution() {
            Some(solution) => Verdict::Feasible(solution),
            None if self.status == SearchStatus::LimitReached => Verdict::Unknown,
            None => Verdict::Infeasible,
        }
    }

    /// Compute up to the next solution, returning `None` if there are no more
    /// or the limits were exceeded.
    pub fn next_solution<'s>(&'s mut self) -> Option<Vec<&'e E::Possibility>>
    where
        'e: 's,
    {
        if self.status != SearchStatus::InProgress {
            return None;
        }

        if !self.started {
            self.started = true;
            let possible_solution = self.expand();
            if possible_solution.is_some() || self.status == SearchStatus::LimitReached {
                return possible_solution;
            }
        }

        while let Some(curr_frame) = self.stack.last_mut() {
            let Frame { row, mark, state } = *curr_frame;

            let possible_solution = match state {
                // Add the row to the partial solution and descend.
                FrameState::Include => {
                    curr_frame.state = FrameState::Exclude;

                    self.grid.select(row);
                    self.partial_solution.push(row);
                    self.expand()
                }
                // Undo the include branch, then descend with the row removed.
                FrameState::Exclude => {
                    curr_frame.state = FrameState::Exhausted;

                    self.grid.rollback(mark);
                    self.partial_solution.pop();
                    self.grid.remove(row);
                    self.expand()
                }
                FrameState::Exhausted => {
                    self.stack.pop();
                    self.grid.rollback(mark);
                    None
                }
            };

            if possible_solution.is_some() {
                return possible_solution;
            }

            if self.status == SearchStatus::LimitReached {
                return None;
            }
        }

        self.status = SearchStatus::Complete;
        None
    }

    /// Visit a new search node: either report the current partial solution,
    /// give up on it, or push a frame to branch on.
    fn expand(&mut self) -> Option<Vec<&'e E::Possibility>> {
        self.nodes += 1;
        if let Some(max_nodes) = self.limits.max_nodes {
            if self.nodes > max_nodes {
                log::debug!("Search stopped after [{}] nodes.", max_nodes);

                self.status = SearchStatus::LimitReached;
                self.stack.clear();
                return None;
            }
        }

        match self.grid.branch() {
            Branch::Solved => {
                let problem = self.problem;
                Some(
                    self.partial_solution
                        .iter()
                        .map(|row_index| &problem.possibilities()[*row_index])
                        .collect(),
                )
            }
            Branch::DeadEnd => None,
            Branch::Column(column) => {
                let row = self
                    .grid
                    .first_uncovered_row(column)
                    .expect("column with remaining capacity must have an uncovered row");

                log::trace!(
                    "Branching on column [{}] with row [{}] at depth [{}].",
                    column,
                    row,
                    self.stack.len()
                );

                self.stack.push(Frame {
                    row,
                    mark: self.grid.checkpoint(),
                    state: FrameState::Include,
                });
                None
            }
        }
    }
}

impl<'e, E> Iterator for Solver<'e, E>
where
    E: ExactCover,
{
    type Item = Vec<&'e E::Possibility>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution()
    }
}
