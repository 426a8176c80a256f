//! Solving every region of a puzzle.
//!
//! The shape orientations are enumerated once and shared read-only by all
//! regions. Regions are independent of each other, so they can be solved on a
//! thread pool; the reports are always returned in input order.

use crate::{
    packing::{solve_region, CountMismatch, Region, RegionReport, SolveOptions},
    puzzle::Puzzle,
    shape::{ShapeCatalog, Symmetry},
    solver::Verdict,
};
use rayon::prelude::*;

/// Configuration for solving a whole puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Options applied to every region.
    pub solve: SolveOptions,
    /// Transformations allowed when placing shapes.
    pub symmetry: Symmetry,
    /// Number of regions solved concurrently. `1` solves them in order on the
    /// calling thread, `0` uses one thread per available core.
    pub jobs: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            solve: SolveOptions::default(),
            symmetry: Symmetry::default(),
            jobs: 1,
        }
    }
}

/// How regions the solver gave up on are counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Count them as not feasible. This undercounts if any of them could in
    /// fact be packed.
    CountAsInfeasible,
    /// Refuse to produce a count while any region is unknown.
    #[default]
    Reject,
}

/// Errors from solving a puzzle.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolveError {
    /// The worker pool could not be created.
    #[display("failed to build thread pool: {_0}")]
    ThreadPool(rayon::ThreadPoolBuildError),
    /// A region does not have one count per shape.
    #[display("region {region}: {source}")]
    #[from(ignore)]
    CountMismatch {
        /// Position of the region in the puzzle, starting at 1.
        region: usize,
        /// The lengths that disagree.
        source: CountMismatch,
    },
    /// Some regions were neither proven feasible nor infeasible.
    #[display("{unknown} region(s) could not be decided within the search limits")]
    #[from(ignore)]
    Undecided {
        /// Number of undecided regions.
        unknown: usize,
    },
}

/// Number of regions per verdict.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Regions with a packing.
    pub feasible: usize,
    /// Regions proven to have no packing.
    pub infeasible: usize,
    /// Regions the search gave up on.
    pub unknown: usize,
}

/// The reports for every region of a puzzle, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    catalog: ShapeCatalog,
    reports: Vec<RegionReport>,
}

impl BatchReport {
    /// Return the shape orientations the regions were solved with.
    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Return the report of every region, in input order.
    pub fn regions(&self) -> &[RegionReport] {
        &self.reports
    }

    /// Count the regions by verdict.
    pub fn tally(&self) -> Tally {
        self.reports
            .iter()
            .fold(Tally::default(), |mut tally, report| {
                match report.verdict {
                    Verdict::Feasible(_) => tally.feasible += 1,
                    Verdict::Infeasible => tally.infeasible += 1,
                    Verdict::Unknown => tally.unknown += 1,
                }
                tally
            })
    }

    /// Return the number of regions that can be packed.
    ///
    /// # Errors
    ///
    /// With [`UnknownPolicy::Reject`], fails if any region is undecided.
    pub fn count_feasible(&self, policy: UnknownPolicy) -> Result<usize, SolveError> {
        let tally = self.tally();

        match policy {
            UnknownPolicy::Reject if tally.unknown > 0 => Err(SolveError::Undecided {
                unknown: tally.unknown,
            }),
            UnknownPolicy::Reject | UnknownPolicy::CountAsInfeasible => Ok(tally.feasible),
        }
    }
}

/// Solve every region of the puzzle.
///
/// # Errors
///
/// Fails if a thread pool was requested and could not be created, or if a
/// region does not have one count per shape. Puzzles from [`Puzzle::parse`]
/// always have matching counts.
pub fn solve_puzzle(puzzle: &Puzzle, options: &BatchOptions) -> Result<BatchReport, SolveError> {
    let catalog = puzzle.catalog(options.symmetry);
    let total = puzzle.regions.len();

    let solve = |(idx, region): (usize, &Region)| -> Result<RegionReport, SolveError> {
        let report = solve_region(region, &catalog, &options.solve).map_err(|source| {
            SolveError::CountMismatch {
                region: idx + 1,
                source,
            }
        })?;
        log::info!(
            "Region {}/{} [{}]: {}",
            idx + 1,
            total,
            region,
            verdict_name(&report.verdict)
        );
        Ok(report)
    };

    let reports: Result<Vec<_>, SolveError> = if options.jobs == 1 {
        puzzle.regions.iter().enumerate().map(solve).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()?;

        log::debug!("Solving [{}] regions on [{}] threads.", total, pool.current_num_threads());

        pool.install(|| puzzle.regions.par_iter().enumerate().map(solve).collect())
    };
    let reports: Vec<RegionReport> = reports?;

    Ok(BatchReport { catalog, reports })
}

/// Return a lowercase name for a verdict.
pub fn verdict_name<T>(verdict: &Verdict<T>) -> &'static str {
    match verdict {
        Verdict::Feasible(_) => "feasible",
        Verdict::Infeasible => "infeasible",
        Verdict::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SearchLimits;

    const PUZZLE: &str = "0:\n#\n\n1:\n##\n\n2x2: 4 0\n2x2: 5 0\n2x2: 0 2\n3x3: 1 4\n";

    #[test]
    fn tally_and_count() {
        let puzzle = Puzzle::parse(PUZZLE).unwrap();
        let report = solve_puzzle(&puzzle, &BatchOptions::default()).unwrap();

        let verdicts: Vec<_> = report.regions().iter().map(|r| verdict_name(&r.verdict)).collect();
        assert_eq!(verdicts, vec!["feasible", "infeasible", "feasible", "feasible"]);
        assert_eq!(
            report.tally(),
            Tally {
                feasible: 3,
                infeasible: 1,
                unknown: 0
            }
        );
        assert_eq!(report.count_feasible(UnknownPolicy::Reject).unwrap(), 3);
        assert_eq!(report.catalog().len(), 2);
    }

    #[test]
    fn parallel_matches_sequential() {
        let puzzle = Puzzle::parse(PUZZLE).unwrap();
        let sequential = solve_puzzle(&puzzle, &BatchOptions::default()).unwrap();
        let parallel = solve_puzzle(
            &puzzle,
            &BatchOptions {
                jobs: 3,
                ..BatchOptions::default()
            },
        )
        .unwrap();

        assert_eq!(sequential.tally(), parallel.tally());
        for (a, b) in sequential.regions().iter().zip(parallel.regions()) {
            assert_eq!(verdict_name(&a.verdict), verdict_name(&b.verdict));
        }
    }

    #[test]
    fn unknown_policy_is_explicit() {
        let puzzle = Puzzle::parse("0:\n##\n\n3x2: 3\n").unwrap();
        let options = BatchOptions {
            solve: SolveOptions {
                limits: SearchLimits::nodes(1),
            },
            ..BatchOptions::default()
        };

        let report = solve_puzzle(&puzzle, &options).unwrap();
        assert_eq!(report.tally().unknown, 1);
        assert_eq!(report.count_feasible(UnknownPolicy::CountAsInfeasible).unwrap(), 0);

        let err = report.count_feasible(UnknownPolicy::Reject).unwrap_err();
        assert!(matches!(err, SolveError::Undecided { unknown: 1 }));
        assert_eq!(
            err.to_string(),
            "1 region(s) could not be decided within the search limits"
        );
    }

    #[test]
    fn symmetry_applies_to_every_region() {
        let puzzle = Puzzle::parse("0:\n##\n\n1x2: 1\n2x1: 1\n").unwrap();
        let solve = |symmetry| {
            let options = BatchOptions {
                symmetry,
                ..BatchOptions::default()
            };
            let report = solve_puzzle(&puzzle, &options).unwrap();
            assert_eq!(report.catalog().symmetry(), symmetry);
            report.count_feasible(UnknownPolicy::Reject).unwrap()
        };

        assert_eq!(solve(Symmetry::Full), 2);
        assert_eq!(solve(Symmetry::Rotations), 2);
        assert_eq!(solve(Symmetry::Fixed), 1);
    }

    #[test]
    fn mismatched_counts_are_reported() {
        let mut puzzle = Puzzle::parse(PUZZLE).unwrap();
        puzzle.regions.push(Region::new(2, 2, vec![1]));

        let err = solve_puzzle(&puzzle, &BatchOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::CountMismatch {
                region: 5,
                source: CountMismatch {
                    expected: 2,
                    found: 1
                }
            }
        ));
        assert_eq!(
            err.to_string(),
            "region 5: region has 1 shape counts but 2 shapes are declared"
        );
    }
}
