//! A packing puzzle asks whether a multiset of polyominoes can be placed
//! inside a rectangular region without overlaps. Unlike a
//! [tiling](https://en.wikipedia.org/wiki/Polyomino#Tiling_with_polyominoes),
//! cells of the region are allowed to stay empty.
//!
//! Every placement of a shape orientation at an anchor is a possibility. Each
//! shape is a primary constraint whose multiplicity is the number of copies
//! requested, and each cell is an optional constraint that at most one
//! placement may cover.

use crate::{
    shape::{Orientation, ShapeCatalog},
    solver::{SearchLimits, Verdict},
    ExactCover,
};
use std::fmt;

/// A rectangular region together with the number of copies of each shape
/// that must be packed into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Required copies of each shape, by position in the shape list.
    pub counts: Vec<usize>,
}

impl Region {
    /// Create a new region.
    pub fn new(width: usize, height: usize, counts: Vec<usize>) -> Self {
        Self {
            width,
            height,
            counts,
        }
    }

    /// Return the number of cells in the region, or `None` if it does not fit
    /// in a `usize`.
    pub fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Return the number of cells in the region, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Return the total number of cells covered by the requested shapes, or
    /// `None` if it does not fit in a `usize`.
    pub fn checked_required_area(&self, catalog: &ShapeCatalog) -> Option<usize> {
        self.counts
            .iter()
            .zip(catalog.shapes())
            .try_fold(0usize, |total, (count, shape)| {
                total.checked_add(count.checked_mul(shape.area())?)
            })
    }

    /// Return the total number of cells covered by the requested shapes,
    /// saturating at `usize::MAX`.
    pub fn required_area(&self, catalog: &ShapeCatalog) -> usize {
        self.checked_required_area(catalog).unwrap_or(usize::MAX)
    }

    /// Check that the region has exactly one count per shape of the catalog.
    ///
    /// # Errors
    ///
    /// Returns the lengths that disagree.
    pub fn check_counts(&self, catalog: &ShapeCatalog) -> Result<(), CountMismatch> {
        if self.counts.len() == catalog.len() {
            Ok(())
        } else {
            Err(CountMismatch {
                expected: catalog.len(),
                found: self.counts.len(),
            })
        }
    }

    /// Return true if the requested shapes do not cover more cells than the
    /// region has. This is necessary, but not sufficient, for a packing.
    pub fn area_fits(&self, catalog: &ShapeCatalog) -> bool {
        self.required_area(catalog) <= self.area()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}:", self.width, self.height)?;
        for count in &self.counts {
            write!(f, " {count}")?;
        }
        Ok(())
    }
}

/// Return every anchor `(row, column)` at which the orientation fits inside a
/// `width` × `height` region, in row-major order.
pub fn anchors(orientation: &Orientation, width: usize, height: usize) -> Vec<(usize, usize)> {
    (0..height)
        .flat_map(|anchor_row| (0..width).map(move |anchor_col| (anchor_row, anchor_col)))
        .filter(|(anchor_row, anchor_col)| {
            orientation
                .cells()
                .iter()
                .all(|(dr, dc)| anchor_row + dr < height && anchor_col + dc < width)
        })
        .collect()
}

/// A possible placement of a shape in the region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// Index of the shape in the list of shapes.
    pub shape_index: usize,
    /// Index of the orientation in the shape's orientation list.
    pub orientation_index: usize,
    /// Region coordinate of the orientation's `(0, 0)` offset.
    pub anchor: (usize, usize),
    /// List of coordinates of the cells occupied by the shape in the region,
    /// sorted in row-major order.
    pub occupied_cells: Vec<(usize, usize)>,
}

impl Placement {
    fn new(
        shape_index: usize,
        orientation_index: usize,
        anchor: (usize, usize),
        orientation: &Orientation,
    ) -> Self {
        let occupied_cells = orientation
            .cells()
            .iter()
            .map(|(dr, dc)| (anchor.0 + dr, anchor.1 + dc))
            .collect();

        Self {
            shape_index,
            orientation_index,
            anchor,
            occupied_cells,
        }
    }

    /// Check if this placement satisfies a given constraint.
    pub fn satisfies(&self, constraint: &Constraint) -> bool {
        match constraint {
            Constraint::Shape { index } => self.shape_index == *index,
            Constraint::Cell { row, column } => self.occupied_cells.contains(&(*row, *column)),
        }
    }

    /// Return an iterator over all `Constraint`s that are satisfied by this
    /// `Placement`.
    pub fn satisfied_constraints(&self) -> impl Iterator<Item = Constraint> + '_ {
        let shape_constraint = Constraint::Shape {
            index: self.shape_index,
        };
        let cell_constraints = self
            .occupied_cells
            .iter()
            .map(|&(row, column)| Constraint::Cell { row, column });

        std::iter::once(shape_constraint).chain(cell_constraints)
    }
}

/// A condition on a packing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// The shape must be placed exactly as many times as requested.
    Shape {
        /// Index of the shape in the list of shapes.
        index: usize,
    },
    /// The cell may be covered by at most one placement.
    Cell {
        /// The row index.
        row: usize,
        /// The column index.
        column: usize,
    },
}

impl Constraint {
    /// Return an iterator over all `Constraint`s for a region of the given
    /// size with the given number of shapes.
    pub fn all(width: usize, height: usize, num_shapes: usize) -> impl Iterator<Item = Constraint> {
        let shape_it = (0..num_shapes).map(|index| Constraint::Shape { index });
        let cell_it = (0..height)
            .flat_map(move |row| (0..width).map(move |column| Constraint::Cell { row, column }));

        shape_it.chain(cell_it)
    }
}

/// A region whose count vector does not match the shapes it is solved with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("region has {found} shape counts but {expected} shapes are declared")]
pub struct CountMismatch {
    /// Number of shapes in the catalog.
    pub expected: usize,
    /// Number of counts in the region.
    pub found: usize,
}

/// Reason a region was found infeasible before searching.
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Rejection {
    /// The requested shapes cover more cells than the region has.
    #[display("shapes need {required} cells but the region has {available}")]
    AreaExceeded {
        /// Cells covered by the requested shapes.
        required: usize,
        /// Cells in the region.
        available: usize,
    },
    /// A shape has fewer distinct placements than requested copies.
    #[display("shape {shape_index} has {available} placements but {required} copies are requested")]
    InsufficientPlacements {
        /// Index of the shape.
        shape_index: usize,
        /// Requested copies.
        required: usize,
        /// Distinct placements in the region.
        available: usize,
    },
}

/// Reasons a model cannot be built.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum BuildError {
    /// The region does not have one count per shape.
    #[display("{_0}")]
    CountMismatch(CountMismatch),
    /// The region is infeasible before searching.
    #[display("{_0}")]
    Rejected(Rejection),
}

/// The exact cover model of one region.
#[derive(Debug)]
pub struct PackingModel {
    /// Every placement of every orientation of every shape.
    pub possibilities: Vec<Placement>,
    /// The shape constraints followed by the cell constraints, row-major.
    pub constraints: Vec<Constraint>,
    /// The region being packed.
    pub region: Region,
}

impl PackingModel {
    /// Build the model of a region from the precomputed orientations.
    ///
    /// # Errors
    ///
    /// Fails if the region's count vector does not match the catalog, and
    /// returns [`Rejection::InsufficientPlacements`] as soon as a shape with a
    /// positive count is found to have fewer placements than copies requested.
    pub fn build(region: &Region, catalog: &ShapeCatalog) -> Result<Self, BuildError> {
        region.check_counts(catalog)?;

        let mut possibilities = Vec::new();

        for (shape_index, (shape, &required)) in
            catalog.shapes().iter().zip(&region.counts).enumerate()
        {
            let first = possibilities.len();

            for (orientation_index, orientation) in shape.orientations().iter().enumerate() {
                possibilities.extend(
                    anchors(orientation, region.width, region.height)
                        .into_iter()
                        .map(|anchor| {
                            Placement::new(shape_index, orientation_index, anchor, orientation)
                        }),
                );
            }

            let available = possibilities.len() - first;
            if required > 0 && available < required {
                return Err(Rejection::InsufficientPlacements {
                    shape_index,
                    required,
                    available,
                }
                .into());
            }
        }

        let constraints = Constraint::all(region.width, region.height, catalog.len()).collect();

        log::debug!(
            "Built model for region [{}] with [{}] placements.",
            region,
            possibilities.len()
        );

        Ok(Self {
            possibilities,
            constraints,
            region: region.clone(),
        })
    }

    fn cell_column(&self, row: usize, column: usize) -> usize {
        self.region.counts.len() + row * self.region.width + column
    }
}

impl ExactCover for PackingModel {
    type Constraint = Constraint;
    type Possibility = Placement;

    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool {
        poss.satisfies(cons)
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        matches!(cons, Constraint::Cell { .. })
    }

    fn multiplicity(&self, cons: &Self::Constraint) -> usize {
        match cons {
            Constraint::Shape { index } => self.region.counts[*index],
            Constraint::Cell { .. } => 1,
        }
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        &self.possibilities
    }

    fn constraints(&self) -> &[Self::Constraint] {
        &self.constraints
    }

    fn satisfied_constraints(&self, poss_index: usize) -> Vec<usize> {
        let placement = &self.possibilities[poss_index];

        std::iter::once(placement.shape_index)
            .chain(
                placement
                    .occupied_cells
                    .iter()
                    .map(|&(row, column)| self.cell_column(row, column)),
            )
            .collect()
    }
}

/// A concrete packing of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    /// Number of columns of the region.
    pub width: usize,
    /// Number of rows of the region.
    pub height: usize,
    /// The chosen placements.
    pub placements: Vec<Placement>,
}

/// Ways an arrangement can fail to be a valid packing.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ArrangementError {
    /// A shape was placed a different number of times than requested.
    #[display("shape {shape_index} placed {placed} times, expected {required}")]
    CountMismatch {
        /// Index of the shape.
        shape_index: usize,
        /// Requested copies.
        required: usize,
        /// Copies in the arrangement.
        placed: usize,
    },
    /// Two placements cover the same cell.
    #[display("cell ({row}, {column}) is covered more than once")]
    Overlap {
        /// The row index.
        row: usize,
        /// The column index.
        column: usize,
    },
    /// A placement leaves the region.
    #[display("cell ({row}, {column}) is outside of the region")]
    OutOfBounds {
        /// The row index.
        row: usize,
        /// The column index.
        column: usize,
    },
}

impl Arrangement {
    /// Return the index of the shape covering each cell, row by row.
    pub fn owners(&self) -> Vec<Vec<Option<usize>>> {
        let mut owners = vec![vec![None; self.width]; self.height];

        for placement in &self.placements {
            for &(row, column) in &placement.occupied_cells {
                owners[row][column] = Some(placement.shape_index);
            }
        }

        owners
    }

    /// Check that the arrangement places exactly `counts[i]` copies of shape
    /// `i`, stays inside the region and covers no cell twice.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, counts: &[usize]) -> Result<(), ArrangementError> {
        for (shape_index, &required) in counts.iter().enumerate() {
            let placed = self
                .placements
                .iter()
                .filter(|placement| placement.shape_index == shape_index)
                .count();

            if placed != required {
                return Err(ArrangementError::CountMismatch {
                    shape_index,
                    required,
                    placed,
                });
            }
        }

        let mut covered = vec![false; self.width * self.height];
        for placement in &self.placements {
            for &(row, column) in &placement.occupied_cells {
                if row >= self.height || column >= self.width {
                    return Err(ArrangementError::OutOfBounds { row, column });
                }

                let index = row * self.width + column;
                if covered[index] {
                    return Err(ArrangementError::Overlap { row, column });
                }
                covered[index] = true;
            }
        }

        Ok(())
    }
}

/// Configuration for solving a single region.
///
/// The transformations allowed for each shape are fixed when the
/// [`ShapeCatalog`] is built, see [`crate::BatchOptions::symmetry`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    /// Budget for the search of each region.
    pub limits: SearchLimits,
}

/// How the verdict of a region was reached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Rejected before building the model.
    Rejected(Rejection),
    /// Decided (or given up on) by searching the model.
    Searched {
        /// Number of search nodes expanded.
        nodes: u64,
    },
}

/// The result of solving a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    /// Whether the region can be packed, with a packing if so.
    pub verdict: Verdict<Arrangement>,
    /// How the verdict was reached.
    pub resolution: Resolution,
}

/// Decide whether the shapes requested by `region` can be packed into it.
///
/// The area check runs first and rejects the region without building a
/// model. Otherwise the model is built and searched for a single packing,
/// within the limits of `options`.
///
/// An area that overflows `usize` is treated as exceeding the region.
///
/// # Errors
///
/// Fails if the region's count vector does not match the catalog.
pub fn solve_region(
    region: &Region,
    catalog: &ShapeCatalog,
    options: &SolveOptions,
) -> Result<RegionReport, CountMismatch> {
    region.check_counts(catalog)?;

    let required = region.required_area(catalog);
    let available = region.area();

    if required > available {
        log::debug!(
            "Region [{}] needs [{}] cells but only has [{}].",
            region,
            required,
            available
        );

        return Ok(RegionReport {
            verdict: Verdict::Infeasible,
            resolution: Resolution::Rejected(Rejection::AreaExceeded {
                required,
                available,
            }),
        });
    }

    let model = match PackingModel::build(region, catalog) {
        Ok(model) => model,
        Err(BuildError::CountMismatch(err)) => return Err(err),
        Err(BuildError::Rejected(rejection)) => {
            log::debug!("Region [{}] rejected: {}.", region, rejection);

            return Ok(RegionReport {
                verdict: Verdict::Infeasible,
                resolution: Resolution::Rejected(rejection),
            });
        }
    };

    let mut solver = model.solver_with_limits(options.limits);
    let verdict = solver.decide().map(|placements| Arrangement {
        width: region.width,
        height: region.height,
        placements: placements.into_iter().cloned().collect(),
    });

    Ok(RegionReport {
        verdict,
        resolution: Resolution::Searched {
            nodes: solver.nodes_visited(),
        },
    })
}
