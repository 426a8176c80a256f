//! Polyomino shapes and their orientations.
//!
//! A shape is read as an [`Outline`], a rectangular character grid. Its
//! orientations are the distinct images of that outline under the symmetries
//! of the square, each stored as an [`Orientation`]: a set of cell offsets
//! translated so that its minimum row and minimum column are both zero.

use crate::puzzle::ParseErrorKind;
use std::collections::HashSet;

/// Character marking a filled cell in an outline.
pub const FILLED: char = '#';

/// Rectangular grid of filled and empty cells, as written in the input.
///
/// `Outline` is represented as a vector of `height * width` elements, where
/// only width is explicitly stored. Rows are stored consecutively - the cell
/// of the `i`th row and `j`th column is available under index `i * width + j`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Outline {
    width: usize,
    mask: Vec<bool>,
}

impl Outline {
    /// Create an outline from rows of characters, where [`FILLED`] marks a
    /// filled cell and any other character an empty one.
    ///
    /// # Errors
    ///
    /// Fails if there are no rows, if the rows have different lengths or if
    /// no cell is filled.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseErrorKind> {
        let Some(first) = rows.first() else {
            return Err(ParseErrorKind::MissingShapeRows);
        };

        let width = first.as_ref().chars().count();
        let mut mask = Vec::with_capacity(width * rows.len());

        for row in rows {
            let row = row.as_ref();
            let length = row.chars().count();
            if length != width {
                return Err(ParseErrorKind::RaggedShape {
                    expected: width,
                    found: length,
                });
            }

            mask.extend(row.chars().map(|c| c == FILLED));
        }

        Self::new(width, mask)
    }

    /// Create an outline of the given width from a row-major mask.
    ///
    /// # Errors
    ///
    /// Fails if the mask has no filled cell. A zero width or a mask length
    /// that is not a multiple of the width are programming errors and panic.
    pub fn new(width: usize, mask: Vec<bool>) -> Result<Self, ParseErrorKind> {
        assert!(width != 0, "Width of outline must be non-zero.");
        assert!(
            mask.len() % width == 0,
            "Mask with incorrect length - incorrect number of elements supplied."
        );

        if !mask.iter().any(|filled| *filled) {
            return Err(ParseErrorKind::EmptyShape);
        }

        Ok(Self { width, mask })
    }

    /// Get the outline width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the outline height.
    pub fn height(&self) -> usize {
        self.mask.len() / self.width
    }

    /// Return true if the cell at the given position is filled.
    pub fn is_filled(&self, row: usize, column: usize) -> bool {
        self.mask[row * self.width + column]
    }

    /// Return the number of filled cells.
    pub fn area(&self) -> usize {
        self.mask.iter().filter(|filled| **filled).count()
    }

    /// Return the coordinates of all filled cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(index, _)| (index / width, index % width))
    }

    /// Rotate the outline by 90 degrees clockwise.
    ///
    /// An `R × C` outline becomes a `C × R` outline where the new cell
    /// `(i, j)` is the old cell `(R - 1 - j, i)`.
    pub fn rotate(&self) -> Self {
        let cols = self.width();
        let rows = self.height();
        let mut rotated = Vec::with_capacity(self.mask.len());

        for c in 0..cols {
            for r in (0..rows).rev() {
                rotated.push(self.mask[r * cols + c]);
            }
        }

        Self {
            width: rows,
            mask: rotated,
        }
    }

    /// Mirror the outline left to right.
    pub fn mirror(&self) -> Self {
        let mask = self
            .mask
            .chunks(self.width)
            .flat_map(|row| row.iter().rev().copied())
            .collect();

        Self {
            width: self.width,
            mask,
        }
    }

    /// Flip the outline top to bottom.
    pub fn flip(&self) -> Self {
        let mask = self
            .mask
            .chunks(self.width)
            .rev()
            .flat_map(|row| row.iter().copied())
            .collect();

        Self {
            width: self.width,
            mask,
        }
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Self {
        let cols = self.width();
        let rows = self.height();
        let mut transposed = Vec::with_capacity(self.mask.len());

        for c in 0..cols {
            for r in 0..rows {
                transposed.push(self.mask[r * cols + c]);
            }
        }

        Self {
            width: rows,
            mask: transposed,
        }
    }

    /// Return the rows of the outline as text, using `#` and `.`.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.mask.chunks(self.width).map(|row| {
            row.iter()
                .map(|filled| if *filled { FILLED } else { '.' })
                .collect()
        })
    }
}

impl<const W: usize, const H: usize> From<[[u8; W]; H]> for Outline {
    /// Build an outline from a literal array, `1` meaning filled.
    ///
    /// # Panics
    ///
    /// Panics if the array has no filled cell.
    fn from(arr: [[u8; W]; H]) -> Self {
        let mask = arr.iter().flatten().map(|el| *el != 0).collect();

        Self::new(W, mask).expect("outline literal must have a filled cell")
    }
}

/// Which transformations of a shape may be used when placing it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Shapes are placed exactly as written.
    Fixed,
    /// Shapes may be rotated.
    Rotations,
    /// Shapes may be rotated and mirrored.
    #[default]
    Full,
}

/// One orientation of a shape, in canonical form.
///
/// The cells are sorted and translated so that the minimum row and minimum
/// column are both zero.
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct Orientation {
    cells: Vec<(usize, usize)>,
}

impl Orientation {
    /// Create the canonical form of a set of cells.
    pub fn normalize(cells: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut cells: Vec<_> = cells.into_iter().collect();

        let min_row = cells.iter().map(|(r, _)| *r).min().unwrap_or(0);
        let min_col = cells.iter().map(|(_, c)| *c).min().unwrap_or(0);

        for (r, c) in &mut cells {
            *r -= min_row;
            *c -= min_col;
        }
        cells.sort_unstable();
        cells.dedup();

        Self { cells }
    }

    /// Return the offsets of the cells, sorted in row-major order.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Return the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return true if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the number of rows spanned by the cells.
    pub fn height(&self) -> usize {
        self.cells.iter().map(|(r, _)| r + 1).max().unwrap_or(0)
    }

    /// Return the number of columns spanned by the cells.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|(_, c)| c + 1).max().unwrap_or(0)
    }
}

/// Return the distinct orientations of an outline, in the order they are
/// first generated.
///
/// The candidates are the four clockwise rotations of the outline followed,
/// for [`Symmetry::Full`], by the four rotations of its mirror image.
pub fn orientations(outline: &Outline, symmetry: Symmetry) -> Vec<Orientation> {
    let candidates = match symmetry {
        Symmetry::Fixed => vec![outline.clone()],
        Symmetry::Rotations => rotations(outline),
        Symmetry::Full => {
            let mut candidates = rotations(outline);
            candidates.extend(rotations(&outline.mirror()));
            candidates
        }
    };

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .map(|candidate| Orientation::normalize(candidate.cells()))
        .filter(|orientation| seen.insert(orientation.clone()))
        .collect()
}

fn rotations(outline: &Outline) -> Vec<Outline> {
    let mut rotations = vec![outline.clone()];
    let mut current = outline.clone();
    for _ in 0..3 {
        current = current.rotate();
        rotations.push(current.clone());
    }
    rotations
}

/// A shape from the puzzle input together with its orientations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// Identifier declared in the input. Regions refer to shapes by position,
    /// not by this value.
    pub id: u32,
    /// The outline as written.
    pub outline: Outline,
    orientations: Vec<Orientation>,
}

impl Shape {
    /// Create a shape and enumerate its orientations.
    pub fn new(id: u32, outline: Outline, symmetry: Symmetry) -> Self {
        let orientations = orientations(&outline, symmetry);

        Self {
            id,
            outline,
            orientations,
        }
    }

    /// Return the distinct orientations of this shape.
    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    /// Return the number of cells in the shape.
    pub fn area(&self) -> usize {
        self.orientations[0].len()
    }
}

/// The shapes of a puzzle with their precomputed orientations.
///
/// Built once per puzzle and shared read-only between the regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: Vec<Shape>,
    symmetry: Symmetry,
}

impl ShapeCatalog {
    /// Enumerate the orientations of every outline.
    pub fn new<'a>(outlines: impl IntoIterator<Item = (u32, &'a Outline)>, symmetry: Symmetry) -> Self {
        let shapes: Vec<_> = outlines
            .into_iter()
            .map(|(id, outline)| Shape::new(id, outline.clone(), symmetry))
            .collect();

        for (index, shape) in shapes.iter().enumerate() {
            log::debug!(
                "Shape [{}] (id [{}]) has [{}] cells and [{}] orientations.",
                index,
                shape.id,
                shape.area(),
                shape.orientations().len()
            );
        }

        Self { shapes, symmetry }
    }

    /// Return the shapes, in input order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Return the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Return true if the catalog has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Return the symmetry used to enumerate orientations.
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }
}
