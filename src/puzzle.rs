//! Text format of a packing puzzle.
//!
//! # Expected Format
//!
//! ```text
//! 0:
//! ###
//! ##.
//!
//! 1:
//! .#.
//! ###
//!
//! 4x4: 1 2
//! 12x5: 0 3
//! ```
//!
//!  - Shape blocks come first: a `<id>:` header followed by rows of `#`
//!    (filled) and any other character (empty), separated by blank lines.
//!    Spaces are cells too, so trailing spaces of a row are kept.
//!  - Every line after the shapes is a region `<width>x<height>:` followed by
//!    one count per shape. Counts refer to shapes by their position in the
//!    input, not by their declared id.

use crate::{
    packing::Region,
    shape::{Outline, ShapeCatalog, Symmetry},
};
use std::{fmt, str::FromStr};

/// Error returned for malformed puzzle input, with the 1-based line number
/// where the problem was found.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("line {line}: {kind}")]
pub struct ParseError {
    /// The line the error was found on, starting at 1.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// The kinds of malformed input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseErrorKind {
    /// The input declares no shapes.
    #[display("no shapes declared")]
    NoShapes,
    /// A shape header whose id is not a non-negative integer.
    #[display("invalid shape id {id:?}")]
    InvalidShapeId {
        /// The text before the colon.
        id: String,
    },
    /// A shape header that is not followed by any rows.
    #[display("shape has no rows")]
    MissingShapeRows,
    /// A shape whose rows do not all have the same length.
    #[display("shape rows must have equal length, expected {expected} but found {found}")]
    RaggedShape {
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A shape without any filled cell.
    #[display("shape has no filled cells")]
    EmptyShape,
    /// A line that is neither part of a shape block nor a region.
    #[display("unexpected line {text:?}")]
    UnexpectedLine {
        /// The offending line.
        text: String,
    },
    /// A shape block found after the first region line.
    #[display("shape declared after the first region")]
    ShapeAfterRegions,
    /// A region line that does not match `<width>x<height>: <counts>`.
    #[display("invalid region {text:?}, expected `<width>x<height>: <counts>`")]
    InvalidRegion {
        /// The offending line.
        text: String,
    },
    /// A region with zero width or height.
    #[display("region dimensions must be positive")]
    ZeroDimension,
    /// A region whose number of cells does not fit in a `usize`.
    #[display("region {width}x{height} is too large")]
    RegionTooLarge {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },
    /// A shape count that is not a non-negative integer.
    #[display("invalid shape count {token:?}")]
    InvalidCount {
        /// The offending token.
        token: String,
    },
    /// A region whose count vector length differs from the number of shapes.
    #[display("expected {expected} shape counts but found {found}")]
    CountMismatch {
        /// Number of declared shapes.
        expected: usize,
        /// Number of counts on the line.
        found: usize,
    },
}

impl ParseErrorKind {
    fn at(self, line: usize) -> ParseError {
        ParseError { line, kind: self }
    }
}

/// A shape block of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeBlock {
    /// Identifier from the block header.
    pub id: u32,
    /// The outline rows of the block.
    pub outline: Outline,
}

/// A parsed puzzle: the palette of shapes and the regions to pack them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Shapes, in input order.
    pub shapes: Vec<ShapeBlock>,
    /// Regions, in input order.
    pub regions: Vec<Region>,
}

impl Puzzle {
    /// Parse a puzzle from its text form.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for the first malformed line. Nothing is
    /// skipped silently.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = input
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut shapes = Vec::new();
        let mut regions = Vec::new();
        let mut idx = 0;

        // Shape blocks
        while idx < lines.len() {
            let line = lines[idx].trim_end();
            let line_number = idx + 1;

            if line.is_empty() {
                idx += 1;
                continue;
            }
            if is_region_line(line) {
                break;
            }

            let Some(id) = line.strip_suffix(':') else {
                return Err(ParseErrorKind::UnexpectedLine {
                    text: line.to_string(),
                }
                .at(line_number));
            };
            let id = id
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseErrorKind::InvalidShapeId { id: id.to_string() }.at(line_number))?;

            idx += 1;
            let start = idx;
            while idx < lines.len()
                && !is_blank(lines[idx])
                && !lines[idx].trim_end().ends_with(':')
                && !is_region_line(lines[idx])
            {
                idx += 1;
            }

            let outline = Outline::parse(&lines[start..idx]).map_err(|kind| kind.at(line_number))?;
            shapes.push(ShapeBlock { id, outline });
        }

        if shapes.is_empty() {
            return Err(ParseErrorKind::NoShapes.at(idx.min(lines.len()).max(1)));
        }

        // Regions
        for (offset, line) in lines.iter().enumerate().skip(idx) {
            let line_number = offset + 1;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let region = parse_region(line, shapes.len()).map_err(|kind| kind.at(line_number))?;
            regions.push(region);
        }

        log::debug!(
            "Parsed puzzle with [{}] shapes and [{}] regions.",
            shapes.len(),
            regions.len()
        );

        Ok(Self { shapes, regions })
    }

    /// Enumerate the orientations of every shape of the puzzle.
    pub fn catalog(&self, symmetry: Symmetry) -> ShapeCatalog {
        ShapeCatalog::new(
            self.shapes.iter().map(|block| (block.id, &block.outline)),
            symmetry,
        )
    }
}

impl FromStr for Puzzle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.shapes {
            writeln!(f, "{}:", block.id)?;
            for row in block.outline.rows() {
                writeln!(f, "{row}")?;
            }
            writeln!(f)?;
        }

        for region in &self.regions {
            writeln!(f, "{region}")?;
        }

        Ok(())
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_region_line(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(dimensions, _)| dimensions.contains('x'))
}

fn parse_region(line: &str, num_shapes: usize) -> Result<Region, ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidRegion {
        text: line.to_string(),
    };

    if line.ends_with(':') && !is_region_line(line) {
        return Err(ParseErrorKind::ShapeAfterRegions);
    }

    let (dimensions, counts) = line.split_once(':').ok_or_else(invalid)?;
    let (width, height) = dimensions.trim().split_once('x').ok_or_else(invalid)?;
    let width: usize = width.parse().map_err(|_| invalid())?;
    let height: usize = height.parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(ParseErrorKind::ZeroDimension);
    }
    if width.checked_mul(height).is_none() {
        return Err(ParseErrorKind::RegionTooLarge { width, height });
    }

    let counts = counts
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| ParseErrorKind::InvalidCount {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if counts.len() != num_shapes {
        return Err(ParseErrorKind::CountMismatch {
            expected: num_shapes,
            found: counts.len(),
        });
    }

    Ok(Region::new(width, height, counts))
}
