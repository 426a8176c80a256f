//! Random generation of packing puzzles that are known to be solvable.
//!
//! A region is cut into connected pieces by growing each piece breadth-first
//! from a random seed cell. Each piece is cropped, scrambled by a random
//! symmetry of the square and becomes one shape, and the puzzle asks for one
//! copy of every shape in the partitioned region. The pieces themselves are a
//! packing, so the puzzle is always feasible.

use crate::{
    packing::Region,
    puzzle::{Puzzle, ShapeBlock},
    shape::Outline,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::VecDeque;

/// Parameters of a generated puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Width of the region.
    pub width: usize,
    /// Height of the region.
    pub height: usize,
    /// Number of pieces to cut the region into. Fewer shapes are produced if
    /// the region runs out of cells.
    pub shapes: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            shapes: 6,
        }
    }
}

/// Invalid [`GeneratorOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GenerateError {
    /// The region has zero width or height.
    #[display("region dimensions must be positive")]
    EmptyRegion,
    /// No shapes were requested.
    #[display("at least one shape must be requested")]
    NoShapes,
    /// The number of cells of the region does not fit in a `usize`.
    #[display("region {width}x{height} is too large")]
    RegionTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
}

/// Generate a puzzle from a seed, reproducibly.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_seeded(options: &GeneratorOptions, seed: u64) -> Result<Puzzle, GenerateError> {
    let mut rng = Pcg64::seed_from_u64(seed);
    generate(options, &mut rng)
}

/// Generate a puzzle using the given source of randomness.
///
/// # Errors
///
/// Fails if the region is empty or too large, or if no shapes are requested.
pub fn generate<R: Rng>(options: &GeneratorOptions, rng: &mut R) -> Result<Puzzle, GenerateError> {
    let GeneratorOptions {
        width,
        height,
        shapes,
    } = *options;
    if width == 0 || height == 0 {
        return Err(GenerateError::EmptyRegion);
    }
    if shapes == 0 {
        return Err(GenerateError::NoShapes);
    }
    let cells = width
        .checked_mul(height)
        .ok_or(GenerateError::RegionTooLarge { width, height })?;

    let pieces = partition(width, height, cells, shapes, rng);

    let shapes: Vec<_> = pieces
        .iter()
        .enumerate()
        .map(|(id, cells)| ShapeBlock {
            id: u32::try_from(id).expect("shape count fits in u32"),
            outline: scramble(crop(cells), rng),
        })
        .collect();

    log::debug!(
        "Generated [{}] shapes for a [{}x{}] region.",
        shapes.len(),
        width,
        height
    );

    let region = Region::new(width, height, vec![1; shapes.len()]);

    Ok(Puzzle {
        shapes,
        regions: vec![region],
    })
}

/// Split the `cells` of the region into at most `shapes` connected pieces.
fn partition<R: Rng>(
    width: usize,
    height: usize,
    cells: usize,
    shapes: usize,
    rng: &mut R,
) -> Vec<Vec<(usize, usize)>> {
    let cells_per_shape = (cells / shapes).max(1);
    let mut assigned = vec![false; cells];
    let mut pieces = Vec::with_capacity(shapes.min(cells));

    for shape_id in 0..shapes {
        let unassigned: Vec<_> = (0..cells).filter(|idx| !assigned[*idx]).collect();
        if unassigned.is_empty() {
            break;
        }

        let target = if shape_id + 1 < shapes {
            cells_per_shape
        } else {
            unassigned.len()
        };

        let start = unassigned[rng.random_range(0..unassigned.len())];
        let mut queue = VecDeque::from([start]);
        let mut queued = vec![false; cells];
        queued[start] = true;
        let mut piece = Vec::new();

        while piece.len() < target {
            let Some(idx) = queue.pop_front() else {
                break;
            };
            if assigned[idx] {
                continue;
            }

            assigned[idx] = true;
            let (row, column) = (idx / width, idx % width);
            piece.push((row, column));

            let neighbors = [
                (row, column + 1),
                (row + 1, column),
                (row, column.wrapping_sub(1)),
                (row.wrapping_sub(1), column),
            ];
            for (r, c) in neighbors {
                if r < height && c < width {
                    let next = r * width + c;
                    if !assigned[next] && !queued[next] {
                        queued[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        pieces.push(piece);
    }

    pieces
}

/// Crop a non-empty piece to its bounding box.
fn crop(cells: &[(usize, usize)]) -> Outline {
    let min_row = cells.iter().map(|(r, _)| *r).min().unwrap_or(0);
    let max_row = cells.iter().map(|(r, _)| *r).max().unwrap_or(0);
    let min_col = cells.iter().map(|(_, c)| *c).min().unwrap_or(0);
    let max_col = cells.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let width = max_col - min_col + 1;
    let height = max_row - min_row + 1;
    let mut mask = vec![false; width * height];
    for (r, c) in cells {
        mask[(r - min_row) * width + (c - min_col)] = true;
    }

    Outline::new(width, mask).expect("generated pieces are never empty")
}

/// Apply a random element of the dihedral group.
fn scramble<R: Rng>(outline: Outline, rng: &mut R) -> Outline {
    let transform: u8 = rng.random_range(0..8);

    let mut outline = outline;
    if transform & 1 != 0 {
        outline = outline.mirror();
    }
    if transform & 2 != 0 {
        outline = outline.flip();
    }
    if transform & 4 != 0 {
        outline = outline.transpose();
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_region_without_overlap() {
        let mut rng = Pcg64::seed_from_u64(7);
        let pieces = partition(5, 4, 20, 4, &mut rng);

        let mut seen = vec![false; 20];
        let mut total = 0;
        for piece in &pieces {
            assert!(!piece.is_empty());
            for (r, c) in piece {
                assert!(!seen[r * 5 + c], "cell ({r}, {c}) assigned twice");
                seen[r * 5 + c] = true;
                total += 1;
            }
        }
        assert!(pieces.len() <= 4);
        assert!(total <= 20);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let options = GeneratorOptions {
            width: 6,
            height: 5,
            shapes: 4,
        };

        assert_eq!(
            generate_seeded(&options, 42).unwrap(),
            generate_seeded(&options, 42).unwrap()
        );
    }

    #[test]
    fn generated_puzzle_asks_for_one_of_each() {
        let options = GeneratorOptions::default();
        let puzzle = generate_seeded(&options, 3).unwrap();

        assert_eq!(puzzle.regions.len(), 1);
        let region = &puzzle.regions[0];
        assert_eq!((region.width, region.height), (8, 8));
        assert_eq!(region.counts, vec![1; puzzle.shapes.len()]);

        let area: usize = puzzle.shapes.iter().map(|s| s.outline.area()).sum();
        assert!(area <= 64);
    }

    #[test]
    fn more_shapes_than_cells() {
        let options = GeneratorOptions {
            width: 2,
            height: 1,
            shapes: 5,
        };
        let puzzle = generate_seeded(&options, 0).unwrap();

        assert_eq!(puzzle.shapes.len(), 2);
        assert!(puzzle.shapes.iter().all(|s| s.outline.area() == 1));
    }

    #[test]
    fn invalid_options_are_errors() {
        let generate = |width, height, shapes| {
            generate_seeded(
                &GeneratorOptions {
                    width,
                    height,
                    shapes,
                },
                1,
            )
        };

        assert_eq!(generate(0, 3, 2), Err(GenerateError::EmptyRegion));
        assert_eq!(generate(3, 3, 0), Err(GenerateError::NoShapes));
        assert_eq!(
            generate(usize::MAX, 2, 2),
            Err(GenerateError::RegionTooLarge {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn crop_removes_margins() {
        let outline = crop(&[(2, 3), (3, 3), (3, 4)]);
        assert_eq!(outline, Outline::from([[1, 0], [1, 1]]));
    }
}
