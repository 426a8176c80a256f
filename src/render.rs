//! Text rendering of packings and shapes.

use crate::{packing::Arrangement, shape::Orientation};
use std::fmt;

/// Labels used for shapes in plain renderings, by shape index.
const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// ANSI foreground colours used for shapes in coloured renderings, by shape
/// index.
const COLORS: [&str; 26] = [
    "\x1b[91m",
    "\x1b[92m",
    "\x1b[93m",
    "\x1b[94m",
    "\x1b[95m",
    "\x1b[96m",
    "\x1b[31m",
    "\x1b[32m",
    "\x1b[33m",
    "\x1b[34m",
    "\x1b[35m",
    "\x1b[36m",
    "\x1b[97m",
    "\x1b[90m",
    "\x1b[91;1m",
    "\x1b[92;1m",
    "\x1b[93;1m",
    "\x1b[94;1m",
    "\x1b[95;1m",
    "\x1b[96;1m",
    "\x1b[31;1m",
    "\x1b[32;1m",
    "\x1b[33;1m",
    "\x1b[34;1m",
    "\x1b[35;1m",
    "\x1b[36;1m",
];

const RESET: &str = "\x1b[0m";
const BLOCK: char = '█';
const EMPTY: char = '.';

/// Return the label of a shape in plain renderings.
///
/// Labels wrap around after 52 shapes.
pub fn label(shape_index: usize) -> char {
    char::from(LABELS[shape_index % LABELS.len()])
}

/// Return the ANSI colour escape of a shape in coloured renderings.
pub fn color(shape_index: usize) -> &'static str {
    COLORS[shape_index % COLORS.len()]
}

/// Draw an orientation with `#` for filled and `.` for empty cells.
pub fn render_orientation(orientation: &Orientation) -> String {
    let mut grid = vec![vec![EMPTY; orientation.width()]; orientation.height()];
    for &(row, column) in orientation.cells() {
        grid[row][column] = '#';
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain rendering: every covered cell shows the label of its shape.
impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.owners().iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for owner in row {
                let c = owner.map_or(EMPTY, label);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Coloured rendering of an [`Arrangement`], see [`Arrangement::ansi`].
#[derive(Debug, Clone, Copy)]
pub struct Ansi<'a>(&'a Arrangement);

impl Arrangement {
    /// Render with one ANSI colour per shape, drawing covered cells as blocks.
    pub fn ansi(&self) -> Ansi<'_> {
        Ansi(self)
    }
}

impl fmt::Display for Ansi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.0.owners().iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for owner in row {
                match owner {
                    Some(shape_index) => write!(f, "{}{BLOCK}{RESET}", color(*shape_index))?,
                    None => write!(f, "{EMPTY}")?,
                }
            }
        }
        Ok(())
    }
}
