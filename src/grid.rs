//! Sparse incidence matrix used by the `Solver`.
//!
//! Rows are possibilities and columns are constraints. Every column carries a
//! remaining capacity: selecting a row consumes one unit in each of its
//! columns, and once a column is saturated all other rows through it are
//! covered. Every change is recorded on a trail so that the search can roll
//! back to any earlier checkpoint.

/// Outcome of inspecting the grid before branching.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Branch {
    /// Every primary column has reached its multiplicity.
    Solved,
    /// Some primary column has fewer uncovered rows than it still needs.
    DeadEnd,
    /// Branch on this column next.
    Column(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Change {
    /// The row was covered.
    Covered(usize),
    /// One unit of capacity was taken from the column.
    Consumed(usize),
}

#[derive(Debug)]
pub(crate) struct Grid {
    row_columns: Vec<Vec<usize>>,
    column_rows: Vec<Vec<usize>>,

    uncovered_rows: Vec<bool>,
    column_sizes: Vec<usize>,
    capacities: Vec<usize>,
    primary: Vec<bool>,

    trail: Vec<Change>,
}

impl Grid {
    /// Create a new grid.
    ///
    /// `columns` holds the `(capacity, is_primary)` pair of every column and
    /// `rows` the sorted column indices present in each row. Columns that
    /// start with no capacity cover their rows immediately.
    pub fn new(columns: &[(usize, bool)], rows: Vec<Vec<usize>>) -> Self {
        let num_columns = columns.len();
        let mut column_rows = vec![Vec::new(); num_columns];

        for (row, row_columns) in rows.iter().enumerate() {
            for &column in row_columns {
                assert!(
                    column < num_columns,
                    "Row [{row}] references column [{column}] outside of the grid"
                );
                column_rows[column].push(row);
            }
        }

        let column_sizes = column_rows.iter().map(Vec::len).collect();

        let mut grid = Grid {
            uncovered_rows: vec![true; rows.len()],
            row_columns: rows,
            column_rows,
            column_sizes,
            capacities: columns.iter().map(|(capacity, _)| *capacity).collect(),
            primary: columns.iter().map(|(_, primary)| *primary).collect(),
            trail: Vec::new(),
        };

        for column in 0..num_columns {
            if grid.capacities[column] == 0 {
                grid.cover_column_rows(column);
            }
        }
        // Nothing before this point should ever be undone.
        grid.trail.clear();

        grid
    }

    pub fn num_rows(&self) -> usize {
        self.row_columns.len()
    }

    /// Return a mark that `rollback` can later return to.
    pub fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    /// Undo every change made since `mark` was taken.
    pub fn rollback(&mut self, mark: usize) {
        assert!(
            mark <= self.trail.len(),
            "Rollback mark [{mark}] is ahead of the trail"
        );

        while self.trail.len() > mark {
            match self.trail.pop() {
                Some(Change::Covered(row)) => {
                    self.uncovered_rows[row] = true;
                    for &column in &self.row_columns[row] {
                        self.column_sizes[column] += 1;
                    }
                }
                Some(Change::Consumed(column)) => {
                    self.capacities[column] += 1;
                }
                None => unreachable!(),
            }
        }
    }

    /// Cover a single row, without touching the capacity of its columns.
    pub fn remove(&mut self, row: usize) {
        assert!(self.uncovered_rows[row], "Row [{row}] is already covered");

        self.uncovered_rows[row] = false;
        for &column in &self.row_columns[row] {
            self.column_sizes[column] -= 1;
        }
        self.trail.push(Change::Covered(row));
    }

    /// Add a row to the partial solution.
    ///
    /// # Panics
    ///
    /// Panics if the row is covered, which also guarantees that every column
    /// of the row has capacity left.
    pub fn select(&mut self, row: usize) {
        self.remove(row);

        for idx in 0..self.row_columns[row].len() {
            let column = self.row_columns[row][idx];
            debug_assert!(self.capacities[column] > 0);

            self.capacities[column] -= 1;
            self.trail.push(Change::Consumed(column));

            if self.capacities[column] == 0 {
                self.cover_column_rows(column);
            }
        }
    }

    fn cover_column_rows(&mut self, column: usize) {
        for idx in 0..self.column_rows[column].len() {
            let row = self.column_rows[column][idx];
            if self.uncovered_rows[row] {
                self.remove(row);
            }
        }
    }

    /// Choose where to branch next.
    ///
    /// Among the primary columns that still need rows, pick the one with the
    /// least slack (uncovered rows minus remaining capacity), breaking ties by
    /// the smallest number of uncovered rows.
    pub fn branch(&self) -> Branch {
        let mut best: Option<(usize, usize, usize)> = None;

        for column in 0..self.capacities.len() {
            let capacity = self.capacities[column];
            if !self.primary[column] || capacity == 0 {
                continue;
            }

            let size = self.column_sizes[column];
            if size < capacity {
                return Branch::DeadEnd;
            }

            let key = (size - capacity, size, column);
            if best.map_or(true, |best| key < best) {
                best = Some(key);
            }
        }

        match best {
            Some((_, _, column)) => Branch::Column(column),
            None => Branch::Solved,
        }
    }

    /// Return the first uncovered row in the given column.
    pub fn first_uncovered_row(&self, column: usize) -> Option<usize> {
        self.column_rows[column]
            .iter()
            .copied()
            .find(|row| self.uncovered_rows[*row])
    }

    #[cfg(test)]
    fn column_size(&self, column: usize) -> usize {
        self.column_sizes[column]
    }

    #[cfg(test)]
    fn capacity(&self, column: usize) -> usize {
        self.capacities[column]
    }
}
