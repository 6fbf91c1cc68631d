use std::fmt::{Display, Formatter};

use itertools::{iproduct, Itertools};
use ndarray::Array2;
use strum::VariantArray;

use crate::key::{Dim, Key, Value};
use crate::matrix::Matrix;
use crate::solver::Unsatisfiable;

/// The four dimensions a classic sudoku placement is described by.
#[derive(Copy, Clone, VariantArray, strum::Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[strum(serialize_all = "lowercase")]
pub enum SudokuDim {
    /// Row of the grid, `1..=9` top to bottom.
    Row,
    /// Column of the grid, `1..=9` left to right.
    Col,
    /// The 3x3 box, `1..=9` in reading order.
    Box,
    /// The digit placed, `1..=9`.
    Num,
}

impl Dim for SudokuDim {}

/// The key of the choice placing `num` at 1-based `(row, col)`.
pub(crate) fn placement(row: Value, col: Value, num: Value) -> Key<SudokuDim> {
    Key::new()
        .with(SudokuDim::Row, row)
        .with(SudokuDim::Col, col)
        .with(SudokuDim::Box, 3 * ((row - 1) / 3) + (col - 1) / 3 + 1)
        .with(SudokuDim::Num, num)
}

/// A classic 9x9 sudoku, posed as an exact cover problem.
///
/// The 324 constraints are the four classic families: every cell holds some digit, while each
/// row, column, and box holds each digit exactly once. The 729 choices are every possible
/// placement of one digit in one cell, each compatible with exactly four constraints. Use
/// [`Self::solve`] on a puzzle to attempt to find a filled grid.
pub struct Sudoku {
    pub(crate) matrix: Matrix<SudokuDim>,
}

impl Sudoku {
    /// Build the empty sudoku structure with all 729 placements still open.
    pub fn new() -> Self {
        let mut matrix = Matrix::new();

        for (group, dims) in [
            ("cell", (SudokuDim::Row, SudokuDim::Col)),
            ("row", (SudokuDim::Row, SudokuDim::Num)),
            ("col", (SudokuDim::Col, SudokuDim::Num)),
            ("box", (SudokuDim::Box, SudokuDim::Num)),
        ] {
            for i in 0..81u8 {
                let key = Key::new().with(dims.0, i / 9 + 1).with(dims.1, i % 9 + 1);
                // setup order is fixed here, so neither define call can actually fail
                matrix.define_constraint(group, key).unwrap();
            }
        }

        for (row, col, num) in iproduct!(1..=9u8, 1..=9u8, 1..=9u8) {
            matrix.define_choice(placement(row, col, num)).unwrap();
        }

        Self { matrix }
    }

    /// Solve `puzzle`, a row-major grid of digits with `0` for a blank cell.
    ///
    /// Consumes the structure either way. [`Unsatisfiable`] means the givens contradict each
    /// other or leave some cell, row, column, or box with no legal digit.
    ///
    /// # Panics
    ///
    /// Panics if `puzzle` contains a value above 9.
    pub fn solve(mut self, puzzle: [[u8; 9]; 9]) -> Result<Grid, Unsatisfiable> {
        for (row, col) in iproduct!(0..9usize, 0..9usize) {
            let num = puzzle[row][col];
            if num == 0 {
                continue;
            }
            assert!(num <= 9, "no digit {} in sudoku (row {}, col {})", num, row + 1, col + 1);

            // every in-range placement was defined in new, so the lookup cannot miss
            let given = self.matrix.choice(&placement(row as Value + 1, col as Value + 1, num)).unwrap();
            self.matrix.apply_given(given)?;
        }

        let solution = self.matrix.solve()?;

        let mut cells = Array2::<Value>::zeros((9, 9));
        for choice in self.matrix.givens().iter().chain(solution.iter()) {
            let key = self.matrix.key_of(*choice);
            let (row, col) = (key.get(SudokuDim::Row).unwrap(), key.get(SudokuDim::Col).unwrap());
            cells[(usize::from(row) - 1, usize::from(col) - 1)] = key.get(SudokuDim::Num).unwrap();
        }

        Ok(Grid { cells })
    }
}

impl Default for Sudoku {
    fn default() -> Self {
        Self::new()
    }
}

/// A filled sudoku grid, as returned by [`Sudoku::solve`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Grid {
    cells: Array2<Value>,
}

impl Grid {
    /// The digit at 1-based `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Value {
        self.cells[(row - 1, col - 1)]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().join(""))?;
        }

        Ok(())
    }
}
