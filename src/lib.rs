#![warn(missing_docs)]

//! # `quadrille`
//!
//! An exact cover solver built on dancing links, with classic [sudoku](https://en.wikipedia.org/wiki/Sudoku) wired up as the flagship instance.
//! Begin by building a [`Matrix`] over your own [`Dim`] type, declaring constraints and then choices keyed by [`Key`]s.
//! Lock in any pre-assigned choices with [`apply_given()`](Matrix::apply_given), then call [`solve()`](Matrix::solve) to receive the choices forming an exact cover.
//! For sudoku specifically, [`Sudoku`] does all of the above and [`Sudoku::solve`] takes a plain digit grid.
//!
//! # Internals
//! This crate is driven by [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) over the dancing links structure of Knuth's paper.
//! The constraints and choices of the problem form a sparse boolean matrix, held as circular doubly linked lists in both directions: every column is the list of choices satisfying one constraint, every row the list of constraints one choice satisfies.
//! A chosen row "covers" each constraint it satisfies, splicing the column out of the structure along with every other row that satisfies it.
//! Because spliced-out nodes keep their own links, a cover is undone by replaying it backwards, which is what makes deep backtracking affordable.
//!
//! A high level overview of the search is as follows:
//!
//! If no constraint is left, the rows chosen so far are an exact cover.
//! Otherwise take an unsatisfied constraint with the fewest remaining candidate rows.
//! If it has none, the branch is dead.
//! Try each candidate in turn, covering its row before recursing and uncovering it on the way back out, until some branch succeeds.
//!
//! Choosing the scarcest constraint first keeps the branching factor near 1 on puzzle-like instances, where propagation from a few forced rows usually decides the rest.

pub use key::{Dim, Key, Value};
pub use matrix::{BuildError, Choice, Matrix};
pub use solver::Unsatisfiable;
pub use sudoku::{Grid, Sudoku, SudokuDim};

pub(crate) mod key;
mod tests;
pub(crate) mod matrix;
pub(crate) mod solver;
pub(crate) mod sudoku;
