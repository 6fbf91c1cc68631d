use crate::key::Dim;
use crate::matrix::{Choice, Matrix};

/// Returned by [`Matrix::solve`](crate::Matrix::solve) and
/// [`Sudoku::solve`](crate::Sudoku::solve) when no exact cover exists.
///
/// Not a fault in the caller or the structure; the instance simply has no solution, for example
/// a sudoku whose givens contradict each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unsatisfiable;

/// One step of Algorithm X. Picks the live constraint with the fewest candidates and tries each
/// of its candidate rows in column order, covering the row through a lock that is committed if
/// the recursive call succeeds and dropped (restoring the structure) before the next candidate
/// otherwise.
///
/// `true` means every constraint is covered and `stack` holds the committed choices in order;
/// `false` means this branch is exhausted and the structure is back to how it was on entry.
pub(crate) fn search<D: Dim>(matrix: &mut Matrix<D>, stack: &mut Vec<Choice>) -> bool {
    let Some(constraint) = matrix.most_constrained() else {
        // no live constraints left, the choices on the stack are an exact cover
        return true;
    };
    if matrix.candidate_count(constraint) == 0 {
        return false;
    }

    let mut cell = matrix.down(constraint);
    while cell != constraint {
        let choice = matrix.choice_of(cell);
        stack.push(choice);

        let mut lock = matrix.lock_row(choice);
        if search(lock.matrix(), stack) {
            lock.keep();
            return true;
        }

        drop(lock);
        stack.pop();
        cell = matrix.down(cell);
    }

    false
}
