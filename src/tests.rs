#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::{iproduct, Itertools};
    use strum::VariantArray;

    use crate::sudoku::placement;
    use crate::{BuildError, Choice, Dim, Key, Matrix, Sudoku, SudokuDim, Unsatisfiable};

    #[derive(Copy, Clone, VariantArray, strum::Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
    #[strum(serialize_all = "lowercase")]
    enum Elem {
        One,
        Two,
        Three,
        Four,
        Five,
        Six,
        Seven,
    }

    impl Dim for Elem {}

    fn subset(elems: &[Elem]) -> Key<Elem> {
        elems.iter().fold(Key::new(), |key, elem| key.with(*elem, 1))
    }

    // the worked example from Knuth's dancing links paper; its unique cover is rows 1, 3, 5
    fn knuth_example() -> (Matrix<Elem>, Vec<Choice>) {
        use Elem::*;

        let mut matrix = Matrix::new();
        for elem in Elem::VARIANTS {
            matrix.define_constraint("universe", Key::new().with(*elem, 1)).unwrap();
        }

        let rows = [
            vec![One, Four, Seven],
            vec![One, Four],
            vec![Four, Five, Seven],
            vec![Three, Five, Six],
            vec![Two, Three, Six, Seven],
            vec![Two, Seven],
        ];
        let choices = rows.iter().map(|row| matrix.define_choice(subset(row)).unwrap()).collect_vec();

        (matrix, choices)
    }

    const CLASSIC: [[u8; 9]; 9] = [
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ];

    #[test]
    fn keys_replace_and_compare_by_dimension() {
        let key = Key::new().with(Elem::Two, 1).with(Elem::One, 1).with(Elem::Two, 2);

        assert_eq!(key.get(Elem::Two), Some(2));
        assert_eq!(key.len(), 2);
        assert!(Key::new().with(Elem::One, 1).is_subset_of(&key));
        assert!(!Key::new().with(Elem::Two, 1).is_subset_of(&key));
        assert!(Key::new().is_subset_of(&key));
    }

    #[test]
    fn keys_display_their_entries_in_order() {
        let key = Key::new().with(SudokuDim::Num, 5).with(SudokuDim::Row, 2);
        assert_eq!(key.to_string(), "(row 2, num 5)")
    }

    #[test]
    fn constraints_may_not_follow_choices() {
        let mut matrix = Matrix::new();
        matrix.define_constraint("universe", Key::new().with(Elem::One, 1)).unwrap();
        matrix.define_choice(Key::new().with(Elem::One, 1)).unwrap();

        assert_eq!(
            matrix.define_constraint("universe", Key::new().with(Elem::Two, 1)),
            Err(BuildError::ConstraintAfterChoice)
        );
    }

    #[test]
    fn duplicate_choices_are_rejected() {
        let mut matrix = Matrix::new();
        matrix.define_constraint("universe", Key::new().with(Elem::One, 1)).unwrap();
        matrix.define_choice(Key::new().with(Elem::One, 1)).unwrap();

        assert_eq!(matrix.define_choice(Key::new().with(Elem::One, 1)), Err(BuildError::DuplicateChoice));
    }

    #[test]
    fn unknown_keys_look_up_to_nothing() {
        let (matrix, _) = knuth_example();
        assert_eq!(matrix.choice(&subset(&[Elem::One, Elem::Two])), None);
    }

    #[test]
    fn cover_then_uncover_restores_everything() {
        let (mut matrix, _) = knuth_example();
        let before = matrix.to_string();

        let constraint = matrix.most_constrained().unwrap();
        matrix.cover(constraint);
        assert_ne!(matrix.to_string(), before);
        matrix.uncover(constraint);
        assert_eq!(matrix.to_string(), before);
    }

    #[test]
    fn nested_covers_unwind_in_reverse() {
        let (mut matrix, choices) = knuth_example();
        let before = matrix.to_string();

        // rows 1 and 3 are disjoint, so the second cover is legal under the first
        matrix.cover_row(choices[1]);
        let middle = matrix.to_string();
        matrix.cover_row(choices[3]);
        matrix.uncover_row(choices[3]);
        assert_eq!(matrix.to_string(), middle);
        matrix.uncover_row(choices[1]);
        assert_eq!(matrix.to_string(), before);
    }

    #[test]
    fn dropped_locks_restore_their_row() {
        let (mut matrix, choices) = knuth_example();
        let before = matrix.to_string();

        let lock = matrix.lock_row(choices[0]);
        drop(lock);
        assert_eq!(matrix.to_string(), before);

        let mut lock = matrix.lock_row(choices[0]);
        let covered = lock.matrix().to_string();
        lock.keep();
        assert_eq!(matrix.to_string(), covered);
    }

    #[test]
    fn finds_the_unique_cover() {
        let (mut matrix, choices) = knuth_example();

        let mut solution = matrix.solve().unwrap();
        solution.sort();
        assert_eq!(solution, vec![choices[1], choices[3], choices[5]]);
    }

    #[test]
    fn identical_builds_solve_identically() {
        let (mut first, _) = knuth_example();
        let (mut second, _) = knuth_example();
        assert_eq!(first.solve().unwrap(), second.solve().unwrap());
    }

    #[test]
    fn empty_matrix_is_trivially_covered() {
        let mut matrix = Matrix::<Elem>::new();
        assert_eq!(matrix.solve(), Ok(vec![]));
    }

    #[test]
    fn starved_constraints_fail_without_disturbance() {
        let mut matrix = Matrix::new();
        matrix.define_constraint("universe", Key::new().with(Elem::One, 1)).unwrap();
        matrix.define_constraint("universe", Key::new().with(Elem::Two, 1)).unwrap();
        matrix.define_choice(Key::new().with(Elem::Two, 1)).unwrap();

        let before = matrix.to_string();
        assert_eq!(matrix.solve(), Err(Unsatisfiable));
        assert_eq!(matrix.to_string(), before);
    }

    #[test]
    fn repeated_givens_are_a_noop() {
        let (mut matrix, choices) = knuth_example();

        matrix.apply_given(choices[1]).unwrap();
        let covered = matrix.to_string();
        matrix.apply_given(choices[1]).unwrap();
        assert_eq!(matrix.to_string(), covered);
        assert_eq!(matrix.givens(), &[choices[1]]);
    }

    #[test]
    fn conflicting_givens_are_unsatisfiable() {
        let (mut matrix, choices) = knuth_example();

        // rows 0 and 1 both claim elements one and four
        matrix.apply_given(choices[1]).unwrap();
        let covered = matrix.to_string();
        assert_eq!(matrix.apply_given(choices[0]), Err(Unsatisfiable));
        assert_eq!(matrix.to_string(), covered);
        assert_eq!(matrix.solve(), Err(Unsatisfiable));
    }

    #[test]
    fn dump_shows_the_live_structure() {
        let mut matrix = Matrix::new();
        matrix.define_constraint("demo", Key::new().with(SudokuDim::Row, 1)).unwrap();
        matrix.define_constraint("demo", Key::new().with(SudokuDim::Col, 1)).unwrap();
        matrix.define_choice(Key::new().with(SudokuDim::Row, 1)).unwrap();
        matrix.define_choice(Key::new().with(SudokuDim::Row, 1).with(SudokuDim::Col, 1)).unwrap();
        matrix.define_choice(Key::new().with(SudokuDim::Col, 1)).unwrap();

        assert_eq!(matrix.to_string(), "2 live constraints x 3 choices
group dd
  row 1
  col  1
  box
  num
count 22
    0 x  (row 1)
    1 xx (row 1, col 1)
    2  x (col 1)
")
    }

    #[test]
    fn solves_the_classic_puzzle() {
        let grid = Sudoku::new().solve(CLASSIC).unwrap();

        assert_eq!(grid.to_string(), "534678912
672195348
198342567
859761423
426853791
713924856
961537284
287419635
345286179
");
        assert_eq!(grid.get(1, 3), 4);
    }

    #[test]
    fn givens_stay_locked_while_search_fills_the_rest() {
        let mut matrix = Sudoku::new().matrix;

        for (row, col) in iproduct!(0..9usize, 0..9usize) {
            let num = CLASSIC[row][col];
            if num == 0 {
                continue;
            }
            let given = matrix.choice(&placement(row as u8 + 1, col as u8 + 1, num)).unwrap();
            matrix.apply_given(given).unwrap();
        }
        assert_eq!(matrix.givens().len(), 30);

        let solution = matrix.solve().unwrap();
        assert_eq!(solution.len(), 51);
    }

    #[test]
    fn contradictory_sudoku_givens_poison_the_matrix() {
        let mut matrix = Sudoku::new().matrix;

        let first = matrix.choice(&placement(1, 1, 5)).unwrap();
        let second = matrix.choice(&placement(1, 1, 6)).unwrap();
        matrix.apply_given(first).unwrap();
        assert_eq!(matrix.apply_given(second), Err(Unsatisfiable));
        assert_eq!(matrix.solve(), Err(Unsatisfiable));
    }

    #[test]
    fn repeated_digit_in_a_row_is_unsatisfiable() {
        let mut puzzle = CLASSIC;
        puzzle[0][8] = 5;

        assert_eq!(Sudoku::new().solve(puzzle).err(), Some(Unsatisfiable));
    }

    #[test]
    fn search_dead_ends_are_unsatisfiable() {
        // row 1 pins digits 1 through 8, forcing 9 into its last cell, but column 9 already has one
        let mut puzzle = [[0u8; 9]; 9];
        for col in 0..8 {
            puzzle[0][col] = col as u8 + 1;
        }
        puzzle[1][8] = 9;

        assert_eq!(Sudoku::new().solve(puzzle).err(), Some(Unsatisfiable));
    }

    #[test]
    fn empty_puzzles_fill_completely_and_deterministically() {
        let grid = Sudoku::new().solve([[0; 9]; 9]).unwrap();

        let everything: HashSet<u8> = (1..=9).collect();
        for unit in 0..9usize {
            assert_eq!((1..=9).map(|col| grid.get(unit + 1, col)).collect::<HashSet<_>>(), everything);
            assert_eq!((1..=9).map(|row| grid.get(row, unit + 1)).collect::<HashSet<_>>(), everything);
            let in_box = iproduct!(0..3usize, 0..3usize)
                .map(|(r, c)| grid.get(3 * (unit / 3) + r + 1, 3 * (unit % 3) + c + 1))
                .collect::<HashSet<_>>();
            assert_eq!(in_box, everything);
        }

        assert_eq!(grid, Sudoku::new().solve([[0; 9]; 9]).unwrap());
    }
}
