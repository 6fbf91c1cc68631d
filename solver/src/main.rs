use std::env;

use quadrille::{Sudoku, Unsatisfiable};

/// Read a puzzle given as 81 cells in reading order, `.` or `0` for a blank.
fn parse(text: &str) -> [[u8; 9]; 9] {
    assert_eq!(text.len(), 81, "expected 81 cells, got {}", text.len());

    let mut puzzle = [[0u8; 9]; 9];
    for (index, ch) in text.chars().enumerate() {
        puzzle[index / 9][index % 9] = match ch {
            '.' | '0' => 0,
            '1'..='9' => ch as u8 - b'0',
            other => panic!("no cell {:?} in sudoku", other),
        };
    }

    puzzle
}

fn main() {
    let puzzle = match env::args().nth(1) {
        Some(text) => parse(&text),
        // the classic puzzle from wikipedia's sudoku article
        None => [
            [5, 3, 0, 0, 7, 0, 0, 0, 0],
            [6, 0, 0, 1, 9, 5, 0, 0, 0],
            [0, 9, 8, 0, 0, 0, 0, 6, 0],
            [8, 0, 0, 0, 6, 0, 0, 0, 3],
            [4, 0, 0, 8, 0, 3, 0, 0, 1],
            [7, 0, 0, 0, 2, 0, 0, 0, 6],
            [0, 6, 0, 0, 0, 0, 2, 8, 0],
            [0, 0, 0, 4, 1, 9, 0, 0, 5],
            [0, 0, 0, 0, 8, 0, 0, 7, 9],
        ],
    };

    match Sudoku::new().solve(puzzle) {
        Ok(grid) => print!("{}", grid),
        Err(Unsatisfiable) => println!("no solution"),
    }
}
