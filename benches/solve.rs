use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadrille::Sudoku;

// the classic puzzle from wikipedia's sudoku article
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

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("classic puzzle", |b| b.iter(|| Sudoku::new().solve(black_box(CLASSIC))));
    c.bench_function("empty grid", |b| b.iter(|| Sudoku::new().solve(black_box([[0; 9]; 9]))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
