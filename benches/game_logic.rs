use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prism_tetris::core::{ActivePiece, GameConfig, GameController, Grid, PieceQueue};
use prism_tetris::types::{GameCommand, PieceKind};

fn playing() -> GameController {
    let mut game = GameController::new(GameConfig {
        seed: 12345,
        ..GameConfig::instant()
    });
    game.apply(GameCommand::Start);
    game
}

fn bench_tick(c: &mut Criterion) {
    let mut game = playing();

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(16));
            if game.active().is_none() {
                game.apply(GameCommand::Restart);
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let full = ["IIIIIIIIII"; 4];

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut grid = Grid::from_rows(10, 20, 2, &full);
            let rows = grid.find_completed_rows();
            black_box(grid.clear_rows(&rows));
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut game = playing();

    c.bench_function("hard_drop_and_spawn", |b| {
        b.iter(|| {
            if !game.apply(GameCommand::HardDrop) {
                game.apply(GameCommand::Restart);
            }
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let grid = Grid::standard();
    let config = GameConfig::default();
    let mut piece = ActivePiece::spawn(PieceKind::T, &grid, &config).unwrap();

    c.bench_function("move_left_right", |b| {
        b.iter(|| {
            piece.move_right(&grid);
            piece.move_left(&grid);
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let grid = Grid::standard();
    let config = GameConfig::default();
    let mut piece = ActivePiece::spawn(PieceKind::T, &grid, &config).unwrap();

    c.bench_function("rotate_cw", |b| {
        b.iter(|| {
            black_box(piece.rotate_cw(&grid));
        })
    });
}

fn bench_bag(c: &mut Criterion) {
    let mut queue = PieceQueue::new(12345);

    c.bench_function("bag_next", |b| b.iter(|| black_box(queue.next())));
}

fn bench_snapshot(c: &mut Criterion) {
    let game = playing();
    let mut snapshot = game.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| game.snapshot_into(black_box(&mut snapshot)))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop,
    bench_move,
    bench_rotate,
    bench_bag,
    bench_snapshot
);
criterion_main!(benches);
