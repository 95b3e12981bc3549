use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweepsync_core::*;

fn open_board(config: GameConfig, mines: &[Coord2]) -> Board {
    let mut board = Board::with_generator(config, FixedMineGenerator::new(mines)).unwrap();
    board.subscribe(|change: PendingChange| {
        black_box(change);
    });
    board
}

fn bench_flood_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");

    group.bench_function("expert_single_mine", |b| {
        b.iter_batched(
            || open_board(GameConfig::new((30, 16), 1).unwrap(), &[(29, 15)]),
            |mut board| board.reveal(black_box((0, 0))).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("max_board_single_mine", |b| {
        b.iter_batched(
            || open_board(GameConfig::new((255, 255), 1).unwrap(), &[(254, 254)]),
            |mut board| board.reveal(black_box((0, 0))).unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("expert_random_first_click", |b| {
        let mut seed = 0;
        b.iter_batched(
            || {
                seed += 1;
                let mut board = Board::new(GameConfig::expert(), seed).unwrap();
                board.subscribe(|change: PendingChange| {
                    black_box(change);
                });
                board
            },
            |mut board| board.reveal(black_box((15, 8))).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_flood_fill);
criterion_main!(benches);
