//! Cost of snapshotting deep obligation trees and containers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tabletop_turns::games::trail::{Location, TrailAction};
use tabletop_turns::obligation::Obligation;
use tabletop_turns::stack::{ObligationContainer, ObligationStack};

/// `depth` levels of repeats around every trail location's obligations.
fn deep_tree(depth: usize) -> Obligation<TrailAction> {
    let mut tree = Obligation::any(
        [Location::Crossing, Location::Ranch, Location::Station]
            .into_iter()
            .flat_map(Location::obligations),
    );
    for _ in 0..depth {
        tree = Obligation::repeat(
            0,
            2,
            Obligation::choice([tree, Obligation::optional(TrailAction::Move)]),
        );
    }
    tree
}

fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("obligation_clone");
    for depth in [1, 4, 16] {
        let tree = deep_tree(depth);
        group.bench_with_input(BenchmarkId::new("tree", depth), &tree, |b, tree| {
            b.iter(|| black_box(tree.clone()));
        });
    }

    let mut stack = ObligationStack::new();
    for _ in 0..64 {
        stack.push_one(deep_tree(4));
    }
    group.bench_function("stack_64", |b| b.iter(|| black_box(stack.clone())));
    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let tree = deep_tree(8);
    let json = tree.to_json().unwrap();

    c.bench_function("obligation_to_json", |b| {
        b.iter(|| black_box(tree.to_json().unwrap()))
    });
    c.bench_function("obligation_from_json", |b| {
        b.iter(|| black_box(Obligation::<TrailAction>::from_json(&json).unwrap()))
    });
}

criterion_group!(benches, bench_clone, bench_json);
criterion_main!(benches);
