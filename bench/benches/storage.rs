//! Storage microbenchmarks using Criterion.
//!
//! These measure the storage core in isolation:
//! - Typed column append throughput
//! - Erased column append throughput through the typed boundary
//! - Entity creation (archetype resolution + column growth)

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use strata_bench::{Position, Transform, Velocity};
use strata_ecs::{
    World,
    component::Info,
    storage::{ErasedColumn, SystemAllocator, TypedColumn},
};

fn bench_typed_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_append");
    let allocator = SystemAllocator;

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("position", count), &count, |b, &n| {
            b.iter(|| {
                let mut column = TypedColumn::<Position>::new();
                let mut len = 0;
                for i in 0..n {
                    column
                        .append(
                            &allocator,
                            Position {
                                x: i as f32,
                                y: 0.0,
                                z: 0.0,
                            },
                            &mut len,
                        )
                        .unwrap();
                }
                black_box(column.capacity());
                column.deinit(&allocator, len);
            });
        });
    }

    group.finish();
}

fn bench_erased_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("erased_append");
    let allocator = SystemAllocator;

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("transform", count), &count, |b, &n| {
            b.iter(|| {
                let mut column = ErasedColumn::new(Info::new::<Transform>());
                let mut len = 0;
                for _ in 0..n {
                    column
                        .append(&allocator, Transform::default(), &mut len)
                        .unwrap();
                }
                black_box(column.capacity());
                column.deinit(&allocator, len);
            });
        });
    }

    group.finish();
}

fn bench_create_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entity");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("two_components", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::default();
                for _ in 0..n {
                    black_box(world.create_entity::<(Position, Velocity)>().unwrap().id());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_typed_append,
    bench_erased_append,
    bench_create_entity
);
criterion_main!(benches);
