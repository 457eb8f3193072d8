//! # Interpreter Benchmarks
//!
//! Block discovery, exit search, instruction execution and whole runs.
//!
//! Run: `cargo bench --bench vm_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use piet_core::prelude::*;
use piet_core::vm::{StackMachine, find_block, search};

/// Flood fill over uniform and random grids
fn bench_find_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_block");

    for size in [16usize, 64, 256] {
        let uniform = Grid::new(size, size, Color::Red).unwrap();
        group.bench_with_input(BenchmarkId::new("uniform", size), &uniform, |b, grid| {
            let seed = grid.codel(0, 0).unwrap();
            b.iter(|| black_box(find_block(grid, seed).len()))
        });

        let random = GridBuilder::new().width(size).height(size).seed(7).build().unwrap();
        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, grid| {
            let seed = grid.codel(size / 2, size / 2).unwrap();
            b.iter(|| black_box(find_block(grid, seed).len()))
        });
    }

    group.finish();
}

/// Worst case search: every attempt blocked
fn bench_search_exhausted(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [8usize, 64] {
        let grid = Grid::new(size, size, Color::Blue).unwrap();
        let block = find_block(&grid, grid.codel(0, 0).unwrap());
        group.bench_with_input(BenchmarkId::new("exhausted", size), &block, |b, block| {
            b.iter(|| {
                let mut pointer = PointerState::default();
                black_box(search(&grid, block, &mut pointer))
            })
        });
    }

    group.finish();
}

/// Arithmetic and roll on a warm stack
fn bench_machine(c: &mut Criterion) {
    let mut group = c.benchmark_group("machine");

    group.bench_function("push_add", |b| {
        let mut io = BufferedIo::new();
        let mut pointer = PointerState::default();
        b.iter(|| {
            let mut machine = StackMachine::new();
            for _ in 0..64 {
                let _ = machine.execute(Instruction::Push, 3, &mut pointer, &mut io);
            }
            for _ in 0..63 {
                let _ = machine.execute(Instruction::Add, 0, &mut pointer, &mut io);
            }
            black_box(machine.stack().peek())
        })
    });

    group.bench_function("roll_deep", |b| {
        let mut io = BufferedIo::new();
        let mut pointer = PointerState::default();
        let base: Vec<i64> = (0..1024).collect();
        b.iter(|| {
            let mut stack = base.clone();
            stack.extend([1000, 17]);
            let mut machine = StackMachine::with_stack(OperandStack::from(stack));
            black_box(machine.execute(Instruction::Roll, 0, &mut pointer, &mut io))
        })
    });

    group.finish();
}

/// Steps per second on a program that bounces through white forever
fn bench_controller_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller");
    let grid = Grid::from_rows(vec![vec![Color::Red, Color::White, Color::Green]]).unwrap();

    for steps in [1_000u64, 10_000] {
        group.bench_with_input(BenchmarkId::new("white_bounce", steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut io = BufferedIo::new();
                let config = ControllerConfig::default().with_max_steps(steps);
                let mut controller = ExecutionController::start(&grid, config);
                black_box(controller.run(&mut io))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_find_block,
    bench_search_exhausted,
    bench_machine,
    bench_controller_run
);
criterion_main!(benches);
