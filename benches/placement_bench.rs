//! Criterion benchmarks for placement, thermal simulation and episodes.
//!
//! Uses the small, medium and large reference circuits.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pcb_placer::cost::CostWeights;
use pcb_placer::env::{run_episode, EnvConfig, PlacementEnv, RandomPolicy};
use pcb_placer::layout::{Board, Component, Connection, Problem};
use pcb_placer::random::create_rng;
use pcb_placer::sa::{random_layout, CoolingSchedule, PlacerConfig, SaConfig, SaPlacer};
use pcb_placer::thermal::{ThermalConfig, ThermalSimulator};

// ===========================================================================
// Reference circuits
// ===========================================================================

fn small_circuit() -> Problem {
    let components = vec![
        Component::new("U1", 10.0, 8.0).with_power(1.5),
        Component::new("U2", 8.0, 6.0).with_power(1.0),
        Component::new("C1", 3.0, 2.0),
        Component::new("C2", 3.0, 2.0),
        Component::new("R1", 2.0, 1.0),
        Component::new("R2", 2.0, 1.0),
    ];
    let connections = vec![
        Connection::new("U1", "U2", 2.0),
        Connection::new("U1", "C1", 1.5),
        Connection::new("U2", "C2", 1.5),
        Connection::new("U1", "R1", 1.0),
        Connection::new("R2", "C2", 1.0),
    ];
    Problem::new(Board::new(80.0, 60.0), components, connections).unwrap()
}

fn medium_circuit() -> Problem {
    let mut components = vec![
        Component::new("MCU", 12.0, 10.0).with_power(1.0),
        Component::new("USB", 6.0, 4.0),
        Component::new("POWER", 8.0, 6.0).with_power(2.0),
        Component::new("LED1", 3.0, 3.0),
        Component::new("LED2", 3.0, 3.0),
        Component::new("SW1", 5.0, 5.0),
    ];
    components.extend((1..=5).map(|i| Component::new(format!("C{i}"), 3.0, 2.0)));
    components.extend((1..=3).map(|i| Component::new(format!("R{i}"), 2.0, 1.0)));
    let connections = [
        ("MCU", "USB", 2.0),
        ("MCU", "POWER", 2.5),
        ("MCU", "C1", 1.5),
        ("MCU", "C2", 1.5),
        ("POWER", "C3", 2.0),
        ("POWER", "C4", 2.0),
        ("POWER", "C5", 1.5),
        ("USB", "R1", 1.0),
        ("MCU", "R2", 1.0),
        ("R3", "LED1", 1.0),
        ("MCU", "LED2", 1.0),
        ("SW1", "MCU", 1.5),
    ]
    .into_iter()
    .map(|(a, b, w)| Connection::new(a, b, w))
    .collect();
    Problem::new(Board::new(120.0, 90.0), components, connections).unwrap()
}

fn large_circuit() -> Problem {
    let mut components: Vec<Component> = (1..=5)
        .map(|i| Component::new(format!("U{i}"), 10.0, 8.0).with_power(1.0))
        .collect();
    components.extend((1..=10).map(|i| Component::new(format!("C{i}"), 3.0, 2.0)));
    components.extend((1..=10).map(|i| Component::new(format!("R{i}"), 2.0, 1.0)));

    let mut connections = Vec::new();
    for i in 1..5 {
        connections.push(Connection::new(format!("U{i}"), format!("U{}", i + 1), 2.0));
    }
    for i in 1..=5 {
        connections.push(Connection::new(format!("U{i}"), format!("C{i}"), 1.5));
        connections.push(Connection::new(format!("U{i}"), format!("C{}", i + 5), 1.0));
        connections.push(Connection::new(format!("U{i}"), format!("R{i}"), 1.0));
        connections.push(Connection::new(format!("U{i}"), format!("R{}", i + 5), 1.0));
    }
    Problem::new(Board::new(150.0, 120.0), components, connections).unwrap()
}

fn circuits() -> [(&'static str, Problem); 3] {
    [
        ("small", small_circuit()),
        ("medium", medium_circuit()),
        ("large", large_circuit()),
    ]
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sa_wire_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_wire_only");
    group.sample_size(10);

    let sa = SaConfig::default()
        .with_initial_temperature(100.0)
        .with_final_temperature(0.1)
        .with_cooling(CoolingSchedule::Exponential { alpha: 0.995 })
        .with_max_iterations(1000)
        .with_seed(42);
    for (name, problem) in circuits() {
        let config = PlacerConfig::default().with_sa(sa.clone());
        group.bench_with_input(BenchmarkId::from_parameter(name), &(problem, config), |b, (p, c)| {
            b.iter(|| {
                let placer = SaPlacer::new(black_box(p), c.clone()).unwrap();
                black_box(placer.optimize())
            })
        });
    }
    group.finish();
}

fn bench_sa_thermal(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_thermal");
    group.sample_size(10);

    let problem = small_circuit();
    let config = PlacerConfig::default()
        .with_sa(SaConfig::default().with_max_iterations(100).with_seed(42))
        .with_weights(CostWeights::new(1.0, 0.5))
        .with_thermal(ThermalConfig::default().with_iterations(20));
    group.bench_function("small", |b| {
        b.iter(|| {
            let placer = SaPlacer::new(black_box(&problem), config.clone()).unwrap();
            black_box(placer.optimize())
        })
    });
    group.finish();
}

fn bench_thermal_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("thermal_simulation");
    group.sample_size(20);

    for (name, problem) in circuits() {
        let mut rng = create_rng(7);
        let layout = random_layout(&problem, 100, &mut rng).unwrap();
        let simulator = ThermalSimulator::new(ThermalConfig::default());
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(problem, layout),
            |b, (p, l)| b.iter(|| black_box(simulator.simulate(black_box(p), black_box(l)))),
        );
    }
    group.finish();
}

fn bench_random_episode(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_episode");

    for (name, problem) in circuits() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &problem, |b, p| {
            let mut env = PlacementEnv::new(p, EnvConfig::default().with_seed(1)).unwrap();
            let mut policy = RandomPolicy::seeded(2);
            b.iter(|| black_box(run_episode(&mut env, &mut policy)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sa_wire_only,
    bench_sa_thermal,
    bench_thermal_simulation,
    bench_random_episode
);
criterion_main!(benches);
