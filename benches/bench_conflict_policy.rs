// benches/bench_conflict_policy.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use traffic_synch::control_system::{EntryPolicy, RightTurnPolicy};
use traffic_synch::models::{Direction, Vehicle};

/// Every legal vehicle: 4 origins x 3 destinations.
fn all_vehicles() -> Vec<Vehicle> {
    Direction::ALL
        .iter()
        .flat_map(|&origin| {
            (1..4).map(move |turn| Vehicle::new(origin, origin.rotate_clockwise(turn)))
        })
        .collect()
}

fn bench_can_enter(c: &mut Criterion) {
    let candidates = all_vehicles();
    // Occupant sets that are legal under the compass rule, smallest first.
    let occupant_sets: Vec<Vec<Vehicle>> = vec![
        vec![],
        vec![Vehicle::new(Direction::North, Direction::South)],
        vec![
            Vehicle::new(Direction::North, Direction::South),
            Vehicle::new(Direction::South, Direction::North),
        ],
        vec![
            Vehicle::new(Direction::North, Direction::West),
            Vehicle::new(Direction::East, Direction::North),
            Vehicle::new(Direction::South, Direction::East),
            Vehicle::new(Direction::West, Direction::South),
        ],
    ];

    let mut group = c.benchmark_group("can_enter");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for occupants in &occupant_sets {
        group.bench_with_input(
            BenchmarkId::from_parameter(occupants.len()),
            occupants,
            |b, occupants| {
                b.iter(|| {
                    for candidate in &candidates {
                        black_box(RightTurnPolicy.can_enter(black_box(candidate), occupants));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_can_enter);
criterion_main!(benches);
