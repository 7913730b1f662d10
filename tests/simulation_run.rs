use traffic_synch::control_system::PolicyKind;
use traffic_synch::simulation_engine::config::SimulationConfig;
use traffic_synch::simulation_engine::simulation::run_simulation;

fn small_config(policy: PolicyKind) -> SimulationConfig {
    SimulationConfig {
        vehicle_threads: 6,
        trips_per_thread: 40,
        inter_arrival_ms: 0,
        crossing_ms: 1,
        policy,
        seed: Some(1234),
        trip_log: None,
    }
}

#[test]
fn right_turn_policy_runs_clean() {
    let report = run_simulation(&small_config(PolicyKind::RightTurn)).unwrap();
    assert_eq!(report.total_trips, 240);
    assert_eq!(report.violations, 0);
    assert_eq!(report.leftover_vehicles, 0);
    assert!(report.peak_occupancy >= 1);
    assert_eq!(
        report.per_origin.values().map(|s| s.trips).sum::<usize>(),
        240
    );
    assert!(report.is_clean());
}

#[test]
fn single_file_policy_never_overlaps() {
    let report = run_simulation(&small_config(PolicyKind::SingleFile)).unwrap();
    assert_eq!(report.total_trips, 240);
    assert_eq!(report.peak_occupancy, 1);
    assert!(report.is_clean());
}

#[test]
fn trip_log_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    let config = SimulationConfig {
        vehicle_threads: 2,
        trips_per_thread: 5,
        trip_log: Some(path.clone()),
        ..small_config(PolicyKind::RightTurn)
    };

    run_simulation(&config).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 10);
}
