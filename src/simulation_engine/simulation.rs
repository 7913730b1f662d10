// simulation.rs
use crate::control_system::Intersection;
use crate::models::{Direction, Vehicle};
use crate::simulation_engine::audit::CollisionAudit;
use crate::simulation_engine::config::{ConfigError, SimulationConfig};
use crate::simulation_engine::report::{write_trip_log, SimulationReport, TripRecord};

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn vehicle thread {thread}: {source}")]
    Spawn {
        thread: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Vehicle thread {thread} panicked")]
    VehiclePanicked { thread: usize },

    #[error("Intersection still shared after all vehicles finished")]
    IntersectionShared,

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Failed to write trip log {path}: {source}")]
    TripLog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Timing for one vehicle thread.
#[derive(Debug, Clone, Copy)]
struct TripPlan {
    trips: usize,
    inter_arrival: Duration,
    crossing: Duration,
}

/// Picks an origin and one of the three other approaches as destination.
pub fn random_vehicle<R: Rng + ?Sized>(rng: &mut R) -> Vehicle {
    let origin: Direction = rng.random();
    let destination = origin.rotate_clockwise(rng.random_range(1..4));
    Vehicle::new(origin, destination)
}

/// Drives one stream of vehicles through the intersection, one trip at a
/// time, and returns what each trip waited.
fn simulate_vehicle_stream(
    thread: usize,
    seed: u64,
    plan: TripPlan,
    intersection: &Intersection,
    audit: &CollisionAudit,
) -> Vec<TripRecord> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(plan.trips);

    for trip in 0..plan.trips {
        thread::sleep(plan.inter_arrival);
        let vehicle = random_vehicle(&mut rng);

        let arrived = Instant::now();
        intersection.enter(vehicle.origin, vehicle.destination);
        let waited = arrived.elapsed();

        if audit.arrive(vehicle) > 0 {
            warn!(
                "Thread {} trip {}: vehicle {} admitted into a conflict",
                thread, trip, vehicle
            );
        }
        thread::sleep(plan.crossing);
        audit.depart(vehicle);
        intersection.exit(vehicle.origin, vehicle.destination);

        records.push(TripRecord {
            thread,
            trip,
            origin: vehicle.origin,
            destination: vehicle.destination,
            wait_us: waited.as_micros() as u64,
        });
    }

    debug!("Vehicle thread {} finished {} trips", thread, plan.trips);
    records
}

/// Runs the full simulation: one thread per vehicle stream, all sharing a
/// single intersection, then tears the intersection down and summarizes.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, SimulationError> {
    config.validate()?;

    let intersection = Arc::new(Intersection::with_policy(config.policy.build()));
    let audit = Arc::new(CollisionAudit::new());
    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let plan = TripPlan {
        trips: config.trips_per_thread,
        inter_arrival: Duration::from_millis(config.inter_arrival_ms),
        crossing: Duration::from_millis(config.crossing_ms),
    };

    info!(
        "Starting simulation: {} threads x {} trips, {:?} policy, seed {}",
        config.vehicle_threads, config.trips_per_thread, config.policy, base_seed
    );
    let started = Instant::now();

    let mut handles: Vec<JoinHandle<Vec<TripRecord>>> = Vec::new();
    for index in 0..config.vehicle_threads {
        let intersection = Arc::clone(&intersection);
        let audit = Arc::clone(&audit);
        let seed = base_seed.wrapping_add(index as u64);
        let handle = thread::Builder::new()
            .name(format!("vehicle-{}", index))
            .spawn(move || simulate_vehicle_stream(index, seed, plan, &intersection, &audit))
            .map_err(|source| SimulationError::Spawn {
                thread: index,
                source,
            })?;
        handles.push(handle);
    }

    let mut trips = Vec::new();
    for (index, handle) in handles.into_iter().enumerate() {
        let records = handle
            .join()
            .map_err(|_| SimulationError::VehiclePanicked { thread: index })?;
        trips.extend(records);
    }
    let elapsed = started.elapsed();

    let intersection =
        Arc::try_unwrap(intersection).map_err(|_| SimulationError::IntersectionShared)?;
    let leftover = intersection.teardown();

    if let Some(path) = &config.trip_log {
        write_trip_log(path, &trips).map_err(|source| SimulationError::TripLog {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {} trips to {}", trips.len(), path.display());
    }

    let report = SimulationReport::from_trips(
        config.policy,
        &trips,
        audit.violations(),
        audit.peak_occupancy(),
        leftover,
        elapsed,
    );
    info!(
        "Simulation finished: {} trips in {} ms",
        report.total_trips, report.elapsed_ms
    );
    Ok(report)
}
