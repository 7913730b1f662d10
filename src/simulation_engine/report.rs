use crate::control_system::PolicyKind;
use crate::models::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// One trip through the intersection, as written to the trip log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub thread: usize,
    pub trip: usize,
    pub origin: Direction,
    pub destination: Direction,
    /// Time spent blocked in `enter`, in microseconds.
    pub wait_us: u64,
}

/// Wait statistics for vehicles arriving from one approach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApproachStats {
    pub trips: usize,
    pub mean_wait_us: f64,
    pub max_wait_us: u64,
}

/// Summary of a finished simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub policy: PolicyKind,
    pub total_trips: usize,
    pub per_origin: BTreeMap<Direction, ApproachStats>,
    pub mean_wait_us: f64,
    pub max_wait_us: u64,
    /// Pairs of conflicting vehicles seen inside together. Always 0 unless
    /// the admission protocol is broken.
    pub violations: usize,
    pub peak_occupancy: usize,
    /// Vehicles still inside at teardown.
    pub leftover_vehicles: usize,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    pub fn from_trips(
        policy: PolicyKind,
        trips: &[TripRecord],
        violations: usize,
        peak_occupancy: usize,
        leftover_vehicles: usize,
        elapsed: Duration,
    ) -> Self {
        let mut per_origin: BTreeMap<Direction, ApproachStats> = BTreeMap::new();
        let mut total_wait: u64 = 0;
        let mut max_wait_us: u64 = 0;

        for trip in trips {
            let stats = per_origin.entry(trip.origin).or_default();
            stats.trips += 1;
            // Running sum for now, turned into a mean below.
            stats.mean_wait_us += trip.wait_us as f64;
            stats.max_wait_us = stats.max_wait_us.max(trip.wait_us);
            total_wait += trip.wait_us;
            max_wait_us = max_wait_us.max(trip.wait_us);
        }
        for stats in per_origin.values_mut() {
            stats.mean_wait_us /= stats.trips as f64;
        }

        let mean_wait_us = if trips.is_empty() {
            0.0
        } else {
            total_wait as f64 / trips.len() as f64
        };

        Self {
            policy,
            total_trips: trips.len(),
            per_origin,
            mean_wait_us,
            max_wait_us,
            violations,
            peak_occupancy,
            leftover_vehicles,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// True when no collision was observed and the intersection drained.
    pub fn is_clean(&self) -> bool {
        self.violations == 0 && self.leftover_vehicles == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("Simulation finished ({:?} policy)", self.policy);
        println!(
            "  {} trips in {} ms, peak occupancy {}",
            self.total_trips, self.elapsed_ms, self.peak_occupancy
        );
        for (origin, stats) in &self.per_origin {
            println!(
                "  from {:<5}: {:>5} trips, mean wait {:>10.1} us, max wait {:>8} us",
                origin.to_string(),
                stats.trips,
                stats.mean_wait_us,
                stats.max_wait_us
            );
        }
        println!(
            "  overall mean wait {:.1} us, max wait {} us",
            self.mean_wait_us, self.max_wait_us
        );
        println!(
            "  collisions: {}, vehicles left inside: {}",
            self.violations, self.leftover_vehicles
        );
    }
}

/// Writes every trip to `path` as CSV with a header row.
pub fn write_trip_log(path: &Path, trips: &[TripRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for trip in trips {
        writer.serialize(trip)?;
    }
    writer.flush()?;
    Ok(())
}
