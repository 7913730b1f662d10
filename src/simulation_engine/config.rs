use crate::control_system::PolicyKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// One OS thread is spawned per vehicle stream.
pub const MAX_VEHICLE_THREADS: usize = 1024;
/// Every trip is kept in memory until the report is built.
pub const MAX_TOTAL_TRIPS: usize = 10_000_000;

/// Settings for one simulation run. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Concurrent vehicle threads.
    pub vehicle_threads: usize,
    /// Trips each thread makes through the intersection.
    pub trips_per_thread: usize,
    /// Pause before each arrival, in milliseconds.
    pub inter_arrival_ms: u64,
    /// Time spent inside the intersection, in milliseconds.
    pub crossing_ms: u64,
    pub policy: PolicyKind,
    /// Base RNG seed. Drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Optional CSV file receiving one row per trip.
    pub trip_log: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vehicle_threads: 10,
            trips_per_thread: 100,
            inter_arrival_ms: 1,
            crossing_ms: 1,
            policy: PolicyKind::RightTurn,
            seed: None,
            trip_log: None,
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimulationConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vehicle_threads == 0 {
            return Err(ConfigError::Invalid {
                field: "vehicle_threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.vehicle_threads > MAX_VEHICLE_THREADS {
            return Err(ConfigError::Invalid {
                field: "vehicle_threads",
                reason: format!("must be at most {}", MAX_VEHICLE_THREADS),
            });
        }
        if self.trips_per_thread == 0 {
            return Err(ConfigError::Invalid {
                field: "trips_per_thread",
                reason: "must be at least 1".to_string(),
            });
        }
        match self.vehicle_threads.checked_mul(self.trips_per_thread) {
            Some(total) if total <= MAX_TOTAL_TRIPS => Ok(()),
            _ => Err(ConfigError::Invalid {
                field: "trips_per_thread",
                reason: format!(
                    "{} threads x {} trips exceeds {} total trips",
                    self.vehicle_threads, self.trips_per_thread, MAX_TOTAL_TRIPS
                ),
            }),
        }
    }

    /// Saturates instead of overflowing; `validate` bounds the real value.
    pub fn total_trips(&self) -> usize {
        self.vehicle_threads.saturating_mul(self.trips_per_thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_ten_threads_of_a_hundred_trips() {
        let config = SimulationConfig::default();
        assert_eq!(config.vehicle_threads, 10);
        assert_eq!(config.trips_per_thread, 100);
        assert_eq!(config.total_trips(), 1000);
        assert_eq!(config.policy, PolicyKind::RightTurn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(r#"{ "vehicle_threads": 4, "policy": "single_file", "seed": 9 }"#);
        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.vehicle_threads, 4);
        assert_eq!(config.policy, PolicyKind::SingleFile);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.trips_per_thread, 100);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let file = write_config(r#"{ "lanes": 3 }"#);
        let err = SimulationConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let file = write_config(r#"{ "vehicle_threads": 0 }"#);
        let err = SimulationConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "vehicle_threads",
                ..
            }
        ));
    }

    #[test]
    fn too_many_threads_is_rejected() {
        let config = SimulationConfig {
            vehicle_threads: usize::MAX,
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "vehicle_threads",
                ..
            }
        ));
    }

    #[test]
    fn overflowing_trip_total_is_rejected() {
        let config = SimulationConfig {
            vehicle_threads: MAX_VEHICLE_THREADS,
            trips_per_thread: usize::MAX / 2,
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "trips_per_thread",
                ..
            }
        ));
        assert_eq!(config.total_trips(), usize::MAX);
    }

    #[test]
    fn limits_themselves_are_accepted() {
        let config = SimulationConfig {
            vehicle_threads: MAX_VEHICLE_THREADS,
            trips_per_thread: MAX_TOTAL_TRIPS / MAX_VEHICLE_THREADS,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulationConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }
}
