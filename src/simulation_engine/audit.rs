use crate::control_system::conflicts;
use crate::models::Vehicle;
use log::error;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct AuditState {
    inside: Vec<Vehicle>,
    peak_occupancy: usize,
    violations: usize,
}

/// Independent record of who is inside the intersection, kept by the
/// driver to catch collisions the admission protocol should have prevented.
///
/// Vehicles register after `enter` returns and deregister before `exit`,
/// so the audit never sees a vehicle the intersection has not admitted.
#[derive(Debug, Default)]
pub struct CollisionAudit {
    state: Mutex<AuditState>,
}

impl CollisionAudit {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AuditState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an arriving vehicle and returns how many of the vehicles
    /// already inside it collides with.
    pub fn arrive(&self, vehicle: Vehicle) -> usize {
        let mut state = self.lock();
        let collisions = state
            .inside
            .iter()
            .filter(|other| conflicts(&vehicle, other))
            .inspect(|other| error!("Collision: {} entered alongside {}", vehicle, other))
            .count();
        state.violations += collisions;
        state.inside.push(vehicle);
        state.peak_occupancy = state.peak_occupancy.max(state.inside.len());
        collisions
    }

    pub fn depart(&self, vehicle: Vehicle) {
        let mut state = self.lock();
        if let Some(index) = state.inside.iter().position(|v| *v == vehicle) {
            state.inside.remove(index);
        }
    }

    pub fn violations(&self) -> usize {
        self.lock().violations
    }

    pub fn peak_occupancy(&self) -> usize {
        self.lock().peak_occupancy
    }

    pub fn inside(&self) -> usize {
        self.lock().inside.len()
    }
}
