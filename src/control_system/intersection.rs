use crate::control_system::conflict_policy::{EntryPolicy, RightTurnPolicy};
use crate::models::{Direction, Vehicle};
use log::{debug, error, trace, warn};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Everything guarded by the intersection lock.
#[derive(Debug, Default)]
struct IntersectionState {
    /// Vehicles admitted and not yet exited, in admission order.
    occupants: Vec<Vehicle>,
    /// Threads currently suspended in `enter`.
    waiting: usize,
}

/// A single four-way intersection guarded as a monitor.
///
/// Vehicles call [`Intersection::enter`] before crossing and
/// [`Intersection::exit`] once they are through. `enter` blocks for as long
/// as the vehicle's path conflicts with any vehicle already inside. Every
/// exit wakes all waiting vehicles so each can re-check against the
/// smaller occupant set.
pub struct Intersection {
    state: Mutex<IntersectionState>,
    intersection_free: Condvar,
    policy: Box<dyn EntryPolicy>,
}

impl Intersection {
    /// Creates an empty intersection using the compass rule with the
    /// right-turn exemption.
    pub fn initialize() -> Self {
        Self::with_policy(Box::new(RightTurnPolicy))
    }

    pub fn with_policy(policy: Box<dyn EntryPolicy>) -> Self {
        Self {
            state: Mutex::new(IntersectionState::default()),
            intersection_free: Condvar::new(),
            policy,
        }
    }

    /// Blocks until the vehicle can cross without colliding with anyone
    /// inside, then records it as an occupant.
    ///
    /// Panics if `origin == destination`.
    pub fn enter(&self, origin: Direction, destination: Direction) {
        let incoming = Vehicle::new(origin, destination);
        let mut state = self.lock_state();

        // Rescan from the start after every wake: the set may have changed.
        while let Some(blocker) = self
            .policy
            .first_conflict(&incoming, &state.occupants)
            .copied()
        {
            trace!("Vehicle {} blocked by {}, waiting", incoming, blocker);
            state.waiting += 1;
            state = self.wait_for_exit(state);
            state.waiting -= 1;
            trace!("Vehicle {} woke, re-checking", incoming);
        }

        debug_assert!(
            state
                .occupants
                .iter()
                .all(|occupant| !self.policy.conflicts(&incoming, occupant)),
            "admitting {} would break the occupant invariant",
            incoming
        );
        state.occupants.push(incoming);
        debug!(
            "Vehicle {} entered ({} inside)",
            incoming,
            state.occupants.len()
        );
    }

    /// Removes the first occupant travelling `origin -> destination` and
    /// wakes every waiting vehicle.
    ///
    /// Returns `false` without waking anyone when no such vehicle is inside;
    /// that is a caller error and is only logged.
    pub fn exit(&self, origin: Direction, destination: Direction) -> bool {
        let mut state = self.lock_state();
        let position = state
            .occupants
            .iter()
            .position(|v| v.origin == origin && v.destination == destination);

        match position {
            Some(index) => {
                let leaving = state.occupants.remove(index);
                debug!(
                    "Vehicle {} exited ({} inside, {} waiting)",
                    leaving,
                    state.occupants.len(),
                    state.waiting
                );
                self.intersection_free.notify_all();
                true
            }
            None => {
                warn!(
                    "Exit for {}->{} ignored: no such vehicle inside",
                    origin, destination
                );
                false
            }
        }
    }

    /// Snapshot of the vehicles currently inside, in admission order.
    pub fn occupants(&self) -> Vec<Vehicle> {
        self.lock_state().occupants.clone()
    }

    /// Number of vehicles currently suspended in `enter`.
    pub fn waiting(&self) -> usize {
        self.lock_state().waiting
    }

    /// Consumes the intersection and returns how many vehicles were still
    /// inside. Leftovers are not an error but are reported, since a clean
    /// run always drains the intersection.
    pub fn teardown(self) -> usize {
        let state = match self.state.into_inner() {
            Ok(state) => state,
            Err(_) => invariant_broken("intersection state poisoned at teardown"),
        };
        let leftover = state.occupants.len();
        if leftover > 0 {
            warn!(
                "Tearing down intersection with {} vehicle(s) still inside: {:?}",
                leftover, state.occupants
            );
        } else {
            debug!("Intersection torn down empty");
        }
        leftover
    }

    fn lock_state(&self) -> MutexGuard<'_, IntersectionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => invariant_broken("intersection lock poisoned"),
        }
    }

    fn wait_for_exit<'a>(
        &self,
        guard: MutexGuard<'a, IntersectionState>,
    ) -> MutexGuard<'a, IntersectionState> {
        match self.intersection_free.wait(guard) {
            Ok(guard) => guard,
            Err(_) => invariant_broken("intersection lock poisoned while waiting"),
        }
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::initialize()
    }
}

/// A poisoned lock means a thread died mid-update and the occupant set can
/// no longer be trusted. Carrying on risks silent deadlock.
fn invariant_broken(what: &str) -> ! {
    error!("{}; aborting", what);
    std::process::abort()
}
