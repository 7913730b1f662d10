//! Process-wide intersection for drivers that only know the four entry
//! points. Each call delegates to one shared [`Intersection`].

use crate::control_system::error::SynchError;
use crate::control_system::intersection::Intersection;
use crate::models::Direction;
use log::info;
use std::sync::{Arc, PoisonError, RwLock};

static INTERSECTION: RwLock<Option<Arc<Intersection>>> = RwLock::new(None);

fn installed() -> Result<Arc<Intersection>, SynchError> {
    let slot = INTERSECTION.read().unwrap_or_else(PoisonError::into_inner);
    slot.as_ref().map(Arc::clone).ok_or(SynchError::NotInitialized)
}

/// Installs an empty intersection. Call once before any vehicle activity.
pub fn intersection_sync_init() -> Result<(), SynchError> {
    let mut slot = INTERSECTION.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(SynchError::AlreadyInitialized);
    }
    *slot = Some(Arc::new(Intersection::initialize()));
    info!("Intersection initialized");
    Ok(())
}

/// Tears the installed intersection down once all vehicles are done and
/// returns how many were still inside.
///
/// Fails with [`SynchError::StillInUse`] while an `enter`/`exit` call is in
/// flight; the intersection stays installed in that case.
pub fn intersection_sync_cleanup() -> Result<usize, SynchError> {
    let mut slot = INTERSECTION.write().unwrap_or_else(PoisonError::into_inner);
    let intersection = slot.take().ok_or(SynchError::NotInitialized)?;
    match Arc::try_unwrap(intersection) {
        Ok(intersection) => {
            let leftover = intersection.teardown();
            info!("Intersection cleaned up");
            Ok(leftover)
        }
        Err(shared) => {
            let holders = Arc::strong_count(&shared) - 1;
            *slot = Some(shared);
            Err(SynchError::StillInUse { holders })
        }
    }
}

/// Blocks until a vehicle from `origin` to `destination` may enter.
pub fn intersection_before_entry(
    origin: Direction,
    destination: Direction,
) -> Result<(), SynchError> {
    installed()?.enter(origin, destination);
    Ok(())
}

/// Reports that a vehicle from `origin` to `destination` has left.
pub fn intersection_after_exit(
    origin: Direction,
    destination: Direction,
) -> Result<(), SynchError> {
    installed()?.exit(origin, destination);
    Ok(())
}
