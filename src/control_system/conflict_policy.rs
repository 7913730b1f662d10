use crate::models::Vehicle;
use serde::{Deserialize, Serialize};

/// Decides whether two vehicles may be inside the intersection together.
///
/// Implementations must be symmetric: `conflicts(a, b) == conflicts(b, a)`.
pub trait EntryPolicy: Send + Sync {
    fn conflicts(&self, candidate: &Vehicle, occupant: &Vehicle) -> bool;

    /// Scans the occupants in order and returns the first one blocking the
    /// candidate, if any.
    fn first_conflict<'a>(
        &self,
        candidate: &Vehicle,
        occupants: &'a [Vehicle],
    ) -> Option<&'a Vehicle> {
        occupants
            .iter()
            .find(|occupant| self.conflicts(candidate, occupant))
    }

    fn can_enter(&self, candidate: &Vehicle, occupants: &[Vehicle]) -> bool {
        self.first_conflict(candidate, occupants).is_none()
    }
}

/// Compass rule with the right-turn exemption. Vehicles from the same
/// approach never collide, nor do vehicles passing straight by each other
/// in opposite directions. Different exits only collide when neither
/// vehicle is turning right. A shared exit always collides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RightTurnPolicy;

impl EntryPolicy for RightTurnPolicy {
    fn conflicts(&self, candidate: &Vehicle, occupant: &Vehicle) -> bool {
        conflicts(candidate, occupant)
    }
}

/// Admits one vehicle at a time regardless of path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleFilePolicy;

impl EntryPolicy for SingleFilePolicy {
    fn conflicts(&self, _candidate: &Vehicle, _occupant: &Vehicle) -> bool {
        true
    }
}

/// Selects an [`EntryPolicy`] from configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    RightTurn,
    SingleFile,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn EntryPolicy> {
        match self {
            PolicyKind::RightTurn => Box::new(RightTurnPolicy),
            PolicyKind::SingleFile => Box::new(SingleFilePolicy),
        }
    }
}

/// Returns true when `candidate` may not enter while `occupant` is inside.
pub fn conflicts(candidate: &Vehicle, occupant: &Vehicle) -> bool {
    if candidate.origin == occupant.origin {
        return false;
    }
    if candidate.origin == occupant.destination && candidate.destination == occupant.origin {
        return false;
    }
    if candidate.destination != occupant.destination {
        return !(candidate.is_right_turn() || occupant.is_right_turn());
    }
    // Same exit lane.
    true
}
