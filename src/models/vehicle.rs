use crate::models::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vehicle crossing the intersection, identified only by where it comes
/// from and where it is heading. Two vehicles on the same path compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    pub origin: Direction,
    pub destination: Direction,
}

impl Vehicle {
    /// Creates a vehicle. A vehicle never leaves the way it came in, so
    /// `origin == destination` is a caller bug and panics.
    pub fn new(origin: Direction, destination: Direction) -> Self {
        assert_ne!(
            origin, destination,
            "vehicle cannot leave through its own approach ({})",
            origin
        );
        Self {
            origin,
            destination,
        }
    }

    /// True for the four smallest-arc turns: north->west, east->north,
    /// south->east and west->south.
    pub fn is_right_turn(&self) -> bool {
        matches!(
            (self.origin, self.destination),
            (Direction::North, Direction::West)
                | (Direction::East, Direction::North)
                | (Direction::South, Direction::East)
                | (Direction::West, Direction::South)
        )
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}
