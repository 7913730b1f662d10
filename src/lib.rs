//! Admission control for a single four-way intersection.
//!
//! Vehicles arrive from one of four approaches and ask to leave through one
//! of the other three. [`control_system::Intersection`] lets vehicles whose
//! paths cannot collide cross together and makes the rest wait until the
//! vehicle blocking them has left. [`simulation_engine`] drives the
//! intersection with many concurrent vehicle threads and audits the result.

pub mod control_system;
pub mod models;
pub mod simulation_engine;
