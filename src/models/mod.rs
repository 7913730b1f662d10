// models/mod.rs
pub mod direction;
pub mod vehicle;

pub use direction::Direction;
pub use vehicle::Vehicle;
