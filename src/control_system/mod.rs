// control_system/mod.rs
pub mod conflict_policy;
pub mod error;
pub mod global;
pub mod intersection;

pub use conflict_policy::{
    conflicts, EntryPolicy, PolicyKind, RightTurnPolicy, SingleFilePolicy,
};
pub use error::SynchError;
pub use intersection::Intersection;
