// simulation_engine/mod.rs
pub mod audit;
pub mod config;
pub mod report;
pub mod simulation;
