// src/physics/mod.rs
pub mod defects;
pub mod lattice;
pub mod naming;

pub use defects::{analyze, DefectConfig, DefectRecord, DefectReport, DefectSite, NeighborRecord};
pub use lattice::cartesian_distance;
