//! Point-defect identification for crystal structures.
//!
//! Compares a defect-containing structure with its perfect reference and
//! reports vacancies, substitutions and interstitials together with the
//! nearest-neighbor shell of each defect site.

pub mod cli;
pub mod config;
pub mod io;
pub mod model;
pub mod physics;
pub mod utils;
