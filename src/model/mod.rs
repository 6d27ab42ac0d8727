//src/model/mod.rs
pub mod elements;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{atomic_number, is_element};
pub use structure::{AtomSite, Configuration};
