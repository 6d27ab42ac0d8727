// src/io/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("unexpected end of file at line {line}: expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("failed to parse POSCAR data: {details} (at line {line})")]
    Parse { line: usize, details: String },

    #[error("{species} species names given for {counts} atom counts")]
    CountMismatch { species: usize, counts: usize },

    #[error("lattice vectors are linearly dependent (cell volume {volume:.3e})")]
    SingularLattice { volume: f64 },
}

impl Error {
    pub fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line,
            details: details.into(),
        }
    }
}
