// src/io/mod.rs
pub mod error;
pub mod poscar;

pub use error::Error;

use crate::model::Configuration;
use std::path::Path;

pub fn load_structure(path: &Path) -> Result<Configuration, Error> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.contains("poscar") || name.contains("contcar") || name.ends_with(".vasp") {
        log::debug!("Reading {} as POSCAR", path.display());
    } else {
        log::debug!("Unrecognised file name {:?}, trying POSCAR format", name);
    }

    // Fallback to POSCAR for unknown or explicit POSCAR/CONTCAR
    let cfg = poscar::parse(path)?;
    log::info!(
        "Loaded {} ({} atoms: {})",
        path.display(),
        cfg.len(),
        cfg.formula()
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAN: &str = "\
GaN
1.0
  3.19 0.00 0.00
 -1.595 2.762621 0.00
  0.00 0.00 5.19
Ga N
2 2
Direct
  0.333333 0.666667 0.000000
  0.666667 0.333333 0.500000
  0.333333 0.666667 0.377000
  0.666667 0.333333 0.877000
";

    #[test]
    fn test_load_named_and_unnamed_files() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["CONTCAR", "relaxed.vasp", "structure.txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, GAN).unwrap();

            let cfg = load_structure(&path).unwrap();
            assert_eq!(cfg.len(), 4);
            assert_eq!(cfg.formula(), "Ga2 N2");
            assert_eq!(cfg.sites[3].index, 4);
            assert_eq!(cfg.comment, "GaN");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_structure(&dir.path().join("POSCAR")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
