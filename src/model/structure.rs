// src/model/structure.rs

use serde::{Deserialize, Serialize};

/// One atom of a loaded structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomSite {
    pub species: String,
    // Fractional (crystal-reduced) coordinates. Never wrapped into [0, 1).
    pub frac: [f64; 3],
    // 1-based position in the owning configuration's atom list
    pub index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    // Lattice vectors as rows: [a_vec, b_vec, c_vec], Angstrom
    pub lattice: [[f64; 3]; 3],
    pub sites: Vec<AtomSite>,
    // Title line of the source file
    #[serde(skip)]
    pub comment: String,
}

impl Configuration {
    /// Builds a configuration from (species, fractional position) pairs,
    /// numbering the sites from 1 in the given order.
    pub fn from_sites<S, I>(lattice: [[f64; 3]; 3], sites: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, [f64; 3])>,
    {
        let sites = sites
            .into_iter()
            .enumerate()
            .map(|(i, (species, frac))| AtomSite {
                species: species.into(),
                frac,
                index: i + 1,
            })
            .collect();

        Self {
            lattice,
            sites,
            comment: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Compact formula string in order of first appearance, e.g. "Si63 Ge1".
    pub fn formula(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for site in &self.sites {
            match counts.iter_mut().find(|(el, _)| *el == site.species) {
                Some((_, n)) => *n += 1,
                None => counts.push((site.species.as_str(), 1)),
            }
        }

        counts
            .iter()
            .map(|(el, n)| format!("{}{}", el, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBIC: [[f64; 3]; 3] = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];

    #[test]
    fn test_from_sites_numbers_from_one() {
        let cfg = Configuration::from_sites(
            CUBIC,
            vec![("Si", [0.0, 0.0, 0.0]), ("Ge", [0.5, 0.5, 0.5])],
        );

        assert_eq!(cfg.len(), 2);
        assert_eq!(cfg.sites[0].index, 1);
        assert_eq!(cfg.sites[1].index, 2);
        assert_eq!(cfg.sites[1].species, "Ge");
    }

    #[test]
    fn test_formula_keeps_first_appearance_order() {
        let cfg = Configuration::from_sites(
            CUBIC,
            vec![
                ("Ga", [0.0, 0.0, 0.0]),
                ("N", [0.5, 0.5, 0.5]),
                ("Ga", [0.5, 0.0, 0.0]),
            ],
        );
        assert_eq!(cfg.formula(), "Ga2 N1");
    }

    #[test]
    fn test_empty() {
        let cfg = Configuration::from_sites(CUBIC, Vec::<(&str, [f64; 3])>::new());
        assert!(cfg.is_empty());
        assert_eq!(cfg.formula(), "");
    }
}
