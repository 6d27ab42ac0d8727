// src/physics/defects.rs

use crate::model::structure::{AtomSite, Configuration};
use crate::physics::lattice::cartesian_distance;
use crate::utils::linalg::lattice_mismatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- 1. CONSTANTS ---

/// Default site-matching radius (Angstrom)
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Default width of the nearest-neighbor shell (Angstrom)
pub const DEFAULT_NEIGHBOR_TOLERANCE: f64 = 0.001;

// Closeness test applied to the extended substitution shell
const SHELL_RTOL: f64 = 1e-5;
const SHELL_ATOL: f64 = 1e-8;

// --- 2. ERROR HANDLING ---

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefectConfigError {
    #[error("{name} is out of range, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },
}

// --- 3. CONFIGURATION ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectConfig {
    /// Two sites are the same site if closer than this (Angstrom)
    pub tolerance: f64,

    /// Atoms within this distance of the nearest one form the reported shell
    pub neighbor_tolerance: f64,
}

impl Default for DefectConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            neighbor_tolerance: DEFAULT_NEIGHBOR_TOLERANCE,
        }
    }
}

impl DefectConfig {
    pub fn validate(&self) -> Result<(), DefectConfigError> {
        check_positive("tolerance", self.tolerance)?;
        // Zero keeps exact ties only
        if self.neighbor_tolerance.is_finite() && self.neighbor_tolerance >= 0.0 {
            Ok(())
        } else {
            Err(DefectConfigError::InvalidTolerance {
                name: "neighbor_tolerance",
                value: self.neighbor_tolerance,
            })
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), DefectConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DefectConfigError::InvalidTolerance { name, value })
    }
}

// --- 4. RESULTS ---

/// A single point defect found by comparing two configurations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefectRecord {
    /// Reference atom with no matching site in the probe
    Vacancy {
        species: String,
        position: [f64; 3],
        reference_index: usize,
    },
    /// Matched site occupied by a different species
    Substitution {
        new_species: String,
        old_species: String,
        position: [f64; 3],
        reference_index: usize,
        probe_index: usize,
    },
    /// Probe atom with no matching site in the reference
    Interstitial {
        species: String,
        position: [f64; 3],
        probe_index: usize,
    },
}

impl DefectRecord {
    pub fn position(&self) -> [f64; 3] {
        match self {
            DefectRecord::Vacancy { position, .. }
            | DefectRecord::Substitution { position, .. }
            | DefectRecord::Interstitial { position, .. } => *position,
        }
    }
}

/// One atom in the nearest-neighbor shell of a defect site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub distance: f64,
    pub species: String,
    pub position: [f64; 3],
    pub index: usize,
}

impl NeighborRecord {
    fn from_site(site: &AtomSite, distance: f64) -> Self {
        Self {
            distance,
            species: site.species.clone(),
            position: site.frac,
            index: site.index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefectSite {
    pub record: DefectRecord,
    pub neighbors: Vec<NeighborRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    pub vacancies: Vec<DefectSite>,
    pub substitutions: Vec<DefectSite>,
    pub interstitials: Vec<DefectSite>,
}

impl DefectReport {
    /// All records, vacancies first, then substitutions, then interstitials.
    /// A site may show up in more than one category for inconsistent inputs.
    pub fn records(&self) -> impl Iterator<Item = &DefectRecord> {
        self.vacancies
            .iter()
            .chain(&self.substitutions)
            .chain(&self.interstitials)
            .map(|s| &s.record)
    }

    pub fn is_empty(&self) -> bool {
        self.vacancies.is_empty() && self.substitutions.is_empty() && self.interstitials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vacancies.len() + self.substitutions.len() + self.interstitials.len()
    }
}

// --- 5. CLASSIFICATION PASSES ---

/// First site of `space` within `tolerance` of `target`, in scan order.
fn first_match<'a>(
    target: [f64; 3],
    space: &'a [AtomSite],
    lattice: &[[f64; 3]; 3],
    tolerance: f64,
) -> Option<&'a AtomSite> {
    space
        .iter()
        .find(|b| cartesian_distance(target, b.frac, lattice) < tolerance)
}

/// Reference atoms with no probe atom within `tolerance`.
pub fn find_vacancies(
    reference: &Configuration,
    probe: &Configuration,
    lattice: &[[f64; 3]; 3],
    tolerance: f64,
) -> Vec<DefectRecord> {
    reference
        .sites
        .iter()
        .filter(|a| first_match(a.frac, &probe.sites, lattice, tolerance).is_none())
        .map(|a| DefectRecord::Vacancy {
            species: a.species.clone(),
            position: a.frac,
            reference_index: a.index,
        })
        .collect()
}

/// Probe atoms whose first matching reference site holds another species.
///
/// Only the first reference atom within `tolerance` is looked at, not the
/// closest one.
pub fn find_substitutions(
    reference: &Configuration,
    probe: &Configuration,
    lattice: &[[f64; 3]; 3],
    tolerance: f64,
) -> Vec<DefectRecord> {
    probe
        .sites
        .iter()
        .filter_map(|a| {
            let b = first_match(a.frac, &reference.sites, lattice, tolerance)?;
            (a.species != b.species).then(|| DefectRecord::Substitution {
                new_species: a.species.clone(),
                old_species: b.species.clone(),
                position: a.frac,
                reference_index: b.index,
                probe_index: a.index,
            })
        })
        .collect()
}

/// Probe atoms with no reference atom within `tolerance`.
pub fn find_interstitials(
    reference: &Configuration,
    probe: &Configuration,
    lattice: &[[f64; 3]; 3],
    tolerance: f64,
) -> Vec<DefectRecord> {
    probe
        .sites
        .iter()
        .filter(|a| first_match(a.frac, &reference.sites, lattice, tolerance).is_none())
        .map(|a| DefectRecord::Interstitial {
            species: a.species.clone(),
            position: a.frac,
            probe_index: a.index,
        })
        .collect()
}

// --- 6. NEIGHBOR RANKING ---

/// Nearest-neighbor shell of `target` among the probe atoms.
///
/// Atoms sitting exactly on `target` are skipped (coordinate equality, not
/// index). Every atom within `neighbor_tolerance` of the shortest distance is
/// returned, ascending by distance, ties in scan order.
pub fn closest_neighbors(
    target: [f64; 3],
    probe: &Configuration,
    lattice: &[[f64; 3]; 3],
    neighbor_tolerance: f64,
) -> Vec<NeighborRecord> {
    let mut ranked: Vec<NeighborRecord> = probe
        .sites
        .iter()
        .filter(|site| site.frac != target)
        .map(|site| NeighborRecord::from_site(site, cartesian_distance(target, site.frac, lattice)))
        .collect();

    // sort_by is stable, equal distances keep scan order
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let Some(closest) = ranked.first().map(|n| n.distance) else {
        return ranked;
    };
    ranked.retain(|n| (n.distance - closest).abs() <= neighbor_tolerance);
    ranked
}

/// Shell around a substitution site.
///
/// Starts from `closest_neighbors`, appends vacancies lying on the site, then
/// keeps only entries at the distance of the first entry (tight relative test).
fn substitution_neighbors(
    position: [f64; 3],
    probe: &Configuration,
    vacancies: &[DefectRecord],
    lattice: &[[f64; 3]; 3],
    config: &DefectConfig,
) -> Vec<NeighborRecord> {
    let mut shell = closest_neighbors(position, probe, lattice, config.neighbor_tolerance);

    for vacancy in vacancies {
        if let DefectRecord::Vacancy { species, position: vpos, reference_index } = vacancy {
            let d = cartesian_distance(position, *vpos, lattice);
            if d < config.tolerance {
                shell.push(NeighborRecord {
                    distance: d,
                    species: species.clone(),
                    position: *vpos,
                    index: *reference_index,
                });
            }
        }
    }

    let Some(first) = shell.first().map(|n| n.distance) else {
        return shell;
    };
    shell.retain(|n| (n.distance - first).abs() <= SHELL_ATOL + SHELL_RTOL * first.abs());
    shell.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    shell
}

// --- 7. MAIN ANALYSIS ---

/// Compare a defect-containing `probe` against a perfect `reference`.
///
/// All distances use the probe cell. The three passes run independently and
/// their results are not reconciled with each other.
pub fn analyze(reference: &Configuration, probe: &Configuration, config: &DefectConfig) -> DefectReport {
    let lattice = &probe.lattice;

    let mismatch = lattice_mismatch(&reference.lattice, lattice);
    if mismatch > config.tolerance {
        log::warn!(
            "Reference and defect cells differ by up to {:.6} Å; using the defect cell",
            mismatch
        );
    }

    log::debug!(
        "Comparing {} reference atoms against {} defect atoms (tolerance {} Å)",
        reference.len(),
        probe.len(),
        config.tolerance
    );

    let vacancies = find_vacancies(reference, probe, lattice, config.tolerance);
    let substitutions = find_substitutions(reference, probe, lattice, config.tolerance);
    let interstitials = find_interstitials(reference, probe, lattice, config.tolerance);

    log::info!(
        "Found {} vacancies, {} substitutions, {} interstitials",
        vacancies.len(),
        substitutions.len(),
        interstitials.len()
    );

    let shell = |record: &DefectRecord| {
        closest_neighbors(record.position(), probe, lattice, config.neighbor_tolerance)
    };

    DefectReport {
        substitutions: substitutions
            .into_iter()
            .map(|record| DefectSite {
                neighbors: substitution_neighbors(record.position(), probe, &vacancies, lattice, config),
                record,
            })
            .collect(),
        interstitials: interstitials
            .into_iter()
            .map(|record| DefectSite { neighbors: shell(&record), record })
            .collect(),
        vacancies: vacancies
            .iter()
            .map(|record| DefectSite { neighbors: shell(record), record: record.clone() })
            .collect(),
    }
}
