// src/io/poscar.rs

use std::fs;
use std::path::Path;

use super::error::Error;
use crate::model::{is_element, Configuration};
use crate::utils::linalg::{cart_to_frac, cell_volume};

/// Line cursor that keeps 1-based line numbers for error messages.
struct Lines<'a> {
    inner: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { inner: text.lines(), line: 0 }
    }

    fn next(&mut self, expected: &'static str) -> Result<(usize, &'a str), Error> {
        let text = self.inner.next().ok_or(Error::UnexpectedEof {
            line: self.line + 1,
            expected,
        })?;
        self.line += 1;
        Ok((self.line, text))
    }
}

fn parse_floats(line_no: usize, line: &str, n: usize, what: &str) -> Result<Vec<f64>, Error> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(n)
        .map(|t| t.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| Error::parse(line_no, format!("invalid {}: {}", what, e)))?;

    if values.len() < n {
        return Err(Error::parse(
            line_no,
            format!("expected {} numbers for {}, found {}", n, what, values.len()),
        ));
    }
    Ok(values)
}

pub fn parse(path: impl AsRef<Path>) -> Result<Configuration, Error> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_str(&text)
}

/// Parses VASP 4/5 POSCAR (or CONTCAR) text into fractional coordinates.
pub fn parse_str(text: &str) -> Result<Configuration, Error> {
    let mut lines = Lines::new(text);

    let (_, comment) = lines.next("comment line")?;

    // Scale: one universal factor (negative = target volume) or one per axis
    let (n, scale_line) = lines.next("scaling factor")?;
    let parsed: Vec<f64> = scale_line
        .split_whitespace()
        .take(3)
        .map_while(|t| t.parse::<f64>().ok())
        .collect();
    let scale = match parsed.as_slice() {
        [x, y, z] => [*x, *y, *z],
        [s, ..] => [*s; 3],
        [] => return Err(Error::parse(n, format!("invalid scaling factor '{}'", scale_line.trim()))),
    };
    let volume_scaled = parsed.len() < 3 && scale[0] < 0.0;

    // Lattice
    let mut lattice = [[0.0; 3]; 3];
    for vec in lattice.iter_mut() {
        let (n, line) = lines.next("lattice vector")?;
        let v = parse_floats(n, line, 3, "lattice vector")?;
        vec.copy_from_slice(&v);
    }

    // Per-component factor shared by the lattice and Cartesian positions
    let factor = if volume_scaled {
        let volume = cell_volume(&lattice).abs();
        if volume < 1e-12 {
            return Err(Error::SingularLattice { volume });
        }
        [(-scale[0] / volume).cbrt(); 3]
    } else {
        scale
    };
    for vec in lattice.iter_mut() {
        for (x, f) in vec.iter_mut().zip(factor) {
            *x *= f;
        }
    }

    let volume = cell_volume(&lattice);
    if volume.abs() < 1e-12 {
        return Err(Error::SingularLattice { volume });
    }

    // Elements & Counts
    let (n6, line6) = lines.next("species names or atom counts")?;
    let has_species = line6
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic());

    let (counts_no, counts_line, species_line) = if has_species {
        let (n7, line7) = lines.next("atom counts")?;
        (n7, line7, Some(line6))
    } else {
        (n6, line6, None)
    };

    let counts: Vec<usize> = counts_line
        .split_whitespace()
        .map(|t| t.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| Error::parse(counts_no, format!("invalid atom count: {}", e)))?;

    let species: Vec<String> = match species_line {
        // VASP 6 may append a POTCAR hash: "Si/6f1a..."
        Some(line) => line
            .split_whitespace()
            .map(|t| t.split('/').next().unwrap_or(t).to_string())
            .collect(),
        None => species_from_comment(comment, counts.len()),
    };

    if species.len() != counts.len() {
        return Err(Error::CountMismatch {
            species: species.len(),
            counts: counts.len(),
        });
    }

    for el in species.iter().filter(|el| !is_element(el)) {
        log::warn!("Unknown species '{}' in POSCAR, keeping it as a label", el);
    }

    // Mode (optional Selective dynamics line first)
    let (_, mut mode_line) = lines.next("coordinate mode")?;
    if mode_line.trim_start().starts_with(['s', 'S']) {
        mode_line = lines.next("coordinate mode")?.1;
    }
    let is_cartesian = mode_line.trim_start().starts_with(['c', 'C', 'k', 'K']);

    // Atoms
    let total: usize = counts.iter().sum();
    let mut sites = Vec::with_capacity(total);
    for (elem, &count) in species.iter().zip(&counts) {
        for _ in 0..count {
            let (n, line) = lines.next("atomic position")?;
            let p = parse_floats(n, line, 3, "atomic position")?;
            let mut frac = [p[0], p[1], p[2]];

            if is_cartesian {
                let cart = [frac[0] * factor[0], frac[1] * factor[1], frac[2] * factor[2]];
                frac = cart_to_frac(cart, &lattice).ok_or(Error::SingularLattice { volume })?;
            }

            sites.push((elem.clone(), frac));
        }
    }

    let mut cfg = Configuration::from_sites(lattice, sites);
    cfg.comment = comment.trim().to_string();
    Ok(cfg)
}

/// VASP 4 files carry no species line. The comment line is used instead when
/// its leading tokens are element symbols, one per count.
fn species_from_comment(comment: &str, n: usize) -> Vec<String> {
    let tokens: Vec<&str> = comment.split_whitespace().take(n).collect();
    if tokens.len() == n && tokens.iter().all(|t| is_element(t)) {
        tokens.into_iter().map(String::from).collect()
    } else {
        log::warn!("POSCAR has no species line, using placeholder names");
        (1..=n).map(|i| format!("X{}", i)).collect()
    }
}
