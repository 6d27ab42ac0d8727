// src/utils/report.rs

use crate::physics::defects::{DefectConfig, DefectRecord, DefectReport, DefectSite, NeighborRecord};
use crate::physics::naming::{self, NameStyle, NamingError};
use serde::Serialize;
use thiserror::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "##################################################################";

/// File name of the saved text report
pub const REPORT_FILE: &str = "neighbor_atoms.dat";

fn format_position(p: [f64; 3]) -> String {
    format!("[{:.6} {:.6} {:.6}]", p[0], p[1], p[2])
}

fn neighbor_table(out: &mut String, defect: &str, label: &str, neighbors: &[NeighborRecord]) {
    out.push_str(&format!(
        "\nClosest neighbors to the {} defect in {}/POSCAR:\n",
        defect, label
    ));
    out.push_str(&format!(
        "{:<10} {:<10} {:<30} {:<10}\n",
        "Index", "Atom", "Position", "Distance (A)"
    ));

    for n in neighbors {
        let pos = n
            .position
            .iter()
            .map(|c| format!("{:.6}", c))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "{:<10} {:<10} {:<30} {:<10.4}\n",
            n.index, n.species, pos, n.distance
        ));
    }
}

fn vacancy_block(out: &mut String, site: &DefectSite, label: &str, reference: &str) {
    let DefectRecord::Vacancy { reference_index, position, .. } = &site.record else {
        return;
    };
    let name = naming::label(&site.record);

    out.push_str(&format!("\nVacancy: {}\n", name));
    out.push_str(&format!("Index in {}: {}\n", reference, reference_index));
    out.push_str(&format!("Position: {}\n", format_position(*position)));
    neighbor_table(out, &name, label, &site.neighbors);
}

fn substitution_block(out: &mut String, site: &DefectSite, label: &str, reference: &str) {
    let DefectRecord::Substitution { reference_index, probe_index, position, .. } = &site.record else {
        return;
    };
    let name = naming::label(&site.record);

    out.push_str(&format!("\n{}\n", SEPARATOR));
    out.push_str(&format!("\nSubstitutional: {}\n", name));
    out.push_str(&format!("Index in {}: {}\n", reference, reference_index));
    out.push_str(&format!("Index in {}/POSCAR: {}\n", label, probe_index));
    out.push_str(&format!("Position: {}\n", format_position(*position)));
    if !site.neighbors.is_empty() {
        neighbor_table(out, &name, label, &site.neighbors);
    }
}

fn interstitial_block(out: &mut String, site: &DefectSite, label: &str) {
    let DefectRecord::Interstitial { probe_index, position, .. } = &site.record else {
        return;
    };
    let name = naming::label(&site.record);

    out.push_str(&format!("\n{}\n", SEPARATOR));
    out.push_str(&format!("Interstitial: {}\n", name));
    out.push_str(&format!("Index in {}/POSCAR: {}\n", label, probe_index));
    out.push_str(&format!("Position: {}\n", format_position(*position)));
    neighbor_table(out, &name, label, &site.neighbors);
}

/// Human-readable defect report.
///
/// `label` names the defect structure (its directory), `reference` is how the
/// perfect structure is referred to in index lines.
pub fn render_text(report: &DefectReport, label: &str, reference: &str) -> String {
    let mut out = String::new();

    if report.vacancies.is_empty() {
        out.push_str(&format!("\nThere are no vacancy defects in the {}/POSCAR\n", label));
    }
    for site in &report.vacancies {
        vacancy_block(&mut out, site, label, reference);
    }

    if report.substitutions.is_empty() {
        out.push_str(&format!("\n{}\n", SEPARATOR));
        out.push_str(&format!("\nThere are no substitutional defects in the {}/POSCAR\n", label));
    }
    for site in &report.substitutions {
        substitution_block(&mut out, site, label, reference);
    }

    if report.interstitials.is_empty() {
        out.push_str(&format!("\n{}\n", SEPARATOR));
        out.push_str(&format!("\nThere are no interstitial defects in the {}/POSCAR\n", label));
    }
    for site in &report.interstitials {
        interstitial_block(&mut out, site, label);
    }

    out
}

/// One-line summary of every defect label, e.g. "V_N, Mg_Ga".
pub fn summary_line(report: &DefectReport) -> String {
    if report.is_empty() {
        return "no defects".to_string();
    }
    report.records().map(naming::label).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to name defects: {0}")]
    Naming(#[from] NamingError),
}

/// Names of one record, in `DefectReport::records` order
#[derive(Serialize)]
struct DefectNames {
    label: String,
    pydefect: String,
    mathtext: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'a str,
    // Set when the defect folder itself follows pydefect naming (`Va_O1`, ...)
    label_mathtext: Option<String>,
    reference: &'a str,
    config: &'a DefectConfig,
    names: Vec<DefectNames>,
    #[serde(flatten)]
    report: &'a DefectReport,
}

pub fn render_json(
    report: &DefectReport,
    label: &str,
    reference: &str,
    config: &DefectConfig,
) -> Result<String, ReportError> {
    let plain = naming::pydefect_names(report.records(), NameStyle::Plain)?;
    let math = naming::pydefect_names(report.records(), NameStyle::Mathtext)?;

    let names = report
        .records()
        .zip(plain.into_iter().zip(math))
        .map(|(record, (pydefect, mathtext))| DefectNames {
            label: naming::label(record),
            pydefect,
            mathtext,
        })
        .collect();

    let label_mathtext = if naming::is_typical_defect_name(label) {
        naming::defect_math_name(label)
    } else {
        None
    };

    Ok(serde_json::to_string_pretty(&JsonReport {
        label,
        label_mathtext,
        reference,
        config,
        names,
        report,
    })?)
}

/// Name of the folder holding the defect structure ("." for a bare file name).
pub fn structure_label(defect_path: &Path) -> String {
    let dir = match defect_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "defect".to_string())
}

/// Writes `text` to `<output_dir>/<label>/Data/neighbor_atoms.dat`.
pub fn save_text(output_dir: &Path, label: &str, text: &str) -> io::Result<PathBuf> {
    let folder = output_dir.join(label).join("Data");
    fs::create_dir_all(&folder)?;

    let path = folder.join(REPORT_FILE);
    fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Configuration;
    use crate::physics::defects::analyze;

    const CUBIC: [[f64; 3]; 3] = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];

    fn si_ge_report() -> DefectReport {
        let reference =
            Configuration::from_sites(CUBIC, vec![("Si", [0.0, 0.0, 0.0]), ("Si", [0.5, 0.5, 0.5])]);
        let probe =
            Configuration::from_sites(CUBIC, vec![("Si", [0.0, 0.0, 0.0]), ("Ge", [0.5, 0.5, 0.5])]);
        analyze(&reference, &probe, &DefectConfig::default())
    }

    #[test]
    fn test_empty_categories_are_reported() {
        let text = render_text(&si_ge_report(), "Ge_Si", "../perfect/POSCAR");

        assert!(text.contains("There are no vacancy defects in the Ge_Si/POSCAR"));
        assert!(text.contains("There are no interstitial defects in the Ge_Si/POSCAR"));
        assert!(!text.contains("There are no substitutional defects"));
    }

    #[test]
    fn test_substitution_block() {
        let text = render_text(&si_ge_report(), "Ge_Si", "../perfect/POSCAR");

        assert!(text.contains("Substitutional: Ge_Si\n"));
        assert!(text.contains("Index in ../perfect/POSCAR: 2\n"));
        assert!(text.contains("Index in Ge_Si/POSCAR: 2\n"));
        assert!(text.contains("Position: [0.500000 0.500000 0.500000]\n"));
        assert!(text.contains("Closest neighbors to the Ge_Si defect in Ge_Si/POSCAR:"));

        let row = format!(
            "{:<10} {:<10} {:<30} {:<10.4}",
            1, "Si", "0.000000 0.000000 0.000000", 2.5 * 3.0_f64.sqrt()
        );
        assert!(text.contains(&row));
    }

    #[test]
    fn test_nothing_found() {
        let text = render_text(&DefectReport::default(), "bulk", "ref");

        assert!(text.contains("no vacancy defects"));
        assert!(text.contains("no substitutional defects"));
        assert!(text.contains("no interstitial defects"));
        assert_eq!(summary_line(&DefectReport::default()), "no defects");
    }

    #[test]
    fn test_summary_and_json() {
        let report = si_ge_report();
        assert_eq!(summary_line(&report), "Ge_Si");

        let json = render_json(&report, "Ge_Si", "ref", &DefectConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["label"], "Ge_Si");
        assert_eq!(value["config"]["tolerance"], 0.001);
        assert_eq!(value["substitutions"][0]["record"]["kind"], "substitution");
        assert_eq!(value["substitutions"][0]["record"]["old_species"], "Si");
        assert_eq!(value["vacancies"].as_array().map(|v| v.len()), Some(0));

        assert_eq!(value["names"][0]["label"], "Ge_Si");
        assert_eq!(value["names"][0]["pydefect"], "Ge_Si");
        assert_eq!(value["names"][0]["mathtext"], "$\\rm Ge_{{\\rm Si}}$");
        assert_eq!(value["label_mathtext"], "$\\rm Ge_{{\\rm Si}}$");
    }

    #[test]
    fn test_json_plain_folder_label() {
        let json = render_json(&si_ge_report(), "run-03", "ref", &DefectConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["label_mathtext"].is_null());
    }

    #[test]
    fn test_structure_label() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("Mg_Ga");
        std::fs::create_dir(&sub).unwrap();

        assert_eq!(structure_label(&sub.join("POSCAR")), "Mg_Ga");
        assert_eq!(structure_label(&dir.path().join("nope").join("POSCAR")), "defect");
    }

    #[test]
    fn test_save_text() {
        let dir = tempfile::tempdir().unwrap();

        let path = save_text(dir.path(), "V_N", "hello\n").unwrap();

        assert_eq!(path, dir.path().join("V_N").join("Data").join(REPORT_FILE));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
    }
}
