// src/physics/naming.rs

use std::collections::HashSet;
use std::str::FromStr;

use crate::model::elements::is_element;
use crate::physics::defects::DefectRecord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NamingError {
    #[error("prettified names conflict on '{0}'; change the defect names")]
    Conflict(String),

    #[error("style '{0}' is not supported; use 'mpl' or 'plain'")]
    BadStyle(String),

    #[error("'{0}' is not an in_out[-in_out...] defect name")]
    Malformed(String),
}

/// Output form of `prettify_names`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `Va_O1-C_N2`
    Plain,
    /// Matplotlib mathtext, see `defect_math_name`
    Mathtext,
}

impl FromStr for NameStyle {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "none" => Ok(NameStyle::Plain),
            "mpl" => Ok(NameStyle::Mathtext),
            other => Err(NamingError::BadStyle(other.to_string())),
        }
    }
}

/// Short defect label: `V_Si`, `Ge_Si`, `Si_i`.
pub fn label(record: &DefectRecord) -> String {
    match record {
        DefectRecord::Vacancy { species, .. } => format!("V_{}", species),
        DefectRecord::Substitution { new_species, old_species, .. } => {
            format!("{}_{}", new_species, old_species)
        }
        DefectRecord::Interstitial { species, .. } => format!("{}_i", species),
    }
}

/// "O1" -> "O"
pub fn remove_digits(name: &str) -> String {
    name.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// "O1" -> "1"
pub fn only_digits(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Splits a pydefect-style name (`Va_O1-C_N2`) into its (in, out) parts.
/// Returns `None` if any part does not contain exactly one underscore.
fn split_parts(name: &str) -> Option<Vec<(&str, &str)>> {
    name.split('-')
        .map(|part| {
            let mut it = part.split('_');
            match (it.next(), it.next(), it.next()) {
                (Some(a), Some(b), None) => Some((a, b)),
                _ => None,
            }
        })
        .collect()
}

/// True for names like `Va_O1`, `Mg_Ga1`, `H_i1` or composites `Va_O1-C_N2`.
///
/// The incoming part must be an element or `Va`; the replaced part, with
/// its site digits removed, must be an element or `i`.
pub fn is_typical_defect_name(name: &str) -> bool {
    let Some(parts) = split_parts(name) else {
        return false;
    };

    parts.iter().all(|(in_name, out_name)| {
        let out = remove_digits(out_name);
        (is_element(in_name) || *in_name == "Va") && (is_element(&out) || out == "i")
    })
}

/// Matplotlib mathtext form of a pydefect-style name.
///
/// `Va_O1-C_N2` -> `$\rm V_{{\rm O}1}\rm C_{{\rm N}2}$`
pub fn defect_math_name(name: &str) -> Option<String> {
    let parts = split_parts(name)?;

    let body: String = parts
        .iter()
        .map(|(in_name, out_name)| {
            let in_name = if *in_name == "Va" { "V" } else { *in_name };
            format!(
                "\\rm {}_{{{{\\rm {}}}{}}}",
                in_name,
                remove_digits(out_name),
                only_digits(out_name)
            )
        })
        .collect();

    Some(format!("${}$", body))
}

/// Drops site digits that carry no information.
///
/// `Va_O1` becomes `Va_O` unless some name in the set replaces an `O2` site,
/// in which case every `O<n>` keeps its digits. Values ride along unchanged,
/// order is preserved. Two entries collapsing to the same name is an error.
pub fn prettify_names<V>(
    entries: Vec<(String, V)>,
    style: NameStyle,
) -> Result<Vec<(String, V)>, NamingError> {
    let mut out_names: HashSet<String> = HashSet::new();
    for (name, _) in &entries {
        let parts = split_parts(name).ok_or_else(|| NamingError::Malformed(name.clone()))?;
        out_names.extend(parts.iter().map(|(_, out)| out.to_string()));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(entries.len());

    for (name, value) in entries {
        let parts = split_parts(&name).ok_or_else(|| NamingError::Malformed(name.clone()))?;

        let pretty = parts
            .iter()
            .map(|(in_name, out_name)| {
                let bare = remove_digits(out_name);
                if out_names.contains(&format!("{}2", bare)) {
                    format!("{}_{}", in_name, out_name)
                } else {
                    format!("{}_{}", in_name, bare)
                }
            })
            .collect::<Vec<_>>()
            .join("-");

        if !seen.insert(pretty.clone()) {
            return Err(NamingError::Conflict(pretty));
        }

        let styled = match style {
            NameStyle::Plain => pretty,
            NameStyle::Mathtext => {
                defect_math_name(&pretty).ok_or_else(|| NamingError::Malformed(pretty.clone()))?
            }
        };
        result.push((styled, value));
    }

    Ok(result)
}

/// pydefect-style names for a list of records, e.g. `Va_N1`, `Mg_Ga1`, `Li_i1`.
///
/// Site digits count the records replacing the same species (interstitials
/// share the `i` counter), then `prettify_names` drops the ones that are
/// unique.
pub fn pydefect_names<'a, I>(records: I, style: NameStyle) -> Result<Vec<String>, NamingError>
where
    I: IntoIterator<Item = &'a DefectRecord>,
{
    let mut counters: Vec<(String, usize)> = Vec::new();
    let mut raw = Vec::new();

    for record in records {
        let (in_name, out_name) = match record {
            DefectRecord::Vacancy { species, .. } => ("Va", species.as_str()),
            DefectRecord::Substitution { new_species, old_species, .. } => {
                (new_species.as_str(), old_species.as_str())
            }
            DefectRecord::Interstitial { species, .. } => (species.as_str(), "i"),
        };

        let n = match counters.iter_mut().find(|(out, _)| out == out_name) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                counters.push((out_name.to_string(), 1));
                1
            }
        };
        raw.push((format!("{}_{}{}", in_name, out_name, n), ()));
    }

    Ok(prettify_names(raw, style)?.into_iter().map(|(name, _)| name).collect())
}
