// src/model/elements.rs

/// Chemical symbols ordered by atomic number (index 0 = H).
pub const SYMBOLS: [&str; 118] = [
    // --- Periods 1-3 ---
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    // --- Period 4 ---
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr",
    // --- Period 5 ---
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
    // --- Period 6 ---
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
    "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    // --- Period 7 ---
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
    "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Returns the atomic number (Z) for a chemical symbol, `None` if unknown.
/// Matching is case-sensitive ("Co" is cobalt, "CO" is nothing).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| (i + 1) as u8)
}

pub fn is_element(symbol: &str) -> bool {
    atomic_number(symbol).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_numbers() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Si"), Some(14));
        assert_eq!(atomic_number("Ge"), Some(32));
        assert_eq!(atomic_number("Lu"), Some(71));
        assert_eq!(atomic_number("Lr"), Some(103));
        assert_eq!(atomic_number("Og"), Some(118));
    }

    #[test]
    fn test_unknown_symbols() {
        assert!(!is_element("Xx"));
        assert!(!is_element("Va"));
        assert!(!is_element("si"));
        assert!(!is_element(""));
    }
}
