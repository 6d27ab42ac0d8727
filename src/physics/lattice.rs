// src/physics/lattice.rs

use crate::utils::linalg::frac_to_cart;

/// Cartesian distance between two fractional positions in the given cell.
///
/// Both positions are mapped through `lattice` (rows = lattice vectors) and the
/// Euclidean norm of the difference is returned. No periodic images are
/// considered: 0.999 and 0.001 along an axis are almost a full cell apart.
pub fn cartesian_distance(frac_a: [f64; 3], frac_b: [f64; 3], lattice: &[[f64; 3]; 3]) -> f64 {
    let a = frac_to_cart(frac_a, lattice);
    let b = frac_to_cart(frac_b, lattice);

    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
