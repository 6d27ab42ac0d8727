// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Lattice vectors as the rows of a nalgebra matrix.
fn row_matrix(lattice: &[[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Arguments
/// * `frac` - Fractional coordinates [x, y, z], any range
/// * `lattice` - Lattice vectors as row matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
///
/// # Formula
/// ```text
/// Cartesian = Fractional · Lattice  (row vector convention)
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: &[[f64; 3]; 3]) -> [f64; 3] {
  let cart = row_matrix(lattice).transpose() * Vector3::from(frac);
  [cart.x, cart.y, cart.z]
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// Returns `None` if the lattice is singular.
pub fn cart_to_frac(cart: [f64; 3], lattice: &[[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv_lat = row_matrix(lattice).transpose().try_inverse()?;
  let frac = inv_lat * Vector3::from(cart);

  Some([frac.x, frac.y, frac.z])
}

/// Signed cell volume a · (b × c), Angstrom^3
pub fn cell_volume(lattice: &[[f64; 3]; 3]) -> f64 {
  row_matrix(lattice).determinant()
}

/// Largest absolute element-wise difference between two lattice matrices
pub fn lattice_mismatch(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> f64 {
  (row_matrix(a) - row_matrix(b)).amax()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cubic_lattice() {
    // Simple cubic lattice 5.0 Å
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];

    let cart = frac_to_cart([0.5, 0.5, 0.5], &lattice);

    assert!((cart[0] - 2.5).abs() < 1e-10);
    assert!((cart[1] - 2.5).abs() < 1e-10);
    assert!((cart[2] - 2.5).abs() < 1e-10);
  }

  #[test]
  fn test_row_vector_convention() {
    // Hexagonal-like cell: b has an x component, so frac · L != L · frac
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let cart = frac_to_cart([0.0, 1.0, 0.0], &lattice);

    assert!((cart[0] - 2.0).abs() < 1e-10);
    assert!((cart[1] - 3.46).abs() < 1e-10);
    assert!(cart[2].abs() < 1e-10);
  }

  #[test]
  fn test_roundtrip() {
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, &lattice);
    let frac_back = cart_to_frac(cart, &lattice).unwrap();

    assert!((frac_back[0] - frac_orig[0]).abs() < 1e-10);
    assert!((frac_back[1] - frac_orig[1]).abs() < 1e-10);
    assert!((frac_back[2] - frac_orig[2]).abs() < 1e-10);
  }

  #[test]
  fn test_singular_lattice() {
    let lattice = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    assert!(cart_to_frac([1.0, 1.0, 1.0], &lattice).is_none());
  }

  #[test]
  fn test_volume_and_mismatch() {
    let a = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
    let b = [[3.0, 0.0, 0.0], [0.0, 4.02, 0.0], [0.0, 0.0, 5.0]];

    assert!((cell_volume(&a) - 60.0).abs() < 1e-10);
    assert!((lattice_mismatch(&a, &b) - 0.02).abs() < 1e-10);
    assert_eq!(lattice_mismatch(&a, &a), 0.0);
  }
}
