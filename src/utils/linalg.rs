// src/utils/linalg.rs

use crate::model::UnitCell;
use nalgebra::{Matrix3, Vector3};

/// Convert fractional coordinates to Cartesian Å using the lattice row
/// matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]].
///
/// Cartesian = Lattice^T × Fractional
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let frac_vec = Vector3::from(frac);
  let lat_mat = lattice_matrix(lattice);

  let cart_vec = lat_mat.transpose() * frac_vec;

  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian Å to fractional coordinates, or None for a singular
/// lattice.
///
/// Fractional = (Lattice^T)^-1 × Cartesian
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let cart_vec = Vector3::from(cart);
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;

  let frac_vec = inv_lat * cart_vec;

  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// Signed cell volume in Å³ (determinant of the lattice row matrix).
pub fn cell_volume(lattice: [[f64; 3]; 3]) -> f64 {
  lattice_matrix(lattice).determinant()
}

/// Build lattice row vectors from six cell parameters with the usual
/// crystallographic convention: a along x, b in the xy plane.
pub fn lattice_from_parameters(cell: &UnitCell) -> [[f64; 3]; 3] {
  let (al, be, ga) = cell.angles_rad();

  let v = (1.0 - al.cos().powi(2) - be.cos().powi(2) - ga.cos().powi(2)
    + 2.0 * al.cos() * be.cos() * ga.cos())
  .sqrt();

  [
    [cell.a, 0.0, 0.0],
    [cell.b * ga.cos(), cell.b * ga.sin(), 0.0],
    [
      cell.c * be.cos(),
      cell.c * (al.cos() - be.cos() * ga.cos()) / ga.sin(),
      cell.c * v / ga.sin(),
    ],
  ]
}

fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cubic_frac_to_cart() {
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];

    let cart = frac_to_cart([0.5, 0.5, 0.5], lattice);

    assert!((cart[0] - 2.5).abs() < 1e-10);
    assert!((cart[1] - 2.5).abs() < 1e-10);
    assert!((cart[2] - 2.5).abs() < 1e-10);
  }

  #[test]
  fn frac_cart_roundtrip_on_oblique_lattice() {
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, lattice);
    let frac_back = cart_to_frac(cart, lattice).unwrap();

    assert!((frac_back[0] - frac_orig[0]).abs() < 1e-10);
    assert!((frac_back[1] - frac_orig[1]).abs() < 1e-10);
    assert!((frac_back[2] - frac_orig[2]).abs() < 1e-10);
  }

  #[test]
  fn volume_of_orthorhombic_cell() {
    let lattice = [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]];
    assert!((cell_volume(lattice) - 60.0).abs() < 1e-10);
  }

  #[test]
  fn parameters_roundtrip_through_lattice() {
    let cell = UnitCell {
      a: 4.0,
      b: 5.0,
      c: 6.0,
      alpha: 80.0,
      beta: 95.0,
      gamma: 100.0,
    };
    let lattice = lattice_from_parameters(&cell);

    let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    assert!((norm(lattice[0]) - 4.0).abs() < 1e-10);
    assert!((norm(lattice[1]) - 5.0).abs() < 1e-10);
    assert!((norm(lattice[2]) - 6.0).abs() < 1e-10);

    // gamma is the angle between a and b
    let dot_ab = lattice[0][0] * lattice[1][0] + lattice[0][1] * lattice[1][1];
    let gamma = (dot_ab / (4.0 * 5.0)).acos().to_degrees();
    assert!((gamma - 100.0).abs() < 1e-9);
  }
}
