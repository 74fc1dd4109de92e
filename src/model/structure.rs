// src/model/structure.rs

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    /// Cartesian position in Å.
    pub position: [f64; 3],
}

/// An atomic structure loaded from a file: lattice vectors as rows
/// [a_vec, b_vec, c_vec] plus the expanded (symmetry-applied) atom list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
    #[serde(skip)]
    pub formula: String,
}

impl Structure {
    /// Recover (a, b, c, alpha, beta, gamma) from the lattice vectors.
    /// Lengths in Å, angles in degrees.
    pub fn cell_parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [av, bv, cv] = self.lattice;

        let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        let dot = |u: [f64; 3], v: [f64; 3]| u[0] * v[0] + u[1] * v[1] + u[2] * v[2];

        let a = norm(av);
        let b = norm(bv);
        let c = norm(cv);

        let alpha = (dot(bv, cv) / (b * c)).acos().to_degrees();
        let beta = (dot(av, cv) / (a * c)).acos().to_degrees();
        let gamma = (dot(av, bv) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// Condensed element summary, e.g. "Na4 Cl4", for status messages.
    pub fn formula_from_atoms(&self) -> String {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match counts.iter_mut().find(|(e, _)| *e == atom.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom.element.clone(), 1)),
            }
        }
        counts
            .iter()
            .map(|(e, n)| format!("{}{}", e, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
