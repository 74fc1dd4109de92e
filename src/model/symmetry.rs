// src/model/symmetry.rs

use crate::error::{Result, SimError};
use crate::model::structure::{Atom, Structure};
use crate::utils::linalg;
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};

/// Standardize a loaded structure to its conventional cell.
///
/// Returns the standardized structure together with the space-group number
/// detected by the symmetry search, so the caller can report it.
pub fn standardize(structure: &Structure) -> Result<(Structure, i32)> {
    let l = structure.lattice;

    let lattice_mat = Matrix3::new(
        l[0][0], l[0][1], l[0][2],
        l[1][0], l[1][1], l[1][2],
        l[2][0], l[2][1], l[2][2],
    );
    let lattice = Lattice::new(lattice_mat);

    // Cartesian -> fractional for the symmetry search
    let mut positions = Vec::new();
    let mut numbers = Vec::new();
    let mut unique_elements: Vec<String> = Vec::new();

    for atom in &structure.atoms {
        let frac = linalg::cart_to_frac(atom.position, l).ok_or(SimError::SingularLattice)?;
        positions.push(Vector3::new(frac[0], frac[1], frac[2]));

        if !unique_elements.contains(&atom.element) {
            unique_elements.push(atom.element.clone());
        }
        let id = unique_elements
            .iter()
            .position(|e| *e == atom.element)
            .unwrap() as i32;
        numbers.push(id + 1);
    }

    let cell = Cell::new(lattice, positions, numbers);

    let dataset = MoyoDataset::new(&cell, 1e-4, AngleTolerance::Default, Setting::Spglib, true)
        .map_err(|e| SimError::Symmetry(format!("{:?}", e)))?;

    let std_cell = dataset.std_cell;
    let m = std_cell.lattice.basis;
    let new_lattice = [
        [m.m11, m.m12, m.m13],
        [m.m21, m.m22, m.m23],
        [m.m31, m.m32, m.m33],
    ];

    // Standardized positions are fractional relative to the new basis
    let mut new_atoms = Vec::new();
    for (i, pos_frac) in std_cell.positions.iter().enumerate() {
        let type_id = std_cell.numbers[i];
        let element = unique_elements
            .get((type_id - 1) as usize)
            .cloned()
            .unwrap_or_else(|| "X".to_string());

        new_atoms.push(Atom {
            element,
            position: linalg::frac_to_cart([pos_frac.x, pos_frac.y, pos_frac.z], new_lattice),
        });
    }

    let mut standardized = Structure {
        lattice: new_lattice,
        atoms: new_atoms,
        formula: String::new(),
    };
    standardized.formula = standardized.formula_from_atoms();

    Ok((standardized, dataset.number))
}
