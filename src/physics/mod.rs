// src/physics/mod.rs
pub mod absences;
pub mod dspacing;
pub mod pattern;
pub mod profile;
pub mod projector;

use crate::error::{Result, SimError};
use crate::io;
use crate::model::symmetry;
use crate::model::{classify, LatticeSystem, Reflection, Snapshot, UnitCell};
use crate::utils::linalg;
use std::path::{Path, PathBuf};

/// Upper bound of the analytic (hkl) enumeration, inclusive.
pub const HKL_MAX: i32 = 8;

/// Where the reflection list comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Enumerate indices analytically from the cell and space group.
    Analytic,
    /// Parse a structure file and compute structure-factor intensities.
    StructureFile {
        path: PathBuf,
        /// Standardize to the conventional cell before the calculation.
        load_conventional: bool,
    },
}

/// Everything one recompute pass consumes.
#[derive(Debug, Clone)]
pub struct SimInputs {
    pub cell: UnitCell,
    pub space_group: u16,
    pub energy_ev: f64,
    /// Comparison tolerance for the lattice classifier; 0 = exact.
    pub lattice_tolerance: f64,
    pub source: Source,
}

/// One full, blocking recompute pass.
///
/// Validates, rebuilds the reflection list from scratch, and returns it as
/// an immutable snapshot. On error nothing is published, so the caller's
/// previous snapshot stays valid.
pub fn recompute(inputs: &SimInputs) -> Result<Snapshot> {
    let wavelength = projector::wavelength_angstrom(inputs.energy_ev);

    match &inputs.source {
        Source::Analytic => {
            let system = classify(&inputs.cell, inputs.space_group, inputs.lattice_tolerance)?;
            let reflections = enumerate(&inputs.cell, system, inputs.space_group)?;

            Ok(Snapshot {
                system: Some(system),
                message: format!("Calculating rings for {} lattice", system),
                wavelength,
                reflections,
            })
        }
        Source::StructureFile {
            path,
            load_conventional,
        } => structure_snapshot(path, *load_conventional, wavelength),
    }
}

/// Analytic path: walk 0..=HKL_MAX³ in fixed h/k/l ascending order, filter
/// by the space-group rule, and attach d-spacings. The deterministic order
/// is what downstream de-duplication keys on.
fn enumerate(
    unit_cell: &UnitCell,
    system: LatticeSystem,
    space_group: u16,
) -> Result<Vec<Reflection>> {
    let rule = absences::rule_for(space_group)?;
    let mut reflections = Vec::new();

    for h in 0..=HKL_MAX {
        for k in 0..=HKL_MAX {
            for l in 0..=HKL_MAX {
                if h + k + l == 0 {
                    continue;
                }
                if !rule.allows(h, k, l) {
                    continue;
                }
                match dspacing::d_spacing(system, unit_cell, h, k, l) {
                    Ok(d) => reflections.push(Reflection {
                        h,
                        k,
                        l,
                        d_spacing: d,
                        intensity: None,
                    }),
                    Err(SimError::DegenerateCell { reason, .. }) => {
                        log::debug!("Skipping ({} {} {}): {}", h, k, l, reason);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(reflections)
}

fn structure_snapshot(path: &Path, load_conventional: bool, wavelength: f64) -> Result<Snapshot> {
    let mut structure = io::load_structure(path)?;
    let mut detected_group = None;

    if load_conventional {
        let (standardized, number) = symmetry::standardize(&structure)?;
        structure = standardized;
        detected_group = Some(number);
    }

    let (a, b, c, alpha, beta, gamma) = structure.cell_parameters();
    log::info!(
        "Structure {}: a={:.4} b={:.4} c={:.4} Å, α={:.2} β={:.2} γ={:.2}°, V={:.2} Å³",
        structure.formula_from_atoms(),
        a, b, c, alpha, beta, gamma,
        linalg::cell_volume(structure.lattice).abs()
    );

    let settings = pattern::PatternSettings {
        wavelength,
        min_2theta: 0.0,
        max_2theta: 90.0,
    };
    let peaks = pattern::calculate_pattern(&structure, &settings)?;

    let message = match detected_group {
        Some(n) => format!(
            "Calculating rings from structure data ({} peaks, space group #{})",
            peaks.len(),
            n
        ),
        None => format!("Calculating rings from structure data ({} peaks)", peaks.len()),
    };

    let reflections = peaks
        .into_iter()
        .map(|p| Reflection {
            h: p.h,
            k: p.k,
            l: p.l,
            d_spacing: p.d_spacing,
            intensity: Some(p.intensity),
        })
        .collect();

    Ok(Snapshot {
        system: None,
        message,
        wavelength,
        reflections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatticeSystem;

    fn analytic_inputs(space_group: u16) -> SimInputs {
        SimInputs {
            cell: UnitCell::default(),
            space_group,
            energy_ev: 10_000.0,
            lattice_tolerance: 0.0,
            source: Source::Analytic,
        }
    }

    #[test]
    fn primitive_cubic_enumerates_the_full_range() {
        let snapshot = recompute(&analytic_inputs(221)).unwrap();

        assert_eq!(snapshot.system, Some(LatticeSystem::Cubic));
        assert_eq!(snapshot.message, "Calculating rings for cubic lattice");
        // 9³ triples minus the origin, nothing filtered in a P lattice
        assert_eq!(snapshot.reflections.len(), 728);

        // Fixed enumeration order: l fastest, then k, then h
        let first = &snapshot.reflections[0];
        assert_eq!((first.h, first.k, first.l), (0, 0, 1));
        let second = &snapshot.reflections[1];
        assert_eq!((second.h, second.k, second.l), (0, 0, 2));

        let d100 = snapshot
            .reflections
            .iter()
            .find(|r| (r.h, r.k, r.l) == (1, 0, 0))
            .unwrap();
        assert!((d100.d_spacing - 4.15).abs() < 1e-12);
        assert!(d100.intensity.is_none());
    }

    #[test]
    fn body_centred_cubic_filters_odd_sums() {
        let snapshot = recompute(&analytic_inputs(229)).unwrap();

        // Triples 0..=8 with even index sum, minus the origin
        let expected = (0..9)
            .flat_map(|h| (0..9).flat_map(move |k| (0..9).map(move |l| (h, k, l))))
            .filter(|&(h, k, l)| h + k + l > 0 && (h + k + l) % 2 == 0)
            .count();
        assert_eq!(snapshot.reflections.len(), expected);
        assert!(snapshot
            .reflections
            .iter()
            .all(|r| (r.h + r.k + r.l) % 2 == 0));
    }

    #[test]
    fn mismatched_cell_aborts_before_enumeration() {
        let err = recompute(&analytic_inputs(150)).unwrap_err();
        assert!(matches!(err, SimError::LatticeMismatch { .. }));
    }

    #[test]
    fn unknown_space_group_is_fatal_to_the_pass() {
        let err = recompute(&analytic_inputs(231)).unwrap_err();
        assert!(matches!(err, SimError::UnknownSpaceGroup(231)));
    }

    #[test]
    fn each_pass_rebuilds_from_scratch() {
        let a = recompute(&analytic_inputs(221)).unwrap();
        let b = recompute(&analytic_inputs(221)).unwrap();
        assert_eq!(a.reflections, b.reflections);
    }

    #[test]
    fn structure_file_path_produces_scaled_intensities() {
        use std::io::Write;

        let cif = "\
data_Po
_cell_length_a    3.359
_cell_length_b    3.359
_cell_length_c    3.359
_cell_angle_alpha 90.0
_cell_angle_beta  90.0
_cell_angle_gamma 90.0
loop_
 _symmetry_equiv_pos_as_xyz
 'x, y, z'
loop_
 _atom_site_label
 _atom_site_fract_x
 _atom_site_fract_y
 _atom_site_fract_z
 Po1 0.0 0.0 0.0
";
        let path = std::env::temp_dir().join("ringsim_recompute_test.cif");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(cif.as_bytes()).unwrap();

        let inputs = SimInputs {
            cell: UnitCell::default(),
            space_group: 221,
            energy_ev: 10_000.0,
            lattice_tolerance: 0.0,
            source: Source::StructureFile {
                path,
                load_conventional: false,
            },
        };
        let snapshot = recompute(&inputs).unwrap();

        assert!(snapshot.system.is_none());
        assert!(!snapshot.reflections.is_empty());
        // Intensities present, strongest scaled to 100, peaks in 2θ order
        let max_i = snapshot
            .reflections
            .iter()
            .map(|r| r.intensity.unwrap())
            .fold(0.0, f64::max);
        assert!((max_i - 100.0).abs() < 1e-9);
        for pair in snapshot.reflections.windows(2) {
            assert!(pair[0].d_spacing >= pair[1].d_spacing);
        }
    }
}
