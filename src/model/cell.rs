// src/model/cell.rs

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Six unit-cell parameters. Lengths in Å, angles stored in degrees and
/// converted to radians where the geometry engine needs trigonometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for UnitCell {
    fn default() -> Self {
        // Start-up values of the simulation controls (Pm-3m perovskite-like cell)
        Self {
            a: 4.15,
            b: 4.15,
            c: 4.15,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
        }
    }
}

impl UnitCell {
    /// Cell angles in radians, in (alpha, beta, gamma) order.
    pub fn angles_rad(&self) -> (f64, f64, f64) {
        (
            self.alpha.to_radians(),
            self.beta.to_radians(),
            self.gamma.to_radians(),
        )
    }
}

/// The six lattice symmetry classes the engine can compute d-spacings for.
/// Trigonal cells are handled through the hexagonal setting (gamma = 120).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeSystem {
    Cubic,
    Tetragonal,
    Orthorhombic,
    Hexagonal,
    Monoclinic,
    Triclinic,
}

impl fmt::Display for LatticeSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LatticeSystem::Cubic => "cubic",
            LatticeSystem::Tetragonal => "tetragonal",
            LatticeSystem::Orthorhombic => "orthorhombic",
            LatticeSystem::Hexagonal => "hexagonal",
            LatticeSystem::Monoclinic => "monoclinic",
            LatticeSystem::Triclinic => "triclinic",
        };
        write!(f, "{}", name)
    }
}

fn close(x: f64, y: f64, tol: f64) -> bool {
    (x - y).abs() <= tol
}

/// Infer the crystal system from the cell parameters and space-group number.
///
/// Rules are evaluated in priority order (cubic first, triclinic last); the
/// first satisfied rule wins. `tol = 0.0` compares the real-valued
/// parameters exactly, which reproduces the historical behavior of the
/// simulation; pass a small positive tolerance to accept cells that are
/// equal only up to rounding.
///
/// A failed classification aborts the recompute: no reflection list is
/// produced and the error carries the constraint diagnostic.
pub fn classify(cell: &UnitCell, space_group: u16, tol: f64) -> Result<LatticeSystem> {
    if !(1..=230).contains(&space_group) {
        return Err(SimError::UnknownSpaceGroup(space_group));
    }

    let UnitCell {
        a,
        b,
        c,
        alpha,
        beta,
        gamma,
    } = *cell;
    let sg = space_group;

    let right = |x: f64| close(x, 90.0, tol);
    let all_right = right(alpha) && right(beta) && right(gamma);

    let system = if close(a, b, tol) && close(b, c, tol) && all_right && (195..=230).contains(&sg) {
        LatticeSystem::Cubic
    } else if (close(a, b, tol) || close(c, b, tol) || close(a, c, tol))
        && all_right
        && (75..=142).contains(&sg)
    {
        LatticeSystem::Tetragonal
    } else if all_right && (16..=74).contains(&sg) {
        LatticeSystem::Orthorhombic
    } else if close(a, b, tol)
        && right(alpha)
        && right(beta)
        && close(gamma, 120.0, tol)
        && (143..=194).contains(&sg)
    {
        LatticeSystem::Hexagonal
    } else if right(alpha) && right(gamma) && !right(beta) && (3..=15).contains(&sg) {
        LatticeSystem::Monoclinic
    } else if !right(alpha) && !right(beta) && !right(gamma) && sg <= 2 {
        LatticeSystem::Triclinic
    } else {
        return Err(SimError::LatticeMismatch {
            space_group: sg,
            reason: "check lattice parameters (monoclinic: beta != 90; hexagonal: gamma = 120)"
                .to_string(),
        });
    };

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> UnitCell {
        UnitCell {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    #[test]
    fn cubic_cell_with_cubic_group() {
        let result = classify(&UnitCell::default(), 221, 0.0).unwrap();
        assert_eq!(result, LatticeSystem::Cubic);
        assert_eq!(result.to_string(), "cubic");
    }

    #[test]
    fn cubic_cell_with_trigonal_group_is_rejected() {
        // Space group 150 is outside every range the cubic cell can satisfy
        let err = classify(&UnitCell::default(), 150, 0.0).unwrap_err();
        assert!(matches!(err, SimError::LatticeMismatch { space_group: 150, .. }));
    }

    #[test]
    fn tetragonal_accepts_any_equal_pairing() {
        let sys = classify(&cell(4.0, 4.0, 6.0, 90.0, 90.0, 90.0), 100, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Tetragonal);
        // c = b pairing, a unique
        let sys = classify(&cell(6.0, 4.0, 4.0, 90.0, 90.0, 90.0), 100, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Tetragonal);
        let sys = classify(&cell(4.0, 6.0, 4.0, 90.0, 90.0, 90.0), 100, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Tetragonal);
    }

    #[test]
    fn cubic_shape_with_tetragonal_group_falls_through_to_tetragonal() {
        // a = b = c but the group is tetragonal, so rule 1 fails on the group
        // range and rule 2 catches it
        let sys = classify(&cell(4.0, 4.0, 4.0, 90.0, 90.0, 90.0), 100, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Tetragonal);
    }

    #[test]
    fn hexagonal_requires_gamma_120() {
        let sys = classify(&cell(4.0, 4.0, 6.0, 90.0, 90.0, 120.0), 194, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Hexagonal);
        assert!(classify(&cell(4.0, 4.0, 6.0, 90.0, 90.0, 119.0), 194, 0.0).is_err());
    }

    #[test]
    fn monoclinic_unique_axis_b() {
        let sys = classify(&cell(5.0, 6.0, 7.0, 90.0, 104.0, 90.0), 14, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Monoclinic);
        // beta = 90 makes it orthorhombic-shaped, which group 14 cannot claim
        assert!(classify(&cell(5.0, 6.0, 7.0, 90.0, 90.0, 90.0), 14, 0.0).is_err());
    }

    #[test]
    fn triclinic_requires_all_angles_oblique() {
        let sys = classify(&cell(4.0, 5.0, 6.0, 80.0, 95.0, 100.0), 2, 0.0).unwrap();
        assert_eq!(sys, LatticeSystem::Triclinic);
        assert!(classify(&cell(4.0, 5.0, 6.0, 90.0, 95.0, 100.0), 2, 0.0).is_err());
    }

    #[test]
    fn out_of_range_group_is_a_configuration_error() {
        assert!(matches!(
            classify(&UnitCell::default(), 0, 0.0),
            Err(SimError::UnknownSpaceGroup(0))
        ));
        assert!(matches!(
            classify(&UnitCell::default(), 231, 0.0),
            Err(SimError::UnknownSpaceGroup(231))
        ));
    }

    #[test]
    fn exact_comparison_is_the_default_but_tolerance_is_honored() {
        let nearly = cell(4.15, 4.15 + 1e-9, 4.15, 90.0, 90.0, 90.0);
        assert!(classify(&nearly, 221, 0.0).is_err());
        assert_eq!(classify(&nearly, 221, 1e-6).unwrap(), LatticeSystem::Cubic);
    }
}
