// src/physics/dspacing.rs

use crate::error::{Result, SimError};
use crate::model::{LatticeSystem, UnitCell};

/// Interplanar spacing d(hkl) in Å for a classified cell.
///
/// Dispatches on the crystal system supplied by the classifier; the cubic,
/// tetragonal and orthorhombic cases share the orthogonal-axes formula.
/// Returns a DomainError for strictly degenerate geometry (sin β = 0,
/// non-positive metric); borderline but valid inputs go through untouched.
pub fn d_spacing(system: LatticeSystem, cell: &UnitCell, h: i32, k: i32, l: i32) -> Result<f64> {
    match system {
        LatticeSystem::Cubic | LatticeSystem::Tetragonal | LatticeSystem::Orthorhombic => {
            orthogonal(cell, h, k, l)
        }
        LatticeSystem::Hexagonal => hexagonal(cell, h, k, l),
        LatticeSystem::Monoclinic => monoclinic(cell, h, k, l),
        LatticeSystem::Triclinic => triclinic(cell, h, k, l),
    }
}

fn degenerate(h: i32, k: i32, l: i32, reason: &'static str) -> SimError {
    SimError::DegenerateCell { h, k, l, reason }
}

/// 1/d² = (h/a)² + (k/b)² + (l/c)²
fn orthogonal(cell: &UnitCell, h: i32, k: i32, l: i32) -> Result<f64> {
    let inv_d2 = (h as f64 / cell.a).powi(2)
        + (k as f64 / cell.b).powi(2)
        + (l as f64 / cell.c).powi(2);

    if inv_d2 <= 0.0 {
        return Err(degenerate(h, k, l, "zero reciprocal metric"));
    }
    Ok(1.0 / inv_d2.sqrt())
}

/// 1/d² = (4/3)(h² + hk + k²)/a² + (l/c)²
fn hexagonal(cell: &UnitCell, h: i32, k: i32, l: i32) -> Result<f64> {
    let hf = h as f64;
    let kf = k as f64;

    let inv_d2 = (4.0 / 3.0) * (hf * hf + hf * kf + kf * kf) / (cell.a * cell.a)
        + (l as f64 / cell.c).powi(2);

    if inv_d2 <= 0.0 {
        return Err(degenerate(h, k, l, "zero reciprocal metric"));
    }
    Ok(1.0 / inv_d2.sqrt())
}

/// Unique axis b:
/// 1/d² = (1/sin²β)[(h/a)² + (l/c)² − 2hl·cosβ/(ac)] + (k/b)²
fn monoclinic(cell: &UnitCell, h: i32, k: i32, l: i32) -> Result<f64> {
    let (_, be, _) = cell.angles_rad();
    let sin_b = be.sin();

    if sin_b.abs() < 1e-12 {
        return Err(degenerate(h, k, l, "sin(beta) = 0"));
    }

    let hf = h as f64;
    let lf = l as f64;
    let inv_d2 = (1.0 / (sin_b * sin_b))
        * ((hf / cell.a).powi(2) + (lf / cell.c).powi(2)
            - 2.0 * hf * lf * be.cos() / (cell.a * cell.c))
        + (k as f64 / cell.b).powi(2);

    if inv_d2 <= 0.0 {
        return Err(degenerate(h, k, l, "non-positive reciprocal metric"));
    }
    Ok(1.0 / inv_d2.sqrt())
}

/// General case via the reciprocal-metric cofactors:
/// d = V / sqrt(S11·h² + S22·k² + S33·l² + 2S12·hk + 2S23·kl + 2S13·hl)
fn triclinic(cell: &UnitCell, h: i32, k: i32, l: i32) -> Result<f64> {
    let (al, be, ga) = cell.angles_rad();
    let (ca, cb, cg) = (al.cos(), be.cos(), ga.cos());

    let radicand = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
    if radicand <= 0.0 {
        return Err(degenerate(h, k, l, "cell angles give non-positive volume"));
    }

    let (a, b, c) = (cell.a, cell.b, cell.c);
    let volume = a * b * c * radicand.sqrt();

    let s11 = (b * c * al.sin()).powi(2);
    let s22 = (a * c * be.sin()).powi(2);
    let s33 = (a * b * ga.sin()).powi(2);
    let s12 = a * b * c * c * (ca * cb - cg);
    let s23 = b * c * a * a * (cb * cg - ca);
    let s13 = c * a * b * b * (cg * ca - cb);

    let hf = h as f64;
    let kf = k as f64;
    let lf = l as f64;
    let metric = s11 * hf * hf
        + s22 * kf * kf
        + s33 * lf * lf
        + 2.0 * s12 * hf * kf
        + 2.0 * s23 * kf * lf
        + 2.0 * s13 * hf * lf;

    if metric <= 0.0 {
        return Err(degenerate(h, k, l, "non-positive reciprocal metric"));
    }
    Ok(volume / metric.sqrt())
}
