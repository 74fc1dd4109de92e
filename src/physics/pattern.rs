// src/physics/pattern.rs

use crate::error::{Result, SimError};
use crate::model::elements;
use crate::model::Structure;
use num_complex::Complex64;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Settings for a structure-factor pattern calculation.
#[derive(Debug, Clone)]
pub struct PatternSettings {
    /// X-ray wavelength in Å.
    pub wavelength: f64,
    pub min_2theta: f64,
    pub max_2theta: f64,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            wavelength: 1.5406, // Cu K-alpha
            min_2theta: 0.0,
            max_2theta: 90.0,
        }
    }
}

/// A merged diffraction peak with its relative intensity (strongest = 100).
#[derive(Debug, Clone)]
pub struct Peak {
    pub two_theta: f64,
    pub d_spacing: f64,
    pub intensity: f64,
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

// 2θ tolerance (deg) under which symmetry-equivalent peaks merge
const MERGE_TOL_DEG: f64 = 0.01;

/// Compute the powder pattern of a structure: reciprocal-lattice sweep,
/// |F(hkl)|² with the Lorentz-polarization factor, equivalent-peak merge,
/// and normalization of the strongest peak to 100. Peaks come back sorted
/// by scattering angle.
pub fn calculate_pattern(structure: &Structure, settings: &PatternSettings) -> Result<Vec<Peak>> {
    // 1. Reciprocal lattice (crystallographic convention, no 2π)
    let a = structure.lattice[0];
    let b = structure.lattice[1];
    let c = structure.lattice[2];

    let volume = dot(a, cross(b, c));
    if volume.abs() < 1e-9 {
        return Err(SimError::SingularLattice);
    }

    let inv_vol = 1.0 / volume;
    let a_star = scale(cross(b, c), inv_vol);
    let b_star = scale(cross(c, a), inv_vol);
    let c_star = scale(cross(a, b), inv_vol);

    // 2. Index bound from the largest accessible |G| = 2·sinθ_max/λ
    let theta_max = (settings.max_2theta / 2.0).to_radians();
    let max_g = 2.0 * theta_max.sin() / settings.wavelength;
    let min_recip_len = [magnitude(a_star), magnitude(b_star), magnitude(c_star)]
        .iter()
        .fold(f64::INFINITY, |acc, &x| acc.min(x));
    let limit = ((max_g / min_recip_len).ceil() as i32 + 1).min(30);

    // 3. Sweep the limiting sphere; each h-slab is independent
    let settings = settings.clone();
    let mut peaks: Vec<Peak> = (-limit..=limit)
        .into_par_iter()
        .flat_map_iter(|h| {
            let mut slab = Vec::new();
            for k in -limit..=limit {
                for l in -limit..=limit {
                    if h == 0 && k == 0 && l == 0 {
                        continue;
                    }
                    if let Some(peak) =
                        evaluate_hkl(structure, &settings, a_star, b_star, c_star, h, k, l)
                    {
                        slab.push(peak);
                    }
                }
            }
            slab
        })
        .collect();

    // 4. Merge symmetry-equivalent peaks and normalize
    peaks.sort_by(|x, y| x.two_theta.partial_cmp(&y.two_theta).unwrap_or(Ordering::Equal));
    let mut merged: Vec<Peak> = Vec::new();
    for peak in peaks {
        match merged.last_mut() {
            Some(prev) if (peak.two_theta - prev.two_theta).abs() < MERGE_TOL_DEG => {
                prev.intensity += peak.intensity;
            }
            _ => merged.push(peak),
        }
    }

    let max_i = merged.iter().map(|p| p.intensity).fold(0.0, f64::max);
    if max_i > 1e-9 {
        for p in &mut merged {
            p.intensity = p.intensity / max_i * 100.0;
        }
    }

    Ok(merged)
}

fn evaluate_hkl(
    structure: &Structure,
    settings: &PatternSettings,
    a_star: [f64; 3],
    b_star: [f64; 3],
    c_star: [f64; 3],
    h: i32,
    k: i32,
    l: i32,
) -> Option<Peak> {
    let g = [
        h as f64 * a_star[0] + k as f64 * b_star[0] + l as f64 * c_star[0],
        h as f64 * a_star[1] + k as f64 * b_star[1] + l as f64 * c_star[1],
        h as f64 * a_star[2] + k as f64 * b_star[2] + l as f64 * c_star[2],
    ];
    let g_mag = magnitude(g);
    if g_mag < 1e-10 {
        return None;
    }

    let d_spacing = 1.0 / g_mag;
    let sin_theta = settings.wavelength / (2.0 * d_spacing);
    if sin_theta > 1.0 {
        return None;
    }

    let theta = sin_theta.asin();
    let two_theta = 2.0 * theta.to_degrees();
    if two_theta < settings.min_2theta || two_theta > settings.max_2theta {
        return None;
    }

    // Structure factor F = Σ f_j · exp(2πi G·r_j)
    let mut f = Complex64::new(0.0, 0.0);
    for atom in &structure.atoms {
        let f0 = elements::scattering_factor(&atom.element);
        let phase = 2.0
            * PI
            * (g[0] * atom.position[0] + g[1] * atom.position[1] + g[2] * atom.position[2]);
        f += f0 * Complex64::from_polar(1.0, phase);
    }

    let f_sq = f.norm_sqr();
    if f_sq < 1e-8 {
        return None;
    }

    // Lorentz-polarization factor
    let lp = (1.0 + (2.0 * theta).cos().powi(2)) / (theta.sin().powi(2) * theta.cos());

    Some(Peak {
        two_theta,
        d_spacing,
        intensity: f_sq * lp,
        h,
        k,
        l,
    })
}

fn dot(u: [f64; 3], v: [f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn cross(u: [f64; 3], v: [f64; 3]) -> [f64; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn scale(v: [f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn magnitude(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}
