// src/physics/projector.rs

use crate::model::Reflection;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Number of azimuthal samples per ring.
pub const RING_POINTS: usize = 100;

/// Display cutoff: rings beyond this scattering angle (rad) are dropped.
pub const TWO_THETA_CUTOFF_RAD: f64 = 1.57;

/// Duane–Hunt-style conversion, energy in eV to wavelength in Å.
pub fn wavelength_angstrom(energy_ev: f64) -> f64 {
    12398.0 / energy_ev
}

/// Flat detector at normal incidence.
///
/// All coordinates live in one beam-centered frame on the detector plane:
/// the beam axis pierces the origin, the detector footprint occupies
/// x ∈ [beam_x − width/2, beam_x + width/2], y ∈ [beam_y, beam_y + height].
/// Both the ring renderer and the 1-D reducer consume this frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorGeometry {
    /// Horizontal beam offset from the detector center line (mm).
    pub beam_x: f64,
    /// Vertical beam offset below the detector bottom edge (mm).
    pub beam_y: f64,
    /// Sample-to-detector distance along the beam (mm).
    pub distance: f64,
    /// Active width (mm).
    pub width: f64,
    /// Active height (mm).
    pub height: f64,
}

impl Default for DetectorGeometry {
    fn default() -> Self {
        // EIGER-1M-like footprint at a typical beamline working distance
        Self {
            beam_x: 15.0,
            beam_y: 30.0,
            distance: 150.0,
            width: 79.9,
            height: 77.2,
        }
    }
}

impl DetectorGeometry {
    /// Point-of-normal-incidence coordinates: PONI1 = beam_x,
    /// PONI2 = beam_y + height.
    pub fn poni(&self) -> (f64, f64) {
        (self.beam_x, self.beam_y + self.height)
    }

    /// Footprint rectangle ((x0, x1), (y0, y1)) in the beam-centered frame.
    pub fn footprint(&self) -> ((f64, f64), (f64, f64)) {
        (
            (self.beam_x - self.width / 2.0, self.beam_x + self.width / 2.0),
            (self.beam_y, self.beam_y + self.height),
        )
    }

    /// Scattering-angle window [tth_min, tth_max] (degrees) subtended by the
    /// detector corners: nearest and farthest footprint point from the beam
    /// axis, mapped through atan(r / distance).
    pub fn two_theta_window_deg(&self) -> (f64, f64) {
        let x_max = self.width / 2.0 + self.beam_x.abs();
        let x_min = if self.beam_x.abs() < self.width / 2.0 {
            0.0
        } else {
            self.beam_x.abs() - self.width / 2.0
        };
        let y_min = self.beam_y;
        let y_max = self.beam_y + self.height;

        let r_min = (x_min * x_min + y_min * y_min).sqrt();
        let r_max = (x_max * x_max + y_max * y_max).sqrt();

        (
            (r_min / self.distance).atan().to_degrees(),
            (r_max / self.distance).atan().to_degrees(),
        )
    }
}

/// One diffraction cone projected onto the detector plane.
#[derive(Debug, Clone)]
pub struct Ring {
    /// Full scattering angle in radians.
    pub two_theta: f64,
    /// Circle radius on the detector plane (mm).
    pub radius: f64,
    pub h: i32,
    pub k: i32,
    pub l: i32,
    pub intensity: Option<f64>,
    /// Discretized circle, RING_POINTS azimuths over 0..2π.
    pub points: Vec<(f64, f64)>,
}

/// Forward mapping: one ring per reflection that has a physical Bragg
/// solution (λ/2d < 1) and falls inside the display cutoff. Consecutive
/// reflections with bitwise-equal d collapse onto a single ring, preserving
/// the enumeration-order de-duplication of the reflection list.
pub fn project_rings(
    reflections: &[Reflection],
    wavelength: f64,
    geom: &DetectorGeometry,
) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut d_prev = 0.0;

    for refl in reflections {
        let sin_theta = wavelength / (2.0 * refl.d_spacing);
        if sin_theta >= 1.0 {
            continue;
        }
        let two_theta = 2.0 * sin_theta.asin();
        if two_theta > TWO_THETA_CUTOFF_RAD {
            continue;
        }
        if refl.d_spacing == d_prev {
            continue;
        }
        d_prev = refl.d_spacing;

        let radius = (geom.distance * two_theta.tan()).abs();
        let points = (0..RING_POINTS)
            .map(|i| {
                let az = 2.0 * PI * i as f64 / (RING_POINTS - 1) as f64;
                (radius * az.cos(), radius * az.sin())
            })
            .collect();

        rings.push(Ring {
            two_theta,
            radius,
            h: refl.h,
            k: refl.k,
            l: refl.l,
            intensity: refl.intensity,
            points,
        });
    }

    rings
}

/// Reflection identified by an inverse query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    pub intensity: Option<f64>,
}

/// Inverse mapping of a detector-plane point.
#[derive(Debug, Clone)]
pub struct ProbeInfo {
    pub x: f64,
    pub y: f64,
    pub two_theta_deg: f64,
    /// Momentum transfer 4π·sinθ/λ in Å⁻¹.
    pub q: f64,
    /// Bragg spacing λ/(2·sinθ) in Å; infinite on the beam axis.
    pub d_spacing: f64,
    pub hit: Option<ProbeHit>,
}

impl fmt::Display for ProbeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "x={:.2} mm, y={:.2} mm, tth={:.2} deg, q={:.3} Å-1",
            self.x, self.y, self.two_theta_deg, self.q
        )?;
        if let Some(hit) = &self.hit {
            write!(f, "\nhkl = {} {} {}", hit.h, hit.k, hit.l)?;
            if let Some(i) = hit.intensity {
                write!(f, "\nIntensity = {:.2}", i)?;
            }
        }
        Ok(())
    }
}

/// Inverse mapping for a point (x, y) in the beam-centered frame:
/// r → 2θ → d → q, plus the nearest reflection within 0.5 % relative
/// tolerance on d. The first match in enumeration order is reported; later
/// equally-close reflections are physically indistinguishable rings.
///
/// With an empty reflection list the geometric quantities are still
/// computed and `hit` is None.
pub fn probe(
    x: f64,
    y: f64,
    wavelength: f64,
    geom: &DetectorGeometry,
    reflections: &[Reflection],
) -> ProbeInfo {
    let r = (x * x + y * y).sqrt();
    let two_theta = (r / geom.distance).atan();
    let theta = two_theta / 2.0;

    let d_calc = wavelength / (2.0 * theta.sin());
    let q = 4.0 * PI * theta.sin() / wavelength;

    let hit = reflections
        .iter()
        .find(|refl| is_close(d_calc, refl.d_spacing, 0.005))
        .map(|refl| ProbeHit {
            h: refl.h,
            k: refl.k,
            l: refl.l,
            intensity: refl.intensity,
        });

    ProbeInfo {
        x,
        y,
        two_theta_deg: two_theta.to_degrees(),
        q,
        d_spacing: d_calc,
        hit,
    }
}

/// Relative closeness against the larger magnitude, the same contract as
/// `math.isclose(rel_tol = ...)`.
fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}
