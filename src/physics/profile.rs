// src/physics/profile.rs

use crate::physics::projector::{DetectorGeometry, Ring};
use std::f64::consts::PI;

/// X-axis of the reduced pattern. Both express the same scattering angle;
/// toggling the axis re-labels the bins without touching the reflection
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAxis {
    /// Scattering angle 2θ in degrees.
    TwoTheta,
    /// Momentum transfer q = 4π·sinθ/λ in Å⁻¹.
    Q,
}

/// One bar of the reduced pattern.
#[derive(Debug, Clone)]
pub struct ProfileBin {
    pub x: f64,
    pub height: f64,
    pub width: f64,
}

/// Reduced 1-D pattern over the angular window the detector actually
/// intercepts.
#[derive(Debug, Clone)]
pub struct Profile {
    pub axis: ProfileAxis,
    /// Window lower bound in axis units.
    pub min: f64,
    /// Window upper bound in axis units.
    pub max: f64,
    pub bins: Vec<ProfileBin>,
}

fn q_of_two_theta_deg(tth_deg: f64, wavelength: f64) -> f64 {
    4.0 * PI * (tth_deg.to_radians() / 2.0).sin() / wavelength
}

/// Restrict the ring set to the detector's 2θ window and bin it into bars.
///
/// Rings outside the window simply do not intersect the detector; they are
/// excluded without comment. Bar width is a fixed 1/100 of the window span;
/// bar height is the relative intensity, or 1 for rings from the analytic
/// path.
pub fn reduce(
    rings: &[Ring],
    geom: &DetectorGeometry,
    wavelength: f64,
    axis: ProfileAxis,
) -> Profile {
    let (tth_min, tth_max) = geom.two_theta_window_deg();

    let (min, max) = match axis {
        ProfileAxis::TwoTheta => (tth_min, tth_max),
        ProfileAxis::Q => (
            q_of_two_theta_deg(tth_min, wavelength),
            q_of_two_theta_deg(tth_max, wavelength),
        ),
    };
    let width = (max - min) / 100.0;

    let bins = rings
        .iter()
        .filter_map(|ring| {
            let tth_deg = ring.two_theta.to_degrees();
            if tth_deg <= tth_min || tth_deg >= tth_max {
                return None;
            }
            let x = match axis {
                ProfileAxis::TwoTheta => tth_deg,
                ProfileAxis::Q => q_of_two_theta_deg(tth_deg, wavelength),
            };
            Some(ProfileBin {
                x,
                height: ring.intensity.unwrap_or(1.0),
                width,
            })
        })
        .collect();

    Profile {
        axis,
        min,
        max,
        bins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reflection;
    use crate::physics::projector::{project_rings, wavelength_angstrom};

    fn ring_at_two_theta_deg(tth_deg: f64) -> Ring {
        Ring {
            two_theta: tth_deg.to_radians(),
            radius: 150.0 * tth_deg.to_radians().tan(),
            h: 1,
            k: 0,
            l: 0,
            intensity: None,
            points: Vec::new(),
        }
    }

    #[test]
    fn window_from_reference_geometry() {
        let geom = DetectorGeometry::default(); // 79.9 × 77.2, x 15, y 30, 150 mm
        let (tth_min, tth_max) = geom.two_theta_window_deg();

        // Near corner: (0, 30); far corner: (54.95, 107.2)
        assert!((tth_min - (30.0_f64 / 150.0).atan().to_degrees()).abs() < 1e-9);
        let r_max = (54.95_f64 * 54.95 + 107.2 * 107.2).sqrt();
        assert!((tth_max - (r_max / 150.0).atan().to_degrees()).abs() < 1e-9);
        assert!((tth_min - 11.3099).abs() < 1e-3);
        assert!((tth_max - 38.7766).abs() < 1e-3);
    }

    #[test]
    fn rings_outside_the_window_are_excluded() {
        let geom = DetectorGeometry::default();
        let wl = wavelength_angstrom(10_000.0);
        let rings = vec![
            ring_at_two_theta_deg(5.0),  // inside the beam-side gap
            ring_at_two_theta_deg(20.0), // on the detector
            ring_at_two_theta_deg(50.0), // beyond the far corner
        ];

        let profile = reduce(&rings, &geom, wl, ProfileAxis::TwoTheta);
        assert_eq!(profile.bins.len(), 1);
        assert!((profile.bins[0].x - 20.0).abs() < 1e-12);
        assert!((profile.bins[0].height - 1.0).abs() < 1e-12);
        assert!((profile.bins[0].width - (profile.max - profile.min) / 100.0).abs() < 1e-12);
    }

    #[test]
    fn axis_toggle_relabels_without_recomputation() {
        let geom = DetectorGeometry::default();
        let wl = wavelength_angstrom(10_000.0);
        // Build rings once from the reflection list; both reductions reuse them
        let reflections = vec![
            Reflection { h: 1, k: 0, l: 0, d_spacing: 4.15, intensity: None },
            Reflection { h: 1, k: 1, l: 0, d_spacing: 2.934, intensity: None },
            Reflection { h: 1, k: 1, l: 1, d_spacing: 2.396, intensity: None },
        ];
        let rings = project_rings(&reflections, wl, &geom);

        let tth = reduce(&rings, &geom, wl, ProfileAxis::TwoTheta);
        let q = reduce(&rings, &geom, wl, ProfileAxis::Q);

        assert_eq!(tth.bins.len(), q.bins.len());
        for (bt, bq) in tth.bins.iter().zip(q.bins.iter()) {
            assert!((bq.x - q_of_two_theta_deg(bt.x, wl)).abs() < 1e-12);
            assert!((bt.height - bq.height).abs() < 1e-12);
        }
        assert!((q.min - q_of_two_theta_deg(tth.min, wl)).abs() < 1e-12);
        assert!((q.max - q_of_two_theta_deg(tth.max, wl)).abs() < 1e-12);
    }

    #[test]
    fn structure_path_heights_carry_intensity() {
        let geom = DetectorGeometry::default();
        let wl = wavelength_angstrom(10_000.0);
        let mut ring = ring_at_two_theta_deg(20.0);
        ring.intensity = Some(63.7);

        let profile = reduce(&[ring], &geom, wl, ProfileAxis::TwoTheta);
        assert!((profile.bins[0].height - 63.7).abs() < 1e-12);
    }
}
