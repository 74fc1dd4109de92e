// src/model/reflection.rs

use crate::model::cell::LatticeSystem;
use serde::Serialize;

/// One allowed lattice reflection.
///
/// The analytic path enumerates non-negative indices and leaves `intensity`
/// empty; the structure-file path carries signed indices and a relative
/// intensity scaled so the strongest peak is 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reflection {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    /// Interplanar spacing in Å.
    pub d_spacing: f64,
    pub intensity: Option<f64>,
}

/// Result of one full recompute pass.
///
/// Built into a temporary and returned by value, so consumers only ever see
/// a complete list. The snapshot is immutable after construction; a new
/// configuration produces a new snapshot rather than editing this one.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Classified crystal system (analytic path only; structure files carry
    /// their own symmetry).
    pub system: Option<LatticeSystem>,
    /// Human-readable status line for the presentation layer.
    pub message: String,
    /// X-ray wavelength in Å derived from the beam energy.
    pub wavelength: f64,
    pub reflections: Vec<Reflection>,
}
