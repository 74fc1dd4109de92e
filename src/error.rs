// src/error.rs

use thiserror::Error;

/// Crate-wide error type.
///
/// Three families matter to callers: configuration errors (bad space group,
/// unreadable structure file) abort the current recompute and leave the
/// previous snapshot untouched; validation errors (lattice/space-group
/// mismatch) abort before enumeration begins; domain errors (degenerate cell
/// geometry for one specific hkl) are skipped per-triple by the enumerator.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown space group {0} (expected 1..=230)")]
    UnknownSpaceGroup(u16),

    #[error("Lattice parameters inconsistent with space group {space_group}: {reason}")]
    LatticeMismatch { space_group: u16, reason: String },

    #[error("Degenerate cell geometry for ({h} {k} {l}): {reason}")]
    DegenerateCell {
        h: i32,
        k: i32,
        l: i32,
        reason: &'static str,
    },

    #[error("Lattice matrix is singular (zero cell volume)")]
    SingularLattice,

    #[error("Failed to read structure file: {path}")]
    StructureRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse structure file {path}: {reason}")]
    StructureParse { path: String, reason: String },

    #[error("Unsupported structure format: {0}")]
    UnsupportedFormat(String),

    #[error("Symmetry search failed: {0}")]
    Symmetry(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
