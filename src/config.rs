// src/config.rs

use crate::error::{Result, SimError};
use crate::model::UnitCell;
use crate::physics::projector::DetectorGeometry;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
  #[serde(default)]
  pub cell: UnitCell,

  pub space_group: u16,
  pub energy_ev: f64,

  #[serde(default)]
  pub detector: DetectorGeometry,

  /// Plot the reduced pattern in q (Å⁻¹) instead of 2θ (deg).
  #[serde(default)]
  pub plot_q: bool,

  /// Draw hkl labels next to the rings.
  #[serde(default)]
  pub show_labels: bool,

  /// Structure file for the structure-factor path.
  #[serde(default)]
  pub cif_path: Option<PathBuf>,

  #[serde(default)]
  pub use_cif: bool,

  /// Standardize loaded structures to the conventional cell.
  #[serde(default)]
  pub load_conventional: bool,

  /// Classifier comparison tolerance; 0 keeps the exact-equality behavior.
  #[serde(default)]
  pub lattice_tolerance: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      cell: UnitCell::default(),
      space_group: 221,
      energy_ev: 10_000.0,
      detector: DetectorGeometry::default(),
      plot_q: false,
      show_labels: false,
      cif_path: None,
      use_cif: false,
      load_conventional: false,
      lattice_tolerance: 0.0,
    }
  }
}

impl Config {
  /// Loads config from the standard OS location
  /// (e.g. ~/.config/ringsim/settings.json), falling back to defaults.
  pub fn load_default() -> (Self, String) {
    let path = Self::get_path();
    if path.exists() {
      match File::open(&path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Loads config from an explicit path; unlike the default location this
  /// must succeed.
  pub fn load_from(path: &Path) -> Result<Self> {
    let file = File::open(path)
      .map_err(|e| SimError::Config(format!("cannot open {:?}: {}", path, e)))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
      .map_err(|e| SimError::Config(format!("cannot parse {:?}: {}", path, e)))
  }

  /// Saves config to the standard OS location.
  pub fn save(&self) -> String {
    let path = Self::get_path();
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(&path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("com", "example", "ringsim") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn defaults_mirror_the_reference_setup() {
    let cfg = Config::default();
    assert_eq!(cfg.space_group, 221);
    assert!((cfg.energy_ev - 10_000.0).abs() < 1e-12);
    assert!((cfg.cell.a - 4.15).abs() < 1e-12);
    assert!((cfg.detector.width - 79.9).abs() < 1e-12);
    assert!(!cfg.use_cif);
    assert_eq!(cfg.lattice_tolerance, 0.0);
  }

  #[test]
  fn partial_json_fills_in_defaults() {
    let path = std::env::temp_dir().join("ringsim_config_test.json");
    let mut file = File::create(&path).unwrap();
    file
      .write_all(br#"{ "space_group": 229, "energy_ev": 12000.0 }"#)
      .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.space_group, 229);
    assert!((cfg.energy_ev - 12_000.0).abs() < 1e-12);
    assert!((cfg.detector.distance - 150.0).abs() < 1e-12);
    assert!(!cfg.plot_q);
  }

  #[test]
  fn bad_json_is_a_config_error() {
    let path = std::env::temp_dir().join("ringsim_bad_config_test.json");
    let mut file = File::create(&path).unwrap();
    file.write_all(b"{ not json").unwrap();

    assert!(matches!(
      Config::load_from(&path),
      Err(SimError::Config(_))
    ));
  }
}
