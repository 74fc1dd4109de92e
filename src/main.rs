// src/main.rs

use clap::Parser;
use log::LevelFilter;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod utils;

use config::Config;
use error::{Result, SimError};
use physics::profile::{self, ProfileAxis};
use physics::projector;
use physics::{SimInputs, Source};

#[derive(Parser, Debug)]
#[command(
    name = "ringsim",
    version,
    about = "Powder diffraction ring simulation for flat area detectors"
)]
struct Cli {
    /// Configuration file (JSON); defaults to the OS config location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Structure file (CIF); switches to the structure-factor path
    #[arg(long)]
    cif: Option<PathBuf>,

    /// Output directory for the plots
    #[arg(short, long, default_value = "ringsim-out")]
    out: PathBuf,

    /// Emit SVG plots instead of PNG
    #[arg(long)]
    svg: bool,

    /// Probe a detector point in mm, beam-centered frame, e.g. --probe 12.5,40
    #[arg(long)]
    probe: Option<String>,

    /// Plot the reduced pattern in q instead of 2θ
    #[arg(long)]
    q_axis: bool,

    /// Draw hkl labels on the rings
    #[arg(long)]
    labels: bool,

    /// Write the reflection list as JSON next to the plots
    #[arg(long)]
    dump: bool,

    /// Save the effective configuration to the default location
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = utils::logger::init(level);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // 1. Configuration, then CLI overrides
    let mut cfg = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => {
            let (cfg, diag) = Config::load_default();
            log::debug!("{}", diag);
            cfg
        }
    };

    if let Some(cif) = &cli.cif {
        cfg.cif_path = Some(cif.clone());
        cfg.use_cif = true;
    }
    if cli.q_axis {
        cfg.plot_q = true;
    }
    if cli.labels {
        cfg.show_labels = true;
    }

    let source = if cfg.use_cif {
        let path = cfg
            .cif_path
            .clone()
            .ok_or_else(|| SimError::Config("use_cif is set but no cif_path given".to_string()))?;
        Source::StructureFile {
            path,
            load_conventional: cfg.load_conventional,
        }
    } else {
        Source::Analytic
    };

    // 2. One full recompute pass
    let inputs = SimInputs {
        cell: cfg.cell,
        space_group: cfg.space_group,
        energy_ev: cfg.energy_ev,
        lattice_tolerance: cfg.lattice_tolerance,
        source,
    };
    let snapshot = physics::recompute(&inputs)?;

    log::info!("{}", snapshot.message);
    log::info!(
        "{} reflections at λ = {:.4} Å",
        snapshot.reflections.len(),
        snapshot.wavelength
    );
    let (poni1, poni2) = cfg.detector.poni();
    log::info!("PONI1 = {:.2}; PONI2 = {:.2}", poni1, poni2);

    // 3. Projection and reduction
    let rings = projector::project_rings(&snapshot.reflections, snapshot.wavelength, &cfg.detector);
    let axis = if cfg.plot_q {
        ProfileAxis::Q
    } else {
        ProfileAxis::TwoTheta
    };
    let reduced = profile::reduce(&rings, &cfg.detector, snapshot.wavelength, axis);
    log::info!(
        "{} rings in range, {} inside the detector window",
        rings.len(),
        reduced.bins.len()
    );

    // 4. Outputs
    fs::create_dir_all(&cli.out)
        .map_err(|e| SimError::Config(format!("cannot create {:?}: {}", cli.out, e)))?;
    let ext = if cli.svg { "svg" } else { "png" };

    let detector_path = cli.out.join(format!("detector.{}", ext));
    rendering::detector::render(&detector_path, &rings, &cfg.detector, cfg.show_labels)?;

    let profile_path = cli.out.join(format!("profile.{}", ext));
    rendering::profile::render(&profile_path, &reduced)?;

    log::info!("Wrote {:?} and {:?}", detector_path, profile_path);

    if cli.dump {
        let dump_path = cli.out.join("reflections.json");
        let file = File::create(&dump_path)
            .map_err(|e| SimError::Config(format!("cannot create {:?}: {}", dump_path, e)))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
            .map_err(|e| SimError::Config(format!("cannot write {:?}: {}", dump_path, e)))?;
        log::info!("Wrote {:?}", dump_path);
    }

    if let Some(spec) = &cli.probe {
        let (x, y) = parse_probe(spec)?;
        let info = projector::probe(x, y, snapshot.wavelength, &cfg.detector, &snapshot.reflections);
        println!("{}", info);
    }

    if cli.save_config {
        log::info!("{}", cfg.save());
    }

    Ok(())
}

fn parse_probe(spec: &str) -> Result<(f64, f64)> {
    let invalid = || SimError::InvalidArgument(format!("--probe expects X,Y in mm, got {:?}", spec));

    let (x, y) = spec.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_spec_parses_with_spaces() {
        assert_eq!(parse_probe("12.5,40").unwrap(), (12.5, 40.0));
        assert_eq!(parse_probe(" -3.0 , 7 ").unwrap(), (-3.0, 7.0));
        assert!(parse_probe("12.5").is_err());
        assert!(parse_probe("a,b").is_err());
    }
}
