// src/rendering/profile.rs

use crate::error::{Result, SimError};
use crate::physics::profile::{Profile, ProfileAxis};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Render the reduced 1-D pattern: one bar per ring inside the detector
/// window, with the window boundaries marked.
pub fn render(path: &Path, profile: &Profile) -> Result<()> {
    let size = (1000, 500);
    if path.extension().map_or(false, |e| e == "svg") {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, profile)?;
        root.present().map_err(|e| SimError::Plot(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw(&root, profile)?;
        root.present().map_err(|e| SimError::Plot(e.to_string()))?;
    }
    Ok(())
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, profile: &Profile) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    let y_max = profile
        .bins
        .iter()
        .map(|b| b.height)
        .fold(1.0_f64, f64::max)
        * 1.1;

    let x_desc = match profile.axis {
        ProfileAxis::TwoTheta => "tth (deg)",
        ProfileAxis::Q => "q = 4·pi·sin(th)/lambda (Å-1)",
    };

    let mut chart = ChartBuilder::on(root)
        .caption("Reduced 1D spectrum", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(profile.min..profile.max, 0.0..y_max)
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Intensity")
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    // Window boundaries
    for x in [profile.min, profile.max] {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, 0.0), (x, y_max)],
                BLUE.stroke_width(1),
            )))
            .map_err(|e| SimError::Plot(format!("{:?}", e)))?;
    }

    // Bars
    chart
        .draw_series(profile.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.x - bin.width / 2.0, 0.0), (bin.x + bin.width / 2.0, bin.height)],
                RGBColor(40, 40, 40).filled(),
            )
        }))
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    Ok(())
}
