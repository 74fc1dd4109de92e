// src/rendering/detector.rs

use crate::error::{Result, SimError};
use crate::physics::projector::{DetectorGeometry, Ring};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Render the detector view: footprint rectangle, diffraction rings
/// (greyscale by relative intensity), beam-center marker and optional hkl
/// labels. The backend is picked from the file extension (.svg or bitmap).
pub fn render(
    path: &Path,
    rings: &[Ring],
    geom: &DetectorGeometry,
    show_labels: bool,
) -> Result<()> {
    let size = (900, 900);
    if path.extension().map_or(false, |e| e == "svg") {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, rings, geom, show_labels)?;
        root.present().map_err(|e| SimError::Plot(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw(&root, rings, geom, show_labels)?;
        root.present().map_err(|e| SimError::Plot(e.to_string()))?;
    }
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rings: &[Ring],
    geom: &DetectorGeometry,
    show_labels: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    // Frame the footprint plus the beam center with a small margin
    let ((x0, x1), (y0, y1)) = geom.footprint();
    let pad = 5.0;
    let x_lo = x0.min(0.0) - pad;
    let x_hi = x1.max(0.0) + pad;
    let y_lo = y0.min(0.0) - pad;
    let y_hi = y1.max(0.0) + pad;

    let mut chart = ChartBuilder::on(root)
        .caption("Detector Image", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Detector X (mm)")
        .y_desc("Detector Y (mm)")
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    // 1. Footprint rectangle
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)],
            BLUE.stroke_width(2),
        )))
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    // 2. Rings, darkest for the strongest
    let mut toggle_pos = 0usize;
    for ring in rings {
        let color = match ring.intensity {
            Some(i) => {
                let c = (255.0 - i * 255.0 / 100.0).clamp(0.0, 255.0) as u8;
                RGBColor(c, c, c)
            }
            None => BLACK,
        };

        chart
            .draw_series(std::iter::once(PathElement::new(
                ring.points.clone(),
                color.stroke_width(2),
            )))
            .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

        if show_labels && ring.points.len() > 30 {
            // Cycle three azimuth anchors so adjacent labels do not overlap
            let anchor = ring.points[[20, 25, 30][toggle_pos]];
            toggle_pos = (toggle_pos + 1) % 3;

            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{}{}{}", ring.h, ring.k, ring.l),
                    anchor,
                    ("sans-serif", 13).into_font().color(&BLACK),
                )))
                .map_err(|e| SimError::Plot(format!("{:?}", e)))?;
        }
    }

    // 3. Beam-center marker
    chart
        .draw_series(std::iter::once(Cross::new((0.0, 0.0), 6, RED.stroke_width(2))))
        .map_err(|e| SimError::Plot(format!("{:?}", e)))?;

    Ok(())
}
