use crate::chart::{Abscissa, Chart, Plot, PlotError};
use plotters::prelude::*;
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// Renders charts to SVG files
///
/// If a viewer is set, the viewer is started on each new chart and
/// [SvgPlot::plot] returns only once the viewer is closed.
pub struct SvgPlot {
    output_dir: PathBuf,
    size: (u32, u32),
    viewer: Option<String>,
}
impl Default for SvgPlot {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            size: (768, 512),
            viewer: None,
        }
    }
}
impl SvgPlot {
    pub fn output_dir<P: AsRef<Path>>(self, output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn size(self, width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..self
        }
    }
    pub fn viewer<S: Into<String>>(self, viewer: S) -> Self {
        Self {
            viewer: Some(viewer.into()),
            ..self
        }
    }
    fn draw(&self, chart: &Chart, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let max_value = |x: &[f64]| -> f64 { x.iter().cloned().fold(f64::NEG_INFINITY, f64::max) };
        let min_value = |x: &[f64]| -> f64 { x.iter().cloned().fold(f64::INFINITY, f64::min) };
        // 5% padding, or a unit one around flat series
        let padded = |x: &[f64], unit: f64| {
            let (min, max) = (min_value(x), max_value(x));
            let pad = if max > min { (max - min) * 5e-2 } else { unit };
            min - pad..max + pad
        };

        let x = chart.x.values();
        let x_range = match chart.x {
            Abscissa::Hour(_) => 0f64..24f64,
            Abscissa::Time { .. } => padded(&x, 1800.),
        };
        let red = colorous::CATEGORY10[3];
        let red = RGBColor(red.r, red.g, red.b);
        let blue = colorous::CATEGORY10[0];
        let blue = RGBColor(blue.r, blue.g, blue.b);

        let plot = SVGBackend::new(path, self.size).into_drawing_area();
        plot.fill(&WHITE)?;
        let mut fig = ChartBuilder::on(&plot)
            .caption(&chart.title, ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Right, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d(x_range.clone(), padded(&chart.temperature, 1.))?
            .set_secondary_coord(x_range, padded(&chart.humidity, 1.));
        let x_label_formatter = |x: &f64| chart.x.label(*x);
        fig.configure_mesh()
            .disable_mesh()
            .x_desc(chart.x_label)
            .x_label_formatter(&x_label_formatter)
            .x_labels(9)
            .y_desc(chart.temperature_label)
            .y_label_style(("sans-serif", 12).into_font().color(&red))
            .axis_desc_style(("sans-serif", 15).into_font().color(&red))
            .draw()?;
        fig.configure_secondary_axes()
            .y_desc(chart.humidity_label)
            .label_style(("sans-serif", 12).into_font().color(&blue))
            .axis_desc_style(("sans-serif", 15).into_font().color(&blue))
            .draw()?;

        fig.draw_series(LineSeries::new(
            x.iter().cloned().zip(chart.temperature.iter().cloned()),
            &red,
        ))?;
        fig.draw_secondary_series(LineSeries::new(
            x.iter().cloned().zip(chart.humidity.iter().cloned()),
            &blue,
        ))?;
        plot.present()?;
        Ok(())
    }
}
impl Plot for SvgPlot {
    fn plot(&mut self, chart: &Chart) -> Result<PathBuf, PlotError> {
        if chart.is_empty() {
            return Err(PlotError::Empty(chart.title.clone()));
        }
        let path = self.output_dir.join(&chart.name).with_extension("svg");
        self.draw(chart, &path).map_err(|e| PlotError::Drawing {
            name: chart.name.clone(),
            message: e.to_string(),
        })?;
        log::info!("{} written to {:?}", chart.title, path);
        if let Some(viewer) = &self.viewer {
            let status = Command::new(viewer)
                .arg(&path)
                .status()
                .map_err(|source| PlotError::Viewer {
                    viewer: viewer.clone(),
                    path: path.clone(),
                    source,
                })?;
            log::debug!("{} exited with {}", viewer, status);
        }
        Ok(path)
    }
}
