use crate::{
    aggregate::Point,
    catalog::{Catalog, LogFile},
};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("nothing to plot for {0:?}")]
    Empty(String),
    #[error("failed to draw {name:?}: {message}")]
    Drawing { name: String, message: String },
    #[error("failed to open chart {path:?} with {viewer:?}")]
    Viewer {
        viewer: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Chart abscissa
#[derive(Debug, Clone, PartialEq)]
pub enum Abscissa {
    /// Date & time with the tick labels `strftime` format
    Time {
        values: Vec<NaiveDateTime>,
        format: &'static str,
    },
    /// Hour of the day, over a fixed `[0,24]` range
    Hour(Vec<u32>),
}
impl Abscissa {
    pub fn len(&self) -> usize {
        match self {
            Abscissa::Time { values, .. } => values.len(),
            Abscissa::Hour(values) => values.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Abscissa as floating point numbers: seconds since Unix epoch or hours
    pub fn values(&self) -> Vec<f64> {
        match self {
            Abscissa::Time { values, .. } => values
                .iter()
                .map(|t| t.and_utc().timestamp() as f64)
                .collect(),
            Abscissa::Hour(values) => values.iter().map(|&h| h as f64).collect(),
        }
    }
    /// Tick label of the floating point abscissa `x`
    pub fn label(&self, x: f64) -> String {
        match self {
            Abscissa::Time { format, .. } => DateTime::from_timestamp(x.round() as i64, 0)
                .map(|t| t.naive_utc().format(format).to_string())
                .unwrap_or_default(),
            Abscissa::Hour(_) => format!("{:.0}", x),
        }
    }
}

#[derive(Serialize)]
struct TimeRow {
    #[serde(rename = "Time")]
    time: NaiveDateTime,
    #[serde(rename = "Temperature [C]")]
    temperature: f64,
    #[serde(rename = "Humidity [%RH]")]
    humidity: f64,
}

#[derive(Serialize)]
struct HourRow {
    #[serde(rename = "Hour")]
    hour: u32,
    #[serde(rename = "Temperature [C]")]
    temperature: f64,
    #[serde(rename = "Humidity [%RH]")]
    humidity: f64,
}

/// Temperature & humidity dual axis chart
///
/// Temperature goes on the left axis, humidity on the right one.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// file stem of the rendered chart
    pub name: String,
    pub title: String,
    pub x_label: &'static str,
    pub temperature_label: &'static str,
    pub humidity_label: &'static str,
    pub x: Abscissa,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}
impl Chart {
    fn time_series(
        points: Vec<Point<NaiveDateTime>>,
        format: &'static str,
    ) -> (Abscissa, Vec<f64>, Vec<f64>) {
        let (values, (temperature, humidity)): (Vec<_>, (Vec<_>, Vec<_>)) = points
            .into_iter()
            .map(|p| (p.x, (p.temperature, p.humidity)))
            .unzip();
        (Abscissa::Time { values, format }, temperature, humidity)
    }
    /// Readings of a single day
    pub fn day(file: &LogFile, points: Vec<Point<NaiveDateTime>>) -> Self {
        let (x, temperature, humidity) = Self::time_series(points, "%H:00");
        Self {
            name: format!("{}_day", file.date),
            title: format!("Temperature & Humidity for {}", file.date),
            x_label: "Time",
            temperature_label: "Temperature (\u{b0}C)",
            humidity_label: "Humidity (%RH)",
            x,
            temperature,
            humidity,
        }
    }
    /// Daily averages
    pub fn daily(catalog: &Catalog, points: Vec<Point<NaiveDateTime>>) -> Self {
        let (x, temperature, humidity) = Self::time_series(points, "%d-%b");
        Self {
            name: format!("{}_{}_daily", catalog.first_date(), catalog.last_date()),
            title: format!(
                "Daily averages {} - {}",
                catalog.first_date(),
                catalog.last_date()
            ),
            x_label: "Day",
            temperature_label: "Average Temperature (\u{b0}C)",
            humidity_label: "Average Humidity (%RH)",
            x,
            temperature,
            humidity,
        }
    }
    /// Hourly averages
    pub fn hourly(catalog: &Catalog, points: Vec<Point<u32>>) -> Self {
        let (hours, (temperature, humidity)): (Vec<_>, (Vec<_>, Vec<_>)) = points
            .into_iter()
            .map(|p| (p.x, (p.temperature, p.humidity)))
            .unzip();
        Self {
            name: format!("{}_{}_hourly", catalog.first_date(), catalog.last_date()),
            title: format!("Hourly Averages ({} Days)", catalog.len()),
            x_label: "Hour",
            temperature_label: "Average Temperature (\u{b0}C)",
            humidity_label: "Average Humidity (%RH)",
            x: Abscissa::Hour(hours),
            temperature,
            humidity,
        }
    }
    /// All the readings
    pub fn continuous(catalog: &Catalog, points: Vec<Point<NaiveDateTime>>) -> Self {
        let (x, temperature, humidity) = Self::time_series(points, "%d-%b");
        Self {
            name: format!(
                "{}_{}_continuous",
                catalog.first_date(),
                catalog.last_date()
            ),
            title: format!(
                "Continuous readings from {} to {}",
                catalog.first_date(),
                catalog.last_date()
            ),
            x_label: "Day",
            temperature_label: "Temperature (\u{b0}C)",
            humidity_label: "Humidity (%RH)",
            x,
            temperature,
            humidity,
        }
    }
    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    /// Writes the chart samples to a CSV file, at full precision
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_path(path)?;
        let samples = self.temperature.iter().zip(&self.humidity);
        match &self.x {
            Abscissa::Time { values, .. } => {
                for (&time, (&temperature, &humidity)) in values.iter().zip(samples) {
                    wtr.serialize(TimeRow {
                        time,
                        temperature,
                        humidity,
                    })?;
                }
            }
            Abscissa::Hour(values) => {
                for (&hour, (&temperature, &humidity)) in values.iter().zip(samples) {
                    wtr.serialize(HourRow {
                        hour,
                        temperature,
                        humidity,
                    })?;
                }
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Chart renderer
pub trait Plot {
    /// Renders the chart and returns where it was written to
    fn plot(&mut self, chart: &Chart) -> Result<PathBuf, PlotError>;
}
