use crate::{
    catalog::{CatalogError, LoadError},
    chart::PlotError,
    sensor::SensorError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("failed to export the chart data")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Sensor(#[from] SensorError),
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
}
impl Error {
    /// The error message followed by its causes
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            report.push_str(": ");
            report.push_str(&cause.to_string());
            current = cause.source();
        }
        report
    }
}
