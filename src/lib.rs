//! Temperature & humidity logs
//!
//! Humidity log files are named `"<YYYY-MM-DD> humiditydata.txt"` and hold one
//! reading per line:
//! ```text
//! 2023-11-19,18:40:58,20.49 C,55.17 %RH
//! ```
//! The crate finds the log files ([Catalog]), parses them ([parse_line]),
//! averages them per day or per hour of the day ([aggregate]) and plots
//! temperature and humidity on a dual axis chart ([Chart]).
//! The [sensor] module writes such log lines from a BME680 sensor.

pub mod aggregate;
pub mod catalog;
pub mod chart;
pub mod driver;
mod error;
#[cfg(feature = "plot")]
pub mod plot;
pub mod record;
pub mod sensor;

pub use catalog::{Catalog, CatalogLoader, LogFile, DATA_FILE_SUFFIX};
pub use chart::{Chart, Plot};
pub use driver::Driver;
pub use error::Error;
#[cfg(feature = "plot")]
pub use plot::SvgPlot;
pub use record::{parse_line, Reading};
