//! Environmental sensor polling
//!
//! [Poller] reads a [EnvironmentalSensor] at a fixed interval and writes one
//! line per sample, in the format of the humidity log files.

use chrono::{Local, NaiveDateTime};
use std::{
    io::Write,
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

#[cfg(feature = "sensor")]
mod linux;
#[cfg(feature = "sensor")]
pub use linux::Bme680Sensor;

#[derive(thiserror::Error, Debug)]
pub enum SensorError {
    #[error("failed to initialize the sensor on {device} (primary & secondary addresses): {message}")]
    Init { device: String, message: String },
    #[error("failed to configure the sensor: {0}")]
    Configure(String),
    #[error("failed to read the sensor: {0}")]
    Read(String),
    #[error("failed to write the sensor data")]
    Io(#[from] std::io::Error),
}
type Result<T> = std::result::Result<T, SensorError>;

/// Sensor oversampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    Skipped,
    OS1x,
    OS2x,
    OS4x,
    OS8x,
    OS16x,
}

/// Sensor IIR filter size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSize {
    Off,
    Size1,
    Size3,
    Size7,
    Size15,
    Size31,
    Size63,
    Size127,
}

/// Noise reduction settings, applied once before polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub humidity_oversampling: Oversampling,
    pub temperature_oversampling: Oversampling,
    pub filter: FilterSize,
}
impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            humidity_oversampling: Oversampling::OS2x,
            temperature_oversampling: Oversampling::OS8x,
            filter: FilterSize::Size3,
        }
    }
}

/// A sensor sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// temperature [C]
    pub temperature: f64,
    /// relative humidity [%RH]
    pub humidity: f64,
}

/// Temperature & humidity sensor
pub trait EnvironmentalSensor {
    fn configure(&mut self, settings: &SensorSettings) -> Result<()>;
    /// Returns `None` if the sensor has no new data
    fn read(&mut self) -> Result<Option<Sample>>;
}

/// Formats a sample as a humidity log line
pub fn format_line(timestamp: NaiveDateTime, sample: &Sample) -> String {
    format!(
        "{},{:.2} C,{:.2} %RH",
        timestamp.format("%Y-%m-%d,%H:%M:%S"),
        sample.temperature,
        sample.humidity
    )
}

/// Parses a polling interval in whole seconds, at least 1s
pub fn parse_interval(seconds: &str) -> std::result::Result<Duration, String> {
    match seconds.trim().parse::<u64>() {
        Ok(0) => Err("the polling interval must be at least 1s".into()),
        Ok(s) => Ok(Duration::from_secs(s)),
        Err(e) => Err(format!("invalid polling interval {:?}: {}", seconds, e)),
    }
}

/// Sensor poller
pub struct Poller<S> {
    sensor: S,
    settings: SensorSettings,
    interval: Duration,
}
impl<S: EnvironmentalSensor> Poller<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            settings: Default::default(),
            interval: Duration::from_secs(30),
        }
    }
    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }
    pub fn settings(self, settings: SensorSettings) -> Self {
        Self { settings, ..self }
    }
    /// Polls the sensor until a message is received on `shutdown` or its sender is dropped
    ///
    /// Returns the number of lines written to `out`.
    pub fn run<W: Write>(&mut self, mut out: W, shutdown: &Receiver<()>) -> Result<usize> {
        self.sensor.configure(&self.settings)?;
        log::info!(
            "polling every {}s with {:?}",
            self.interval.as_secs_f64(),
            self.settings
        );
        let mut n_line = 0;
        loop {
            match self.sensor.read() {
                Ok(Some(sample)) => {
                    writeln!(out, "{}", format_line(Local::now().naive_local(), &sample))?;
                    out.flush()?;
                    n_line += 1;
                }
                Ok(None) => log::debug!("no new sensor data"),
                Err(e) => log::warn!("{}", e),
            }
            match shutdown.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::info!("{} samples written", n_line);
        Ok(n_line)
    }
    pub fn into_inner(self) -> S {
        self.sensor
    }
}
