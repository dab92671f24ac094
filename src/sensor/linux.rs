//! BME680 on a Linux I2C bus

use super::{
    EnvironmentalSensor, FilterSize, Oversampling, Result, Sample, SensorError, SensorSettings,
};
use bme680::{
    Bme680, FieldDataCondition, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode,
    SettingsBuilder,
};
use linux_embedded_hal::{Delay, I2cdev};
use std::{fmt::Debug, path::Path};

impl From<Oversampling> for OversamplingSetting {
    fn from(value: Oversampling) -> Self {
        match value {
            Oversampling::Skipped => OversamplingSetting::OSNone,
            Oversampling::OS1x => OversamplingSetting::OS1x,
            Oversampling::OS2x => OversamplingSetting::OS2x,
            Oversampling::OS4x => OversamplingSetting::OS4x,
            Oversampling::OS8x => OversamplingSetting::OS8x,
            Oversampling::OS16x => OversamplingSetting::OS16x,
        }
    }
}
impl From<FilterSize> for IIRFilterSize {
    fn from(value: FilterSize) -> Self {
        match value {
            FilterSize::Off => IIRFilterSize::Size0,
            FilterSize::Size1 => IIRFilterSize::Size1,
            FilterSize::Size3 => IIRFilterSize::Size3,
            FilterSize::Size7 => IIRFilterSize::Size7,
            FilterSize::Size15 => IIRFilterSize::Size15,
            FilterSize::Size31 => IIRFilterSize::Size31,
            FilterSize::Size63 => IIRFilterSize::Size63,
            FilterSize::Size127 => IIRFilterSize::Size127,
        }
    }
}

fn read_error<E: Debug>(e: E) -> SensorError {
    SensorError::Read(format!("{:?}", e))
}

/// BME680 temperature, humidity, pressure & gas sensor
///
/// Only temperature and humidity are measured, the gas heater is off.
pub struct Bme680Sensor {
    dev: Bme680<I2cdev, Delay>,
    delay: Delay,
}
impl Bme680Sensor {
    /// Opens the sensor on the I2C bus `device`, at the primary (0x76) or else
    /// the secondary (0x77) address
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self> {
        let device = device.as_ref();
        let init = |address: I2CAddress| -> std::result::Result<Bme680<I2cdev, Delay>, String> {
            let i2c = I2cdev::new(device).map_err(|e| e.to_string())?;
            Bme680::init(i2c, &mut Delay, address).map_err(|e| format!("{:?}", e))
        };
        let dev = init(I2CAddress::Primary)
            .or_else(|e| {
                log::warn!("no BME680 at the primary address ({}), trying secondary", e);
                init(I2CAddress::Secondary)
            })
            .map_err(|message| SensorError::Init {
                device: device.display().to_string(),
                message,
            })?;
        log::info!("BME680 found on {:?}", device);
        Ok(Self { dev, delay: Delay })
    }
}
impl EnvironmentalSensor for Bme680Sensor {
    fn configure(&mut self, settings: &SensorSettings) -> Result<()> {
        let settings = SettingsBuilder::new()
            .with_humidity_oversampling(settings.humidity_oversampling.into())
            .with_temperature_oversampling(settings.temperature_oversampling.into())
            .with_temperature_filter(settings.filter.into())
            .with_run_gas(false)
            .build();
        self.dev
            .set_sensor_settings(&mut self.delay, settings)
            .map_err(|e| SensorError::Configure(format!("{:?}", e)))
    }
    fn read(&mut self) -> Result<Option<Sample>> {
        // one measurement per forced mode request
        self.dev
            .set_sensor_mode(&mut self.delay, PowerMode::ForcedMode)
            .map_err(read_error)?;
        let (data, condition) = self.dev.get_sensor_data(&mut self.delay).map_err(read_error)?;
        Ok(match condition {
            FieldDataCondition::NewData => Some(Sample {
                temperature: f64::from(data.temperature_celsius()),
                humidity: f64::from(data.humidity_percent()),
            }),
            FieldDataCondition::Unchanged => None,
        })
    }
}
