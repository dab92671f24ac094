//! Temperature & humidity aggregation
//!
//! Every routine reloads the data files it needs, nothing is cached between calls.

use crate::{
    catalog::{Catalog, LoadError, LogFile},
    record::Reading,
};
use chrono::{NaiveDateTime, NaiveTime, Timelike};

type Result<T> = std::result::Result<T, LoadError>;

/// A chart sample: abscissa, temperature [C] and humidity [%RH]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<X> {
    pub x: X,
    pub temperature: f64,
    pub humidity: f64,
}
impl From<&Reading> for Point<NaiveDateTime> {
    fn from(reading: &Reading) -> Self {
        Self {
            x: reading.timestamp,
            temperature: reading.temperature,
            humidity: reading.humidity,
        }
    }
}

/// Running sums of a group of readings
#[derive(Debug, Default, Clone, Copy)]
pub struct Accumulator {
    n: usize,
    temperature: f64,
    humidity: f64,
}
impl Accumulator {
    pub fn push(&mut self, reading: &Reading) {
        self.n += 1;
        self.temperature += reading.temperature;
        self.humidity += reading.humidity;
    }
    pub fn len(&self) -> usize {
        self.n
    }
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
    /// Mean temperature and humidity, `None` if nothing was accumulated
    pub fn mean(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            None
        } else {
            let n = self.n as f64;
            Some((self.temperature / n, self.humidity / n))
        }
    }
}
impl<'a> FromIterator<&'a Reading> for Accumulator {
    fn from_iter<T: IntoIterator<Item = &'a Reading>>(iter: T) -> Self {
        let mut acc = Accumulator::default();
        iter.into_iter().for_each(|reading| acc.push(reading));
        acc
    }
}

/// Mean temperature and humidity of `readings`
pub fn mean(readings: &[Reading]) -> Option<(f64, f64)> {
    readings.iter().collect::<Accumulator>().mean()
}

/// All the readings of a single day
pub fn single_day(file: &LogFile) -> Result<Vec<Point<NaiveDateTime>>> {
    Ok(file.load()?.iter().map(Point::from).collect())
}

/// Mean temperature and humidity of each day, set at midday
pub fn daily_average(catalog: &Catalog) -> Result<Vec<Point<NaiveDateTime>>> {
    let midday = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let mut points = Vec::with_capacity(catalog.len());
    for file in catalog.iter() {
        match mean(&file.load()?) {
            Some((temperature, humidity)) => points.push(Point {
                x: file.date.and_time(midday),
                temperature,
                humidity,
            }),
            None => log::warn!("{}: no readings, skipping day", file),
        }
    }
    Ok(points)
}

/// Mean temperature and humidity of each hour of the day, pooled over all the days
///
/// Hours without readings are left out.
pub fn hourly_average(catalog: &Catalog) -> Result<Vec<Point<u32>>> {
    let mut hours = [Accumulator::default(); 24];
    for file in catalog.iter() {
        for reading in file.load()? {
            hours[reading.timestamp.hour() as usize].push(&reading);
        }
    }
    Ok(hours
        .iter()
        .zip(0u32..)
        .filter_map(|(acc, hour)| {
            acc.mean().map(|(temperature, humidity)| Point {
                x: hour,
                temperature,
                humidity,
            })
        })
        .collect())
}

/// Every reading of every day, in chronological file order
pub fn continuous(catalog: &Catalog) -> Result<Vec<Point<NaiveDateTime>>> {
    let mut points = vec![];
    for file in catalog.iter() {
        points.extend(file.load()?.iter().map(Point::from));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::{fs::File, io::Write, path::Path};

    fn write(dir: &Path, date: &str, lines: &[&str]) {
        let mut file = File::create(dir.join(format!("{date} humiditydata.txt"))).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
    }

    fn reading(hms: (u32, u32, u32), temperature: f64, humidity: f64) -> Reading {
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2024, 10, 30)
                .unwrap()
                .and_hms_opt(hms.0, hms.1, hms.2)
                .unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn accumulator_mean() {
        let readings = [
            reading((8, 0, 0), 20., 50.),
            reading((8, 0, 30), 21., 51.),
            reading((8, 1, 0), 25., 60.),
        ];
        let (t, h) = mean(&readings).unwrap();
        assert!((t - 22.).abs() < 1e-12);
        assert!((h - 161. / 3.).abs() < 1e-12);
        assert_eq!(readings.iter().collect::<Accumulator>().len(), 3);
    }

    #[test]
    fn empty_group_has_no_mean() {
        assert!(mean(&[]).is_none());
        assert!(Accumulator::default().mean().is_none());
    }

    #[test]
    fn daily() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2024-10-30",
            &[
                "2024-10-30,08:00:00,20.00 C,50.00 %RH",
                "2024-10-30,09:00:00,22.00 C,52.00 %RH",
            ],
        );
        write(dir.path(), "2024-10-31", &["header only"]);
        write(
            dir.path(),
            "2024-11-01",
            &["2024-11-01,23:59:59,18.50 C,40.00 %RH"],
        );
        let catalog = Catalog::discover(dir.path()).unwrap();
        let points = daily_average(&catalog).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x.to_string(), "2024-10-30 12:00:00");
        assert!((points[0].temperature - 21.).abs() < 1e-12);
        assert!((points[0].humidity - 51.).abs() < 1e-12);
        assert_eq!(points[1].x.to_string(), "2024-11-01 12:00:00");
        assert_eq!(points[1].temperature, 18.5);
    }

    #[test]
    fn hourly_sorted_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2024-10-30",
            &[
                "2024-10-30,23:10:00,10.00 C,30.00 %RH",
                "2024-10-30,08:00:00,20.00 C,50.00 %RH",
                "2024-10-30,00:30:00,15.00 C,45.00 %RH",
            ],
        );
        write(
            dir.path(),
            "2024-10-31",
            &[
                "Data sensing",
                "2024-10-31,08:45:00,24.00 C,54.00 %RH",
                "2024-10-31,23:50:00,12.00 C,32.00 %RH",
            ],
        );
        let catalog = Catalog::discover(dir.path()).unwrap();
        let points = hourly_average(&catalog).unwrap();
        let hours: Vec<_> = points.iter().map(|p| p.x).collect();
        assert_eq!(hours, vec![0, 8, 23]);
        assert!((points[1].temperature - 22.).abs() < 1e-12);
        assert!((points[1].humidity - 52.).abs() < 1e-12);
        assert!((points[2].temperature - 11.).abs() < 1e-12);
    }

    #[test]
    fn continuous_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2024-10-31",
            &["2024-10-31,08:00:00,24.00 C,54.00 %RH"],
        );
        write(
            dir.path(),
            "2024-10-30",
            &[
                "2024-10-30,09:00:00,22.00 C,52.00 %RH",
                "2024-10-30,08:00:00,20.00 C,50.00 %RH",
            ],
        );
        let catalog = Catalog::discover(dir.path()).unwrap();
        let temperatures: Vec<_> = continuous(&catalog)
            .unwrap()
            .iter()
            .map(|p| p.temperature)
            .collect();
        assert_eq!(temperatures, vec![22., 20., 24.]);
    }

    #[test]
    fn malformed_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2024-10-30",
            &[
                "2024-10-30,08:00:00,20.00 C,50.00 %RH",
                "2024-10-30,09:00:00,22.00 C,oops %RH",
            ],
        );
        let catalog = Catalog::discover(dir.path()).unwrap();
        assert!(daily_average(&catalog).is_err());
        assert!(hourly_average(&catalog).is_err());
        assert!(continuous(&catalog).is_err());
        assert!(single_day(catalog.latest()).is_err());
    }
}
