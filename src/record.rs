use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::num::ParseFloatError;

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("invalid {field} {value:?}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid {field} {value:?}")]
    Value {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("{field} is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },
}
type Result<T> = std::result::Result<T, RecordError>;

/// One timestamped temperature & humidity sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// temperature [C]
    pub temperature: f64,
    /// relative humidity [%RH]
    pub humidity: f64,
}

/// Parses a log line `YYYY-MM-DD,HH:MM:SS,<temperature> C,<humidity> %RH`
///
/// Only lines starting with `'2'` (a year in the 2000s) are data lines,
/// anything else returns `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Reading>> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if !line.starts_with('2') {
        return Ok(None);
    }
    let mut fields = line.split(',');
    let mut next = |name: &'static str| fields.next().ok_or(RecordError::MissingField(name));
    let (date, time, temperature, humidity) =
        (next("date")?, next("time")?, next("temperature")?, next("humidity")?);

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| {
        RecordError::Timestamp {
            field: "date",
            value: date.to_string(),
            source,
        }
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").map_err(|source| {
        RecordError::Timestamp {
            field: "time",
            value: time.to_string(),
            source,
        }
    })?;
    Ok(Some(Reading {
        timestamp: date.and_time(time),
        temperature: value("temperature", temperature)?,
        humidity: value("humidity", humidity)?,
    }))
}

// the number is whatever comes before the unit suffix
fn value(field: &'static str, text: &str) -> Result<f64> {
    let number = text.split(' ').next().unwrap_or_default();
    let value = number
        .parse::<f64>()
        .map_err(|source| RecordError::Value {
            field,
            value: text.to_string(),
            source,
        })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RecordError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn data_line() {
        let reading = parse_line("2023-11-19,18:40:58,20.49 C,55.17 %RH\n")
            .unwrap()
            .unwrap();
        assert_eq!(
            reading.timestamp,
            NaiveDate::from_ymd_opt(2023, 11, 19)
                .unwrap()
                .and_hms_opt(18, 40, 58)
                .unwrap()
        );
        assert!((reading.temperature - 20.49).abs() < 1e-9);
        assert!((reading.humidity - 55.17).abs() < 1e-9);
    }

    #[test]
    fn crlf_and_negative() {
        let reading = parse_line("2024-01-02,00:05:00,-3.50 C,98.00 %RH\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(reading.timestamp.hour(), 0);
        assert_eq!(reading.temperature, -3.5);
        assert_eq!(reading.humidity, 98.);
    }

    #[test]
    fn non_data_lines() {
        for line in [
            "",
            "\n",
            "Data sensing",
            "temperature-humidity.py - Displays date, time, temperature, and humidity.",
            "1999-12-31,23:59:59,20.00 C,50.00 %RH",
            " 2024-10-30,08:00:00,20.00 C,50.00 %RH",
        ] {
            assert!(parse_line(line).unwrap().is_none(), "{line:?}");
        }
    }

    #[test]
    fn malformed_number() {
        let err = parse_line("2024-10-30,08:00:00,twenty C,50.00 %RH").unwrap_err();
        assert!(matches!(
            err,
            RecordError::Value {
                field: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn missing_field() {
        let err = parse_line("2024-10-30,08:00:00,20.00 C").unwrap_err();
        assert!(matches!(err, RecordError::MissingField("humidity")));
    }

    #[test]
    fn malformed_timestamp() {
        assert!(matches!(
            parse_line("2024-13-30,08:00:00,20.00 C,50.00 %RH").unwrap_err(),
            RecordError::Timestamp { field: "date", .. }
        ));
        assert!(matches!(
            parse_line("2024-10-30,8h,20.00 C,50.00 %RH").unwrap_err(),
            RecordError::Timestamp { field: "time", .. }
        ));
    }

    #[test]
    fn not_finite() {
        let err = parse_line("2024-10-30,08:00:00,20.00 C,NaN %RH").unwrap_err();
        assert!(matches!(
            err,
            RecordError::NonFinite {
                field: "humidity",
                ..
            }
        ));
    }
}
