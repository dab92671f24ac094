use crate::record::{parse_line, Reading, RecordError};
use chrono::NaiveDate;
use regex::Regex;
use std::{
    fmt,
    fs::{self, File},
    io::{BufRead, BufReader},
    ops::Deref,
    path::{Path, PathBuf},
    time::Instant,
};

/// File name suffix of the humidity log files
pub const DATA_FILE_SUFFIX: &str = "humiditydata.txt";

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to list data files in {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no data files found in {path:?}")]
    Empty { path: PathBuf },
    #[error("invalid data file pattern")]
    Regex(#[from] regex::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?}, line {line}: malformed data line")]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// A daily log file `"<YYYY-MM-DD> humiditydata.txt"`
#[derive(Debug, Clone, PartialEq)]
pub struct LogFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}
impl LogFile {
    /// The file name
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
    /// Reads every data line of the file, in order
    ///
    /// Non-data lines are skipped, a malformed data line aborts the load.
    pub fn load(&self) -> Result<Vec<Reading>, LoadError> {
        let io_error = |source| LoadError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::open(&self.path).map_err(io_error)?;
        let mut readings = vec![];
        for (k, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_error)?;
            match parse_line(&line) {
                Ok(Some(reading)) => readings.push(reading),
                Ok(None) => log::debug!("{}: skipping line {}", self, k + 1),
                Err(source) => {
                    return Err(LoadError::Record {
                        path: self.path.clone(),
                        line: k + 1,
                        source,
                    })
                }
            }
        }
        log::debug!("{}: {} readings", self, readings.len());
        Ok(readings)
    }
}
impl fmt::Display for LogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Data files loader
pub struct CatalogLoader {
    path: PathBuf,
    pattern: String,
}
impl Default for CatalogLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            pattern: format!(r"^(\d{{4}}-\d{{2}}-\d{{2}}) {}$", regex::escape(DATA_FILE_SUFFIX)),
        }
    }
}
impl CatalogLoader {
    /// Sets the directory holding the data files
    pub fn data_path<P: AsRef<Path>>(self, data_path: P) -> Self {
        Self {
            path: data_path.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Scans the data directory
    pub fn load(self) -> Result<Catalog, CatalogError> {
        let now = Instant::now();
        let io_error = |source| CatalogError::Io {
            path: self.path.clone(),
            source,
        };
        let mut names = vec![];
        for entry in fs::read_dir(&self.path).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            if entry.file_type().map_err(io_error)?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        let catalog = self.select(names)?;
        log::info!(
            "{} data files found in {:?} in {}ms",
            catalog.len(),
            catalog.path,
            now.elapsed().as_millis()
        );
        Ok(catalog)
    }
    fn select<I>(self, names: I) -> Result<Catalog, CatalogError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let re = Regex::new(&self.pattern)?;
        let mut files: Vec<(String, LogFile)> = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let Some(capts) = re.captures(name) else {
                    log::debug!("ignoring {:?}", name);
                    return None;
                };
                let token = capts.get(1)?.as_str();
                match NaiveDate::parse_from_str(token, "%Y-%m-%d") {
                    Ok(date) => Some((
                        token.to_string(),
                        LogFile {
                            path: self.path.join(name),
                            date,
                        },
                    )),
                    Err(e) => {
                        log::warn!("ignoring {:?}: invalid date ({})", name, e);
                        None
                    }
                }
            })
            .collect();
        if files.is_empty() {
            return Err(CatalogError::Empty { path: self.path });
        }
        files.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(Catalog {
            path: self.path,
            files: files.into_iter().map(|(_, file)| file).collect(),
        })
    }
}

/// Data files sorted by date, never empty
#[derive(Debug, Clone)]
pub struct Catalog {
    pub path: PathBuf,
    files: Vec<LogFile>,
}
impl Deref for Catalog {
    type Target = [LogFile];

    fn deref(&self) -> &Self::Target {
        &self.files
    }
}
impl Catalog {
    /// Finds the data files in `directory`
    pub fn discover<P: AsRef<Path>>(directory: P) -> Result<Self, CatalogError> {
        CatalogLoader::default().data_path(directory).load()
    }
    /// Builds the catalog from a list of file names found in `directory`
    pub fn from_names<P, I>(directory: P, names: I) -> Result<Self, CatalogError>
    where
        P: AsRef<Path>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        CatalogLoader::default().data_path(directory).select(names)
    }
    /// The oldest data file
    pub fn earliest(&self) -> &LogFile {
        &self.files[0]
    }
    /// The most recent data file
    pub fn latest(&self) -> &LogFile {
        &self.files[self.files.len() - 1]
    }
    pub fn first_date(&self) -> NaiveDate {
        self.earliest().date
    }
    pub fn last_date(&self) -> NaiveDate {
        self.latest().date
    }
    /// One line summary of the catalog
    pub fn summary(&self) -> String {
        format!(
            "Found {} data files, from {} - {}",
            self.len(),
            self.first_date(),
            self.last_date()
        )
    }
}
