mod backup;
mod defaults;
mod list;
mod row;
mod validate;

use std::{fmt::Debug, fs, path::Path};

use serde::{Deserialize, Serialize};

pub use self::{
    backup::back_up,
    list::{ListCell, ListError},
    row::{PowerDefaults, StationRow},
    validate::{Issue, validate},
};
use crate::{core::station::StationSpec, prelude::*, quantity::time::Hours};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("row {row}: malformed `{column}`")]
    MalformedList {
        row: usize,
        column: &'static str,
        #[source]
        source: ListError,
    },

    #[error("unsupported station table `{0}`, expected a `.csv` or `.toml` file")]
    UnsupportedFormat(String),
}

/// Unit of the `processTime` column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
}

impl TimeUnit {
    pub fn to_hours(self, value: f64) -> Hours {
        match self {
            Self::Hours => Hours::from(value),
            Self::Minutes => Hours::from_minutes(value),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, Error> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(extension) if extension.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Editable station table, front station first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StationTable {
    pub stations: Vec<StationRow>,
}

impl StationTable {
    #[instrument(skip_all, fields(path = ?path))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = match Format::of(path)? {
            Format::Csv => {
                let mut reader = csv::Reader::from_path(path)
                    .with_context(|| format!("failed to open `{}`", path.display()))?;
                let stations = reader
                    .deserialize()
                    .collect::<Result<Vec<StationRow>, _>>()
                    .with_context(|| format!("failed to parse `{}`", path.display()))?;
                Self { stations }
            }
            Format::Toml => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read `{}`", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse `{}`", path.display()))?
            }
        };
        info!(n_stations = table.stations.len(), "loaded stations");
        Ok(table)
    }

    #[instrument(skip_all, fields(path = ?path))]
    pub fn write_to<P: AsRef<Path> + Debug>(&self, path: P) -> Result {
        let path = path.as_ref();
        match Format::of(path)? {
            Format::Csv => {
                let mut writer = csv::Writer::from_path(path)
                    .with_context(|| format!("failed to create `{}`", path.display()))?;
                for station in &self.stations {
                    writer.serialize(station)?;
                }
                writer.flush()?;
            }
            Format::Toml => {
                fs::write(path, toml::to_string_pretty(self)?)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
            }
        }
        info!(n_stations = self.stations.len(), "saved stations");
        Ok(())
    }

    /// Convert the `processTime` column into hours.
    pub fn with_process_time_unit(mut self, unit: TimeUnit) -> Self {
        for station in &mut self.stations {
            station.process_time = unit.to_hours(station.process_time).get();
        }
        self
    }

    pub fn issues(&self, tolerance: f64) -> Vec<Issue> {
        validate(&self.stations, tolerance)
    }

    /// Convert the rows into the engine's stations.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedList`] for the first list cell which does not parse.
    pub fn to_specs(&self, defaults: PowerDefaults) -> Result<Vec<StationSpec>, Error> {
        self.stations
            .iter()
            .enumerate()
            .map(|(index, station)| station.to_spec(index + 1, defaults))
            .collect()
    }
}
