use std::path::PathBuf;

use clap::Parser;

use crate::{
    core::{engine::Engine, station::StationSpec},
    prelude::*,
    quantity::power::Kilowatts,
    stations::{PowerDefaults, StationTable, TimeUnit},
};

#[derive(Parser)]
pub struct StationArgs {
    /// Station table, `.csv` or `.toml`. The built-in five-station line is used when omitted.
    #[clap(long = "stations", env = "STATIONS_PATH")]
    pub path: Option<PathBuf>,

    /// Unit of the `processTime` column.
    #[clap(long, env = "PROCESS_TIME_UNIT", value_enum, default_value = "hours")]
    pub process_time_unit: TimeUnit,

    /// Working power of the stations which do not specify their own, in kilowatts.
    #[clap(long = "working-power", env = "WORKING_POWER", default_value = "2.89")]
    pub working_power: Kilowatts,

    /// Idle power of the stations which do not specify their own, in kilowatts.
    #[clap(long = "idle-power", env = "IDLE_POWER", default_value = "0.4335")]
    pub idle_power: Kilowatts,

    /// Allowed deviation of the capacity probabilities' sum from one.
    #[clap(
        long,
        env = "PROBABILITY_TOLERANCE",
        default_value_t = Engine::DEFAULT_PROBABILITY_TOLERANCE
    )]
    pub probability_tolerance: f64,
}

impl StationArgs {
    /// Read the table in hours.
    pub fn table(&self) -> Result<StationTable> {
        let table = match &self.path {
            Some(path) => StationTable::read_from(path)?,
            None => {
                info!("no station table given, using the defaults");
                StationTable::defaults()
            }
        };
        Ok(table.with_process_time_unit(self.process_time_unit))
    }

    pub fn specs(&self) -> Result<Vec<StationSpec>> {
        let defaults = PowerDefaults::builder()
            .working_power(self.working_power)
            .idle_power(self.idle_power)
            .build();
        self.table()?.to_specs(defaults).context("failed to convert the station table")
    }
}
