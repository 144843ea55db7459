use bon::Builder;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    core::station::StationSpec,
    quantity::power::Kilowatts,
    stations::{Error, ListCell},
};

/// Station table row, with the column names of the spreadsheet export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct StationRow {
    #[builder(into)]
    pub name: String,

    /// Hours per unit, unless the table is in minutes.
    #[serde(rename = "processTime")]
    pub process_time: f64,

    /// Hours.
    #[serde(rename = "timeLimit")]
    pub time_limit: f64,

    #[builder(into)]
    pub capacities: ListCell,

    #[serde(rename = "probs")]
    #[builder(into)]
    pub probabilities: ListCell,

    /// Success rate of this particular station.
    #[serde(rename = "p", default)]
    pub success_rate: Option<f64>,

    /// Kilowatts.
    #[serde(default)]
    pub working_power: Option<f64>,

    /// Kilowatts.
    #[serde(default)]
    pub idle_power: Option<f64>,
}

/// Powers of the stations whose rows leave them out.
#[derive(Copy, Clone, Debug, PartialEq, Builder)]
pub struct PowerDefaults {
    #[builder(into)]
    pub working_power: Kilowatts,

    #[builder(into)]
    pub idle_power: Kilowatts,
}

impl StationRow {
    /// Convert into the engine's station.
    ///
    /// `index` is 1-based and only used to report errors.
    pub fn to_spec(&self, index: usize, defaults: PowerDefaults) -> Result<StationSpec, Error> {
        let capacities = self.capacities.parse().map_err(|source| Error::MalformedList {
            row: index,
            column: "capacities",
            source,
        })?;
        let probabilities = self.probabilities.parse().map_err(|source| Error::MalformedList {
            row: index,
            column: "probs",
            source,
        })?;
        Ok(StationSpec::builder()
            .name(self.name.clone())
            .process_time(self.process_time)
            .time_limit(self.time_limit)
            .capacities(capacities)
            .probabilities(probabilities)
            .maybe_success_rate(self.success_rate.map(OrderedFloat))
            .working_power(self.working_power.map_or(defaults.working_power, Kilowatts::from))
            .idle_power(self.idle_power.map_or(defaults.idle_power, Kilowatts::from))
            .build())
    }
}
