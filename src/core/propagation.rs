use itertools::Itertools;

use crate::core::{scenario::Scenario, station::StationSpec};

/// How units are lost along the chain.
#[derive(Clone, Debug, PartialEq)]
pub enum SuccessModel {
    /// Every station shares the same success rate.
    Uniform { success_rate: f64, n_stations: usize },

    /// Each station has its own success rate.
    PerStation(Vec<f64>),
}

impl SuccessModel {
    /// Pick the uniform model unless a station overrides the scenario-wide rate.
    pub fn new(scenario: &Scenario, stations: &[StationSpec]) -> Self {
        if stations.iter().all(|station| station.success_rate.is_none()) {
            Self::Uniform { success_rate: scenario.success_rate.0, n_stations: stations.len() }
        } else {
            Self::PerStation(
                stations
                    .iter()
                    .map(|station| station.success_rate.unwrap_or(scenario.success_rate).0)
                    .collect(),
            )
        }
    }

    /// Units that must enter the first station for the demand to leave the last one.
    pub fn total_input(&self, demand: f64) -> f64 {
        match self {
            Self::Uniform { success_rate, n_stations } => {
                demand / success_rate.powi(exponent(*n_stations))
            }
            Self::PerStation(success_rates) => demand / success_rates.iter().product::<f64>(),
        }
    }

    /// Required input at each station, front to back.
    pub fn propagate(&self, total_input: f64) -> Vec<f64> {
        match self {
            Self::Uniform { success_rate, n_stations } => (0..*n_stations)
                .map(|index| total_input * success_rate.powi(exponent(index)))
                .collect(),
            Self::PerStation(success_rates) => success_rates
                .iter()
                .scan(total_input, |input, success_rate| {
                    let current = *input;
                    *input *= success_rate;
                    Some(current)
                })
                .collect_vec(),
        }
    }
}

/// Whole units that must enter each station.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_up(inputs: &[f64]) -> Vec<u64> {
    inputs.iter().map(|input| input.ceil() as u64).collect()
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn exponent(n: usize) -> i32 {
    n as i32
}
