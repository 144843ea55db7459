use itertools::Itertools;
use serde::Serialize;

use crate::core::station::StationSpec;

/// How the reliability gets estimated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Walk the joint capacity states one by one, up to the enumeration cap.
    #[default]
    Enumeration,

    /// Multiply the per-station probabilities of meeting the load.
    ///
    /// Exact since the stations are independent, and linear in the number of levels.
    Exact,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Exact,

    /// The enumeration cap was hit, and the rest of the states were skipped.
    LowerBound,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Estimate {
    pub reliability: f64,
    pub bound: Bound,

    /// Joint states for [`Method::Enumeration`], capacity levels for [`Method::Exact`].
    pub evaluated_states: usize,
}

impl Method {
    pub fn estimate(self, stations: &[StationSpec], required: &[u64], cap: usize) -> Estimate {
        match self {
            Self::Enumeration => enumerate(stations, required, cap),
            Self::Exact => exact(stations, required),
        }
    }
}

/// Size of the joint capacity state space, saturating.
pub fn n_joint_states(stations: &[StationSpec]) -> usize {
    stations.iter().map(StationSpec::n_levels).fold(1, usize::saturating_mul)
}

/// Sum the probabilities of the joint states where every station meets its load.
///
/// States go in the lexicographic order, the last station varying fastest.
/// No more than `cap` states are evaluated.
pub fn enumerate(stations: &[StationSpec], required: &[u64], cap: usize) -> Estimate {
    let mut states =
        stations.iter().map(|station| 0..station.n_levels()).multi_cartesian_product();
    let mut reliability = 0.0;
    let mut evaluated_states = 0;
    for state in states.by_ref().take(cap) {
        evaluated_states += 1;
        if let Some(probability) = joint_probability(stations, required, &state) {
            reliability += probability;
        }
    }
    let bound = if states.next().is_some() { Bound::LowerBound } else { Bound::Exact };
    Estimate { reliability, bound, evaluated_states }
}

/// Product of the per-station probabilities to meet the load.
pub fn exact(stations: &[StationSpec], required: &[u64]) -> Estimate {
    let reliability = stations
        .iter()
        .zip(required)
        .map(|(station, required)| {
            station
                .levels()
                .filter(|(capacity, _)| meets(*capacity, *required))
                .map(|(_, probability)| probability)
                .sum::<f64>()
        })
        .product();
    let evaluated_states = stations.iter().map(StationSpec::n_levels).sum();
    Estimate { reliability, bound: Bound::Exact, evaluated_states }
}

/// Probability of the joint state, or [`None`] when some station falls short of its load.
fn joint_probability(stations: &[StationSpec], required: &[u64], state: &[usize]) -> Option<f64> {
    state.iter().zip(stations).zip(required).try_fold(
        1.0,
        |probability, ((level, station), required)| {
            meets(station.capacities[*level].0, *required)
                .then(|| probability * station.probabilities[*level].0)
        },
    )
}

/// Whether the capacity level carries the required input.
#[expect(clippy::cast_precision_loss)]
pub fn meets(capacity: f64, required: u64) -> bool {
    capacity >= required as f64
}
