use bon::Builder;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    core::error::InvalidArgument,
    quantity::{power::Kilowatts, time::Hours},
};

/// Single stage of the production chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
pub struct StationSpec {
    #[builder(into)]
    pub name: String,

    /// Time to process one unit.
    #[builder(into)]
    pub process_time: Hours,

    /// Maximum time allotted to the station.
    #[builder(into)]
    pub time_limit: Hours,

    /// Discrete achievable capacity levels, the lowest one being the total failure.
    #[builder(with = |levels: impl IntoIterator<Item = f64>| {
        levels.into_iter().map(OrderedFloat).collect::<Vec<_>>()
    })]
    pub capacities: Vec<OrderedFloat<f64>>,

    /// Probability of each capacity level.
    #[builder(with = |levels: impl IntoIterator<Item = f64>| {
        levels.into_iter().map(OrderedFloat).collect::<Vec<_>>()
    })]
    pub probabilities: Vec<OrderedFloat<f64>>,

    /// Probability that a unit survives the station, overrides the scenario-wide rate.
    #[builder(into)]
    pub success_rate: Option<OrderedFloat<f64>>,

    #[builder(into)]
    pub working_power: Kilowatts,

    #[builder(into)]
    pub idle_power: Kilowatts,
}

impl StationSpec {
    /// Capacity levels paired with their probabilities.
    ///
    /// Mismatched sequences are paired up to the shorter one.
    pub fn levels(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.capacities
            .iter()
            .zip(&self.probabilities)
            .map(|(capacity, probability)| (capacity.0, probability.0))
    }

    pub fn n_levels(&self) -> usize {
        self.capacities.len().min(self.probabilities.len())
    }

    pub fn max_capacity(&self) -> Option<f64> {
        self.levels().map(|(capacity, _)| capacity).reduce(f64::max)
    }

    /// Refuse the numeric parameters that make the computation meaningless.
    pub fn check_arguments(&self) -> Result<(), InvalidArgument> {
        let station = |field, requirement, value: f64| InvalidArgument::Station {
            name: self.name.clone(),
            field,
            requirement,
            value,
        };
        if !(self.process_time.is_finite() && self.process_time > Hours::ZERO) {
            return Err(station("process time", "positive", self.process_time.get()));
        }
        if !(self.time_limit.is_finite() && self.time_limit >= Hours::ZERO) {
            return Err(station("time limit", "non-negative", self.time_limit.get()));
        }
        if !(self.working_power.is_finite() && self.working_power >= Kilowatts::ZERO) {
            return Err(station("working power", "non-negative", self.working_power.get()));
        }
        if !(self.idle_power.is_finite() && self.idle_power >= Kilowatts::ZERO) {
            return Err(station("idle power", "non-negative", self.idle_power.get()));
        }
        if let Some(success_rate) = self.success_rate
            && !is_valid_success_rate(success_rate.0)
        {
            return Err(station("success rate", "within (0, 1]", success_rate.0));
        }
        Ok(())
    }

    /// Collect the distribution problems, which do not prevent the computation.
    pub fn violations(&self, tolerance: f64) -> Vec<Violation> {
        let capacities = self.capacities.iter().map(|capacity| capacity.0).collect_vec();
        let probabilities =
            self.probabilities.iter().map(|probability| probability.0).collect_vec();
        let mut violations = length_violations(capacities.len(), probabilities.len());
        violations.extend(capacity_violations(&capacities));
        violations.extend(probability_violations(&probabilities, tolerance));
        violations
    }
}

pub fn length_violations(n_capacities: usize, n_probabilities: usize) -> Vec<Violation> {
    if n_capacities == n_probabilities {
        vec![]
    } else {
        vec![Violation::LengthMismatch { n_capacities, n_probabilities }]
    }
}

pub fn capacity_violations(capacities: &[f64]) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !is_strictly_increasing(capacities) {
        violations.push(Violation::NotIncreasing);
    }
    if capacities.iter().any(|capacity| !capacity.is_finite() || *capacity < 0.0) {
        violations.push(Violation::NegativeCapacity);
    }
    if !capacities.contains(&0.0) {
        violations.push(Violation::MissingFailureLevel);
    }
    violations
}

pub fn probability_violations(probabilities: &[f64], tolerance: f64) -> Vec<Violation> {
    let mut violations = Vec::new();
    if probabilities.iter().any(|probability| !(0.0..=1.0).contains(probability)) {
        violations.push(Violation::ProbabilityOutOfRange);
    }
    let sum = probabilities.iter().sum::<f64>();
    if !is_unit_sum(sum, tolerance) {
        violations.push(Violation::ProbabilitySum { sum });
    }
    violations
}

/// Distribution problem of a single station.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    #[display("{n_capacities} capacities but {n_probabilities} probabilities")]
    LengthMismatch { n_capacities: usize, n_probabilities: usize },

    #[display("capacities are not strictly increasing")]
    NotIncreasing,

    #[display("capacities must be non-negative")]
    NegativeCapacity,

    #[display("no zero capacity level for the total failure")]
    MissingFailureLevel,

    #[display("probabilities must be within [0, 1]")]
    ProbabilityOutOfRange,

    #[display("probabilities sum up to {sum:.6} instead of 1")]
    ProbabilitySum { sum: f64 },
}

fn is_strictly_increasing(values: &[f64]) -> bool {
    values.iter().tuple_windows().all(|(lhs, rhs)| lhs < rhs)
}

fn is_unit_sum(sum: f64, tolerance: f64) -> bool {
    (sum - 1.0).abs() <= tolerance
}

pub fn is_valid_success_rate(success_rate: f64) -> bool {
    success_rate > 0.0 && success_rate <= 1.0
}
