use enumset::EnumSet;
use serde::Serialize;

use crate::{
    core::{
        diagnostic::{Diagnostic, DiagnosticKind},
        reliability::Bound,
    },
    quantity::{emission::Kilograms, energy::KilowattHours, time::Hours},
};

/// Per-station figures and system aggregates of a single evaluation.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsResult {
    /// Units that must enter the first station.
    pub total_input: f64,

    pub inputs: Vec<f64>,
    pub rounded_inputs: Vec<u64>,
    pub process_times: Vec<Hours>,
    pub idle_times: Vec<Hours>,
    pub energies: Vec<KilowattHours>,

    pub total_energy: KilowattHours,
    pub carbon_emission: Kilograms,
    pub reliability: f64,

    /// Whether the reliability is exact or may be under-estimated.
    pub reliability_bound: Bound,

    pub evaluated_states: usize,

    pub time_max_limit: Hours,
    pub total_process_time: Hours,
    pub total_idle_time: Hours,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub metrics: MetricsResult,
    pub diagnostics: Vec<Diagnostic>,

    /// Kinds of the diagnostics above.
    pub flags: EnumSet<DiagnosticKind>,
}

impl Evaluation {
    pub fn new(metrics: MetricsResult, diagnostics: Vec<Diagnostic>) -> Self {
        let flags = diagnostics.iter().map(Diagnostic::kind).collect();
        Self { metrics, diagnostics, flags }
    }

    /// Whether the station data satisfied the distribution invariants.
    pub fn is_reliable(&self) -> bool {
        !self.flags.contains(DiagnosticKind::InvariantViolation)
    }
}
