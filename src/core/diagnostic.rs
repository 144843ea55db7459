use enumset::EnumSetType;
use serde::{Deserialize, Serialize};

use crate::{core::station::Violation, quantity::time::Hours};

/// Non-fatal problem found while evaluating the chain.
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The station's capacity distribution is malformed, the result is best-effort.
    #[display("station `{station}`: {violation}")]
    InvariantViolation {
        station: String,
        #[serde(flatten)]
        violation: Violation,
    },

    /// No capacity level can carry the required input.
    #[display("station `{station}`: {required} units required, but the capacity is at most {max_capacity}")]
    CapacityOverrun { station: String, required: u64, max_capacity: f64 },

    /// Processing takes longer than the station is allotted.
    #[display("station `{station}`: processing takes {process_time}, but the limit is {time_limit}")]
    TimeOverrun { station: String, process_time: Hours, time_limit: Hours },

    /// The reliability is a lower bound.
    #[display("enumeration stopped after {cap} of {n_states} joint states, the reliability is a lower bound")]
    EnumerationTruncated { cap: usize, n_states: usize },

    /// The freshly computed total input disagrees with the authoritative one, which wins.
    #[display("computed total input {computed:.6} differs from the authoritative {authoritative:.6}")]
    ValidationMismatch { computed: f64, authoritative: f64 },
}

#[derive(Debug, Hash, Serialize, Deserialize, EnumSetType)]
#[serde(rename_all = "snake_case")]
#[enumset(serialize_repr = "list")]
pub enum DiagnosticKind {
    InvariantViolation,
    CapacityOverrun,
    TimeOverrun,
    EnumerationTruncated,
    ValidationMismatch,
}

impl Diagnostic {
    pub const fn kind(&self) -> DiagnosticKind {
        match self {
            Self::InvariantViolation { .. } => DiagnosticKind::InvariantViolation,
            Self::CapacityOverrun { .. } => DiagnosticKind::CapacityOverrun,
            Self::TimeOverrun { .. } => DiagnosticKind::TimeOverrun,
            Self::EnumerationTruncated { .. } => DiagnosticKind::EnumerationTruncated,
            Self::ValidationMismatch { .. } => DiagnosticKind::ValidationMismatch,
        }
    }
}
