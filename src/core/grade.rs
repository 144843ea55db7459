use serde::Serialize;

use crate::quantity::{emission::Kilograms, energy::KilowattHours};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityGrade {
    #[display("excellent")]
    Excellent,

    #[display("fair")]
    Fair,

    #[display("critical")]
    Critical,
}

impl ReliabilityGrade {
    pub fn of(reliability: f64) -> Self {
        if reliability >= 0.9 {
            Self::Excellent
        } else if reliability >= 0.8 {
            Self::Fair
        } else {
            Self::Critical
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum EmissionGrade {
    #[display("normal")]
    Normal,

    #[display("elevated")]
    Elevated,

    #[display("excessive")]
    Excessive,
}

impl EmissionGrade {
    pub fn of(emission: Kilograms) -> Self {
        if emission < Kilograms::from(250.0) {
            Self::Normal
        } else if emission <= Kilograms::from(300.0) {
            Self::Elevated
        } else {
            Self::Excessive
        }
    }
}

/// Energy consumption of a single station.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    #[display("low")]
    Low,

    #[display("moderate")]
    Moderate,

    #[display("high")]
    High,
}

impl EnergyLevel {
    pub fn of(energy: KilowattHours) -> Self {
        if energy > KilowattHours::from(4.0) {
            Self::High
        } else if energy > KilowattHours::from(2.0) {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}
