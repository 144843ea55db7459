use std::{fmt::Debug, fs, path::Path};

use bon::Builder;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::InvalidArgument, scenario::Scenario},
    prelude::*,
    quantity::{
        emission::{CarbonIntensity, Kilograms},
        energy::KilowattHours,
    },
};

/// Previously validated figures of a run, trusted over the freshly computed ones.
///
/// They are only consulted when the scenario is the one they were recorded under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
pub struct Authority {
    #[serde(rename = "d")]
    #[builder(into)]
    pub demand: OrderedFloat<f64>,

    #[builder(into)]
    pub carbon_factor: CarbonIntensity,

    #[serde(rename = "I", default)]
    #[builder(into)]
    pub total_input: Option<OrderedFloat<f64>>,

    #[serde(default)]
    #[builder(into)]
    pub reliability: Option<OrderedFloat<f64>>,

    #[serde(default)]
    #[builder(into)]
    pub total_energy: Option<KilowattHours>,

    #[serde(default)]
    #[builder(into)]
    pub carbon_emission: Option<Kilograms>,
}

impl Authority {
    /// Tolerance when matching the scenario.
    pub const SCENARIO_TOLERANCE: f64 = 1e-9;

    /// Tolerance when comparing the total input.
    pub const TOTAL_INPUT_TOLERANCE: f64 = 1e-6;

    #[instrument(skip_all, fields(path = ?path))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    /// Refuse the authoritative figures which could never come out of an evaluation.
    pub fn check_arguments(&self) -> Result<(), InvalidArgument> {
        let authority =
            |field, requirement, value| InvalidArgument::Authority { field, requirement, value };
        if let Some(total_input) = self.total_input
            && !(total_input.0.is_finite() && total_input.0 > 0.0)
        {
            return Err(authority("total input", "positive", total_input.0));
        }
        if let Some(reliability) = self.reliability
            && !(0.0..=1.0).contains(&reliability.0)
        {
            return Err(authority("reliability", "within [0, 1]", reliability.0));
        }
        if let Some(total_energy) = self.total_energy
            && !(total_energy.is_finite() && total_energy >= KilowattHours::ZERO)
        {
            return Err(authority("total energy", "non-negative", total_energy.get()));
        }
        if let Some(carbon_emission) = self.carbon_emission
            && !(carbon_emission.is_finite() && carbon_emission >= Kilograms::ZERO)
        {
            return Err(authority("carbon emission", "non-negative", carbon_emission.get()));
        }
        Ok(())
    }

    pub fn matches(&self, scenario: &Scenario) -> bool {
        (self.demand.0 - scenario.demand.0).abs() <= Self::SCENARIO_TOLERANCE
            && (self.carbon_factor.get() - scenario.carbon_factor.get()).abs()
                <= Self::SCENARIO_TOLERANCE
    }

    /// Authoritative total input which disagrees with the computed one.
    pub fn total_input_mismatch(&self, computed: f64) -> Option<f64> {
        self.total_input
            .map(|total_input| total_input.0)
            .filter(|total_input| (total_input - computed).abs() > Self::TOTAL_INPUT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn scenario(demand: f64, carbon_factor: f64) -> Scenario {
        Scenario::builder().demand(demand).carbon_factor(carbon_factor).build()
    }

    #[test]
    fn test_matches() {
        let authority = Authority::builder().demand(2500.0).carbon_factor(0.474).build();
        assert!(authority.matches(&scenario(2500.0, 0.474)));
        assert!(authority.matches(&scenario(2500.0 + 1e-10, 0.474)));
        assert!(!authority.matches(&scenario(2501.0, 0.474)));
        assert!(!authority.matches(&scenario(2500.0, 0.475)));
    }

    #[test]
    fn test_total_input_mismatch() {
        let authority =
            Authority::builder().demand(2500.0).carbon_factor(0.474).total_input(3066.0).build();
        assert_eq!(authority.total_input_mismatch(3066.0 + 1e-7), None);
        assert_eq!(authority.total_input_mismatch(3066.27), Some(3066.0));
    }

    #[test]
    fn test_check_arguments() {
        let authority = || Authority::builder().demand(2500.0).carbon_factor(0.474);
        let valid = authority().total_input(3066.08).reliability(1.0).build();
        assert!(valid.check_arguments().is_ok());
        assert!(matches!(
            authority().total_input(-5.0).build().check_arguments(),
            Err(InvalidArgument::Authority { field: "total input", .. })
        ));
        assert!(matches!(
            authority().total_input(f64::NAN).build().check_arguments(),
            Err(InvalidArgument::Authority { field: "total input", .. })
        ));
        assert!(matches!(
            authority().reliability(1.7).build().check_arguments(),
            Err(InvalidArgument::Authority { field: "reliability", .. })
        ));
        assert!(matches!(
            authority().total_energy(-1.0).build().check_arguments(),
            Err(InvalidArgument::Authority { field: "total energy", .. })
        ));
    }

    #[test]
    fn test_read_from() -> Result {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "d = 2500\nI = 3066.27\ncarbon_factor = 0.474\nreliability = 0.9")?;
        let authority = Authority::read_from(file.path())?;
        assert_eq!(authority.demand, OrderedFloat(2500.0));
        assert_eq!(authority.total_input, Some(OrderedFloat(3066.27)));
        assert_eq!(authority.reliability, Some(OrderedFloat(0.9)));
        assert_eq!(authority.total_energy, None);
        assert_eq!(authority.carbon_emission, None);
        Ok(())
    }
}
