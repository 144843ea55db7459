use bon::Builder;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::InvalidArgument, station::is_valid_success_rate},
    quantity::emission::CarbonIntensity,
};

/// Operating point the chain is evaluated at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
pub struct Scenario {
    /// Number of units that must leave the last station.
    #[builder(into)]
    pub demand: OrderedFloat<f64>,

    #[builder(into)]
    pub carbon_factor: CarbonIntensity,

    /// Success rate of the stations which do not specify their own.
    #[builder(into, default = Scenario::DEFAULT_SUCCESS_RATE)]
    pub success_rate: OrderedFloat<f64>,
}

impl Scenario {
    pub const DEFAULT_SUCCESS_RATE: OrderedFloat<f64> = OrderedFloat(0.96);

    pub fn check_arguments(&self) -> Result<(), InvalidArgument> {
        let scenario =
            |field, requirement, value| InvalidArgument::Scenario { field, requirement, value };
        if !(self.demand.0.is_finite() && self.demand.0 > 0.0) {
            return Err(scenario("demand", "positive", self.demand.0));
        }
        if !(self.carbon_factor.is_finite() && self.carbon_factor > CarbonIntensity::ZERO) {
            return Err(scenario("carbon factor", "positive", self.carbon_factor.get()));
        }
        if !is_valid_success_rate(self.success_rate.0) {
            return Err(scenario("success rate", "within (0, 1]", self.success_rate.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_success_rate() {
        let scenario = Scenario::builder().demand(2500.0).carbon_factor(0.474).build();
        assert_eq!(scenario.success_rate, OrderedFloat(0.96));
        assert!(scenario.check_arguments().is_ok());
    }

    #[test]
    fn test_non_positive_demand() {
        let scenario = Scenario::builder().demand(0.0).carbon_factor(0.474).build();
        assert!(matches!(
            scenario.check_arguments(),
            Err(InvalidArgument::Scenario { field: "demand", .. })
        ));
    }

    #[test]
    fn test_zero_success_rate() {
        let scenario =
            Scenario::builder().demand(2500.0).carbon_factor(0.474).success_rate(0.0).build();
        assert!(matches!(
            scenario.check_arguments(),
            Err(InvalidArgument::Scenario { field: "success rate", .. })
        ));
    }
}
