use std::path::PathBuf;

use clap::Parser;

use crate::{
    core::{
        authority::Authority,
        cache::Memo,
        engine::Engine,
        reliability::Method,
        scenario::Scenario,
    },
    prelude::*,
    quantity::emission::CarbonIntensity,
};

#[derive(Parser)]
pub struct ScenarioArgs {
    /// CO₂ emitted per kilowatt-hour.
    #[clap(long, env = "CARBON_FACTOR", default_value = "0.474")]
    pub carbon_factor: CarbonIntensity,

    /// Probability that a unit survives a station.
    #[clap(long, env = "SUCCESS_RATE", default_value = "0.96")]
    pub success_rate: f64,

    /// Previously validated figures, applied when recorded under the same demand and carbon factor.
    #[clap(long = "authority", env = "AUTHORITY_PATH")]
    pub authority_path: Option<PathBuf>,
}

impl ScenarioArgs {
    pub fn scenario(&self, demand: f64) -> Scenario {
        Scenario::builder()
            .demand(demand)
            .carbon_factor(self.carbon_factor)
            .success_rate(self.success_rate)
            .build()
    }

    pub fn authority(&self) -> Result<Option<Authority>> {
        self.authority_path.as_ref().map(Authority::read_from).transpose()
    }
}

#[derive(Parser)]
pub struct EngineArgs {
    /// Maximum number of joint capacity states to enumerate.
    #[clap(long, env = "ENUMERATION_CAP", default_value_t = Engine::DEFAULT_ENUMERATION_CAP)]
    pub enumeration_cap: usize,

    /// How the reliability gets estimated.
    #[clap(long, env = "METHOD", value_enum, default_value_t = Method::default())]
    pub method: Method,
}

impl EngineArgs {
    pub fn engine(&self, probability_tolerance: f64) -> Engine {
        Engine::builder()
            .enumeration_cap(self.enumeration_cap)
            .method(self.method)
            .probability_tolerance(probability_tolerance)
            .memo(Memo::default())
            .build()
    }
}
