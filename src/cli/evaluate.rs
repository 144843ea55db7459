use clap::Parser;

use crate::{
    cli::{
        scenario::{EngineArgs, ScenarioArgs},
        stations::StationArgs,
    },
    prelude::*,
    tables::{build_stations_table, build_summary_table},
};

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Units that must leave the last station.
    #[clap(long, env = "DEMAND", default_value = "2500")]
    pub demand: f64,

    /// Print the evaluation as JSON instead of the tables.
    #[clap(long)]
    pub json: bool,

    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    #[clap(flatten)]
    pub stations: StationArgs,

    #[clap(flatten)]
    pub engine: EngineArgs,
}

#[instrument(skip_all)]
pub fn evaluate(args: &EvaluateArgs) -> Result {
    let stations = args.stations.specs()?;
    let authority = args.scenario.authority()?;
    let evaluation = args
        .engine
        .engine(args.stations.probability_tolerance)
        .evaluate()
        .scenario(args.scenario.scenario(args.demand))
        .stations(&stations)
        .maybe_authority(authority.as_ref())
        .call()?;

    for diagnostic in &evaluation.diagnostics {
        warn!(kind = ?diagnostic.kind(), "{diagnostic}");
    }
    if !evaluation.is_reliable() {
        warn!("the station data violates the distribution invariants, the figures are best-effort");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!("{}", build_stations_table(&stations, &evaluation.metrics));
        println!("{}", build_summary_table(&evaluation));
    }
    Ok(())
}
