use clap::Parser;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    cli::{
        scenario::{EngineArgs, ScenarioArgs},
        stations::StationArgs,
    },
    core::reliability::Bound,
    prelude::*,
    quantity::{emission::Kilograms, energy::KilowattHours},
    tables::build_sweep_table,
};

#[derive(Parser)]
pub struct SweepArgs {
    /// Lowest demand.
    #[clap(long, env = "SWEEP_FROM", default_value = "1000")]
    pub from: f64,

    /// Highest demand.
    #[clap(long, env = "SWEEP_TO", default_value = "5500")]
    pub to: f64,

    /// Number of evenly spaced demands.
    #[clap(long, env = "SWEEP_STEPS", default_value = "10")]
    pub steps: usize,

    /// Extra demand to highlight.
    #[clap(long, env = "CRITICAL_DEMAND", default_value = "2592")]
    pub critical_demand: u64,

    /// Print the points as JSON instead of the table.
    #[clap(long)]
    pub json: bool,

    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    #[clap(flatten)]
    pub stations: StationArgs,

    #[clap(flatten)]
    pub engine: EngineArgs,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    pub demand: u64,
    pub total_input: f64,
    pub reliability: f64,
    pub reliability_bound: Bound,
    pub total_energy: KilowattHours,
    pub carbon_emission: Kilograms,
    pub is_critical: bool,
}

/// Evenly spaced demands between the bounds, truncated to whole units.
#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn demand_grid(from: f64, to: f64, steps: usize) -> Vec<u64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from as u64],
        _ => (0..steps)
            .map(|index| (from + (to - from) * index as f64 / (steps - 1) as f64) as u64)
            .sorted()
            .collect(),
    }
}

#[instrument(skip_all)]
pub fn sweep(args: &SweepArgs) -> Result {
    let stations = args.stations.specs()?;
    let authority = args.scenario.authority()?;
    let engine = args.engine.engine(args.stations.probability_tolerance);

    let grid = demand_grid(args.from, args.to, args.steps);
    ensure!(!grid.is_empty(), "the sweep needs at least one step");
    let demands = grid
        .into_iter()
        .map(|demand| (demand, false))
        .chain([(args.critical_demand, true)])
        .sorted_by_key(|(demand, _)| *demand);

    let mut points = Vec::new();
    for (demand, is_critical) in demands {
        #[expect(clippy::cast_precision_loss)]
        let scenario = args.scenario.scenario(demand as f64);
        let evaluation = engine
            .evaluate()
            .scenario(scenario)
            .stations(&stations)
            .maybe_authority(authority.as_ref())
            .call()
            .with_context(|| format!("failed to evaluate the demand of {demand}"))?;
        for diagnostic in &evaluation.diagnostics {
            debug!(demand, kind = ?diagnostic.kind(), "{diagnostic}");
        }
        let metrics = evaluation.metrics;
        points.push(SweepPoint {
            demand,
            total_input: metrics.total_input,
            reliability: metrics.reliability,
            reliability_bound: metrics.reliability_bound,
            total_energy: metrics.total_energy,
            carbon_emission: metrics.carbon_emission,
            is_critical,
        });
    }
    info!(n_points = points.len(), "swept");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        println!("{}", build_sweep_table(&points));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_grid() {
        assert_eq!(
            demand_grid(1000.0, 5500.0, 10),
            vec![1000, 1500, 2000, 2500, 3000, 3500, 4000, 4500, 5000, 5500]
        );
        assert_eq!(demand_grid(1000.0, 2000.0, 4), vec![1000, 1333, 1666, 2000]);
        assert_eq!(demand_grid(1000.0, 5500.0, 1), vec![1000]);
        assert_eq!(demand_grid(1000.0, 5500.0, 0), Vec::<u64>::new());
    }

    #[test]
    fn test_descending_bounds_are_sorted() {
        assert_eq!(demand_grid(3000.0, 1000.0, 3), vec![1000, 2000, 3000]);
    }
}
