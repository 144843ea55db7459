use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::stations::StationArgs,
    prelude::*,
    stations::back_up,
    tables::build_issues_table,
};

#[derive(Parser)]
pub struct SaveArgs {
    /// Where to save the table, `.csv` or `.toml`. Defaults to the input table.
    #[clap(long, env = "STATIONS_OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub stations: StationArgs,
}

#[instrument(skip_all)]
pub fn save(args: &SaveArgs) -> Result {
    let output = args
        .output
        .as_ref()
        .or(args.stations.path.as_ref())
        .context("neither the output nor the input table is specified")?;

    let table = args.stations.table()?;
    let issues = table.issues(args.stations.probability_tolerance);
    if !issues.is_empty() {
        println!("{}", build_issues_table(&issues));
        bail!("refusing to save the station table with {} issue(s)", issues.len());
    }

    back_up(output)?;
    table.write_to(output)
}
