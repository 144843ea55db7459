use clap::Parser;

use crate::{cli::stations::StationArgs, prelude::*, tables::build_issues_table};

#[derive(Parser)]
pub struct ValidateArgs {
    #[clap(flatten)]
    pub stations: StationArgs,
}

#[instrument(skip_all)]
pub fn validate(args: &ValidateArgs) -> Result {
    let issues = args.stations.table()?.issues(args.stations.probability_tolerance);
    if !issues.is_empty() {
        println!("{}", build_issues_table(&issues));
        bail!("found {} issue(s) in the station table", issues.len());
    }
    info!("the station table is valid");
    Ok(())
}
