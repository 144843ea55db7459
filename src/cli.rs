mod evaluate;
mod save;
mod scenario;
mod stations;
pub mod sweep;
mod validate;

use clap::{Parser, Subcommand};

pub use self::{
    evaluate::{EvaluateArgs, evaluate},
    save::{SaveArgs, save},
    sweep::{SweepArgs, sweep},
    validate::{ValidateArgs, validate},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate the line at a single demand.
    #[clap(name = "evaluate")]
    Evaluate(Box<EvaluateArgs>),

    /// Evaluate the line over a range of demands.
    #[clap(name = "sweep")]
    Sweep(Box<SweepArgs>),

    /// Check the station table.
    #[clap(name = "validate")]
    Validate(Box<ValidateArgs>),

    /// Check the station table and save it normalized, backing up the previous file.
    #[clap(name = "save")]
    Save(Box<SaveArgs>),
}
