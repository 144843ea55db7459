#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod fmt;
mod prelude;
mod quantity;
mod stations;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, evaluate, save, sweep, validate},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Evaluate(args) => evaluate(&args)?,
        Command::Sweep(args) => sweep(&args)?,
        Command::Validate(args) => validate(&args)?,
        Command::Save(args) => save(&args)?,
    }

    info!("done!");
    Ok(())
}
