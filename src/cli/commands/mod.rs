//! Command implementations for the sightings service CLI
//!
//! Each command is implemented in its own module:
//! - `serve`: the HTTP API with graceful shutdown and dataset reload
//! - `recent`: one-off aggregation printed as JSON
//! - `stations`: station dataset report and name lookup

pub mod recent;
pub mod serve;
pub mod shared;
pub mod stations;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler selected on the command line
pub async fn run(args: Args) -> Result<()> {
    match args.get_command()? {
        Commands::Serve(serve_args) => serve::run_serve(serve_args).await,
        Commands::Recent(recent_args) => recent::run_recent(recent_args).await,
        Commands::Stations(stations_args) => stations::run_stations(stations_args).await,
    }
}
