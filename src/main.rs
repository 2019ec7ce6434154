use clap::Parser;
use inspector_sightings::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    // Commands install their own shutdown handling
    match runtime.block_on(commands::run(args)) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Inspector Sightings - Ticket Inspector Map Backend");
    println!("==================================================");
    println!();
    println!("Aggregate crowd-sourced ticket inspector reports into the recent-sightings");
    println!("feed shown on transit rider maps.");
    println!();
    println!("USAGE:");
    println!("    inspector-sightings <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    serve       Serve the HTTP API (main command)");
    println!("    recent      Print the current recent-sightings feed as JSON");
    println!("    stations    Load the station dataset and print a report");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Serve with database settings from DB_USER, DB_PASSWORD, DB_HOST, DB_PORT, DB_NAME:");
    println!("    inspector-sightings serve --bind 0.0.0.0:8080");
    println!();
    println!("    # Check the feed a deployment would serve right now:");
    println!("    inspector-sightings recent --stations data/stations.json");
    println!();
    println!("    # Look up a station by name:");
    println!("    inspector-sightings stations --lookup alexanderplatz");
    println!();
    println!("For detailed help on any command, use:");
    println!("    inspector-sightings <COMMAND> --help");
}
