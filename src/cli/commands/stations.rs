//! Stations command implementation
//!
//! Loads the station dataset the way the server would and reports what it
//! contains, optionally resolving a rider-style station name.

use super::shared::setup_logging;
use crate::app::services::station_directory::{LoadStats, StationDirectory};
use crate::cli::args::{OutputFormat, StationsArgs};
use crate::{Error, Result};
use colored::*;
use serde_json::{Value, json};
use tracing::debug;

/// Stations command runner
pub async fn run_stations(args: StationsArgs) -> Result<()> {
    setup_logging(&args.logging)?;
    debug!("Stations arguments: {:?}", args);

    let config = args.directory.to_config();
    let (directory, stats) = StationDirectory::load(&config).await?;

    match args.output_format {
        OutputFormat::Human => print!("{}", render_human_report(&args, &directory, &stats)?),
        OutputFormat::Json => {
            let report = build_json_report(&args, &directory, &stats)?;
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::io("Failed to render station report", e.into()))?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Human-readable station report
fn render_human_report(
    args: &StationsArgs,
    directory: &StationDirectory,
    stats: &LoadStats,
) -> Result<String> {
    let metadata = directory.metadata();
    let source = metadata
        .source_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());

    let mut output = format!(
        "{}\n\
         ========================\n\
         Dataset: {}\n\
         Stations: {} (of {} records)\n\
         Lines: {}\n\
         Load Time: {:.3}s ({:.0} stations/s)\n\n",
        "Station Directory Report".bright_green().bold(),
        source,
        metadata.station_count.to_string().bright_white().bold(),
        stats.records_found,
        metadata.line_count.to_string().bright_white().bold(),
        stats.load_duration.as_secs_f64(),
        stats.loading_rate()
    );

    if stats.has_warnings() {
        output.push_str(&format!(
            "{} line entries reference unknown stations: {}\n\n",
            stats.dangling_line_stations.len().to_string().bright_red().bold(),
            stats.dangling_line_stations.join(", ")
        ));
    }

    if let Some(name) = &args.lookup {
        let id = directory
            .resolve_by_name(name)
            .ok_or_else(|| Error::unknown_station_name(name))?;
        let station = directory.resolve_by_id(id)?;
        let lines = directory.lines_serving(id);

        output.push_str(&format!("Lookup '{}':\n", name));
        output.push_str(&format!("   Id: {}\n", station.id.bright_white().bold()));
        output.push_str(&format!("   Name: {}\n", station.name));
        output.push_str(&format!(
            "   Position: {:.6}, {:.6}\n",
            station.coordinates.latitude, station.coordinates.longitude
        ));
        if lines.is_empty() {
            output.push_str("   Lines: none\n");
        } else {
            output.push_str(&format!("   Lines: {}\n", lines.join(", ")));
        }
        output.push('\n');
    }

    let line_catalogue = directory.lines();
    if !line_catalogue.is_empty() {
        output.push_str("Lines:\n");
        for line in &line_catalogue {
            output.push_str(&format!(
                "   {:6} {} stations\n",
                line.name,
                line.stations.len()
            ));
        }
        output.push('\n');
    }

    if args.detailed {
        output.push_str("Id       | Name                          | Lines\n");
        output.push_str("---------|-------------------------------|----------------\n");
        for entry in directory.station_list() {
            output.push_str(&format!(
                "{:8} | {:29} | {}\n",
                entry.id,
                entry.name,
                directory.lines_serving(&entry.id).join(", ")
            ));
        }
    }

    Ok(output)
}

/// Machine-readable station report
fn build_json_report(
    args: &StationsArgs,
    directory: &StationDirectory,
    stats: &LoadStats,
) -> Result<Value> {
    let metadata = directory.metadata();

    let mut report = json!({
        "dataset": metadata.source_path.as_ref().map(|path| path.display().to_string()),
        "records_found": stats.records_found,
        "station_count": metadata.station_count,
        "line_count": metadata.line_count,
        "load_seconds": stats.load_duration.as_secs_f64(),
        "dangling_line_stations": stats.dangling_line_stations,
        "lines": directory.lines(),
    });

    if let Some(name) = &args.lookup {
        let id = directory
            .resolve_by_name(name)
            .ok_or_else(|| Error::unknown_station_name(name))?;
        report["lookup"] = json!({
            "query": name,
            "station": directory.resolve_by_id(id)?,
            "lines": directory.lines_serving(id),
        });
    }

    if args.detailed {
        report["stations"] = json!(directory.station_list());
    }

    Ok(report)
}
