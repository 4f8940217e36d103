//! Output formatting for tmsim

use anyhow::Error;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;
use crate::run::SimReport;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidArgument(_)) => "invalid_argument",
        Some(CliError::LinkStopped(_)) => "link_stopped",
        Some(CliError::Pipeline(_)) => "pipeline",
        Some(CliError::JsonError(_)) => "json",
        None => "unknown",
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print a simulation report
pub fn print_report(report: &SimReport, json: bool) {
    if json {
        print_json(&json!({ "success": true, "report": report }));
        return;
    }

    let params = &report.params;
    println!("{}", "Simulation complete".bold());
    println!(
        "  {} agents, {} ticks, {} lane(s), ring {:.0} m, seed {}",
        params.agents, params.ticks, params.lanes, params.ring_length_m, params.seed
    );
    println!("  elapsed:          {} ms", report.elapsed_ms);
    println!("  commands:         {}", report.commands);
    let hazards = format!("{}", report.hazard_commands);
    println!(
        "  hazard commands:  {}",
        if report.hazard_commands == 0 {
            hazards.green()
        } else {
            hazards.yellow()
        }
    );
    if let Some(gap) = report.min_gap_m {
        println!("  closest gap:      {gap:.2} m");
    }
    println!("  mean speed:       {:.2} m/s", report.mean_speed_mps);

    println!("{}", "Track traffic".bold());
    println!(
        "  waypoints {} | linked agents {} | agents in grids {} | occupied grids {}",
        report.track.waypoints,
        report.track.linked_agents,
        report.track.agents_in_grids,
        report.track.occupied_grids
    );
    let teardown = if report.track_after_teardown.is_empty() {
        "empty".green()
    } else {
        "NOT EMPTY".red()
    };
    println!("  after teardown:   {teardown}");

    println!("{}", "Stages".bold());
    for stage in &report.session.stages {
        let status = if stage.panicked {
            "panicked".red()
        } else {
            "ok".green()
        };
        println!(
            "  {:<14} processed {:>7}  forwarded {:>7}  dropped {:>5}  {}",
            stage.name, stage.processed, stage.forwarded, stage.dropped, status
        );
    }
    println!("{}", "Links".bold());
    for link in &report.session.links {
        println!(
            "  {:<26} sent {:>7}  received {:>7}  pending {:>3}",
            link.name, link.stats.sent, link.stats.received, link.stats.pending
        );
    }
}
