//! Command-line interface for the outreach planner.
//!
//! Every command reads a Parquet point snapshot (or, for `zones`, a zone
//! snapshot), runs the relevant part of the pipeline and hands back a report
//! that [`render_summary`] writes as text or JSON.

mod commands;

pub use commands::{
    Cli, CliError, ClustersCommand, Command, ExecutionSummary, GraphArgs, GraphCommand,
    OutputFormat, PointArgs, Report, RouteCommand, ZonesCommand, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
