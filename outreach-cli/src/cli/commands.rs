//! Command implementations and argument parsing for the outreach CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use outreach_core::{
    DEFAULT_NEIGHBOURS, DEFAULT_RADIUS_KM, DEFAULT_TOP_K, EdgeKind, OutreachError, Planner,
    PlannerBuilder, Point, SeverityBracket, ZoneCatalog, ZoneIndex,
    report::{ClusteringReport, GraphReport, RouteReport, ZoneListing},
};
use outreach_providers_parquet::{ParquetPointProvider, ParquetProviderError, ParquetZoneProvider};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "outreach",
    about = "Cluster patient records and plan outreach routes between the clusters."
)]
pub struct Cli {
    /// Output format for the report written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub format: OutputFormat,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster the points of one severity bracket.
    Clusters(ClustersCommand),
    /// Build the tree-plus-neighbours graph over the clusters.
    Graph(GraphCommand),
    /// Find the cheapest route, or rank the cheapest destinations.
    Route(RouteCommand),
    /// List the zones of a zone snapshot.
    Zones(ZonesCommand),
}

/// Output formats for rendered reports.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines.
    #[default]
    Human,
    /// Pretty-printed JSON.
    Json,
}

/// Point ingestion and clustering arguments shared by every pipeline command.
#[derive(Debug, Args, Clone)]
pub struct PointArgs {
    /// Parquet file with `id`, `latitude`, `longitude` and `severity` columns.
    #[arg(long)]
    pub points: PathBuf,

    /// Severity bracket to select: `alta`, `media`, `baja` or `none`.
    #[arg(long, default_value = "alta")]
    pub bracket: SeverityBracket,

    /// Clustering radius in kilometres.
    #[arg(long = "radius-km", default_value_t = DEFAULT_RADIUS_KM)]
    pub radius_km: f64,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Graph construction arguments.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Minimum members for a cluster to become a graph node.
    #[arg(long = "min-size", default_value_t = 1)]
    pub min_size: usize,

    /// Nearest-neighbour edges added per node on top of the tree.
    #[arg(long, default_value_t = DEFAULT_NEIGHBOURS)]
    pub neighbours: usize,

    /// Zone snapshot; when given, edges are weighted by zone penalty.
    #[arg(long)]
    pub zones: Option<PathBuf>,
}

/// Options accepted by the `clusters` command.
#[derive(Debug, Args, Clone)]
pub struct ClustersCommand {
    /// Point selection and clustering.
    #[command(flatten)]
    pub points: PointArgs,
}

/// Options accepted by the `graph` command.
#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Point selection and clustering.
    #[command(flatten)]
    pub points: PointArgs,

    /// Graph construction.
    #[command(flatten)]
    pub graph: GraphArgs,
}

/// Options accepted by the `route` command.
#[derive(Debug, Args, Clone)]
pub struct RouteCommand {
    /// Point selection and clustering.
    #[command(flatten)]
    pub points: PointArgs,

    /// Graph construction.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Node the routes start from.
    #[arg(long)]
    pub origin: usize,

    /// Target node; omit to rank the cheapest destinations instead.
    #[arg(long)]
    pub destination: Option<usize>,

    /// Destinations kept when ranking.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top: usize,

    /// Route over the complete distance graph of all clusters instead.
    #[arg(long)]
    pub complete: bool,
}

/// Options accepted by the `zones` command.
#[derive(Debug, Args, Clone)]
pub struct ZonesCommand {
    /// Parquet file with the zone attribute and `region` columns.
    #[arg(long)]
    pub zones: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Parquet ingestion failed.
    #[error(transparent)]
    Provider(#[from] ParquetProviderError),
    /// Core planning failed.
    #[error(transparent)]
    Core(#[from] OutreachError),
}

/// Report produced by one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Output of `clusters`.
    Clusters(ClusteringReport),
    /// Output of `graph`.
    Graph(GraphReport),
    /// Output of `route`.
    Route(RouteReport),
    /// Output of `zones`.
    Zones(ZoneListing),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the point or zone snapshot the command read.
    pub data_source: String,
    /// Rendered-ready report.
    pub report: Report,
}

/// Executes the CLI command represented by `cli` against the process-wide
/// zone catalog.
///
/// # Errors
/// Returns [`CliError`] when ingestion or planning fails.
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    execute(cli, ZoneCatalog::global())
}

#[instrument(
    name = "cli.run",
    err,
    skip(cli, catalog),
    fields(command = field::Empty),
)]
pub(super) fn execute(cli: Cli, catalog: &ZoneCatalog) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    let summary = match cli.command {
        Command::Clusters(command) => {
            span.record("command", field::display("clusters"));
            run_clusters(&command)?
        }
        Command::Graph(command) => {
            span.record("command", field::display("graph"));
            run_graph(&command, catalog)?
        }
        Command::Route(command) => {
            span.record("command", field::display("route"));
            run_route(&command, catalog)?
        }
        Command::Zones(command) => {
            span.record("command", field::display("zones"));
            run_zones(&command, catalog)?
        }
    };
    info!(
        data_source = summary.data_source.as_str(),
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.clusters",
    err,
    skip(command),
    fields(bracket = %command.points.bracket, radius_km = command.points.radius_km),
)]
pub(super) fn run_clusters(command: &ClustersCommand) -> Result<ExecutionSummary, CliError> {
    let planner = PlannerBuilder::new()
        .with_radius_km(command.points.radius_km)
        .build()?;
    let (data_source, points) = load_points(&planner, &command.points)?;
    let clusters = planner.compute_clusters(&points)?;
    info!(clusters = clusters.len(), "clustering completed");
    Ok(ExecutionSummary {
        data_source,
        report: Report::Clusters(ClusteringReport::new(
            command.points.bracket.token(),
            &clusters,
            &points,
        )),
    })
}

#[instrument(
    name = "cli.graph",
    err,
    skip(command, catalog),
    fields(weighted = command.graph.zones.is_some(), neighbours = command.graph.neighbours),
)]
pub(super) fn run_graph(
    command: &GraphCommand,
    catalog: &ZoneCatalog,
) -> Result<ExecutionSummary, CliError> {
    let planner = graph_planner(&command.points, &command.graph, DEFAULT_TOP_K, catalog)?;
    let (data_source, points) = load_points(&planner, &command.points)?;
    let clusters = planner.compute_clusters(&points)?;
    let graph = planner.build_augmented_graph(&clusters, planner.zones().is_some())?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );
    Ok(ExecutionSummary {
        data_source,
        report: Report::Graph(GraphReport::from(&graph)),
    })
}

#[instrument(
    name = "cli.route",
    err,
    skip(command, catalog),
    fields(
        origin = command.origin,
        destination = field::Empty,
        complete = command.complete,
    ),
)]
pub(super) fn run_route(
    command: &RouteCommand,
    catalog: &ZoneCatalog,
) -> Result<ExecutionSummary, CliError> {
    if let Some(destination) = command.destination {
        Span::current().record("destination", destination);
    }
    let planner = graph_planner(&command.points, &command.graph, command.top, catalog)?;
    let (data_source, points) = load_points(&planner, &command.points)?;
    let clusters = planner.compute_clusters(&points)?;
    let outcome = if command.complete {
        planner.find_direct_path(&clusters, command.origin, command.destination)?
    } else {
        let graph = planner.build_augmented_graph(&clusters, planner.zones().is_some())?;
        planner.find_path(&graph, command.origin, command.destination)?
    };
    Ok(ExecutionSummary {
        data_source,
        report: Report::Route(RouteReport::from(&outcome)),
    })
}

#[instrument(name = "cli.zones", err, skip(command, catalog), fields(path = %command.zones.display()))]
pub(super) fn run_zones(
    command: &ZonesCommand,
    catalog: &ZoneCatalog,
) -> Result<ExecutionSummary, CliError> {
    let index = load_zones(&command.zones, catalog)?;
    Ok(ExecutionSummary {
        data_source: derive_data_source_name(&command.zones, None),
        report: Report::Zones(ZoneListing::from(index.as_ref())),
    })
}

fn graph_planner(
    points: &PointArgs,
    graph: &GraphArgs,
    top_k: usize,
    catalog: &ZoneCatalog,
) -> Result<Planner, CliError> {
    let mut builder = PlannerBuilder::new()
        .with_radius_km(points.radius_km)
        .with_min_cluster_size(graph.min_size)
        .with_neighbours(graph.neighbours)
        .with_top_k(top_k);
    if let Some(path) = &graph.zones {
        builder = builder.with_zones(load_zones(path, catalog)?);
    }
    Ok(builder.build()?)
}

#[instrument(name = "cli.load_points", err, skip(planner, args), fields(path = %args.points.display()))]
pub(super) fn load_points(
    planner: &Planner,
    args: &PointArgs,
) -> Result<(String, Vec<Point>), CliError> {
    let name = derive_data_source_name(&args.points, args.name.as_deref());
    let provider = ParquetPointProvider::try_from_parquet_path(name.as_str(), &args.points)?;
    let points = planner.load_points(&provider, args.bracket)?;
    info!(
        selected = points.len(),
        total = provider.all_points().len(),
        "points selected"
    );
    Ok((name, points))
}

#[instrument(name = "cli.load_zones", err, skip(catalog), fields(cached = catalog.is_loaded()))]
pub(super) fn load_zones(path: &Path, catalog: &ZoneCatalog) -> Result<Arc<ZoneIndex>, CliError> {
    if let Some(index) = catalog.get() {
        return Ok(index);
    }
    let provider =
        ParquetZoneProvider::try_from_parquet_path(derive_data_source_name(path, None), path)?;
    if provider.skipped() > 0 {
        info!(skipped = provider.skipped(), "some zones were unreadable");
    }
    Ok(catalog.get_or_load(&provider)?)
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "data_source".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in the requested format.
///
/// # Errors
/// Returns [`io::Error`] if serialisation or writing fails.
pub fn render_summary(
    summary: &ExecutionSummary,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            match &summary.report {
                Report::Clusters(report) => serde_json::to_writer_pretty(&mut writer, report)?,
                Report::Graph(report) => serde_json::to_writer_pretty(&mut writer, report)?,
                Report::Route(report) => serde_json::to_writer_pretty(&mut writer, report)?,
                Report::Zones(report) => serde_json::to_writer_pretty(&mut writer, report)?,
            }
            writeln!(writer)
        }
        OutputFormat::Human => {
            writeln!(writer, "data source: {}", summary.data_source)?;
            match &summary.report {
                Report::Clusters(report) => render_clusters(report, &mut writer),
                Report::Graph(report) => render_graph(report, &mut writer),
                Report::Route(report) => render_route(report, &mut writer),
                Report::Zones(report) => render_zones(report, &mut writer),
            }
        }
    }
}

fn render_clusters(report: &ClusteringReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "bracket: {}", report.bracket)?;
    writeln!(writer, "clusters: {}", report.count)?;
    for cluster in &report.clusters {
        let [latitude, longitude] = cluster.centroid;
        writeln!(
            writer,
            "{}\t{}\t{latitude},{longitude}\t{}",
            cluster.id,
            cluster.size,
            join(&cluster.members, ",")
        )?;
    }
    Ok(())
}

fn render_graph(report: &GraphReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "nodes: {}", report.node_count)?;
    writeln!(writer, "mst edges: {}", report.mst_edges.len())?;
    writeln!(writer, "extra edges: {}", report.extra_edges.len())?;
    for edge in report.mst_edges.iter().chain(&report.extra_edges) {
        let kind = match edge.kind {
            EdgeKind::Mst => "mst",
            EdgeKind::Extra => "extra",
        };
        let weight = edge
            .sanitary_weight
            .map_or_else(|| "-".to_owned(), |weight| weight.to_string());
        writeln!(
            writer,
            "{kind}\t{}\t{}\t{}\t{weight}",
            edge.a, edge.b, edge.distance_km
        )?;
    }
    Ok(())
}

fn render_route(report: &RouteReport, mut writer: impl Write) -> io::Result<()> {
    match report {
        RouteReport::Path(path) => {
            writeln!(writer, "path: {}", join(&path.nodes, " -> "))?;
            writeln!(writer, "cost: {}", path.total_cost)
        }
        RouteReport::Unreachable {
            origin,
            destination,
        } => writeln!(writer, "unreachable: {origin} -> {destination}"),
        RouteReport::Ranked { origin, routes } => {
            writeln!(writer, "origin: {origin}")?;
            writeln!(writer, "routes: {}", routes.len())?;
            for route in routes {
                writeln!(
                    writer,
                    "{}\t{}\t{}",
                    route.destination,
                    route.total_cost,
                    join(&route.nodes, " -> ")
                )?;
            }
            Ok(())
        }
        RouteReport::NegativeCycle(cycle) => writeln!(
            writer,
            "negative cycle from {}: {}",
            cycle.origin,
            join(&cycle.nodes, " -> ")
        ),
    }
}

fn render_zones(report: &ZoneListing, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "zones: {}", report.count)?;
    for zone in &report.zones {
        let [longitude, latitude] = zone.centroid;
        let attributes = zone.attributes;
        writeln!(
            writer,
            "{}\t{longitude},{latitude}\t{}\trisk={} accessibility={} bonus={} score={}",
            zone.index,
            zone.vertices,
            attributes.risk,
            attributes.accessibility,
            attributes.bonus,
            attributes.score
        )?;
    }
    Ok(())
}

fn join<T: ToString>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
