//! Unit tests for the CLI commands and report rendering.

use super::commands::{derive_data_source_name, execute};
use super::{
    Cli, CliError, ClustersCommand, Command, ExecutionSummary, GraphArgs, GraphCommand,
    OutputFormat, PointArgs, Report, RouteCommand, ZonesCommand, render_summary,
};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{Field, Schema};
use clap::Parser;
use outreach_core::{
    EdgeKind, OutreachError, SeverityBracket, ZoneCatalog,
    report::{RouteReport, ZoneListing},
};
use outreach_providers_parquet::ParquetProviderError;
use parquet::arrow::arrow_writer::ArrowWriter;
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use outreach_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SQUARE: &str = "POLYGON ((-1 -1, 3 -1, 3 1, -1 1, -1 -1))";

#[rstest]
#[case::override_name("/tmp/survey.parquet", Some("override"), "override")]
#[case::stem_with_extension("/tmp/survey.parquet", None, "survey")]
#[case::stem_without_extension("/tmp/survey", None, "survey")]
#[case::missing_stem("", None, "data_source")]
fn derive_data_source_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    let name = derive_data_source_name(Path::new(raw_path), override_name);
    assert_eq!(name, expected);
}

#[rstest]
#[case::severe(SeverityBracket::Severe, vec![vec![1, 2], vec![3], vec![4]])]
#[case::mild(SeverityBracket::Mild, vec![vec![5]])]
#[case::unaffected(SeverityBracket::Unaffected, vec![])]
fn clusters_command_groups_selected_points(
    #[case] bracket: SeverityBracket,
    #[case] expected: Vec<Vec<i64>>,
) -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Clusters(ClustersCommand {
        points: point_args(points, bracket),
    }))?;

    assert_eq!(summary.data_source, "survey");
    let Report::Clusters(report) = summary.report else {
        panic!("clusters command must produce a clustering report");
    };
    assert_eq!(report.bracket, bracket.token());
    let members: Vec<Vec<i64>> = report
        .clusters
        .iter()
        .map(|cluster| cluster.members.clone())
        .collect();
    assert_eq!(members, expected);
    Ok(())
}

#[rstest]
fn graph_command_adds_neighbour_edges_to_the_tree() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Graph(GraphCommand {
        points: point_args(points, SeverityBracket::Severe),
        graph: graph_args(None, 3),
    }))?;

    let Report::Graph(report) = summary.report else {
        panic!("graph command must produce a graph report");
    };
    assert_eq!(report.node_count, 3);
    assert_eq!(report.mst_edges.len(), 2);
    assert_eq!(report.extra_edges.len(), 1);
    assert_eq!((report.extra_edges[0].a, report.extra_edges[0].b), (0, 2));
    assert!(report.mst_edges.iter().all(|edge| edge.kind == EdgeKind::Mst));
    assert!(
        report
            .mst_edges
            .iter()
            .all(|edge| edge.sanitary_weight.is_none())
    );
    Ok(())
}

#[rstest]
fn graph_command_weights_edges_by_zone_penalty() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let zones = create_zones_file(&dir, &[SQUARE], &[2.0])?;
    let summary = run(Command::Graph(GraphCommand {
        points: point_args(points, SeverityBracket::Severe),
        graph: graph_args(Some(zones), 0),
    }))?;

    let Report::Graph(report) = summary.report else {
        panic!("graph command must produce a graph report");
    };
    assert!(report.extra_edges.is_empty());
    for edge in &report.mst_edges {
        let weight = edge.sanitary_weight.expect("weighted edges carry a weight");
        assert!((weight - edge.distance_km - 2.0).abs() < 2e-3);
        assert_eq!(edge.zone.map(|zone| zone.risk), Some(2.0));
    }
    Ok(())
}

#[rstest]
fn route_command_follows_the_tree() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Route(route_command(points, Some(2), false)))?;

    let Report::Route(RouteReport::Path(path)) = summary.report else {
        panic!("route command must produce a path");
    };
    assert_eq!(path.nodes, vec![0, 1, 2]);
    assert_eq!(path.links.len(), 2);
    Ok(())
}

#[rstest]
#[case::tree(false)]
#[case::complete(true)]
fn route_command_ranks_destinations_without_target(#[case] complete: bool) -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Route(route_command(points, None, complete)))?;

    let Report::Route(RouteReport::Ranked { origin, routes }) = summary.report else {
        panic!("route command must produce a ranking");
    };
    assert_eq!(origin, 0);
    let destinations: Vec<usize> = routes.iter().map(|route| route.destination).collect();
    assert_eq!(destinations, vec![1, 2]);
    Ok(())
}

#[rstest]
fn route_command_rejects_unknown_origin() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let mut command = route_command(points, None, false);
    command.origin = 9;
    let err = run_expecting_error(Command::Route(command), "origin 9 must be rejected");
    assert!(matches!(
        err,
        CliError::Core(OutreachError::OutOfRangeNode {
            node: 9,
            node_count: 3
        })
    ));
    Ok(())
}

#[rstest]
fn zones_command_lists_readable_zones() -> TestResult {
    let dir = temp_dir();
    let zones = create_zones_file(&dir, &[SQUARE, "not a polygon"], &[2.0, 5.0])?;
    let summary = run(Command::Zones(ZonesCommand { zones }))?;

    assert_eq!(summary.data_source, "zones");
    let Report::Zones(listing) = summary.report else {
        panic!("zones command must produce a listing");
    };
    assert_eq!(listing.count, 1);
    assert_eq!(listing.zones[0].attributes.risk, 2.0);
    Ok(())
}

#[rstest]
fn zones_are_loaded_once_per_catalog() -> TestResult {
    let dir = temp_dir();
    let first = create_zones_file(&dir, &[SQUARE], &[2.0])?;
    let catalog = ZoneCatalog::new();
    execute(cli(Command::Zones(ZonesCommand { zones: first })), &catalog)?;

    let missing = dir.path().join("missing.parquet");
    let summary = execute(cli(Command::Zones(ZonesCommand { zones: missing })), &catalog)?;
    let Report::Zones(listing) = summary.report else {
        panic!("zones command must produce a listing");
    };
    assert_eq!(listing.count, 1);
    Ok(())
}

#[rstest]
fn missing_points_file_is_a_provider_error() {
    let dir = temp_dir();
    let err = run_expecting_error(
        Command::Clusters(ClustersCommand {
            points: point_args(dir.path().join("absent.parquet"), SeverityBracket::Severe),
        }),
        "missing file must fail",
    );
    assert!(matches!(
        err,
        CliError::Provider(ParquetProviderError::Io(_))
    ));
}

#[rstest]
fn points_without_severity_are_rejected() -> TestResult {
    let dir = temp_dir();
    let path = dir.path().join("partial.parquet");
    write_batch(
        &path,
        &batch(vec![
            ("id", Arc::new(Int64Array::from(vec![1_i64])) as ArrayRef),
            ("latitude", floats(&[0.0])),
            ("longitude", floats(&[0.0])),
        ]),
    )?;
    let err = run_expecting_error(
        Command::Clusters(ClustersCommand {
            points: point_args(path, SeverityBracket::Severe),
        }),
        "missing column must fail",
    );
    assert!(matches!(
        err,
        CliError::Provider(ParquetProviderError::ColumnNotFound { ref column }) if column == "severity"
    ));
    Ok(())
}

#[rstest]
fn invalid_radius_is_a_core_error() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let mut args = point_args(points, SeverityBracket::Severe);
    args.radius_km = -1.0;
    let err = run_expecting_error(
        Command::Clusters(ClustersCommand { points: args }),
        "negative radius must fail",
    );
    assert!(matches!(
        err,
        CliError::Core(OutreachError::InvalidRadius { .. })
    ));
    Ok(())
}

#[rstest]
fn clap_applies_defaults() -> TestResult {
    let parsed = Cli::try_parse_from(["outreach", "graph", "--points", "survey.parquet"])?;
    assert_eq!(parsed.format, OutputFormat::Human);
    let Command::Graph(command) = parsed.command else {
        panic!("graph subcommand must parse");
    };
    assert_eq!(command.points.bracket, SeverityBracket::Severe);
    assert_eq!(command.points.radius_km, 5.0);
    assert_eq!(command.graph.min_size, 1);
    assert_eq!(command.graph.neighbours, 3);
    assert!(command.graph.zones.is_none());
    Ok(())
}

#[rstest]
fn clap_parses_route_options() -> TestResult {
    let parsed = Cli::try_parse_from([
        "outreach",
        "route",
        "--points",
        "survey.parquet",
        "--bracket",
        "media",
        "--origin",
        "2",
        "--top",
        "1",
        "--complete",
        "--format",
        "json",
    ])?;
    assert_eq!(parsed.format, OutputFormat::Json);
    let Command::Route(command) = parsed.command else {
        panic!("route subcommand must parse");
    };
    assert_eq!(command.points.bracket, SeverityBracket::Moderate);
    assert_eq!(command.origin, 2);
    assert_eq!(command.destination, None);
    assert_eq!(command.top, 1);
    assert!(command.complete);
    Ok(())
}

#[rstest]
#[case::unknown_bracket(&["outreach", "clusters", "--points", "survey.parquet", "--bracket", "grave"])]
#[case::missing_origin(&["outreach", "route", "--points", "survey.parquet"])]
#[case::unknown_format(&["outreach", "zones", "--zones", "zones.parquet", "--format", "xml"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn render_summary_writes_human_clusters() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Clusters(ClustersCommand {
        points: point_args(points, SeverityBracket::Severe),
    }))?;

    let mut buffer = Vec::new();
    render_summary(&summary, OutputFormat::Human, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains("data source: survey"));
    assert!(text.contains("bracket: alta"));
    assert!(text.contains("clusters: 3"));
    assert!(text.contains("0\t2\t0,0.005\t1,2"));
    Ok(())
}

#[rstest]
fn render_summary_writes_tagged_route_json() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let summary = run(Command::Route(route_command(points, None, false)))?;

    let mut buffer = Vec::new();
    render_summary(&summary, OutputFormat::Json, &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(value["status"], "ranked");
    assert_eq!(value["origin"], 0);
    assert_eq!(value["routes"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[rstest]
fn render_summary_writes_human_route_variants() -> TestResult {
    let summary = ExecutionSummary {
        data_source: "demo".into(),
        report: Report::Route(RouteReport::Unreachable {
            origin: 0,
            destination: 3,
        }),
    };
    let mut buffer = Vec::new();
    render_summary(&summary, OutputFormat::Human, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "data source: demo\nunreachable: 0 -> 3\n"
    );

    let empty = ExecutionSummary {
        data_source: "zones".into(),
        report: Report::Zones(ZoneListing {
            count: 0,
            zones: Vec::new(),
        }),
    };
    let mut buffer = Vec::new();
    render_summary(&empty, OutputFormat::Human, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, "data source: zones\nzones: 0\n");
    Ok(())
}

#[rstest]
fn execute_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let points = create_points_file(&dir)?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let command = Command::Graph(GraphCommand {
        points: point_args(points, SeverityBracket::Severe),
        graph: graph_args(None, 2),
    });
    let summary = tracing::subscriber::with_default(subscriber, || run(command))?;
    assert_eq!(summary.data_source, "survey");

    let run_span = layer
        .span_named("cli.run")
        .expect("cli.run span must exist");
    assert_eq!(run_span.fields.get("command"), Some(&"graph".to_owned()));

    let graph_span = layer
        .span_named("cli.graph")
        .expect("cli.graph span must exist");
    assert_eq!(graph_span.fields.get("weighted"), Some(&"false".to_owned()));
    assert_eq!(graph_span.fields.get("neighbours"), Some(&"2".to_owned()));

    assert!(layer.span_named("core.build_augmented_graph").is_some());
    assert!(layer.events_at(Level::INFO).iter().any(|event| {
        event.message() == Some("command completed")
            && event
                .fields
                .get("data_source")
                .is_some_and(|value| value == "survey")
    }));
    Ok(())
}

fn cli(command: Command) -> Cli {
    Cli {
        format: OutputFormat::Human,
        command,
    }
}

/// Runs `command` against a fresh catalog so zone snapshots never leak
/// between tests.
fn run(command: Command) -> Result<ExecutionSummary, CliError> {
    execute(cli(command), &ZoneCatalog::new())
}

fn run_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run(command) {
        Ok(_) => panic!("{}", panic_msg),
        Err(err) => err,
    }
}

fn point_args(points: PathBuf, bracket: SeverityBracket) -> PointArgs {
    PointArgs {
        points,
        bracket,
        radius_km: 5.0,
        name: None,
    }
}

fn graph_args(zones: Option<PathBuf>, neighbours: usize) -> GraphArgs {
    GraphArgs {
        min_size: 1,
        neighbours,
        zones,
    }
}

fn route_command(points: PathBuf, destination: Option<usize>, complete: bool) -> RouteCommand {
    RouteCommand {
        points: point_args(points, SeverityBracket::Severe),
        graph: graph_args(None, 0),
        origin: 0,
        destination,
        top: 4,
        complete,
    }
}

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Three severe clusters along the equator roughly 111 km apart, plus one
/// mild record.
fn create_points_file(dir: &TempDir) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join("survey.parquet");
    write_batch(
        &path,
        &batch(vec![
            (
                "id",
                Arc::new(Int64Array::from(vec![1_i64, 2, 3, 4, 5])) as ArrayRef,
            ),
            ("latitude", floats(&[0.0, 0.0, 0.0, 0.0, 0.0])),
            ("longitude", floats(&[0.0, 0.01, 1.0, 2.0, 3.0])),
            ("severity", floats(&[6.0, 6.5, 7.0, 7.5, 11.0])),
        ]),
    )?;
    Ok(path)
}

fn create_zones_file(
    dir: &TempDir,
    regions: &[&str],
    risk: &[f64],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join("zones.parquet");
    let zeros = vec![0.0; regions.len()];
    write_batch(
        &path,
        &batch(vec![
            ("accessibility", floats(&zeros)),
            ("risk", floats(risk)),
            ("bonus", floats(&zeros)),
            ("score", floats(&zeros)),
            (
                "region",
                Arc::new(StringArray::from(regions.to_vec())) as ArrayRef,
            ),
        ]),
    )?;
    Ok(path)
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn batch(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    match RecordBatch::try_new(schema, columns.into_iter().map(|(_, array)| array).collect()) {
        Ok(batch) => batch,
        Err(err) => panic!("failed to construct record batch: {err}"),
    }
}

fn floats(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}
