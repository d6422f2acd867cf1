//! Query and benchmark CLI for the journey-planning routing engine.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use route_bench::metrics::SummaryContext;
use route_bench::sampler::time_seed;
use route_bench::{
    BenchError, BenchStats, BenchmarkDriver, Overrides, QueryWorker, RenderMode, ReportFormat,
    ResultRenderer, ResultsReport, Sampler, Scenario, WorkerContext,
};
use routing_client::TcpRoutingClient;

/// Name sent to the engine with every request.
const REQUESTER: &str = "route-bench";

#[derive(Parser)]
#[command(name = "route-bench")]
#[command(about = "Query and benchmark tool for the routing engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// File to read coordinates from, one per line (overrides positional coordinates)
    #[arg(long = "coords", global = true, env = "ROUTE_BENCH_COORDS")]
    coords_file: Option<PathBuf>,

    /// Routing engine to target [default: tcp://127.0.0.1:6000]
    #[arg(short, long, global = true, env = "ROUTE_BENCH_TARGET")]
    target: Option<String>,

    /// Remove normal output; `--quiet=false` overrides a quiet scenario
    #[arg(
        short,
        long,
        global = true,
        env = "ROUTE_BENCH_QUIET",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    quiet: Option<bool>,

    /// Per-request timeout, e.g. 500ms or 10s [default: 10s]
    #[arg(short = 'd', long, global = true, env = "ROUTE_BENCH_TIMEOUT", value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Run the benchmark for the given duration, e.g. 30s [default: 0s, a single query]
    #[arg(long, global = true, env = "ROUTE_BENCH_BENCH", value_parser = humantime::parse_duration)]
    bench: Option<Duration>,

    /// Number of concurrent workers in bench mode [default: 1]
    #[arg(short, long, global = true, env = "ROUTE_BENCH_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Seed for coordinate and mode sampling (default: derived from the clock)
    #[arg(long, global = true, env = "ROUTE_BENCH_SEED")]
    seed: Option<u64>,

    /// YAML scenario providing defaults for the other options
    #[arg(long, global = true, env = "ROUTE_BENCH_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Summary format after a bench run: table, json or none [default: table]
    #[arg(long, global = true, env = "ROUTE_BENCH_REPORT")]
    report: Option<ReportFormat>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a direct path from a random coordinate to another random coordinate
    #[command(name = "directpath")]
    DirectPath {
        /// Coordinates to sample from
        coords: Vec<String>,
    },

    /// Compute a matrix from a random coordinate to all the others
    Matrix {
        /// Coordinates to sample from
        coords: Vec<String>,

        /// Max duration to explore, in seconds [default: 1800]
        #[arg(long, env = "ROUTE_BENCH_MAX_DURATION")]
        max_duration: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.options.log_level, &cli.options.log_format);

    if let Err(err) = run(cli).await {
        error!(error = %err, "Fatal error");
        std::process::exit(1);
    }
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries results; logs go to stderr.
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = cli.options;
    let (matrix, coordinates, max_duration) = match cli.command {
        Commands::DirectPath { coords } => (false, coords, None),
        Commands::Matrix {
            coords,
            max_duration,
        } => (true, coords, max_duration),
    };

    let scenario = options
        .scenario
        .as_deref()
        .map(Scenario::from_file)
        .transpose()?;
    if let Some(scenario) = &scenario {
        info!(
            scenario = scenario.name.as_deref().unwrap_or("unnamed"),
            "Loaded scenario"
        );
    }

    let overrides = Overrides {
        target: options.target,
        timeout: options.timeout,
        bench: options.bench,
        concurrency: options.concurrency,
        quiet: options.quiet,
        seed: options.seed,
        coords_file: options.coords_file,
        coordinates,
        max_duration,
        report: options.report,
    };
    let settings = overrides.resolve(scenario.as_ref(), matrix)?;

    let coords = settings.coords.load()?;
    if coords.is_empty() {
        return Err(BenchError::Configuration(format!(
            "no coordinates to sample from ({})",
            settings.coords.describe()
        ))
        .into());
    }
    info!(
        count = coords.len(),
        source = %settings.coords.describe(),
        "Loaded coordinates"
    );

    let client = TcpRoutingClient::new(REQUESTER, &settings.target, settings.bench.timeout)?;

    let seed = settings.bench.seed.unwrap_or_else(time_seed);
    info!(
        query = %settings.query,
        engine = %client.target(),
        timeout = %humantime::format_duration(settings.bench.timeout),
        seed,
        "Routing client ready"
    );

    let single_shot = settings.bench.is_single_shot();
    let render_mode = if single_shot {
        RenderMode::SingleShot
    } else {
        RenderMode::Sustained
    };

    let stats = Arc::new(BenchStats::new());
    let context = WorkerContext {
        client: Arc::new(client),
        coords: Arc::new(coords),
        query: settings.query,
        renderer: ResultRenderer::new(settings.bench.quiet, render_mode),
        stats: stats.clone(),
    };

    let mut root = Sampler::seeded(seed);
    let driver = BenchmarkDriver::new(settings.bench.clone());
    let elapsed = driver
        .run(|id| QueryWorker::new(id, context.clone(), root.fork()))
        .await;

    if single_shot {
        return Ok(());
    }

    let summary = stats.summary(
        SummaryContext {
            query: settings.query.to_string(),
            target: settings.target.clone(),
            concurrency: settings.bench.concurrency,
            seed,
        },
        elapsed,
    );
    info!(
        total = summary.total_requests,
        failed = summary.failed_requests,
        rps = summary.requests_per_second,
        "Benchmark complete"
    );

    if let Some(text) = ResultsReport::format(&summary, settings.report)? {
        // Terminates the line of progress markers, if any.
        eprintln!();
        eprintln!("{}", text);
    }

    Ok(())
}
