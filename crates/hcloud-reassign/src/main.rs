mod commands;

use clap::{ArgAction, Parser, Subcommand};
use hcloud_reassign_cloud::MetricKind;
use hcloud_reassign_core::metrics::{DEFAULT_STEP, Interval};
use hcloud_reassign_core::poller::{DEFAULT_INTERVAL, DEFAULT_MAX_RETRIES};
use hcloud_reassign_core::{Direction, PollConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hcloud-reassign")]
#[command(
    about = "Move Hetzner Cloud floating IPs, primary IPs and routes between servers",
    long_about = None
)]
#[command(disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Prompt for the API token (overrides the configured token)
    #[arg(short, long, global = true)]
    token: bool,

    /// Resource section to process, repeatable (default: all)
    #[arg(short = 'r', long = "resource", action = ArgAction::Append, global = true)]
    resources: Vec<String>,

    /// Move resources to the source (src) or destination (dest) server
    #[arg(short, long, default_value = "dest")]
    direction: Direction,

    /// Override the source server of the selected sections
    #[arg(long)]
    source: Option<String>,

    /// Override the destination server of the selected sections
    #[arg(long)]
    destination: Option<String>,

    /// Status checks per remote action
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    retries: u32,

    /// Pause between two status checks in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_millis() as u64)]
    interval_ms: u64,

    /// Do not wait for remote actions to finish
    #[arg(long, conflicts_with_all = ["retries", "interval_ms"])]
    no_wait: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print version and build information
    #[arg(long)]
    version: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured resource sections
    List,
    /// Show server metrics of resource sections with metrics enabled
    Metrics {
        /// Server to query: src or dest
        #[arg(long, default_value = "dest")]
        side: Direction,
        /// Metric type (repeatable, default: all)
        #[arg(short, long = "kind")]
        kinds: Vec<MetricKind>,
        /// Interval start (RFC 3339, default: 30 minutes ago)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Interval end (RFC 3339, default: now)
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Resolution in seconds
        #[arg(long, default_value_t = DEFAULT_STEP)]
        step: u32,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_version() {
    println!("hcloud-reassign {}", env!("CARGO_PKG_VERSION"));
    println!("package: {}", env!("CARGO_PKG_NAME"));
    println!(
        "target: {}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // --version needs no configuration file
    if cli.version {
        print_version();
        return Ok(());
    }

    let config = commands::load_config(cli.config.as_deref(), cli.token)?;

    let code = match cli.command {
        Some(Commands::List) => commands::list::handle(&config, &cli.resources)?,
        Some(Commands::Metrics {
            side,
            kinds,
            start,
            end,
            step,
        }) => {
            let interval = match (start, end) {
                (Some(start), Some(end)) => Interval::from_bounds(&start, &end)?,
                _ => Interval::Now,
            };
            let kinds = if kinds.is_empty() {
                MetricKind::ALL.to_vec()
            } else {
                kinds
            };
            let options = commands::metrics::MetricsOptions {
                resources: &cli.resources,
                side,
                kinds,
                interval,
                step,
            };
            commands::metrics::handle(config, options).await?
        }
        None => {
            let poll = if cli.no_wait {
                PollConfig::no_wait()
            } else {
                PollConfig::new(cli.retries, Duration::from_millis(cli.interval_ms))
            };
            let options = commands::reassign::ReassignOptions {
                resources: &cli.resources,
                direction: cli.direction,
                source: cli.source.as_deref(),
                destination: cli.destination.as_deref(),
                poll,
            };
            commands::reassign::handle(config, options).await?
        }
    };

    std::process::exit(code);
}
