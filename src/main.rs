//! Arka - debug console binary
//!
//! Drives the simulated dashboard core from the command line: watch ticks,
//! ask the assistant, run operations, switch profiles.

use anyhow::{bail, Context};
use arka::{
    clock::{self, Clock}, metrics, AppConfig, AppState, DebugConsole, MetricKind, MetricSimulator,
    Intent, MetricSnapshot, OperationSimulator, Scheduler,
};
use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "arka")]
#[command(about = "⚡ Arka System Manager - simulated dashboard core")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Debug console for the Arka dashboard: simulated metrics, templated assistant, scripted operations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory for persisted state (in-memory when omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick interval in milliseconds; overrides the config file
    #[arg(short, long)]
    interval: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tick the simulator and print snapshots and alerts (default)
    Watch(WatchArgs),

    /// Ask the assistant a question
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Run a scripted operation by name
    Run {
        /// memory_optimization, disk_cleanup, network_optimization, security_scan, system_repair
        operation: String,
    },

    /// List or activate profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Inspect the chat history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Force a high-load condition and show the alerts it raises
    SimulateLoad {
        /// Number of saturated ticks
        #[arg(default_value_t = 3)]
        ticks: u32,
    },

    /// Print a generated chart series
    Series(SeriesArgs),

    /// Take one snapshot and print it
    Snapshot {
        /// Output format: json or pretty
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// Remove all persisted state
    Reset,
}

#[derive(Args)]
struct WatchArgs {
    /// Number of ticks before exiting
    #[arg(short = 'n', long, default_value_t = 10)]
    ticks: usize,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// List profiles in registration order
    List,
    /// Make a profile the active one
    Activate { id: String },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Show entries, newest first
    List {
        /// Only entries of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Case-insensitive search over questions and answers
    Search { keyword: String },
    /// Delete every entry
    Clear,
}

#[derive(Args)]
struct SeriesArgs {
    /// cpu, ram, disk or network
    #[arg(default_value = "cpu")]
    kind: String,
    /// Number of one-second points
    #[arg(long, default_value_t = 120)]
    count: usize,
    #[arg(long, default_value_t = 0.0)]
    min: f64,
    #[arg(long, default_value_t = 100.0)]
    max: f64,
    /// Lookback window: 1m, 5m, 1h or 1d
    #[arg(long, default_value = "1m")]
    range: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = load_config(&cli)?;
    let clock = clock::system_clock();
    let state = AppState::open(config.clone(), clock.clone())
        .context("failed to open application state")?
        .into_shared();
    let console = DebugConsole::new(state.clone(), OperationSimulator::from_config(&config));

    match cli.command {
        Some(Commands::Watch(args)) => watch_command(&config, &console, args.ticks).await,
        None => watch_command(&config, &console, 10).await,
        Some(Commands::Ask { query }) => {
            let entry = console.ask(&query.join(" ")).await;
            println!("[{}]\n{}", entry.category, entry.ai_response);
            Ok(())
        }
        Some(Commands::Run { operation }) => run_command(&console, &operation).await,
        Some(Commands::Profile(cmd)) => profile_command(&console, cmd).await,
        Some(Commands::History(cmd)) => history_command(&console, cmd).await,
        Some(Commands::SimulateLoad { ticks }) => {
            simulate_load_command(&config, &console, ticks).await
        }
        Some(Commands::Series(args)) => series_command(args),
        Some(Commands::Snapshot { format }) => snapshot_command(&config, &console, &format).await,
        Some(Commands::Reset) => {
            console.reset().await;
            println!("All persisted state removed");
            Ok(())
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    let config = match cli.interval {
        Some(millis) => config.with_tick_interval(millis),
        None => config,
    };
    let config = match &cli.data_dir {
        Some(dir) => config.with_data_dir(Some(dir.clone())),
        None => config,
    };
    config.validate()?;
    Ok(config)
}

async fn watch_command(config: &AppConfig, console: &DebugConsole, ticks: usize) -> anyhow::Result<()> {
    info!("Watching {} ticks at {}ms", ticks, config.tick_interval_ms);
    let scheduler = Scheduler::with_defaults(config, clock::system_clock());
    let mut stream = scheduler
        .into_stream(console.state().clone(), config.tick_interval_ms)
        .take(ticks);

    while let Some(report) = stream.next().await {
        if let Some(snapshot) = &report.snapshot {
            println!(
                "#{:<4} CPU {:>5.1}%  {:>4.1}°C | RAM {:>5.1}% | DISK {:>5.1}% | NET ↓{:>6.1} ↑{:>5.1} Mbps {:>5.1} ms",
                report.tick.seq,
                snapshot.cpu.usage,
                snapshot.cpu.temperature,
                snapshot.ram.usage,
                snapshot.disk.usage,
                snapshot.network.down,
                snapshot.network.up,
                snapshot.network.ping
            );
        }
        for alert in &report.alerts {
            println!("      ⚠ [{}] {}: {}", alert.severity, alert.title, alert.message);
        }
    }
    Ok(())
}

async fn run_command(console: &DebugConsole, operation: &str) -> anyhow::Result<()> {
    let result = console.run_operation(operation).await;
    for entry in &result.execution_log {
        println!("[{:>3}%] {}", entry.progress_percent, entry.step);
    }
    println!();
    println!(
        "{} {} in {} ms",
        result.operation,
        if result.success { "succeeded" } else { "failed" },
        result.duration_millis
    );
    let delta = &result.metrics_affected;
    if delta.memory_freed_mb > 0.0 {
        println!("  Memory freed: {:.0} MB", delta.memory_freed_mb);
    }
    if delta.disk_freed_gb > 0.0 {
        println!("  Disk reclaimed: {:.1} GB", delta.disk_freed_gb);
    }
    if delta.ping_change_ms < 0.0 {
        println!("  Ping improved by {:.1} ms", -delta.ping_change_ms);
    }
    Ok(())
}

async fn profile_command(console: &DebugConsole, cmd: ProfileCommand) -> anyhow::Result<()> {
    match cmd {
        ProfileCommand::List => {
            let state = console.state().lock().await;
            for profile in state.profiles.list() {
                println!(
                    "{} {} {:<12} {}",
                    if profile.active { "●" } else { "○" },
                    profile.icon,
                    profile.id,
                    profile.description
                );
            }
        }
        ProfileCommand::Activate { id } => {
            if !console.activate_profile(&id).await {
                bail!("unknown profile: {}", id);
            }
            println!("Activated {}", id);
        }
    }
    Ok(())
}

async fn history_command(console: &DebugConsole, cmd: HistoryCommand) -> anyhow::Result<()> {
    let entries = match cmd {
        HistoryCommand::List { category } => {
            let state = console.state().lock().await;
            match category {
                Some(tag) => {
                    let intent: Intent = tag.parse()?;
                    state.history.get_by_category(intent)
                }
                None => state.history.entries().cloned().collect(),
            }
        }
        HistoryCommand::Search { keyword } => console.history_search(&keyword).await,
        HistoryCommand::Clear => {
            console.state().lock().await.history.clear();
            println!("History cleared");
            return Ok(());
        }
    };

    for entry in entries {
        let when = chrono::DateTime::from_timestamp_millis(entry.created_at as i64)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S");
        println!("{} [{}] {}", when, entry.category, entry.user_input);
    }
    Ok(())
}

async fn simulate_load_command(config: &AppConfig, console: &DebugConsole, ticks: u32) -> anyhow::Result<()> {
    console.simulate_high_load(ticks).await;
    let mut scheduler = Scheduler::with_defaults(config, clock::system_clock());
    for _ in 0..ticks {
        let mut state = console.state().lock().await;
        scheduler.tick_once(&mut state);
    }
    for alert in console.drain_alerts().await {
        println!("[{}] {}: {}", alert.severity, alert.title, alert.message);
    }
    Ok(())
}

fn series_command(args: SeriesArgs) -> anyhow::Result<()> {
    let kind = match args.kind.as_str() {
        "cpu" => MetricKind::Cpu,
        "ram" => MetricKind::Ram,
        "disk" => MetricKind::Disk,
        "network" => MetricKind::Network,
        other => bail!("unknown metric kind: {}", other),
    };
    let clock = clock::system_clock();
    let mut simulator = MetricSimulator::new(clock.clone());
    let series = simulator.generate_series(args.count, args.min, args.max, kind);
    let visible = metrics::filter_by_range_tag(&series, &args.range, clock.now_millis());
    println!("{}", serde_json::to_string_pretty(&visible)?);
    Ok(())
}

async fn snapshot_command(config: &AppConfig, console: &DebugConsole, format: &str) -> anyhow::Result<()> {
    let mut scheduler = Scheduler::with_defaults(config, clock::system_clock());
    let report = {
        let mut state = console.state().lock().await;
        scheduler.tick_once(&mut state)
    };
    let Some(snapshot) = report.snapshot else {
        bail!("no snapshot produced");
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "pretty" => print_pretty_snapshot(&snapshot),
        other => bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }
    Ok(())
}

fn print_pretty_snapshot(snapshot: &MetricSnapshot) {
    println!(
        "⚡ Arka Snapshot ({})",
        chrono::DateTime::from_timestamp_millis(snapshot.taken_at as i64)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!();

    println!("🖥️  CPU:");
    println!("  Usage: {:.1}%", snapshot.cpu.usage);
    println!("  Temperature: {:.1}°C", snapshot.cpu.temperature);
    println!("  Cores: {}", snapshot.cpu.cores);
    println!("  Frequency: {:.2} GHz", snapshot.cpu.frequency);
    println!();

    println!("🧠 Memory:");
    println!("  Usage: {:.1}%", snapshot.ram.usage);
    println!(
        "  Used: {:.1} GB of {:.1} GB ({:.1} GB cached)",
        snapshot.ram.used, snapshot.ram.total, snapshot.ram.cache
    );
    println!();

    println!("💾 Disk:");
    println!("  Usage: {:.1}%", snapshot.disk.usage);
    println!("  Free: {:.0} GB of {:.0} GB", snapshot.disk.free, snapshot.disk.total);
    println!();

    println!("🌐 Network:");
    println!(
        "  ↓ {:.1} Mbps  ↑ {:.1} Mbps",
        snapshot.network.down, snapshot.network.up
    );
    println!("  Connections: {}", snapshot.network.connections);
    println!("  Ping: {:.0} ms", snapshot.network.ping);
}
