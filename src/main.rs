use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use netpulse::app;
use netpulse::collectors;
use netpulse::config::Config;
use netpulse::controller::{Sampler, SnapshotPublisher};
use netpulse::error::MonitorError;
use netpulse::logging;

#[derive(Parser, Debug)]
#[command(name = "netpulse", version, about = "Live network bandwidth, packets and top talkers")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between samples.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Points of history kept per series.
    #[arg(long)]
    capacity: Option<usize>,

    /// Number of applications in the ranking.
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Milliseconds between screen refreshes.
    #[arg(long, default_value_t = 250)]
    refresh_ms: u64,

    /// Print one JSON line per snapshot instead of drawing the dashboard.
    #[arg(long)]
    headless: bool,

    /// Directory for netpulse.log in dashboard mode (default: system temp dir).
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<Config, MonitorError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(interval) = self.interval {
            config.sample_interval_secs = interval;
        }
        if let Some(capacity) = self.capacity {
            config.buffer_capacity = capacity;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = if cli.headless {
        logging::init_stderr();
        None
    } else {
        let dir = cli.log_dir.clone().unwrap_or_else(std::env::temp_dir);
        Some(logging::init_file(&dir))
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "netpulse exiting");
            eprintln!("netpulse: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config()?;

    let should_quit = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&should_quit))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&should_quit))?;

    let source = collectors::default_source()?;
    info!(source = source.name(), ?config, "starting");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()?;

    let sampler = Sampler::new(Arc::from(source), &config, SnapshotPublisher::new())?;
    let handle = sampler.start(rt.handle());

    let refresh = Duration::from_millis(cli.refresh_ms.max(10));
    let result = if cli.headless {
        app::run_headless(&handle.publisher(), refresh, should_quit, &mut std::io::stdout().lock())
    } else {
        app::run(&handle, refresh, should_quit)
    };

    // Let any in-flight tick finish before the runtime goes away.
    handle.stop();
    rt.block_on(handle.join());
    result?;
    Ok(())
}
