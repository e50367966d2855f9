// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! PlantWatch - headless runner for the plant safety monitoring core
//!
//! Runs the simulation engine, injects requested scenarios, logs every store
//! change and optionally prints the final snapshot as JSON.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use plantwatch::core::{Engine, StoreEvent};
use plantwatch::guide::{self, ChatTurn};
use plantwatch::{Config, VERSION};

/// PlantWatch - power-plant safety monitoring core
#[derive(Parser, Debug)]
#[command(name = "plantwatch")]
#[command(version = VERSION)]
#[command(about = "Simulation and alerting engine for a power-plant safety dashboard")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Scenario to inject at startup (repeatable)
    #[arg(long = "scenario")]
    scenarios: Vec<String>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    duration: Option<u64>,

    /// Start with the simulation stopped
    #[arg(long)]
    no_simulation: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Ask the AI guide a question and exit
    #[arg(long)]
    ask: Option<String>,
}

fn log_level(args: &Args, config: &Config) -> Level {
    if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&args, &config))
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("PlantWatch v{} - plant safety monitoring core", VERSION);
    info!("Configuration loaded from {:?}", config_path);

    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(speed) = args.speed {
        config.simulation.speed = speed;
    }
    if args.no_simulation {
        config.simulation.enabled_on_start = false;
    }

    let rt = tokio::runtime::Runtime::new()?;

    if let Some(question) = args.ask.as_deref() {
        let guide = guide::from_config(&config.guide);
        let answer = rt.block_on(guide::ask_with_fallback(guide.as_ref(), &[ChatTurn::user(question)]));
        println!("{answer}");
        return Ok(());
    }

    rt.block_on(run_headless(config, args))
}

async fn run_headless(config: Config, args: Args) -> Result<()> {
    let mut engine = Engine::new(config)?;
    let mut events = engine.subscribe();

    engine.start();

    for scenario in &args.scenarios {
        if engine.trigger_scenario(scenario).is_none() {
            warn!("Unknown scenario '{}' (known: {})", scenario, engine.catalog().ids().collect::<Vec<_>>().join(", "));
        }
    }

    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event.payload),
                Err(RecvError::Lagged(n)) => warn!("Event log lagged, {} events dropped", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    info!("PlantWatch running, press Ctrl+C to shutdown");

    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    info!("Shutdown signal received after {}s, cleaning up...", engine.uptime());
    engine.stop().await;
    logger.abort();

    let snapshot = engine.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        info!(
            "Final state: {} alerts ({} pending, {} resolved), {} detections, {} critical active",
            snapshot.alerts.len(),
            snapshot.kpi.pending_alerts,
            snapshot.kpi.resolved_alerts,
            snapshot.detections.len(),
            snapshot.active_critical_alerts().count()
        );
    }

    info!("PlantWatch shutdown complete");
    Ok(())
}

fn log_event(event: &StoreEvent) {
    match event {
        StoreEvent::SensorUpdated { sensor_id, value, status } => {
            tracing::trace!("{} = {} ({:?})", sensor_id, value, status)
        }
        StoreEvent::AlertRaised { alert_id, severity, zone } => {
            info!("🚨 {:?} alert {} in {}", severity, alert_id, zone)
        }
        StoreEvent::ScenarioTriggered { scenario, alert_id } => {
            info!("Scenario {} raised {}", scenario, alert_id)
        }
        other => tracing::debug!("{:?}", other),
    }
}
