mod config;
mod fleet;
mod geometry;
mod missions;
mod propagation;
mod reference;
mod store;
mod web;
mod zones;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::Config;
use crate::fleet::{compute_live_feature, FleetScheduler};
use crate::propagation::Sgp4Propagator;
use crate::reference::ReferenceData;
use crate::store::{MemoryStore, Store};
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "fleetmap")]
#[command(about = "Live positions and active missions of a MEO satellite fleet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the reference data and report what was found
    Validate {
        #[arg(long, default_value = "fleetmap.yaml")]
        config: String,
    },
    /// Propagate the fleet continuously and serve the API
    Run {
        #[arg(long, default_value = "fleetmap.yaml")]
        config: String,
    },
    /// Print the current live feature of one satellite
    Position {
        #[arg(long, default_value = "fleetmap.yaml")]
        config: String,
        satellite: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { config } => run(&config),
        Commands::Position { config, satellite } => position(&config, &satellite),
    }
}

fn read_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config {}: {}", path, e);
            None
        }
    }
}

fn load_reference(config: &Config, store: &dyn Store) -> Option<ReferenceData> {
    let plan = match config.fleet_plan() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            return None;
        }
    };

    match reference::load(&config.data.dir, &plan, store) {
        Ok(data) => Some(data),
        Err(e) => {
            log::error!("Reference data load failed: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = read_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(data) = load_reference(&config, &MemoryStore::new()) else {
        return ExitCode::FAILURE;
    };

    println!("Reference data is valid ({})", data.report);
    for warning in &data.report.warnings {
        println!("  warning: {}", warning);
    }
    ExitCode::SUCCESS
}

fn position(path: &str, satellite: &str) -> ExitCode {
    let Some(config) = read_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(data) = load_reference(&config, &MemoryStore::new()) else {
        return ExitCode::FAILURE;
    };

    let context = &data.context;
    let Some(elements) = context
        .satellites
        .iter()
        .find(|s| s.satellite_id == satellite)
    else {
        eprintln!("Unknown satellite: {}", satellite);
        return ExitCode::FAILURE;
    };

    let feature = match compute_live_feature(
        elements,
        chrono::Utc::now(),
        &Sgp4Propagator::new(),
        &context.zones,
        &context.missions,
    ) {
        Ok(feature) => feature,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&feature) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding feature: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> ExitCode {
    let Some(config) = read_config(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(serve(config))
}

async fn serve(config: Config) -> ExitCode {
    let store = config.store.open();
    let Some(data) = load_reference(&config, store.as_ref()) else {
        return ExitCode::FAILURE;
    };

    let mut scheduler = FleetScheduler::new(
        Arc::clone(&store),
        Arc::new(Sgp4Propagator::new()),
        Arc::new(data.context),
        config.scheduler.into(),
    );
    if let Err(e) = scheduler.start() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
        log::info!("Shutting down");
    };

    let result = if config.web.enabled {
        let state = AppState {
            store,
            scheduler: scheduler.status_handle(),
        };
        web::run_server(&config.web.bind, state, shutdown).await
    } else {
        shutdown.await;
        Ok(())
    };

    scheduler.stop().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
