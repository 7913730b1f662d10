// simulation_main.rs
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use traffic_synch::control_system::PolicyKind;
use traffic_synch::simulation_engine::config::SimulationConfig;
use traffic_synch::simulation_engine::simulation::{run_simulation, SimulationError};

#[derive(Parser)]
#[command(
    name = "simulation_main",
    version,
    about = "Drive concurrent vehicles through a four-way intersection"
)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of concurrent vehicle threads
    #[arg(long)]
    threads: Option<usize>,

    /// Trips per vehicle thread
    #[arg(long)]
    trips: Option<usize>,

    /// Admission policy
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Base RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write one CSV row per trip to this file
    #[arg(long)]
    trip_log: Option<PathBuf>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn into_config(self) -> Result<(SimulationConfig, bool), SimulationError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.vehicle_threads = threads;
        }
        if let Some(trips) = self.trips {
            config.trips_per_thread = trips;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.trip_log.is_some() {
            config.trip_log = self.trip_log;
        }
        Ok((config, self.json))
    }
}

fn run(cli: Cli) -> Result<bool, SimulationError> {
    let (config, json) = cli.into_config()?;
    let report = run_simulation(&config)?;
    if json {
        println!("{}", report.to_json()?);
    } else {
        report.print_summary();
    }
    Ok(report.is_clean())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("Simulation finished with collisions or vehicles left inside");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Simulation error: {}", e);
            ExitCode::FAILURE
        }
    }
}
