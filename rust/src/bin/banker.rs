//! Console driver: load a configuration file and run the simulation to completion.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use banker_rust::{load_config, render_snapshot, Allocator, Simulation, SimulationConfig};

/// Banker's algorithm resource allocation simulator.
#[derive(Debug, Parser)]
#[command(name = "banker")]
#[command(about = "Simulate resource requests under the Banker's deadlock-avoidance algorithm")]
struct Cli {
    /// Configuration file (resource count, available, process count, max rows).
    config: PathBuf,
    /// Seed for the request generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Chance (0-100) that a process asks for a needed resource on its turn.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    request_percent: Option<u32>,
    /// Upper bound of the simulated pause before each turn, in seconds.
    #[arg(long)]
    max_wait_secs: Option<u32>,
    /// Give up after this many rounds (0 = never).
    #[arg(long, default_value_t = 10_000)]
    max_rounds: u64,
    /// Logging level on stderr: 0=silent, 1=decisions, 2=checks, 3=debug.
    #[arg(long, short, default_value_t = 0)]
    verbosity: u8,
    /// Only print the final result.
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn simulation_config(&self) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            request_percent: self.request_percent.unwrap_or(defaults.request_percent),
            max_wait_secs: self.max_wait_secs.unwrap_or(defaults.max_wait_secs),
            seed: self.seed.unwrap_or(defaults.seed),
            verbosity: self.verbosity,
            max_rounds: (self.max_rounds > 0).then_some(self.max_rounds),
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    let allocator = Allocator::new(&config)?;

    if !cli.quiet {
        println!("Initialized...");
        println!("{}", render_snapshot(&allocator.snapshot()));
    }

    let report = Simulation::new(allocator, cli.simulation_config()).run()?;

    if !cli.quiet {
        for event in &report.events {
            println!("{}", event);
        }
    }
    println!("\n = Success! =");
    println!("All processes finished without deadlock.");
    println!(
        "{} rounds, {}s simulated, {} granted, {} denied",
        report.rounds,
        report.elapsed.num_seconds(),
        report.grants,
        report.denials()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
