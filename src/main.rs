//! JUBBLUTION - CLI Entry Point
//!
//! Headless launcher for the jubble simulation.

use clap::{Parser, Subcommand};
use jubblution::{benchmark, Config, Event, World};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "jubblution")]
#[command(version)]
#[command(about = "Jubble simulation: wandering, chasing and fighting circular creatures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10000")]
        ticks: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Send every jubble toward X,Y before the first tick
        #[arg(long, value_parser = parse_point)]
        goal: Option<(f64, f64)>,

        /// Write the stats history (JSON) here when done
        #[arg(long)]
        history: Option<PathBuf>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Population floor
        #[arg(short, long, default_value = "200")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            goal,
            history,
            quiet,
        } => run_simulation(config, ticks, seed, goal, history, quiet),

        Commands::Benchmark { ticks, population } => {
            init_logging("info");
            run_benchmark(ticks, population)
        }

        Commands::Init { output } => generate_config(output),
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_simulation(
    config_path: PathBuf,
    ticks: u64,
    seed: Option<u64>,
    goal: Option<(f64, f64)>,
    history: Option<PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    init_logging(&config.logging.log_level);

    if config_path.exists() {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("Using default configuration");
    }

    let mut world = match seed {
        Some(s) => World::new_with_seed(config.clone(), s),
        None => World::new(config.clone()),
    };
    log::info!("Seed: {}", world.seed());

    if let Some((x, y)) = goal {
        let accepted = world.set_coordinate_goal(x, y);
        if accepted == 0 {
            log::warn!("Goal ({}, {}) is outside the arena and was ignored", x, y);
        }
    }

    println!("Starting simulation");
    println!("  Arena: {}x{}", config.arena.width, config.arena.height);
    println!("  Initial population: {}", world.population());
    println!("  Population floor: {}", config.population.min_population);
    println!("  Ticks: {}", ticks);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for _ in 0..ticks {
        let report = world.step();

        if !quiet {
            for event in &report.events {
                if let Event::Killed { winner, loser } = event {
                    log::info!("T:{} jubble {} killed {}", report.time, winner, loser);
                }
            }
            if report.time % stats_interval.max(1) == 0 {
                println!("{}", world.stats.summary());
            }
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", world.time);
    println!("Speed: {:.1} ticks/s", world.time as f64 / elapsed.as_secs_f64());
    println!("Live: {}", world.population());
    println!("Dead: {}", world.dead_count());
    println!("Kills: {}", world.stats.total_kills);

    let busiest = world
        .stats_history
        .kill_series()
        .windows(2)
        .map(|w| (w[1].0, w[1].1 - w[0].1))
        .max_by_key(|&(_, kills)| kills);
    if let Some((time, kills)) = busiest.filter(|&(_, kills)| kills > 0) {
        println!("Busiest interval: {} kills ending at tick {}", kills, time);
    }

    if let Some(path) = history {
        world.stats_history.save(&path.to_string_lossy())?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}

fn run_benchmark(ticks: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== JUBBLUTION Benchmark ===");
    println!("Ticks: {}", ticks);
    println!("Population floor: {}", population);
    println!();

    let result = benchmark(ticks, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("320,240"), Ok((320.0, 240.0)));
        assert_eq!(parse_point(" 1.5 , 2 "), Ok((1.5, 2.0)));
        assert!(parse_point("320").is_err());
        assert!(parse_point("a,b").is_err());
    }
}
