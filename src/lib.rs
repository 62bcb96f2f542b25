//! # JUBBLUTION
//!
//! Real-time simulation of "jubbles": circular creatures that wander a
//! bounded arena, spot each other inside a forward viewing cone, chase
//! younger rivals, grow with age and fight when they touch.
//!
//! The crate is the simulation core only. A renderer drives it by calling
//! [`World::step`] once per frame, forwards clicks through
//! [`World::set_coordinate_goal`], and draws [`World::views`].
//!
//! ## Quick Start
//!
//! ```rust
//! use jubblution::{Config, World};
//!
//! let mut world = World::new_with_seed(Config::default(), 42);
//! world.run(100);
//!
//! // Redirect everyone toward the middle of the arena
//! world.set_coordinate_goal(320.0, 240.0);
//! world.step();
//!
//! for view in world.views() {
//!     println!("{:?} at {:?} r={:.1}", view.id, view.position, view.radius);
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use jubblution::Config;
//! use jubblution::config::WinPolicy;
//!
//! let mut config = Config::default();
//! config.population.min_population = 25;
//! config.combat.win_policy = WinPolicy::AgeOnly;
//! assert!(config.validate().is_ok());
//! ```

pub mod arena;
pub mod config;
pub mod geometry;
pub mod jubble;
pub mod population;
pub mod resolver;
pub mod stats;
pub mod world;

// Re-export main types
pub use arena::Arena;
pub use config::Config;
pub use jubble::{Jubble, JubbleId, JubbleView};
pub use resolver::Event;
pub use world::{TickReport, World};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick headless benchmark
pub fn benchmark(ticks: u64, min_population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.population.initial_population = min_population;
    config.population.min_population = min_population;

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(ticks);
    let elapsed = start.elapsed();

    BenchmarkResult {
        ticks,
        min_population,
        final_live: world.population(),
        final_dead: world.dead_count(),
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub min_population: usize,
    pub final_live: usize,
    pub final_dead: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Population floor: {}", self.min_population)?;
        writeln!(f, "Final: {} live, {} dead", self.final_live, self.final_dead)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut world = World::new(Config::default());
        world.run(100);
        assert!(world.time == 100);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(100, 20);

        assert_eq!(result.ticks, 100);
        assert!(result.ticks_per_second > 0.0);
        assert!(result.final_live + result.final_dead >= 20);
    }
}
