//! World simulation engine - main simulation loop.

use crate::arena::Arena;
use crate::config::Config;
use crate::geometry::Point;
use crate::jubble::{Jubble, JubbleId, JubbleView, Sighting};
use crate::population::PopulationController;
use crate::resolver::{Event, Resolver};
use crate::stats::{Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick number that was just completed (1-based)
    pub time: u64,
    pub events: Vec<Event>,
}

/// The simulation world
pub struct World {
    // Population; dead jubbles stay in place
    jubbles: Vec<Jubble>,

    // Environment
    pub arena: Arena,

    // State
    pub time: u64,

    // Configuration
    pub config: Config,

    // Policies
    resolver: Resolver,
    population: PopulationController,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let arena = Arena::from_config(&config.arena);

        let jubbles = (0..config.population.initial_population)
            .map(|i| Jubble::spawn(JubbleId(i), &arena, &config.jubble, &mut rng))
            .collect();

        Self {
            jubbles,
            arena,
            time: 0,
            resolver: Resolver::new(config.combat.win_policy),
            population: PopulationController::from_config(&config.population),
            stats: Stats::new(),
            stats_history: StatsHistory::new(config.logging.stats_interval),
            config,
            rng,
            seed,
        }
    }

    /// Add a jubble built by the caller. Its id is reassigned to its index.
    pub fn add_jubble(&mut self, jubble: Jubble) -> JubbleId {
        let id = JubbleId(self.jubbles.len());
        self.jubbles.push(jubble.with_id(id));
        id
    }

    /// Main simulation step: move everyone, resolve interactions, refill
    pub fn step(&mut self) -> TickReport {
        let mut events = Vec::new();

        // Phase 1: individual updates, in index order
        self.update_jubbles(&mut events);

        // Phase 2: detection, goal assignment and combat
        self.resolver.resolve(
            &mut self.jubbles,
            &self.arena,
            &self.config.jubble,
            &mut events,
        );

        // Phase 3: population floor
        if let Some(id) = self.population.maintain(
            self.time,
            &mut self.jubbles,
            &self.arena,
            &self.config.jubble,
            &mut self.rng,
        ) {
            events.push(Event::Spawned(id));
        }

        self.time += 1;

        // Phase 4: statistics
        self.update_stats(&events);

        TickReport {
            time: self.time,
            events,
        }
    }

    /// Update all jubbles (goal following, movement, aging)
    ///
    /// Pursuit targets are read from the start-of-tick state, so no jubble's
    /// movement depends on its index.
    fn update_jubbles(&mut self, events: &mut Vec<Event>) {
        let sightings: Vec<Sighting> = self.jubbles.iter().map(Jubble::sighting).collect();

        for i in 0..self.jubbles.len() {
            let target = self.jubbles[i]
                .pursuit_goal()
                .and_then(|t| sightings.get(t.0).copied());

            let died = self.jubbles[i].update(target, &self.arena, &self.config.jubble, &mut self.rng);
            if died {
                log::debug!("jubble #{} died of old age", i);
                events.push(Event::DiedOfAge(JubbleId(i)));
            }
        }
    }

    /// Update statistics
    fn update_stats(&mut self, events: &[Event]) {
        self.stats.time = self.time;
        self.stats.update(&self.jubbles, events);

        // An unvalidated config may carry a zero interval
        let interval = self.config.logging.stats_interval.max(1);
        if self.time % interval == 0 {
            self.stats_history.record(self.stats.clone());
        }
    }

    /// Run simulation for specified number of ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run simulation with callback for progress updates
    pub fn run_with_callback<F>(&mut self, ticks: u64, mut callback: F)
    where
        F: FnMut(&World, &TickReport),
    {
        for _ in 0..ticks {
            let report = self.step();
            callback(self, &report);
        }
    }

    /// Redirect every living jubble toward a point (a click).
    ///
    /// Out-of-bounds points are ignored. Returns how many jubbles took the goal.
    pub fn set_coordinate_goal(&mut self, x: f64, y: f64) -> usize {
        let arena = self.arena;
        self.jubbles
            .iter_mut()
            .filter(|j| j.is_alive())
            .map(|j| j.set_coordinate_goal((x, y), &arena))
            .filter(|&accepted| accepted)
            .count()
    }

    /// Redirect a single jubble toward a point
    pub fn set_coordinate_goal_for(&mut self, id: JubbleId, x: f64, y: f64) -> bool {
        let arena = self.arena;
        self.jubbles
            .get_mut(id.0)
            .map_or(false, |j| j.set_coordinate_goal((x, y), &arena))
    }

    /// All jubbles, living and dead
    pub fn jubbles(&self) -> &[Jubble] {
        &self.jubbles
    }

    pub fn jubble(&self, id: JubbleId) -> Option<&Jubble> {
        self.jubbles.get(id.0)
    }

    /// Drawable state of one jubble
    pub fn view(&self, id: JubbleId) -> Option<JubbleView> {
        self.jubble(id)
            .map(|j| j.view(self.pursuit_target_position(j), &self.config.jubble))
    }

    /// Drawable state of every jubble, in index order
    pub fn views(&self) -> Vec<JubbleView> {
        self.jubbles
            .iter()
            .map(|j| j.view(self.pursuit_target_position(j), &self.config.jubble))
            .collect()
    }

    fn pursuit_target_position(&self, jubble: &Jubble) -> Option<Point> {
        jubble
            .pursuit_goal()
            .and_then(|t| self.jubbles.get(t.0))
            .map(Jubble::position)
    }

    /// Get current living population
    pub fn population(&self) -> usize {
        PopulationController::live_count(&self.jubbles)
    }

    /// Number of dead jubbles still in the arena
    pub fn dead_count(&self) -> usize {
        self.jubbles.len() - self.population()
    }

    /// Check if population is extinct
    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
