//! Statistics tracking for the simulation.

use crate::jubble::Jubble;
use crate::resolver::Event;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation tick
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation time
    pub time: u64,
    /// Living jubbles
    pub live: usize,
    /// Dead jubbles still in the arena
    pub dead: usize,
    /// Spawns this tick
    pub spawned: usize,
    /// Combat deaths this tick
    pub kills: usize,
    /// Old-age deaths this tick
    pub natural_deaths: usize,
    /// Combat deaths since the start
    pub total_kills: u64,
    /// Mean age of living jubbles
    pub age_mean: f64,
    /// Oldest living jubble
    pub age_max: u64,
    /// Living jubbles currently chasing another
    pub pursuits: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from the population and this tick's events
    pub fn update(&mut self, jubbles: &[Jubble], events: &[Event]) {
        self.spawned = 0;
        self.kills = 0;
        self.natural_deaths = 0;
        for event in events {
            match event {
                Event::Spawned(_) => self.spawned += 1,
                Event::Killed { .. } => self.kills += 1,
                Event::DiedOfAge(_) => self.natural_deaths += 1,
                Event::Engaged { .. } => {}
            }
        }
        self.total_kills += self.kills as u64;

        let alive: Vec<&Jubble> = jubbles.iter().filter(|j| j.is_alive()).collect();
        self.live = alive.len();
        self.dead = jubbles.len() - alive.len();

        if alive.is_empty() {
            self.age_mean = 0.0;
            self.age_max = 0;
            self.pursuits = 0;
        } else {
            self.age_mean = alive.iter().map(|j| j.age() as f64).sum::<f64>() / alive.len() as f64;
            self.age_max = alive.iter().map(|j| j.age()).max().unwrap_or(0);
            self.pursuits = alive.iter().filter(|j| j.pursuit_goal().is_some()).count();
        }
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Live:{:4} | Dead:{:4} | Kills:{:4} | Age:{:.0} (max {}) | Chasing:{}",
            self.time,
            self.live,
            self.dead,
            self.total_kills,
            self.age_mean,
            self.age_max,
            self.pursuits
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Living population over time
    pub fn live_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.live)).collect()
    }

    /// Cumulative kills over time
    pub fn kill_series(&self) -> Vec<(u64, u64)> {
        self.snapshots.iter().map(|s| (s.time, s.total_kills)).collect()
    }

    /// Save history to a JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
