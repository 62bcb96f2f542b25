//! Population floor maintenance.

use crate::arena::Arena;
use crate::config::{JubbleConfig, PopulationConfig};
use crate::jubble::{Jubble, JubbleId};
use rand::Rng;

/// Keeps at least `min_population` jubbles alive by spawning one per tick
#[derive(Debug, Clone, Copy)]
pub struct PopulationController {
    pub min_population: usize,
    /// Spawning only happens while `tick < warmup_ticks`
    pub warmup_ticks: Option<u64>,
}

impl PopulationController {
    pub fn new(min_population: usize, warmup_ticks: Option<u64>) -> Self {
        Self {
            min_population,
            warmup_ticks,
        }
    }

    pub fn from_config(config: &PopulationConfig) -> Self {
        Self::new(config.min_population, config.warmup_ticks)
    }

    /// Number of living jubbles; the dead do not count toward the floor
    pub fn live_count(jubbles: &[Jubble]) -> usize {
        jubbles.iter().filter(|j| j.is_alive()).count()
    }

    /// Whether a spawn is due at `tick`
    pub fn should_spawn(&self, tick: u64, live: usize) -> bool {
        let warming_up = self.warmup_ticks.map_or(true, |limit| tick < limit);
        warming_up && live < self.min_population
    }

    /// Spawn at most one jubble if the floor is not met.
    ///
    /// Existing jubbles are never touched.
    pub fn maintain<R: Rng + ?Sized>(
        &self,
        tick: u64,
        jubbles: &mut Vec<Jubble>,
        arena: &Arena,
        config: &JubbleConfig,
        rng: &mut R,
    ) -> Option<JubbleId> {
        if !self.should_spawn(tick, Self::live_count(jubbles)) {
            return None;
        }

        let id = JubbleId(jubbles.len());
        jubbles.push(Jubble::spawn(id, arena, config, rng));
        log::debug!("spawned jubble {} at tick {}", id, tick);
        Some(id)
    }
}

impl Default for PopulationController {
    fn default() -> Self {
        Self::from_config(&PopulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jubble::DeathCause;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawns_one_per_call_until_floor() {
        let controller = PopulationController::new(3, None);
        let arena = Arena::default();
        let config = JubbleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut jubbles = Vec::new();

        for tick in 0..10 {
            controller.maintain(tick, &mut jubbles, &arena, &config, &mut rng);
            assert!(jubbles.len() <= tick as usize + 1);
        }

        assert_eq!(jubbles.len(), 3);
        for (i, j) in jubbles.iter().enumerate() {
            assert_eq!(j.id(), JubbleId(i));
            assert!(arena.accepts_goal(j.position()));
        }
    }

    #[test]
    fn test_dead_do_not_count() {
        let controller = PopulationController::new(2, None);
        let arena = Arena::default();
        let config = JubbleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut jubbles = vec![
            Jubble::spawn(JubbleId(0), &arena, &config, &mut rng),
            Jubble::spawn(JubbleId(1), &arena, &config, &mut rng),
        ];
        jubbles[0].kill(DeathCause::Combat, config.death_color);
        let corpse = jubbles[0].position();

        let spawned = controller.maintain(0, &mut jubbles, &arena, &config, &mut rng);

        assert_eq!(spawned, Some(JubbleId(2)));
        assert_eq!(jubbles.len(), 3);
        assert_eq!(jubbles[0].position(), corpse);
        assert!(!jubbles[0].is_alive());
    }

    #[test]
    fn test_warmup_limit() {
        let controller = PopulationController::new(10, Some(2));

        assert!(controller.should_spawn(0, 0));
        assert!(controller.should_spawn(1, 5));
        assert!(!controller.should_spawn(2, 0));
        assert!(!controller.should_spawn(0, 10));
    }
}
