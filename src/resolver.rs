//! Pairwise interaction resolver: detection, goal assignment and combat.
//!
//! Runs once per tick after every jubble has moved. Pairs are visited in
//! ascending index order so a seeded run is reproducible.

use crate::arena::Arena;
use crate::config::{JubbleConfig, WinPolicy};
use crate::jubble::{DeathCause, Jubble, JubbleId};
use serde::{Deserialize, Serialize};

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// `pursuer` started chasing `target`
    Engaged { pursuer: JubbleId, target: JubbleId },
    /// `winner` killed `loser` in combat
    Killed { winner: JubbleId, loser: JubbleId },
    /// A jubble reached the death age
    DiedOfAge(JubbleId),
    /// The population controller added a jubble
    Spawned(JubbleId),
}

/// Outcome of a collision between a pursuer and its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    PursuerWins,
    /// The pursuer does not qualify as a winner; both survive
    Standoff,
}

/// Decide a fight. Only the pursuer can win; the target strikes back only
/// through its own pursuit of the pursuer.
pub fn combat_outcome(pursuer: &Jubble, target: &Jubble, policy: WinPolicy) -> CombatOutcome {
    if pursuer.will_win_against(target, policy) {
        CombatOutcome::PursuerWins
    } else {
        CombatOutcome::Standoff
    }
}

/// Resolves interactions between all living jubbles
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    pub policy: WinPolicy,
}

impl Resolver {
    pub fn new(policy: WinPolicy) -> Self {
        Self { policy }
    }

    /// Run one resolution pass, appending what happened to `events`
    pub fn resolve(
        &self,
        jubbles: &mut [Jubble],
        arena: &Arena,
        config: &JubbleConfig,
        events: &mut Vec<Event>,
    ) {
        self.refresh_pursuits(jubbles, arena);

        for i in 0..jubbles.len() {
            if !jubbles[i].is_alive() {
                continue;
            }

            if jubbles[i].pursuit_goal().is_none() {
                if let Some(j) = self.find_opponent(jubbles, i) {
                    let sighting = jubbles[j].sighting();
                    let pursuer = &mut jubbles[i];
                    pursuer.set_pursuit_goal(JubbleId(j));
                    pursuer.track_pursuit(Some(sighting), arena);
                    log::debug!("jubble #{} engages #{}", i, j);
                    events.push(Event::Engaged {
                        pursuer: JubbleId(i),
                        target: JubbleId(j),
                    });
                }
            }

            if let Some(event) = self.fight(jubbles, i, config) {
                events.push(event);
            }
        }
    }

    /// Point every pursuer's coordinate goal at where its target is now
    fn refresh_pursuits(&self, jubbles: &mut [Jubble], arena: &Arena) {
        for i in 0..jubbles.len() {
            let Some(target) = jubbles[i].pursuit_goal() else {
                continue;
            };
            let sighting = jubbles.get(target.0).map(Jubble::sighting);
            jubbles[i].track_pursuit(sighting, arena);
        }
    }

    /// First living jubble (by index) that `i` sees and is willing to fight
    fn find_opponent(&self, jubbles: &[Jubble], i: usize) -> Option<usize> {
        let me = &jubbles[i];
        jubbles
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .find(|(_, other)| {
                other.is_alive() && me.can_detect_jubble(other) && me.will_fight(other)
            })
            .map(|(j, _)| j)
    }

    /// Resolve combat between `i` and its pursuit target if their bodies touch
    fn fight(&self, jubbles: &mut [Jubble], i: usize, config: &JubbleConfig) -> Option<Event> {
        let target = jubbles[i].pursuit_goal()?;
        let j = target.0;
        if j == i || j >= jubbles.len() {
            return None;
        }

        let (pursuer, prey) = (&jubbles[i], &jubbles[j]);
        if !pursuer.colliding_with(prey, config) {
            return None;
        }

        if combat_outcome(pursuer, prey, self.policy) == CombatOutcome::Standoff {
            return None;
        }
        let (winner, loser) = (i, j);

        // Killing is idempotent; only a real transition is reported.
        if jubbles[loser].kill(DeathCause::Combat, config.death_color) {
            log::debug!(
                "jubble #{} (age {}) kills #{} (age {})",
                winner,
                jubbles[winner].age(),
                loser,
                jubbles[loser].age()
            );
            Some(Event::Killed {
                winner: JubbleId(winner),
                loser: JubbleId(loser),
            })
        } else {
            None
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(WinPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ANGLE_LEFT, ANGLE_RIGHT};

    fn config() -> JubbleConfig {
        JubbleConfig {
            turn_chance: 0.0,
            ..JubbleConfig::default()
        }
    }

    fn jubble(id: usize, x: f64, y: f64, heading: f64, age: u64) -> Jubble {
        Jubble::new(JubbleId(id), (x, y), (0, 0, 0), &config())
            .with_heading(heading)
            .with_age(age)
    }

    fn resolve(jubbles: &mut [Jubble], policy: WinPolicy) -> Vec<Event> {
        let mut events = Vec::new();
        Resolver::new(policy).resolve(jubbles, &Arena::default(), &config(), &mut events);
        events
    }

    #[test]
    fn test_older_jubble_engages_visible_younger() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 20),
            jubble(1, 200.0, 100.0, ANGLE_RIGHT, 10),
        ];

        let events = resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert_eq!(jubbles[0].pursuit_goal(), Some(JubbleId(1)));
        assert_eq!(jubbles[0].coord_goal(), Some((200.0, 100.0)));
        // The younger one faces away and would not fight anyway
        assert!(jubbles[1].pursuit_goal().is_none());
        assert_eq!(
            events,
            vec![Event::Engaged {
                pursuer: JubbleId(0),
                target: JubbleId(1)
            }]
        );
    }

    #[test]
    fn test_equal_ages_give_mutual_pursuit() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 5),
            jubble(1, 200.0, 100.0, ANGLE_LEFT, 5),
        ];

        resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert_eq!(jubbles[0].pursuit_goal(), Some(JubbleId(1)));
        assert_eq!(jubbles[1].pursuit_goal(), Some(JubbleId(0)));
    }

    #[test]
    fn test_existing_pursuit_not_replaced() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 20),
            jubble(1, 200.0, 100.0, ANGLE_RIGHT, 10),
            jubble(2, 150.0, 100.0, ANGLE_RIGHT, 10),
        ];
        jubbles[0].set_pursuit_goal(JubbleId(1));

        resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert_eq!(jubbles[0].pursuit_goal(), Some(JubbleId(1)));
    }

    #[test]
    fn test_collision_kills_younger_target() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 20),
            jubble(1, 108.0, 100.0, ANGLE_RIGHT, 10),
        ];

        let events = resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert!(jubbles[0].is_alive());
        assert!(!jubbles[1].is_alive());
        assert_eq!(jubbles[0].age(), 20);
        assert!(events.contains(&Event::Killed {
            winner: JubbleId(0),
            loser: JubbleId(1)
        }));
    }

    #[test]
    fn test_mutual_pursuit_kills_exactly_once() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 30),
            jubble(1, 105.0, 100.0, ANGLE_LEFT, 30),
        ];

        let events = resolve(&mut jubbles, WinPolicy::DetectionGated);
        let kills = events
            .iter()
            .filter(|e| matches!(e, Event::Killed { .. }))
            .count();

        assert_eq!(kills, 1);
        assert_eq!(jubbles.iter().filter(|j| j.is_alive()).count(), 1);
        // Lower index resolves first
        assert!(jubbles[0].is_alive());
    }

    #[test]
    fn test_detection_gate_prevents_accidental_kill() {
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 30),
            jubble(1, 106.0, 100.0, ANGLE_RIGHT, 10),
        ];
        // Pursuing, but facing away at the moment of contact
        jubbles[0].set_pursuit_goal(JubbleId(1));
        jubbles[0] = jubbles[0].clone().with_heading(ANGLE_LEFT);

        let mut gated = jubbles.clone();
        resolve(&mut gated, WinPolicy::DetectionGated);
        assert!(gated[1].is_alive());

        let mut age_only = jubbles;
        resolve(&mut age_only, WinPolicy::AgeOnly);
        assert!(!age_only[1].is_alive());
    }

    #[test]
    fn test_dead_jubbles_do_not_interact() {
        let cfg = config();
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 30),
            jubble(1, 105.0, 100.0, ANGLE_LEFT, 10),
        ];
        jubbles[1].kill(DeathCause::Combat, cfg.death_color);

        let events = resolve(&mut jubbles, WinPolicy::AgeOnly);

        assert!(events.is_empty());
        assert!(jubbles[0].pursuit_goal().is_none());
        assert!(jubbles[0].is_alive());
    }

    #[test]
    fn test_stale_pursuit_released() {
        let cfg = config();
        let mut jubbles = vec![
            jubble(0, 100.0, 100.0, ANGLE_RIGHT, 30),
            jubble(1, 200.0, 100.0, ANGLE_LEFT, 10),
            jubble(2, 150.0, 110.0, ANGLE_LEFT, 10),
        ];
        jubbles[0].set_pursuit_goal(JubbleId(1));
        jubbles[1].kill(DeathCause::Combat, cfg.death_color);

        resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert_eq!(jubbles[0].pursuit_goal(), Some(JubbleId(2)));
    }

    #[test]
    fn test_combat_outcome() {
        let old = jubble(0, 100.0, 100.0, ANGLE_RIGHT, 30);
        let young = jubble(1, 105.0, 100.0, ANGLE_RIGHT, 10);

        assert_eq!(
            combat_outcome(&old, &young, WinPolicy::DetectionGated),
            CombatOutcome::PursuerWins
        );
        // Young one pursuing an older one: the older one never wins from
        // the target side, even though it sees the young one
        assert_eq!(
            combat_outcome(&young, &old, WinPolicy::DetectionGated),
            CombatOutcome::Standoff
        );
        assert_eq!(
            combat_outcome(&young, &old, WinPolicy::AgeOnly),
            CombatOutcome::Standoff
        );
    }

    #[test]
    fn test_target_busy_elsewhere_does_not_kill_pursuer() {
        let mut jubbles = vec![
            // Pursues 1, which sits right behind it
            jubble(0, 100.0, 100.0, ANGLE_LEFT, 50),
            // Sees 0 ahead and could beat it, but is chasing 2
            jubble(1, 106.0, 100.0, ANGLE_LEFT, 50),
            jubble(2, 60.0, 100.0, ANGLE_LEFT, 10),
        ];
        jubbles[0].set_pursuit_goal(JubbleId(1));
        jubbles[1].set_pursuit_goal(JubbleId(2));

        let events = resolve(&mut jubbles, WinPolicy::DetectionGated);

        assert!(events.is_empty());
        assert!(jubbles.iter().all(|j| j.is_alive()));
        assert_eq!(jubbles[0].pursuit_goal(), Some(JubbleId(1)));
        assert_eq!(jubbles[1].pursuit_goal(), Some(JubbleId(2)));
    }
}
