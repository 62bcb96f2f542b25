//! Jubble structure and behavior.

use crate::arena::Arena;
use crate::config::{JubbleConfig, Rgb, WinPolicy};
use crate::geometry::{angle_between, angle_diff, circles_touching, dist, to_cartesian, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Length of the drawn heading "nose" relative to the body radius
pub const NOSE_TO_BODY: f64 = 1.4;

/// Stable handle of a jubble: its index in the world's population.
///
/// Jubbles are never removed, so an id stays valid for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JubbleId(pub usize);

impl std::fmt::Display for JubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cause of death tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Combat,
    OldAge,
}

/// What a pursuer can learn about its target before moving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub position: Point,
    pub alive: bool,
}

/// A jubble in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jubble {
    id: JubbleId,

    // Kinematics
    position: Point,
    heading: f64,
    speed: f64,

    // Life cycle
    age: u64,
    alive: bool,
    cause_of_death: Option<DeathCause>,

    // Perception envelope
    detection_radius: f64,
    detection_half_angle: f64,

    color: Rgb,

    // Goals
    coord_goal: Option<Point>,
    pursuit_goal: Option<JubbleId>,
}

impl Jubble {
    /// Create a newborn jubble with default kinematics
    pub fn new(id: JubbleId, position: Point, color: Rgb, config: &JubbleConfig) -> Self {
        Self {
            id,
            position,
            heading: config.initial_heading,
            speed: config.speed,
            age: 0,
            alive: true,
            cause_of_death: None,
            detection_radius: config.detection_radius,
            detection_half_angle: config.detection_half_angle,
            color,
            coord_goal: None,
            pursuit_goal: None,
        }
    }

    /// Create a newborn jubble at a random in-bounds position with a random colour
    pub fn spawn<R: Rng + ?Sized>(
        id: JubbleId,
        arena: &Arena,
        config: &JubbleConfig,
        rng: &mut R,
    ) -> Self {
        let position = arena.random_position(rng);
        let color = random_color(rng);
        Self::new(id, position, color, config)
    }

    pub(crate) fn with_id(mut self, id: JubbleId) -> Self {
        self.id = id;
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub fn id(&self) -> JubbleId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn age(&self) -> u64 {
        self.age
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn cause_of_death(&self) -> Option<DeathCause> {
        self.cause_of_death
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn detection_radius(&self) -> f64 {
        self.detection_radius
    }

    #[inline]
    pub fn detection_half_angle(&self) -> f64 {
        self.detection_half_angle
    }

    #[inline]
    pub fn coord_goal(&self) -> Option<Point> {
        self.coord_goal
    }

    #[inline]
    pub fn pursuit_goal(&self) -> Option<JubbleId> {
        self.pursuit_goal
    }

    /// What another jubble sees of this one
    #[inline]
    pub fn sighting(&self) -> Sighting {
        Sighting {
            position: self.position,
            alive: self.alive,
        }
    }

    /// Body radius, derived from age
    #[inline]
    pub fn radius(&self, config: &JubbleConfig) -> f64 {
        radius_at(self.age, config)
    }

    /// Advance one tick: follow goals or wander, move, correct drift, age.
    ///
    /// `target` is the current state of the pursuit goal, if there is one.
    /// Returns true if the jubble died of old age during this tick.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        target: Option<Sighting>,
        arena: &Arena,
        config: &JubbleConfig,
        rng: &mut R,
    ) -> bool {
        if !self.alive {
            return false;
        }

        if self.pursuit_goal.is_some() {
            self.track_pursuit(target, arena);
        }

        let mut reached_goal = false;
        if let Some(goal) = self.coord_goal {
            reached_goal = self.steer_to(goal);
        } else if rng.gen_bool(config.turn_chance) {
            let shift = rng.gen_range(-config.turn_limit..=config.turn_limit);
            self.heading = (self.heading + shift).rem_euclid(TAU);
        }

        // A reached goal is an exact stop; no extra step past it.
        if !reached_goal {
            let (dx, dy) = to_cartesian(self.heading, self.speed);
            self.position = (self.position.0 + dx, self.position.1 + dy);
        }

        if let Some(heading) = arena.corrected_heading(self.position) {
            self.heading = heading;
        }

        self.get_older(config)
    }

    /// Re-validate the pursuit goal and retarget onto its current position.
    ///
    /// The target only has to be alive and within radius; it may have left
    /// the viewing cone.
    pub fn track_pursuit(&mut self, target: Option<Sighting>, arena: &Arena) {
        if self.pursuit_goal.is_none() {
            return;
        }
        match target {
            Some(t) if t.alive && self.can_chase(t.position) => {
                self.set_coordinate_goal(t.position, arena);
            }
            _ => {
                self.pursuit_goal = None;
            }
        }
    }

    /// Turn toward `goal`; snap onto it if this tick's move would reach it.
    fn steer_to(&mut self, goal: Point) -> bool {
        self.heading = angle_between(self.position, goal);
        if dist(self.position, goal) <= self.speed {
            self.position = goal;
            self.coord_goal = None;
            true
        } else {
            false
        }
    }

    fn get_older(&mut self, config: &JubbleConfig) -> bool {
        self.age += 1;
        if self.age >= config.death_age {
            self.kill(DeathCause::OldAge, config.death_color)
        } else {
            false
        }
    }

    /// Set an (x, y) goal to head toward.
    ///
    /// Ignored (returns false) when the point lies outside the arena's inset
    /// bounds or this jubble is dead.
    pub fn set_coordinate_goal(&mut self, goal: Point, arena: &Arena) -> bool {
        if !self.alive {
            return false;
        }
        if !arena.accepts_goal(goal) {
            log::trace!(
                "jubble {} ignored out-of-bounds goal ({:.1}, {:.1})",
                self.id,
                goal.0,
                goal.1
            );
            return false;
        }
        self.coord_goal = Some(goal);
        true
    }

    /// Chase another jubble; its position becomes the coordinate goal each tick.
    pub fn set_pursuit_goal(&mut self, target: JubbleId) {
        if self.alive && target != self.id {
            self.pursuit_goal = Some(target);
        }
    }

    /// Whether a point is within the detection radius and viewing cone.
    ///
    /// Other jubbles are perceived by their centre only.
    pub fn can_detect(&self, point: Point) -> bool {
        if !self.in_range(point) {
            return false;
        }
        let bearing = angle_between(self.position, point);
        angle_diff(bearing, self.heading).abs() <= self.detection_half_angle
    }

    pub fn can_detect_jubble(&self, other: &Jubble) -> bool {
        self.can_detect(other.position)
    }

    /// Whether a point is close enough to keep chasing, ignoring the cone
    #[inline]
    pub fn can_chase(&self, point: Point) -> bool {
        self.in_range(point)
    }

    #[inline]
    fn in_range(&self, point: Point) -> bool {
        dist(self.position, point) <= self.detection_radius
    }

    /// Willing to fight jubbles younger than or as old as this one.
    ///
    /// Must stay deterministic: it is re-evaluated every tick while two
    /// jubbles remain in range.
    #[inline]
    pub fn will_fight(&self, other: &Jubble) -> bool {
        self.age >= other.age
    }

    /// Whether this jubble wins a fight against `other` under `policy`
    pub fn will_win_against(&self, other: &Jubble, policy: WinPolicy) -> bool {
        let older = self.age >= other.age;
        match policy {
            WinPolicy::AgeOnly => older,
            WinPolicy::DetectionGated => older && self.can_detect_jubble(other),
        }
    }

    /// Whether both jubbles are alive and their bodies overlap
    pub fn colliding_with(&self, other: &Jubble, config: &JubbleConfig) -> bool {
        self.alive
            && other.alive
            && circles_touching(
                self.position,
                other.position,
                self.radius(config),
                other.radius(config),
            )
    }

    /// Kill this jubble. Returns false (and changes nothing) if it was
    /// already dead.
    pub fn kill(&mut self, cause: DeathCause, death_color: Rgb) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.cause_of_death = Some(cause);
        self.color = death_color;
        self.coord_goal = None;
        self.pursuit_goal = None;
        true
    }

    /// Drawable state. `target` is the pursuit goal's current position.
    pub fn view(&self, target: Option<Point>, config: &JubbleConfig) -> JubbleView {
        let radius = self.radius(config);
        let offset = |angle: f64, length: f64| {
            let (dx, dy) = to_cartesian(angle, length);
            (self.position.0 + dx, self.position.1 + dy)
        };

        JubbleView {
            id: self.id,
            position: self.position,
            radius,
            heading: self.heading,
            color: self.color,
            alive: self.alive,
            nose: offset(self.heading, radius * NOSE_TO_BODY),
            cone_left: offset(self.heading - self.detection_half_angle, self.detection_radius),
            cone_right: offset(self.heading + self.detection_half_angle, self.detection_radius),
            coord_goal: self.coord_goal,
            pursuit_target: if self.alive { target } else { None },
        }
    }
}

/// Read-only drawable state of one jubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JubbleView {
    pub id: JubbleId,
    pub position: Point,
    pub radius: f64,
    pub heading: f64,
    pub color: Rgb,
    pub alive: bool,
    /// End of the heading line drawn from the centre
    pub nose: Point,
    /// Ends of the two viewing-cone edges
    pub cone_left: Point,
    pub cone_right: Point,
    pub coord_goal: Option<Point>,
    pub pursuit_target: Option<Point>,
}

/// Radius grows linearly from birth to maturity, then stays put
pub fn radius_at(age: u64, config: &JubbleConfig) -> f64 {
    if age >= config.maturity_age {
        config.mature_radius
    } else {
        let fraction = age as f64 / config.maturity_age as f64;
        config.birth_radius + fraction * (config.mature_radius - config.birth_radius)
    }
}

/// Random RGB colour
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    (rng.gen(), rng.gen(), rng.gen())
}
