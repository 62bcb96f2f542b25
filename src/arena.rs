//! Arena bounds policy.
//!
//! The arena is the rectangle `[0, width] x [0, height]`. An inset band of
//! `edge_avoidance` keeps goals and spawns away from the literal edge, and
//! the same inset lines trigger edge correction.

use crate::config::ArenaConfig;
use crate::geometry::{Point, ANGLE_DOWN, ANGLE_LEFT, ANGLE_RIGHT, ANGLE_UP};
use rand::Rng;

/// Rectangular playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub edge_avoidance: f64,
}

impl Arena {
    /// Create an arena of the given size and inset margin
    pub fn new(width: f64, height: f64, edge_avoidance: f64) -> Self {
        Self {
            width,
            height,
            edge_avoidance,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.width, config.height, config.edge_avoidance)
    }

    /// Inset horizontal range `(min, max)`
    #[inline]
    pub fn horizontal_range(&self) -> (f64, f64) {
        (self.edge_avoidance, self.width - self.edge_avoidance)
    }

    /// Inset vertical range `(min, max)`
    #[inline]
    pub fn vertical_range(&self) -> (f64, f64) {
        (self.edge_avoidance, self.height - self.edge_avoidance)
    }

    /// Whether a point may be used as a goal (inclusive inset bounds)
    pub fn accepts_goal(&self, (x, y): Point) -> bool {
        let (x_min, x_max) = self.horizontal_range();
        let (y_min, y_max) = self.vertical_range();
        (x_min..=x_max).contains(&x) && (y_min..=y_max).contains(&y)
    }

    /// Whether a point lies inside the full arena rectangle
    pub fn contains(&self, (x, y): Point) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Heading that points back inside when `position` sits on or past an
    /// inset line. Vertical edges are checked last and take precedence in
    /// corners.
    pub fn corrected_heading(&self, (x, y): Point) -> Option<f64> {
        let (x_min, x_max) = self.horizontal_range();
        let (y_min, y_max) = self.vertical_range();

        let mut heading = None;
        if x <= x_min {
            heading = Some(ANGLE_RIGHT);
        }
        if x >= x_max {
            heading = Some(ANGLE_LEFT);
        }
        if y <= y_min {
            heading = Some(ANGLE_DOWN);
        }
        if y >= y_max {
            heading = Some(ANGLE_UP);
        }
        heading
    }

    /// Uniformly random point inside the inset bounds
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let (x_min, x_max) = self.horizontal_range();
        let (y_min, y_max) = self.vertical_range();
        (rng.gen_range(x_min..=x_max), rng.gen_range(y_min..=y_max))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::from_config(&ArenaConfig::default())
    }
}
