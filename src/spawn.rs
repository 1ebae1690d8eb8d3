//! Ball descriptors and initial placement
//!
//! Unspecified or out-of-range values are filled from a seeded RNG, so a
//! seed plus a list of specs always reproduces the same starting layout.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::appearance::BallStyle;
use crate::config::MachineConfig;
use crate::sim::Ball;

/// Random starting momentum is drawn from `[-MAX, MAX)` on each axis
const RANDOM_MOMENTUM_MAX: f64 = 2.0;

/// Description of a ball to put into the machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSpec {
    /// Label text; also the ball's identity for the dropped-ball ledger
    pub text: String,
    pub style: BallStyle,
    pub radius: Option<f64>,
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub start_x_momentum: Option<f64>,
    pub start_y_momentum: Option<f64>,
}

impl BallSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.start_x = Some(x);
        self.start_y = Some(y);
        self
    }

    pub fn with_momentum(mut self, dx: f64, dy: f64) -> Self {
        self.start_x_momentum = Some(dx);
        self.start_y_momentum = Some(dy);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.style.icon_path = Some(path.into());
        self
    }

    pub fn with_paragraphs(mut self, paragraphs: Vec<String>) -> Self {
        self.style.paragraphs = paragraphs;
        self
    }

    /// Build the ball, drawing anything missing from `rng`
    pub fn spawn(&self, config: &MachineConfig, rng: &mut impl Rng) -> Ball {
        let radius = self
            .radius
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(config.ball_radius);

        let x = match self.start_x {
            Some(x) if x > 0.0 && x < config.width => x,
            _ => {
                let play_right = config.width - config.divider_width - config.divider_thickness;
                uniform(rng, radius, play_right - radius)
            }
        };
        let y = match self.start_y {
            Some(y) if y > 0.0 && y < config.height => y,
            _ => uniform(rng, config.height / 2.0, config.height - radius),
        };

        let dx = nonzero_or_random(self.start_x_momentum, rng);
        let dy = nonzero_or_random(self.start_y_momentum, rng);

        Ball::new(self.text.clone(), DVec2::new(x, y), DVec2::new(dx, dy), radius)
            .with_style(self.style.clone())
    }
}

/// Uniform in `[low, high)`, or `low` when the range is empty
fn uniform(rng: &mut impl Rng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}

fn nonzero_or_random(value: Option<f64>, rng: &mut impl Rng) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => rng.random_range(-RANDOM_MOMENTUM_MAX..RANDOM_MOMENTUM_MAX),
    }
}

/// Build the active ball set, skipping every spec whose label was already
/// delivered
pub fn create_initial_balls(
    specs: &[BallSpec],
    dropped: &[Ball],
    config: &MachineConfig,
    rng: &mut impl Rng,
) -> Vec<Ball> {
    specs
        .iter()
        .filter(|spec| {
            let delivered = dropped.iter().any(|ball| ball.label == spec.text);
            if delivered {
                log::debug!("Skipping '{}', already delivered", spec.text);
            }
            !delivered
        })
        .map(|spec| spec.spawn(config, rng))
        .collect()
}
