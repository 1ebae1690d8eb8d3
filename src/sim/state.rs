//! Machine state and core simulation types
//!
//! Everything the tick function mutates lives here. The host owns a single
//! `MachineState` and passes it by `&mut` into each frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::appearance::BallStyle;
use crate::config::MachineConfig;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Stable identifier; dropped balls are matched on this across resets
    pub label: String,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// Set once the ball lands in the drop zone, never cleared
    pub in_drop_zone: bool,
    /// Presentation only; the simulation never reads it
    #[serde(default)]
    pub style: BallStyle,
}

impl Ball {
    pub fn new(label: impl Into<String>, pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            label: label.into(),
            pos,
            vel,
            radius,
            in_drop_zone: false,
            style: BallStyle::default(),
        }
    }

    pub fn with_style(mut self, style: BallStyle) -> Self {
        self.style = style;
        self
    }

    /// Flag the ball as delivered. There is no way to unset this.
    #[inline]
    pub fn mark_dropped(&mut self) {
        self.in_drop_zone = true;
    }
}

/// Current claw pose: position plus arm opening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawPose {
    pub x: f64,
    pub y: f64,
    /// Arm opening in degrees, 0 = fully closed
    pub angle: f64,
}

/// The claw
///
/// Pose fields change only through the kinematics step. Targets are written
/// by the choreography layer, pointer input and manual drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claw {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_angle: f64,
    /// Max x step per tick
    pub dx: f64,
    /// Max y step per tick
    pub dy: f64,
    /// Max opening step per tick (degrees)
    pub d_angle: f64,
    /// Touching a ball with an inner arm closes the claw and starts the ascent
    pub return_on_contact: bool,
}

impl Claw {
    /// Claw resting at the configured start pose
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            x: config.claw_start_x,
            y: config.claw_start_y,
            angle: config.claw_start_angle,
            target_x: config.claw_start_x,
            target_y: config.claw_start_y,
            target_angle: config.claw_start_angle,
            dx: config.claw_speed_x,
            dy: config.claw_speed_y,
            d_angle: config.claw_open_speed,
            return_on_contact: false,
        }
    }

    pub fn pose(&self) -> ClawPose {
        ClawPose {
            x: self.x,
            y: self.y,
            angle: self.angle,
        }
    }

    /// Every axis is within one kinematic step of its target
    pub fn is_at_target(&self) -> bool {
        (self.x - self.target_x).abs() <= self.dx
            && (self.y - self.target_y).abs() <= self.dy
            && (self.angle - self.target_angle).abs() <= self.d_angle
    }

    /// An inner arm touched a ball while `return_on_contact` was set:
    /// close the arms and hold the current height (the y step then turns
    /// the claw around toward its idle height).
    pub fn on_ball_touched(&mut self) {
        self.target_angle = 0.0;
        self.target_y = self.y;
    }
}

/// Complete machine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineState {
    /// Balls still in play
    pub balls: Vec<Ball>,
    /// Balls delivered to the drop zone, in delivery order
    pub dropped: Vec<Ball>,
    pub claw: Claw,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl MachineState {
    pub fn new(config: &MachineConfig, balls: Vec<Ball>) -> Self {
        Self {
            balls,
            dropped: Vec::new(),
            claw: Claw::new(config),
            time_ticks: 0,
        }
    }

    /// Labels of every delivered ball
    pub fn dropped_labels(&self) -> impl Iterator<Item = &str> {
        self.dropped.iter().map(|b| b.label.as_str())
    }

    /// Any active ball carried up past the divider opening
    pub fn has_grabbed_ball(&self, divider_height: f64) -> bool {
        any_ball_grabbed(&self.balls, divider_height)
    }
}

/// True if at least one ball sits at or above the divider opening height
pub fn any_ball_grabbed(balls: &[Ball], divider_height: f64) -> bool {
    balls.iter().any(|ball| ball.pos.y <= divider_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claw_starts_at_rest() {
        let config = MachineConfig::default();
        let claw = Claw::new(&config);
        assert_eq!(claw.x, 200.0);
        assert_eq!(claw.y, 40.0);
        assert_eq!(claw.angle, 0.0);
        assert!(claw.is_at_target());
        assert!(!claw.return_on_contact);
    }

    #[test]
    fn test_claw_target_tolerance_is_one_step() {
        let config = MachineConfig::default();
        let mut claw = Claw::new(&config);
        claw.target_x = claw.x + claw.dx;
        assert!(claw.is_at_target());
        claw.target_x = claw.x + claw.dx + 0.01;
        assert!(!claw.is_at_target());
    }

    #[test]
    fn test_ball_touched_closes_and_holds_height() {
        let config = MachineConfig::default();
        let mut claw = Claw::new(&config);
        claw.y = 250.0;
        claw.target_y = 350.0;
        claw.target_angle = 40.0;
        claw.on_ball_touched();
        assert_eq!(claw.target_angle, 0.0);
        assert_eq!(claw.target_y, 250.0);
    }

    #[test]
    fn test_grabbed_check() {
        let balls = vec![
            Ball::new("test1", DVec2::new(100.0, 200.0), DVec2::new(-3.0, 0.0), 2.0),
            Ball::new("test2", DVec2::new(100.0, 400.0), DVec2::new(3.0, 3.0), 2.0),
        ];
        assert!(any_ball_grabbed(&balls, 200.0));
        assert!(!any_ball_grabbed(&balls, 199.0));
        assert!(!any_ball_grabbed(&[], 200.0));

        let config = MachineConfig::default();
        let state = MachineState::new(&config, balls);
        assert!(state.has_grabbed_ball(200.0));
        assert!(!state.has_grabbed_ball(150.0));
    }
}
