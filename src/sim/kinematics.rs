//! Per-axis claw motion toward its targets
//!
//! Each axis steps independently by at most its per-tick speed. The y axis
//! carries one extra rule: once the claw is below its target it heads back
//! up to the idle height on its own.

use super::state::Claw;

impl Claw {
    /// Step y toward `target_y`
    ///
    /// Below-or-at target: descend one step (y grows downward). Past it:
    /// climb one step and retarget to `idle_y`, never rising above it.
    pub fn step_y(&mut self, idle_y: f64) {
        if self.y <= self.target_y {
            self.y += self.dy;
        } else {
            self.y -= self.dy;
            self.target_y = idle_y;

            if self.y <= idle_y {
                self.y = idle_y;
            }
        }
    }

    /// Step x toward `target_x` without overshooting it
    ///
    /// Only moves when the target lies strictly inside `(0, width)`.
    pub fn step_x(&mut self, width: f64) {
        if self.x > self.target_x && self.target_x > 0.0 {
            if self.x - self.dx < self.target_x {
                self.x = self.target_x;
            } else {
                self.x -= self.dx;
            }
        } else if self.x < self.target_x && self.target_x < width {
            if self.x + self.dx > self.target_x {
                self.x = self.target_x;
            } else {
                self.x += self.dx;
            }
        }
    }

    /// Step the arm opening toward `target_angle`
    ///
    /// No overshoot clamp: with a speed that does not divide the distance
    /// the angle oscillates around the target by less than one step.
    pub fn step_angle(&mut self) {
        if self.angle > self.target_angle {
            self.angle -= self.d_angle;
        } else {
            self.angle += self.d_angle;
        }
    }

    /// Advance every axis that is off target by one step
    pub fn step_toward_target(&mut self, idle_y: f64, width: f64) {
        if self.target_y != self.y {
            self.step_y(idle_y);
        }
        if self.target_x != self.x {
            self.step_x(width);
        }
        if self.angle != self.target_angle {
            self.step_angle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;

    fn claw_at(x: f64, y: f64, angle: f64) -> Claw {
        let mut claw = Claw::new(&MachineConfig::default());
        claw.x = x;
        claw.y = y;
        claw.angle = angle;
        claw.target_x = x;
        claw.target_y = y;
        claw.target_angle = angle;
        claw
    }

    #[test]
    fn test_y_descends_toward_lower_target() {
        let mut claw = claw_at(100.0, 100.0, 0.0);
        claw.target_y = 300.0;
        claw.dy = 5.0;
        claw.step_y(200.0);
        assert_eq!(claw.y, 105.0);
        assert_eq!(claw.target_y, 300.0);
    }

    #[test]
    fn test_y_past_target_retracts_to_idle() {
        let mut claw = claw_at(100.0, 350.0, 0.0);
        claw.target_y = 300.0;
        claw.dy = 10.0;
        claw.step_y(200.0);
        assert_eq!(claw.y, 340.0);
        assert_eq!(claw.target_y, 200.0);
    }

    #[test]
    fn test_y_clamped_at_idle() {
        let mut claw = claw_at(100.0, 205.0, 0.0);
        claw.target_y = 200.0;
        claw.dy = 10.0;
        claw.step_y(200.0);
        assert_eq!(claw.y, 200.0);
        assert_eq!(claw.target_y, 200.0);
    }

    #[test]
    fn test_y_at_target_still_steps_down() {
        // step_y itself is unguarded; step_toward_target skips it
        let mut claw = claw_at(100.0, 300.0, 0.0);
        claw.dy = 10.0;
        claw.step_y(200.0);
        assert_eq!(claw.y, 310.0);
        assert_eq!(claw.target_y, 300.0);

        let mut guarded = claw_at(100.0, 300.0, 0.0);
        guarded.step_toward_target(200.0, 500.0);
        assert_eq!(guarded.y, 300.0);
    }

    #[test]
    fn test_x_moves_left_and_right() {
        let mut claw = claw_at(300.0, 100.0, 0.0);
        claw.target_x = 250.0;
        claw.dx = 10.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 290.0);

        let mut claw = claw_at(200.0, 100.0, 0.0);
        claw.target_x = 250.0;
        claw.dx = 10.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 210.0);
    }

    #[test]
    fn test_x_never_overshoots() {
        let mut claw = claw_at(260.0, 100.0, 0.0);
        claw.target_x = 250.0;
        claw.dx = 20.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 250.0);

        let mut claw = claw_at(470.0, 100.0, 0.0);
        claw.target_x = 480.0;
        claw.dx = 20.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 480.0);
    }

    #[test]
    fn test_x_ignores_targets_on_the_boundary() {
        let mut claw = claw_at(100.0, 100.0, 0.0);
        claw.target_x = 0.0;
        claw.dx = 10.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 100.0);

        let mut claw = claw_at(490.0, 100.0, 0.0);
        claw.target_x = 500.0;
        claw.dx = 10.0;
        claw.step_x(500.0);
        assert_eq!(claw.x, 490.0);
    }

    #[test]
    fn test_angle_steps() {
        let mut claw = claw_at(100.0, 100.0, 45.0);
        claw.target_angle = 30.0;
        claw.d_angle = 5.0;
        claw.step_angle();
        assert_eq!(claw.angle, 40.0);

        let mut claw = claw_at(100.0, 100.0, 15.0);
        claw.target_angle = 30.0;
        claw.d_angle = 5.0;
        claw.step_angle();
        assert_eq!(claw.angle, 20.0);

        let mut claw = claw_at(100.0, 100.0, 44.0);
        claw.target_angle = 45.0;
        claw.d_angle = 0.5;
        claw.step_angle();
        assert_eq!(claw.angle, 44.5);
    }

    #[test]
    fn test_angle_oscillates_without_clamp() {
        let mut claw = claw_at(100.0, 100.0, 0.0);
        claw.target_angle = 1.0;
        claw.d_angle = 0.75;
        for _ in 0..10 {
            claw.step_toward_target(40.0, 600.0);
            assert!((claw.angle - 1.0).abs() <= 0.75);
        }
        assert_ne!(claw.angle, 1.0);
    }

    #[test]
    fn test_exact_landing_parks_below_idle() {
        // 40 -> 100 in steps of 2 lands exactly on the target; the guarded
        // y step then never runs again
        let mut claw = claw_at(200.0, 40.0, 0.0);
        claw.target_y = 100.0;
        claw.dy = 2.0;
        for _ in 0..200 {
            claw.step_toward_target(40.0, 600.0);
        }
        assert_eq!(claw.y, 100.0);
        assert_eq!(claw.target_y, 100.0);
    }

    #[test]
    fn test_overshooting_descent_returns_to_idle() {
        // 1.1 does not divide 60: the claw passes the target and turns back
        let mut claw = claw_at(200.0, 40.0, 0.0);
        claw.target_y = 100.0;
        claw.dy = 1.1;
        let mut deepest: f64 = 0.0;
        for _ in 0..200 {
            claw.step_toward_target(40.0, 600.0);
            deepest = deepest.max(claw.y);
        }
        assert!(deepest > 100.0);
        assert_eq!(claw.y, 40.0);
        assert_eq!(claw.target_y, 40.0);
    }

    #[test]
    fn test_idle_pose_is_stable() {
        let mut claw = claw_at(200.0, 40.0, 0.0);
        for _ in 0..10 {
            claw.step_toward_target(40.0, 600.0);
        }
        assert_eq!(claw.y, 40.0);
        assert_eq!(claw.x, 200.0);
        assert_eq!(claw.angle, 0.0);
    }
}
