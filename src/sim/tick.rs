//! Fixed-step simulation tick
//!
//! One call advances the machine by one frame: balls first, then the claw.
//! There is no delta-time scaling; gravity and friction are tuned for the
//! nominal frame rate.

use super::claw_geometry::CollisionGeometry;
use super::collision::{
    collide_canvas_edges, collide_divider, collide_left_inner_arm, collide_left_outer_arm,
    collide_right_inner_arm, collide_right_outer_arm, resolve_ball_collisions,
};
use super::state::{Ball, MachineState};
use crate::config::MachineConfig;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Balls that reached the drop zone this tick (already moved out of
    /// `MachineState::balls`)
    pub dropped: Vec<Ball>,
    /// An inner arm touched a ball while `return_on_contact` was set
    pub touched: bool,
}

/// Integrate one ball and run its collision checks in fixed order
///
/// Returns true if either inner arm touched the ball. Later checks act on
/// top of earlier position corrections, so the order decides which response
/// wins when several overlap.
pub fn step_ball(
    ball: &mut Ball,
    geometry: &CollisionGeometry,
    config: &MachineConfig,
) -> bool {
    ball.vel.y += config.gravity;
    ball.pos += ball.vel;

    collide_canvas_edges(
        ball,
        config.width,
        config.height,
        config.friction,
        config.ground_friction,
    );
    let left_touch = collide_left_inner_arm(ball, geometry);
    let right_touch = collide_right_inner_arm(ball, geometry);
    collide_right_outer_arm(ball, geometry);
    collide_left_outer_arm(ball, geometry);
    collide_divider(ball, &geometry.divider);

    if is_in_drop_zone(ball, geometry, config) {
        ball.mark_dropped();
    }

    left_touch || right_touch
}

/// Past the divider gate and within `drop_zone_margin` of the floor
#[inline]
pub fn is_in_drop_zone(ball: &Ball, geometry: &CollisionGeometry, config: &MachineConfig) -> bool {
    ball.pos.x >= geometry.divider.gate_x()
        && ball.pos.y >= config.height - config.drop_zone_margin
}

/// Advance the balls by one frame
///
/// Geometry is built once from the pose at the start of the tick. After the
/// per-ball pass, one pairwise ball collision pass runs over every ball
/// (including ones that just dropped), then delivered balls are moved out
/// of the active set.
pub fn step_balls(state: &mut MachineState, config: &MachineConfig) -> TickOutcome {
    let geometry = CollisionGeometry::build(state.claw.pose(), config);

    let mut touched = false;
    for ball in &mut state.balls {
        touched |= step_ball(ball, &geometry, config);
    }

    if touched && state.claw.return_on_contact {
        log::debug!("Claw touched a ball at y={:.1}, closing", state.claw.y);
        state.claw.on_ball_touched();
    }

    resolve_ball_collisions(&mut state.balls);

    let (dropped, active): (Vec<Ball>, Vec<Ball>) =
        state.balls.drain(..).partition(|ball| ball.in_drop_zone);
    state.balls = active;

    for ball in &dropped {
        log::info!("Ball '{}' reached the drop zone", ball.label);
    }
    state.dropped.extend(dropped.iter().cloned());

    TickOutcome {
        dropped,
        touched: touched && state.claw.return_on_contact,
    }
}

/// Advance the whole machine by one frame: balls, then one kinematic claw step
pub fn tick(state: &mut MachineState, config: &MachineConfig) -> TickOutcome {
    let outcome = step_balls(state, config);
    state
        .claw
        .step_toward_target(config.claw_start_y, config.width);
    state.time_ticks += 1;
    outcome
}
