//! Collision detection and response
//!
//! Balls are circles; everything else is a line segment. Responses are soft:
//! a ball is pushed out along the segment normal and loses half of its
//! velocity component along that normal instead of being fully reflected.

use glam::DVec2;

use super::claw_geometry::{ArmPolyline, CollisionGeometry, DividerWall};
use super::geometry::Segment;
use super::state::Ball;
use crate::consts::REST_VELOCITY;

/// Fraction of the normal velocity component removed on a line hit
const LINE_DAMPING: f64 = 0.5;
/// Scale applied to both velocities after a ball-ball exchange
const BALL_EXCHANGE_DAMPING: f64 = 0.5;

/// Which way a segment is traversed when computing its push-out normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// start -> end
    Forward,
    /// end -> start
    Reversed,
}

impl Facing {
    #[inline]
    fn orient(self, segment: Segment) -> Segment {
        match self {
            Facing::Forward => segment,
            Facing::Reversed => segment.reversed(),
        }
    }
}

/// True if the ball overlaps the segment
#[inline]
pub fn is_colliding_with_line(ball: &Ball, segment: &Segment) -> bool {
    segment.distance_to(ball.pos) < ball.radius
}

/// Remove `LINE_DAMPING` of the velocity component along `normal`
#[inline]
pub fn deflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - LINE_DAMPING * velocity.dot(normal) * normal
}

/// Push the ball out of `segment` and damp its velocity along the normal
///
/// The normal is the segment direction rotated by +90 degrees, so the
/// segment's orientation decides which side the ball ends up on. Zero-length
/// segments have no normal and leave the ball untouched.
pub fn collision_response(ball: &mut Ball, segment: &Segment) {
    let Some(normal) = segment.normal() else {
        return;
    };

    let penetration = ball.radius - segment.distance_to(ball.pos);
    ball.pos += normal * penetration;
    ball.vel = deflect_velocity(ball.vel, normal);
}

/// Test the ball against consecutive segments and respond to each hit
///
/// All hits are detected against the incoming position first, then every
/// colliding segment responds in order, each on top of the previous
/// correction. Returns whether anything was hit.
pub fn collide_with_segments<const N: usize>(
    ball: &mut Ball,
    segments: [Segment; N],
    facing: Facing,
) -> bool {
    let hits = segments.map(|segment| is_colliding_with_line(ball, &segment));
    if !hits.contains(&true) {
        return false;
    }

    for (segment, hit) in segments.into_iter().zip(hits) {
        if hit {
            collision_response(ball, &facing.orient(segment));
        }
    }
    true
}

#[inline]
fn collide_with_arm(ball: &mut Ball, arm: &ArmPolyline, facing: Facing) -> bool {
    collide_with_segments(ball, arm.segments(), facing)
}

/// Left grip surface; pushes balls toward the inside of the claw.
/// Returns true on contact.
pub fn collide_left_inner_arm(ball: &mut Ball, geometry: &CollisionGeometry) -> bool {
    collide_with_arm(ball, &geometry.left_inner, Facing::Reversed)
}

/// Right grip surface; pushes balls toward the inside of the claw.
/// Returns true on contact.
pub fn collide_right_inner_arm(ball: &mut Ball, geometry: &CollisionGeometry) -> bool {
    collide_with_arm(ball, &geometry.right_inner, Facing::Forward)
}

/// Right outer guide; pushes balls away from the claw
pub fn collide_right_outer_arm(ball: &mut Ball, geometry: &CollisionGeometry) -> bool {
    collide_with_arm(ball, &geometry.right_outer, Facing::Reversed)
}

/// Left outer guide; pushes balls away from the claw
pub fn collide_left_outer_arm(ball: &mut Ball, geometry: &CollisionGeometry) -> bool {
    collide_with_arm(ball, &geometry.left_outer, Facing::Forward)
}

/// Divider wall between the play field and the chute
///
/// The two faces respond with opposite orientation: the left face pushes
/// balls back toward the play field, the right face pushes them on into the
/// chute. That asymmetry is what makes the opening one-way.
pub fn collide_divider(ball: &mut Ball, divider: &DividerWall) -> bool {
    let left_hit = is_colliding_with_line(ball, &divider.left);
    let right_hit = is_colliding_with_line(ball, &divider.right);

    if left_hit {
        collision_response(ball, &divider.left);
    }
    if right_hit {
        collision_response(ball, &divider.right.reversed());
    }
    left_hit || right_hit
}

/// Keep the ball inside the canvas
///
/// Side and ceiling hits flip the velocity scaled by `friction`. A floor hit
/// scales by `ground_friction`, damps horizontal speed by the same factor and
/// snaps tiny velocities to zero so resting balls stop jittering.
pub fn collide_canvas_edges(
    ball: &mut Ball,
    width: f64,
    height: f64,
    friction: f64,
    ground_friction: f64,
) {
    if ball.pos.x + ball.radius > width {
        ball.vel.x = -ball.vel.x * friction;
        ball.pos.x = width - ball.radius;
    } else if ball.pos.x - ball.radius < 0.0 {
        ball.vel.x = -ball.vel.x * friction;
        ball.pos.x = ball.radius;
    }

    if ball.pos.y + ball.radius > height {
        ball.vel.y = -ball.vel.y * ground_friction;
        ball.pos.y = height - ball.radius;
        ball.vel.x *= ground_friction;

        if ball.vel.y.abs() < REST_VELOCITY {
            ball.vel.y = 0.0;
        }
        if ball.vel.x.abs() < REST_VELOCITY {
            ball.vel.x = 0.0;
        }
    } else if ball.pos.y - ball.radius < 0.0 {
        ball.vel.y = -ball.vel.y * friction;
        ball.pos.y = ball.radius;
    }
}

/// Separate two overlapping balls and exchange their normal velocities
///
/// Each ball moves half the overlap along the center axis. Velocities are
/// rotated into the collision frame, their normal components swapped, rotated
/// back and halved.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return false;
    }

    let overlap = (min_distance - distance) / 2.0;
    // Coincident centers give atan2(0, 0) = 0, separating along +x
    let axis = DVec2::from_angle(delta.y.atan2(delta.x));
    a.pos -= axis * overlap;
    b.pos += axis * overlap;

    let to_frame = DVec2::new(axis.x, -axis.y);
    let mut v1 = to_frame.rotate(a.vel);
    let mut v2 = to_frame.rotate(b.vel);
    std::mem::swap(&mut v1.x, &mut v2.x);

    a.vel = axis.rotate(v1) * BALL_EXCHANGE_DAMPING;
    b.vel = axis.rotate(v2) * BALL_EXCHANGE_DAMPING;
    true
}

/// All-pairs ball collision pass (single pass, in index order)
pub fn resolve_ball_collisions(balls: &mut [Ball]) {
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            resolve_ball_pair(a, b);
        }
    }
}
