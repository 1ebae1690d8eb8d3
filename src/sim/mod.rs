//! Deterministic simulation module
//!
//! All machine physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (balls in insertion order)
//! - No rendering or platform dependencies
//! - No fallible operations

pub mod choreography;
pub mod claw_geometry;
pub mod collision;
pub mod geometry;
pub mod kinematics;
pub mod state;
pub mod tick;

pub use choreography::{
    GrabSequence, GrabStage, ManualDrive, MoveId, MoveRequest, MoveTarget, SequenceStep,
};
pub use claw_geometry::{ArmPolyline, CollisionGeometry, DividerWall};
pub use collision::{
    Facing, collision_response, is_colliding_with_line, resolve_ball_collisions, resolve_ball_pair,
};
pub use geometry::{Segment, calculate_boundary, distance_to_line_segment, rotate_point};
pub use state::{Ball, Claw, ClawPose, MachineState, any_ball_grabbed};
pub use tick::{TickOutcome, step_balls, tick};
