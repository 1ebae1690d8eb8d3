//! Claw moves, the grab-and-drop routine and manual drive
//!
//! A move sets the claw targets and then waits for the pose to converge,
//! checked once per frame. The grab routine is a state machine that issues
//! one move per stage and only starts the next stage after the previous move
//! converged. Nothing here blocks; the frame driver polls.

use serde::{Deserialize, Serialize};

use super::geometry::calculate_boundary;
use super::state::{Claw, MachineState};
use crate::config::MachineConfig;
use crate::consts::STALL_WARN_FRAMES;

/// Requested claw goal pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    /// Close and ascend as soon as an inner arm touches a ball
    pub return_on_contact: bool,
}

impl MoveTarget {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle,
            return_on_contact: false,
        }
    }

    pub fn returning_on_contact(mut self) -> Self {
        self.return_on_contact = true;
        self
    }
}

/// Identifies one move so the caller can tell when it completed
pub type MoveId = u64;

/// An in-flight move
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub id: MoveId,
    pub target: MoveTarget,
    polls: u32,
    stall_reported: bool,
}

impl MoveRequest {
    /// Write the (clamped) target onto the claw and start waiting
    pub fn start(id: MoveId, claw: &mut Claw, target: MoveTarget, config: &MachineConfig) -> Self {
        claw.return_on_contact = target.return_on_contact;
        claw.target_x = calculate_boundary(target.x, config.width);
        claw.target_y = calculate_boundary(target.y, config.height);
        claw.target_angle = target.angle;

        log::debug!(
            "Move {} -> ({:.1}, {:.1}, {:.1}){}",
            id,
            claw.target_x,
            claw.target_y,
            claw.target_angle,
            if target.return_on_contact {
                " returning on contact"
            } else {
                ""
            }
        );

        Self {
            id,
            target,
            polls: 0,
            stall_reported: false,
        }
    }

    /// One convergence check against the claw's current targets
    ///
    /// The targets may have moved since `start` (contact closing, the y axis
    /// retargeting to idle); convergence follows them. A target the
    /// kinematics can never reach keeps the request pending forever; that is
    /// reported once as a warning.
    pub fn poll(&mut self, claw: &Claw) -> bool {
        if claw.is_at_target() {
            return true;
        }

        self.polls = self.polls.saturating_add(1);
        if self.polls >= STALL_WARN_FRAMES && !self.stall_reported {
            self.stall_reported = true;
            log::warn!(
                "Move {} has not converged after {} frames (claw at {:.1},{:.1}, target {:.1},{:.1})",
                self.id,
                self.polls,
                claw.x,
                claw.y,
                claw.target_x,
                claw.target_y
            );
        }
        false
    }

    /// Frames polled without converging
    pub fn polls(&self) -> u32 {
        self.polls
    }
}

/// Stages of the grab-and-drop routine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GrabStage {
    /// Open wide and descend, closing early on contact
    Descend,
    /// Close the arms at the current height
    Close,
    /// Rise to idle height
    Rise,
    /// Carry the catch over the chute
    Deliver,
    /// Open over the chute
    Release,
    /// Wait for the balls to fall clear
    Hold { remaining_ms: f64 },
    /// Go back to the rest position
    Return,
    Finished,
}

/// What the frame driver should do after advancing the routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceStep {
    /// Start this move
    Move(MoveTarget),
    /// Nothing to start this frame
    Wait,
    /// The routine is over
    Finished,
}

/// The grab-and-drop routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrabSequence {
    stage: GrabStage,
    drop_delay_ms: f64,
}

impl GrabSequence {
    pub fn new(drop_delay_ms: f64) -> Self {
        Self {
            stage: GrabStage::Descend,
            drop_delay_ms,
        }
    }

    pub fn stage(&self) -> GrabStage {
        self.stage
    }

    /// Move for the opening stage
    pub fn first_move(&self, claw: &Claw, config: &MachineConfig) -> MoveTarget {
        MoveTarget::new(claw.x, config.grab_depth(), config.grab_open_angle).returning_on_contact()
    }

    /// The current stage's move converged; pick the next stage
    ///
    /// Targets are taken from the claw pose at this moment, not when the
    /// routine started.
    pub fn on_move_complete(&mut self, state: &MachineState, config: &MachineConfig) -> SequenceStep {
        let claw = &state.claw;
        let idle_y = config.claw_start_y;
        let (next, step) = match self.stage {
            GrabStage::Descend => (
                GrabStage::Close,
                SequenceStep::Move(MoveTarget::new(claw.x, claw.y, 0.0)),
            ),
            GrabStage::Close => (
                GrabStage::Rise,
                SequenceStep::Move(MoveTarget::new(claw.x, idle_y, 0.0)),
            ),
            GrabStage::Rise => {
                if state.has_grabbed_ball(config.divider_height) {
                    (
                        GrabStage::Deliver,
                        SequenceStep::Move(MoveTarget::new(config.drop_position_x(), idle_y, 0.0)),
                    )
                } else {
                    log::info!("Grab missed, nothing carried above the divider");
                    (GrabStage::Finished, SequenceStep::Finished)
                }
            }
            GrabStage::Deliver => (
                GrabStage::Release,
                SequenceStep::Move(MoveTarget::new(
                    config.drop_position_x(),
                    idle_y,
                    config.grab_open_angle,
                )),
            ),
            GrabStage::Release => (
                GrabStage::Hold {
                    remaining_ms: self.drop_delay_ms,
                },
                SequenceStep::Wait,
            ),
            GrabStage::Return | GrabStage::Finished => (GrabStage::Finished, SequenceStep::Finished),
            GrabStage::Hold { remaining_ms } => (GrabStage::Hold { remaining_ms }, SequenceStep::Wait),
        };

        if next != self.stage {
            log::debug!("Grab stage {:?} -> {:?}", self.stage, next);
        }
        self.stage = next;
        step
    }

    /// Count down the hold; emits the return move once it has elapsed
    pub fn advance_hold(&mut self, elapsed_ms: f64, config: &MachineConfig) -> SequenceStep {
        let GrabStage::Hold { remaining_ms } = self.stage else {
            return SequenceStep::Wait;
        };

        let remaining_ms = remaining_ms - elapsed_ms;
        if remaining_ms > 0.0 {
            self.stage = GrabStage::Hold { remaining_ms };
            return SequenceStep::Wait;
        }

        log::debug!("Grab stage Hold -> Return");
        self.stage = GrabStage::Return;
        SequenceStep::Move(MoveTarget::new(
            config.rest_position_x(),
            config.claw_start_y,
            0.0,
        ))
    }

    pub fn is_finished(&self) -> bool {
        self.stage == GrabStage::Finished
    }
}

/// Continuous left/right drive on a fixed-period timer
#[derive(Debug, Clone, PartialEq)]
pub struct ManualDrive {
    /// -1.0 for left, 1.0 for right
    direction: f64,
    interval_ms: f64,
    elapsed_ms: f64,
}

impl ManualDrive {
    pub fn new(direction: f64, interval_ms: f64) -> Self {
        Self {
            direction: direction.signum(),
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Advance the timer; returns how many times it fired
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.elapsed_ms += elapsed_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }

    /// Nudge the claw's x target one step in the drive direction
    pub fn nudge(&self, claw: &mut Claw, width: f64) {
        claw.target_x = calculate_boundary(claw.x + self.direction * claw.dx, width);
    }
}
